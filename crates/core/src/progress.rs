//! Computed progress records.

use serde::{Deserialize, Serialize};
use crate::error::InputError;
use crate::id::KeyResultId;
use crate::task::Task;
use crate::Time;

/// Progress of one key result as of a point in time.
///
/// Recomputed on demand and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult {
    /// Key result evaluated
    pub key_result_id: KeyResultId,

    /// Percentage complete, always within 0-100
    pub progress: f64,

    /// Resolved aggregate value used for `progress`
    pub current_value: f64,

    /// Pace relative to `expected_progress`
    pub pace_status: PaceStatus,

    /// Fraction of the year elapsed, 0-1
    pub expected_progress: f64,

    /// Projected value at year end
    pub forecast: f64,

    /// `forecast` normalized the same way as `progress`
    pub projected_progress: f64,

    /// Target reached in the direction-correct sense
    pub is_complete: bool,

    /// Linked task counts
    pub tasks: TaskSummary,

    /// Evaluation time
    pub as_of: Time,
}

/// Actual progress against the linear time-elapsed expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    /// Clearly ahead of the expectation
    Ahead,
    /// At or slightly above the expectation
    OnTrack,
    /// Slightly below the expectation
    AtRisk,
    /// Well below the expectation
    Behind,
}

impl PaceStatus {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaceStatus::Ahead => "ahead",
            PaceStatus::OnTrack => "on_track",
            PaceStatus::AtRisk => "at_risk",
            PaceStatus::Behind => "behind",
        }
    }
}

impl std::fmt::Display for PaceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaceStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ahead" => Ok(PaceStatus::Ahead),
            "on_track" => Ok(PaceStatus::OnTrack),
            "at_risk" => Ok(PaceStatus::AtRisk),
            "behind" => Ok(PaceStatus::Behind),
            _ => Err(InputError::InvalidEnum { kind: "pace status", value: s.to_string() }),
        }
    }
}

/// Counts of tasks linked to a key result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// All linked tasks
    pub total: usize,
    /// Done tasks
    pub completed: usize,
    /// Tasks still needing work
    pub open: usize,
}

impl TaskSummary {
    /// Summarize a task list.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks
            .iter()
            .filter(|t| matches!(t.status, crate::TaskStatus::Done))
            .count();
        let open = tasks.iter().filter(|t| !t.status.is_closed()).count();
        Self {
            total: tasks.len(),
            completed,
            open,
        }
    }
}

/// Objective-level progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveRollup {
    /// Weighted average of key result progress, 0-100
    pub progress: f64,
    /// Key results included
    pub key_result_count: usize,
    /// Key results that reached their target
    pub completed_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskStatus;

    #[test]
    fn test_pace_status_parse_and_display() {
        assert_eq!("at-risk".parse::<PaceStatus>().unwrap(), PaceStatus::AtRisk);
        assert_eq!("ON_TRACK".parse::<PaceStatus>().unwrap(), PaceStatus::OnTrack);
        assert_eq!(PaceStatus::Behind.to_string(), "behind");
        assert!("late".parse::<PaceStatus>().is_err());
    }

    #[test]
    fn test_task_summary() {
        let tasks = vec![
            Task::new("a").with_status(TaskStatus::Done),
            Task::new("b").with_status(TaskStatus::Cancelled),
            Task::new("c").with_status(TaskStatus::InProgress),
            Task::new("d"),
        ];
        let summary = TaskSummary::from_tasks(&tasks);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.open, 2);
        assert_eq!(TaskSummary::from_tasks(&[]), TaskSummary::default());
    }
}

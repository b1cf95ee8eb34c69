//! Task model - work items linked to key results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{KeyResultId, TaskId};

/// A unit of work, optionally contributing to a key result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Key result this task supports
    #[serde(default)]
    pub key_result_id: Option<KeyResultId>,

    /// Task title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    /// Due date
    #[serde(default)]
    pub due: Option<NaiveDate>,
}

impl Task {
    /// Create a new task in `Todo`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            key_result_id: None,
            title: title.into(),
            status: TaskStatus::Todo,
            due: None,
        }
    }

    /// Link to a key result.
    pub fn for_key_result(mut self, id: KeyResultId) -> Self {
        self.key_result_id = Some(id);
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Task status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,
    /// Being worked on
    InProgress,
    /// Finished
    Done,
    /// Dropped
    Cancelled,
}

impl TaskStatus {
    /// Whether the task no longer needs work.
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Cancelled)
    }
}

//! Check-in model - a timestamped observation of a key result's value.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use crate::id::{CheckInId, KeyResultId, QuarterTargetId};
use crate::Time;

/// An append-only observation of a key result.
///
/// Under cumulative aggregation `value` is an absolute reading; under
/// quarterly reset it is scoped to the check-in's quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    /// Unique identifier
    pub id: CheckInId,

    /// Key result observed
    pub key_result_id: KeyResultId,

    /// Recorded value
    pub value: f64,

    /// When the observation was made, if different from when it was recorded
    #[serde(default)]
    pub occurred_at: Option<Time>,

    /// When the check-in was recorded
    pub recorded_at: Time,

    /// Quarter target this check-in counts toward
    #[serde(default)]
    pub quarter_target_id: Option<QuarterTargetId>,

    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,
}

impl CheckIn {
    /// Create a check-in that occurred when it was recorded.
    pub fn new(key_result_id: KeyResultId, value: f64, recorded_at: Time) -> Self {
        Self {
            id: CheckInId::new(),
            key_result_id,
            value,
            occurred_at: None,
            recorded_at,
            quarter_target_id: None,
            note: None,
        }
    }

    /// Link to a quarter target.
    pub fn for_quarter_target(mut self, id: QuarterTargetId) -> Self {
        self.quarter_target_id = Some(id);
        self
    }

    /// Set the occurrence time.
    pub fn occurred(mut self, at: Time) -> Self {
        self.occurred_at = Some(at);
        self
    }

    /// Timestamp establishing order: `occurred_at`, else `recorded_at`.
    pub fn effective_at(&self) -> Time {
        self.occurred_at.unwrap_or(self.recorded_at)
    }

    /// Total ordering key. Ties on `effective_at` fall back to `recorded_at`,
    /// then to the id so the order never depends on slice position.
    pub fn sort_key(&self) -> (Time, Time, CheckInId) {
        (self.effective_at(), self.recorded_at, self.id)
    }

    /// Calendar quarter (1-4) of `effective_at`.
    pub fn calendar_quarter(&self) -> u8 {
        quarter_of(self.effective_at())
    }
}

/// Calendar quarter (1-4) of a timestamp.
pub fn quarter_of(at: Time) -> u8 {
    // month0 is 0..=11
    (at.month0() / 3 + 1) as u8
}

/// Most recent check-in by [`CheckIn::sort_key`].
pub fn latest<'a, I>(check_ins: I) -> Option<&'a CheckIn>
where
    I: IntoIterator<Item = &'a CheckIn>,
{
    check_ins.into_iter().max_by_key(|c| c.sort_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32) -> Time {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_effective_at_prefers_occurred_at() {
        let kr = KeyResultId::new();
        let plain = CheckIn::new(kr, 1.0, at(2025, 3, 1));
        assert_eq!(plain.effective_at(), at(2025, 3, 1));

        let backdated = CheckIn::new(kr, 1.0, at(2025, 3, 1)).occurred(at(2025, 2, 1));
        assert_eq!(backdated.effective_at(), at(2025, 2, 1));
    }

    #[test]
    fn test_quarter_of() {
        assert_eq!(quarter_of(at(2025, 1, 1)), 1);
        assert_eq!(quarter_of(at(2025, 3, 31)), 1);
        assert_eq!(quarter_of(at(2025, 4, 1)), 2);
        assert_eq!(quarter_of(at(2025, 9, 30)), 3);
        assert_eq!(quarter_of(at(2025, 12, 31)), 4);
    }

    #[test]
    fn test_latest_ignores_insertion_order() {
        let kr = KeyResultId::new();
        let early = CheckIn::new(kr, 10.0, at(2025, 1, 10));
        let late = CheckIn::new(kr, 30.0, at(2025, 5, 10));
        let middle = CheckIn::new(kr, 20.0, at(2025, 3, 10));
        let list = vec![late.clone(), early, middle];
        assert_eq!(latest(&list).map(|c| c.value), Some(30.0));
        assert!(latest(&Vec::<CheckIn>::new()).is_none());
    }

    #[test]
    fn test_latest_uses_occurrence_not_recording_time() {
        let kr = KeyResultId::new();
        let recorded_late = CheckIn::new(kr, 5.0, at(2025, 6, 1)).occurred(at(2025, 1, 1));
        let recorded_early = CheckIn::new(kr, 7.0, at(2025, 2, 1));
        let list = [recorded_late, recorded_early];
        assert_eq!(latest(&list).map(|c| c.value), Some(7.0));
    }
}

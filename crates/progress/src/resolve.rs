//! Current-value resolution.

use okr_core::{latest, Aggregation, CheckIn, KeyResult};

/// Quarter (1-4) a check-in counts toward.
///
/// A linked quarter target decides; otherwise the calendar quarter of the
/// check-in's ordering timestamp.
pub fn check_in_quarter(key_result: &KeyResult, check_in: &CheckIn) -> u8 {
    check_in
        .quarter_target_id
        .and_then(|id| key_result.quarter_target(id))
        .map(|target| target.quarter)
        .unwrap_or_else(|| check_in.calendar_quarter())
}

/// Resolved value of each quarter, index 0 = Q1.
///
/// Latest check-in scoped to the quarter, else the quarter target's stored
/// value, else 0.
pub fn quarter_values(key_result: &KeyResult, check_ins: &[CheckIn]) -> [f64; 4] {
    let mut values = [0.0; 4];
    for (index, slot) in values.iter_mut().enumerate() {
        let quarter = index as u8 + 1;
        let from_check_in = latest(
            check_ins
                .iter()
                .filter(|c| check_in_quarter(key_result, c) == quarter),
        )
        .map(|c| c.value);

        let stored = key_result
            .quarter_targets
            .iter()
            .find(|t| t.quarter == quarter)
            .and_then(|t| t.current_value);

        *slot = from_check_in.or(stored).unwrap_or(0.0);
    }
    values
}

/// Aggregate value used for progress.
///
/// Cumulative: latest check-in, else the stored current value, else the
/// start value. Quarterly reset: sum of [`quarter_values`].
pub fn resolve_current_value(key_result: &KeyResult, check_ins: &[CheckIn]) -> f64 {
    match key_result.aggregation {
        Aggregation::Cumulative => latest(check_ins)
            .map(|c| c.value)
            .or(key_result.current_value)
            .unwrap_or(key_result.start_value),
        Aggregation::ResetQuarterly => quarter_values(key_result, check_ins).iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use okr_core::{ObjectiveId, QuarterTarget, Time};

    fn at(m: u32, d: u32) -> Time {
        Utc.with_ymd_and_hms(2025, m, d, 9, 0, 0).unwrap()
    }

    fn cumulative() -> KeyResult {
        KeyResult::new(ObjectiveId::new(), "Active users", 10.0, 100.0, 2025)
    }

    #[test]
    fn test_cumulative_uses_latest_check_in() {
        let kr = cumulative().with_current_value(5.0);
        let check_ins = vec![
            CheckIn::new(kr.id, 70.0, at(6, 1)),
            CheckIn::new(kr.id, 40.0, at(2, 1)),
        ];
        assert_eq!(resolve_current_value(&kr, &check_ins), 70.0);
    }

    #[test]
    fn test_cumulative_fallbacks() {
        let stored = cumulative().with_current_value(33.0);
        assert_eq!(resolve_current_value(&stored, &[]), 33.0);

        let bare = cumulative();
        assert_eq!(resolve_current_value(&bare, &[]), 10.0);
    }

    #[test]
    fn test_quarterly_sum_prefers_check_ins_over_stored_values() {
        let q1 = QuarterTarget::new(1, 25.0).with_current_value(20.0);
        let q2 = QuarterTarget::new(2, 25.0).with_current_value(5.0);
        let q2_id = q2.id;
        let kr = KeyResult::new(ObjectiveId::new(), "Deals", 0.0, 100.0, 2025)
            .with_aggregation(Aggregation::ResetQuarterly)
            .with_quarter_target(q1)
            .with_quarter_target(q2);

        let check_ins = vec![CheckIn::new(kr.id, 30.0, at(5, 10)).for_quarter_target(q2_id)];

        assert_eq!(quarter_values(&kr, &check_ins), [20.0, 30.0, 0.0, 0.0]);
        assert_eq!(resolve_current_value(&kr, &check_ins), 50.0);
    }

    #[test]
    fn test_quarterly_uses_calendar_quarter_without_link() {
        let kr = KeyResult::new(ObjectiveId::new(), "Deals", 0.0, 100.0, 2025)
            .with_aggregation(Aggregation::ResetQuarterly);
        let check_ins = vec![
            CheckIn::new(kr.id, 4.0, at(1, 15)),
            CheckIn::new(kr.id, 6.0, at(2, 15)),
            CheckIn::new(kr.id, 9.0, at(8, 1)),
        ];
        assert_eq!(quarter_values(&kr, &check_ins), [6.0, 0.0, 9.0, 0.0]);
        assert_eq!(resolve_current_value(&kr, &check_ins), 15.0);
    }

    #[test]
    fn test_link_overrides_calendar_quarter() {
        let q4 = QuarterTarget::new(4, 10.0);
        let q4_id = q4.id;
        let kr = KeyResult::new(ObjectiveId::new(), "Deals", 0.0, 40.0, 2025)
            .with_aggregation(Aggregation::ResetQuarterly)
            .with_quarter_target(q4);
        // recorded in January against the Q4 target
        let check_in = CheckIn::new(kr.id, 3.0, at(1, 2)).for_quarter_target(q4_id);
        assert_eq!(check_in_quarter(&kr, &check_in), 4);
    }

    #[test]
    fn test_changing_one_quarter_only_moves_its_contribution() {
        let q3 = QuarterTarget::new(3, 10.0).with_current_value(7.0);
        let kr = KeyResult::new(ObjectiveId::new(), "Deals", 0.0, 40.0, 2025)
            .with_aggregation(Aggregation::ResetQuarterly)
            .with_quarter_target(QuarterTarget::new(1, 10.0).with_current_value(2.0))
            .with_quarter_target(q3.clone());
        let before = resolve_current_value(&kr, &[]);

        let mut bumped = kr.clone();
        bumped.quarter_targets[1] = q3.with_current_value(12.0);
        let after = resolve_current_value(&bumped, &[]);

        assert_eq!(before, 9.0);
        assert_eq!(after - before, 5.0);
    }
}

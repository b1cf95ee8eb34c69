//! Objective roll-up.

use okr_core::{ensure_finite, InputError, KeyResult, ObjectiveRollup, ProgressResult};

use crate::normalize::clamp_percent;

/// One key result's contribution to an objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedProgress {
    /// Key result progress, 0-100
    pub progress: f64,
    /// Relative weight; 1 when absent
    pub weight: Option<f64>,
}

impl WeightedProgress {
    /// Equal-weight contribution.
    pub fn new(progress: f64) -> Self {
        Self { progress, weight: None }
    }

    /// Weighted contribution.
    pub fn weighted(progress: f64, weight: f64) -> Self {
        Self { progress, weight: Some(weight) }
    }
}

/// Weighted average of key result progress, clamped into `[0, 100]`.
///
/// No items, or a total weight of zero, gives 0. Decreasing key results
/// contribute their per-key-result progress like any other.
pub fn objective_progress(items: &[WeightedProgress]) -> Result<f64, InputError> {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for item in items {
        let progress = ensure_finite("progress", item.progress)?;
        let weight = item.weight.unwrap_or(1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(InputError::InvalidWeight(weight));
        }
        weighted_sum += progress * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return Ok(0.0);
    }
    Ok(clamp_percent(weighted_sum / total_weight))
}

/// Roll computed key results up into objective progress.
pub fn roll_up<'a, I>(results: I) -> Result<ObjectiveRollup, InputError>
where
    I: IntoIterator<Item = (&'a KeyResult, &'a ProgressResult)>,
{
    let mut items = Vec::new();
    let mut completed_count = 0;
    for (key_result, result) in results {
        items.push(WeightedProgress::weighted(
            result.progress,
            key_result.effective_weight(),
        ));
        if result.is_complete {
            completed_count += 1;
        }
    }

    Ok(ObjectiveRollup {
        progress: objective_progress(&items)?,
        key_result_count: items.len(),
        completed_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use okr_core::{CheckIn, Direction, ObjectiveId};
    use crate::engine::compute_kr_progress;

    #[test]
    fn test_equal_weights_average() {
        let items = [
            WeightedProgress::new(0.0),
            WeightedProgress::new(50.0),
            WeightedProgress::new(100.0),
        ];
        assert_eq!(objective_progress(&items).unwrap(), 50.0);
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(objective_progress(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_zero_total_weight_is_zero() {
        let items = [WeightedProgress::weighted(80.0, 0.0)];
        assert_eq!(objective_progress(&items).unwrap(), 0.0);
    }

    #[test]
    fn test_weights_shift_the_average() {
        let items = [
            WeightedProgress::weighted(100.0, 3.0),
            WeightedProgress::weighted(0.0, 1.0),
        ];
        assert_eq!(objective_progress(&items).unwrap(), 75.0);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let items = [WeightedProgress::new(250.0), WeightedProgress::new(150.0)];
        assert_eq!(objective_progress(&items).unwrap(), 100.0);
    }

    #[test]
    fn test_invalid_weight_and_progress() {
        let negative = [WeightedProgress::weighted(50.0, -1.0)];
        assert_eq!(objective_progress(&negative), Err(InputError::InvalidWeight(-1.0)));

        let nan = [WeightedProgress::new(f64::NAN)];
        assert!(matches!(
            objective_progress(&nan),
            Err(InputError::NonFinite { field: "progress" })
        ));
    }

    #[test]
    fn test_roll_up_uses_key_result_weights() {
        let objective = ObjectiveId::new();
        let as_of = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let seen = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let mut heavy = KeyResult::new(objective, "Revenue", 0.0, 100.0, 2025);
        heavy.weight = Some(3.0);
        let light = KeyResult::new(objective, "Referrals", 0.0, 100.0, 2025);

        let heavy_result =
            compute_kr_progress(&heavy, &[CheckIn::new(heavy.id, 100.0, seen)], &[], 2025, as_of)
                .unwrap();
        let light_result = compute_kr_progress(&light, &[], &[], 2025, as_of).unwrap();

        let rollup = roll_up([(&heavy, &heavy_result), (&light, &light_result)]).unwrap();
        assert!((rollup.progress - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_roll_up_counts_decreasing_key_results() {
        let objective = ObjectiveId::new();
        let as_of = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let seen = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();

        let churn = KeyResult::new(objective, "Churn", 10.0, 5.0, 2025)
            .with_direction(Direction::Decrease);
        let signups = KeyResult::new(objective, "Signups", 0.0, 100.0, 2025);

        let churn_result =
            compute_kr_progress(&churn, &[CheckIn::new(churn.id, 5.0, seen)], &[], 2025, as_of)
                .unwrap();
        let signups_result =
            compute_kr_progress(&signups, &[CheckIn::new(signups.id, 50.0, seen)], &[], 2025, as_of)
                .unwrap();

        let rollup = roll_up([(&churn, &churn_result), (&signups, &signups_result)]).unwrap();
        assert_eq!(rollup.key_result_count, 2);
        assert_eq!(rollup.completed_count, 1);
        assert!((rollup.progress - 75.0).abs() < 1e-9);
    }
}

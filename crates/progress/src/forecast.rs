//! Linear end-of-year forecast.
//!
//! The observation series is what the key result's aggregate value looked
//! like after each check-in:
//! - cumulative: each check-in's value, in order
//! - quarterly reset: the running annual total, replaying check-ins over a
//!   baseline of stored quarter values for quarters that have none
//!
//! A least-squares line over that series gives a daily rate, which is
//! projected from the last observation to the end of the year.

use okr_core::{Aggregation, CheckIn, KeyResult, Time};
use crate::pace::{days_between, year_bounds};
use crate::resolve::check_in_quarter;

/// A point on the observation series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// When the value was observed
    pub at: Time,
    /// Aggregate value after the observation
    pub value: f64,
}

/// Aggregate value after each check-in, oldest first.
pub fn observation_series(key_result: &KeyResult, check_ins: &[CheckIn]) -> Vec<Observation> {
    let mut ordered: Vec<&CheckIn> = check_ins.iter().collect();
    ordered.sort_by_key(|c| c.sort_key());

    match key_result.aggregation {
        Aggregation::Cumulative => ordered
            .into_iter()
            .map(|c| Observation { at: c.effective_at(), value: c.value })
            .collect(),
        Aggregation::ResetQuarterly => {
            let mut slots = [0.0; 4];
            let mut has_check_in = [false; 4];
            for c in &ordered {
                if let Some(index) = slot(check_in_quarter(key_result, c)) {
                    has_check_in[index] = true;
                }
            }
            for target in &key_result.quarter_targets {
                match slot(target.quarter) {
                    Some(index) if !has_check_in[index] => {
                        slots[index] = target.current_value.unwrap_or(0.0);
                    }
                    _ => {}
                }
            }

            ordered
                .into_iter()
                .map(|c| {
                    if let Some(index) = slot(check_in_quarter(key_result, c)) {
                        slots[index] = c.value;
                    }
                    Observation { at: c.effective_at(), value: slots.iter().sum() }
                })
                .collect()
        }
    }
}

/// Array index of a quarter number; `None` outside 1-4.
fn slot(quarter: u8) -> Option<usize> {
    (1..=4).contains(&quarter).then(|| usize::from(quarter - 1))
}

/// Least-squares slope of value per day, or `None` when it is undefined
/// (fewer than two points, or every point at the same instant).
pub fn daily_rate(series: &[Observation]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    let origin = series[0].at;
    let points: Vec<(f64, f64)> = series
        .iter()
        .map(|o| (days_between(origin, o.at), o.value))
        .collect();

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    if sxx <= f64::EPSILON {
        return None;
    }
    let slope = sxy / sxx;
    slope.is_finite().then_some(slope)
}

/// Projected value at the end of `year`.
///
/// Falls back to `current` whenever no rate can be established, and never
/// projects backwards from observations made after the year ended.
pub fn forecast(current: f64, series: &[Observation], year: i32) -> f64 {
    let (Some(rate), Some(last), Some((_, year_end))) =
        (daily_rate(series), series.last(), year_bounds(year))
    else {
        return current;
    };

    let remaining = days_between(last.at, year_end).max(0.0);
    let projected = current + rate * remaining;
    if projected.is_finite() {
        projected
    } else {
        current
    }
}

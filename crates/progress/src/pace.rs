//! Expected progress and pace classification.

use chrono::{NaiveDate, TimeZone, Utc};
use okr_core::{PaceStatus, Time};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// `[start, end)` of a calendar year in UTC, or `None` outside chrono's range.
pub fn year_bounds(year: i32) -> Option<(Time, Time)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?;
    let end = NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?.and_hms_opt(0, 0, 0)?;
    Some((Utc.from_utc_datetime(&start), Utc.from_utc_datetime(&end)))
}

/// Fractional days between two instants; negative when `to` precedes `from`.
pub fn days_between(from: Time, to: Time) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// 365 or 366.
pub fn days_in_year(year: i32) -> f64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    }
}

/// Fraction of `year` elapsed at `as_of`, clamped into `[0, 1]`.
///
/// This is the straight-line pace reference: a key result is expected to
/// have covered the same share of its range as the year has of its days.
pub fn expected_progress(year: i32, as_of: Time) -> f64 {
    let Some((start, _)) = year_bounds(year) else {
        return 0.0;
    };
    let elapsed = days_between(start, as_of) / days_in_year(year);
    elapsed.clamp(0.0, 1.0)
}

/// Classify `progress` (0-100) against `expected` (0-1).
///
/// | status    | condition                                   |
/// |-----------|---------------------------------------------|
/// | ahead     | `actual >= expected + margin`               |
/// | on track  | `expected <= actual < expected + margin`    |
/// | at risk   | `expected - margin <= actual < expected`    |
/// | behind    | `actual < expected - margin`                |
pub fn pace_status(progress: f64, expected: f64, margin: f64) -> PaceStatus {
    let actual = progress / 100.0;
    if actual >= expected + margin {
        PaceStatus::Ahead
    } else if actual >= expected {
        PaceStatus::OnTrack
    } else if actual >= expected - margin {
        PaceStatus::AtRisk
    } else {
        PaceStatus::Behind
    }
}

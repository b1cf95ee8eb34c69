//! Key result progress engine.
//!
//! Turns a key result snapshot into a [`ProgressResult`]:
//! ```text
//! validate → resolve current value → normalize → expected progress
//!          → pace status → forecast → completion
//! ```
//! Every step is a pure function of its inputs and `as_of`.

use std::collections::HashSet;
use okr_core::{
    ensure_finite, CheckIn, InputError, KeyResult, ProgressResult, Task, TaskSummary, Time,
};
use tracing::debug;

use crate::config::PaceConfig;
use crate::forecast::{forecast, observation_series};
use crate::normalize::{is_complete, progress_percent, Range};
use crate::pace::{expected_progress, pace_status, year_bounds};
use crate::resolve::resolve_current_value;

/// Progress engine with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressEngine {
    config: PaceConfig,
}

impl ProgressEngine {
    /// Create an engine, rejecting out-of-range configuration.
    pub fn new(config: PaceConfig) -> Result<Self, InputError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &PaceConfig {
        &self.config
    }

    /// Compute progress of `key_result` for `year` as of `as_of`.
    ///
    /// `tasks` only feed the task summary; the arithmetic depends on the
    /// key result, its quarter targets and its check-ins.
    pub fn compute(
        &self,
        key_result: &KeyResult,
        check_ins: &[CheckIn],
        tasks: &[Task],
        year: i32,
        as_of: Time,
    ) -> Result<ProgressResult, InputError> {
        let target = validate(key_result, check_ins)?;
        if year_bounds(year).is_none() {
            return Err(InputError::YearOutOfRange(year));
        }

        let range = Range::new(key_result.start_value, target);
        let tolerance = self.config.maintain_tolerance;
        let direction = key_result.direction;

        // each quarter is finite, their sum need not be
        let current_value =
            ensure_finite("current_value", resolve_current_value(key_result, check_ins))?;
        let progress = progress_percent(direction, range, current_value, tolerance);
        let expected = expected_progress(year, as_of);
        let status = pace_status(progress, expected, self.config.pace_margin);

        let series = observation_series(key_result, check_ins);
        let projected = forecast(current_value, &series, year);

        let result = ProgressResult {
            key_result_id: key_result.id,
            progress,
            current_value,
            pace_status: status,
            expected_progress: expected,
            forecast: projected,
            projected_progress: progress_percent(direction, range, projected, tolerance),
            is_complete: is_complete(direction, range, current_value, tolerance),
            tasks: TaskSummary::from_tasks(tasks),
            as_of,
        };

        debug!(
            key_result_id = %key_result.id,
            check_ins = check_ins.len(),
            progress = result.progress,
            expected = result.expected_progress,
            pace = %result.pace_status,
            "Computed key result progress"
        );

        Ok(result)
    }
}

/// [`ProgressEngine::compute`] with the default configuration.
pub fn compute_kr_progress(
    key_result: &KeyResult,
    check_ins: &[CheckIn],
    tasks: &[Task],
    year: i32,
    as_of: Time,
) -> Result<ProgressResult, InputError> {
    ProgressEngine::default().compute(key_result, check_ins, tasks, year, as_of)
}

/// Check the input contract and return the target value.
pub fn validate(key_result: &KeyResult, check_ins: &[CheckIn]) -> Result<f64, InputError> {
    let target = key_result
        .target_value
        .ok_or(InputError::MissingTarget(key_result.id))?;
    ensure_finite("target_value", target)?;
    ensure_finite("start_value", key_result.start_value)?;
    if let Some(current) = key_result.current_value {
        ensure_finite("current_value", current)?;
    }
    if let Some(weight) = key_result.weight {
        if !weight.is_finite() || weight < 0.0 {
            return Err(InputError::InvalidWeight(weight));
        }
    }

    let mut seen = HashSet::new();
    for quarter_target in &key_result.quarter_targets {
        if !(1..=4).contains(&quarter_target.quarter) {
            return Err(InputError::QuarterOutOfRange(quarter_target.quarter));
        }
        if !seen.insert(quarter_target.quarter) {
            return Err(InputError::DuplicateQuarter(quarter_target.quarter));
        }
        ensure_finite("quarter_target.target_value", quarter_target.target_value)?;
        if let Some(current) = quarter_target.current_value {
            ensure_finite("quarter_target.current_value", current)?;
        }
    }

    for check_in in check_ins {
        if check_in.key_result_id != key_result.id {
            return Err(InputError::ForeignCheckIn {
                check_in: check_in.id,
                owner: check_in.key_result_id,
                expected: key_result.id,
            });
        }
        ensure_finite("check_in.value", check_in.value)?;
        if let Some(linked) = check_in.quarter_target_id {
            if key_result.quarter_target(linked).is_none() {
                return Err(InputError::UnknownQuarterTarget {
                    check_in: check_in.id,
                    quarter_target: linked,
                });
            }
        }
    }

    Ok(target)
}

//! Value-to-percentage normalization and completion.

use okr_core::Direction;

/// Clamp a percentage into `[0, 100]`. NaN maps to 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Measurement range of a key result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Start value
    pub start: f64,
    /// Target value
    pub target: f64,
}

impl Range {
    /// Create a range.
    pub fn new(start: f64, target: f64) -> Self {
        Self { start, target }
    }

    /// `target - start`; negative for decreasing targets.
    pub fn span(&self) -> f64 {
        self.target - self.start
    }

    /// Reference magnitude for the maintain band: `|span|`, else `|target|`, else 1.
    pub fn scale(&self) -> f64 {
        let span = self.span().abs();
        if span > 0.0 {
            span
        } else if self.target != 0.0 {
            self.target.abs()
        } else {
            1.0
        }
    }

    /// Half-width of the band around the target counted as held.
    pub fn maintain_band(&self, tolerance: f64) -> f64 {
        tolerance * self.scale()
    }
}

/// Unclamped progress percentage of `current` within `range`.
///
/// Increase and decrease share one formula: the sign of the span carries
/// the direction. A zero span reads as 0 or 100 depending on whether the
/// target has been reached.
pub fn raw_progress(direction: Direction, range: Range, current: f64, tolerance: f64) -> f64 {
    match direction {
        Direction::Maintain => {
            let band = range.maintain_band(tolerance);
            let deviation = (current - range.target).abs();
            if deviation <= band {
                100.0
            } else {
                100.0 * (1.0 - (deviation - band) / range.scale())
            }
        }
        Direction::Increase | Direction::Decrease => {
            let span = range.span();
            if span == 0.0 {
                if is_complete(direction, range, current, tolerance) {
                    100.0
                } else {
                    0.0
                }
            } else {
                (current - range.start) / span * 100.0
            }
        }
    }
}

/// Progress percentage of `current`, clamped into `[0, 100]`.
pub fn progress_percent(direction: Direction, range: Range, current: f64, tolerance: f64) -> f64 {
    clamp_percent(raw_progress(direction, range, current, tolerance))
}

/// Whether `current` has reached the target in the direction-correct sense.
pub fn is_complete(direction: Direction, range: Range, current: f64, tolerance: f64) -> bool {
    match direction {
        Direction::Increase => current >= range.target,
        Direction::Decrease => current <= range.target,
        Direction::Maintain => (current - range.target).abs() <= range.maintain_band(tolerance),
    }
}

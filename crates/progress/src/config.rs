//! Pace and cache configuration.

use std::time::Duration;
use okr_core::InputError;
use serde::{Deserialize, Serialize};

/// Distance from the expected-progress line, as a fraction of the year,
/// that separates on-track from ahead and at-risk from behind.
pub const DEFAULT_PACE_MARGIN: f64 = 0.05;

/// Half-width of the band around the target that counts as held for
/// `maintain` key results, as a fraction of the key result's scale.
pub const DEFAULT_MAINTAIN_TOLERANCE: f64 = 0.05;

/// How long a memoized progress result stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Thresholds used by the progress engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceConfig {
    /// See [`DEFAULT_PACE_MARGIN`]
    pub pace_margin: f64,

    /// See [`DEFAULT_MAINTAIN_TOLERANCE`]
    pub maintain_tolerance: f64,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            pace_margin: DEFAULT_PACE_MARGIN,
            maintain_tolerance: DEFAULT_MAINTAIN_TOLERANCE,
        }
    }
}

impl PaceConfig {
    /// Set the pace margin.
    pub fn with_pace_margin(mut self, margin: f64) -> Self {
        self.pace_margin = margin;
        self
    }

    /// Set the maintain tolerance.
    pub fn with_maintain_tolerance(mut self, tolerance: f64) -> Self {
        self.maintain_tolerance = tolerance;
        self
    }

    /// Both values must be finite and in `[0, 1)`.
    pub fn validate(&self) -> Result<(), InputError> {
        for (name, value) in [
            ("pace_margin", self.pace_margin),
            ("maintain_tolerance", self.maintain_tolerance),
        ] {
            if !value.is_finite() || !(0.0..1.0).contains(&value) {
                return Err(InputError::InvalidConfig { name, value });
            }
        }
        Ok(())
    }
}

/// Configuration for [`ProgressCache`](crate::ProgressCache).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Entry lifetime
    pub ttl: Duration,

    /// Disable memoization entirely
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            enabled: true,
        }
    }
}

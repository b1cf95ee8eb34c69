//! Progress Computation (Layer 3)
//!
//! Key result progress, pace against the calendar year, end-of-year
//! forecasts, and objective roll-up.

#![warn(missing_docs)]

pub mod config;
pub mod normalize;
pub mod resolve;
pub mod pace;
pub mod forecast;
pub mod engine;
pub mod rollup;
pub mod cache;
pub mod tracker;

pub use config::{
    CacheConfig, PaceConfig, DEFAULT_CACHE_TTL, DEFAULT_MAINTAIN_TOLERANCE, DEFAULT_PACE_MARGIN,
};
pub use engine::{compute_kr_progress, validate, ProgressEngine};
pub use rollup::{objective_progress, roll_up, WeightedProgress};
pub use cache::ProgressCache;
pub use tracker::{
    BasicProgressTracker, ObjectiveProgress, ProgressSnapshot, ProgressTracker, TrackerError,
};

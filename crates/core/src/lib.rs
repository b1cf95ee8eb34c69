//! OKR core data models.
//!
//! Strongly typed records for objectives, key results, quarter targets,
//! check-ins and tasks, plus the computed progress records. The storage
//! layer builds these before anything reaches the progress engine.

#![warn(missing_docs)]

// Core identities
mod id;
mod error;

// Planning
mod objective;
mod key_result;
mod task;

// Observations and results
mod check_in;
mod progress;

// Re-exports
pub use id::*;
pub use error::{ensure_finite, InputError};

pub use objective::Objective;
pub use key_result::{Aggregation, Direction, KeyResult, KrType, QuarterTarget};
pub use task::{Task, TaskStatus};

pub use check_in::{latest, quarter_of, CheckIn};
pub use progress::{ObjectiveRollup, PaceStatus, ProgressResult, TaskSummary};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

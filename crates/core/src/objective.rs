//! Objective model - the qualitative goal key results roll up into.

use serde::{Deserialize, Serialize};
use crate::id::ObjectiveId;

/// A yearly objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    /// Unique identifier
    pub id: ObjectiveId,

    /// Objective title
    pub title: String,

    /// Calendar year
    pub year: i32,
}

impl Objective {
    /// Create a new objective.
    pub fn new(title: impl Into<String>, year: i32) -> Self {
        Self {
            id: ObjectiveId::new(),
            title: title.into(),
            year,
        }
    }
}

//! Key result model - a measurable sub-goal under an objective.

use serde::{Deserialize, Serialize};
use crate::error::InputError;
use crate::id::{KeyResultId, ObjectiveId, QuarterTargetId};

/// A key result tracked by a start/target/current value triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    /// Unique identifier
    pub id: KeyResultId,

    /// Owning objective
    pub objective_id: ObjectiveId,

    /// Short title
    #[serde(default)]
    pub title: String,

    /// Informational classification
    #[serde(default)]
    pub kr_type: KrType,

    /// How progress toward the target is read
    #[serde(default)]
    pub direction: Direction,

    /// How quarterly values compose into the annual value
    #[serde(default)]
    pub aggregation: Aggregation,

    /// Value at the start of the year
    #[serde(default)]
    pub start_value: f64,

    /// Value to reach by the end of the year
    pub target_value: Option<f64>,

    /// Last known aggregate value
    #[serde(default)]
    pub current_value: Option<f64>,

    /// Calendar year the key result belongs to
    pub year: i32,

    /// Weight in the objective roll-up (1 when absent)
    #[serde(default)]
    pub weight: Option<f64>,

    /// Quarterly sub-targets, at most one per quarter
    #[serde(default)]
    pub quarter_targets: Vec<QuarterTarget>,
}

impl KeyResult {
    /// Create an increasing, cumulative key result from `start` to `target`.
    pub fn new(
        objective_id: ObjectiveId,
        title: impl Into<String>,
        start_value: f64,
        target_value: f64,
        year: i32,
    ) -> Self {
        Self {
            id: KeyResultId::new(),
            objective_id,
            title: title.into(),
            kr_type: KrType::default(),
            direction: Direction::default(),
            aggregation: Aggregation::default(),
            start_value,
            target_value: Some(target_value),
            current_value: None,
            year,
            weight: None,
            quarter_targets: Vec::new(),
        }
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the aggregation mode.
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set the stored current value.
    pub fn with_current_value(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }

    /// Add a quarter target.
    pub fn with_quarter_target(mut self, target: QuarterTarget) -> Self {
        self.quarter_targets.push(target);
        self
    }

    /// Roll-up weight, defaulting to 1.
    pub fn effective_weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    /// Look up a quarter target by id.
    pub fn quarter_target(&self, id: QuarterTargetId) -> Option<&QuarterTarget> {
        self.quarter_targets.iter().find(|t| t.id == id)
    }
}

/// Per-quarter sub-goal and running value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterTarget {
    /// Unique identifier
    pub id: QuarterTargetId,

    /// Quarter number, 1-4
    pub quarter: u8,

    /// Sub-target for the quarter
    pub target_value: f64,

    /// Aggregate value recorded for the quarter
    #[serde(default)]
    pub current_value: Option<f64>,
}

impl QuarterTarget {
    /// Create a quarter target without a recorded value.
    pub fn new(quarter: u8, target_value: f64) -> Self {
        Self {
            id: QuarterTargetId::new(),
            quarter,
            target_value,
            current_value: None,
        }
    }

    /// Set the recorded value.
    pub fn with_current_value(mut self, value: f64) -> Self {
        self.current_value = Some(value);
        self
    }
}

/// Key result classification. Does not change the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KrType {
    /// Free-form measured quantity
    #[default]
    Metric,
    /// Count of things
    Count,
    /// Done / not done
    Milestone,
    /// Ratio or percentage
    Rate,
    /// Averaged figure
    Average,
}

impl KrType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            KrType::Metric => "metric",
            KrType::Count => "count",
            KrType::Milestone => "milestone",
            KrType::Rate => "rate",
            KrType::Average => "average",
        }
    }
}

impl std::str::FromStr for KrType {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(KrType::Metric),
            "count" => Ok(KrType::Count),
            "milestone" => Ok(KrType::Milestone),
            "rate" => Ok(KrType::Rate),
            "average" => Ok(KrType::Average),
            _ => Err(InputError::InvalidEnum { kind: "kr type", value: s.to_string() }),
        }
    }
}

/// Measurement direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Higher is better
    #[default]
    Increase,
    /// Lower is better
    Decrease,
    /// Stay near the target
    Maintain,
}

impl Direction {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Increase => "increase",
            Direction::Decrease => "decrease",
            Direction::Maintain => "maintain",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase" => Ok(Direction::Increase),
            "decrease" => Ok(Direction::Decrease),
            "maintain" => Ok(Direction::Maintain),
            _ => Err(InputError::InvalidEnum { kind: "direction", value: s.to_string() }),
        }
    }
}

/// How quarterly values compose into the annual value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// One running value across the year
    #[default]
    Cumulative,
    /// Independent per-quarter values, summed
    ResetQuarterly,
}

impl Aggregation {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Cumulative => "cumulative",
            Aggregation::ResetQuarterly => "reset_quarterly",
        }
    }
}

impl std::str::FromStr for Aggregation {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulative" => Ok(Aggregation::Cumulative),
            "reset_quarterly" => Ok(Aggregation::ResetQuarterly),
            _ => Err(InputError::InvalidEnum { kind: "aggregation", value: s.to_string() }),
        }
    }
}

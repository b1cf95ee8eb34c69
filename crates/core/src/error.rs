//! Input-contract errors.

use crate::id::{CheckInId, KeyResultId, QuarterTargetId};

/// A structural violation of the records handed to the progress engine.
///
/// Numeric degeneracy (zero-length ranges, empty histories, dates outside
/// the year) is never reported here; those inputs have defined results.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The key result has no target value
    #[error("key result {0} has no target value")]
    MissingTarget(KeyResultId),

    /// A numeric field is NaN or infinite
    #[error("field `{field}` is not a finite number")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
    },

    /// Quarter number outside 1-4
    #[error("quarter {0} is outside 1-4")]
    QuarterOutOfRange(u8),

    /// Two quarter targets for the same quarter
    #[error("quarter {0} has more than one target")]
    DuplicateQuarter(u8),

    /// A check-in links to a quarter target the key result does not own
    #[error("check-in {check_in} links to unknown quarter target {quarter_target}")]
    UnknownQuarterTarget {
        /// The check-in carrying the link
        check_in: CheckInId,
        /// The dangling quarter target id
        quarter_target: QuarterTargetId,
    },

    /// A check-in recorded against a different key result
    #[error("check-in {check_in} belongs to key result {owner}, not {expected}")]
    ForeignCheckIn {
        /// The check-in
        check_in: CheckInId,
        /// Key result it was recorded against
        owner: KeyResultId,
        /// Key result being evaluated
        expected: KeyResultId,
    },

    /// Year that cannot be represented as a calendar range
    #[error("year {0} is out of range")]
    YearOutOfRange(i32),

    /// Roll-up weight that is negative or not finite
    #[error("weight {0} must be a finite, non-negative number")]
    InvalidWeight(f64),

    /// Configuration value out of its allowed range
    #[error("configuration `{name}` = {value} is out of range")]
    InvalidConfig {
        /// Configuration key
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Unrecognized enum value when parsing from text
    #[error("`{value}` is not a valid {kind}")]
    InvalidEnum {
        /// Enum being parsed
        kind: &'static str,
        /// Rejected input
        value: String,
    },
}

/// Reject NaN and infinities for a named field.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NonFinite { field })
    }
}

//! Error type shared by the device models, the simulator, and the C boundary.

use thiserror::Error;

/// Errors reported by grid operations.
///
/// All failures are local and synchronous: the operation that returns one
/// leaves the simulator state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A remove call named an identifier that is not in the collection.
    #[error("no {kind} with id {id}")]
    InvalidIdentifier { kind: &'static str, id: i32 },

    /// An add call reused an identifier already present in the collection.
    #[error("{kind} with id {id} already exists")]
    DuplicateIdentifier { kind: &'static str, id: i32 },

    /// A capacity, rate, or time step was out of range.
    #[error("invalid {field} = {value}: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Charge or discharge was called with a negative (or NaN) amount.
    #[error("{what} must be non-negative, got {value}")]
    NegativeEnergyInput { what: &'static str, value: f64 },

    /// A category string did not name a known producer or consumer type.
    #[error("unknown category \"{value}\"")]
    UnknownCategory { value: String },
}

/// Rejects non-finite or non-positive values.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GridError::InvalidConfiguration {
            field,
            value,
            reason: "must be a finite number > 0",
        })
    }
}

/// Rejects non-finite or negative values.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, GridError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GridError::InvalidConfiguration {
            field,
            value,
            reason: "must be a finite number >= 0",
        })
    }
}

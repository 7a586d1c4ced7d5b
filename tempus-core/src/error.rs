//! Error values for temporal computations
//!
//! Errors never crash the process. Every operation here is a deterministic
//! pure function, so nothing is retried either: a failure is a value the
//! caller handles or avoids by validating first.

use crate::datetime::DateTimeError;
use crate::duration::TemporalUnit;

/// Failures surfaced by duration and interval operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemporalError {
    /// A finite-repetition-dependent quantity was requested on an interval
    /// whose repetition is unbounded
    #[error("repetition is unbounded; use the repetition-insensitive accessors")]
    UnboundedRepetition,

    /// A temporal unit outside the duration's supported decomposition
    #[error("unsupported temporal unit: {0}")]
    UnsupportedUnit(TemporalUnit),

    /// A calendar-relative computation needed an anchor point and none was
    /// supplied
    #[error("calendar-relative value requires a reference point")]
    InvalidReference,

    /// A repetition count that is neither a non-negative integer nor the
    /// infinite sentinel (-1)
    #[error("invalid repetition count: {0} (expected -1 or a non-negative integer)")]
    InvalidRepetition(i64),

    /// Malformed textual representation
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    DateTime(#[from] DateTimeError),
}

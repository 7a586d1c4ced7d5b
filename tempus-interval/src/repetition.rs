//! Repetition count for temporal intervals
//!
//! The wire form is a single integer: `-1` means unbounded, `0` means the
//! base span occurs once with no additional repeats, `n > 0` means the base
//! span is applied `n` additional times sequentially from the anchor.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tempus_core::TemporalError;

/// How often an interval's base span repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Unbounded repetition; with-repetition accessors are undefined
    Infinite,
    /// The base span plus `n` additional sequential applications
    Count(u32),
}

impl Repetition {
    /// The base span occurring exactly once
    pub const ONCE: Repetition = Repetition::Count(0);

    /// Validate a raw count: `-1` is the infinite sentinel, any other
    /// negative value is rejected as invalid state
    pub fn from_count(count: i64) -> Result<Self, TemporalError> {
        match count {
            -1 => Ok(Repetition::Infinite),
            n if n >= 0 && n <= u32::MAX as i64 => Ok(Repetition::Count(n as u32)),
            other => Err(TemporalError::InvalidRepetition(other)),
        }
    }

    /// The integer wire form (`-1` for infinite)
    pub fn as_i64(&self) -> i64 {
        match self {
            Repetition::Infinite => -1,
            Repetition::Count(n) => *n as i64,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Repetition::Infinite)
    }

    /// Total number of sequential applications of the base span, if finite
    pub fn applications(&self) -> Option<u32> {
        match self {
            Repetition::Infinite => None,
            Repetition::Count(n) => Some(n + 1),
        }
    }
}

impl fmt::Display for Repetition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl Serialize for Repetition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for Repetition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Repetition::from_count(raw).map_err(D::Error::custom)
    }
}

//! Tempus Core - Fundamental types
//!
//! This crate provides the core types used throughout Tempus:
//! - `DateTime`: nanosecond-precision point in time (proleptic Gregorian, UTC-first)
//! - `Duration`: a span with separate calendar-relative and exact parts
//! - `TemporalError`: recoverable error values for temporal computations

mod datetime;
mod duration;
mod error;

pub use datetime::{
    days_in_month, is_leap_year, DateTime, DateTimeComponents, DateTimeError, NANOS_PER_DAY,
    NANOS_PER_HOUR, NANOS_PER_MILLI, NANOS_PER_MINUTE, NANOS_PER_SECOND,
};
pub use duration::{Duration, TemporalUnit};
pub use error::TemporalError;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{DateTime, Duration, TemporalError, TemporalUnit};
}

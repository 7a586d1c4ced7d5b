//! Tempus Clock - wall-clock utilities on top of the core calendar
//!
//! Week positions (ISO week-of-year plus a Monday-based week-of-month),
//! military time-zone designators, and an immutable stopwatch value.

mod stopwatch;
mod week;
mod zone;

pub use stopwatch::Stopwatch;
pub use week::Week;
pub use zone::ZoneDesignator;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Stopwatch, Week, ZoneDesignator};
    pub use tempus_core::prelude::*;
}

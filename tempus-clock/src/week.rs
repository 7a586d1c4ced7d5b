//! ISO week positions
//!
//! Thin wrapper over the core calendar: week-of-year per ISO 8601 (week 1
//! contains the first Thursday) and a Monday-based week-of-month.

use serde::{Deserialize, Serialize};
use std::fmt;
use tempus_core::DateTime;

/// The week a point in time falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Week {
    /// ISO week-numbering year (differs from the civil year around Jan 1)
    year: i32,
    /// Week of the ISO year, 1-53
    week_of_year: u32,
    /// Week of the civil month, 1-6, weeks starting Monday
    week_of_month: u32,
}

impl Week {
    pub fn of(point: &DateTime) -> Week {
        let (year, week_of_year) = point.iso_year_week();

        // Offset of the month's first day within its Monday-based week
        let first_of_month = point.add_days(1 - point.day() as i64);
        let lead = first_of_month.weekday() - 1;
        let week_of_month = (point.day() - 1 + lead) / 7 + 1;

        Week { year, week_of_year, week_of_month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week_of_year(&self) -> u32 {
        self.week_of_year
    }

    pub fn week_of_month(&self) -> u32 {
        self.week_of_month
    }

    /// `(iso_year, week)` pair, handling the December/January boundary
    pub fn year_week(&self) -> (i32, u32) {
        (self.year, self.week_of_year)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week_of_year)
    }
}

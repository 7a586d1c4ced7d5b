//! Point-in-time type for Tempus
//!
//! Nanosecond-precision datetime on the proleptic Gregorian calendar.
//! Stores nanoseconds since the Unix epoch in an i128 to avoid overflow,
//! UTC-first with an optional fixed offset. No timezone database: an offset
//! is a plain number of seconds, nothing more.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Constants
// ============================================================================

pub const NANOS_PER_SECOND: i128 = 1_000_000_000;
pub const NANOS_PER_MILLI: i128 = 1_000_000;
pub const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
pub const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
pub const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from year 0 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

// ============================================================================
// DateTime
// ============================================================================

/// A point in time with nanosecond precision
///
/// Internally stores nanoseconds since the Unix epoch (1970-01-01T00:00:00Z),
/// negative for earlier points. The optional offset only affects rendering
/// and `utc_offset()`; the stored instant is always the UTC instant, and
/// equality, ordering and hashing compare the instant alone — the same
/// moment written as `Z` or `+05:30` is one value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateTime {
    /// Nanoseconds since Unix epoch
    nanos: i128,
    /// Fixed offset in seconds from UTC (None = UTC)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    offset: Option<i32>,
}

impl DateTime {
    // ========== Construction ==========

    /// Create from nanoseconds since the Unix epoch
    pub fn from_nanos(nanos: i128) -> Self {
        Self { nanos, offset: None }
    }

    /// Create from seconds since the Unix epoch
    pub fn from_unix_secs(secs: i64) -> Self {
        Self::from_nanos((secs as i128) * NANOS_PER_SECOND)
    }

    /// Create from milliseconds since the Unix epoch
    pub fn from_unix_millis(millis: i64) -> Self {
        Self::from_nanos((millis as i128) * NANOS_PER_MILLI)
    }

    /// Create a date at midnight
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateTimeError> {
        Self::from_ymd_hms_nano(year, month, day, 0, 0, 0, 0)
    }

    /// Create a datetime from components
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self, DateTimeError> {
        Self::from_ymd_hms_nano(year, month, day, hour, minute, second, 0)
    }

    /// Create a datetime from components with nanoseconds
    pub fn from_ymd_hms_nano(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        nano: u32,
    ) -> Result<Self, DateTimeError> {
        if !(1..=12).contains(&month) {
            return Err(DateTimeError::InvalidMonth(month));
        }
        let max_day = days_in_month(year, month);
        if day < 1 || day > max_day {
            return Err(DateTimeError::InvalidDay { day, month, year });
        }
        if hour > 23 {
            return Err(DateTimeError::InvalidHour(hour));
        }
        if minute > 59 {
            return Err(DateTimeError::InvalidMinute(minute));
        }
        if second > 59 {
            return Err(DateTimeError::InvalidSecond(second));
        }
        if nano >= 1_000_000_000 {
            return Err(DateTimeError::InvalidNano(nano));
        }

        let days = days_from_civil(year, month, day);
        let time_nanos = (hour as i128) * NANOS_PER_HOUR
            + (minute as i128) * NANOS_PER_MINUTE
            + (second as i128) * NANOS_PER_SECOND
            + (nano as i128);

        Ok(Self {
            nanos: (days as i128) * NANOS_PER_DAY + time_nanos,
            offset: None,
        })
    }

    /// Get the current UTC time
    pub fn now() -> Self {
        let since_epoch = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Self::from_nanos(since_epoch.as_nanos() as i128)
    }

    // ========== Accessors ==========

    /// Nanoseconds since the Unix epoch
    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }

    /// Seconds since the Unix epoch (truncated)
    pub fn as_unix_secs(&self) -> i64 {
        (self.nanos.div_euclid(NANOS_PER_SECOND)) as i64
    }

    /// Milliseconds since the Unix epoch (truncated)
    pub fn as_unix_millis(&self) -> i64 {
        (self.nanos.div_euclid(NANOS_PER_MILLI)) as i64
    }

    /// Fixed offset in seconds from UTC (None = UTC)
    pub fn utc_offset(&self) -> Option<i32> {
        self.offset
    }

    /// Attach a fixed offset
    pub fn with_utc_offset(mut self, offset_secs: i32) -> Self {
        self.offset = Some(offset_secs);
        self
    }

    /// Drop the offset annotation
    pub fn to_utc(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Year component
    pub fn year(&self) -> i32 {
        self.to_ymd().0
    }

    /// Month component (1-12)
    pub fn month(&self) -> u32 {
        self.to_ymd().1
    }

    /// Day component (1-31)
    pub fn day(&self) -> u32 {
        self.to_ymd().2
    }

    /// Hour component (0-23)
    pub fn hour(&self) -> u32 {
        (self.nanos.rem_euclid(NANOS_PER_DAY) / NANOS_PER_HOUR) as u32
    }

    /// Minute component (0-59)
    pub fn minute(&self) -> u32 {
        ((self.nanos.rem_euclid(NANOS_PER_DAY) % NANOS_PER_HOUR) / NANOS_PER_MINUTE) as u32
    }

    /// Second component (0-59)
    pub fn second(&self) -> u32 {
        ((self.nanos.rem_euclid(NANOS_PER_DAY) % NANOS_PER_MINUTE) / NANOS_PER_SECOND) as u32
    }

    /// Nanosecond component (0-999_999_999)
    pub fn nanosecond(&self) -> u32 {
        self.nanos.rem_euclid(NANOS_PER_SECOND) as u32
    }

    /// Millisecond component (0-999)
    pub fn millisecond(&self) -> u32 {
        self.nanosecond() / 1_000_000
    }

    /// Day of week (1=Monday .. 7=Sunday, ISO 8601)
    pub fn weekday(&self) -> u32 {
        let days = self.nanos.div_euclid(NANOS_PER_DAY);
        // 1970-01-01 was a Thursday (4)
        let dow = (days + 4).rem_euclid(7);
        if dow == 0 { 7 } else { dow as u32 }
    }

    /// Day of year (1-366)
    pub fn day_of_year(&self) -> u32 {
        let (year, month, day) = self.to_ymd();
        let mut doy = day;
        for m in 1..month {
            doy += days_in_month(year, m);
        }
        doy
    }

    /// ISO 8601 week number (1-53)
    ///
    /// Week 1 is the week containing the first Thursday of the year; the
    /// tail days of December can therefore fall into week 1 of the next
    /// year and the first days of January into the last week of the
    /// previous one.
    pub fn iso_week(&self) -> u32 {
        self.iso_year_week().1
    }

    /// ISO week-numbering year together with the week number
    pub fn iso_year_week(&self) -> (i32, u32) {
        let year = self.year();
        let doy = self.day_of_year() as i32;
        let dow = self.weekday() as i32;

        // Day-of-year of the Thursday in this date's week
        let thursday_doy = doy + (4 - dow);

        if thursday_doy < 1 {
            // Belongs to the last week of the previous year
            let prev_days = if is_leap_year(year - 1) { 366 } else { 365 };
            let week = (thursday_doy + prev_days + 6) / 7;
            (year - 1, week as u32)
        } else {
            let this_days = if is_leap_year(year) { 366 } else { 365 };
            if thursday_doy > this_days {
                (year + 1, 1)
            } else {
                (year, ((thursday_doy + 6) / 7) as u32)
            }
        }
    }

    /// Decompose into year, month, day
    pub fn to_ymd(&self) -> (i32, u32, u32) {
        civil_from_days(self.nanos.div_euclid(NANOS_PER_DAY) as i64)
    }

    /// Decompose into all components
    pub fn to_components(&self) -> DateTimeComponents {
        let (year, month, day) = self.to_ymd();
        DateTimeComponents {
            year,
            month,
            day,
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
            nanosecond: self.nanosecond(),
            offset: self.offset,
        }
    }

    // ========== Arithmetic ==========

    /// Shift by an exact number of nanoseconds
    pub fn add_nanos(&self, nanos: i128) -> Self {
        Self {
            nanos: self.nanos + nanos,
            offset: self.offset,
        }
    }

    /// Shift by exact 24-hour days
    pub fn add_days(&self, days: i64) -> Self {
        self.add_nanos((days as i128) * NANOS_PER_DAY)
    }

    /// Shift by calendar months, clamping the day to the target month's
    /// length (Jan 31 + 1 month = Feb 28/29). Time of day is preserved.
    pub fn add_months(&self, months: i32) -> Self {
        let (year, month, day) = self.to_ymd();

        let total = (year as i64) * 12 + (month as i64 - 1) + (months as i64);
        let new_year = total.div_euclid(12) as i32;
        let new_month = (total.rem_euclid(12) + 1) as u32;
        let new_day = day.min(days_in_month(new_year, new_month));

        let time_nanos = self.nanos.rem_euclid(NANOS_PER_DAY);
        let days = days_from_civil(new_year, new_month, new_day);

        Self {
            nanos: (days as i128) * NANOS_PER_DAY + time_nanos,
            offset: self.offset,
        }
    }

    /// Shift by calendar years (Feb 29 clamps to Feb 28 off leap years)
    pub fn add_years(&self, years: i32) -> Self {
        self.add_months(years * 12)
    }

    /// Exact nanoseconds from this point until `other` (negative if earlier)
    pub fn nanos_until(&self, other: &DateTime) -> i128 {
        other.nanos - self.nanos
    }

    /// Check ordering helpers
    pub fn is_before(&self, other: &DateTime) -> bool {
        self.nanos < other.nanos
    }

    pub fn is_after(&self, other: &DateTime) -> bool {
        self.nanos > other.nanos
    }

    // ========== Formatting ==========

    /// Format as an ISO 8601 string
    ///
    /// When an offset is attached the components are rendered as wall-clock
    /// time in that offset; the represented instant is unchanged.
    pub fn to_iso_string(&self) -> String {
        let c = match self.offset {
            Some(off) => {
                let mut shifted = self.add_nanos((off as i128) * NANOS_PER_SECOND);
                shifted.offset = self.offset;
                shifted.to_components()
            }
            None => self.to_components(),
        };
        let frac = if c.nanosecond == 0 {
            String::new()
        } else if c.nanosecond % 1_000_000 == 0 {
            format!(".{:03}", c.nanosecond / 1_000_000)
        } else {
            format!(".{:09}", c.nanosecond)
        };
        match c.offset {
            Some(offset) => {
                let (sign, abs) = if offset < 0 { ('-', -offset) } else { ('+', offset) };
                format!(
                    "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}{}{:02}:{:02}",
                    c.year, c.month, c.day, c.hour, c.minute, c.second, frac,
                    sign, abs / 3600, (abs % 3600) / 60
                )
            }
            None => format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}{}Z",
                c.year, c.month, c.day, c.hour, c.minute, c.second, frac
            ),
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_string())
    }
}

// Instant-based identity: the offset is a rendering annotation only
impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for DateTime {}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

impl std::hash::Hash for DateTime {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.nanos.hash(state);
    }
}

// ============================================================================
// DateTimeComponents
// ============================================================================

/// Decomposed datetime components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub nanosecond: u32,
    pub offset: Option<i32>,
}

// ============================================================================
// DateTimeError
// ============================================================================

/// Errors from datetime construction and parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateTimeError {
    #[error("invalid month: {0} (must be 1-12)")]
    InvalidMonth(u32),
    #[error("invalid day: {day} for {year}-{month:02}")]
    InvalidDay { day: u32, month: u32, year: i32 },
    #[error("invalid hour: {0} (must be 0-23)")]
    InvalidHour(u32),
    #[error("invalid minute: {0} (must be 0-59)")]
    InvalidMinute(u32),
    #[error("invalid second: {0} (must be 0-59)")]
    InvalidSecond(u32),
    #[error("invalid nanosecond: {0}")]
    InvalidNano(u32),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("datetime overflow")]
    Overflow,
}

// ============================================================================
// Calendar utilities (Gregorian proleptic)
// ============================================================================

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in a month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        m if (1..=12).contains(&m) => DAYS_IN_MONTH[(m - 1) as usize],
        _ => 0,
    }
}

/// Civil date to days since the Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year } as i64;
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146097 + doe - UNIX_EPOCH_DAYS
}

/// Days since the Unix epoch to civil date
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u64; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // [0, 399]
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = doy - (153 * mp + 2) / 5 + 1; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 }; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year as i32, m as u32, d as u32)
}

// ============================================================================
// Parsing
// ============================================================================

impl DateTime {
    /// Parse an ISO 8601 datetime string
    ///
    /// Supported forms:
    /// - `2025-06-15`
    /// - `2025-06-15T14:30:00` (or with a space separator)
    /// - `2025-06-15T14:30:00Z`
    /// - `2025-06-15T14:30:00+05:30`
    /// - `2025-06-15T14:30:00.123Z`
    pub fn parse(s: &str) -> Result<Self, DateTimeError> {
        let s = s.trim();

        if let Some(sep) = s.find(['T', ' ']) {
            let (date_part, time_part) = (&s[..sep], &s[sep + 1..]);
            return Self::parse_parts(date_part, time_part);
        }

        // Date only: YYYY-MM-DD
        let (year, month, day) = parse_date(s)?;
        Self::from_ymd(year, month, day)
    }

    fn parse_parts(date_part: &str, time_part: &str) -> Result<Self, DateTimeError> {
        let (year, month, day) = parse_date(date_part)?;
        let (time_str, offset) = split_offset(time_part)?;

        let (hms, nano) = match time_str.find('.') {
            Some(dot) => (
                &time_str[..dot],
                parse_fraction(&time_str[dot + 1..])?,
            ),
            None => (time_str, 0),
        };

        let fields: Vec<&str> = hms.split(':').collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(DateTimeError::Parse("expected HH:MM[:SS]".into()));
        }
        let hour = parse_field(fields[0], "hour")?;
        let minute = parse_field(fields[1], "minute")?;
        let second = if fields.len() == 3 {
            parse_field(fields[2], "second")?
        } else {
            0
        };

        let mut dt = Self::from_ymd_hms_nano(year, month, day, hour, minute, second, nano)?;
        if let Some(off) = offset {
            // Components were wall-clock in the given offset
            dt.nanos -= (off as i128) * NANOS_PER_SECOND;
            dt.offset = Some(off);
        }
        Ok(dt)
    }
}

impl FromStr for DateTime {
    type Err = DateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_date(s: &str) -> Result<(i32, u32, u32), DateTimeError> {
    let parts: Vec<&str> = s.split('-').collect();
    if parts.len() != 3 {
        return Err(DateTimeError::Parse("expected YYYY-MM-DD".into()));
    }
    let year: i32 = parts[0]
        .parse()
        .map_err(|_| DateTimeError::Parse("invalid year".into()))?;
    let month = parse_field(parts[1], "month")?;
    let day = parse_field(parts[2], "day")?;
    Ok((year, month, day))
}

fn parse_field(s: &str, what: &str) -> Result<u32, DateTimeError> {
    s.parse()
        .map_err(|_| DateTimeError::Parse(format!("invalid {what}: {s}")))
}

/// Split a trailing `Z` / `+HH:MM` / `-HH:MM` designator off a time string
fn split_offset(time_part: &str) -> Result<(&str, Option<i32>), DateTimeError> {
    if let Some(stripped) = time_part.strip_suffix('Z') {
        return Ok((stripped, Some(0)));
    }
    if let Some(plus) = time_part.rfind('+') {
        let offset = parse_offset(&time_part[plus + 1..])?;
        return Ok((&time_part[..plus], Some(offset)));
    }
    // A '-' only designates an offset after the HH:MM part
    if let Some(minus) = time_part.rfind('-') {
        if minus >= 5 {
            let offset = parse_offset(&time_part[minus + 1..])?;
            return Ok((&time_part[..minus], Some(-offset)));
        }
    }
    Ok((time_part, None))
}

fn parse_offset(s: &str) -> Result<i32, DateTimeError> {
    let parts: Vec<&str> = s.split(':').collect();
    let hours: i32 = parts[0]
        .parse()
        .map_err(|_| DateTimeError::Parse("invalid offset hours".into()))?;
    let minutes: i32 = if parts.len() > 1 {
        parts[1]
            .parse()
            .map_err(|_| DateTimeError::Parse("invalid offset minutes".into()))?
    } else {
        0
    };
    Ok(hours * 3600 + minutes * 60)
}

fn parse_fraction(s: &str) -> Result<u32, DateTimeError> {
    if s.is_empty() || s.len() > 9 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DateTimeError::Parse("invalid fractional seconds".into()));
    }
    let mut value: u32 = s.parse().unwrap_or(0);
    for _ in s.len()..9 {
        value *= 10;
    }
    Ok(value)
}

// ============================================================================
// Tests
// ============================================================================

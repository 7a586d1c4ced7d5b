//! Calendar-aware duration type
//!
//! A `Duration` keeps two logically distinct parts: calendar-relative
//! components (months and days, whose effect depends on the anchor they are
//! applied to) and an exact nanosecond component. Arithmetic combines the
//! parts independently and never collapses one into the other; `P1M` and
//! `P30D` are different values even when some anchor would make them the
//! same elapsed time.

use crate::datetime::{DateTime, NANOS_PER_DAY, NANOS_PER_HOUR, NANOS_PER_MILLI, NANOS_PER_MINUTE, NANOS_PER_SECOND};
use crate::error::TemporalError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops;
use std::str::FromStr;

// ============================================================================
// TemporalUnit
// ============================================================================

/// Units a duration can be queried in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl fmt::Display for TemporalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
            Self::Millis => "millis",
            Self::Micros => "micros",
            Self::Nanos => "nanos",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Duration
// ============================================================================

/// A span of time with calendar-relative and exact parts
///
/// Equality and hashing are structural over `(months, days, nanos)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Duration {
    /// Calendar months (anchor-dependent: application clamps at month end)
    months: i32,
    /// Calendar days (applied as exact 24-hour steps; kept separate so a
    /// month-and-days decomposition stays distinct from a flat day count)
    days: i64,
    /// Exact sub-day remainder in nanoseconds
    nanos: i128,
}

/// Units supported by [`Duration::get`], largest first
const SUPPORTED_UNITS: [TemporalUnit; 4] = [
    TemporalUnit::Months,
    TemporalUnit::Days,
    TemporalUnit::Seconds,
    TemporalUnit::Nanos,
];

impl Duration {
    pub const ZERO: Duration = Duration { months: 0, days: 0, nanos: 0 };

    // ========== Construction ==========

    /// Create from explicit components
    pub fn new(months: i32, days: i64, nanos: i128) -> Self {
        Self { months, days, nanos }
    }

    pub fn from_nanos(nanos: i128) -> Self {
        Self::new(0, 0, nanos)
    }

    pub fn from_micros(micros: i64) -> Self {
        Self::from_nanos((micros as i128) * 1_000)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self::from_nanos((millis as i128) * NANOS_PER_MILLI)
    }

    pub fn from_secs(secs: i64) -> Self {
        Self::from_nanos((secs as i128) * NANOS_PER_SECOND)
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self::from_nanos((minutes as i128) * NANOS_PER_MINUTE)
    }

    pub fn from_hours(hours: i64) -> Self {
        Self::from_nanos((hours as i128) * NANOS_PER_HOUR)
    }

    pub fn from_days(days: i64) -> Self {
        Self::new(0, days, 0)
    }

    pub fn from_weeks(weeks: i64) -> Self {
        Self::new(0, weeks * 7, 0)
    }

    pub fn from_months(months: i32) -> Self {
        Self::new(months, 0, 0)
    }

    pub fn from_years(years: i32) -> Self {
        Self::new(years * 12, 0, 0)
    }

    // ========== Accessors ==========

    /// Calendar month component
    pub fn months(&self) -> i32 {
        self.months
    }

    /// Calendar day component
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Exact nanosecond component
    pub fn nanos(&self) -> i128 {
        self.nanos
    }

    pub fn is_zero(&self) -> bool {
        self.months == 0 && self.days == 0 && self.nanos == 0
    }

    /// True when every component is non-positive and at least one is
    /// negative. Mixed-sign durations are neither negative nor positive.
    pub fn is_negative(&self) -> bool {
        self.months <= 0 && self.days <= 0 && self.nanos <= 0 && !self.is_zero()
    }

    /// True when the calendar part is empty and the value is pure
    /// nanoseconds, i.e. resolvable without an anchor
    pub fn is_exact(&self) -> bool {
        self.months == 0 && self.days == 0
    }

    // ========== Arithmetic ==========

    /// Componentwise sum; calendar and exact parts never mix
    pub fn add(&self, other: &Duration) -> Duration {
        Duration::new(
            self.months + other.months,
            self.days + other.days,
            self.nanos + other.nanos,
        )
    }

    /// Componentwise difference
    pub fn sub(&self, other: &Duration) -> Duration {
        Duration::new(
            self.months - other.months,
            self.days - other.days,
            self.nanos - other.nanos,
        )
    }

    pub fn negate(&self) -> Duration {
        Duration::new(-self.months, -self.days, -self.nanos)
    }

    pub fn abs(&self) -> Duration {
        Duration::new(self.months.abs(), self.days.abs(), self.nanos.abs())
    }

    // ========== Application to a point in time ==========

    /// Apply this duration forward from `point`
    ///
    /// Calendar months are resolved against the original anchor first (with
    /// end-of-month clamping), then days, then the exact remainder. Adding
    /// and then subtracting the same duration returns the original point
    /// except where the month step clamped (e.g. Jan 31 + P1M - P1M lands on
    /// Jan 28); that asymmetry is inherent to clamped month arithmetic.
    pub fn add_to(&self, point: &DateTime) -> DateTime {
        point
            .add_months(self.months)
            .add_days(self.days)
            .add_nanos(self.nanos)
    }

    /// Apply the negation of this duration from `point`
    pub fn subtract_from(&self, point: &DateTime) -> DateTime {
        point
            .add_months(-self.months)
            .add_days(-self.days)
            .add_nanos(-self.nanos)
    }

    /// Resolve to total milliseconds
    ///
    /// Months have no fixed length, so a non-zero month component needs a
    /// reference anchor; without one this fails with `InvalidReference`.
    /// Day and nanosecond components resolve exactly on their own.
    pub fn to_millis(&self, reference: Option<&DateTime>) -> Result<i64, TemporalError> {
        if self.months != 0 {
            let anchor = reference.ok_or(TemporalError::InvalidReference)?;
            let resolved = self.add_to(anchor);
            Ok((anchor.nanos_until(&resolved) / NANOS_PER_MILLI) as i64)
        } else {
            Ok(((self.days as i128 * NANOS_PER_DAY + self.nanos) / NANOS_PER_MILLI) as i64)
        }
    }

    // ========== Unit access ==========

    /// Magnitude of one structural component
    ///
    /// The supported units are the structural decomposition of the value:
    /// months, days, whole seconds of the exact part and the sub-second
    /// nanosecond remainder. Anything else fails with `UnsupportedUnit`.
    pub fn get(&self, unit: TemporalUnit) -> Result<i64, TemporalError> {
        match unit {
            TemporalUnit::Months => Ok(self.months as i64),
            TemporalUnit::Days => Ok(self.days),
            TemporalUnit::Seconds => Ok((self.nanos / NANOS_PER_SECOND) as i64),
            TemporalUnit::Nanos => Ok((self.nanos % NANOS_PER_SECOND) as i64),
            other => Err(TemporalError::UnsupportedUnit(other)),
        }
    }

    /// Units accepted by [`Duration::get`], largest first
    pub fn units(&self) -> &'static [TemporalUnit] {
        &SUPPORTED_UNITS
    }

    // ========== Comparison ==========

    /// Compare two durations by resolving both from a shared anchor
    pub fn compare_at(&self, other: &Duration, reference: &DateTime) -> Ordering {
        self.add_to(reference)
            .as_nanos()
            .cmp(&other.add_to(reference).as_nanos())
    }

    // ========== Span between two points ==========

    /// Calendar-correct span from `start` to `end`
    ///
    /// Largest-unit-first greedy decomposition: the greatest whole number of
    /// months that does not overshoot, then whole 24-hour days, then the
    /// nanosecond residue. For `start <= end` the result satisfies
    /// `between(start, end).add_to(start) == end` exactly; a reversed pair
    /// yields the negated decomposition of the swapped one.
    pub fn between(start: &DateTime, end: &DateTime) -> Duration {
        if end.as_nanos() < start.as_nanos() {
            return Self::between(end, start).negate();
        }

        // First guess from the civil fields, then correct for clamping
        let (y1, m1, _) = start.to_ymd();
        let (y2, m2, _) = end.to_ymd();
        let mut months = (y2 as i64 - y1 as i64) * 12 + (m2 as i64 - m1 as i64);
        while months > 0 && start.add_months(months as i32).is_after(end) {
            months -= 1;
        }
        while !start.add_months(months as i32 + 1).is_after(end) {
            months += 1;
        }

        let anchored = start.add_months(months as i32);
        let remainder = anchored.nanos_until(end);
        Duration::new(
            months as i32,
            (remainder / NANOS_PER_DAY) as i64,
            remainder % NANOS_PER_DAY,
        )
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::ZERO
    }
}

impl ops::Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::add(&self, &rhs)
    }
}

impl ops::Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration::sub(&self, &rhs)
    }
}

impl ops::Neg for Duration {
    type Output = Duration;
    fn neg(self) -> Duration {
        self.negate()
    }
}

/// Ordering without an anchor is only defined when the calendar parts
/// coincide; then it reduces to exact nanosecond order. Use
/// [`Duration::compare_at`] for the general case.
impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.months == other.months && self.days == other.days {
            Some(self.nanos.cmp(&other.nanos))
        } else {
            None
        }
    }
}

// ============================================================================
// ISO 8601 text form
// ============================================================================

impl fmt::Display for Duration {
    /// Render as an ISO 8601 duration (`P1Y2M3DT4H5M6.007S`, `PT0S` when
    /// zero). A uniformly negative value gets a single leading `-`; a
    /// mixed-sign value carries the sign on each component instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }

        let body = if self.is_negative() {
            f.write_str("-")?;
            self.abs()
        } else {
            *self
        };

        f.write_str("P")?;
        let years = body.months / 12;
        let months = body.months % 12;
        if years != 0 {
            write!(f, "{years}Y")?;
        }
        if months != 0 {
            write!(f, "{months}M")?;
        }
        if body.days != 0 {
            write!(f, "{}D", body.days)?;
        }

        if body.nanos != 0 {
            f.write_str("T")?;
            let hours = body.nanos / NANOS_PER_HOUR;
            let minutes = (body.nanos % NANOS_PER_HOUR) / NANOS_PER_MINUTE;
            let seconds = (body.nanos % NANOS_PER_MINUTE) / NANOS_PER_SECOND;
            let frac = body.nanos % NANOS_PER_SECOND;
            if hours != 0 {
                write!(f, "{hours}H")?;
            }
            if minutes != 0 {
                write!(f, "{minutes}M")?;
            }
            if frac != 0 {
                // Negative fractions only occur in mixed-sign values
                let frac_str = format!("{:09}", frac.unsigned_abs());
                let frac_str = frac_str.trim_end_matches('0');
                let sign = if frac < 0 && seconds == 0 { "-" } else { "" };
                write!(f, "{sign}{seconds}.{frac_str}S")?;
            } else if seconds != 0 {
                write!(f, "{seconds}S")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = TemporalError;

    /// Parse an ISO 8601 duration, including weeks (`P2W`) and fractional
    /// seconds. A leading `-` negates the whole value; individual components
    /// may also carry their own sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negate_all, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let rest = rest
            .strip_prefix(['P', 'p'])
            .ok_or_else(|| TemporalError::Parse(format!("duration must start with 'P': {s}")))?;
        if rest.is_empty() {
            return Err(TemporalError::Parse("empty duration".into()));
        }

        let mut months: i32 = 0;
        let mut days: i64 = 0;
        let mut nanos: i128 = 0;
        let mut in_time = false;
        let mut chars = rest.char_indices().peekable();

        while let Some(&(idx, c)) = chars.peek() {
            if c == 'T' || c == 't' {
                if in_time {
                    return Err(TemporalError::Parse("duplicate 'T' designator".into()));
                }
                in_time = true;
                chars.next();
                continue;
            }

            // Signed number, optionally fractional (seconds only)
            let start = idx;
            let mut end = idx;
            let mut has_dot = false;
            while let Some(&(j, d)) = chars.peek() {
                if d.is_ascii_digit() || d == '-' || d == '+' || d == '.' {
                    has_dot |= d == '.';
                    end = j + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let number = &rest[start..end];
            let (_, unit) = chars
                .next()
                .ok_or_else(|| TemporalError::Parse(format!("dangling number in duration: {s}")))?;

            let int_value = |n: &str| -> Result<i64, TemporalError> {
                n.parse()
                    .map_err(|_| TemporalError::Parse(format!("invalid number '{n}' in duration")))
            };

            match (unit.to_ascii_uppercase(), in_time) {
                ('Y', false) => months += int_value(number)? as i32 * 12,
                ('M', false) => months += int_value(number)? as i32,
                ('W', false) => days += int_value(number)? * 7,
                ('D', false) => days += int_value(number)?,
                ('H', true) => nanos += int_value(number)? as i128 * NANOS_PER_HOUR,
                ('M', true) => nanos += int_value(number)? as i128 * NANOS_PER_MINUTE,
                ('S', true) => {
                    if has_dot {
                        nanos += parse_seconds_fraction(number)?;
                    } else {
                        nanos += int_value(number)? as i128 * NANOS_PER_SECOND;
                    }
                }
                (u, _) => {
                    return Err(TemporalError::Parse(format!(
                        "unexpected unit '{u}' in duration: {s}"
                    )))
                }
            }
        }

        let parsed = Duration::new(months, days, nanos);
        Ok(if negate_all { parsed.negate() } else { parsed })
    }
}

fn parse_seconds_fraction(number: &str) -> Result<i128, TemporalError> {
    let bad = || TemporalError::Parse(format!("invalid seconds '{number}' in duration"));
    let (negative, digits) = match number.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, number),
    };
    let (whole, frac) = digits.split_once('.').ok_or_else(bad)?;
    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| bad())?
    };
    if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let mut frac_nanos: i128 = frac.parse().map_err(|_| bad())?;
    for _ in frac.len()..9 {
        frac_nanos *= 10;
    }
    let total = whole * NANOS_PER_SECOND + frac_nanos;
    Ok(if negative { -total } else { total })
}

// ============================================================================
// Tests
// ============================================================================

//! Canonical text form for intervals
//!
//! `R<n>/<lead>/<trail>` in the style of ISO 8601 repeating intervals:
//! `R` alone for unbounded repetition, `R<n>` for a finite count, and the
//! whole prefix omitted when the count is exactly 1 and omission is in
//! effect (the default). This mirrors the source notation rather than the
//! letter of ISO 8601 — in particular the count is the number of
//! *additional* applications, and `R0` is therefore a valid single
//! occurrence.
//!
//! The serde representation of an interval is this string, byte for byte.

use crate::interval::TemporalInterval;
use crate::repetition::Repetition;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tempus_core::{DateTime, Duration, TemporalError};

/// Assemble the canonical string from already-rendered segments
///
/// Pure formatting: no validation beyond what the inputs already carry.
pub fn render(
    repetition: Repetition,
    lead: &str,
    trail: Option<&str>,
    omit_unit_repetition: bool,
) -> String {
    let prefix = match repetition {
        Repetition::Infinite => "R/".to_string(),
        Repetition::Count(1) if omit_unit_repetition => String::new(),
        Repetition::Count(n) => format!("R{n}/"),
    };
    match trail {
        Some(trail) => format!("{prefix}{lead}/{trail}"),
        None => format!("{prefix}{lead}"),
    }
}

impl TemporalInterval {
    /// Render the canonical form; `omit_unit_repetition` controls whether a
    /// repetition of exactly 1 drops its `R1/` prefix
    pub fn format(&self, omit_unit_repetition: bool) -> String {
        let repetition = self.repetition();
        match self {
            Self::StartDuration { start, duration, .. } => render(
                repetition,
                &start.to_iso_string(),
                Some(&duration.to_string()),
                omit_unit_repetition,
            ),
            Self::DurationOnly { duration, .. } => {
                render(repetition, &duration.to_string(), None, omit_unit_repetition)
            }
            Self::DurationEnd { duration, end, .. } => render(
                repetition,
                &duration.to_string(),
                Some(&end.to_iso_string()),
                omit_unit_repetition,
            ),
            Self::StartEnd { start, end } => render(
                repetition,
                &start.to_iso_string(),
                Some(&end.to_iso_string()),
                omit_unit_repetition,
            ),
        }
    }
}

impl fmt::Display for TemporalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(true))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// One `/`-separated segment: a duration starts with `P` (optionally
/// signed), anything else must be a point in time
enum Segment {
    Point(DateTime),
    Span(Duration),
}

fn parse_segment(s: &str) -> Result<Segment, TemporalError> {
    let body = s.strip_prefix(['-', '+']).unwrap_or(s);
    if body.starts_with(['P', 'p']) {
        Ok(Segment::Span(s.parse()?))
    } else {
        Ok(Segment::Point(DateTime::parse(s)?))
    }
}

impl FromStr for TemporalInterval {
    type Err = TemporalError;

    /// Parse any of the four canonical shapes, with or without an
    /// `R`/`R<n>` prefix
    ///
    /// A two-point form with an explicit repetition other than 1 cannot stay
    /// two-point (the shape stores no count) and re-anchors into
    /// `StartDuration` with the derived span.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut explicit: Option<Repetition> = None;
        let mut rest = s;

        if let Some(tail) = s.strip_prefix('R') {
            let slash = tail
                .find('/')
                .ok_or_else(|| TemporalError::Parse(format!("bare repetition prefix: {s}")))?;
            let digits = &tail[..slash];
            explicit = Some(if digits.is_empty() {
                Repetition::Infinite
            } else {
                let count: i64 = digits
                    .parse()
                    .map_err(|_| TemporalError::Parse(format!("invalid repetition: {digits}")))?;
                Repetition::from_count(count)?
            });
            rest = &tail[slash + 1..];
        }
        let repetition = explicit.unwrap_or(Repetition::Count(1));

        let segments: Vec<&str> = rest.split('/').collect();
        match segments.as_slice() {
            [single] => match parse_segment(single)? {
                Segment::Span(duration) => Ok(Self::DurationOnly { duration, repetition }),
                Segment::Point(_) => Err(TemporalError::Parse(
                    "a single point in time is not an interval".into(),
                )),
            },
            [lead, trail] => match (parse_segment(lead)?, parse_segment(trail)?) {
                (Segment::Point(start), Segment::Span(duration)) => {
                    Ok(Self::StartDuration { start, duration, repetition })
                }
                (Segment::Span(duration), Segment::Point(end)) => {
                    Ok(Self::DurationEnd { duration, end, repetition })
                }
                (Segment::Point(start), Segment::Point(end)) => match repetition {
                    Repetition::Count(1) => Ok(Self::StartEnd { start, end }),
                    other => Ok(Self::StartDuration {
                        start,
                        duration: Duration::between(&start, &end),
                        repetition: other,
                    }),
                },
                (Segment::Span(_), Segment::Span(_)) => Err(TemporalError::Parse(
                    "an interval needs at least one point in time".into(),
                )),
            },
            _ => Err(TemporalError::Parse(format!(
                "expected 1 or 2 interval segments: {s}"
            ))),
        }
    }
}

// ============================================================================
// Serde: the canonical string is the wire form
// ============================================================================

impl Serialize for TemporalInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TemporalInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! The four interval shapes and their conversions
//!
//! A `TemporalInterval` is a span of time anchored at a point, optionally
//! repeated. Exactly four minimal-state shapes exist and every one can be
//! re-expressed as any other; the set is closed, so the type is a sum type
//! with conversions as plain methods rather than trait dispatch.
//!
//! Repetition is sequential: each application of the base duration feeds the
//! next application's anchor. For calendar durations this is not the same as
//! scaling — adding one month twice from Jan 31 passes through Feb 28 and
//! lands on Mar 28, while adding two months at once lands on Mar 31.

use crate::repetition::Repetition;
use tempus_core::{DateTime, Duration, TemporalError};

/// A possibly-repeated span of time, in one of four shapes
///
/// | Shape | Stored state |
/// |---|---|
/// | `StartDuration` | anchor, span, repetition |
/// | `DurationOnly` | span, repetition (positionally relative) |
/// | `DurationEnd` | span, terminal point, repetition |
/// | `StartEnd` | anchor, terminal point |
///
/// Values are immutable; every `with_*` and `to_*` method returns a new
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalInterval {
    StartDuration {
        start: DateTime,
        duration: Duration,
        repetition: Repetition,
    },
    DurationOnly {
        duration: Duration,
        repetition: Repetition,
    },
    DurationEnd {
        duration: Duration,
        end: DateTime,
        repetition: Repetition,
    },
    StartEnd {
        start: DateTime,
        end: DateTime,
    },
}

impl TemporalInterval {
    // ========== Construction ==========

    pub fn from_start_duration(start: DateTime, duration: Duration, repetition: Repetition) -> Self {
        Self::StartDuration { start, duration, repetition }
    }

    pub fn from_duration(duration: Duration, repetition: Repetition) -> Self {
        Self::DurationOnly { duration, repetition }
    }

    pub fn from_duration_end(duration: Duration, end: DateTime, repetition: Repetition) -> Self {
        Self::DurationEnd { duration, end, repetition }
    }

    pub fn from_start_end(start: DateTime, end: DateTime) -> Self {
        Self::StartEnd { start, end }
    }

    // ========== Repetition-insensitive accessors ==========

    /// The repetition count. `StartEnd` has no explicit count and reports
    /// the implicit `Count(1)` of the source notation.
    pub fn repetition(&self) -> Repetition {
        match self {
            Self::StartDuration { repetition, .. }
            | Self::DurationOnly { repetition, .. }
            | Self::DurationEnd { repetition, .. } => *repetition,
            Self::StartEnd { .. } => Repetition::Count(1),
        }
    }

    /// The base span, independent of repetition
    pub fn duration(&self) -> Duration {
        match self {
            Self::StartDuration { duration, .. }
            | Self::DurationOnly { duration, .. }
            | Self::DurationEnd { duration, .. } => *duration,
            Self::StartEnd { start, end } => Duration::between(start, end),
        }
    }

    /// The anchor point of the base span
    ///
    /// For `DurationEnd` this is one application of the span back from the
    /// terminal. `DurationOnly` has no position and fails with
    /// `InvalidReference`; resolve it first with [`Self::anchor_at`].
    pub fn start(&self) -> Result<DateTime, TemporalError> {
        match self {
            Self::StartDuration { start, .. } | Self::StartEnd { start, .. } => Ok(*start),
            Self::DurationEnd { duration, end, .. } => Ok(duration.subtract_from(end)),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    /// The end of the base span (one application of the duration)
    pub fn end(&self) -> Result<DateTime, TemporalError> {
        match self {
            Self::StartDuration { start, duration, .. } => Ok(duration.add_to(start)),
            Self::DurationEnd { end, .. } | Self::StartEnd { end, .. } => Ok(*end),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    // ========== Repetition-sensitive accessors ==========

    /// The anchor with repetition accounted
    ///
    /// Start-anchored shapes keep their anchor fixed; `DurationEnd` extends
    /// backwards, so its start moves one span further back per repeat.
    /// Fails with `UnboundedRepetition` when the repetition is infinite and
    /// the shape is end-anchored.
    pub fn start_with_repetition(&self) -> Result<DateTime, TemporalError> {
        match self {
            Self::StartDuration { start, .. } | Self::StartEnd { start, .. } => Ok(*start),
            Self::DurationEnd { duration, end, repetition } => {
                let times = repetition
                    .applications()
                    .ok_or(TemporalError::UnboundedRepetition)?;
                Ok(apply_backward(duration, end, times))
            }
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    /// The terminal point with repetition accounted
    ///
    /// Sequential composition: for `Count(r)` the base span is applied
    /// `r + 1` times, each application anchored at the previous result.
    /// The two-point shape stores both endpoints outright, so its terminal
    /// is already the repetition-aware end (the implicit count of 1 is a
    /// notational default, not a pending application). Fails with
    /// `UnboundedRepetition` when infinite.
    pub fn end_with_repetition(&self) -> Result<DateTime, TemporalError> {
        match self {
            Self::StartDuration { start, duration, repetition } => {
                let times = repetition
                    .applications()
                    .ok_or(TemporalError::UnboundedRepetition)?;
                Ok(apply_forward(duration, start, times))
            }
            Self::DurationEnd { end, .. } | Self::StartEnd { end, .. } => Ok(*end),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    /// The calendar-correct span from the repetition-aware start to the
    /// repetition-aware end
    ///
    /// This is **not** `duration × (r + 1)`: the sequential path through
    /// variable-length months gives a different (calendar-true) total.
    /// For a `DurationOnly` shape this is only defined when the span has no
    /// month component (days and nanoseconds scale linearly); otherwise the
    /// missing anchor surfaces as `InvalidReference`.
    pub fn duration_with_repetition(&self) -> Result<Duration, TemporalError> {
        match self {
            Self::StartDuration { start, .. } | Self::StartEnd { start, .. } => {
                Ok(Duration::between(start, &self.end_with_repetition()?))
            }
            Self::DurationEnd { end, .. } => {
                Ok(Duration::between(&self.start_with_repetition()?, end))
            }
            Self::DurationOnly { duration, repetition } => {
                let times = repetition
                    .applications()
                    .ok_or(TemporalError::UnboundedRepetition)?;
                if duration.months() != 0 {
                    return Err(TemporalError::InvalidReference);
                }
                Ok(Duration::new(
                    0,
                    duration.days() * times as i64,
                    duration.nanos() * times as i128,
                ))
            }
        }
    }

    // ========== Builders ==========

    /// Re-anchor a relative `DurationOnly` at a concrete start; any other
    /// shape is returned unchanged
    pub fn anchor_at(&self, start: DateTime) -> Self {
        match self {
            Self::DurationOnly { duration, repetition } => Self::StartDuration {
                start,
                duration: *duration,
                repetition: *repetition,
            },
            other => *other,
        }
    }

    /// Re-anchor a relative `DurationOnly` at the current instant (the one
    /// clock read in this crate)
    pub fn anchor_now(&self) -> Self {
        self.anchor_at(DateTime::now())
    }

    /// New value with the given start; shapes that cannot store a start
    /// re-anchor into `StartDuration`
    pub fn with_start(&self, start: DateTime) -> Self {
        match self {
            Self::StartDuration { duration, repetition, .. }
            | Self::DurationOnly { duration, repetition }
            | Self::DurationEnd { duration, repetition, .. } => Self::StartDuration {
                start,
                duration: *duration,
                repetition: *repetition,
            },
            Self::StartEnd { end, .. } => Self::StartEnd { start, end: *end },
        }
    }

    /// New value with the given end; shapes that cannot store an end
    /// re-anchor into `DurationEnd`
    pub fn with_end(&self, end: DateTime) -> Self {
        match self {
            Self::StartDuration { duration, repetition, .. }
            | Self::DurationOnly { duration, repetition }
            | Self::DurationEnd { duration, repetition, .. } => Self::DurationEnd {
                duration: *duration,
                end,
                repetition: *repetition,
            },
            Self::StartEnd { start, .. } => Self::StartEnd { start: *start, end },
        }
    }

    /// New value with the given base duration; `StartEnd` re-anchors into
    /// `StartDuration` since its span is derived, not stored
    pub fn with_duration(&self, duration: Duration) -> Self {
        match self {
            Self::StartDuration { start, repetition, .. } => Self::StartDuration {
                start: *start,
                duration,
                repetition: *repetition,
            },
            Self::DurationOnly { repetition, .. } => Self::DurationOnly {
                duration,
                repetition: *repetition,
            },
            Self::DurationEnd { end, repetition, .. } => Self::DurationEnd {
                duration,
                end: *end,
                repetition: *repetition,
            },
            Self::StartEnd { start, .. } => Self::StartDuration {
                start: *start,
                duration,
                repetition: Repetition::Count(1),
            },
        }
    }

    /// New value with the given repetition; `StartEnd` re-anchors into
    /// `StartDuration` since it cannot store one
    pub fn with_repetition(&self, repetition: Repetition) -> Self {
        match self {
            Self::StartDuration { start, duration, .. } => Self::StartDuration {
                start: *start,
                duration: *duration,
                repetition,
            },
            Self::DurationOnly { duration, .. } => Self::DurationOnly {
                duration: *duration,
                repetition,
            },
            Self::DurationEnd { duration, end, .. } => Self::DurationEnd {
                duration: *duration,
                end: *end,
                repetition,
            },
            Self::StartEnd { start, end } => Self::StartDuration {
                start: *start,
                duration: Duration::between(start, end),
                repetition,
            },
        }
    }

    // ========== Conversions ==========

    /// Express as `StartDuration`
    ///
    /// Identity on `StartDuration` (the contract's allowed no-op). From
    /// `DurationEnd` the anchor is the repetition-aware start, so that
    /// converting back reproduces the stored terminal; an infinite
    /// repetition therefore fails with `UnboundedRepetition`.
    pub fn to_start_duration(&self) -> Result<Self, TemporalError> {
        match self {
            Self::StartDuration { .. } => Ok(*self),
            Self::DurationEnd { duration, repetition, .. } => Ok(Self::StartDuration {
                start: self.start_with_repetition()?,
                duration: *duration,
                repetition: *repetition,
            }),
            Self::StartEnd { start, end } => Ok(Self::StartDuration {
                start: *start,
                duration: Duration::between(start, end),
                repetition: Repetition::Count(1),
            }),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    /// Express as the relative `DurationOnly` shape, dropping anchoring
    pub fn to_duration_only(&self) -> Self {
        Self::DurationOnly {
            duration: self.duration(),
            repetition: self.repetition(),
        }
    }

    /// Express as `DurationEnd`
    ///
    /// The stored terminal is the repetition-aware end, so this fails with
    /// `UnboundedRepetition` when the repetition is infinite.
    pub fn to_duration_end(&self) -> Result<Self, TemporalError> {
        match self {
            Self::DurationEnd { .. } => Ok(*self),
            Self::StartDuration { duration, repetition, .. } => Ok(Self::DurationEnd {
                duration: *duration,
                end: self.end_with_repetition()?,
                repetition: *repetition,
            }),
            // The stored terminal carries over unchanged so that converting
            // back yields the same two points
            Self::StartEnd { start, end } => Ok(Self::DurationEnd {
                duration: Duration::between(start, end),
                end: *end,
                repetition: Repetition::Count(1),
            }),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }

    /// Express as the two-point `StartEnd` shape
    ///
    /// The end is one application of the base duration — repetition is
    /// ignored, since the two-point shape cannot store it. Works for
    /// infinite repetitions for exactly that reason.
    pub fn to_start_end(&self) -> Result<Self, TemporalError> {
        match self {
            Self::StartEnd { .. } => Ok(*self),
            Self::StartDuration { .. } | Self::DurationEnd { .. } => Ok(Self::StartEnd {
                start: self.start()?,
                end: self.end()?,
            }),
            Self::DurationOnly { .. } => Err(TemporalError::InvalidReference),
        }
    }
}

/// Sequentially apply `span` forward `times` times from `anchor`
fn apply_forward(span: &Duration, anchor: &DateTime, times: u32) -> DateTime {
    let mut point = *anchor;
    for _ in 0..times {
        point = span.add_to(&point);
    }
    point
}

/// Sequentially apply `span` backward `times` times from `anchor`
fn apply_backward(span: &Duration, anchor: &DateTime, times: u32) -> DateTime {
    let mut point = *anchor;
    for _ in 0..times {
        point = span.subtract_from(&point);
    }
    point
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> DateTime {
        DateTime::from_ymd(y, m, d).unwrap()
    }

    fn base() -> TemporalInterval {
        TemporalInterval::from_start_duration(
            dt(2025, 1, 15),
            Duration::from_months(1),
            Repetition::Count(2),
        )
    }

    #[test]
    fn plain_accessors_ignore_repetition() {
        let interval = base();
        assert_eq!(interval.start().unwrap(), dt(2025, 1, 15));
        assert_eq!(interval.end().unwrap(), dt(2025, 2, 15));
        assert_eq!(interval.duration(), Duration::from_months(1));
        assert_eq!(interval.repetition(), Repetition::Count(2));
    }

    #[test]
    fn repetition_zero_identity() {
        let interval = base().with_repetition(Repetition::ONCE);
        assert_eq!(
            interval.start_with_repetition().unwrap(),
            interval.start().unwrap()
        );
        assert_eq!(
            interval.end_with_repetition().unwrap(),
            interval.end().unwrap()
        );
        assert_eq!(
            interval.duration_with_repetition().unwrap(),
            interval.duration()
        );
    }

    #[test]
    fn sequential_repetition_is_not_scaling() {
        // 1 month from Jan 31, one extra repeat: Jan 31 -> Feb 28 -> Mar 28.
        // Scaling would give Jan 31 + 2 months = Mar 31.
        let interval = TemporalInterval::from_start_duration(
            dt(2025, 1, 31),
            Duration::from_months(1),
            Repetition::Count(1),
        );
        assert_eq!(interval.end_with_repetition().unwrap(), dt(2025, 3, 28));
        assert_ne!(
            interval.end_with_repetition().unwrap(),
            Duration::from_months(2).add_to(&dt(2025, 1, 31))
        );

        // The with-repetition duration reflects the sequential path
        let total = interval.duration_with_repetition().unwrap();
        assert_eq!(total, Duration::new(1, 28, 0));
        assert_eq!(total.add_to(&dt(2025, 1, 31)), dt(2025, 3, 28));
    }

    #[test]
    fn infinite_repetition_fails_sensitive_accessors() {
        let interval = base().with_repetition(Repetition::Infinite);
        assert!(matches!(
            interval.end_with_repetition(),
            Err(TemporalError::UnboundedRepetition)
        ));
        assert!(matches!(
            interval.duration_with_repetition(),
            Err(TemporalError::UnboundedRepetition)
        ));
        assert!(matches!(
            interval.to_duration_end(),
            Err(TemporalError::UnboundedRepetition)
        ));

        // Insensitive accessors keep working
        assert_eq!(interval.start().unwrap(), dt(2025, 1, 15));
        assert_eq!(interval.end().unwrap(), dt(2025, 2, 15));
        assert_eq!(interval.duration(), Duration::from_months(1));
        assert_eq!(interval.repetition(), Repetition::Infinite);
        assert!(interval.to_start_end().is_ok());
    }

    #[test]
    fn duration_end_extends_backward() {
        let interval = TemporalInterval::from_duration_end(
            Duration::from_days(10),
            dt(2025, 3, 31),
            Repetition::Count(2),
        );
        assert_eq!(interval.end().unwrap(), dt(2025, 3, 31));
        assert_eq!(interval.start().unwrap(), dt(2025, 3, 21));
        assert_eq!(interval.start_with_repetition().unwrap(), dt(2025, 3, 1));
        assert_eq!(
            interval.duration_with_repetition().unwrap(),
            Duration::new(0, 30, 0)
        );
    }

    #[test]
    fn duration_only_is_positionless() {
        let interval =
            TemporalInterval::from_duration(Duration::from_hours(2), Repetition::Count(3));
        assert!(matches!(interval.start(), Err(TemporalError::InvalidReference)));
        assert!(matches!(interval.end(), Err(TemporalError::InvalidReference)));
        assert!(matches!(
            interval.to_start_duration(),
            Err(TemporalError::InvalidReference)
        ));

        // Exact spans still scale without an anchor
        assert_eq!(
            interval.duration_with_repetition().unwrap(),
            Duration::from_hours(8)
        );

        // Calendar spans do not
        let monthly = TemporalInterval::from_duration(Duration::from_months(1), Repetition::ONCE);
        assert!(matches!(
            monthly.duration_with_repetition(),
            Err(TemporalError::InvalidReference)
        ));
    }

    #[test]
    fn anchor_at_resolves_relative_shape() {
        let relative =
            TemporalInterval::from_duration(Duration::from_days(7), Repetition::Count(1));
        let anchored = relative.anchor_at(dt(2025, 6, 1));
        assert_eq!(anchored.start().unwrap(), dt(2025, 6, 1));
        assert_eq!(anchored.end().unwrap(), dt(2025, 6, 8));
        assert_eq!(anchored.repetition(), Repetition::Count(1));
    }

    #[test]
    fn conversion_start_duration_to_start_end_ignores_repetition() {
        let two_point = base().to_start_end().unwrap();
        assert_eq!(two_point.start().unwrap(), dt(2025, 1, 15));
        assert_eq!(two_point.end().unwrap(), dt(2025, 2, 15));
        assert_eq!(two_point.repetition(), Repetition::Count(1));
    }

    #[test]
    fn conversion_to_start_duration_is_identity_on_itself() {
        let interval = base();
        assert_eq!(interval.to_start_duration().unwrap(), interval);
    }

    #[test]
    fn round_trip_start_duration_via_duration_end() {
        let original = base();
        let there = original.to_duration_end().unwrap();
        let back = there.to_start_duration().unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn round_trip_duration_end_via_start_duration() {
        let original = TemporalInterval::from_duration_end(
            Duration::from_days(10),
            dt(2025, 3, 31),
            Repetition::Count(2),
        );
        let back = original
            .to_start_duration()
            .unwrap()
            .to_duration_end()
            .unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn round_trip_start_end_via_start_duration() {
        let original = TemporalInterval::from_start_end(dt(2025, 1, 15), dt(2025, 3, 18));
        let back = original.to_start_duration().unwrap().to_start_end().unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn round_trip_preserves_observables_across_all_anchored_pairs() {
        let original = TemporalInterval::from_start_duration(
            dt(2025, 4, 10),
            Duration::new(1, 2, 0),
            Repetition::Count(1),
        );
        for converted in [
            original.to_duration_end().unwrap().to_start_duration().unwrap(),
            original.to_start_end().unwrap().to_start_duration().unwrap(),
        ] {
            assert_eq!(converted.start().unwrap(), original.start().unwrap());
            assert_eq!(converted.duration(), original.duration());
        }
        // The two-point shape reports the implicit count of one
        assert_eq!(
            original.to_start_end().unwrap().repetition(),
            Repetition::Count(1)
        );
    }

    #[test]
    fn to_duration_only_keeps_span_and_repetition() {
        let relative = base().to_duration_only();
        assert_eq!(relative.duration(), Duration::from_months(1));
        assert_eq!(relative.repetition(), Repetition::Count(2));
        assert!(relative.start().is_err());
    }

    #[test]
    fn two_point_endpoints_are_their_own_repetition_aware_bounds() {
        // Both endpoints are stored outright; the implicit Count(1) is a
        // notational default, so nothing is left to apply
        let interval = TemporalInterval::from_start_end(dt(2025, 1, 1), dt(2025, 2, 1));
        assert_eq!(interval.repetition(), Repetition::Count(1));
        assert_eq!(interval.start_with_repetition().unwrap(), dt(2025, 1, 1));
        assert_eq!(interval.end_with_repetition().unwrap(), dt(2025, 2, 1));
        assert_eq!(
            interval.duration_with_repetition().unwrap(),
            Duration::from_months(1)
        );
    }

    #[test]
    fn round_trip_start_end_via_duration_end() {
        let original = TemporalInterval::from_start_end(dt(2025, 1, 1), dt(2025, 2, 1));
        let there = original.to_duration_end().unwrap();
        assert_eq!(there.end().unwrap(), dt(2025, 2, 1));
        assert_eq!(there.to_start_end().unwrap(), original);
    }

    #[test]
    fn round_trip_duration_end_via_start_end() {
        let original = TemporalInterval::from_duration_end(
            Duration::from_days(10),
            dt(2025, 3, 31),
            Repetition::Count(2),
        );
        let back = original.to_start_end().unwrap().to_duration_end().unwrap();
        assert_eq!(back.start().unwrap(), original.start().unwrap());
        assert_eq!(back.end().unwrap(), original.end().unwrap());
        assert_eq!(back.duration(), original.duration());
        // The two-point leg cannot carry a count, so it comes back as the
        // implicit one
        assert_eq!(back.repetition(), Repetition::Count(1));
    }

    #[test]
    fn with_builders_return_new_values() {
        let interval = base();
        let moved = interval.with_start(dt(2025, 6, 1));
        assert_eq!(moved.start().unwrap(), dt(2025, 6, 1));
        assert_eq!(interval.start().unwrap(), dt(2025, 1, 15));

        let ended = interval.with_end(dt(2025, 12, 31));
        assert_eq!(ended.end().unwrap(), dt(2025, 12, 31));
        assert_eq!(ended.duration(), Duration::from_months(1));

        let longer = interval.with_duration(Duration::from_months(3));
        assert_eq!(longer.duration(), Duration::from_months(3));
        assert_eq!(longer.start().unwrap(), dt(2025, 1, 15));
    }
}

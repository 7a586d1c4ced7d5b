//! Wall-clock stopwatch bookkeeping
//!
//! An immutable value: every operation takes the clock reading as an
//! argument and returns a new stopwatch, so the logic stays deterministic
//! and testable. The `_now` variants perform the single clock read.
//!
//! The JSON shape keeps the legacy field names (`startTime`, `endTime`,
//! `pause`, `pauseStart`, `isRunning`) other tooling expects.

use serde::{Deserialize, Serialize};
use tempus_core::{DateTime, Duration};

/// Elapsed-time bookkeeping with pause support
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stopwatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    start_time: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    end_time: Option<DateTime>,
    /// Accumulated paused time, excluded from the elapsed span
    #[serde(default)]
    pause: Duration,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pause_start: Option<DateTime>,
    is_running: bool,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start_time: None,
            end_time: None,
            pause: Duration::ZERO,
            pause_start: None,
            is_running: false,
        }
    }

    // ========== Accessors ==========

    pub fn start_time(&self) -> Option<DateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime> {
        self.end_time
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    /// Total paused time so far, not counting an open pause
    pub fn accumulated_pause(&self) -> Duration {
        self.pause
    }

    // ========== Transitions ==========

    /// Begin a fresh measurement at `now`
    pub fn start_at(&self, now: DateTime) -> Self {
        Self {
            start_time: Some(now),
            end_time: None,
            pause: Duration::ZERO,
            pause_start: None,
            is_running: true,
        }
    }

    /// Open a pause; a no-op unless running and not already paused
    pub fn pause_at(&self, now: DateTime) -> Self {
        if !self.is_running || self.pause_start.is_some() {
            return *self;
        }
        Self {
            pause_start: Some(now),
            ..*self
        }
    }

    /// Close an open pause, folding it into the accumulated pause
    pub fn resume_at(&self, now: DateTime) -> Self {
        match self.pause_start {
            Some(opened) if self.is_running => Self {
                pause: self.pause.add(&Duration::from_nanos(opened.nanos_until(&now))),
                pause_start: None,
                ..*self
            },
            _ => *self,
        }
    }

    /// End the measurement at `now`, closing any open pause first
    pub fn stop_at(&self, now: DateTime) -> Self {
        let closed = self.resume_at(now);
        Self {
            end_time: Some(now),
            is_running: false,
            ..closed
        }
    }

    /// Measured time at `now`: start to end (or `now` while running) minus
    /// all paused time, including an open pause. Zero before the first
    /// start.
    pub fn elapsed_at(&self, now: DateTime) -> Duration {
        let Some(start) = self.start_time else {
            return Duration::ZERO;
        };
        let cutoff = self.end_time.unwrap_or(now);
        let open_pause = match self.pause_start {
            Some(opened) => opened.nanos_until(&cutoff),
            None => 0,
        };
        Duration::from_nanos(start.nanos_until(&cutoff) - self.pause.nanos() - open_pause)
    }

    // ========== Clock-reading conveniences ==========

    pub fn start_now(&self) -> Self {
        self.start_at(DateTime::now())
    }

    pub fn pause_now(&self) -> Self {
        self.pause_at(DateTime::now())
    }

    pub fn resume_now(&self) -> Self {
        self.resume_at(DateTime::now())
    }

    pub fn stop_now(&self) -> Self {
        self.stop_at(DateTime::now())
    }

    pub fn elapsed_now(&self) -> Duration {
        self.elapsed_at(DateTime::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minute: u32) -> DateTime {
        DateTime::from_ymd_hms(2025, 6, 15, 9, minute, 0).unwrap()
    }

    #[test]
    fn plain_run() {
        let sw = Stopwatch::new().start_at(at(0)).stop_at(at(30));
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed_at(at(59)), Duration::from_minutes(30));
    }

    #[test]
    fn pause_is_excluded() {
        let sw = Stopwatch::new()
            .start_at(at(0))
            .pause_at(at(10))
            .resume_at(at(15))
            .stop_at(at(30));
        assert_eq!(sw.accumulated_pause(), Duration::from_minutes(5));
        assert_eq!(sw.elapsed_at(at(59)), Duration::from_minutes(25));
    }

    #[test]
    fn open_pause_counts_against_elapsed() {
        let sw = Stopwatch::new().start_at(at(0)).pause_at(at(10));
        assert!(sw.is_paused());
        assert_eq!(sw.elapsed_at(at(20)), Duration::from_minutes(10));
    }

    #[test]
    fn stop_closes_an_open_pause() {
        let sw = Stopwatch::new().start_at(at(0)).pause_at(at(10)).stop_at(at(25));
        assert_eq!(sw.accumulated_pause(), Duration::from_minutes(15));
        assert_eq!(sw.elapsed_at(at(59)), Duration::from_minutes(10));
    }

    #[test]
    fn transitions_are_no_ops_out_of_order() {
        let idle = Stopwatch::new();
        assert_eq!(idle.pause_at(at(1)), idle);
        assert_eq!(idle.resume_at(at(1)), idle);
        assert_eq!(idle.elapsed_at(at(5)), Duration::ZERO);

        let running = idle.start_at(at(0));
        assert_eq!(running.resume_at(at(2)), running);
    }

    #[test]
    fn values_are_immutable() {
        let running = Stopwatch::new().start_at(at(0));
        let _stopped = running.stop_at(at(10));
        assert!(running.is_running());
    }

    #[test]
    fn json_uses_legacy_field_names() {
        let sw = Stopwatch::new().start_at(at(0)).pause_at(at(10));
        let json = serde_json::to_value(&sw).unwrap();
        assert!(json.get("startTime").is_some());
        assert!(json.get("pauseStart").is_some());
        assert!(json.get("pause").is_some());
        assert_eq!(json.get("isRunning"), Some(&serde_json::Value::Bool(true)));
        assert!(json.get("endTime").is_none());

        let back: Stopwatch = serde_json::from_value(json).unwrap();
        assert_eq!(back, sw);
    }
}

//! Tempus Interval - repeated spans of time
//!
//! A `TemporalInterval` describes a span anchored at a point, optionally
//! repeated, in one of four mutually convertible shapes:
//! start+duration, duration-only, duration+end, and start+end.
//! `Repetition` counts additional sequential applications of the base span;
//! `-1` on the wire means unbounded.

mod format;
mod interval;
mod repetition;

pub use format::render;
pub use interval::TemporalInterval;
pub use repetition::Repetition;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Repetition, TemporalInterval};
    pub use tempus_core::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempus_core::{DateTime, Duration};

    // Conversion matrix check: every anchored shape re-expressed through
    // every other and back keeps start, end, duration and repetition.
    #[test]
    fn conversion_matrix_round_trips() {
        let start = DateTime::from_ymd(2025, 5, 20).unwrap();
        let duration = Duration::new(0, 10, 0);
        let original =
            TemporalInterval::from_start_duration(start, duration, Repetition::Count(3));

        let via_duration_end = original
            .to_duration_end()
            .unwrap()
            .to_start_duration()
            .unwrap();
        let via_start_end = original.to_start_end().unwrap();

        assert_eq!(via_duration_end, original);
        assert_eq!(via_start_end.start().unwrap(), original.start().unwrap());
        assert_eq!(via_start_end.end().unwrap(), original.end().unwrap());
        assert_eq!(via_start_end.duration(), original.duration());

        // The remaining anchored pair, both directions
        assert_eq!(
            via_start_end.to_duration_end().unwrap().to_start_end().unwrap(),
            via_start_end
        );
        let terminal = original.to_duration_end().unwrap();
        let terminal_again = terminal.to_start_end().unwrap().to_duration_end().unwrap();
        assert_eq!(terminal_again.start().unwrap(), terminal.start().unwrap());
        assert_eq!(terminal_again.end().unwrap(), terminal.end().unwrap());
        assert_eq!(terminal_again.duration(), terminal.duration());

        let relative = original.to_duration_only();
        let re_anchored = relative.anchor_at(start);
        assert_eq!(re_anchored, original);
    }
}

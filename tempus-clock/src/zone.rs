//! Military (NATO) time-zone designators
//!
//! Single letters `A`-`Z` (skipping `J`, the observer's local time) mapped
//! to whole-hour UTC offsets: `A`=+1 through `M`=+12, `N`=-1 through
//! `Y`=-12, `Z`=0.

use serde::{Deserialize, Serialize};
use std::fmt;
use tempus_core::DateTime;

/// Letter, offset-hours pairs in designator order
const DESIGNATORS: [(char, i32); 25] = [
    ('A', 1), ('B', 2), ('C', 3), ('D', 4), ('E', 5), ('F', 6),
    ('G', 7), ('H', 8), ('I', 9), ('K', 10), ('L', 11), ('M', 12),
    ('N', -1), ('O', -2), ('P', -3), ('Q', -4), ('R', -5), ('S', -6),
    ('T', -7), ('U', -8), ('V', -9), ('W', -10), ('X', -11), ('Y', -12),
    ('Z', 0),
];

/// A military time-zone letter with its fixed UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneDesignator {
    letter: char,
    offset_hours: i32,
}

impl ZoneDesignator {
    /// Look up a designator letter (case-insensitive); `J` and anything
    /// outside the table yield `None`
    pub fn from_char(letter: char) -> Option<ZoneDesignator> {
        let upper = letter.to_ascii_uppercase();
        DESIGNATORS
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|&(letter, offset_hours)| ZoneDesignator { letter, offset_hours })
    }

    /// Look up the designator for a whole-hour offset
    pub fn from_offset_secs(offset_secs: i32) -> Option<ZoneDesignator> {
        if offset_secs % 3600 != 0 {
            return None;
        }
        let hours = offset_secs / 3600;
        DESIGNATORS
            .iter()
            .find(|(_, h)| *h == hours)
            .map(|&(letter, offset_hours)| ZoneDesignator { letter, offset_hours })
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn offset_secs(&self) -> i32 {
        self.offset_hours * 3600
    }

    /// Offset in seconds for a letter, if it designates a zone
    pub fn utc_offset_of(letter: char) -> Option<i32> {
        Self::from_char(letter).map(|z| z.offset_secs())
    }

    /// Annotate a point in time with this designator's offset
    pub fn designate(&self, point: &DateTime) -> DateTime {
        point.with_utc_offset(self.offset_secs())
    }
}

impl fmt::Display for ZoneDesignator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zulu_is_utc() {
        let z = ZoneDesignator::from_char('Z').unwrap();
        assert_eq!(z.offset_secs(), 0);
        assert_eq!(z.to_string(), "Z");
    }

    #[test]
    fn eastward_and_westward_letters() {
        assert_eq!(ZoneDesignator::utc_offset_of('A'), Some(3600));
        assert_eq!(ZoneDesignator::utc_offset_of('M'), Some(12 * 3600));
        assert_eq!(ZoneDesignator::utc_offset_of('N'), Some(-3600));
        assert_eq!(ZoneDesignator::utc_offset_of('Y'), Some(-12 * 3600));
    }

    #[test]
    fn juliet_is_not_a_zone() {
        assert_eq!(ZoneDesignator::from_char('J'), None);
        assert_eq!(ZoneDesignator::from_char('1'), None);
    }

    #[test]
    fn lowercase_accepted() {
        assert_eq!(
            ZoneDesignator::from_char('s').unwrap().offset_secs(),
            -6 * 3600
        );
    }

    #[test]
    fn letter_offset_round_trip() {
        for (letter, _) in DESIGNATORS {
            let zone = ZoneDesignator::from_char(letter).unwrap();
            let back = ZoneDesignator::from_offset_secs(zone.offset_secs()).unwrap();
            assert_eq!(back.letter(), letter);
        }
        assert_eq!(ZoneDesignator::from_offset_secs(5400), None);
    }

    #[test]
    fn designate_annotates_rendering_only() {
        let dt = DateTime::from_ymd_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let bravo = ZoneDesignator::from_char('B').unwrap().designate(&dt);
        assert_eq!(bravo, dt); // same instant
        assert_eq!(bravo.utc_offset(), Some(2 * 3600));
        assert_eq!(bravo.to_iso_string(), "2025-06-15T14:00:00+02:00");
    }
}

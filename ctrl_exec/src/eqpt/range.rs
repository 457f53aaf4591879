//! Range finder equipment interface

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A latched range finder reading.
#[derive(Clone, Copy, Debug, Serialize)]
pub enum RangeReading {
    /// An echo was received.
    Echo {
        /// Distance to the echoing surface.
        ///
        /// Units: millimeters
        dist_mm: f64,

        /// Age of the sample.
        ///
        /// Units: seconds
        age_s: f64,
    },

    /// No echo, nothing within the sensor's range.
    NoEcho,
}

/// Mounting direction of a range finder in the body frame, each component in
/// {-1, 0, +1}.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RfOrientation {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A single range finder.
pub trait RangeFinder {
    /// Refresh and return the latched reading. Never blocks, the driver
    /// latches samples between cycles.
    fn read(&mut self) -> RangeReading;

    /// The mounting direction of this finder.
    fn orientation(&self) -> RfOrientation;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RangeReading {
    fn default() -> Self {
        RangeReading::NoEcho
    }
}

impl RangeReading {
    /// Get the distance of a live echo, treating samples older than `ttl_s`
    /// as no echo at all.
    pub fn distance_mm(&self, ttl_s: f64) -> Option<f64> {
        match *self {
            RangeReading::Echo { dist_mm, age_s } if age_s <= ttl_s => Some(dist_mm),
            _ => None,
        }
    }
}

impl RfOrientation {
    /// True for a finder looking along the body forward axis.
    pub fn is_forward(&self) -> bool {
        self.x == 1 && self.y == 0 && self.z == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_reading_ttl() {
        let fresh = RangeReading::Echo {
            dist_mm: 500.0,
            age_s: 0.01,
        };
        let stale = RangeReading::Echo {
            dist_mm: 500.0,
            age_s: 0.3,
        };

        assert_eq!(fresh.distance_mm(0.1), Some(500.0));
        assert_eq!(stale.distance_mm(0.1), None);
        assert_eq!(RangeReading::NoEcho.distance_mm(0.1), None);
    }

    #[test]
    fn test_orientation() {
        assert!(RfOrientation { x: 1, y: 0, z: 0 }.is_forward());
        assert!(!RfOrientation { x: 0, y: 1, z: 0 }.is_forward());
        assert!(!RfOrientation { x: -1, y: 0, z: 0 }.is_forward());
    }
}

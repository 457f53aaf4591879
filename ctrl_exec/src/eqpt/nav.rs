//! Navigation equipment interface

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The most recent navigation state estimate.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NavEstimate {
    /// Body yaw rate, positive turning right.
    ///
    /// Units: radians/second
    pub yaw_rate_rads: f64,

    /// Speed over the ground along the body forward axis.
    ///
    /// Units: meters/second
    pub ground_speed_ms: f64,

    /// Heading relative to north, wrapped into [-pi, +pi].
    ///
    /// Units: radians
    pub heading_rad: f64,

    /// False if the estimate could not be refreshed this cycle, in which case
    /// the other fields hold the last good values.
    pub valid: bool,
}

impl Default for NavEstimate {
    fn default() -> Self {
        Self {
            yaw_rate_rads: 0.0,
            ground_speed_ms: 0.0,
            heading_rad: 0.0,
            valid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of navigation state estimates.
pub trait Navigator {
    /// Get the most recent state estimate.
    ///
    /// Never blocks. On a sensor fault the returned estimate has
    /// `valid == false` and carries the last good values.
    fn estimate(&self) -> NavEstimate;
}

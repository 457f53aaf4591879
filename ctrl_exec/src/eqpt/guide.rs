//! Guidance equipment interface

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current guidance demand.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct GuideOutput {
    /// Error between the commanded and current heading, wrapped into
    /// [-pi, +pi].
    ///
    /// Units: radians
    pub heading_error_rad: f64,

    /// Commanded speed over the ground.
    ///
    /// Units: meters/second
    pub ground_speed_cmd_ms: f64,

    /// True while there is a mission to execute. When false the controller
    /// will not enter (or stay in) Auto.
    pub mission_valid: bool,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A source of guidance demands.
pub trait Guide {
    /// Get the current guidance demand.
    fn output(&self) -> GuideOutput;
}

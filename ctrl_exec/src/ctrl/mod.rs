//! Vehicle controller module
//!
//! The controller turns the per-cycle input snapshot (stick positions,
//! navigation estimate, guidance demand, range reading, health flags) into
//! steering and thrust demands, through a mode state machine:
//!
//! - `Locked` - Disarmed, outputs neutral. The initial mode.
//! - `Manual` - Stick positions are passed through to the actuators.
//! - `Auto` - The inner PID loops track the guidance demand, with the
//!   obstacle-avoidance override layered on top.
//! - `Failsafe` - Entered from any mode on radio loss, battery low, external
//!   fault, sustained nav fault or repeated cycle overruns. Outputs neutral.
//!   Drops back to `Locked` once every cause has cleared, after which the
//!   operator must re-arm.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod auto;
mod manual;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
pub use params::*;
pub use state::*;

use crate::pid::PidError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The controller's operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Mode {
    /// Disarmed, outputs neutral.
    Locked,
    /// Pilot sticks drive the actuators directly.
    Manual,
    /// The PID loops track the guidance demand.
    Auto,
    /// Inputs lost or a fault is active, outputs neutral.
    Failsafe,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Locked
    }
}

/// Possible errors that can occur during controller operation.
#[derive(Debug, thiserror::Error)]
pub enum CtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(#[from] util::params::LoadError),

    #[error("Invalid controller configuration: {0}")]
    InvalidConfig(String),

    #[error("PID update failed: {0}")]
    PidError(#[from] PidError),
}

//! PID control blocks
//!
//! Two scalar PID variants are provided:
//!
//! - [`BlockPid`] takes the derivative of the error signal, with an optional
//!   first-order low-pass on the derivative. Used for the thrust loop.
//! - [`BlockPidDfb`] takes the derivative from a measured rate instead, so a
//!   step in the command produces no output spike. Used for the steering
//!   loop, where the heading error steps at waypoint transitions.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod block_pid;
mod block_pid_dfb;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use block_pid::*;
pub use block_pid_dfb::*;
pub use params::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur when updating a PID block.
#[derive(Debug, thiserror::Error)]
pub enum PidError {
    #[error("Timestep must be finite and positive, got {0}")]
    InvalidTimestep(f64),

    #[error("PID input must be finite, got {0}")]
    NonFiniteInput(f64),

    #[error("Invalid PID parameters: {0}")]
    InvalidParams(String),
}

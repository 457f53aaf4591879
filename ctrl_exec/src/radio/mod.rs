//! Radio channel module
//!
//! Maps between raw receiver/actuator pulse widths and normalised positions
//! in [-1, +1], and detects the stick gesture used to arm and disarm the
//! vehicle. The controller registers exactly four channels, in the fixed
//! index order given by [`ChannelId`].

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod arming;
mod channel;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use arming::*;
pub use channel::*;
pub use params::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of radio channels registered by the controller.
pub const NUM_RADIO_CHANNELS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The channels registered by the controller, in fixed index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelId {
    /// Flight mode selector (input).
    Mode = 0,
    /// Steering stick and servo (input and output).
    Steering = 1,
    /// Thrust stick and ESC (input and output).
    Thrust = 2,
    /// Forward/reverse selector switch (input).
    FwdRev = 3,
}

/// Possible errors that can occur during radio channel operation.
#[derive(Debug, thiserror::Error)]
pub enum RadioError {
    #[error("Channel endpoints must satisfy min < trim < max, got {0}/{1}/{2} us")]
    InvalidEndpoints(u16, u16, u16),

    #[error("Physical channel {0} is not readable")]
    NotAnInput(usize),

    #[error("Physical channel {0} is not writable")]
    NotAnOutput(usize),
}

//! Parameters structures for the radio channels

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Signal direction of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelDirection {
    /// Read from the receiver only.
    Input,
    /// Written to an actuator only.
    Output,
    /// Read from the receiver and written to an actuator.
    InOut,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Configuration of a single radio channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ChannelParams {
    /// Physical channel number on the receiver/actuator driver.
    pub phys_channel: usize,

    /// Pulse width at full negative deflection.
    ///
    /// Units: microseconds
    pub pulse_min_us: u16,

    /// Pulse width at neutral.
    ///
    /// Units: microseconds
    pub pulse_trim_us: u16,

    /// Pulse width at full positive deflection.
    ///
    /// Units: microseconds
    pub pulse_max_us: u16,

    /// Signal direction.
    pub direction: ChannelDirection,

    /// If true the normalised position is negated with respect to the pulse
    /// width.
    pub reverse: bool,
}

/// Parameters for all four controller channels.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RadioParams {
    pub mode: ChannelParams,
    pub steering: ChannelParams,
    pub thrust: ChannelParams,
    pub fwd_rev: ChannelParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChannelDirection {
    pub fn is_input(&self) -> bool {
        matches!(self, ChannelDirection::Input | ChannelDirection::InOut)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, ChannelDirection::Output | ChannelDirection::InOut)
    }
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            phys_channel: 0,
            pulse_min_us: 1100,
            pulse_trim_us: 1500,
            pulse_max_us: 1900,
            direction: ChannelDirection::Input,
            reverse: false,
        }
    }
}

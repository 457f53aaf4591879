//! Simulated radio receiver and actuator driver

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use crate::eqpt::RadioIo;
use crate::radio::{ChannelId, ChannelParams, RadioParams};
use util::maths::{clamp, lin_map};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of physical channels on the simulated receiver/driver.
const NUM_PHYS_CHANNELS: usize = 8;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated receiver and PWM driver.
///
/// Stick positions set by the scenario are converted to pulse widths with
/// the same channel endpoints the controller uses, and latched until
/// changed. Actuator writes land in a separate set of latches which the
/// vehicle model integrates on the next cycle.
pub struct SimRadio {
    params: RadioParams,

    /// Latched receiver pulses, by physical channel.
    pulses_in: [Option<u16>; NUM_PHYS_CHANNELS],

    /// Latched actuator pulses, by physical channel.
    pulses_out: [Option<u16>; NUM_PHYS_CHANNELS],

    /// Age of the last receiver frame.
    ///
    /// Units: seconds
    frame_age_s: f64,

    /// While true no new receiver frames arrive and the frame age grows.
    signal_lost: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRadio {
    /// Create a new simulated radio with all sticks at neutral.
    pub fn new(params: RadioParams) -> Self {
        let mut radio = Self {
            params,
            pulses_in: [None; NUM_PHYS_CHANNELS],
            pulses_out: [None; NUM_PHYS_CHANNELS],
            frame_age_s: 0f64,
            signal_lost: false,
        };

        radio.set_stick(ChannelId::Mode, 0.0);
        radio.set_stick(ChannelId::Steering, 0.0);
        radio.set_stick(ChannelId::Thrust, 0.0);
        radio.set_stick(ChannelId::FwdRev, 1.0);

        radio
    }

    /// Set the normalised position of a transmitter stick.
    pub fn set_stick(&mut self, id: ChannelId, position: f64) {
        let ch = self.channel_params(id);
        self.pulses_in[ch.phys_channel] = Some(pos_to_pulse(&ch, position));
    }

    /// Simulate losing or regaining the transmitter signal.
    pub fn set_signal_lost(&mut self, lost: bool) {
        self.signal_lost = lost;
    }

    /// The normalised position latched on an actuator channel, neutral if
    /// nothing has been written yet.
    pub fn actuator_position(&self, id: ChannelId) -> f64 {
        let ch = self.channel_params(id);
        match self.pulses_out[ch.phys_channel] {
            Some(pulse_us) => pulse_to_pos(&ch, pulse_us),
            None => 0f64,
        }
    }

    /// Advance the receiver clock by one cycle.
    pub fn step(&mut self, dt_s: f64) {
        if self.signal_lost {
            self.frame_age_s += dt_s;
        } else {
            self.frame_age_s = 0f64;
        }
    }

    fn channel_params(&self, id: ChannelId) -> ChannelParams {
        match id {
            ChannelId::Mode => self.params.mode,
            ChannelId::Steering => self.params.steering,
            ChannelId::Thrust => self.params.thrust,
            ChannelId::FwdRev => self.params.fwd_rev,
        }
    }
}

impl RadioIo for SimRadio {
    fn read_pulse_us(&self, phys_channel: usize) -> Option<u16> {
        if self.signal_lost {
            return None;
        }
        self.pulses_in[phys_channel]
    }

    fn write_pulse_us(&mut self, phys_channel: usize, pulse_us: u16) {
        self.pulses_out[phys_channel] = Some(pulse_us);
    }

    fn frame_age_s(&self) -> f64 {
        self.frame_age_s
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Map a normalised position onto a pulse width through the channel
/// endpoints, ignoring the reverse flag (the transmitter knows nothing of
/// the receiver's channel setup).
fn pos_to_pulse(ch: &ChannelParams, position: f64) -> u16 {
    let pos = clamp(&position, &-1f64, &1f64);

    let pulse = if pos >= 0f64 {
        lin_map(
            (0f64, 1f64),
            (ch.pulse_trim_us as f64, ch.pulse_max_us as f64),
            pos,
        )
    } else {
        lin_map(
            (-1f64, 0f64),
            (ch.pulse_min_us as f64, ch.pulse_trim_us as f64),
            pos,
        )
    };

    pulse.round() as u16
}

/// Inverse of `pos_to_pulse`.
fn pulse_to_pos(ch: &ChannelParams, pulse_us: u16) -> f64 {
    let p = pulse_us as f64;
    let trim = ch.pulse_trim_us as f64;

    let pos = if p >= trim {
        lin_map((trim, ch.pulse_max_us as f64), (0f64, 1f64), p)
    } else {
        lin_map((ch.pulse_min_us as f64, trim), (-1f64, 0f64), p)
    };

    clamp(&pos, &-1f64, &1f64)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::radio::ChannelDirection;

    fn radio_params() -> RadioParams {
        RadioParams {
            mode: ChannelParams {
                phys_channel: 5,
                ..ChannelParams::default()
            },
            steering: ChannelParams {
                phys_channel: 3,
                direction: ChannelDirection::InOut,
                ..ChannelParams::default()
            },
            thrust: ChannelParams {
                phys_channel: 2,
                direction: ChannelDirection::InOut,
                ..ChannelParams::default()
            },
            fwd_rev: ChannelParams {
                phys_channel: 4,
                ..ChannelParams::default()
            },
        }
    }

    #[test]
    fn test_stick_to_pulse() {
        let mut radio = SimRadio::new(radio_params());

        radio.set_stick(ChannelId::Steering, 0.5);
        assert_eq!(radio.read_pulse_us(3), Some(1700));

        radio.set_stick(ChannelId::Thrust, -1.0);
        assert_eq!(radio.read_pulse_us(2), Some(1100));
    }

    #[test]
    fn test_signal_loss_ages_frames() {
        let mut radio = SimRadio::new(radio_params());

        radio.step(0.02);
        assert_eq!(radio.frame_age_s(), 0.0);

        radio.set_signal_lost(true);
        for _ in 0..10 {
            radio.step(0.02);
        }
        assert!((radio.frame_age_s() - 0.2).abs() < 1e-9);
        assert_eq!(radio.read_pulse_us(3), None);

        radio.set_signal_lost(false);
        radio.step(0.02);
        assert_eq!(radio.frame_age_s(), 0.0);
    }

    #[test]
    fn test_actuator_loopback() {
        let mut radio = SimRadio::new(radio_params());

        radio.write_pulse_us(2, 1700);
        assert!((radio.actuator_position(ChannelId::Thrust) - 0.5).abs() < 1e-9);

        // Nothing written on steering yet
        assert_eq!(radio.actuator_position(ChannelId::Steering), 0.0);
    }
}

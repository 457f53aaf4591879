//! Radio channel pulse/position mapping

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{ChannelId, ChannelParams, RadioError, RadioParams, NUM_RADIO_CHANNELS};
use crate::eqpt::RadioIo;
use util::maths::{clamp, lin_map};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single radio channel.
///
/// Channels are created at boot and never destroyed. Each holds the latched
/// raw pulse width and the corresponding normalised position, refreshed by
/// `read_from` for inputs and by `set_position` for outputs.
#[derive(Clone, Copy, Debug)]
pub struct RadioChannel {
    params: ChannelParams,

    /// Latched normalised position in [-1, +1].
    position: f64,

    /// Latched raw pulse width.
    ///
    /// Units: microseconds
    pulse_us: u16,
}

/// The four controller channels.
pub struct RadioBank {
    channels: [RadioChannel; NUM_RADIO_CHANNELS],
}

/// Normalised positions of all input channels, sampled once per cycle.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StickInputs {
    pub mode_pos: f64,
    pub steering_pos: f64,
    pub thrust_pos: f64,
    pub fwd_rev_pos: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RadioChannel {
    /// Create a new channel resting at neutral.
    pub fn new(params: ChannelParams) -> Result<Self, RadioError> {
        if params.pulse_min_us >= params.pulse_trim_us
            || params.pulse_trim_us >= params.pulse_max_us
        {
            return Err(RadioError::InvalidEndpoints(
                params.pulse_min_us,
                params.pulse_trim_us,
                params.pulse_max_us,
            ));
        }

        Ok(Self {
            params,
            position: 0f64,
            pulse_us: params.pulse_trim_us,
        })
    }

    /// Latch the most recent receiver pulse for this channel.
    ///
    /// Channels without an input direction are left untouched.
    pub fn read_from(&mut self, io: &dyn RadioIo) {
        if !self.params.direction.is_input() {
            return;
        }

        if let Some(pulse_us) = io.read_pulse_us(self.params.phys_channel) {
            self.pulse_us = pulse_us;
            self.position = self.normalise(pulse_us);
        }
    }

    /// The latched normalised position in [-1, +1].
    pub fn position(&self) -> f64 {
        self.position
    }

    /// The latched raw pulse width in microseconds.
    pub fn pulse_us(&self) -> u16 {
        self.pulse_us
    }

    /// Demand a normalised position on an output channel.
    ///
    /// The position is clamped into [-1, +1], converted to a pulse width and
    /// written to the actuator driver, which applies it at the next PWM
    /// frame. The latched position is the quantised value actually written.
    pub fn set_position(
        &mut self,
        position: f64,
        io: &mut dyn RadioIo,
    ) -> Result<(), RadioError> {
        if !self.params.direction.is_output() {
            return Err(RadioError::NotAnOutput(self.params.phys_channel));
        }

        let demand = clamp(&position, &-1f64, &1f64);
        let pulse_us = self.denormalise(demand);

        io.write_pulse_us(self.params.phys_channel, pulse_us);

        self.pulse_us = pulse_us;
        self.position = self.normalise(pulse_us);

        Ok(())
    }

    /// Map a pulse width onto [-1, +1] through the (min, trim, max)
    /// endpoints, clamped, with the reverse flag applied.
    fn normalise(&self, pulse_us: u16) -> f64 {
        let p = pulse_us as f64;
        let min = self.params.pulse_min_us as f64;
        let trim = self.params.pulse_trim_us as f64;
        let max = self.params.pulse_max_us as f64;

        let pos = if p >= trim {
            lin_map((trim, max), (0f64, 1f64), p)
        } else {
            lin_map((min, trim), (-1f64, 0f64), p)
        };

        let pos = clamp(&pos, &-1f64, &1f64);

        if self.params.reverse {
            -pos
        } else {
            pos
        }
    }

    /// Inverse of `normalise`, rounded to whole microseconds.
    fn denormalise(&self, position: f64) -> u16 {
        let pos = if self.params.reverse {
            -position
        } else {
            position
        };

        let min = self.params.pulse_min_us as f64;
        let trim = self.params.pulse_trim_us as f64;
        let max = self.params.pulse_max_us as f64;

        let pulse = if pos >= 0f64 {
            lin_map((0f64, 1f64), (trim, max), pos)
        } else {
            lin_map((-1f64, 0f64), (min, trim), pos)
        };

        pulse.round() as u16
    }
}

impl RadioBank {
    /// Create the four controller channels from the radio parameters.
    pub fn new(params: &RadioParams) -> Result<Self, RadioError> {
        Ok(Self {
            channels: [
                RadioChannel::new(params.mode)?,
                RadioChannel::new(params.steering)?,
                RadioChannel::new(params.thrust)?,
                RadioChannel::new(params.fwd_rev)?,
            ],
        })
    }

    /// Latch all input channels from the receiver.
    pub fn read_inputs(&mut self, io: &dyn RadioIo) {
        for ch in self.channels.iter_mut() {
            ch.read_from(io);
        }
    }

    /// Snapshot the latched input positions.
    pub fn stick_inputs(&self) -> StickInputs {
        StickInputs {
            mode_pos: self.channel(ChannelId::Mode).position(),
            steering_pos: self.channel(ChannelId::Steering).position(),
            thrust_pos: self.channel(ChannelId::Thrust).position(),
            fwd_rev_pos: self.channel(ChannelId::FwdRev).position(),
        }
    }

    /// Get a channel by id.
    pub fn channel(&self, id: ChannelId) -> &RadioChannel {
        &self.channels[id as usize]
    }

    /// Demand a position on an output channel.
    pub fn set_position(
        &mut self,
        id: ChannelId,
        position: f64,
        io: &mut dyn RadioIo,
    ) -> Result<(), RadioError> {
        self.channels[id as usize].set_position(position, io)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::RadioIo;
    use crate::radio::ChannelDirection;

    /// Loopback driver: writes are latched and can be read back.
    #[derive(Default)]
    struct LoopbackIo {
        pulses: [Option<u16>; 8],
    }

    impl RadioIo for LoopbackIo {
        fn read_pulse_us(&self, phys_channel: usize) -> Option<u16> {
            self.pulses[phys_channel]
        }

        fn write_pulse_us(&mut self, phys_channel: usize, pulse_us: u16) {
            self.pulses[phys_channel] = Some(pulse_us);
        }

        fn frame_age_s(&self) -> f64 {
            0.0
        }
    }

    fn inout_params() -> ChannelParams {
        ChannelParams {
            phys_channel: 2,
            direction: ChannelDirection::InOut,
            ..ChannelParams::default()
        }
    }

    #[test]
    fn test_position_map() {
        let ch = RadioChannel::new(inout_params()).unwrap();

        assert_eq!(ch.normalise(1500), 0.0);
        assert_eq!(ch.normalise(1900), 1.0);
        assert_eq!(ch.normalise(1100), -1.0);
        assert_eq!(ch.normalise(1700), 0.5);
        assert_eq!(ch.normalise(1300), -0.5);

        // Out of range pulses clamp rather than extrapolate
        assert_eq!(ch.normalise(2100), 1.0);
        assert_eq!(ch.normalise(900), -1.0);
    }

    #[test]
    fn test_asymmetric_trim() {
        let mut params = inout_params();
        params.pulse_trim_us = 1600;
        let ch = RadioChannel::new(params).unwrap();

        // The map is piecewise about the trim, not about the midpoint
        assert_eq!(ch.normalise(1600), 0.0);
        assert_eq!(ch.normalise(1750), 0.5);
        assert_eq!(ch.normalise(1350), -0.5);
    }

    #[test]
    fn test_reverse() {
        let mut params = inout_params();
        params.reverse = true;
        let ch = RadioChannel::new(params).unwrap();

        assert_eq!(ch.normalise(1900), -1.0);
        assert_eq!(ch.normalise(1100), 1.0);
        assert_eq!(ch.denormalise(1.0), 1100);
    }

    #[test]
    fn test_set_get_round_trip() {
        let mut io = LoopbackIo::default();
        let mut ch = RadioChannel::new(inout_params()).unwrap();

        // 12-bit PWM quantisation allows a worst case error of 1/800
        let tol = 1.0 / 800.0 + 1e-9;

        let mut x = -1.0;
        while x <= 1.0 {
            ch.set_position(x, &mut io).unwrap();
            assert!(
                (ch.position() - x).abs() <= tol,
                "round trip failed for {}",
                x
            );
            x += 0.01;
        }
    }

    #[test]
    fn test_input_channel_rejects_write() {
        let mut io = LoopbackIo::default();
        let mut params = inout_params();
        params.direction = ChannelDirection::Input;
        let mut ch = RadioChannel::new(params).unwrap();

        assert!(ch.set_position(0.5, &mut io).is_err());
    }

    #[test]
    fn test_invalid_endpoints() {
        let mut params = inout_params();
        params.pulse_trim_us = 1000;
        assert!(RadioChannel::new(params).is_err());
    }

    #[test]
    fn test_bank_read_inputs() {
        let mut io = LoopbackIo::default();
        io.pulses[5] = Some(1900);
        io.pulses[3] = Some(1300);

        let params = RadioParams {
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
        };

        let mut bank = RadioBank::new(&params).unwrap();
        bank.read_inputs(&io);

        let sticks = bank.stick_inputs();
        assert_eq!(sticks.mode_pos, 1.0);
        assert_eq!(sticks.steering_pos, -0.5);
        // No frame yet on thrust, stays at neutral
        assert_eq!(sticks.thrust_pos, 0.0);
    }
}

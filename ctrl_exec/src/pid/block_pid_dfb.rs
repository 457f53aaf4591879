//! Derivative-on-feedback PID block

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{PidError, PidParams};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A scalar PID block whose derivative term comes from a measured rate
/// rather than from the error signal.
///
/// When the command steps (a waypoint transition, say) the error steps with
/// it, and a command-derivative block would inject an impulse into the
/// actuator. The measured rate is continuous, so this block does not.
#[derive(Debug, Default, Clone)]
pub struct BlockPidDfb {
    params: PidParams,

    /// The integral accumulation, gain included.
    integrator: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BlockPidDfb {
    /// Create a new block with the given parameters.
    pub fn new(params: PidParams) -> Self {
        Self {
            params,
            integrator: 0f64,
        }
    }

    /// Update the block with the current error, the measured rate of the
    /// controlled quantity, and the timestep, returning the new output.
    ///
    /// The measured rate is subtracted, so a positive rate opposes a
    /// positive error.
    pub fn update(
        &mut self,
        error: f64,
        measured_rate: f64,
        dt_s: f64,
    ) -> Result<f64, PidError> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(PidError::InvalidTimestep(dt_s));
        }
        if !error.is_finite() {
            return Err(PidError::NonFiniteInput(error));
        }
        if !measured_rate.is_finite() {
            return Err(PidError::NonFiniteInput(measured_rate));
        }

        // Accumulate the integral term and clamp it
        self.integrator += self.params.i * error * dt_s;
        self.integrator = clamp(&self.integrator, &-self.params.i_max, &self.params.i_max);

        let output =
            self.params.p * error + self.integrator - self.params.d * measured_rate;

        Ok(clamp(&output, &-self.params.y_max, &self.params.y_max))
    }

    /// Reset the block, zeroing the integrator.
    pub fn reset(&mut self) {
        self.integrator = 0f64;
    }
}

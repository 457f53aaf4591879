//! Command-derivative PID block

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{PidError, PidParams};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A scalar PID block taking the derivative of the error signal.
///
/// The integrator uses clamp-only anti-windup, and the derivative can be
/// passed through a first-order low-pass when the params set a cutoff.
#[derive(Debug, Default, Clone)]
pub struct BlockPid {
    params: PidParams,

    /// The integral accumulation, gain included.
    integrator: f64,

    /// Error passed in on the previous update, `None` straight after a
    /// reset so that no derivative is produced from an undefined history.
    prev_error: Option<f64>,

    /// Filtered derivative from the previous update.
    prev_deriv: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl BlockPid {
    /// Create a new block with the given parameters.
    pub fn new(params: PidParams) -> Self {
        Self {
            params,
            integrator: 0f64,
            prev_error: None,
            prev_deriv: 0f64,
        }
    }

    /// Update the block with the current error and timestep, returning the
    /// new output.
    ///
    /// On an invalid timestep or non-finite error the state is left
    /// unchanged and an error returned.
    pub fn update(&mut self, error: f64, dt_s: f64) -> Result<f64, PidError> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(PidError::InvalidTimestep(dt_s));
        }
        if !error.is_finite() {
            return Err(PidError::NonFiniteInput(error));
        }

        // Accumulate the integral term and clamp it
        self.integrator += self.params.i * error * dt_s;
        self.integrator = clamp(&self.integrator, &-self.params.i_max, &self.params.i_max);

        // Derivative of the error. The first update after a reset has no
        // history to derive from, so the derivative is zero.
        let deriv_raw = match self.prev_error {
            Some(e) => (error - e) / dt_s,
            None => 0f64,
        };

        // Low-pass the derivative with time constant 1/(2 pi f_cut)
        let deriv = if self.params.f_cut_hz > 0.0 {
            let tau_s = 1.0 / (std::f64::consts::TAU * self.params.f_cut_hz);
            let alpha = dt_s / (dt_s + tau_s);
            self.prev_deriv + alpha * (deriv_raw - self.prev_deriv)
        } else {
            deriv_raw
        };

        self.prev_error = Some(error);
        self.prev_deriv = deriv;

        let output = self.params.p * error + self.params.d * deriv + self.integrator;

        Ok(clamp(&output, &-self.params.y_max, &self.params.y_max))
    }

    /// Reset the block, zeroing the integrator and the derivative history.
    pub fn reset(&mut self) {
        self.integrator = 0f64;
        self.prev_error = None;
        self.prev_deriv = 0f64;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_params() -> PidParams {
        PidParams {
            p: 0.5,
            i: 0.1,
            d: 0.05,
            i_max: 0.5,
            y_max: 1.0,
            f_cut_hz: 0.0,
        }
    }

    #[test]
    fn test_first_update() {
        let mut pid = BlockPid::new(test_params());

        // Speed error of 1 m/s at 50 Hz: the integrator accumulates
        // 0.1 * 1 * 0.02 and there is no derivative on the first update
        let out = pid.update(1.0, 0.02).unwrap();
        assert!((out - 0.502).abs() < 1e-12);
    }

    #[test]
    fn test_no_derivative_kick_after_reset() {
        let mut params = test_params();
        params.d = 100.0;
        params.i = 0.0;

        let mut pid = BlockPid::new(params);

        // A huge D gain with no history must not produce a spike
        let out = pid.update(1.0, 0.02).unwrap();
        assert!((out - 0.5).abs() < 1e-12);

        pid.reset();
        let out = pid.update(-1.0, 0.02).unwrap();
        assert!((out + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_clamps_hold() {
        let mut pid = BlockPid::new(test_params());

        // Drive the block hard in both directions and check the invariants
        // on every update
        let errors = [10.0, 100.0, -50.0, 3.0, -1000.0, 1000.0, 0.5, -0.5];
        for _ in 0..100 {
            for e in errors.iter() {
                let out = pid.update(*e, 0.02).unwrap();
                assert!(pid.integrator.abs() <= pid.params.i_max);
                assert!(out.abs() <= pid.params.y_max);
            }
        }
    }

    #[test]
    fn test_derivative_low_pass() {
        let mut params = test_params();
        params.p = 0.0;
        params.i = 0.0;
        params.d = 1.0;
        params.f_cut_hz = 20.0;

        let mut pid = BlockPid::new(params);

        let dt = 0.02;
        pid.update(0.0, dt).unwrap();
        let out = pid.update(1.0, dt).unwrap();

        // Raw derivative is 50/s, filtered output is alpha * 50
        let tau = 1.0 / (std::f64::consts::TAU * 20.0);
        let alpha = dt / (dt + tau);
        assert!((out - alpha * 50.0).abs() < 1e-9);

        // Unfiltered block passes the raw derivative straight through
        params.f_cut_hz = 0.0;
        let mut pid = BlockPid::new(params);
        pid.update(0.0, dt).unwrap();
        let out = pid.update(1.0, dt).unwrap();
        assert!((out - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_timestep() {
        let mut pid = BlockPid::new(test_params());
        pid.update(1.0, 0.02).unwrap();
        let integrator = pid.integrator;

        assert!(pid.update(1.0, 0.0).is_err());
        assert!(pid.update(1.0, -0.02).is_err());
        assert!(pid.update(1.0, std::f64::NAN).is_err());

        // State must be untouched by failed updates
        assert_eq!(pid.integrator, integrator);
        assert_eq!(pid.prev_error, Some(1.0));
    }
}

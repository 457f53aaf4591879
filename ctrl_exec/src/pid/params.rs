//! Parameters structure for the PID blocks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::PidError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains and limits of a single PID block.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PidParams {
    /// Proportional gain.
    pub p: f64,

    /// Integral gain.
    pub i: f64,

    /// Derivative gain.
    pub d: f64,

    /// Symmetric clamp on the integrator accumulator.
    pub i_max: f64,

    /// Symmetric clamp on the block output.
    pub y_max: f64,

    /// Cutoff frequency of the first-order low-pass applied to the
    /// derivative term. Zero disables the filter.
    ///
    /// Units: hertz
    #[serde(default)]
    pub f_cut_hz: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidParams {
    /// Check the parameters are usable.
    ///
    /// All values must be finite, the clamps non-negative, and the filter
    /// cutoff non-negative.
    pub fn validate(&self) -> Result<(), PidError> {
        let values = [self.p, self.i, self.d, self.i_max, self.y_max, self.f_cut_hz];

        if values.iter().any(|v| !v.is_finite()) {
            return Err(PidError::InvalidParams(format!(
                "non-finite value in {:?}",
                self
            )));
        }

        if self.i_max < 0.0 || self.y_max < 0.0 {
            return Err(PidError::InvalidParams(format!(
                "negative clamp in {:?}",
                self
            )));
        }

        if self.f_cut_hz < 0.0 {
            return Err(PidError::InvalidParams(format!(
                "negative filter cutoff in {:?}",
                self
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        let good = PidParams {
            p: 0.5,
            i: 0.1,
            d: 0.05,
            i_max: 0.5,
            y_max: 1.0,
            f_cut_hz: 0.0,
        };
        assert!(good.validate().is_ok());

        let mut nan_gain = good;
        nan_gain.p = std::f64::NAN;
        assert!(nan_gain.validate().is_err());

        let mut inverted = good;
        inverted.y_max = -1.0;
        assert!(inverted.validate().is_err());
    }
}

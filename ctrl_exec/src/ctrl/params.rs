//! Parameters structure for the controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::CtrlError;
use crate::pid::PidParams;
use crate::radio::ArmingParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the vehicle controller.
#[derive(Debug, Deserialize)]
pub struct Params {
    // ---- MODE SELECTION ----

    /// Mode channel position above which Auto is selected.
    pub auto_threshold: f64,

    /// If true a low forward/reverse channel inverts the manual thrust
    /// command.
    pub use_forward_reverse_switch: bool,

    // ---- FAILSAFE ----

    /// Maximum age of the last valid receiver frame before the radio is
    /// considered lost.
    ///
    /// Units: seconds
    pub failsafe_timeout_s: f64,

    /// Battery voltage below which failsafe is entered.
    ///
    /// Units: volts
    pub battery_low_volts: f64,

    /// Number of consecutive cycles with an invalid nav estimate tolerated
    /// before failsafe is entered.
    pub nav_fault_cycle_limit: u32,

    /// Number of consecutive cycle overruns tolerated before failsafe is
    /// entered.
    pub overrun_cycle_limit: u64,

    // ---- OUTPUTS ----

    /// Thrust demands with magnitude below this are zeroed to stop the
    /// drivetrain chattering around neutral.
    pub thrust_deadband: f64,

    // ---- OBSTACLE AVOIDANCE ----

    /// Maximum age of a range echo before it is treated as no echo.
    ///
    /// Units: seconds
    pub range_ttl_s: f64,

    /// Forward range below which the vehicle is stopped outright.
    ///
    /// Units: millimeters
    pub range_stop_mm: f64,

    /// Forward range below which an avoidance steering bias is applied.
    ///
    /// Units: millimeters
    pub range_avoid_mm: f64,

    /// Avoidance deviation at the far edge of the avoidance band.
    ///
    /// Units: degrees
    pub avoid_min_deg: f64,

    /// Avoidance deviation as the range closes on the stop distance.
    ///
    /// Units: degrees
    pub avoid_max_deg: f64,

    // ---- SUB-MODULES ----

    /// Arming gesture detector parameters.
    pub arming: ArmingParams,

    /// Steering loop gains (derivative on feedback).
    pub str_pid: PidParams,

    /// Thrust loop gains.
    pub thr_pid: PidParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters are usable.
    ///
    /// A controller with invalid parameters will refuse to leave Locked.
    pub fn validate(&self) -> Result<(), CtrlError> {
        self.str_pid.validate()?;
        self.thr_pid.validate()?;

        let finite = [
            self.auto_threshold,
            self.failsafe_timeout_s,
            self.battery_low_volts,
            self.thrust_deadband,
            self.range_ttl_s,
            self.range_stop_mm,
            self.range_avoid_mm,
            self.avoid_min_deg,
            self.avoid_max_deg,
            self.arming.a_low,
            self.arming.b_left,
            self.arming.b_right,
            self.arming.hold_s,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(CtrlError::InvalidConfig(
                "non-finite parameter value".into(),
            ));
        }

        if self.failsafe_timeout_s <= 0.0 {
            return Err(CtrlError::InvalidConfig(format!(
                "failsafe_timeout_s must be positive, got {}",
                self.failsafe_timeout_s
            )));
        }

        if !(0.0..1.0).contains(&self.thrust_deadband) {
            return Err(CtrlError::InvalidConfig(format!(
                "thrust_deadband must be in [0, 1), got {}",
                self.thrust_deadband
            )));
        }

        if self.range_stop_mm >= self.range_avoid_mm {
            return Err(CtrlError::InvalidConfig(format!(
                "range_stop_mm ({}) must be below range_avoid_mm ({})",
                self.range_stop_mm, self.range_avoid_mm
            )));
        }

        if self.avoid_min_deg > self.avoid_max_deg {
            return Err(CtrlError::InvalidConfig(format!(
                "avoid_min_deg ({}) must not exceed avoid_max_deg ({})",
                self.avoid_min_deg, self.avoid_max_deg
            )));
        }

        if self.arming.hold_s <= 0.0 {
            return Err(CtrlError::InvalidConfig(format!(
                "arming hold_s must be positive, got {}",
                self.arming.hold_s
            )));
        }

        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            auto_threshold: 0.5,
            use_forward_reverse_switch: false,
            failsafe_timeout_s: 0.5,
            battery_low_volts: 6.4,
            nav_fault_cycle_limit: 25,
            overrun_cycle_limit: 3,
            thrust_deadband: 0.1,
            range_ttl_s: 0.1,
            range_stop_mm: 100.0,
            range_avoid_mm: 650.0,
            avoid_min_deg: 15.0,
            avoid_max_deg: 180.0,
            arming: ArmingParams::default(),
            str_pid: PidParams::default(),
            thr_pid: PidParams::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_valid() {
        assert!(Params::default().validate().is_ok());
    }

    #[test]
    fn test_bad_config_rejected() {
        let mut params = Params::default();
        params.str_pid.p = std::f64::NAN;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.range_stop_mm = 700.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.failsafe_timeout_s = 0.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_load_from_toml() {
        let params: Params = util::params::from_toml_str(
            r#"
            auto_threshold = 0.5
            use_forward_reverse_switch = true
            failsafe_timeout_s = 0.5
            battery_low_volts = 6.4
            nav_fault_cycle_limit = 25
            overrun_cycle_limit = 3
            thrust_deadband = 0.1
            range_ttl_s = 0.1
            range_stop_mm = 100.0
            range_avoid_mm = 650.0
            avoid_min_deg = 15.0
            avoid_max_deg = 180.0

            [arming]
            a_low = 0.1
            b_left = -0.9
            b_right = 0.9
            hold_s = 0.5

            [str_pid]
            p = 0.5
            i = 0.1
            d = 0.05
            i_max = 0.5
            y_max = 1.0

            [thr_pid]
            p = 0.5
            i = 0.1
            d = 0.05
            i_max = 0.5
            y_max = 1.0
            f_cut_hz = 20.0
            "#,
        )
        .unwrap();

        assert!(params.validate().is_ok());
        assert!(params.use_forward_reverse_switch);
        assert_eq!(params.thr_pid.f_cut_hz, 20.0);
    }
}

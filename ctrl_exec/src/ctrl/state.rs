//! Implementations for the CtrlMgr state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;

// Internal
use super::{CtrlError, Mode, Params};
use crate::eqpt::{GuideOutput, NavEstimate, RangeReading};
use crate::pid::{BlockPid, BlockPidDfb};
use crate::radio::{ArmingEvent, ArmingMechanism, StickInputs};
use util::{
    archive::{Archived, Archiver},
    maths::clamp,
    module::Module,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle controller state.
#[derive(Default)]
pub struct CtrlMgr {
    pub(crate) params: Params,

    /// Current operating mode.
    mode: Mode,

    /// True while the vehicle is armed. Armed implies the mode is not
    /// Locked.
    armed: bool,

    /// False if the loaded parameters failed validation, in which case the
    /// controller refuses to leave Locked.
    config_ok: bool,

    arming: ArmingMechanism,

    /// Steering loop, derivative on the measured yaw rate.
    pub(crate) pid_str: BlockPidDfb,

    /// Thrust loop.
    pub(crate) pid_thr: BlockPid,

    /// Last nav estimate flagged valid, substituted while the navigator
    /// reports a fault.
    pub(crate) last_good_nav: NavEstimate,

    /// Consecutive cycles with an invalid nav estimate.
    pub(crate) num_consec_nav_faults: u32,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    output: OutputData,
    arch_output: Archiver,

    /// True once `init` has set up the archivers.
    arch_init: bool,
}

/// Input data to the controller, sampled once at the start of the cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// Time since the previous cycle.
    ///
    /// Units: seconds
    pub dt_s: f64,

    /// Latched input channel positions.
    pub sticks: StickInputs,

    /// Age of the most recent valid receiver frame.
    ///
    /// Units: seconds
    pub radio_frame_age_s: f64,

    /// Most recent navigation estimate.
    pub nav: NavEstimate,

    /// Current guidance demand.
    pub guide: GuideOutput,

    /// Latched reading of the forward range finder.
    pub front_range: RangeReading,

    /// Most recent battery voltage.
    ///
    /// Units: volts
    pub battery_volts: f64,

    /// True if the board has raised a fault outside the controller's view.
    pub external_fault: bool,

    /// Number of consecutive cycle overruns reported by the executive.
    pub num_consec_overruns: u64,
}

/// Output demands that the executive must write to the actuator channels.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct OutputData {
    /// Steering demand in [-1, +1], positive right.
    pub steering: f64,

    /// Thrust demand in [-1, +1], positive forward.
    pub thrust: f64,
}

/// Status report for controller processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    pub mode: Mode,
    pub armed: bool,

    /// The loaded parameters failed validation.
    pub bad_config: bool,

    // Failsafe conditions, true while the condition is active
    pub radio_loss: bool,
    pub battery_low: bool,
    pub external_fault: bool,
    pub nav_fault: bool,
    pub overrun: bool,

    /// An obstacle inside the stop range forced thrust to zero.
    pub obstacle_stop: bool,

    /// Avoidance steering bias applied this cycle, zero when no obstacle is
    /// inside the avoidance band.
    ///
    /// Units: radians
    pub avoidance_bias_rad: f64,

    /// The steering demand hit the output clamp.
    pub steering_limited: bool,

    /// The thrust demand hit the output clamp.
    pub thrust_limited: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl StatusReport {
    /// Pack the report into a compact word for telemetry polling.
    ///
    /// Bits 0-1 carry the mode, the remaining bits are individual flags.
    pub fn status_word(&self) -> u32 {
        let mut word = match self.mode {
            Mode::Locked => 0,
            Mode::Manual => 1,
            Mode::Auto => 2,
            Mode::Failsafe => 3,
        };

        let flags = [
            self.armed,
            self.bad_config,
            self.radio_loss,
            self.battery_low,
            self.external_fault,
            self.nav_fault,
            self.overrun,
            self.obstacle_stop,
            self.avoidance_bias_rad != 0.0,
        ];

        for (i, flag) in flags.iter().enumerate() {
            if *flag {
                word |= 1 << (i + 2);
            }
        }

        word
    }
}

impl Module for CtrlMgr {
    type InitData = &'static str;
    type InitError = CtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = CtrlError;

    /// Initialise the CtrlMgr module.
    ///
    /// Expected init data is the path to the parameter file. A parameter
    /// file whose values fail validation is reported and leaves the
    /// controller permanently in Locked, it is not an init error.
    fn init(&mut self, init_data: Self::InitData, session: &Session) -> Result<(), CtrlError> {
        let params: Params = params::load(init_data)?;
        *self = Self::with_params(params);

        self.arch_report = Archiver::from_path(session, "ctrl/status_report.csv")
            .map_err(|e| CtrlError::InvalidConfig(format!("archive setup failed: {}", e)))?;
        self.arch_output = Archiver::from_path(session, "ctrl/output.csv")
            .map_err(|e| CtrlError::InvalidConfig(format!("archive setup failed: {}", e)))?;
        self.arch_init = true;

        if !self.config_ok {
            warn!("CtrlMgr parameters invalid, controller will stay in Locked");
        }

        Ok(())
    }

    /// Perform one control cycle.
    ///
    /// All equipment values were latched into `input` at cycle start, so an
    /// interrupt-context sensor update mid-cycle cannot tear the data seen
    /// here. No allocation happens on this path.
    fn proc(&mut self, input: &InputData) -> Result<(OutputData, StatusReport), CtrlError> {
        // Clear the per-cycle parts of the status report
        self.report = StatusReport {
            bad_config: !self.config_ok,
            ..StatusReport::default()
        };

        let was_locked = self.mode == Mode::Locked;

        self.update_failsafe(input);
        self.update_arming(input);
        self.update_mode_select(input);

        // The sticks are still parked in the arm gesture on the cycle the
        // vehicle is released, so don't pass them through until next cycle
        let released_this_cycle = was_locked && self.mode == Mode::Manual;

        let output = match self.mode {
            Mode::Manual if released_this_cycle => OutputData::default(),
            Mode::Manual => self.calc_manual(input),
            Mode::Auto => self.calc_auto(input)?,
            Mode::Locked | Mode::Failsafe => {
                // Outputs stay neutral and the loops stay reset while the
                // vehicle is not released
                self.pid_str.reset();
                self.pid_thr.reset();
                OutputData::default()
            }
        };

        let output = self.enforce_limits(output);

        trace!(
            "CtrlMgr output: str {:.3} thr {:.3} ({:?})",
            output.steering,
            output.thrust,
            self.mode
        );

        self.report.mode = self.mode;
        self.report.armed = self.armed;
        self.output = output;

        Ok((output, self.report))
    }
}

impl Archived for CtrlMgr {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.arch_init {
            return Ok(());
        }

        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

impl CtrlMgr {
    /// Build a controller directly from a parameter struct.
    ///
    /// Used by `init` once the parameter file is loaded, and by tests and
    /// the sim harness which have no parameter directory.
    pub fn with_params(params: Params) -> Self {
        let config_ok = match params.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Controller configuration rejected: {}", e);
                false
            }
        };

        Self {
            arming: ArmingMechanism::new(params.arming),
            pid_str: BlockPidDfb::new(params.str_pid),
            pid_thr: BlockPid::new(params.thr_pid),
            config_ok,
            params,
            mode: Mode::Locked,
            armed: false,
            last_good_nav: NavEstimate::default(),
            num_consec_nav_faults: 0,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            output: OutputData::default(),
            arch_output: Archiver::default(),
            arch_init: false,
        }
    }

    /// The current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// True while the vehicle is armed.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Evaluate the failsafe conditions and transition in or out of
    /// Failsafe accordingly.
    fn update_failsafe(&mut self, input: &InputData) {
        // Nav fault accounting. A single invalid estimate is tolerated (the
        // last good one is substituted), a sustained fault is not.
        if input.nav.valid {
            self.last_good_nav = input.nav;
            self.num_consec_nav_faults = 0;
        } else {
            self.num_consec_nav_faults = self.num_consec_nav_faults.saturating_add(1);
        }

        self.report.radio_loss = input.radio_frame_age_s > self.params.failsafe_timeout_s;
        self.report.battery_low = input.battery_volts < self.params.battery_low_volts;
        self.report.external_fault = input.external_fault;
        self.report.nav_fault = self.num_consec_nav_faults > self.params.nav_fault_cycle_limit;
        self.report.overrun = input.num_consec_overruns >= self.params.overrun_cycle_limit;

        let any_cause = self.report.radio_loss
            || self.report.battery_low
            || self.report.external_fault
            || self.report.nav_fault
            || self.report.overrun;

        if any_cause && self.mode != Mode::Failsafe {
            warn!(
                "Entering failsafe (radio_loss: {}, battery_low: {}, external_fault: {}, \
                 nav_fault: {}, overrun: {})",
                self.report.radio_loss,
                self.report.battery_low,
                self.report.external_fault,
                self.report.nav_fault,
                self.report.overrun
            );
            self.enter_safe_mode(Mode::Failsafe);
        } else if !any_cause && self.mode == Mode::Failsafe {
            info!("Failsafe causes cleared, re-arm to release the vehicle");
            self.enter_safe_mode(Mode::Locked);
        }
    }

    /// Update the arming gesture detector and apply any transition.
    fn update_arming(&mut self, input: &InputData) {
        // Arming is refused outright in failsafe
        if self.mode == Mode::Failsafe {
            self.arming.reset();
            return;
        }

        let event = self.arming.update(
            input.sticks.thrust_pos,
            input.sticks.steering_pos,
            input.dt_s,
        );

        match event {
            // Repeating the gesture while already armed is a no-op
            Some(ArmingEvent::Arm) if !self.armed => {
                if !self.config_ok {
                    warn!("Arm gesture refused: configuration invalid");
                } else if self.report.radio_loss {
                    warn!("Arm gesture refused: radio unhealthy");
                } else {
                    info!("Arm gesture detected, vehicle armed");
                    self.armed = true;
                    self.mode = Mode::Manual;
                }
            }
            Some(ArmingEvent::Arm) => (),
            Some(ArmingEvent::Disarm) => {
                if self.armed {
                    info!("Disarm gesture detected, vehicle locked");
                    self.enter_safe_mode(Mode::Locked);
                }
            }
            None => (),
        }
    }

    /// Switch between Manual and Auto on the mode channel and the mission
    /// state.
    fn update_mode_select(&mut self, input: &InputData) {
        match self.mode {
            Mode::Manual => {
                if input.sticks.mode_pos > self.params.auto_threshold
                    && input.guide.mission_valid
                {
                    info!("Mode channel high and mission valid, entering Auto");
                    // Fresh loops so no stale integrator acts on the first
                    // auto cycle
                    self.pid_str.reset();
                    self.pid_thr.reset();
                    self.mode = Mode::Auto;
                }
            }
            Mode::Auto => {
                if input.sticks.mode_pos < self.params.auto_threshold {
                    info!("Mode channel low, returning to Manual");
                    self.mode = Mode::Manual;
                } else if !input.guide.mission_valid {
                    info!("Mission ended, returning to Manual");
                    self.mode = Mode::Manual;
                }
            }
            Mode::Locked | Mode::Failsafe => (),
        }
    }

    /// Drop into a non-driving mode, neutralising outputs and resetting the
    /// loops.
    fn enter_safe_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.armed = false;
        self.pid_str.reset();
        self.pid_thr.reset();
        self.output = OutputData::default();
    }

    /// Clamp the demands and apply the thrust deadband.
    fn enforce_limits(&mut self, output: OutputData) -> OutputData {
        let steering = clamp(&output.steering, &-1f64, &1f64);
        if steering != output.steering {
            self.report.steering_limited = true;
        }

        let mut thrust = clamp(&output.thrust, &-1f64, &1f64);
        if thrust != output.thrust {
            self.report.thrust_limited = true;
        }

        if thrust.abs() < self.params.thrust_deadband {
            thrust = 0f64;
        }

        OutputData { steering, thrust }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::RangeReading;
    use crate::pid::PidParams;
    use util::maths::deg_to_rad;

    const DT: f64 = 0.02;

    fn test_pid_params() -> PidParams {
        PidParams {
            p: 0.5,
            i: 0.1,
            d: 0.05,
            i_max: 0.5,
            y_max: 1.0,
            f_cut_hz: 0.0,
        }
    }

    fn test_params() -> Params {
        Params {
            str_pid: test_pid_params(),
            thr_pid: test_pid_params(),
            ..Params::default()
        }
    }

    /// An input with all equipment healthy and the sticks at rest.
    fn healthy_input() -> InputData {
        InputData {
            dt_s: DT,
            battery_volts: 7.4,
            nav: NavEstimate {
                valid: true,
                ..NavEstimate::default()
            },
            ..InputData::default()
        }
    }

    /// Hold the arm gesture until the controller releases the vehicle.
    fn arm(ctrl: &mut CtrlMgr) {
        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = -1.0;

        for _ in 0..25 {
            ctrl.proc(&input).unwrap();
        }

        assert_eq!(ctrl.mode(), Mode::Manual);
        assert!(ctrl.is_armed());
    }

    /// Arm and switch into Auto with a valid mission.
    fn arm_into_auto(ctrl: &mut CtrlMgr) {
        arm(ctrl);

        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        ctrl.proc(&input).unwrap();

        assert_eq!(ctrl.mode(), Mode::Auto);
    }

    #[test]
    fn test_arm_gesture_releases_vehicle() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        assert_eq!(ctrl.mode(), Mode::Locked);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = -1.0;

        // The outputs on every cycle up to and including the release must
        // be neutral, even though the steering stick is hard left
        for _ in 0..25 {
            let (output, _) = ctrl.proc(&input).unwrap();
            assert_eq!(output.steering, 0.0);
            assert_eq!(output.thrust, 0.0);
        }

        assert_eq!(ctrl.mode(), Mode::Manual);
        assert!(ctrl.is_armed());
    }

    #[test]
    fn test_arm_is_idempotent() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = -1.0;

        // Keep holding the gesture well past the debounce window
        for _ in 0..100 {
            ctrl.proc(&input).unwrap();
            assert_eq!(ctrl.mode(), Mode::Manual);
            assert!(ctrl.is_armed());
        }
    }

    #[test]
    fn test_disarm_gesture_locks_vehicle() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = 1.0;

        for _ in 0..25 {
            ctrl.proc(&input).unwrap();
        }

        assert_eq!(ctrl.mode(), Mode::Locked);
        assert!(!ctrl.is_armed());
    }

    #[test]
    fn test_manual_passthrough() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.steering_pos = 0.7;
        input.sticks.thrust_pos = 0.3;
        input.sticks.fwd_rev_pos = 1.0;

        let (output, _) = ctrl.proc(&input).unwrap();
        assert_eq!(output.steering, 0.7);
        assert_eq!(output.thrust, 0.3);
    }

    #[test]
    fn test_manual_forward_reverse_switch() {
        let mut params = test_params();
        params.use_forward_reverse_switch = true;
        let mut ctrl = CtrlMgr::with_params(params);
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.3;
        input.sticks.fwd_rev_pos = -1.0;

        let (output, _) = ctrl.proc(&input).unwrap();
        assert_eq!(output.thrust, -0.3);

        // Switch disabled: thrust is passed through unchanged
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);
        let (output, _) = ctrl.proc(&input).unwrap();
        assert_eq!(output.thrust, 0.3);
    }

    #[test]
    fn test_thrust_deadband() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.05;

        let (output, _) = ctrl.proc(&input).unwrap();
        assert_eq!(output.thrust, 0.0);

        input.sticks.thrust_pos = -0.09;
        let (output, _) = ctrl.proc(&input).unwrap();
        assert_eq!(output.thrust, 0.0);
    }

    #[test]
    fn test_auto_tracks_guidance() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        // Switch into Auto on this same cycle, so the loops run from a
        // clean reset with no derivative history
        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        input.guide.heading_error_rad = 0.4;
        input.guide.ground_speed_cmd_ms = 2.0;
        input.nav.ground_speed_ms = 1.0;
        input.front_range = RangeReading::Echo {
            dist_mm: 1000.0,
            age_s: 0.0,
        };

        let (output, report) = ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Auto);

        // P of 0.5 on 0.4 rad plus one cycle of integral
        assert!((output.steering - 0.2008).abs() < 1e-12);
        // Speed error of 1 m/s: P gives 0.5, the integral 0.002
        assert!((output.thrust - 0.502).abs() < 1e-12);
        assert_eq!(report.avoidance_bias_rad, 0.0);
        assert!(!report.obstacle_stop);
    }

    #[test]
    fn test_auto_obstacle_stop() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        input.guide.ground_speed_cmd_ms = 2.0;
        input.front_range = RangeReading::Echo {
            dist_mm: 50.0,
            age_s: 0.0,
        };

        let (output, report) = ctrl.proc(&input).unwrap();
        assert_eq!(output.thrust, 0.0);
        assert!(report.obstacle_stop);
    }

    #[test]
    fn test_auto_obstacle_deviation() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        input.guide.heading_error_rad = 0.4;
        input.front_range = RangeReading::Echo {
            dist_mm: 375.0,
            age_s: 0.0,
        };

        let (output, report) = ctrl.proc(&input).unwrap();

        // Halfway into the band the deviation is 97.5 degrees, which takes
        // the steering demand onto the clamp
        assert!((report.avoidance_bias_rad - deg_to_rad(97.5)).abs() < 1e-12);
        assert_eq!(output.steering, 1.0);
        assert!(report.steering_limited);
    }

    #[test]
    fn test_auto_deviation_ramp_monotonic() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        let mut prev_bias = std::f64::INFINITY;
        let mut dist_mm = 100.0;
        while dist_mm < 650.0 {
            let mut input = healthy_input();
            input.sticks.mode_pos = 1.0;
            input.guide.mission_valid = true;
            input.front_range = RangeReading::Echo { dist_mm, age_s: 0.0 };

            let (_, report) = ctrl.proc(&input).unwrap();

            assert!(report.avoidance_bias_rad <= prev_bias);
            assert!(report.avoidance_bias_rad >= deg_to_rad(15.0));
            assert!(report.avoidance_bias_rad <= deg_to_rad(180.0));

            prev_bias = report.avoidance_bias_rad;
            dist_mm += 10.0;
        }
    }

    #[test]
    fn test_auto_no_override_outside_band() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        for range in [
            RangeReading::Echo {
                dist_mm: 650.0,
                age_s: 0.0,
            },
            RangeReading::Echo {
                dist_mm: 2000.0,
                age_s: 0.0,
            },
            RangeReading::NoEcho,
            // A stale echo inside the band counts as no echo
            RangeReading::Echo {
                dist_mm: 300.0,
                age_s: 0.5,
            },
        ]
        .iter()
        {
            let mut input = healthy_input();
            input.sticks.mode_pos = 1.0;
            input.guide.mission_valid = true;
            input.front_range = *range;

            let (_, report) = ctrl.proc(&input).unwrap();
            assert_eq!(report.avoidance_bias_rad, 0.0);
            assert!(!report.obstacle_stop);
        }
    }

    #[test]
    fn test_auto_returns_to_manual() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        // Mission end drops back to Manual
        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = false;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Manual);

        // And so does a low mode channel
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);
        let mut input = healthy_input();
        input.sticks.mode_pos = -1.0;
        input.guide.mission_valid = true;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Manual);
    }

    #[test]
    fn test_radio_loss_failsafe() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.steering_pos = 0.7;
        input.sticks.thrust_pos = 0.5;
        input.radio_frame_age_s = 0.75;

        let (output, report) = ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Failsafe);
        assert!(!ctrl.is_armed());
        assert_eq!(output.steering, 0.0);
        assert_eq!(output.thrust, 0.0);
        assert!(report.radio_loss);
    }

    #[test]
    fn test_failsafe_clears_to_locked() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.radio_frame_age_s = 1.0;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Failsafe);

        // Radio recovers: back to Locked, not to Manual
        let input = healthy_input();
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Locked);
        assert!(!ctrl.is_armed());
    }

    #[test]
    fn test_cannot_arm_in_failsafe() {
        let mut ctrl = CtrlMgr::with_params(test_params());

        let mut input = healthy_input();
        input.radio_frame_age_s = 1.0;
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = -1.0;

        for _ in 0..50 {
            ctrl.proc(&input).unwrap();
            assert_eq!(ctrl.mode(), Mode::Failsafe);
            assert!(!ctrl.is_armed());
        }
    }

    #[test]
    fn test_battery_low_failsafe() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.battery_volts = 6.0;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Failsafe);
    }

    #[test]
    fn test_overrun_failsafe() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm(&mut ctrl);

        let mut input = healthy_input();
        input.num_consec_overruns = 2;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Manual);

        input.num_consec_overruns = 3;
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Failsafe);
    }

    #[test]
    fn test_sustained_nav_fault_failsafe() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        input.nav.valid = false;

        // Tolerated up to the cycle limit...
        for _ in 0..25 {
            ctrl.proc(&input).unwrap();
            assert_eq!(ctrl.mode(), Mode::Auto);
        }

        // ...and failsafe one cycle later
        ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.mode(), Mode::Failsafe);
    }

    #[test]
    fn test_locked_outputs_neutral() {
        let mut ctrl = CtrlMgr::with_params(test_params());

        let mut input = healthy_input();
        input.sticks.steering_pos = 0.9;
        input.sticks.thrust_pos = 0.9;

        for _ in 0..10 {
            let (output, _) = ctrl.proc(&input).unwrap();
            assert_eq!(output.steering, 0.0);
            assert_eq!(output.thrust, 0.0);
        }
    }

    #[test]
    fn test_bad_config_refuses_arming() {
        let mut params = test_params();
        params.str_pid.p = std::f64::NAN;
        let mut ctrl = CtrlMgr::with_params(params);

        let mut input = healthy_input();
        input.sticks.thrust_pos = 0.0;
        input.sticks.steering_pos = -1.0;

        for _ in 0..50 {
            let (_, report) = ctrl.proc(&input).unwrap();
            assert_eq!(ctrl.mode(), Mode::Locked);
            assert!(report.bad_config);
        }
    }

    #[test]
    fn test_status_word() {
        let report = StatusReport::default();
        assert_eq!(report.status_word(), 0);

        let report = StatusReport {
            mode: Mode::Failsafe,
            radio_loss: true,
            ..StatusReport::default()
        };
        assert_eq!(report.status_word(), 3 | (1 << 4));

        let report = StatusReport {
            mode: Mode::Auto,
            armed: true,
            obstacle_stop: true,
            ..StatusReport::default()
        };
        assert_eq!(report.status_word(), 2 | (1 << 2) | (1 << 9));
    }

    #[test]
    fn test_invalid_timestep_rejected_in_auto() {
        let mut ctrl = CtrlMgr::with_params(test_params());
        arm_into_auto(&mut ctrl);

        let mut input = healthy_input();
        input.sticks.mode_pos = 1.0;
        input.guide.mission_valid = true;
        input.dt_s = 0.0;

        assert!(ctrl.proc(&input).is_err());
    }
}

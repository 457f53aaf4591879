//! # Data Store

use crate::ctrl;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Elapsed simulation/control time, counted in whole cycles
    pub sim_time_s: f64,

    // CtrlMgr
    pub ctrl: ctrl::CtrlMgr,
    pub ctrl_input: ctrl::InputData,
    pub ctrl_output: ctrl::OutputData,
    pub ctrl_status_rpt: ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_period_s: f64) {
        let cycle_frequency_hz = 1.0 / cycle_period_s;
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.ctrl_input = ctrl::InputData::default();
        self.ctrl_output = ctrl::OutputData::default();
        self.ctrl_status_rpt = ctrl::StatusReport::default();

        self.sim_time_s = self.num_cycles as f64 * cycle_period_s;
    }
}

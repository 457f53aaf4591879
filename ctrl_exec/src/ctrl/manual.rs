//! Manual mode control law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{CtrlMgr, InputData, OutputData};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CtrlMgr {
    /// Perform the manual mode calculations.
    ///
    /// The stick positions pass straight through to the demands. When the
    /// forward/reverse switch feature is enabled and the switch channel is
    /// low, the thrust demand is inverted so that pulling back on the stick
    /// drives the vehicle in reverse.
    pub(crate) fn calc_manual(&mut self, input: &InputData) -> OutputData {
        let mut thrust = input.sticks.thrust_pos;

        if self.params.use_forward_reverse_switch && input.sticks.fwd_rev_pos < 0.0 {
            thrust = -thrust;
        }

        OutputData {
            steering: input.sticks.steering_pos,
            thrust,
        }
    }
}

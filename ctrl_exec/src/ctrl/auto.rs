//! Auto mode control law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::{CtrlError, CtrlMgr, InputData, OutputData};
use util::maths::deg_to_rad;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CtrlMgr {
    /// Perform the auto mode calculations.
    ///
    /// The steering loop tracks the guidance heading error, damped by the
    /// measured yaw rate; the thrust loop tracks the guidance ground speed.
    /// The obstacle override then acts on the loop outputs rather than on
    /// their inputs, so the integrators never wind up against an avoidance
    /// bias which is not an error signal.
    pub(crate) fn calc_auto(&mut self, input: &InputData) -> Result<OutputData, CtrlError> {
        // Substitute the last good estimate while the navigator reports a
        // fault. If the fault persists past one cycle stop feeding the
        // stale yaw rate into the steering loop's derivative.
        let nav = if input.nav.valid {
            input.nav
        } else {
            self.last_good_nav
        };
        let yaw_rate_rads = if self.num_consec_nav_faults > 1 {
            0f64
        } else {
            nav.yaw_rate_rads
        };

        let mut steering =
            self.pid_str
                .update(input.guide.heading_error_rad, yaw_rate_rads, input.dt_s)?;

        // Reverse in auto is undefined, never command a negative speed
        let speed_cmd_ms = input.guide.ground_speed_cmd_ms.max(0.0);
        let mut thrust = self
            .pid_thr
            .update(speed_cmd_ms - nav.ground_speed_ms, input.dt_s)?;

        // Obstacle overrides: drive around whatever is in front, and if
        // there is no room left to do that, stop
        if let Some(dist_mm) = input.front_range.distance_mm(self.params.range_ttl_s) {
            if dist_mm < self.params.range_stop_mm {
                thrust = 0f64;
                self.report.obstacle_stop = true;
            } else if dist_mm < self.params.range_avoid_mm {
                // Deviation angle ramps linearly from the max at the stop
                // range down to the min at the edge of the avoidance band.
                // The sign convention is a fixed rightward deviation.
                let frac = (dist_mm - self.params.range_stop_mm)
                    / (self.params.range_avoid_mm - self.params.range_stop_mm);
                let bias_deg = self.params.avoid_min_deg
                    + (self.params.avoid_max_deg - self.params.avoid_min_deg) * (1.0 - frac);
                let bias_rad = deg_to_rad(bias_deg);

                steering += bias_rad;
                self.report.avoidance_bias_rad = bias_rad;
            }
        }

        Ok(OutputData { steering, thrust })
    }
}

//! Simulated waypoint guidance

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::info;
use nalgebra::Vector2;

// Internal
use super::{SimParams, VehicleModel};
use crate::eqpt::{Guide, GuideOutput};
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simple waypoint-chasing guidance.
///
/// Produces the heading error towards the current waypoint and a constant
/// speed command. Waypoints are consumed in order as the vehicle arrives at
/// each; once the list is exhausted the mission is reported invalid.
pub struct SimGuide {
    waypoints: Vec<Vector2<f64>>,
    current: usize,
    speed_cmd_ms: f64,
    arrive_radius_m: f64,
    latched: GuideOutput,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimGuide {
    /// Create the guidance from the sim parameters.
    pub fn new(params: &SimParams) -> Self {
        Self {
            waypoints: params
                .waypoints
                .iter()
                .map(|w| Vector2::new(w[0], w[1]))
                .collect(),
            current: 0,
            speed_cmd_ms: params.speed_cmd_ms,
            arrive_radius_m: params.arrive_radius_m,
            latched: GuideOutput::default(),
        }
    }

    /// Refresh the latched demand from the current vehicle state.
    pub fn latch(&mut self, model: &VehicleModel) {
        // Consume any waypoint the vehicle has arrived at
        while self.current < self.waypoints.len() {
            let to_wp = self.waypoints[self.current] - model.position_m();
            if to_wp.norm() > self.arrive_radius_m {
                break;
            }

            info!(
                "Waypoint {} of {} reached",
                self.current + 1,
                self.waypoints.len()
            );
            self.current += 1;
        }

        if self.current >= self.waypoints.len() {
            self.latched = GuideOutput {
                heading_error_rad: 0f64,
                ground_speed_cmd_ms: 0f64,
                mission_valid: false,
            };
            return;
        }

        let to_wp = self.waypoints[self.current] - model.position_m();
        let bearing_rad = to_wp[1].atan2(to_wp[0]);

        self.latched = GuideOutput {
            heading_error_rad: wrap_pi(bearing_rad - model.heading_rad()),
            ground_speed_cmd_ms: self.speed_cmd_ms,
            mission_valid: true,
        };
    }
}

impl Guide for SimGuide {
    fn output(&self) -> GuideOutput {
        self.latched
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> SimParams {
        SimParams {
            wheelbase_m: 0.26,
            max_speed_ms: 5.0,
            max_steer_rad: 0.5,
            speed_tau_s: 0.4,
            battery_volts: 7.4,
            rf_max_range_mm: 4000.0,
            obstacle: vec![],
            waypoints: vec![[0.0, 5.0]],
            speed_cmd_ms: 2.0,
            arrive_radius_m: 0.5,
        }
    }

    #[test]
    fn test_heading_error_to_waypoint() {
        let params = params();
        let model = VehicleModel::new(&params);
        let mut guide = SimGuide::new(&params);

        guide.latch(&model);
        let out = guide.output();

        // Waypoint due +y from a vehicle heading +x: error is +90 degrees
        assert!(out.mission_valid);
        assert!((out.heading_error_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(out.ground_speed_cmd_ms, 2.0);
    }

    #[test]
    fn test_empty_mission_invalid() {
        let mut params = params();
        params.waypoints = vec![];

        let model = VehicleModel::new(&params);
        let mut guide = SimGuide::new(&params);

        guide.latch(&model);
        assert!(!guide.output().mission_valid);
    }
}

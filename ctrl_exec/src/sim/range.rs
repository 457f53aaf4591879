//! Simulated range finder

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::{Obstacle, SimParams, VehicleModel};
use crate::eqpt::{RangeFinder, RangeReading, RfOrientation};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated single-beam range finder.
///
/// Casts a ray from the vehicle along the sensor's mounting direction and
/// reports the distance to the nearest obstacle circle it hits, out to the
/// sensor's maximum range.
pub struct SimRangeFinder {
    orientation: RfOrientation,
    obstacles: Vec<Obstacle>,
    max_range_mm: f64,
    latched: RangeReading,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimRangeFinder {
    /// Create the forward-facing range finder.
    pub fn forward(params: &SimParams) -> Self {
        Self {
            orientation: RfOrientation { x: 1, y: 0, z: 0 },
            obstacles: params.obstacle.clone(),
            max_range_mm: params.rf_max_range_mm,
            latched: RangeReading::NoEcho,
        }
    }

    /// Refresh the latched reading from the current vehicle state.
    pub fn latch(&mut self, model: &VehicleModel) {
        let origin = model.position_m();
        let heading = model.heading_rad();
        let dir = Vector2::new(heading.cos(), heading.sin());

        let mut nearest_m: Option<f64> = None;

        for ob in self.obstacles.iter() {
            let to_centre = Vector2::new(ob.x_m, ob.y_m) - origin;

            // Along-ray distance of the closest approach to the centre
            let along_m = to_centre.dot(&dir);
            if along_m <= 0.0 {
                continue;
            }

            let perp_sq = to_centre.norm_squared() - along_m * along_m;
            let radius_sq = ob.radius_m * ob.radius_m;
            if perp_sq > radius_sq {
                continue;
            }

            let hit_m = along_m - (radius_sq - perp_sq).sqrt();
            if hit_m <= 0.0 {
                continue;
            }

            nearest_m = Some(match nearest_m {
                Some(d) if d < hit_m => d,
                _ => hit_m,
            });
        }

        self.latched = match nearest_m {
            Some(d) if d * 1000.0 <= self.max_range_mm => RangeReading::Echo {
                dist_mm: d * 1000.0,
                age_s: 0.0,
            },
            _ => RangeReading::NoEcho,
        };
    }
}

impl RangeFinder for SimRangeFinder {
    fn read(&mut self) -> RangeReading {
        self.latched
    }

    fn orientation(&self) -> RfOrientation {
        self.orientation
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params_with_obstacle() -> SimParams {
        SimParams {
            wheelbase_m: 0.26,
            max_speed_ms: 5.0,
            max_steer_rad: 0.5,
            speed_tau_s: 0.4,
            battery_volts: 7.4,
            rf_max_range_mm: 4000.0,
            obstacle: vec![Obstacle {
                x_m: 2.0,
                y_m: 0.0,
                radius_m: 0.5,
            }],
            waypoints: vec![],
            speed_cmd_ms: 2.0,
            arrive_radius_m: 0.5,
        }
    }

    #[test]
    fn test_obstacle_ahead() {
        let params = params_with_obstacle();
        let model = VehicleModel::new(&params);
        let mut rf = SimRangeFinder::forward(&params);

        rf.latch(&model);

        // Vehicle at the origin heading +x, the obstacle edge is 1.5 m out
        match rf.read() {
            RangeReading::Echo { dist_mm, .. } => {
                assert!((dist_mm - 1500.0).abs() < 1.0);
            }
            RangeReading::NoEcho => panic!("expected an echo"),
        }
    }

    #[test]
    fn test_obstacle_behind_is_ignored() {
        let mut params = params_with_obstacle();
        params.obstacle[0].x_m = -2.0;

        let model = VehicleModel::new(&params);
        let mut rf = SimRangeFinder::forward(&params);

        rf.latch(&model);
        assert!(matches!(rf.read(), RangeReading::NoEcho));
    }

    #[test]
    fn test_out_of_range_is_no_echo() {
        let mut params = params_with_obstacle();
        params.obstacle[0].x_m = 10.0;

        let model = VehicleModel::new(&params);
        let mut rf = SimRangeFinder::forward(&params);

        rf.latch(&model);
        assert!(matches!(rf.read(), RangeReading::NoEcho));
    }

    #[test]
    fn test_forward_orientation() {
        let params = params_with_obstacle();
        let rf = SimRangeFinder::forward(&params);
        assert!(rf.orientation().is_forward());
    }
}

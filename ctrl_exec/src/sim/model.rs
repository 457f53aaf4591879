//! Kinematic vehicle model

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use super::SimParams;
use crate::eqpt::{NavEstimate, Navigator};
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A kinematic bicycle model of the car.
///
/// The drivetrain is a first-order lag from the thrust demand to ground
/// speed, and the yaw rate follows from the front wheel angle through the
/// bicycle approximation. Good enough to close the control loops against,
/// nothing more.
pub struct VehicleModel {
    wheelbase_m: f64,
    max_speed_ms: f64,
    max_steer_rad: f64,
    speed_tau_s: f64,

    /// Position in the world frame.
    ///
    /// Units: meters
    position_m: Vector2<f64>,

    /// Heading in the world frame, wrapped into [-pi, +pi].
    ///
    /// Units: radians
    heading_rad: f64,

    /// Ground speed along the body forward axis.
    ///
    /// Units: meters/second
    speed_ms: f64,

    /// Body yaw rate.
    ///
    /// Units: radians/second
    yaw_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleModel {
    /// Create a model at rest at the world origin, heading along +x.
    pub fn new(params: &SimParams) -> Self {
        Self {
            wheelbase_m: params.wheelbase_m,
            max_speed_ms: params.max_speed_ms,
            max_steer_rad: params.max_steer_rad,
            speed_tau_s: params.speed_tau_s,
            position_m: Vector2::zeros(),
            heading_rad: 0f64,
            speed_ms: 0f64,
            yaw_rate_rads: 0f64,
        }
    }

    /// Integrate one timestep with the given normalised actuator demands.
    pub fn step(&mut self, steering: f64, thrust: f64, dt_s: f64) {
        // Drivetrain lag towards the demanded speed
        let target_speed_ms = thrust * self.max_speed_ms;
        let alpha = dt_s / (dt_s + self.speed_tau_s);
        self.speed_ms += alpha * (target_speed_ms - self.speed_ms);

        // Bicycle model yaw response
        let steer_rad = steering * self.max_steer_rad;
        self.yaw_rate_rads = self.speed_ms * steer_rad.tan() / self.wheelbase_m;

        self.heading_rad = wrap_pi(self.heading_rad + self.yaw_rate_rads * dt_s);

        self.position_m += Vector2::new(
            self.heading_rad.cos() * self.speed_ms * dt_s,
            self.heading_rad.sin() * self.speed_ms * dt_s,
        );
    }

    /// Position in the world frame in meters.
    pub fn position_m(&self) -> Vector2<f64> {
        self.position_m
    }

    /// Heading in the world frame in radians.
    pub fn heading_rad(&self) -> f64 {
        self.heading_rad
    }
}

impl Navigator for VehicleModel {
    fn estimate(&self) -> NavEstimate {
        NavEstimate {
            yaw_rate_rads: self.yaw_rate_rads,
            ground_speed_ms: self.speed_ms,
            heading_rad: self.heading_rad,
            valid: true,
        }
    }
}

//! Parameters structure for the simulation stack

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::SimError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A circular obstacle in the world frame.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Obstacle {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,

    /// Units: meters
    pub radius_m: f64,
}

/// Parameters for the simulated vehicle and world.
#[derive(Clone, Debug, Deserialize)]
pub struct SimParams {
    // ---- VEHICLE ----

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Ground speed at full thrust.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    /// Front wheel angle at full steering deflection.
    ///
    /// Units: radians
    pub max_steer_rad: f64,

    /// Time constant of the drivetrain's speed response.
    ///
    /// Units: seconds
    pub speed_tau_s: f64,

    /// Battery voltage at the start of the run.
    ///
    /// Units: volts
    pub battery_volts: f64,

    // ---- RANGE FINDER ----

    /// Maximum range of the forward range finder.
    ///
    /// Units: millimeters
    pub rf_max_range_mm: f64,

    // ---- WORLD ----

    /// Obstacles in the world.
    #[serde(default)]
    pub obstacle: Vec<Obstacle>,

    // ---- MISSION ----

    /// Waypoints of the mission, in order, as [x, y] pairs.
    ///
    /// Units: meters
    pub waypoints: Vec<[f64; 2]>,

    /// Commanded ground speed between waypoints.
    ///
    /// Units: meters/second
    pub speed_cmd_ms: f64,

    /// A waypoint is reached once the vehicle is within this distance.
    ///
    /// Units: meters
    pub arrive_radius_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SimParams {
    /// Check the parameters are usable.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.wheelbase_m <= 0.0 {
            return Err(SimError::InvalidParams(format!(
                "wheelbase_m must be positive, got {}",
                self.wheelbase_m
            )));
        }

        if self.max_speed_ms <= 0.0 {
            return Err(SimError::InvalidParams(format!(
                "max_speed_ms must be positive, got {}",
                self.max_speed_ms
            )));
        }

        if self.speed_tau_s <= 0.0 {
            return Err(SimError::InvalidParams(format!(
                "speed_tau_s must be positive, got {}",
                self.speed_tau_s
            )));
        }

        if self.arrive_radius_m <= 0.0 {
            return Err(SimError::InvalidParams(format!(
                "arrive_radius_m must be positive, got {}",
                self.arrive_radius_m
            )));
        }

        Ok(())
    }
}

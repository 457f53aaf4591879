//! Simulated equipment stack
//!
//! Implements the equipment interfaces against a simple kinematic vehicle
//! model, so the executable can run end-to-end without any hardware
//! attached. The stack is driven by the executive: actuator pulses written
//! through the radio channels feed the model on the next cycle, and the
//! model in turn feeds the simulated navigation, guidance and range-finder
//! outputs.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod guide;
mod model;
mod params;
mod radio;
mod range;
mod scenario;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use guide::*;
pub use model::*;
pub use params::*;
pub use radio::*;
pub use range::*;
pub use scenario::*;

use crate::eqpt::PowerMonitor;
use crate::radio::RadioParams;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur in the simulation stack.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid simulation parameters: {0}")]
    InvalidParams(String),

    #[error("Could not find the scenario at {0}")]
    ScenarioNotFound(String),

    #[error("Could not load the scenario: {0}")]
    ScenarioLoadError(std::io::Error),

    #[error("Could not parse the scenario: {0}")]
    ScenarioParseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Simulated battery monitor.
pub struct SimPower {
    volts: f64,
}

/// The complete simulated equipment stack.
pub struct SimEqpt {
    pub model: VehicleModel,
    pub radio: SimRadio,
    pub range_finders: Vec<SimRangeFinder>,
    pub guide: SimGuide,
    pub power: SimPower,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PowerMonitor for SimPower {
    fn battery_voltage(&self) -> f64 {
        self.volts
    }
}

impl SimPower {
    pub fn set_voltage(&mut self, volts: f64) {
        self.volts = volts;
    }
}

impl SimEqpt {
    /// Build the simulated equipment from the sim and radio parameters.
    pub fn new(params: &SimParams, radio_params: &RadioParams) -> Result<Self, SimError> {
        params.validate()?;

        Ok(Self {
            model: VehicleModel::new(params),
            radio: SimRadio::new(*radio_params),
            range_finders: vec![SimRangeFinder::forward(params)],
            guide: SimGuide::new(params),
            power: SimPower {
                volts: params.battery_volts,
            },
        })
    }

    /// Advance the simulation by one cycle.
    ///
    /// The vehicle model integrates the actuator pulses written on the
    /// previous cycle, then the sensor latches are refreshed from the new
    /// vehicle state.
    pub fn step(&mut self, dt_s: f64) {
        let steering = self.radio.actuator_position(crate::radio::ChannelId::Steering);
        let thrust = self.radio.actuator_position(crate::radio::ChannelId::Thrust);

        self.model.step(steering, thrust, dt_s);
        self.radio.step(dt_s);

        for rf in self.range_finders.iter_mut() {
            rf.latch(&self.model);
        }
        self.guide.latch(&self.model);
    }
}

//! Scenario player for simulated runs
//!
//! A scenario is a TOML file containing a list of timed events which drive
//! the simulated transmitter and fault injection during a run, plus the
//! duration of the run. After initialising with the path to the scenario
//! use `.pending` each cycle to acquire the events that are now due.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

// Internal
use super::SimError;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
///
/// Every field except the time is optional, an event only touches what it
/// names.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Event {
    /// The time the event is supposed to execute at.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// New steering stick position.
    pub steering: Option<f64>,

    /// New thrust stick position.
    pub thrust: Option<f64>,

    /// New mode channel position.
    pub mode: Option<f64>,

    /// New forward/reverse channel position.
    pub fwd_rev: Option<f64>,

    /// Lose (true) or regain (false) the transmitter signal.
    pub signal_lost: Option<bool>,

    /// New battery voltage.
    pub battery_volts: Option<f64>,

    /// Raise (true) or clear (false) the external fault flag.
    pub external_fault: Option<bool>,
}

/// File representation of a scenario.
#[derive(Debug, Deserialize)]
struct ScenarioFile {
    /// Total duration of the run.
    ///
    /// Units: seconds
    duration_s: f64,

    #[serde(default)]
    event: Vec<Event>,
}

/// A scenario player.
pub struct Scenario {
    _scenario_path: PathBuf,
    duration_s: f64,
    events: VecDeque<Event>,
}

/// Events which are due this cycle.
pub enum PendingEvents {
    None,
    Some(Vec<Event>),
    EndOfScenario,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Scenario {
    /// Create a new player from the given scenario path.
    pub fn new<P: AsRef<Path>>(scenario_path: P) -> Result<Self, SimError> {
        let path = PathBuf::from(scenario_path.as_ref());

        if !path.exists() {
            return Err(SimError::ScenarioNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let scenario_str = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(SimError::ScenarioLoadError(e)),
        };

        let file: ScenarioFile = match toml::from_str(&scenario_str) {
            Ok(f) => f,
            Err(e) => return Err(SimError::ScenarioParseError(e)),
        };

        // Events are sorted so that out-of-order scenario files still play
        // back in time order
        let mut events = file.event;
        events.sort_by(|a, b| a.time_s.partial_cmp(&b.time_s).unwrap());

        Ok(Self {
            _scenario_path: path,
            duration_s: file.duration_s,
            events: events.into(),
        })
    }

    /// Return the events now due, or `EndOfScenario` once the duration has
    /// elapsed.
    pub fn pending(&mut self, time_s: f64) -> PendingEvents {
        if time_s >= self.duration_s {
            return PendingEvents::EndOfScenario;
        }

        let mut due: Vec<Event> = vec![];

        while self
            .events
            .front()
            .map(|e| e.time_s <= time_s)
            .unwrap_or(false)
        {
            due.push(self.events.pop_front().unwrap());
        }

        if !due.is_empty() {
            PendingEvents::Some(due)
        } else {
            PendingEvents::None
        }
    }

    /// Get the number of events remaining in the scenario.
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the duration of the scenario in seconds.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }
}

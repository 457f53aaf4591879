//! Main control executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop at the control rate:
//!         - Scenario event handling
//!         - Equipment stepping and input acquisition
//!         - Controller processing
//!         - Actuator output
//!         - Archive writing and cycle management
//!
//! The controller itself is host-agnostic: it sees one input snapshot per
//! cycle and produces one pair of actuator demands. This executable hosts it
//! against the simulated equipment stack, a flight build would host it
//! against the hardware drivers instead.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use ctrl_lib::{
    ctrl::InputData,
    data_store::DataStore,
    eqpt::{Guide, Navigator, PowerMonitor, RadioIo, RangeFinder, RangeReading},
    radio::{ChannelId, RadioBank, RadioParams},
    sim::{PendingEvents, Scenario, SimEqpt, SimParams},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::Module,
    archive::Archived,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("ctrl_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("RC Car Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- INITIALISE SCENARIO ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the scenario path, otherwise
    // fall back to the demo scenario in the repository
    let scenario_path = match args.len() {
        2 => std::path::PathBuf::from(&args[1]),
        1 => {
            let mut path = util::host::get_sw_root()
                .wrap_err("Could not determine the software root")?;
            path.push("scenarios");
            path.push("demo.toml");

            info!("No scenario provided, using {:?}", path);
            path
        }
        _ => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                args.len() - 1
            ))
        }
    };

    let mut scenario = Scenario::new(&scenario_path).wrap_err("Failed to load scenario")?;

    // Display some info
    info!(
        "Loaded scenario lasts {:.02} s and contains {} events\n",
        scenario.duration_s(),
        scenario.num_events()
    );

    // ---- LOAD PARAMETERS ----

    let radio_params: RadioParams =
        util::params::load("radio.toml").wrap_err("Could not load radio params")?;

    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.ctrl.init("ctrl.toml", &session)
        .wrap_err("Failed to initialise CtrlMgr")?;
    info!("CtrlMgr init complete");

    let mut radio_bank = RadioBank::new(&radio_params)
        .wrap_err("Failed to initialise the radio channels")?;
    info!("RadioBank init complete");

    // ---- INITIALISE EQUIPMENT ----

    let mut eqpt = SimEqpt::new(&sim_params, &radio_params)
        .wrap_err("Failed to initialise the simulated equipment")?;

    // The controller tracks the forward-looking range finder only, pick it
    // out once here
    let front_rf_index = eqpt
        .range_finders
        .iter()
        .position(|rf| rf.orientation().is_forward());
    if front_rf_index.is_none() {
        warn!("No forward range finder fitted, obstacle avoidance inactive");
    }

    info!("Equipment initialisation complete\n");

    // External fault flag, raised and cleared by scenario events
    let mut external_fault = false;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_PERIOD_S);

        // ---- SCENARIO EVENT HANDLING ----

        match scenario.pending(ds.sim_time_s) {
            PendingEvents::None => (),
            PendingEvents::Some(events) => {
                for event in events.iter() {
                    debug!("Scenario event at {:.02} s: {:?}", ds.sim_time_s, event);

                    if let Some(pos) = event.steering {
                        eqpt.radio.set_stick(ChannelId::Steering, pos);
                    }
                    if let Some(pos) = event.thrust {
                        eqpt.radio.set_stick(ChannelId::Thrust, pos);
                    }
                    if let Some(pos) = event.mode {
                        eqpt.radio.set_stick(ChannelId::Mode, pos);
                    }
                    if let Some(pos) = event.fwd_rev {
                        eqpt.radio.set_stick(ChannelId::FwdRev, pos);
                    }
                    if let Some(lost) = event.signal_lost {
                        eqpt.radio.set_signal_lost(lost);
                    }
                    if let Some(volts) = event.battery_volts {
                        eqpt.power.set_voltage(volts);
                    }
                    if let Some(fault) = event.external_fault {
                        external_fault = fault;
                    }
                }
            }
            // Exit if end of scenario reached
            PendingEvents::EndOfScenario => {
                info!("End of scenario reached, stopping");
                break;
            }
        }

        // ---- DATA INPUT ----

        // Advance the simulated world by one cycle, then latch everything
        // the controller needs into its input snapshot
        eqpt.step(CYCLE_PERIOD_S);

        radio_bank.read_inputs(&eqpt.radio);

        let front_range = match front_rf_index {
            Some(i) => eqpt.range_finders[i].read(),
            None => RangeReading::NoEcho,
        };

        ds.ctrl_input = InputData {
            dt_s: CYCLE_PERIOD_S,
            sticks: radio_bank.stick_inputs(),
            radio_frame_age_s: eqpt.radio.frame_age_s(),
            nav: eqpt.model.estimate(),
            guide: eqpt.guide.output(),
            front_range,
            battery_volts: eqpt.power.battery_voltage(),
            external_fault,
            num_consec_overruns: ds.num_consec_cycle_overruns,
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        match ds.ctrl.proc(&ds.ctrl_input) {
            Ok((o, r)) => {
                ds.ctrl_output = o;
                ds.ctrl_status_rpt = r;
            }
            Err(e) => {
                // A controller error neutralises the outputs for this cycle,
                // the vehicle must never keep driving on stale demands
                warn!("Error during CtrlMgr processing: {}", e);
                ds.ctrl_output = Default::default();
            }
        };

        // ---- ACTUATOR OUTPUT ----

        if let Err(e) = radio_bank.set_position(
            ChannelId::Steering,
            ds.ctrl_output.steering,
            &mut eqpt.radio,
        ) {
            warn!("Could not write the steering demand: {}", e);
        }
        if let Err(e) =
            radio_bank.set_position(ChannelId::Thrust, ds.ctrl_output.thrust, &mut eqpt.radio)
        {
            warn!("Could not write the thrust demand: {}", e);
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.ctrl.write() {
            warn!("Could not write the controller archives: {}", e);
        }

        // ---- MONITORING ----

        if ds.is_1_hz_cycle {
            info!(
                "[{:7.02} s] {:?} str {:+.03} thr {:+.03} pos ({:+.02}, {:+.02}) m",
                ds.sim_time_s,
                ds.ctrl_status_rpt.mode,
                ds.ctrl_output.steering,
                ds.ctrl_output.thrust,
                eqpt.model.position_m()[0],
                eqpt.model.position_m()[1],
            );
        }

        // The run also ends early once the mission is flown out and the
        // vehicle has come to rest
        if !eqpt.guide.output().mission_valid
            && eqpt.model.estimate().ground_speed_ms.abs() < 0.01
            && ds.num_cycles > 50
        {
            info!("Mission complete, stopping");
            break;
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    // Leave a machine-readable summary of the run next to the archives
    let summary = serde_json::json!({
        "num_cycles": ds.num_cycles as u64,
        "final_mode": format!("{:?}", ds.ctrl_status_rpt.mode),
        "status_word": ds.ctrl_status_rpt.status_word(),
        "final_position_m": [
            eqpt.model.position_m()[0],
            eqpt.model.position_m()[1],
        ],
    });

    let mut summary_path = session.session_root.clone();
    summary_path.push("run_summary.json");
    std::fs::write(
        &summary_path,
        serde_json::to_string_pretty(&summary).wrap_err("Could not serialise the run summary")?,
    )
    .wrap_err("Could not write the run summary")?;

    info!("End of execution");

    Ok(())
}

//! Main console executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Operator input acquisition (gamepad or input script)
//!         - Telemetry channel drain
//!         - LED control processing
//!         - Thrust control processing (gated by the melody override)
//!         - Melody driver processing
//!         - Command dispatch through the rate limiters
//!
//! # Modules
//!
//! All control modules (e.g. `thrust_ctrl`) shall meet the following
//! requirements:
//!     1. Provide a public struct implementing the `util::module::State`
//!        trait.

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use console_lib::{
    data_store::DataStore,
    input::{GamepadSource, InputScript, InputSource},
    led_ctrl, melody_drv, thrust_ctrl,
    tm_client::{self, TmClient, TmUpdate},
    vehicle_client::VehicleClient,
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, trace, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};
use vehicle_if::net::NetParams;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one control cycle.
const CYCLE_PERIOD_S: f64 = 0.05;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("console_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Triton Submersible Operator Console\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams =
        util::params::load("net.toml").wrap_err("Could not load net params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE INPUT SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // If we have a single argument use it as the input script path
    let mut input_source = if args.len() == 2 {
        info!("Loading input script from \"{}\"", &args[1]);

        let script = InputScript::new(&args[1]).wrap_err("Failed to load input script")?;

        // Display some info
        info!(
            "Loaded script lasts {:.02} s and contains {} patches\n",
            script.get_duration(),
            script.get_num_patches()
        );

        InputSource::Script(script)
    }
    // If no arguments sample a connected gamepad
    else if args.len() == 1 {
        info!("No script provided, a connected gamepad will be used\n");

        InputSource::Gamepad(
            GamepadSource::new().wrap_err("Failed to initialise the gamepad source")?,
        )
    } else {
        return Err(eyre!(
            "Expected either zero or one argument, found {}",
            args.len() - 1
        ));
    };

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.thrust_ctrl
        .init("thrust_ctrl.toml", &session)
        .wrap_err("Failed to initialise ThrustCtrl")?;
    info!("ThrustCtrl init complete");

    ds.melody_drv
        .init("melody_drv.toml", &session)
        .wrap_err("Failed to initialise MelodyDrv")?;
    info!("MelodyDrv init complete");

    ds.led_ctrl
        .init("led_ctrl.toml", &session)
        .wrap_err("Failed to initialise LedCtrl")?;
    info!("LedCtrl init complete");

    info!("Module initialisation complete\n");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let mut vehicle_client =
        VehicleClient::new(&net_params).wrap_err("Failed to initialise the VehicleClient")?;
    info!("VehicleClient initialised");

    let tm_client = TmClient::new(&net_params);
    info!("TmClient initialised");

    // One-shot connectivity checks, the console runs on regardless of the
    // results.
    match tm_client::test_api(&net_params) {
        Ok(r) => info!("Control API reachable: {}", r.message),
        Err(e) => warn!("Control API test failed: {}", e),
    }

    match tm_client::test_serial(&net_params, true) {
        Ok(r) if r.connected => info!(
            "Vehicle serial link up on {}",
            r.port.unwrap_or_else(|| String::from("unknown port"))
        ),
        Ok(_) => warn!("Vehicle serial link is down"),
        Err(e) => warn!("Serial link test failed: {}", e),
    }

    info!("Video stream available at {}", net_params.stream_url());
    info!("Network initialisation complete");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut last_status = String::new();

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- INPUT ACQUISITION ----

        match input_source.sample() {
            Some(input) => ds.update_input(input),
            None => {
                info!("End of input script reached, stopping");
                break;
            }
        }

        // ---- TELEMETRY ----

        while let Some(update) = tm_client.try_recv() {
            apply_tm(&mut ds, update);
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        // LedCtrl processing. The LED lifecycle is independent of motor
        // activation.
        match ds.led_ctrl.proc(&led_ctrl::InputData {
            toggle: ds.pad.illum,
            slider: ds.led_slider,
        }) {
            Ok((o, r)) => {
                ds.led_ctrl_output = o;
                ds.led_ctrl_status_rpt = r;
            }
            Err(e) => warn!("Error during LedCtrl processing: {}", e),
        }

        // While the melody override is in effect the drive arbitration must
        // not touch the demand vector.
        let melody_idle = !ds.melody_drv.is_active();

        // ThrustCtrl processing
        if melody_idle {
            match ds.thrust_ctrl.proc(&thrust_ctrl::InputData {
                pad: ds.pad,
                motors_active: ds.motors_active,
            }) {
                Ok((o, r)) => {
                    ds.thrust_ctrl_output = o;
                    ds.thrust_ctrl_status_rpt = r;
                }
                Err(e) => {
                    // A bad pad sample only costs this cycle, the vector
                    // stays at the stationary reset.
                    warn!("Error during ThrustCtrl processing: {}", e)
                }
            }
        }

        // MelodyDrv processing. The pitch reference is thruster 0 as it
        // stands at this point in the cycle.
        let pitch_ref_us = if melody_idle {
            ds.thrust_ctrl_output.dems.pulse_us[0]
        } else {
            ds.last_dems.pulse_us[0]
        };

        match ds.melody_drv.proc(&melody_drv::InputData {
            trigger: ds.pad.melody,
            motors_active: ds.motors_active,
            pitch_ref_us,
            now: Instant::now(),
        }) {
            Ok((o, r)) => {
                ds.melody_drv_output = o;
                ds.melody_drv_status_rpt = r;
            }
            Err(e) => warn!("Error during MelodyDrv processing: {}", e),
        }

        // ---- COMMAND DISPATCH ----

        if let Some(brightness) = ds.led_ctrl_output {
            if vehicle_client.dispatch_led(brightness) {
                info!("LED brightness set to {}%", brightness);
            }
        }

        if let Some(dems) = ds.melody_drv_output {
            // A fired note owns the vector for this cycle
            if vehicle_client.dispatch_dems(&dems) {
                ds.last_dems = dems;
            }
        } else if ds.melody_drv_status_rpt.overriding {
            // Playback holds the vector between notes, nothing to send
        } else if ds.motors_active {
            let output = ds.thrust_ctrl_output;

            if output.urgent {
                // Boost bypasses the gate
                vehicle_client.dispatch_dems_now(&output.dems);
                ds.last_dems = output.dems;
            } else if vehicle_client.dispatch_dems(&output.dems) {
                ds.last_dems = output.dems;
            }
        } else if ds.pending_stop {
            // Deactivation: keep offering the stop until it clears the gate
            let stop = ds.thrust_ctrl_output.dems;

            if vehicle_client.dispatch_dems(&stop) {
                ds.last_dems = stop;
                ds.pending_stop = false;
            }
        }

        // ---- STATUS REPORTING ----

        if ds.melody_drv_status_rpt.completed {
            info!("Melody playback complete");
        }

        if let Some(event) = ds.melody_drv_status_rpt.fired {
            debug!(
                "Playing {:.0} Hz for {} ms",
                event.freq_hz, event.duration_ms
            );
        }

        let label = if let Some(event) = ds.melody_drv_status_rpt.fired {
            Some(format!("Melody {}", event))
        } else if !ds.melody_drv_status_rpt.overriding && !ds.melody_drv_status_rpt.completed {
            Some(format!("{}", ds.thrust_ctrl_status_rpt.mode))
        } else {
            None
        };

        if let Some(label) = label {
            if label != last_status {
                info!("Status: {}", label);
                last_status = label;
            }
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
                    cycle_dur.as_secs_f64()
                        - Duration::from_secs_f64(CYCLE_PERIOD_S).as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    info!("End of execution");

    Ok(())
}

/// Fold one telemetry update into the data store.
///
/// Unlike the command path, fetch errors are surfaced here.
fn apply_tm(ds: &mut DataStore, update: TmUpdate) {
    match update {
        TmUpdate::System(Ok(tm)) => {
            debug!(
                "System: CPU {} C, RAM {:.0}%, load {:.2}, disk {:.0}%",
                tm.cpu_temperature, tm.ram_usage, tm.load_system, tm.disk_space
            );
            ds.system_info = Some(tm);
        }
        TmUpdate::System(Err(e)) => warn!("Could not fetch system info: {}", e),

        TmUpdate::Camera(Ok(tm)) => {
            debug!("Camera: {}", tm.message);
            ds.camera_status = Some(tm);
        }
        TmUpdate::Camera(Err(e)) => warn!("Could not fetch camera status: {}", e),

        TmUpdate::Orientation(Ok(tm)) => {
            if let Some(att) = tm.data {
                trace!(
                    "Attitude: roll {:.1} pitch {:.1} yaw {:.1}",
                    att.roll,
                    att.pitch,
                    att.yaw
                );
            }
            ds.orientation = Some(tm);
        }
        TmUpdate::Orientation(Err(e)) => warn!("Could not fetch orientation: {}", e),

        TmUpdate::Serial(Ok(tm)) => {
            if !tm.connected {
                warn!("Vehicle serial link is down");
            }
            ds.serial_report = Some(tm);
        }
        TmUpdate::Serial(Err(e)) => warn!("Could not fetch serial link status: {}", e),
    }
}

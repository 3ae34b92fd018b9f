//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;

use crate::{
    input::{ConsoleInput, PadSnapshot},
    led_ctrl, melody_drv, thrust_ctrl,
};
use vehicle_if::{
    eqpt::thrusters::ThrusterDems,
    tm::{CameraStatus, OrientationReport, SerialReport, SystemInfo},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
///
/// All session state lives here explicitly, there are no ambient globals.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // Activation state
    /// True while the activation control is held. No thruster demand other
    /// than all-stationary may be produced while this is false.
    pub motors_active: bool,

    /// True while a deactivation stop command still has to make it through
    /// the dispatch gate.
    pub pending_stop: bool,

    // Operator input
    /// The pad state sampled this cycle.
    pub pad: PadSnapshot,

    /// New LED slider position, if the operator moved it this cycle.
    pub led_slider: Option<u8>,

    // ThrustCtrl
    pub thrust_ctrl: thrust_ctrl::ThrustCtrl,
    pub thrust_ctrl_output: thrust_ctrl::OutputData,
    pub thrust_ctrl_status_rpt: thrust_ctrl::StatusReport,

    // MelodyDrv
    pub melody_drv: melody_drv::MelodyDrv,
    pub melody_drv_output: Option<ThrusterDems>,
    pub melody_drv_status_rpt: melody_drv::StatusReport,

    // LedCtrl
    pub led_ctrl: led_ctrl::LedCtrl,
    pub led_ctrl_output: Option<u8>,
    pub led_ctrl_status_rpt: led_ctrl::StatusReport,

    /// The demands most recently handed to the vehicle client. Thruster 0 of
    /// this vector is the melody driver's pitch reference.
    pub last_dems: ThrusterDems,

    // Latest telemetry
    pub system_info: Option<SystemInfo>,
    pub camera_status: Option<CameraStatus>,
    pub orientation: Option<OrientationReport>,
    pub serial_report: Option<SerialReport>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle. The
    /// pending stop flag survives until the stop command actually passes the
    /// dispatch gate.
    pub fn cycle_start(&mut self) {
        self.led_slider = None;

        self.thrust_ctrl_output = thrust_ctrl::OutputData::default();
        self.thrust_ctrl_status_rpt = thrust_ctrl::StatusReport::default();
        self.melody_drv_output = None;
        self.melody_drv_status_rpt = melody_drv::StatusReport::default();
        self.led_ctrl_output = None;
    }

    /// Take this cycle's operator input, tracking the activation edges.
    pub fn update_input(&mut self, input: ConsoleInput) {
        let was_active = self.motors_active;

        self.pad = input.pad;
        self.led_slider = input.led_slider;
        self.motors_active = input.pad.activate;

        if self.motors_active && !was_active {
            info!("Motors active");
            self.pending_stop = false;
        }
        if was_active && !self.motors_active {
            info!("Motors stopped");
            self.pending_stop = true;
        }
    }
}

//! Implementations for the ThrustCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use std::fmt;

// Internal
use super::{Params, ThrustCtrlError};
use crate::input::PadSnapshot;
use util::{module::State, params, session::Session};
use vehicle_if::eqpt::thrusters::{ThrusterDems, ThrusterSide};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Thrust control module state
#[derive(Default)]
pub struct ThrustCtrl {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,

    pub(crate) output: Option<OutputData>,
}

/// Input data to Thrust Control.
#[derive(Clone, Copy, Default)]
pub struct InputData {
    /// The pad state sampled at the start of this cycle.
    pub pad: PadSnapshot,

    /// True while the activation control is held.
    pub motors_active: bool,
}

/// Output demands from ThrustCtrl that the vehicle client must dispatch.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct OutputData {
    /// Demanded pulse widths for all eight thrusters.
    pub dems: ThrusterDems,

    /// True if the demands must bypass the dispatch gate (boost).
    pub urgent: bool,
}

/// Status report for ThrustCtrl processing.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct StatusReport {
    /// The driving mode which won arbitration this cycle.
    pub mode: DriveMode,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The driving mode selected by one arbitration pass.
///
/// Exactly one mode wins per cycle. Boost is evaluated after the
/// drive/rotate arbitration and overrides the demands it produced.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub enum DriveMode {
    /// Motors are not active, all thrusters stationary.
    Stopped,

    /// Motors active but no control deflected.
    Waiting,

    /// Straight ahead under the forward trigger.
    Forward { pct: u8 },

    /// Rotating in place about the vehicle's vertical axis.
    Rotate { toward: ThrusterSide, pct: u8 },

    /// All thrusters at the boost pulse.
    Boost,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for StatusReport {
    fn default() -> Self {
        StatusReport {
            mode: DriveMode::Stopped,
        }
    }
}

impl fmt::Display for DriveMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DriveMode::Stopped => write!(f, "Stopped"),
            DriveMode::Waiting => write!(f, "Waiting"),
            DriveMode::Forward { pct } => write!(f, "Forward ({}%)", pct),
            DriveMode::Rotate {
                toward: ThrusterSide::Port,
                pct,
            } => write!(f, "Rotating to port ({}%)", pct),
            DriveMode::Rotate {
                toward: ThrusterSide::Starboard,
                pct,
            } => write!(f, "Rotating to starboard ({}%)", pct),
            DriveMode::Boost => write!(f, "BOOST (100%)"),
        }
    }
}

impl State for ThrustCtrl {
    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = ThrustCtrlError;

    /// Initialise the ThrustCtrl module from its parameter file.
    fn init(
        &mut self,
        param_file: &'static str,
        _session: &Session,
    ) -> Result<(), params::LoadError> {
        // Load the parameters
        self.params = params::load(param_file)?;

        Ok(())
    }

    /// Perform cyclic processing of Thrust Control.
    ///
    /// The demand vector is reset wholesale to stationary at the start of
    /// every pass, then selectively overwritten by the winning mode.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        let mut dems = ThrusterDems::stationary();

        // While the motors are not active the only permitted demand is
        // all-stationary.
        if !input_data.motors_active {
            let output = OutputData {
                dems,
                urgent: false,
            };
            self.output = Some(output);
            return Ok((output, self.report));
        }

        // A pad driver handing back NaN would otherwise propagate into the
        // demands unnoticed.
        for v in [input_data.pad.forward, input_data.pad.turn].iter() {
            if !v.is_finite() {
                return Err(ThrustCtrlError::NonFiniteSample(*v));
            }
        }

        // Arbitration: first match wins
        if input_data.pad.forward > self.params.dead_zone {
            self.calc_drive(input_data.pad.forward, &mut dems);
        } else if input_data.pad.turn.abs() > self.params.dead_zone {
            self.calc_rotate(input_data.pad.turn, &mut dems);
        } else {
            self.report.mode = DriveMode::Waiting;
        }

        // Boost overrides whatever the arbitration produced for this cycle.
        // It does not touch the activation state.
        let mut urgent = false;
        if input_data.pad.boost {
            dems.set_uniform(self.params.boost_pulse_us);
            self.report.mode = DriveMode::Boost;
            urgent = true;
        }

        trace!("ThrustCtrl output: {:?} ({})", dems.pulse_us, self.report.mode);

        let output = OutputData { dems, urgent };
        self.output = Some(output);

        Ok((output, self.report))
    }
}

impl ThrustCtrl {
    /// Build a module with the given parameters, skipping the parameter file
    /// load. Used by the tests.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use vehicle_if::eqpt::thrusters::{NUM_THRUSTERS, PULSE_STATIONARY_US};

    fn ctrl() -> ThrustCtrl {
        ThrustCtrl::with_params(Params {
            dead_zone: 0.1,
            drive_pulse_range_us: [1000.0, 2000.0],
            rotate_pulse_range_us: [1000.0, 1500.0],
            boost_pulse_us: 2000.0,
        })
    }

    fn active_input(pad: PadSnapshot) -> InputData {
        InputData {
            pad,
            motors_active: true,
        }
    }

    #[test]
    fn test_inactive_is_stationary() {
        let mut ctrl = ctrl();
        let pad = PadSnapshot {
            forward: 1.0,
            turn: 1.0,
            boost: true,
            ..Default::default()
        };

        let (output, report) = ctrl
            .proc(&InputData {
                pad,
                motors_active: false,
            })
            .unwrap();

        assert!(output.dems.is_stationary());
        assert!(!output.urgent);
        assert_eq!(report.mode, DriveMode::Stopped);
    }

    #[test]
    fn test_forward_uniform_over_trigger_range() {
        let mut ctrl = ctrl();

        for t in [0.11, 0.25, 0.5, 0.77, 1.0].iter() {
            let pad = PadSnapshot {
                forward: *t,
                ..Default::default()
            };
            let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

            let expected = (1000.0 + t * 1000.0).round() as u16;
            assert!(expected >= 1000 && expected <= 2000);
            assert_eq!(output.dems.pulse_us, [expected; NUM_THRUSTERS]);
            assert_eq!(
                report.mode,
                DriveMode::Forward {
                    pct: (t * 100.0).round() as u8
                }
            );
        }
    }

    #[test]
    fn test_rotate_drives_one_side_only() {
        let mut ctrl = ctrl();

        // Turn to starboard: port thrusters drive, starboard stay stationary
        let pad = PadSnapshot {
            turn: 0.6,
            ..Default::default()
        };
        let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

        let expected = (1000.0_f64 + 0.6 * 500.0).round() as u16;
        for i in ThrusterSide::Port.idxs().iter() {
            assert_eq!(output.dems.pulse_us[*i], expected);
        }
        for i in ThrusterSide::Starboard.idxs().iter() {
            assert_eq!(output.dems.pulse_us[*i], PULSE_STATIONARY_US);
        }
        assert_eq!(
            report.mode,
            DriveMode::Rotate {
                toward: ThrusterSide::Starboard,
                pct: 60
            }
        );

        // Mirror for a turn to port
        let pad = PadSnapshot {
            turn: -0.6,
            ..Default::default()
        };
        let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

        for i in ThrusterSide::Starboard.idxs().iter() {
            assert_eq!(output.dems.pulse_us[*i], expected);
        }
        for i in ThrusterSide::Port.idxs().iter() {
            assert_eq!(output.dems.pulse_us[*i], PULSE_STATIONARY_US);
        }
        assert_eq!(
            report.mode,
            DriveMode::Rotate {
                toward: ThrusterSide::Port,
                pct: 60
            }
        );
    }

    #[test]
    fn test_forward_takes_priority_over_rotate() {
        let mut ctrl = ctrl();
        let pad = PadSnapshot {
            forward: 0.5,
            turn: 0.9,
            ..Default::default()
        };

        let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

        assert_eq!(output.dems.pulse_us, [1500; NUM_THRUSTERS]);
        assert_eq!(report.mode, DriveMode::Forward { pct: 50 });
    }

    #[test]
    fn test_dead_zone_is_waiting() {
        let mut ctrl = ctrl();
        let pad = PadSnapshot {
            forward: 0.1,
            turn: -0.1,
            ..Default::default()
        };

        let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

        assert!(output.dems.is_stationary());
        assert_eq!(report.mode, DriveMode::Waiting);
    }

    #[test]
    fn test_boost_overrides_drive_and_rotate() {
        let mut ctrl = ctrl();
        let pad = PadSnapshot {
            forward: 0.5,
            turn: -0.9,
            boost: true,
            ..Default::default()
        };

        let (output, report) = ctrl.proc(&active_input(pad)).unwrap();

        assert_eq!(output.dems.pulse_us, [2000; NUM_THRUSTERS]);
        assert!(output.urgent);
        assert_eq!(report.mode, DriveMode::Boost);
    }

    #[test]
    fn test_non_finite_sample_rejected() {
        let mut ctrl = ctrl();
        let pad = PadSnapshot {
            forward: std::f64::NAN,
            ..Default::default()
        };

        assert!(ctrl.proc(&active_input(pad)).is_err());
    }
}

//! Implementations for the LedCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::{LedCtrlError, Params};
use util::{module::State, params, session::Session};
use vehicle_if::eqpt::led::{is_on, LED_BRIGHTNESS_MAX};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// LED control module state
#[derive(Default)]
pub struct LedCtrl {
    pub(crate) params: Params,

    /// Current brightness in percent.
    brightness: u8,

    /// Toggle control state on the previous cycle, for edge detection.
    prev_toggle: bool,

    pub(crate) report: StatusReport,
}

/// Input data to LED control.
#[derive(Clone, Copy, Default)]
pub struct InputData {
    /// True while the toggle control is held.
    pub toggle: bool,

    /// New slider brightness, if the operator moved the slider this cycle.
    pub slider: Option<u8>,
}

/// Status report for LedCtrl processing.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct StatusReport {
    /// Current brightness in percent.
    pub brightness: u8,

    /// Derived on/off state.
    pub on: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for LedCtrl {
    type InputData = InputData;
    type OutputData = Option<u8>;
    type StatusReport = StatusReport;
    type ProcError = LedCtrlError;

    /// Initialise the LedCtrl module from its parameter file.
    fn init(
        &mut self,
        param_file: &'static str,
        _session: &Session,
    ) -> Result<(), params::LoadError> {
        // Load the parameters
        self.params = params::load(param_file)?;

        Ok(())
    }

    /// Perform cyclic processing of LED control.
    ///
    /// Produces the brightness to dispatch when it changed this cycle,
    /// `None` otherwise.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut dispatch = None;

        // Slider moves set the brightness directly
        if let Some(slider) = input_data.slider {
            self.brightness = slider.min(LED_BRIGHTNESS_MAX);
            dispatch = Some(self.brightness);
        }

        // Rising edge of the toggle control flips between off and the fixed
        // high brightness, not a ramp.
        if input_data.toggle && !self.prev_toggle {
            self.brightness = if self.brightness == 0 {
                self.params.toggle_brightness
            } else {
                0
            };
            dispatch = Some(self.brightness);
        }
        self.prev_toggle = input_data.toggle;

        self.report = StatusReport {
            brightness: self.brightness,
            on: is_on(self.brightness),
        };

        Ok((dispatch, self.report))
    }
}

impl LedCtrl {
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

    fn ctrl() -> LedCtrl {
        LedCtrl::with_params(Params {
            toggle_brightness: 100,
        })
    }

    #[test]
    fn test_toggle_on_off() {
        let mut ctrl = ctrl();

        // First press: off -> 100
        let (dispatch, report) = ctrl
            .proc(&InputData {
                toggle: true,
                slider: None,
            })
            .unwrap();
        assert_eq!(dispatch, Some(100));
        assert!(report.on);

        // Held: no new dispatch
        let (dispatch, _) = ctrl
            .proc(&InputData {
                toggle: true,
                slider: None,
            })
            .unwrap();
        assert_eq!(dispatch, None);

        // Release then press again: 100 -> 0
        ctrl.proc(&InputData::default()).unwrap();
        let (dispatch, report) = ctrl
            .proc(&InputData {
                toggle: true,
                slider: None,
            })
            .unwrap();
        assert_eq!(dispatch, Some(0));
        assert!(!report.on);
    }

    #[test]
    fn test_slider_sets_brightness() {
        let mut ctrl = ctrl();

        let (dispatch, report) = ctrl
            .proc(&InputData {
                toggle: false,
                slider: Some(40),
            })
            .unwrap();
        assert_eq!(dispatch, Some(40));
        assert!(report.on);

        // Out of range values are clamped, not rejected
        let (dispatch, _) = ctrl
            .proc(&InputData {
                toggle: false,
                slider: Some(250),
            })
            .unwrap();
        assert_eq!(dispatch, Some(100));
    }

    #[test]
    fn test_toggle_after_slider_turns_off() {
        let mut ctrl = ctrl();

        ctrl.proc(&InputData {
            toggle: false,
            slider: Some(40),
        })
        .unwrap();

        let (dispatch, report) = ctrl
            .proc(&InputData {
                toggle: true,
                slider: None,
            })
            .unwrap();
        assert_eq!(dispatch, Some(0));
        assert!(!report.on);
    }
}

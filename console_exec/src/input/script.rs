//! # Console input script interpreter
//!
//! This module provides an interpreter for timed input scripts, allowing the
//! console to be driven without a physical controller (bench testing, link
//! characterisation, demos).
//!
//! A script is a sequence of lines of the form
//!
//! ```text
//! <time_s>: <json patch>;
//! ```
//!
//! where the patch partially updates a persistent virtual pad, e.g.
//!
//! ```text
//! 0.5: {"activate": true};
//! 1.0: {"forward": 0.6};
//! 3.0: {"forward": 0.0, "led": 40};
//! 4.0: {"activate": false};
//! ```
//!
//! The `led` field stands in for the console's brightness slider. Reaching
//! the end of the script ends the run.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use regex::RegexBuilder;
use serde::Deserialize;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use super::{ConsoleInput, PadSnapshot};
use util::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A partial update of the virtual pad, scripted to occur at a specific
/// time. Absent fields leave the pad unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct PadPatch {
    pub activate: Option<bool>,
    pub boost: Option<bool>,
    pub melody: Option<bool>,
    pub illum: Option<bool>,
    pub forward: Option<f64>,
    pub turn: Option<f64>,

    /// LED slider position, standing in for the brightness slider.
    pub led: Option<u8>,
}

/// A patch which is scripted to occur at a specific time.
struct TimedPatch {
    /// The time the patch is supposed to apply at
    exec_time_s: f64,

    /// The patch itself
    patch: PadPatch,
}

/// A console input script interpreter.
///
/// After initialising with the path to the script, call `.sample()` once per
/// cycle to get the current virtual pad state.
pub struct InputScript {
    _script_path: PathBuf,
    patches: VecDeque<TimedPatch>,

    /// The persistent virtual pad the patches mutate.
    pad: PadSnapshot,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0}")]
    ScriptNotFound(String),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)"
    )]
    InvalidTimestamp(String),

    #[error("Script contains an invalid pad patch at {0} s: {1}")]
    InvalidPatch(f64, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputScript {
    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {
        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        // Load the script into a string
        let script = match fs::read_to_string(script_path) {
            Ok(s) => s,
            Err(e) => return Err(ScriptError::ScriptLoadError(e)),
        };

        Self::from_str(&script, path)
    }

    /// Sample the virtual pad, applying any patches that are now due.
    ///
    /// Returns `None` once the script is exhausted.
    pub fn sample(&mut self) -> Option<ConsoleInput> {
        self.sample_at(get_elapsed_seconds())
    }

    /// Get the number of patches in the script
    pub fn get_num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.patches.back() {
            Some(p) => p.exec_time_s,
            None => 0f64,
        }
    }

    /// Parse a script out of a string.
    fn from_str(script: &str, path: PathBuf) -> Result<Self, ScriptError> {
        // Empty queue of patches
        let mut patch_queue: VecDeque<TimedPatch> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .unwrap();

        for cap in re.captures_iter(script) {
            // Parse the exec time
            let exec_time_s: f64 = match cap.get(1).unwrap().as_str().parse() {
                Ok(t) => t,
                Err(e) => return Err(ScriptError::InvalidTimestamp(format!("{}", e))),
            };

            // Parse the patch from the payload. The scripts contain JSON
            // only.
            let patch: PadPatch = match serde_json::from_str(cap.get(3).unwrap().as_str()) {
                Ok(p) => p,
                Err(e) => return Err(ScriptError::InvalidPatch(exec_time_s, e)),
            };

            patch_queue.push_back(TimedPatch {
                exec_time_s,
                patch,
            });
        }

        if patch_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty);
        }

        Ok(InputScript {
            _script_path: path,
            patches: patch_queue,
            pad: PadSnapshot::default(),
        })
    }

    /// Sample the virtual pad against an explicit clock. Split out from
    /// `sample` so the tests can drive time themselves.
    fn sample_at(&mut self, current_time_s: f64) -> Option<ConsoleInput> {
        // If the queue is empty the script is over
        if self.patches.is_empty() {
            return None;
        }

        let mut led_slider = None;

        // Peek patches from the queue, applying them in order until the exec
        // times are larger than the current time. The last led value due
        // this cycle wins, exactly like a fast slider drag.
        while self
            .patches
            .front()
            .map(|p| p.exec_time_s < current_time_s)
            .unwrap_or(false)
        {
            let timed = self.patches.pop_front().unwrap();
            self.apply(&timed.patch);

            if timed.patch.led.is_some() {
                led_slider = timed.patch.led;
            }
        }

        Some(ConsoleInput {
            pad: self.pad,
            led_slider,
        })
    }

    /// Apply one patch to the virtual pad.
    fn apply(&mut self, patch: &PadPatch) {
        if let Some(v) = patch.activate {
            self.pad.activate = v;
        }
        if let Some(v) = patch.boost {
            self.pad.boost = v;
        }
        if let Some(v) = patch.melody {
            self.pad.melody = v;
        }
        if let Some(v) = patch.illum {
            self.pad.illum = v;
        }
        if let Some(v) = patch.forward {
            self.pad.forward = v;
        }
        if let Some(v) = patch.turn {
            self.pad.turn = v;
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const SCRIPT: &str = r#"
        0.5: {"activate": true};
        1.0: {"forward": 0.6};
        2.0: {"forward": 0.0, "led": 40};
        2.1: {"led": 80};
        3.0: {"activate": false};
    "#;

    fn script() -> InputScript {
        InputScript::from_str(SCRIPT, PathBuf::from("test.tis")).unwrap()
    }

    #[test]
    fn test_parse() {
        let script = script();
        assert_eq!(script.get_num_patches(), 5);
        assert_eq!(script.get_duration(), 3.0);
    }

    #[test]
    fn test_patches_accumulate() {
        let mut script = script();

        // Before anything is due the pad is neutral
        let input = script.sample_at(0.1).unwrap();
        assert_eq!(input.pad, PadSnapshot::default());

        let input = script.sample_at(0.6).unwrap();
        assert!(input.pad.activate);
        assert_eq!(input.pad.forward, 0.0);

        // The forward patch leaves activate untouched
        let input = script.sample_at(1.1).unwrap();
        assert!(input.pad.activate);
        assert_eq!(input.pad.forward, 0.6);
    }

    #[test]
    fn test_last_led_patch_wins() {
        let mut script = script();

        // Jump straight past both led patches, the later one wins
        let input = script.sample_at(2.5).unwrap();
        assert_eq!(input.led_slider, Some(80));

        // Once applied the slider is not re-reported
        let input = script.sample_at(2.6).unwrap();
        assert_eq!(input.led_slider, None);
    }

    #[test]
    fn test_end_of_script() {
        let mut script = script();

        let input = script.sample_at(3.5).unwrap();
        assert!(!input.pad.activate);

        assert!(script.sample_at(3.6).is_none());
    }

    #[test]
    fn test_empty_script_rejected() {
        assert!(matches!(
            InputScript::from_str("# nothing here", PathBuf::from("empty.tis")),
            Err(ScriptError::ScriptEmpty)
        ));
    }

    #[test]
    fn test_bad_patch_rejected() {
        assert!(matches!(
            InputScript::from_str("1.0: {\"forward\": \"fast\"};", PathBuf::from("bad.tis")),
            Err(ScriptError::InvalidPatch(_, _))
        ));
    }
}

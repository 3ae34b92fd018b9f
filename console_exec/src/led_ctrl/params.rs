//! Parameters structure for LedCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for LED control.
#[derive(Debug, Default, Deserialize, Clone, Copy)]
pub struct Params {
    /// Brightness set by the toggle control when turning the LEDs on.
    ///
    /// Units: percent
    pub toggle_brightness: u8,
}

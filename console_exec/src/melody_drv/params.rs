//! Parameters structure for MelodyDrv

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the melody playback driver.
#[derive(Debug, Default, Deserialize, Clone, Copy)]
pub struct Params {
    /// Pause after the final note before playback reports complete.
    ///
    /// Units: milliseconds
    pub end_pause_ms: u64,

    /// Pitch scale applied at the bottom and top of the thruster pulse
    /// range. A vehicle running at half thrust when playback is triggered
    /// plays the tune a quarter above written pitch.
    pub pitch_scale_range: [f64; 2],

    /// Pulse range swept over the course of the melody, [first note, last
    /// note].
    ///
    /// Units: microseconds
    pub sweep_pulse_range_us: [f64; 2],
}

//! Parameters structure for ThrustCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Thrust control.
#[derive(Debug, Default, Deserialize, Clone, Copy)]
pub struct Params {
    // ---- INPUT SHAPING ----

    /// Minimum analogue magnitude below which a trigger or axis is treated
    /// as neutral.
    pub dead_zone: f64,

    // ---- CAPABILITIES ----

    /// Pulse range swept by the forward trigger, [at rest, fully pressed].
    ///
    /// Units: microseconds
    pub drive_pulse_range_us: [f64; 2],

    /// Pulse range swept by the turn axis on the driven side,
    /// [centred, fully deflected].
    ///
    /// Units: microseconds
    pub rotate_pulse_range_us: [f64; 2],

    /// Pulse demanded on all thrusters while the boost control is held.
    ///
    /// Units: microseconds
    pub boost_pulse_us: f64,
}

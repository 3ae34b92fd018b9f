//! Operator input sampling
//!
//! The console takes its input either from a connected game controller or
//! from a timed input script, selected at startup. Both produce the same
//! per-cycle [`ConsoleInput`] sample, so everything downstream of the
//! sampler is source agnostic.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod gamepad;
pub mod script;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use gamepad::{GamepadSource, GamepadSourceError};
pub use script::{InputScript, ScriptError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A read-only sample of the pad state, taken once per control cycle.
///
/// Analogue ranges follow the standard pad mapping: triggers in [0, 1],
/// axes in [-1, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PadSnapshot {
    /// Activation control held (button 0). The motors are active exactly
    /// while this is held.
    pub activate: bool,

    /// Boost control held (button 1).
    pub boost: bool,

    /// Melody playback control held (button 2).
    pub melody: bool,

    /// Illumination toggle control held (button 3).
    pub illum: bool,

    /// Forward thrust trigger (trigger 7), in [0, 1].
    pub forward: f64,

    /// Turn axis (axis 0), in [-1, 1]. Positive is a turn to starboard.
    pub turn: f64,
}

/// One cycle's worth of operator input.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleInput {
    /// The pad state.
    pub pad: PadSnapshot,

    /// New LED slider position, if the operator moved it this cycle.
    pub led_slider: Option<u8>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Sources of operator input for the console.
pub enum InputSource {
    /// A connected game controller.
    Gamepad(GamepadSource),

    /// A timed input script.
    Script(InputScript),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputSource {
    /// Sample the current operator input.
    ///
    /// Returns `None` when a script source reaches the end of its script,
    /// which ends the run. A gamepad source never ends.
    pub fn sample(&mut self) -> Option<ConsoleInput> {
        match self {
            InputSource::Gamepad(gamepad) => Some(gamepad.sample()),
            InputSource::Script(script) => script.sample(),
        }
    }
}

//! Melody playback driver
//!
//! While engaged this module owns the thruster demands, sweeping them from
//! stationary to maximum over the course of a fixed note sequence. The pitch
//! of the reported notes scales with the thruster speed captured at trigger
//! time. Playback is an explicit state machine driven by the control cycle,
//! so cancelling it is a state transition rather than a dangling timer.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod state;
mod theme;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;
pub use theme::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during melody driver operation.
///
/// Playback itself cannot fail, all inputs are clamped into range.
#[derive(Debug, thiserror::Error)]
pub enum MelodyDrvError {}

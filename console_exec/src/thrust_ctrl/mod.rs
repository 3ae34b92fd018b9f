//! Thrust control module
//!
//! Converts the sampled pad state into demands for the eight thrusters, one
//! arbitration pass per control cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_drive;
mod calc_rotate;
mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during ThrustCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum ThrustCtrlError {
    #[error("Pad sample contains a non-finite analogue value ({0})")]
    NonFiniteSample(f64),
}

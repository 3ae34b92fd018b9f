//! LED control module
//!
//! Drives the vehicle's illumination. The LED lifecycle is independent of
//! motor activation: the toggle control and the brightness slider work
//! whether or not the vehicle is armed.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

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

/// Possible errors that can occur during LedCtrl operation.
///
/// Brightness inputs are clamped rather than rejected, so processing cannot
/// fail.
#[derive(Debug, thiserror::Error)]
pub enum LedCtrlError {}

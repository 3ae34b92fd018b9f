//! # Vehicle interface crate.
//!
//! Provides the command and telemetry interfaces of the submersible's HTTP
//! API, as consumed by the operator console.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command and response definitions for equipment (thrusters and LEDs)
pub mod eqpt;

/// Network module
pub mod net;

/// Telemetry payloads returned by the vehicle
pub mod tm;

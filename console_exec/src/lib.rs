//! # Console library.
//!
//! This library allows other crates in the workspace (and the integration
//! tests) to access items defined inside the console crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Global data store for the executable
pub mod data_store;

/// Operator input sampling - gamepad and timed input scripts
pub mod input;

/// LED control module - toggles and sets the vehicle's illumination
pub mod led_ctrl;

/// Melody playback driver - sweeps the thrusters along the theme tune
pub mod melody_drv;

/// Thrust control module - converts operator input into thruster demands
pub mod thrust_ctrl;

/// Telemetry client - polls the vehicle's telemetry endpoints
pub mod tm_client;

/// Vehicle client - sends rate limited commands to the vehicle's control API
pub mod vehicle_client;

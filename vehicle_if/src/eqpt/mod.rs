//! # Equipment interface module
//!
//! Command shapes for the vehicle's controllable equipment.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod led;
pub mod thrusters;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Response returned by the vehicle's control endpoints.
///
/// The console logs these but does not branch on their content.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ControlResponse {
    /// `"success"` or `"error"`
    pub status: String,

    /// The serial command the vehicle forwarded to the thruster board.
    pub command: Option<String>,

    /// The raw response read back over the vehicle's serial link.
    pub response: Option<String>,

    /// Error detail when `status` is `"error"`.
    pub message: Option<String>,
}

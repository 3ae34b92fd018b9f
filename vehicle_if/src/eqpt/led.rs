//! # LED Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Maximum commandable LED brightness.
pub const LED_BRIGHTNESS_MAX: u8 = 100;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Body of a `POST /api/led/control` request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct LedControlRequest {
    /// Brightness in percent, 0 is off.
    pub brightness: u8,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LedControlRequest {
    /// Build a request, clamping the brightness into the commandable range.
    pub fn new(brightness: u8) -> Self {
        Self {
            brightness: brightness.min(LED_BRIGHTNESS_MAX),
        }
    }
}

/// True if the given brightness counts as "on".
pub fn is_on(brightness: u8) -> bool {
    brightness > 0
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_brightness_clamped() {
        assert_eq!(LedControlRequest::new(250).brightness, LED_BRIGHTNESS_MAX);
        assert_eq!(LedControlRequest::new(40).brightness, 40);
    }

    #[test]
    fn test_is_on() {
        assert!(!is_on(0));
        assert!(is_on(1));
        assert!(is_on(100));
    }
}

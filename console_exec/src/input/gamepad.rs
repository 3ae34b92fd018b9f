//! Gamepad input source
//!
//! Samples the state of a connected game controller through gilrs. The pad
//! that most recently produced an event is treated as the operator's pad,
//! matching the behaviour of consoles where several controllers may be
//! plugged in but only one is in use.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use gilrs::{Axis, Button, GamepadId, Gilrs};
use log::{debug, info};
use thiserror::Error;

// Internal
use super::{ConsoleInput, PadSnapshot};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Input source backed by a physical game controller.
pub struct GamepadSource {
    gilrs: Gilrs,

    /// The pad which most recently produced an event.
    active: Option<GamepadId>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised when initialising the gamepad backend.
#[derive(Debug, Error)]
pub enum GamepadSourceError {
    #[error("Could not initialise the gamepad backend: {0}")]
    InitError(String),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GamepadSource {
    /// Initialise the gamepad backend.
    ///
    /// A source is created even if no pad is currently connected, pads may
    /// be plugged in mid-session.
    pub fn new() -> Result<Self, GamepadSourceError> {
        let gilrs = Gilrs::new().map_err(|e| GamepadSourceError::InitError(e.to_string()))?;

        for (_, gamepad) in gilrs.gamepads() {
            info!("Gamepad connected: {}", gamepad.name());
        }

        Ok(Self {
            gilrs,
            active: None,
        })
    }

    /// Sample the current pad state.
    ///
    /// With no pad connected the neutral snapshot is returned, which the
    /// arbitration treats as all controls released.
    pub fn sample(&mut self) -> ConsoleInput {
        // Pump the event queue. The events themselves are not interpreted,
        // the pad is read as a whole below, but pumping keeps the cached
        // state fresh and tells us which pad the operator is holding.
        while let Some(event) = self.gilrs.next_event() {
            if self.active != Some(event.id) {
                debug!(
                    "Operator pad is now: {}",
                    self.gilrs.gamepad(event.id).name()
                );
                self.active = Some(event.id);
            }
        }

        let pad_id = match self.active {
            Some(id) if self.gilrs.gamepad(id).is_connected() => Some(id),
            // Fall back to any connected pad
            _ => self.gilrs.gamepads().next().map(|(id, _)| id),
        };

        let pad = match pad_id {
            Some(id) => {
                let gamepad = self.gilrs.gamepad(id);

                PadSnapshot {
                    activate: gamepad.is_pressed(Button::South),
                    boost: gamepad.is_pressed(Button::East),
                    melody: gamepad.is_pressed(Button::West),
                    illum: gamepad.is_pressed(Button::North),
                    forward: gamepad
                        .button_data(Button::RightTrigger2)
                        .map(|d| d.value() as f64)
                        .unwrap_or(0.0),
                    turn: gamepad.value(Axis::LeftStickX) as f64,
                }
            }
            None => PadSnapshot::default(),
        };

        ConsoleInput {
            pad,
            led_slider: None,
        }
    }
}

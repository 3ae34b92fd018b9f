//! Rotate-in-place calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::{DriveMode, ThrustCtrl};
use util::maths::lin_map;
use vehicle_if::eqpt::thrusters::{ThrusterDems, ThrusterSide};

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ThrustCtrl {
    /// Perform the rotate-in-place calculations.
    ///
    /// The thrusters are canted 45 degrees inwards, so driving one side while
    /// the other stays stationary yaws the vehicle about its own axis. A
    /// positive axis deflection turns to starboard, which is achieved by
    /// driving the port bank, and mirrored for a turn to port.
    pub(crate) fn calc_rotate(&mut self, turn: f64, dems: &mut ThrusterDems) {
        let pulse_us = lin_map(
            (0f64, 1f64),
            (
                self.params.rotate_pulse_range_us[0],
                self.params.rotate_pulse_range_us[1],
            ),
            turn.abs(),
        );

        let driven = if turn > 0.0 {
            ThrusterSide::Port
        } else {
            ThrusterSide::Starboard
        };

        dems.set_side(driven, pulse_us);

        self.report.mode = DriveMode::Rotate {
            toward: driven.opposite(),
            pct: (turn.abs() * 100.0).round() as u8,
        };
    }
}

//! Straight drive calculations

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use super::{DriveMode, ThrustCtrl};
use util::maths::lin_map;
use vehicle_if::eqpt::thrusters::ThrusterDems;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ThrustCtrl {
    /// Perform the straight drive calculations.
    ///
    /// The trigger value maps linearly over the full drive pulse range and is
    /// demanded uniformly on all eight thrusters, driving the vehicle
    /// straight ahead.
    pub(crate) fn calc_drive(&mut self, forward: f64, dems: &mut ThrusterDems) {
        let pulse_us = lin_map(
            (0f64, 1f64),
            (
                self.params.drive_pulse_range_us[0],
                self.params.drive_pulse_range_us[1],
            ),
            forward,
        );

        dems.set_uniform(pulse_us);

        self.report.mode = DriveMode::Forward {
            pct: (forward * 100.0).round() as u8,
        };
    }
}

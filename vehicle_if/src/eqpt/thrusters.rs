//! # Thruster Equipment Commands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// The number of thrusters on the vehicle.
pub const NUM_THRUSTERS: usize = 8;

/// Pulse width commanding a stationary thruster (1 ms pulse).
///
/// Units: microseconds
pub const PULSE_STATIONARY_US: u16 = 1000;

/// Pulse width commanding maximum thrust (2 ms pulse).
///
/// Units: microseconds
pub const PULSE_MAX_US: u16 = 2000;

/// Pulse width commanding half thrust (1.5 ms pulse).
///
/// Units: microseconds
pub const PULSE_HALF_US: u16 = 1500;

/// Thruster indices on the port side of the hull.
const PORT_IDXS: [usize; 4] = [0, 2, 4, 6];

/// Thruster indices on the starboard side of the hull.
const STARBOARD_IDXS: [usize; 4] = [1, 3, 5, 7];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// One side of the vehicle's thruster bank.
///
/// Even indices (0, 2, 4, 6) are mounted on the port side, odd indices
/// (1, 3, 5, 7) on the starboard side. The index assignment is fixed by the
/// vehicle's wiring and must not be reordered.
#[derive(Serialize, Deserialize, Debug, Hash, Eq, PartialEq, Copy, Clone)]
pub enum ThrusterSide {
    Port,
    Starboard,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demands for all eight thrusters.
///
/// The demand for each thruster is a pulse width in microseconds, constrained
/// to `[PULSE_STATIONARY_US, PULSE_MAX_US]`. All mutating operations quantise
/// their input to the nearest integer and clamp into that range.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrusterDems {
    /// Demanded pulse width per thruster, in index order.
    ///
    /// Units: microseconds
    pub pulse_us: [u16; NUM_THRUSTERS],
}

/// Body of a `POST /api/motors/control` request.
///
/// The vehicle API addresses thrusters as `m1` to `m8`, one-based, in the
/// same order as `ThrusterDems::pulse_us`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct MotorsControlRequest {
    pub m1: u16,
    pub m2: u16,
    pub m3: u16,
    pub m4: u16,
    pub m5: u16,
    pub m6: u16,
    pub m7: u16,
    pub m8: u16,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ThrusterSide {
    /// Get the thruster indices belonging to this side.
    pub fn idxs(&self) -> [usize; NUM_THRUSTERS / 2] {
        match self {
            ThrusterSide::Port => PORT_IDXS,
            ThrusterSide::Starboard => STARBOARD_IDXS,
        }
    }

    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            ThrusterSide::Port => ThrusterSide::Starboard,
            ThrusterSide::Starboard => ThrusterSide::Port,
        }
    }
}

impl Default for ThrusterDems {
    fn default() -> Self {
        Self::stationary()
    }
}

impl ThrusterDems {
    /// All thrusters stationary.
    pub fn stationary() -> Self {
        Self {
            pulse_us: [PULSE_STATIONARY_US; NUM_THRUSTERS],
        }
    }

    /// Demand the same pulse width on all eight thrusters.
    pub fn set_uniform(&mut self, pulse_us: f64) {
        let pulse = quantise_pulse(pulse_us);
        for p in self.pulse_us.iter_mut() {
            *p = pulse;
        }
    }

    /// Demand a pulse width on the four thrusters of one side.
    ///
    /// The other side is left untouched, callers are expected to have reset
    /// or explicitly set it already.
    pub fn set_side(&mut self, side: ThrusterSide, pulse_us: f64) {
        let pulse = quantise_pulse(pulse_us);
        for i in side.idxs().iter() {
            self.pulse_us[*i] = pulse;
        }
    }

    /// True if every thruster is demanded stationary.
    pub fn is_stationary(&self) -> bool {
        self.pulse_us.iter().all(|p| *p == PULSE_STATIONARY_US)
    }
}

impl From<&ThrusterDems> for MotorsControlRequest {
    fn from(dems: &ThrusterDems) -> Self {
        let p = &dems.pulse_us;
        Self {
            m1: p[0],
            m2: p[1],
            m3: p[2],
            m4: p[3],
            m5: p[4],
            m6: p[5],
            m7: p[6],
            m8: p[7],
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Round a demanded pulse width to the nearest integer and clamp it into the
/// commandable range.
fn quantise_pulse(pulse_us: f64) -> u16 {
    let pulse = pulse_us.round();

    if pulse < PULSE_STATIONARY_US as f64 {
        PULSE_STATIONARY_US
    } else if pulse > PULSE_MAX_US as f64 {
        PULSE_MAX_US
    } else {
        pulse as u16
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stationary() {
        let dems = ThrusterDems::stationary();
        assert!(dems.is_stationary());
        assert_eq!(dems.pulse_us, [PULSE_STATIONARY_US; NUM_THRUSTERS]);
    }

    #[test]
    fn test_set_uniform_rounds_and_clamps() {
        let mut dems = ThrusterDems::stationary();

        dems.set_uniform(1499.6);
        assert_eq!(dems.pulse_us, [1500; NUM_THRUSTERS]);

        dems.set_uniform(2500.0);
        assert_eq!(dems.pulse_us, [PULSE_MAX_US; NUM_THRUSTERS]);

        dems.set_uniform(12.0);
        assert_eq!(dems.pulse_us, [PULSE_STATIONARY_US; NUM_THRUSTERS]);
    }

    #[test]
    fn test_set_side_touches_exactly_four() {
        let mut dems = ThrusterDems::stationary();
        dems.set_side(ThrusterSide::Port, 1250.0);

        for i in ThrusterSide::Port.idxs().iter() {
            assert_eq!(dems.pulse_us[*i], 1250);
        }
        for i in ThrusterSide::Starboard.idxs().iter() {
            assert_eq!(dems.pulse_us[*i], PULSE_STATIONARY_US);
        }
    }

    #[test]
    fn test_sides_partition_the_bank() {
        let mut seen = [false; NUM_THRUSTERS];
        for i in ThrusterSide::Port.idxs().iter() {
            seen[*i] = true;
        }
        for i in ThrusterSide::Starboard.idxs().iter() {
            assert!(!seen[*i]);
            seen[*i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_motors_control_request_order() {
        let mut dems = ThrusterDems::stationary();
        dems.pulse_us = [1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700];

        let req = MotorsControlRequest::from(&dems);
        assert_eq!(req.m1, 1000);
        assert_eq!(req.m2, 1100);
        assert_eq!(req.m8, 1700);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["m1"], 1000);
        assert_eq!(json["m8"], 1700);
    }
}

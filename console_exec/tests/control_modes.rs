//! Integration tests for the interplay between the drive arbitration and the
//! melody playback driver, stepped over simulated control cycles the same
//! way the main loop runs them.

use std::time::{Duration, Instant};

use console_lib::{
    input::PadSnapshot,
    melody_drv::{self, MelodyDrv, NUM_NOTES, THEME},
    thrust_ctrl::{self, DriveMode, ThrustCtrl},
};
use util::module::State;
use vehicle_if::eqpt::thrusters::{ThrusterDems, NUM_THRUSTERS};

/// The control modules as the main loop holds them, with the same gating.
struct Console {
    thrust: ThrustCtrl,
    melody: MelodyDrv,
    last_dems: ThrusterDems,
}

/// What one cycle produced.
struct TickResult {
    /// Demands offered for dispatch this cycle, `None` when playback holds
    /// the vector between notes.
    offered: Option<ThrusterDems>,

    melody: melody_drv::StatusReport,

    mode: DriveMode,
}

impl Console {
    fn new() -> Self {
        Self {
            thrust: ThrustCtrl::with_params(thrust_ctrl::Params {
                dead_zone: 0.1,
                drive_pulse_range_us: [1000.0, 2000.0],
                rotate_pulse_range_us: [1000.0, 1500.0],
                boost_pulse_us: 2000.0,
            }),
            melody: MelodyDrv::with_params(melody_drv::Params {
                end_pause_ms: 100,
                pitch_scale_range: [0.5, 2.0],
                sweep_pulse_range_us: [1000.0, 2000.0],
            }),
            last_dems: ThrusterDems::stationary(),
        }
    }

    /// Run one control cycle at the given clock.
    fn tick(&mut self, pad: PadSnapshot, now: Instant) -> TickResult {
        let motors_active = pad.activate;
        let melody_idle = !self.melody.is_active();

        let mut thrust_out = thrust_ctrl::OutputData::default();
        let mut mode = DriveMode::Stopped;

        // Drive arbitration is gated off while the melody override is active
        if melody_idle {
            let (o, r) = self
                .thrust
                .proc(&thrust_ctrl::InputData { pad, motors_active })
                .unwrap();
            thrust_out = o;
            mode = r.mode;
        }

        let pitch_ref_us = if melody_idle {
            thrust_out.dems.pulse_us[0]
        } else {
            self.last_dems.pulse_us[0]
        };

        let (melody_out, melody_rpt) = self
            .melody
            .proc(&melody_drv::InputData {
                trigger: pad.melody,
                motors_active,
                pitch_ref_us,
                now,
            })
            .unwrap();

        // Dispatch selection, as in the main loop
        let offered = if let Some(dems) = melody_out {
            Some(dems)
        } else if melody_rpt.overriding {
            None
        } else {
            Some(thrust_out.dems)
        };

        if let Some(dems) = offered {
            self.last_dems = dems;
        }

        TickResult {
            offered,
            melody: melody_rpt,
            mode,
        }
    }
}

fn active_pad() -> PadSnapshot {
    PadSnapshot {
        activate: true,
        ..Default::default()
    }
}

const TICK: Duration = Duration::from_millis(50);

#[test]
fn melody_takes_its_pitch_from_the_current_drive() {
    let mut console = Console::new();
    let t0 = Instant::now();

    // Drive at half trigger for a cycle, thrusters at 1500
    let pad = PadSnapshot {
        forward: 0.5,
        ..active_pad()
    };
    let result = console.tick(pad, t0);
    assert_eq!(result.offered.unwrap().pulse_us, [1500; NUM_THRUSTERS]);

    // Press the melody control while still holding the trigger. The pitch
    // reference is this cycle's 1500 us demand, a quarter above written
    // pitch.
    let pad = PadSnapshot {
        forward: 0.5,
        melody: true,
        ..active_pad()
    };
    let result = console.tick(pad, t0 + TICK);

    let event = result.melody.fired.unwrap();
    assert!((event.freq_hz - THEME[0].freq_hz * 1.25).abs() < 1e-9);

    // The note owns the vector: the first note demands stationary, not the
    // 1500 us the trigger would ask for
    assert_eq!(result.offered.unwrap().pulse_us, [1000; NUM_THRUSTERS]);
}

#[test]
fn playback_suppresses_drive_between_notes() {
    let mut console = Console::new();
    let t0 = Instant::now();

    let pad = PadSnapshot {
        melody: true,
        ..active_pad()
    };
    let result = console.tick(pad, t0);
    assert!(result.offered.is_some());

    // Next cycle the operator pulls the trigger hard. Playback holds the
    // vector, nothing is offered and the arbitration never runs.
    let pad = PadSnapshot {
        forward: 1.0,
        ..active_pad()
    };
    let result = console.tick(pad, t0 + TICK);
    assert!(result.offered.is_none());
    assert!(result.melody.overriding);
    assert_eq!(result.mode, DriveMode::Stopped);
}

#[test]
fn deactivation_cancels_playback_and_stops() {
    let mut console = Console::new();
    let t0 = Instant::now();

    let pad = PadSnapshot {
        melody: true,
        ..active_pad()
    };
    console.tick(pad, t0);

    // Release the activation control mid-playback. The same cycle cancels
    // the pending note and offers the all-stationary vector.
    let result = console.tick(PadSnapshot::default(), t0 + TICK);

    assert!(result.melody.cancelled);
    assert!(!result.melody.overriding);
    assert_eq!(result.mode, DriveMode::Stopped);
    assert!(result.offered.unwrap().is_stationary());

    // Past the old note deadline nothing fires
    let result = console.tick(PadSnapshot::default(), t0 + Duration::from_millis(1000));
    assert!(result.melody.fired.is_none());
}

#[test]
fn drive_resumes_after_playback_completes() {
    let mut console = Console::new();
    let mut now = Instant::now();

    let pad = PadSnapshot {
        melody: true,
        ..active_pad()
    };
    console.tick(pad, now);

    // Step through every note deadline
    let mut notes_fired = 1;
    for note in THEME.iter().take(NUM_NOTES - 1) {
        now += Duration::from_millis(note.duration_ms);
        let result = console.tick(active_pad(), now);
        assert!(result.offered.is_some());
        notes_fired += 1;
    }
    assert_eq!(notes_fired, NUM_NOTES);

    // Run out the final note and the end pause
    now += Duration::from_millis(THEME[NUM_NOTES - 1].duration_ms);
    let result = console.tick(active_pad(), now);
    assert!(result.offered.is_none());

    now += Duration::from_millis(100);
    let result = console.tick(active_pad(), now);
    assert!(result.melody.completed);

    // The next cycle the arbitration owns the vector again
    let pad = PadSnapshot {
        forward: 1.0,
        ..active_pad()
    };
    let result = console.tick(pad, now + TICK);
    assert_eq!(result.mode, DriveMode::Forward { pct: 100 });
    assert_eq!(result.offered.unwrap().pulse_us, [2000; NUM_THRUSTERS]);
}

#[test]
fn boost_overrides_concurrent_trigger_and_axis() {
    let mut console = Console::new();

    // Boost held with the trigger and axis deflected: boost wins the cycle
    let pad = PadSnapshot {
        forward: 0.4,
        turn: -0.8,
        boost: true,
        ..active_pad()
    };
    let result = console.tick(pad, Instant::now());

    assert_eq!(result.mode, DriveMode::Boost);
    assert_eq!(result.offered.unwrap().pulse_us, [2000; NUM_THRUSTERS]);
}

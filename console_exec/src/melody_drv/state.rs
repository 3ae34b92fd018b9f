//! Implementations for the MelodyDrv state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

// Internal
use super::{MelodyDrvError, Params, NUM_NOTES, THEME};
use util::{
    maths::{clamp, lin_map},
    module::State,
    params,
    session::Session,
};
use vehicle_if::eqpt::thrusters::{ThrusterDems, PULSE_MAX_US, PULSE_STATIONARY_US};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Melody playback driver state
pub struct MelodyDrv {
    pub(crate) params: Params,

    state: PlaybackState,

    /// Pitch scale captured from thruster 0 at trigger time.
    pitch_scale: f64,

    pub(crate) report: StatusReport,
}

/// Input data to the melody driver.
#[derive(Clone, Copy)]
pub struct InputData {
    /// True while the playback control is held.
    pub trigger: bool,

    /// True while the activation control is held.
    pub motors_active: bool,

    /// Current pulse demand on thruster 0, used as the pitch reference when
    /// playback is triggered.
    ///
    /// Units: microseconds
    pub pitch_ref_us: u16,

    /// The cycle's clock.
    pub now: Instant,
}

/// Status report for melody driver processing.
#[derive(Clone, Copy, Serialize, Debug, Default)]
pub struct StatusReport {
    /// True while the driver owns the thruster demands.
    pub overriding: bool,

    /// The note fired this cycle, if any.
    pub fired: Option<NoteEvent>,

    /// True on the cycle playback finishes with the motors still active.
    pub completed: bool,

    /// True on the cycle playback was cancelled by deactivation.
    pub cancelled: bool,
}

/// A timed note event reported by the driver.
#[derive(Clone, Copy, Serialize, Debug)]
pub struct NoteEvent {
    /// Note position in the melody, 0-based.
    pub index: usize,

    /// Total number of notes in the melody.
    pub total: usize,

    /// Played pitch, the written pitch scaled by the captured factor.
    ///
    /// Units: hertz
    pub freq_hz: f64,

    /// How long the note is held.
    ///
    /// Units: milliseconds
    pub duration_ms: u64,

    /// The demanded pulse as a percentage of the commandable range.
    pub pulse_pct: u8,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Playback progress.
///
/// `Ending` covers the pause after the final note, during which the driver
/// still owns the thruster demands but no further note can fire.
#[derive(Clone, Copy)]
enum PlaybackState {
    Idle,
    Playing { cursor: usize, next_note_at: Instant },
    Ending { done_at: Instant },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for MelodyDrv {
    fn default() -> Self {
        Self {
            params: Params::default(),
            state: PlaybackState::Idle,
            pitch_scale: 1.0,
            report: StatusReport::default(),
        }
    }
}

impl fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "note {}/{} ({}%)",
            self.index + 1,
            self.total,
            self.pulse_pct
        )
    }
}

impl State for MelodyDrv {
    type InputData = InputData;
    type OutputData = Option<ThrusterDems>;
    type StatusReport = StatusReport;
    type ProcError = MelodyDrvError;

    /// Initialise the melody driver from its parameter file.
    fn init(
        &mut self,
        param_file: &'static str,
        _session: &Session,
    ) -> Result<(), params::LoadError> {
        // Load the parameters
        self.params = params::load(param_file)?;

        Ok(())
    }

    /// Perform cyclic processing of the melody driver.
    ///
    /// Produces `Some(dems)` on the cycles where a note fires, `None`
    /// otherwise.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        // Clear the status report
        self.report = StatusReport::default();

        // Deactivation cancels any pending playback immediately. No demand
        // may be emitted by the driver after this cycle.
        if !input_data.motors_active {
            if !matches!(self.state, PlaybackState::Idle) {
                self.state = PlaybackState::Idle;
                self.report.cancelled = true;
                trace!("Melody playback cancelled by deactivation");
            }

            return Ok((None, self.report));
        }

        let mut output = None;

        match self.state {
            PlaybackState::Idle => {
                if input_data.trigger {
                    // Capture the pitch scale from the thruster speed at
                    // trigger time.
                    let pitch_ref = clamp(
                        input_data.pitch_ref_us as f64,
                        PULSE_STATIONARY_US as f64,
                        PULSE_MAX_US as f64,
                    );
                    self.pitch_scale = lin_map(
                        (PULSE_STATIONARY_US as f64, PULSE_MAX_US as f64),
                        (
                            self.params.pitch_scale_range[0],
                            self.params.pitch_scale_range[1],
                        ),
                        pitch_ref,
                    );

                    output = Some(self.fire_note(0, input_data.now));
                }
            }
            PlaybackState::Playing {
                cursor,
                next_note_at,
            } => {
                if input_data.now >= next_note_at {
                    let next = cursor + 1;
                    if next < NUM_NOTES {
                        output = Some(self.fire_note(next, input_data.now));
                    } else {
                        // Final note has been held for its duration, hold
                        // the end pause before reporting complete.
                        self.state = PlaybackState::Ending {
                            done_at: next_note_at
                                + Duration::from_millis(self.params.end_pause_ms),
                        };
                    }
                }
            }
            PlaybackState::Ending { done_at } => {
                if input_data.now >= done_at {
                    self.state = PlaybackState::Idle;
                    self.report.completed = true;
                }
            }
        }

        self.report.overriding = !matches!(self.state, PlaybackState::Idle);

        Ok((output, self.report))
    }
}

impl MelodyDrv {
    /// Build a driver with the given parameters, skipping the parameter file
    /// load. Used by the tests.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// True while the driver owns the thruster demands. Checked by the
    /// sampling cycle to gate off the normal drive arbitration.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, PlaybackState::Idle)
    }

    /// Fire the note at the given cursor position, returning the demands it
    /// puts on the thrusters and arming the deadline for the next one.
    fn fire_note(&mut self, cursor: usize, now: Instant) -> ThrusterDems {
        let note = THEME[cursor];

        // The pulse sweeps linearly with the note index, independent of the
        // note's own pitch.
        let pulse_us = lin_map(
            (0f64, (NUM_NOTES - 1) as f64),
            (
                self.params.sweep_pulse_range_us[0],
                self.params.sweep_pulse_range_us[1],
            ),
            cursor as f64,
        );

        let mut dems = ThrusterDems::stationary();
        dems.set_uniform(pulse_us);

        self.state = PlaybackState::Playing {
            cursor,
            next_note_at: now + Duration::from_millis(note.duration_ms),
        };

        self.report.fired = Some(NoteEvent {
            index: cursor,
            total: NUM_NOTES,
            freq_hz: note.freq_hz * self.pitch_scale,
            duration_ms: note.duration_ms,
            pulse_pct: lin_map(
                (PULSE_STATIONARY_US as f64, PULSE_MAX_US as f64),
                (0f64, 100f64),
                pulse_us,
            )
            .round() as u8,
        });

        dems
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use vehicle_if::eqpt::thrusters::NUM_THRUSTERS;

    fn drv() -> MelodyDrv {
        MelodyDrv::with_params(Params {
            end_pause_ms: 100,
            pitch_scale_range: [0.5, 2.0],
            sweep_pulse_range_us: [1000.0, 2000.0],
        })
    }

    fn input(trigger: bool, pitch_ref_us: u16, now: Instant) -> InputData {
        InputData {
            trigger,
            motors_active: true,
            pitch_ref_us,
            now,
        }
    }

    #[test]
    fn test_full_playback_fires_every_note() {
        let mut drv = drv();
        let t0 = Instant::now();

        // Trigger fires note 0 immediately
        let (output, report) = drv.proc(&input(true, 1000, t0)).unwrap();
        let mut fired = vec![(output.unwrap(), report.fired.unwrap())];

        // Walk the clock through every note deadline
        let mut now = t0;
        while fired.len() < NUM_NOTES {
            now += Duration::from_millis(THEME[fired.len() - 1].duration_ms);
            let (output, report) = drv.proc(&input(false, 1000, now)).unwrap();
            fired.push((output.unwrap(), report.fired.unwrap()));
        }

        // Exactly one uniform demand per note, sweeping 1000 to 2000
        let mut prev_pulse = 0;
        for (i, (dems, event)) in fired.iter().enumerate() {
            let expected =
                (1000.0 + (i as f64 / (NUM_NOTES - 1) as f64) * 1000.0).round() as u16;
            assert_eq!(dems.pulse_us, [expected; NUM_THRUSTERS]);
            assert!(dems.pulse_us[0] >= prev_pulse);
            prev_pulse = dems.pulse_us[0];

            assert_eq!(event.index, i);
            assert_eq!(event.total, NUM_NOTES);
        }
        assert_eq!(fired[0].0.pulse_us[0], 1000);
        assert_eq!(fired[NUM_NOTES - 1].0.pulse_us[0], 2000);

        // Holding the final note runs out its duration, then the end pause
        now += Duration::from_millis(THEME[NUM_NOTES - 1].duration_ms);
        let (output, report) = drv.proc(&input(false, 1000, now)).unwrap();
        assert!(output.is_none());
        assert!(report.overriding);
        assert!(!report.completed);

        now += Duration::from_millis(100);
        let (output, report) = drv.proc(&input(false, 1000, now)).unwrap();
        assert!(output.is_none());
        assert!(!report.overriding);
        assert!(report.completed);
        assert!(!drv.is_active());
    }

    #[test]
    fn test_pitch_scale_capture() {
        for (pitch_ref, expected_scale) in [(1000u16, 0.5), (1500, 1.25), (2000, 2.0)].iter() {
            let mut drv = drv();
            let (_, report) = drv
                .proc(&input(true, *pitch_ref, Instant::now()))
                .unwrap();

            let event = report.fired.unwrap();
            let expected_freq = THEME[0].freq_hz * expected_scale;
            assert!((event.freq_hz - expected_freq).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cancellation_mid_playback() {
        let mut drv = drv();
        let t0 = Instant::now();

        drv.proc(&input(true, 1000, t0)).unwrap();
        assert!(drv.is_active());

        // Deactivation cancels within the same cycle
        let (output, report) = drv
            .proc(&InputData {
                trigger: false,
                motors_active: false,
                pitch_ref_us: 1000,
                now: t0 + Duration::from_millis(50),
            })
            .unwrap();

        assert!(output.is_none());
        assert!(report.cancelled);
        assert!(!report.overriding);
        assert!(!drv.is_active());

        // No further demands come out even past the old note deadline
        let (output, report) = drv
            .proc(&InputData {
                trigger: false,
                motors_active: false,
                pitch_ref_us: 1000,
                now: t0 + Duration::from_millis(5000),
            })
            .unwrap();
        assert!(output.is_none());
        assert!(!report.cancelled);
        assert!(!report.overriding);
    }

    #[test]
    fn test_no_trigger_while_inactive() {
        let mut drv = drv();
        let (output, report) = drv
            .proc(&InputData {
                trigger: true,
                motors_active: false,
                pitch_ref_us: 1500,
                now: Instant::now(),
            })
            .unwrap();

        assert!(output.is_none());
        assert!(!report.overriding);
        assert!(!drv.is_active());
    }

    #[test]
    fn test_held_trigger_does_not_restart_playback() {
        let mut drv = drv();
        let t0 = Instant::now();

        drv.proc(&input(true, 1000, t0)).unwrap();

        // Still held before the first deadline: no new note
        let (output, _) = drv
            .proc(&input(true, 1000, t0 + Duration::from_millis(100)))
            .unwrap();
        assert!(output.is_none());

        // At the deadline the next note is note 1, not a restart
        let (output, report) = drv
            .proc(&input(true, 1000, t0 + Duration::from_millis(250)))
            .unwrap();
        assert!(output.is_some());
        assert_eq!(report.fired.unwrap().index, 1);
    }
}

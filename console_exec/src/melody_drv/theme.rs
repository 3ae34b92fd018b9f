//! The theme tune played by the melody driver
//!
//! The melody is a static asset: an ordered sequence of (pitch, duration)
//! entries. The driver maps the note index, not the pitch, onto the thruster
//! pulse range.

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

// Note frequencies, equal temperament, A4 = 440 Hz.
const NOTE_C4: f64 = 261.63;
const NOTE_D4: f64 = 293.66;
const NOTE_E4: f64 = 329.63;
const NOTE_F4: f64 = 349.23;
const NOTE_G4: f64 = 392.00;
const NOTE_A4: f64 = 440.00;
const NOTE_C5: f64 = 523.25;
const NOTE_D5: f64 = 587.33;
const NOTE_E5: f64 = 659.25;
const NOTE_F5: f64 = 698.46;
const NOTE_G5: f64 = 783.99;

/// Number of notes in the theme tune.
pub const NUM_NOTES: usize = 20;

/// The theme tune itself.
pub const THEME: [Note; NUM_NOTES] = [
    Note::new(NOTE_C5, 250),
    Note::new(NOTE_D5, 250),
    Note::new(NOTE_E5, 250),
    Note::new(NOTE_F5, 250),
    Note::new(NOTE_G5, 500),
    Note::new(NOTE_E5, 500),
    Note::new(NOTE_C5, 500),
    Note::new(NOTE_G4, 500),
    Note::new(NOTE_E4, 500),
    Note::new(NOTE_C4, 500),
    Note::new(NOTE_D4, 250),
    Note::new(NOTE_E4, 250),
    Note::new(NOTE_F4, 250),
    Note::new(NOTE_G4, 250),
    Note::new(NOTE_A4, 500),
    Note::new(NOTE_G4, 500),
    Note::new(NOTE_F4, 500),
    Note::new(NOTE_E4, 500),
    Note::new(NOTE_D4, 500),
    Note::new(NOTE_C4, 1000),
];

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One note of the melody.
#[derive(Debug, Clone, Copy)]
pub struct Note {
    /// Written pitch of the note.
    ///
    /// Units: hertz
    pub freq_hz: f64,

    /// How long the note is held before the next one starts.
    ///
    /// Units: milliseconds
    pub duration_ms: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Note {
    const fn new(freq_hz: f64, duration_ms: u64) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }
}

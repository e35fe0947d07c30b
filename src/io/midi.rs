#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    On,
    Off,
}

/// A note-on or note-off due at an absolute time in microseconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    pub due_us: u64,
    pub pitch: u8,
    pub kind: NoteKind,
}

impl NoteEvent {
    pub fn on(due_us: u64, pitch: u8) -> Self {
        Self {
            due_us,
            pitch,
            kind: NoteKind::On,
        }
    }

    pub fn off(due_us: u64, pitch: u8) -> Self {
        Self {
            due_us,
            pitch,
            kind: NoteKind::Off,
        }
    }

    pub fn is_on(&self) -> bool {
        self.kind == NoteKind::On
    }
}

/// Note name with octave, MIDI 60 = "C4".
pub fn note_name(pitch: u8) -> String {
    let octave = (pitch / 12) as i32 - 1;
    format!("{}{}", NOTE_NAMES[(pitch % 12) as usize], octave)
}

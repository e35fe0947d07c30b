use crate::io::packet::{Packet, CHORD_SENTINEL};

pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Pitch -> frequency lookup for the full MIDI range, computed once.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    hz: [f32; 128],
}

impl FrequencyTable {
    pub fn new() -> Self {
        let mut hz = [0.0; 128];
        for (note, slot) in hz.iter_mut().enumerate() {
            *slot = midi_note_to_freq(note as u8);
        }
        Self { hz }
    }

    /// Frequency in Hz, `None` outside 0..=127.
    #[inline]
    pub fn get(&self, pitch: u8) -> Option<f32> {
        self.hz.get(pitch as usize).copied()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Pitches a note packet should sound, with the chord sentinel removed.
pub fn packet_pitches(packet: &Packet) -> Vec<u8> {
    match packet {
        Packet::NoteOnOff { note, .. } => vec![*note],
        Packet::Chord { notes, .. } => notes
            .iter()
            .copied()
            .filter(|&n| n != CHORD_SENTINEL)
            .collect(),
        _ => Vec::new(),
    }
}

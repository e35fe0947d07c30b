use tracing::{debug, warn};

use crate::io::converter::FrequencyTable;
use crate::io::midi::{NoteEvent, NoteKind};
use crate::synth::message::{VoiceCommand, VoiceSink};
use crate::synth::voice::VoiceSlot;
use crate::MAX_PITCH;

/// What happened to a dispatched event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Note-on claimed this slot.
    Started { slot: usize },
    /// Note-on found no idle slot and was dropped.
    Dropped,
    /// Note-off muted this slot.
    Released { slot: usize },
    /// Note-off matched no active slot.
    Orphan,
    /// Pitch outside the MIDI range; nothing changed.
    Invalid,
}

/// Running counts of dispatch outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    pub started: u64,
    pub released: u64,
    pub capacity_exceeded: u64,
    pub orphan_offs: u64,
    pub invalid_pitches: u64,
}

/// First-fit allocator over a fixed pool of voice slots.
///
/// Owns the slots and the voice sink; nothing else changes slot state or
/// talks to the voices. Note-offs are matched by pitch against the first
/// active slot in index order, so with two overlapping notes of the same
/// pitch the lower slot is released first.
pub struct VoiceAllocator<S: VoiceSink> {
    slots: Box<[VoiceSlot]>,
    frequencies: FrequencyTable,
    sink: S,
    diagnostics: Diagnostics,
}

impl<S: VoiceSink> VoiceAllocator<S> {
    pub fn new(polyphony: usize, sink: S) -> Self {
        Self {
            slots: (0..polyphony).map(VoiceSlot::new).collect(),
            frequencies: FrequencyTable::new(),
            sink,
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn handle_event(&mut self, event: NoteEvent) -> Dispatch {
        match event.kind {
            NoteKind::On => self.dispatch_on(event.pitch),
            NoteKind::Off => self.dispatch_off(event.pitch),
        }
    }

    pub fn dispatch_on(&mut self, pitch: u8) -> Dispatch {
        let Some(hz) = self.frequencies.get(pitch) else {
            self.diagnostics.invalid_pitches += 1;
            warn!(pitch, "note on outside MIDI range ignored");
            return Dispatch::Invalid;
        };
        let Some(index) = self.slots.iter().position(|s| s.is_idle()) else {
            self.diagnostics.capacity_exceeded += 1;
            warn!(pitch, voices = self.slots.len(), "no free voice, note dropped");
            return Dispatch::Dropped;
        };

        self.slots[index].start(pitch);
        self.sink.send(VoiceCommand::SetFrequency { slot: index, hz });
        self.sink.send(VoiceCommand::Unmute { slot: index });
        self.diagnostics.started += 1;
        debug!(pitch, slot = index, "note on");

        Dispatch::Started { slot: index }
    }

    pub fn dispatch_off(&mut self, pitch: u8) -> Dispatch {
        if pitch > MAX_PITCH {
            self.diagnostics.invalid_pitches += 1;
            debug!(pitch, "note off outside MIDI range ignored");
            return Dispatch::Invalid;
        }
        let Some(index) = self.slots.iter().position(|s| s.is_playing(pitch)) else {
            self.diagnostics.orphan_offs += 1;
            debug!(pitch, "note off with no sounding voice");
            return Dispatch::Orphan;
        };

        self.slots[index].release();
        self.sink.send(VoiceCommand::Mute { slot: index });
        self.diagnostics.released += 1;
        debug!(pitch, slot = index, "note off");

        Dispatch::Released { slot: index }
    }

    /// Mute every sounding voice.
    pub fn all_notes_off(&mut self) {
        for slot in self.slots.iter_mut().filter(|s| !s.is_idle()) {
            slot.release();
            self.sink.send(VoiceCommand::Mute { slot: slot.index() });
        }
    }

    pub fn slots(&self) -> &[VoiceSlot] {
        &self.slots
    }

    pub fn polyphony(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_idle()).count()
    }

    pub fn is_playing(&self, pitch: u8) -> bool {
        self.slots.iter().any(|s| s.is_playing(pitch))
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

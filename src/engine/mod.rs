//! Poll-driven playback core.
//!
//! Decoded packets become note events in the [`Scheduler`]; each [`Engine::tick`]
//! releases at most `events_per_tick` due events to the [`VoiceAllocator`].
//! Everything here runs on one thread and nothing blocks.

pub mod allocator;
pub mod clock;
pub mod config;
pub mod scheduler;

use tracing::{debug, info};

pub use self::{
    allocator::{Diagnostics, Dispatch, VoiceAllocator},
    clock::{ClockSource, EventClock, ManualClock, MonotonicClock},
    config::EngineConfig,
    scheduler::Scheduler,
};

use crate::{
    error::{Error, Result},
    io::{
        converter::packet_pitches,
        midi::{note_name, NoteEvent},
        packet::{Packet, CHORD_SENTINEL},
    },
    synth::message::VoiceSink,
    MAX_PITCH,
};

/// Track metadata announced by the sender.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub title: Option<String>,
    pub artist: Option<String>,
}

pub struct Engine<S: VoiceSink, C: ClockSource = MonotonicClock> {
    config: EngineConfig,
    scheduler: Scheduler,
    allocator: VoiceAllocator<S>,
    clock: EventClock<C>,
    now_playing: NowPlaying,
    last_note: Option<u8>,
}

impl<S: VoiceSink> Engine<S> {
    pub fn new(config: EngineConfig, sink: S) -> Result<Self> {
        Self::with_clock(config, sink, MonotonicClock::new())
    }
}

impl<S: VoiceSink, C: ClockSource> Engine<S, C> {
    pub fn with_clock(config: EngineConfig, sink: S, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            allocator: VoiceAllocator::new(config.polyphony, sink),
            scheduler: Scheduler::new(),
            clock: EventClock::new(clock),
            now_playing: NowPlaying::default(),
            last_note: None,
            config,
        })
    }

    /// Queue a note sounding from `on_us` to `off_us`.
    ///
    /// An `off_us` earlier than `on_us` is treated as a zero-length note so the
    /// voice cannot be left sounding.
    pub fn push_note(&mut self, on_us: u64, pitch: u8, off_us: u64) -> Result<()> {
        check_pitch(pitch)?;
        self.reserve(1)?;
        self.enqueue_pair(on_us, pitch, off_us);
        Ok(())
    }

    /// Queue every pitch of a chord with a shared on/off window, skipping the
    /// "no note" sentinel. Either the whole chord is queued or none of it.
    pub fn push_chord(&mut self, on_us: u64, pitches: &[u8], off_us: u64) -> Result<()> {
        let pitches: Vec<u8> = pitches
            .iter()
            .copied()
            .filter(|&p| p != CHORD_SENTINEL)
            .collect();
        for &pitch in &pitches {
            check_pitch(pitch)?;
        }
        self.reserve(pitches.len())?;
        for pitch in pitches {
            self.enqueue_pair(on_us, pitch, off_us);
        }
        Ok(())
    }

    pub fn handle_packet(&mut self, packet: Packet) -> Result<()> {
        match packet {
            Packet::NoteOnOff { on_us, off_us, note } => {
                debug!(note, duration_ms = off_us.saturating_sub(on_us) / 1000, "note packet");
                self.push_note(on_us, note, off_us)
            }
            Packet::Chord { on_us, off_us, .. } => {
                let pitches = packet_pitches(&packet);
                debug!(?pitches, duration_ms = off_us.saturating_sub(on_us) / 1000, "chord packet");
                self.push_chord(on_us, &pitches, off_us)
            }
            Packet::Title(title) => {
                info!(%title, "title");
                self.now_playing.title = Some(title);
                Ok(())
            }
            Packet::Artist(artist) => {
                info!(%artist, "artist");
                self.now_playing.artist = Some(artist);
                Ok(())
            }
            Packet::Time { us_since_1900 } => {
                self.set_clock_offset(us_since_1900);
                Ok(())
            }
        }
    }

    pub fn set_clock_offset(&mut self, reference_us: u64) {
        self.clock.set_offset(reference_us);
        info!(reference_us, "clock offset set");
    }

    /// Current time in the sender's timestamp domain.
    pub fn now_us(&self) -> u64 {
        self.clock.now()
    }

    /// Dispatch due events at the clock's current time.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Dispatch up to `events_per_tick` events due at `now_us`. Returns how
    /// many were dispatched.
    pub fn tick_at(&mut self, now_us: u64) -> usize {
        let mut dispatched = 0;
        while dispatched < self.config.events_per_tick {
            let Some(event) = self.scheduler.poll_due(now_us) else {
                break;
            };
            if let Dispatch::Started { .. } = self.allocator.handle_event(event) {
                self.last_note = Some(event.pitch);
            }
            dispatched += 1;
        }
        dispatched
    }

    /// Drop everything queued and silence all voices.
    pub fn stop(&mut self) {
        self.scheduler.clear();
        self.allocator.all_notes_off();
    }

    pub fn pending(&self) -> usize {
        self.scheduler.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.peek_due_time()
    }

    pub fn allocator(&self) -> &VoiceAllocator<S> {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut VoiceAllocator<S> {
        &mut self.allocator
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.allocator.diagnostics()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn last_note(&self) -> Option<u8> {
        self.last_note
    }

    pub fn last_note_name(&self) -> Option<String> {
        self.last_note.map(note_name)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn reserve(&self, pairs: usize) -> Result<()> {
        let Some(limit) = self.config.max_pending else {
            return Ok(());
        };
        let pending = self.scheduler.len();
        if pending + pairs * 2 > limit {
            return Err(Error::QueueFull { pending, limit });
        }
        Ok(())
    }

    fn enqueue_pair(&mut self, on_us: u64, pitch: u8, off_us: u64) {
        let off_us = off_us.max(on_us);
        self.scheduler.insert(NoteEvent::on(on_us, pitch));
        self.scheduler.insert(NoteEvent::off(off_us, pitch));
        debug!(pitch, on_us, off_us, pending = self.scheduler.len(), "queued note");
    }
}

fn check_pitch(pitch: u8) -> Result<()> {
    if pitch > MAX_PITCH {
        return Err(Error::InvalidPitch(pitch));
    }
    Ok(())
}

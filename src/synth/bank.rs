use std::f32::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::synth::message::{CommandReceiver, VoiceCommand, VoiceSink};

/*
Software Voice Bank
===================

A fixed row of oscillators, one per voice slot, each wired into its own mixer
input. The allocator never touches samples; it only sends three commands:

  SetFrequency { slot, hz }  retune the slot's oscillator
  Unmute { slot }            mixer input gain -> 0 dB
  Mute { slot }              mixer input gain -> silence floor

Oscillators free-run whether or not their input is muted, so a retune followed
by an unmute starts mid-cycle rather than from phase zero.

The mixer sums all inputs and scales by 1/sqrt(voices), which keeps a dense
chord out of clipping while leaving a single voice reasonably loud.
*/

/// dB value treated as "off" by the mixer.
pub const DB_MUTE: f32 = -9999.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Saw,
    Square,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct OscBankConfig {
    pub sample_rate: f32,
    pub waveform: Waveform,
    /// Gain applied to muted inputs, in dB. Anything at or below this is silent.
    pub silence_floor_db: f32,
}

impl Default for OscBankConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            waveform: Waveform::Square,
            silence_floor_db: DB_MUTE,
        }
    }
}

#[derive(Debug, Clone)]
struct BankVoice {
    phase: f32,
    frequency: f32,
    gain_db: f32,
}

impl BankVoice {
    fn linear_gain(&self, floor_db: f32) -> f32 {
        if self.gain_db <= floor_db {
            0.0
        } else {
            10.0_f32.powf(self.gain_db / 20.0)
        }
    }
}

pub struct OscBank {
    config: OscBankConfig,
    voices: Vec<BankVoice>,
    normalize: f32,
}

impl OscBank {
    pub fn new(voice_count: usize, config: OscBankConfig) -> Self {
        let voices = (0..voice_count)
            .map(|_| BankVoice {
                phase: 0.0,
                frequency: 440.0,
                gain_db: config.silence_floor_db,
            })
            .collect();

        Self {
            config,
            voices,
            normalize: 1.0 / (voice_count.max(1) as f32).sqrt(),
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn apply(&mut self, command: VoiceCommand) {
        let floor = self.config.silence_floor_db;
        let Some(voice) = self.voices.get_mut(command.slot()) else {
            tracing::warn!(?command, "command for unknown voice slot");
            return;
        };

        match command {
            VoiceCommand::SetFrequency { hz, .. } => voice.frequency = hz,
            VoiceCommand::Unmute { .. } => voice.gain_db = 0.0,
            VoiceCommand::Mute { .. } => voice.gain_db = floor,
        }
    }

    /// Apply every pending command from `rx`.
    pub fn drain<R: CommandReceiver>(&mut self, rx: &mut R) {
        while let Some(command) = rx.pop() {
            self.apply(command);
        }
    }

    pub fn is_audible(&self, slot: usize) -> bool {
        self.voices
            .get(slot)
            .is_some_and(|v| v.gain_db > self.config.silence_floor_db)
    }

    pub fn frequency(&self, slot: usize) -> Option<f32> {
        self.voices.get(slot).map(|v| v.frequency)
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let floor = self.config.silence_floor_db;
        let sample_rate = self.config.sample_rate;
        let waveform = self.config.waveform;

        for voice in &mut self.voices {
            let gain = voice.linear_gain(floor) * self.normalize;
            let increment = voice.frequency / sample_rate;

            for sample in out.iter_mut() {
                if gain > 0.0 {
                    *sample += shape(waveform, voice.phase) * gain;
                }
                voice.phase = (voice.phase + increment).fract();
            }
        }
    }
}

impl VoiceSink for OscBank {
    fn send(&mut self, command: VoiceCommand) {
        self.apply(command);
    }
}

#[inline]
fn shape(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Saw => 2.0 * phase - 1.0,
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
    }
}

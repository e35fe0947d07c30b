//! NetVoice - application builder and runner

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use tracing::{error, info, warn};

use netvoice::{
    io::Packet,
    synth::{OscBank, OscBankConfig, VoiceCommand, Waveform},
    Engine, EngineConfig, MAX_BLOCK_SIZE,
};

/// Main application builder
pub struct NetVoice {
    config: EngineConfig,
    waveform: Waveform,
    tick_interval: Duration,
    command_capacity: usize,
}

impl NetVoice {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            waveform: Waveform::Square,
            tick_interval: Duration::from_millis(1),
            command_capacity: 1024,
        }
    }

    pub fn polyphony(mut self, voices: usize) -> Self {
        self.config = self.config.polyphony(voices);
        self
    }

    pub fn events_per_tick(mut self, events: usize) -> Self {
        self.config = self.config.events_per_tick(events);
        self
    }

    pub fn waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Run until every queued note has played out.
    pub fn run(self, packets: Vec<Packet>) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, polyphony = self.config.polyphony, "audio ready");

        let (tx, mut rx) = RingBuffer::<VoiceCommand>::new(self.command_capacity);
        let mut bank = OscBank::new(
            self.config.polyphony,
            OscBankConfig {
                sample_rate,
                waveform: self.waveform,
                ..Default::default()
            },
        );
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    bank.drain(&mut rx);

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;
                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames];
                        bank.render_block(block);

                        // Mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }
                        frames_written += frames;
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;
        stream.play().wrap_err("failed to start output stream")?;

        let mut engine = Engine::new(self.config, tx).wrap_err("invalid engine config")?;
        for packet in packets {
            if let Err(err) = engine.handle_packet(packet) {
                warn!(%err, "packet rejected");
            }
        }

        if let Some(title) = &engine.now_playing().title {
            info!(%title, artist = engine.now_playing().artist.as_deref().unwrap_or("?"), "now playing");
        }

        let mut shown = None;
        while engine.pending() > 0 || engine.allocator().active_count() > 0 {
            engine.tick();
            if engine.last_note() != shown {
                shown = engine.last_note();
                if let Some(name) = engine.last_note_name() {
                    info!(note = %name, active = engine.allocator().active_count(), "playing");
                }
            }
            std::thread::sleep(self.tick_interval);
        }

        engine.stop();
        // Let the audio thread pick up the final mutes
        std::thread::sleep(Duration::from_millis(100));

        let diag = engine.diagnostics();
        info!(
            started = diag.started,
            dropped = diag.capacity_exceeded,
            orphan_offs = diag.orphan_offs,
            "done"
        );
        Ok(())
    }
}

impl Default for NetVoice {
    fn default() -> Self {
        Self::new()
    }
}

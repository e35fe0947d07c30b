//! netvoice - plays a scheduled note stream through the default audio output
//!
//! Run with: cargo run
//! RUST_LOG=info shows progress; RUST_LOG=netvoice=debug shows every queue and dispatch decision.

mod app;

use app::NetVoice;
use netvoice::{io::Packet, synth::Waveform};

/// Sender clock at the start of the demo, microseconds since 1900.
const SESSION_START_US: u64 = 3_960_000_000_000_000;
const BEAT_US: u64 = 400_000;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    NetVoice::new()
        .polyphony(32)
        .events_per_tick(4)
        .waveform(Waveform::Square)
        .run(demo_packets())
}

/// Stand-in for the network feed: a short progression with an arpeggio on top.
fn demo_packets() -> Vec<Packet> {
    let at = |beat: u64| SESSION_START_US + 200_000 + beat * BEAT_US;
    let mut packets = vec![
        Packet::Time { us_since_1900: SESSION_START_US },
        Packet::title_from_bytes(b"demo progression\0\0\0\0"),
        Packet::artist_from_bytes(b"netvoice\0\0\0\0"),
    ];

    let chords: [[u8; 4]; 4] = [
        [48, 55, 60, 64],
        [45, 52, 57, 60],
        [41, 48, 53, 57],
        [43, 50, 55, 128],
    ];
    for (bar, chord) in chords.iter().enumerate() {
        let start = bar as u64 * 4;
        packets.push(Packet::Chord {
            on_us: at(start),
            off_us: at(start + 4) - 20_000,
            notes: chord.to_vec(),
        });

        // Arpeggiate the upper voices an octave up, one per beat
        for (step, &note) in chord.iter().filter(|&&n| n != 128).skip(1).enumerate() {
            let beat = start + step as u64;
            packets.push(Packet::NoteOnOff {
                on_us: at(beat),
                off_us: at(beat) + BEAT_US / 2,
                note: note + 12,
            });
        }
    }

    packets
}

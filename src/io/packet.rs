//! Decoded network packets.
//!
//! Datagram framing and wire decoding live outside this crate; the engine only
//! sees the closed set of variants below.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chord slot value meaning "no note".
pub const CHORD_SENTINEL: u8 = 128;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// A single note sounding from `on_us` until `off_us`.
    NoteOnOff { on_us: u64, off_us: u64, note: u8 },
    /// Several notes sharing one on/off window. Unused slots hold [`CHORD_SENTINEL`].
    Chord {
        on_us: u64,
        off_us: u64,
        notes: Vec<u8>,
    },
    Title(String),
    Artist(String),
    /// Sender's clock, microseconds since 1900-01-01.
    Time { us_since_1900: u64 },
}

impl Packet {
    pub fn title_from_bytes(bytes: &[u8]) -> Self {
        Packet::Title(text_from_padded(bytes))
    }

    pub fn artist_from_bytes(bytes: &[u8]) -> Self {
        Packet::Artist(text_from_padded(bytes))
    }
}

/// Decode a fixed-width, NUL-padded ASCII field.
pub fn text_from_padded(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |last| last + 1);
    bytes[..end]
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

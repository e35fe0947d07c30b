pub mod engine; // Due-time queue, voice allocation, tick loop
pub mod error;
pub mod io; // Note events, decoded packets, pitch conversion
pub mod synth; // Voice commands and the software voice bank

pub use engine::{Engine, EngineConfig};
pub use error::{Error, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
/// Highest valid MIDI pitch.
pub const MAX_PITCH: u8 = 127;

// Purpose: voice hardware boundary
// The allocator drives voices only through VoiceCommand; the bank turns them into sound

pub mod bank;
pub mod message;
pub mod voice;

pub use bank::{OscBank, OscBankConfig, Waveform};
pub use message::{CommandReceiver, VoiceCommand, VoiceSink};
pub use voice::{VoiceSlot, VoiceState};

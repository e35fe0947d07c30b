#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Control sent from the allocator to the voice hardware.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VoiceCommand {
    SetFrequency { slot: usize, hz: f32 },
    /// Restore the slot's mixer input to unity gain.
    Unmute { slot: usize },
    /// Drop the slot's mixer input to the silence floor.
    Mute { slot: usize },
}

impl VoiceCommand {
    pub fn slot(&self) -> usize {
        match *self {
            VoiceCommand::SetFrequency { slot, .. }
            | VoiceCommand::Unmute { slot }
            | VoiceCommand::Mute { slot } => slot,
        }
    }
}

/// Anything that accepts voice commands.
pub trait VoiceSink {
    fn send(&mut self, command: VoiceCommand);
}

impl VoiceSink for Vec<VoiceCommand> {
    fn send(&mut self, command: VoiceCommand) {
        self.push(command);
    }
}

#[cfg(feature = "rtrb")]
impl VoiceSink for Producer<VoiceCommand> {
    fn send(&mut self, command: VoiceCommand) {
        if self.push(command).is_err() {
            tracing::warn!(?command, "voice command ring full, command lost");
        }
    }
}

/// Audio-side end of the command stream.
pub trait CommandReceiver {
    fn pop(&mut self) -> Option<VoiceCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<VoiceCommand> {
    fn pop(&mut self) -> Option<VoiceCommand> {
        Consumer::pop(self).ok()
    }
}

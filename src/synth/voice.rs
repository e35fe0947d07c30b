#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,       // Available for allocation
    Active(u8), // Sounding this pitch
}

/// One physical voice: an oscillator feeding one mixer input.
#[derive(Debug, Clone)]
pub struct VoiceSlot {
    index: usize,
    state: VoiceState,
}

impl VoiceSlot {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            state: VoiceState::Idle,
        }
    }

    pub(crate) fn start(&mut self, pitch: u8) {
        self.state = VoiceState::Active(pitch);
    }

    pub(crate) fn release(&mut self) {
        self.state = VoiceState::Idle;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == VoiceState::Idle
    }

    /// Pitch being sounded, `None` when idle.
    pub fn pitch(&self) -> Option<u8> {
        match self.state {
            VoiceState::Active(pitch) => Some(pitch),
            VoiceState::Idle => None,
        }
    }

    pub fn is_playing(&self, pitch: u8) -> bool {
        self.state == VoiceState::Active(pitch)
    }
}

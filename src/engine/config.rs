#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of voice slots.
    pub polyphony: usize,
    /// Maximum events dispatched by one `tick`. A value of 1 staggers chord
    /// attacks by one tick per note; raise it to attack chords together.
    pub events_per_tick: usize,
    /// Cap on pending queue entries. `None` trusts the sender's rate.
    pub max_pending: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            polyphony: 32,
            events_per_tick: 1,
            max_pending: None,
        }
    }
}

impl EngineConfig {
    pub fn polyphony(mut self, voices: usize) -> Self {
        self.polyphony = voices;
        self
    }

    pub fn events_per_tick(mut self, events: usize) -> Self {
        self.events_per_tick = events;
        self
    }

    pub fn max_pending(mut self, limit: usize) -> Self {
        self.max_pending = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.polyphony == 0 {
            return Err(Error::InvalidConfig("polyphony must be at least 1"));
        }
        if self.events_per_tick == 0 {
            return Err(Error::InvalidConfig("events_per_tick must be at least 1"));
        }
        if self.max_pending.is_some_and(|limit| limit < 2) {
            return Err(Error::InvalidConfig(
                "max_pending must hold at least one on/off pair",
            ));
        }
        Ok(())
    }
}

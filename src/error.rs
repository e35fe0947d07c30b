//! Error type for the netvoice crate.
//!
//! Capacity-exceeded and orphan note-offs are not errors; they are reported as
//! [`Dispatch`](crate::engine::allocator::Dispatch) outcomes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("pitch {0} is outside the MIDI range 0..=127")]
    InvalidPitch(u8),

    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),

    #[error("event queue full ({pending} pending, limit {limit})")]
    QueueFull { pending: usize, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

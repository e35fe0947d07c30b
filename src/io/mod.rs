// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;
pub mod packet;

pub use midi::{note_name, NoteEvent, NoteKind};
pub use packet::Packet;

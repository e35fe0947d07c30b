use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::io::midi::NoteEvent;

/// Heap entry ordered by due time, then by insertion sequence.
#[derive(Debug, Clone, Copy)]
struct Pending {
    seq: u64,
    event: NoteEvent,
}

impl Pending {
    fn key(&self) -> (u64, u64) {
        (self.event.due_us, self.seq)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Due-time event queue.
///
/// A binary min-heap keyed on `due_us`. Events with equal due times come out
/// in insertion order, so an On pushed before its Off is always released
/// first even for a zero-length note.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, event: NoteEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending { seq, event }));
    }

    /// Remove and return the earliest event if it is due at `now_us`.
    pub fn poll_due(&mut self, now_us: u64) -> Option<NoteEvent> {
        match self.heap.peek() {
            Some(Reverse(next)) if next.event.due_us <= now_us => {
                self.heap.pop().map(|Reverse(p)| p.event)
            }
            _ => None,
        }
    }

    pub fn peek_due_time(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(p)| p.event.due_us)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

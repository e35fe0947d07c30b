use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Local monotonic time in microseconds from an arbitrary origin.
pub trait ClockSource {
    fn local_us(&self) -> u64;
}

/// Wall-clock source backed by [`Instant`].
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for MonotonicClock {
    fn local_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

/// Hand-driven clock. Clones share the same time, so a test can keep one
/// handle and give the other to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, us: u64) {
        self.now_us.store(us, Ordering::Relaxed);
    }

    pub fn advance(&self, us: u64) {
        self.now_us.fetch_add(us, Ordering::Relaxed);
    }
}

impl ClockSource for ManualClock {
    fn local_us(&self) -> u64 {
        self.now_us.load(Ordering::Relaxed)
    }
}

/// Maps local time into the sender's timestamp domain.
///
/// After `set_offset(reference)`, `now() == reference + elapsed` where
/// `elapsed` is local time since the call. Before any offset is set the
/// reference is zero at construction.
#[derive(Debug, Clone)]
pub struct EventClock<C: ClockSource> {
    source: C,
    reference_us: u64,
    local_at_reference: u64,
}

impl<C: ClockSource> EventClock<C> {
    pub fn new(source: C) -> Self {
        let local_at_reference = source.local_us();
        Self {
            source,
            reference_us: 0,
            local_at_reference,
        }
    }

    pub fn set_offset(&mut self, reference_us: u64) {
        self.reference_us = reference_us;
        self.local_at_reference = self.source.local_us();
    }

    pub fn now(&self) -> u64 {
        let elapsed = self
            .source
            .local_us()
            .saturating_sub(self.local_at_reference);
        self.reference_us.saturating_add(elapsed)
    }

    pub fn source(&self) -> &C {
        &self.source
    }
}

//! Benchmarks for the scheduling and allocation hot paths.
//!
//! Run with: cargo bench
//!
//! `tick` runs once per frame on the control thread, so the interesting costs
//! are queue insert/poll at realistic backlog sizes and a full allocator scan
//! at typical pool sizes.
//!
//! Benchmark groups:
//!   - scheduler/*  insert and drain against a pre-filled heap
//!   - allocator/*  note-on/note-off cycles, including the drop path
//!   - bank/*       software voice bank rendering

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use netvoice::{
    engine::{Scheduler, VoiceAllocator},
    io::NoteEvent,
    synth::{OscBank, OscBankConfig, VoiceCommand},
};

/// Pending-event counts: a single bar, a dense passage, a flooded queue.
const BACKLOGS: &[usize] = &[16, 256, 4096];
/// Pool sizes from a small monosynth up to a large pool.
const POLYPHONY: &[usize] = &[4, 32, 128];

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduler");

    for &backlog in BACKLOGS {
        let mut queue = Scheduler::new();
        for i in 0..backlog as u64 {
            // Scatter due times so inserts land throughout the heap
            queue.insert(NoteEvent::on((i * 7919) % 100_000, (i % 128) as u8));
        }

        group.bench_with_input(BenchmarkId::new("insert_poll", backlog), &backlog, |b, _| {
            b.iter(|| {
                queue.insert(black_box(NoteEvent::on(0, 60)));
                black_box(queue.poll_due(black_box(0)));
            })
        });

        group.bench_with_input(BenchmarkId::new("poll_not_due", backlog), &backlog, |b, _| {
            let mut idle = Scheduler::new();
            for i in 0..backlog as u64 {
                idle.insert(NoteEvent::off(1_000 + i, 60));
            }
            b.iter(|| black_box(idle.poll_due(black_box(999))))
        });
    }

    group.finish();
}

fn bench_allocator(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocator");

    for &voices in POLYPHONY {
        // Worst case: every slot but the last is busy, so both scans walk the pool
        let mut alloc = VoiceAllocator::new(voices, Vec::<VoiceCommand>::with_capacity(4));
        for pitch in 0..voices.saturating_sub(1) {
            alloc.dispatch_on((pitch % 127) as u8);
        }

        group.bench_with_input(BenchmarkId::new("on_off_last_slot", voices), &voices, |b, _| {
            b.iter(|| {
                alloc.sink_mut().clear();
                black_box(alloc.dispatch_on(black_box(127)));
                black_box(alloc.dispatch_off(black_box(127)));
            })
        });

        let mut full = VoiceAllocator::new(voices, Vec::<VoiceCommand>::new());
        for pitch in 0..voices {
            full.dispatch_on((pitch % 127) as u8);
        }

        group.bench_with_input(BenchmarkId::new("drop_when_full", voices), &voices, |b, _| {
            b.iter(|| black_box(full.dispatch_on(black_box(127))))
        });
    }

    group.finish();
}

fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("bank");

    for &voices in POLYPHONY {
        let mut bank = OscBank::new(voices, OscBankConfig::default());
        for slot in 0..voices / 2 {
            bank.apply(VoiceCommand::SetFrequency {
                slot,
                hz: 110.0 + slot as f32 * 20.0,
            });
            bank.apply(VoiceCommand::Unmute { slot });
        }
        let mut buffer = vec![0.0f32; 256];

        group.bench_with_input(BenchmarkId::new("render_256", voices), &voices, |b, _| {
            b.iter(|| bank.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scheduler, bench_allocator, bench_bank);
criterion_main!(benches);

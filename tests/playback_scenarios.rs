use netvoice::{
    engine::{Dispatch, ManualClock},
    io::Packet,
    synth::{OscBank, OscBankConfig, VoiceCommand, VoiceState},
    Engine, EngineConfig,
};

type TestEngine = Engine<Vec<VoiceCommand>, ManualClock>;

fn engine(polyphony: usize) -> TestEngine {
    let config = EngineConfig::default().polyphony(polyphony);
    Engine::with_clock(config, Vec::new(), ManualClock::new()).unwrap()
}

fn states(engine: &TestEngine) -> Vec<VoiceState> {
    engine.allocator().slots().iter().map(|s| s.state()).collect()
}

#[test]
fn two_voices_interleaved_notes() {
    let mut engine = engine(2);
    engine.push_note(0, 60, 100).unwrap();
    engine.push_note(10, 64, 110).unwrap();

    assert_eq!(engine.tick_at(0), 1);
    assert_eq!(states(&engine), vec![VoiceState::Active(60), VoiceState::Idle]);

    assert_eq!(engine.tick_at(10), 1);
    assert_eq!(
        states(&engine),
        vec![VoiceState::Active(60), VoiceState::Active(64)]
    );

    assert_eq!(engine.tick_at(100), 1);
    assert_eq!(states(&engine), vec![VoiceState::Idle, VoiceState::Active(64)]);

    assert_eq!(engine.tick_at(110), 1);
    assert_eq!(states(&engine), vec![VoiceState::Idle, VoiceState::Idle]);
    assert_eq!(engine.pending(), 0);

    assert_eq!(
        engine.allocator().sink().as_slice(),
        &[
            VoiceCommand::SetFrequency { slot: 0, hz: 440.0 * 2f32.powf(-9.0 / 12.0) },
            VoiceCommand::Unmute { slot: 0 },
            VoiceCommand::SetFrequency { slot: 1, hz: 440.0 * 2f32.powf(-5.0 / 12.0) },
            VoiceCommand::Unmute { slot: 1 },
            VoiceCommand::Mute { slot: 0 },
            VoiceCommand::Mute { slot: 1 },
        ]
    );
}

#[test]
fn single_voice_drops_overlapping_note() {
    let mut engine = engine(1);
    engine.push_note(0, 60, 1_000).unwrap();
    engine.push_note(1, 64, 1_000).unwrap();

    engine.tick_at(0);
    engine.tick_at(1);

    assert_eq!(states(&engine), vec![VoiceState::Active(60)]);
    assert_eq!(engine.diagnostics().capacity_exceeded, 1);

    // 60's off frees the slot; 64's off then matches nothing
    engine.tick_at(1_000);
    engine.tick_at(1_000);
    assert_eq!(states(&engine), vec![VoiceState::Idle]);
    assert_eq!(engine.diagnostics().orphan_offs, 1);
}

#[test]
fn arrival_order_does_not_matter() {
    let mut engine = engine(4);
    engine.push_note(300, 67, 400).unwrap();
    engine.push_note(100, 60, 400).unwrap();
    engine.push_note(200, 64, 400).unwrap();

    let mut started = Vec::new();
    for now in [100, 200, 300] {
        engine.tick_at(now);
        started.push(engine.last_note());
    }
    assert_eq!(started, vec![Some(60), Some(64), Some(67)]);
}

#[test]
fn polls_before_due_time_do_nothing() {
    let mut engine = engine(2);
    engine.push_note(500, 60, 600).unwrap();

    for now in [0, 100, 499] {
        assert_eq!(engine.tick_at(now), 0);
    }
    assert_eq!(engine.allocator().active_count(), 0);
    assert_eq!(engine.tick_at(500), 1);
}

#[test]
fn exact_capacity_then_one_more() {
    let polyphony = 8;
    let mut engine = engine(polyphony);
    for i in 0..=polyphony as u8 {
        engine.push_note(i as u64, 48 + i, 10_000).unwrap();
    }

    for now in 0..polyphony as u64 {
        engine.tick_at(now);
    }
    assert_eq!(engine.allocator().active_count(), polyphony);

    engine.tick_at(polyphony as u64);
    assert_eq!(engine.allocator().active_count(), polyphony);
    assert_eq!(engine.diagnostics().capacity_exceeded, 1);
    assert!(!engine.allocator().is_playing(48 + polyphony as u8));
}

#[test]
fn packet_stream_drives_voice_bank() {
    let clock = ManualClock::new();
    let bank = OscBank::new(4, OscBankConfig::default());
    let config = EngineConfig::default().polyphony(4).events_per_tick(4);
    let mut engine = Engine::with_clock(config, bank, clock.clone()).unwrap();

    engine.handle_packet(Packet::Time { us_since_1900: 10_000 }).unwrap();
    engine
        .handle_packet(Packet::NoteOnOff { on_us: 10_000, off_us: 20_000, note: 69 })
        .unwrap();

    assert_eq!(engine.tick(), 1);
    let bank = engine.allocator().sink();
    assert!(bank.is_audible(0));
    assert_eq!(bank.frequency(0), Some(440.0));

    let mut block = vec![0.0; 64];
    engine.allocator_mut().sink_mut().render_block(&mut block);
    assert!(block.iter().any(|&s| s != 0.0));

    clock.advance(10_000);
    assert_eq!(engine.tick(), 1);
    assert!(!engine.allocator().sink().is_audible(0));
}

#[test]
fn direct_dispatch_reports_outcomes() {
    let mut engine = engine(1);
    let alloc = engine.allocator_mut();

    assert_eq!(alloc.dispatch_off(60), Dispatch::Orphan);
    assert_eq!(alloc.dispatch_on(60), Dispatch::Started { slot: 0 });
    assert_eq!(alloc.dispatch_on(62), Dispatch::Dropped);
    assert_eq!(alloc.dispatch_off(60), Dispatch::Released { slot: 0 });
    assert_eq!(alloc.dispatch_on(60), Dispatch::Started { slot: 0 });
}

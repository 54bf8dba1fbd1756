//! Synchronization core integration tests
//!
//! Drives the core through the simulated primitive end to end: requests go
//! out through the transport adapter and confirmations come back through
//! the primitive's event queue.

use reel_playback::{
    PlayerConfig, PlayerEvent, PrimitiveEvent, SessionId, SimulatedPrimitive, SyncCore, SyncState,
};

// ===== Helpers =====

fn drain(core: &mut SyncCore<SimulatedPrimitive>) -> Vec<PlayerEvent> {
    std::iter::from_fn(|| core.poll()).collect()
}

fn ready(duration: f64) -> (SyncCore<SimulatedPrimitive>, SessionId) {
    ready_with(duration, PlayerConfig::default())
}

fn ready_with(duration: f64, config: PlayerConfig) -> (SyncCore<SimulatedPrimitive>, SessionId) {
    let mut core = SyncCore::with_config(SimulatedPrimitive::new(duration), config).unwrap();
    let session = core.load("https://cdn.example.com/clip.mp4");
    core.primitive_mut().resolve_metadata();
    drain(&mut core);
    assert_eq!(core.state(), SyncState::Ready);
    (core, session)
}

fn seeks(core: &SyncCore<SimulatedPrimitive>) -> usize {
    core.transport().primitive().calls().seek
}

// ===== Seek Reconciliation =====

#[test]
fn test_seek_clamps_to_media_bounds() {
    let (mut core, _) = ready(10.0);

    core.request_seek(15.0);
    assert_eq!(core.reported_time(), 10.0);
    assert_eq!(core.transport().primitive().current_time(), 10.0);

    core.request_seek(-3.0);
    assert_eq!(core.reported_time(), 0.0);
    assert_eq!(core.transport().primitive().current_time(), 0.0);
}

#[test]
fn test_seek_within_tolerance_updates_display_only() {
    let config = PlayerConfig {
        seek_epsilon_secs: 0.2,
        ..Default::default()
    };
    let (mut core, session) = ready_with(10.0, config);
    core.handle_primitive_event(session, PrimitiveEvent::TimeUpdate { current_time: 5.0 });
    assert_eq!(core.reported_time(), 5.0);

    core.request_seek(5.05);

    assert_eq!(seeks(&core), 0, "No native seek within tolerance");
    assert_eq!(core.reported_time(), 5.05);
}

#[test]
fn test_seek_is_optimistic_then_settles() {
    let (mut core, _) = ready(10.0);

    core.request_seek(4.0);
    assert_eq!(core.reported_time(), 4.0, "Reported time moves before confirmation");
    assert_eq!(seeks(&core), 1);

    let events = drain(&mut core);
    assert_eq!(
        events,
        vec![PlayerEvent::PositionChanged { position_secs: 4.0 }]
    );
    assert_eq!(core.reported_time(), 4.0);
}

#[test]
fn test_seek_confirmation_does_not_loop() {
    let (mut core, _) = ready(10.0);
    core.request_seek(7.0);

    // Confirmations of the seek must never be turned back into a seek
    for _ in 0..5 {
        drain(&mut core);
    }
    assert_eq!(seeks(&core), 1);
    assert_eq!(core.transport().primitive().pending_events(), 0);
}

#[test]
fn test_playback_overrides_optimistic_position() {
    let (mut core, _) = ready(10.0);
    core.request_toggle();
    drain(&mut core);

    core.request_seek(6.0);
    core.primitive_mut().advance(0.5);
    drain(&mut core);

    assert!((core.reported_time() - 6.5).abs() < 1e-9);
}

// ===== Loading =====

#[test]
fn test_seek_during_loading_is_buffered_latest_wins() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(30.0));
    core.load("clip.mp4");

    core.request_seek(3.0);
    core.request_seek(12.0);
    assert_eq!(seeks(&core), 0, "Nothing reaches the primitive while loading");
    assert_eq!(core.session().and_then(|s| s.target_time()), Some(12.0));

    core.primitive_mut().resolve_metadata();
    drain(&mut core);

    assert_eq!(core.state(), SyncState::Ready);
    assert_eq!(seeks(&core), 1);
    assert_eq!(core.transport().primitive().current_time(), 12.0);
    assert_eq!(core.reported_time(), 12.0);
    assert_eq!(core.session().and_then(|s| s.target_time()), None);
}

#[test]
fn test_buffered_seek_is_clamped_on_replay() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(8.0));
    core.load("clip.mp4");
    core.request_seek(100.0);

    core.primitive_mut().resolve_metadata();
    drain(&mut core);

    assert_eq!(core.reported_time(), 8.0);
}

#[test]
fn test_load_discards_previous_buffered_seek() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(30.0));
    core.load("first.mp4");
    core.request_seek(20.0);

    core.load("second.mp4");
    core.primitive_mut().resolve_metadata();
    drain(&mut core);

    assert_eq!(seeks(&core), 0);
    assert_eq!(core.reported_time(), 0.0);
}

// ===== Play State =====

#[test]
fn test_ended_clears_playing_without_pause_request() {
    let (mut core, _) = ready(2.0);
    core.request_toggle();
    drain(&mut core);
    assert!(core.is_playing());

    core.primitive_mut().advance(5.0);
    let events = drain(&mut core);

    assert!(events.contains(&PlayerEvent::Ended));
    assert!(!core.is_playing());
    assert_eq!(core.transport().primitive().calls().pause, 0);
    assert_eq!(core.reported_time(), 2.0);
}

#[test]
fn test_toggle_after_end_restarts() {
    let (mut core, _) = ready(1.0);
    core.request_toggle();
    core.primitive_mut().advance(2.0);
    drain(&mut core);
    assert!(!core.is_playing());

    core.request_toggle();
    drain(&mut core);

    assert!(core.is_playing());
    assert_eq!(core.reported_time(), 0.0);
}

#[test]
fn test_toggle_is_ignored_until_confirmed() {
    let (mut core, _) = ready(10.0);

    core.request_toggle();
    core.request_toggle();
    core.request_toggle();

    let calls = core.transport().primitive().calls();
    assert_eq!(calls.play, 1);
    assert_eq!(calls.pause, 0);

    let events = drain(&mut core);
    assert_eq!(events, vec![PlayerEvent::PlayStateChanged { is_playing: true }]);

    core.request_toggle();
    drain(&mut core);
    assert!(!core.is_playing());
    assert_eq!(core.transport().primitive().calls().pause, 1);
}

#[test]
fn test_external_pause_is_reflected() {
    let (mut core, session) = ready(10.0);
    core.request_toggle();
    drain(&mut core);

    // e.g. the user pressed pause on the native controls
    core.handle_primitive_event(session, PrimitiveEvent::Pause);
    assert!(!core.is_playing());
}

#[test]
fn test_refused_play_releases_toggle() {
    let (mut core, session) = ready(10.0);

    core.request_toggle();
    assert!(core.is_toggle_pending());

    // The host reports a refused play() as a pause
    core.handle_primitive_event(session, PrimitiveEvent::Pause);
    assert!(!core.is_toggle_pending());
    assert!(!core.is_playing());

    core.request_toggle();
    assert_eq!(core.transport().primitive().calls().play, 2);
}

// ===== Sessions =====

#[test]
fn test_stale_session_signals_are_ignored() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(10.0));
    let old = core.load("first.mp4");
    let new = core.load("second.mp4");
    assert_ne!(old, new);

    core.primitive_mut()
        .emit_tagged(old, PrimitiveEvent::LoadedMetadata { duration: 99.0 });
    core.primitive_mut()
        .emit_tagged(old, PrimitiveEvent::TimeUpdate { current_time: 42.0 });
    core.primitive_mut().emit_tagged(old, PrimitiveEvent::Play);
    assert!(drain(&mut core).is_empty());

    assert_eq!(core.state(), SyncState::Loading);
    assert_eq!(core.reported_time(), 0.0);
    assert!(!core.is_playing());

    core.primitive_mut().resolve_metadata();
    drain(&mut core);
    assert_eq!(core.duration(), Some(10.0));
}

#[test]
fn test_unload_then_reload_starts_fresh() {
    let (mut core, first) = ready(10.0);
    core.request_seek(5.0);
    core.unload();
    assert_eq!(core.state(), SyncState::Unloaded);

    let second = core.load("again.mp4");
    assert!(second.as_u64() > first.as_u64());
    assert_eq!(core.state(), SyncState::Loading);
    assert_eq!(core.reported_time(), 0.0);
    assert_eq!(core.duration(), None);
}

#[test]
fn test_requests_without_source_do_nothing() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(10.0));
    core.request_seek(3.0);
    core.request_toggle();

    let calls = core.transport().primitive().calls();
    assert_eq!(calls.seek, 0);
    assert_eq!(calls.play, 0);
    assert!(core.set_playback_rate(1.5).is_err());
}

// ===== Degraded Media =====

#[test]
fn test_invalid_duration_degrades_session() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(f64::NAN));
    core.load("live.m3u8");
    core.request_seek(4.0);

    core.primitive_mut().resolve_metadata();
    let events = drain(&mut core);

    assert_eq!(
        events,
        vec![PlayerEvent::DurationResolved {
            duration_secs: None
        }]
    );
    assert_eq!(core.state(), SyncState::Ready);
    assert!(core.snapshot().degraded);
    assert!(!core.can_seek());
    assert_eq!(seeks(&core), 0, "Buffered seek dropped");
}

#[test]
fn test_degraded_session_still_plays() {
    let mut core = SyncCore::new(SimulatedPrimitive::new(f64::INFINITY));
    core.load("live.m3u8");
    core.primitive_mut().resolve_metadata();
    drain(&mut core);

    core.request_toggle();
    core.primitive_mut().advance(1.5);
    drain(&mut core);

    assert!(core.is_playing());
    assert_eq!(core.reported_time(), 1.5);

    core.request_seek(0.0);
    assert_eq!(seeks(&core), 0);
    assert_eq!(core.reported_time(), 1.5);
}

// ===== Playback Rate =====

#[test]
fn test_playback_rate_scales_advance() {
    let (mut core, _) = ready(60.0);
    core.set_playback_rate(2.0).unwrap();
    core.request_toggle();
    core.primitive_mut().advance(1.0);
    drain(&mut core);

    assert_eq!(core.reported_time(), 2.0);
    assert!(core.set_playback_rate(0.0).is_err());
    assert!(core.set_playback_rate(f64::NAN).is_err());
}

//! Engine behaviour against the in-memory fake backend.
//!
//! This suite verifies:
//! - The unified state follows backend reports after `dispatch_pending`
//! - Playlist-driven transport (play, next, prev, request_play)
//! - Stale notifications from replaced play targets are dropped
//! - Observer events and device-scoped operations

mod common;

use bridge_traits::{BackendEvent, BackendKind, BackendState, CoreState, PlayMode, Playlist};
use common::{engine_with_files, SharedProbe, MEDIA_DURATION, VOLUME_STEP};
use core_playback::{PlaybackError, PlayerEngine};
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventStream, PlaybackEvent, PlaylistEvent};
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_engine_is_idle() {
    let (engine, probe) = engine_with_files(&[]);

    assert_eq!(engine.state(), CoreState::Idle);
    assert!(!engine.paused());
    assert!(engine.playing_movie_info().is_empty());
    assert_eq!(engine.backend_kind(), BackendKind::Software);
    assert!(engine.current_item().is_none());
    assert!(probe.lock().calls.is_empty());
}

#[test]
fn test_hardware_backend_selected_from_settings() {
    let probe = SharedProbe::default();
    let settings = core_runtime::config::PlayerSettings::from_json(
        r#"{ "backend": "hardware", "play_mode": "list-loop" }"#,
    )
    .unwrap();
    let config = PlayerConfig::builder()
        .settings(settings)
        .backend_factory(Arc::new(common::FakeFactory::new(
            BackendKind::Software,
            probe.clone(),
        )))
        .backend_factory(Arc::new(common::FakeFactory::new(
            BackendKind::HardwareAccelerated,
            probe.clone(),
        )))
        .build()
        .unwrap();

    let engine = PlayerEngine::new(&config).unwrap();
    assert_eq!(engine.backend_kind(), BackendKind::HardwareAccelerated);
}

#[test]
fn test_factory_kind_mismatch_is_rejected() {
    struct LyingFactory(SharedProbe);

    impl bridge_traits::BackendFactory for LyingFactory {
        fn kind(&self) -> BackendKind {
            BackendKind::Software
        }

        fn create(
            &self,
            notifier: bridge_traits::Notifier,
        ) -> bridge_traits::error::Result<Box<dyn bridge_traits::PlaybackBackend>> {
            common::FakeFactory::new(BackendKind::HardwareAccelerated, self.0.clone())
                .create(notifier)
        }
    }

    use bridge_traits::BackendFactory;

    let config = PlayerConfig::builder()
        .backend_factory(Arc::new(LyingFactory(SharedProbe::default())))
        .build()
        .unwrap();

    let err = PlayerEngine::new(&config).unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::BackendUnavailable(BackendKind::Software)
    ));
}

#[test]
fn test_factory_failure_propagates() {
    struct NoDeviceFactory;

    impl bridge_traits::BackendFactory for NoDeviceFactory {
        fn kind(&self) -> BackendKind {
            BackendKind::HardwareAccelerated
        }

        fn create(
            &self,
            _notifier: bridge_traits::Notifier,
        ) -> bridge_traits::error::Result<Box<dyn bridge_traits::PlaybackBackend>> {
            Err(bridge_traits::BridgeError::OperationFailed(
                "no video output device".to_string(),
            ))
        }
    }

    let config = PlayerConfig::builder()
        .backend(BackendKind::HardwareAccelerated)
        .backend_factory(Arc::new(NoDeviceFactory))
        .build()
        .unwrap();

    let err = PlayerEngine::new(&config).unwrap_err();
    assert!(err.is_construction_error());
    assert!(matches!(
        err,
        PlaybackError::Bridge(bridge_traits::BridgeError::OperationFailed(_))
    ));
    assert!(err.to_string().contains("no video output device"));
}

// ============================================================================
// Transport
// ============================================================================

#[test]
fn test_play_next_stop_scenario() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);

    engine.play();
    engine.dispatch_pending();
    assert_eq!(engine.state(), CoreState::Playing);
    assert_eq!(
        engine.playing_movie_info().file_path.as_deref(),
        Some(Path::new("/media/a.mp4"))
    );
    assert_eq!(engine.current_item().unwrap().title, "a");

    engine.next();
    engine.dispatch_pending();
    assert_eq!(engine.state(), CoreState::Playing);
    assert_eq!(
        engine.playing_movie_info().file_path.as_deref(),
        Some(Path::new("/media/b.mp4"))
    );
    // Teardown of a.mp4 was reported under the old generation.
    assert_eq!(engine.discarded_notifications(), 1);

    engine.stop();
    engine.dispatch_pending();
    assert_eq!(engine.state(), CoreState::Idle);
    assert!(engine.playing_movie_info().is_empty());

    assert_eq!(probe.lock().count("play"), 2);
}

#[test]
fn test_play_while_active_is_noop() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);

    engine.play();
    engine.dispatch_pending();
    engine.play();
    engine.dispatch_pending();

    assert_eq!(probe.lock().count("set_play_file"), 1);
    assert_eq!(engine.playlist().current(), Some(0));
}

#[test]
fn test_play_on_empty_playlist_stays_idle() {
    let (mut engine, probe) = engine_with_files(&[]);

    engine.play();
    assert_eq!(engine.dispatch_pending(), 0);

    assert_eq!(engine.state(), CoreState::Idle);
    assert!(probe.lock().calls.is_empty());
}

#[test]
fn test_repeated_play_before_dispatch_starts_once() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);

    engine.play();
    engine.play();
    engine.dispatch_pending();

    assert_eq!(probe.lock().count("set_play_file"), 1);
    assert_eq!(probe.lock().count("play"), 1);
    assert_eq!(engine.current_item().unwrap().title, "a");
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
fn test_play_after_stop_restarts_from_playlist() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);

    engine.play();
    engine.stop();
    engine.play();
    engine.dispatch_pending();

    assert_eq!(probe.lock().count("set_play_file"), 2);
    assert_eq!(engine.current_item().unwrap().title, "b");
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
fn test_request_play_stages_requested_index() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4", "/media/c.mp4"]);

    engine.request_play(2);
    engine.dispatch_pending();

    let probe = probe.lock();
    assert_eq!(probe.staged.len(), 1);
    assert_eq!(probe.staged[0].0, Path::new("/media/c.mp4"));
    assert_eq!(probe.staged[0].1, engine.generation());
    assert_eq!(probe.count("play"), 1);
    assert_eq!(engine.playlist().current(), Some(2));
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_request_play_out_of_range_panics() {
    let (mut engine, _probe) = engine_with_files(&["/media/a.mp4"]);
    engine.request_play(1);
}

#[test]
fn test_try_request_play_out_of_range_errors() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);

    let err = engine.try_request_play(5).unwrap_err();
    assert!(matches!(
        err,
        PlaybackError::IndexOutOfBounds { index: 5, len: 1 }
    ));
    assert!(probe.lock().calls.is_empty());

    engine.try_request_play(0).unwrap();
    engine.dispatch_pending();
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
fn test_unplayable_media_stalls_without_fallback() {
    let (mut engine, probe) = engine_with_files(&["/media/broken.mp4", "/media/b.mp4"]);
    probe.reject("/media/broken.mp4");

    engine.play();
    engine.dispatch_pending();

    assert_eq!(engine.state(), CoreState::Idle);
    let probe = probe.lock();
    assert_eq!(probe.count("is_playable"), 1);
    assert_eq!(probe.count("play"), 0);
    // No skip to the next item.
    assert_eq!(probe.staged.len(), 1);
    assert_eq!(engine.playlist().current(), Some(0));
}

#[test]
fn test_pause_resume_alternates() {
    let (mut engine, _probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();

    let mut expected = [CoreState::Paused, CoreState::Playing].into_iter().cycle();
    for _ in 0..4 {
        engine.pause_resume();
        engine.dispatch_pending();
        assert_eq!(engine.state(), expected.next().unwrap());
    }

    engine.pause_resume();
    engine.dispatch_pending();
    assert!(engine.paused());
}

#[test]
fn test_prev_follows_play_mode() {
    let probe = SharedProbe::default();
    let config = PlayerConfig::builder()
        .play_mode(PlayMode::ListLoop)
        .backend_factory(Arc::new(common::FakeFactory::new(
            BackendKind::Software,
            probe.clone(),
        )))
        .build()
        .unwrap();
    let mut engine = PlayerEngine::new(&config).unwrap();
    engine.add_play_file("/media/a.mp4");
    engine.add_play_file("/media/b.mp4");

    engine.prev();
    engine.dispatch_pending();
    assert_eq!(engine.current_item().unwrap().title, "b");

    engine.next();
    engine.dispatch_pending();
    assert_eq!(engine.current_item().unwrap().title, "a");
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
fn test_next_at_end_of_order_playlist_is_noop() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let generation = engine.generation();

    engine.next();
    engine.dispatch_pending();

    assert_eq!(engine.generation(), generation);
    assert_eq!(probe.lock().count("set_play_file"), 1);
    assert_eq!(engine.state(), CoreState::Playing);
}

// ============================================================================
// Play generations
// ============================================================================

#[test]
fn test_stale_notifications_do_not_change_state() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let old = engine.generation();

    engine.next();
    engine.dispatch_pending();
    assert!(engine.generation() > old);

    probe.inject(old, BackendEvent::StateChanged(BackendState::Stopped));
    probe.inject(old, BackendEvent::StateChanged(BackendState::Paused));
    assert_eq!(engine.dispatch_pending(), 0);

    assert_eq!(engine.state(), CoreState::Playing);
    assert_eq!(engine.discarded_notifications(), 3);
}

#[test]
fn test_device_events_from_old_generation_are_published() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4", "/media/b.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let old = engine.generation();
    engine.next();
    engine.dispatch_pending();

    let mut stream = EventStream::new(engine.subscribe());
    probe.inject(old, BackendEvent::VolumeChanged(20));
    assert_eq!(engine.dispatch_pending(), 1);

    assert_eq!(
        stream.drain(),
        vec![CoreEvent::Playback(PlaybackEvent::VolumeChanged { volume: 20 })]
    );
}

// ============================================================================
// Audio, subtitles, screenshots
// ============================================================================

#[test]
fn test_toggle_mute_twice_restores() {
    let (mut engine, _probe) = engine_with_files(&[]);
    let initial = engine.muted();

    engine.toggle_mute();
    assert_ne!(engine.muted(), initial);
    engine.toggle_mute();
    assert_eq!(engine.muted(), initial);
}

#[test]
fn test_volume_up_down_inverse_within_range() {
    let (mut engine, _probe) = engine_with_files(&[]);
    engine.change_volume(40);

    engine.volume_up();
    assert_eq!(engine.volume(), 40 + VOLUME_STEP);
    engine.volume_down();
    assert_eq!(engine.volume(), 40);

    engine.change_volume(250);
    assert_eq!(engine.volume(), 100);
    engine.volume_up();
    assert_eq!(engine.volume(), 100);
}

#[test]
fn test_subtitles_delegate_once_active() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);

    engine.load_subtitle("/media/a.srt");
    assert!(!engine.is_sub_visible());
    assert_eq!(probe.lock().count("load_subtitle"), 0);

    engine.play();
    engine.dispatch_pending();
    engine.load_subtitle("/media/a.srt");
    assert!(engine.is_sub_visible());
    engine.toggle_subtitle();
    assert!(!engine.is_sub_visible());
}

#[test]
fn test_screenshot_null_when_idle() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);
    assert!(engine.take_screenshot().is_null());
    assert_eq!(probe.lock().count("take_screenshot"), 1);

    engine.play();
    engine.dispatch_pending();
    let shot = engine.take_screenshot();
    assert_eq!((shot.width, shot.height), (4, 2));
}

#[test]
fn test_seek_reports_elapsed() {
    let (mut engine, _probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let mut stream = EventStream::new(engine.subscribe())
        .filter(|event| matches!(event, CoreEvent::Playback(PlaybackEvent::ElapsedChanged { .. })));

    engine.seek_forward(30);
    engine.seek_backward(10);
    engine.dispatch_pending();

    assert_eq!(
        stream.drain(),
        vec![
            CoreEvent::Playback(PlaybackEvent::ElapsedChanged {
                elapsed_ms: 30_000,
                duration_ms: MEDIA_DURATION.as_millis() as u64,
            }),
            CoreEvent::Playback(PlaybackEvent::ElapsedChanged {
                elapsed_ms: 20_000,
                duration_ms: MEDIA_DURATION.as_millis() as u64,
            }),
        ]
    );
    assert_eq!(engine.elapsed().as_secs(), 20);
    assert_eq!(engine.duration(), MEDIA_DURATION);
}

// ============================================================================
// Observers
// ============================================================================

#[test]
fn test_observers_see_state_after_engine_updates() {
    let (mut engine, _probe) = engine_with_files(&["/media/a.mp4"]);
    let mut stream = EventStream::new(engine.subscribe());

    engine.play();
    engine.dispatch_pending();

    let events = stream.drain();
    assert_eq!(
        events,
        vec![
            CoreEvent::Playlist(PlaylistEvent::CurrentChanged { index: 0 }),
            CoreEvent::Playback(PlaybackEvent::FileLoaded {
                title: "a".to_string()
            }),
            CoreEvent::Playback(PlaybackEvent::StateChanged {
                state: CoreState::Playing
            }),
        ]
    );
    assert_eq!(engine.state(), CoreState::Playing);
}

#[test]
fn test_redundant_state_report_is_republished() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let mut stream = EventStream::new(engine.subscribe());

    let generation = engine.generation();
    probe.inject(generation, BackendEvent::StateChanged(BackendState::Playing));
    probe.inject(generation, BackendEvent::StateChanged(BackendState::Playing));

    assert_eq!(engine.dispatch_pending(), 2);
    assert_eq!(engine.state(), CoreState::Playing);
    let playing = CoreEvent::Playback(PlaybackEvent::StateChanged {
        state: CoreState::Playing,
    });
    assert_eq!(stream.drain(), vec![playing.clone(), playing]);
}

#[test]
fn test_playlist_events() {
    let (mut engine, _probe) = engine_with_files(&[]);
    let mut stream = EventStream::new(engine.subscribe())
        .filter(|event| matches!(event, CoreEvent::Playlist(_)));

    engine.add_play_file("/media/a.mp4");
    engine.clear_playlist();

    assert_eq!(
        stream.drain(),
        vec![
            CoreEvent::Playlist(PlaylistEvent::ItemAppended {
                index: 0,
                path: "/media/a.mp4".into(),
            }),
            CoreEvent::Playlist(PlaylistEvent::Cleared),
        ]
    );
    assert!(engine.playlist().is_empty());
}

#[test]
fn test_burst_screenshot_publishes_capture() {
    let (mut engine, _probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let mut stream = EventStream::new(engine.subscribe());

    engine.burst_screenshot();
    engine.stop_burst_screenshot();
    engine.dispatch_pending();

    assert_eq!(
        stream.drain(),
        vec![CoreEvent::Playback(PlaybackEvent::ScreenshotTaken {
            width: 4,
            height: 2,
            size_bytes: 4,
        })]
    );
}

#[tokio::test]
async fn test_notifications_from_worker_thread() {
    let (mut engine, probe) = engine_with_files(&["/media/a.mp4"]);
    engine.play();
    engine.dispatch_pending();
    let generation = engine.generation();

    let worker = std::thread::spawn(move || {
        probe.inject(generation, BackendEvent::StateChanged(BackendState::Paused));
    });
    worker.join().unwrap();

    let mut subscriber = engine.subscribe();
    engine.dispatch_pending();
    assert_eq!(engine.state(), CoreState::Paused);
    assert_eq!(
        subscriber.recv().await.unwrap(),
        CoreEvent::Playback(PlaybackEvent::StateChanged {
            state: CoreState::Paused
        })
    );
}

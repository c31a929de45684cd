//! Scriptable in-memory backend shared by the integration tests.

#![allow(dead_code)]

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BackendEvent, BackendFactory, BackendKind, BackendState, Notifier, PlayGeneration,
    PlaybackBackend, PlayingMovieInfo, Screenshot,
};
use bytes::Bytes;
use core_playback::PlayerEngine;
use core_runtime::config::PlayerConfig;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

pub const VOLUME_STEP: u32 = 5;
pub const MEDIA_DURATION: Duration = Duration::from_secs(90);

/// What the fake backend saw, readable from the test.
#[derive(Debug, Default)]
pub struct Probe {
    pub calls: Vec<&'static str>,
    pub staged: Vec<(PathBuf, PlayGeneration)>,
    /// Files `is_playable` rejects.
    pub unplayable: Vec<PathBuf>,
    pub notifier: Option<Notifier>,
}

impl Probe {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

#[derive(Clone, Default)]
pub struct SharedProbe(Arc<Mutex<Probe>>);

impl SharedProbe {
    pub fn lock(&self) -> MutexGuard<'_, Probe> {
        self.0.lock().unwrap()
    }

    pub fn reject(&self, path: &str) {
        self.lock().unplayable.push(PathBuf::from(path));
    }

    /// Inject a notification as if the backend produced it.
    pub fn inject(&self, generation: PlayGeneration, event: BackendEvent) {
        let notifier = self.lock().notifier.clone().unwrap();
        assert!(notifier.notify(generation, event));
    }
}

/// Behaves like a decoder that loads and starts instantly.
///
/// State changes are reported through the notifier only; the engine sees
/// them after `dispatch_pending`.
pub struct FakeBackend {
    kind: BackendKind,
    notifier: Notifier,
    probe: SharedProbe,
    state: BackendState,
    generation: PlayGeneration,
    playable: bool,
    volume: u32,
    muted: bool,
    sub_visible: bool,
    elapsed: Duration,
    info: PlayingMovieInfo,
}

impl FakeBackend {
    fn record(&self, call: &'static str) {
        self.probe.lock().calls.push(call);
    }

    fn report(&self, event: BackendEvent) {
        self.notifier.notify(self.generation, event);
    }

    fn set_state(&mut self, state: BackendState) {
        self.state = state;
        self.report(BackendEvent::StateChanged(state));
    }
}

impl PlaybackBackend for FakeBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn set_play_file(&mut self, path: &Path, generation: PlayGeneration) {
        self.record("set_play_file");

        // Tearing down the previous file is reported under its own generation.
        if self.state != BackendState::Stopped {
            self.set_state(BackendState::Stopped);
        }

        let mut probe = self.probe.lock();
        probe.staged.push((path.to_path_buf(), generation));
        self.playable = !probe.unplayable.iter().any(|rejected| rejected == path);
        drop(probe);

        self.generation = generation;
        self.elapsed = Duration::ZERO;
        self.info = PlayingMovieInfo {
            title: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_path: Some(path.to_path_buf()),
            duration: MEDIA_DURATION,
            tracks: Vec::new(),
        };

        if self.playable {
            self.report(BackendEvent::FileLoaded);
        } else {
            self.set_state(BackendState::Stopped);
        }
    }

    fn is_playable(&self) -> bool {
        self.record("is_playable");
        self.playable
    }

    fn play(&mut self) {
        self.record("play");
        if self.playable {
            self.set_state(BackendState::Playing);
        }
    }

    fn pause_resume(&mut self) {
        self.record("pause_resume");
        match self.state {
            BackendState::Playing => self.set_state(BackendState::Paused),
            BackendState::Paused => self.set_state(BackendState::Playing),
            BackendState::Stopped => {}
        }
    }

    fn stop(&mut self) {
        self.record("stop");
        self.set_state(BackendState::Stopped);
    }

    fn state(&self) -> BackendState {
        self.state
    }

    fn seek_forward(&mut self, secs: u32) {
        self.record("seek_forward");
        self.elapsed = (self.elapsed + Duration::from_secs(secs.into())).min(MEDIA_DURATION);
        self.report(BackendEvent::ElapsedChanged(self.elapsed));
    }

    fn seek_backward(&mut self, secs: u32) {
        self.record("seek_backward");
        self.elapsed = self.elapsed.saturating_sub(Duration::from_secs(secs.into()));
        self.report(BackendEvent::ElapsedChanged(self.elapsed));
    }

    fn volume(&self) -> u32 {
        self.volume
    }

    fn change_volume(&mut self, volume: u32) {
        self.record("change_volume");
        self.volume = volume.min(100);
        self.report(BackendEvent::VolumeChanged(self.volume));
    }

    fn volume_up(&mut self) {
        self.record("volume_up");
        self.volume = (self.volume + VOLUME_STEP).min(100);
        self.report(BackendEvent::VolumeChanged(self.volume));
    }

    fn volume_down(&mut self) {
        self.record("volume_down");
        self.volume = self.volume.saturating_sub(VOLUME_STEP);
        self.report(BackendEvent::VolumeChanged(self.volume));
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn toggle_mute(&mut self) {
        self.record("toggle_mute");
        self.muted = !self.muted;
        self.report(BackendEvent::MuteChanged(self.muted));
    }

    fn load_subtitle(&mut self, _path: &Path) {
        self.record("load_subtitle");
        self.sub_visible = true;
    }

    fn toggle_subtitle(&mut self) {
        self.record("toggle_subtitle");
        self.sub_visible = !self.sub_visible;
    }

    fn is_sub_visible(&self) -> bool {
        self.record("is_sub_visible");
        self.sub_visible
    }

    fn take_screenshot(&mut self) -> Screenshot {
        self.record("take_screenshot");
        if self.state == BackendState::Stopped {
            return Screenshot::null();
        }
        Screenshot::new(4, 2, Bytes::from_static(b"\x89PNG"))
    }

    fn burst_screenshot(&mut self) {
        self.record("burst_screenshot");
        if self.state != BackendState::Stopped {
            self.report(BackendEvent::ScreenshotTaken(Screenshot::new(
                4,
                2,
                Bytes::from_static(b"\x89PNG"),
            )));
        }
    }

    fn stop_burst_screenshot(&mut self) {
        self.record("stop_burst_screenshot");
    }

    fn playing_movie_info(&self) -> &PlayingMovieInfo {
        &self.info
    }

    fn duration(&self) -> Duration {
        self.info.duration
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

pub struct FakeFactory {
    kind: BackendKind,
    probe: SharedProbe,
}

impl FakeFactory {
    pub fn new(kind: BackendKind, probe: SharedProbe) -> Self {
        Self { kind, probe }
    }
}

impl BackendFactory for FakeFactory {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn create(&self, notifier: Notifier) -> BridgeResult<Box<dyn PlaybackBackend>> {
        self.probe.lock().notifier = Some(notifier.clone());
        Ok(Box::new(FakeBackend {
            kind: self.kind,
            notifier,
            probe: self.probe.clone(),
            state: BackendState::Stopped,
            generation: PlayGeneration::INITIAL,
            playable: false,
            volume: 50,
            muted: false,
            sub_visible: false,
            elapsed: Duration::ZERO,
            info: PlayingMovieInfo::empty(),
        }))
    }
}

pub fn config(kind: BackendKind, probe: &SharedProbe) -> PlayerConfig {
    PlayerConfig::builder()
        .backend(kind)
        .backend_factory(Arc::new(FakeFactory::new(kind, probe.clone())))
        .build()
        .unwrap()
}

/// Software engine over a fake backend with `files` in its playlist.
pub fn engine_with_files(files: &[&str]) -> (PlayerEngine, SharedProbe) {
    let probe = SharedProbe::default();
    let mut engine = PlayerEngine::new(&config(BackendKind::Software, &probe)).unwrap();
    for file in files {
        engine.add_play_file(*file);
    }
    (engine, probe)
}

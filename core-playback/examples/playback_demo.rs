//! # Player Engine Usage Example
//!
//! Drives a `PlayerEngine` over a simulated backend whose "decoder thread"
//! reports position ticks from a worker thread.
//!
//! Run with: `cargo run --example playback_demo --package core-playback`

use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    BackendEvent, BackendFactory, BackendKind, BackendState, LogLevel, Notifier, PlayGeneration,
    PlaybackBackend, PlayingMovieInfo, Screenshot,
};
use bytes::Bytes;
use core_playback::PlayerEngine;
use core_runtime::config::PlayerConfig;
use core_runtime::events::{CoreEvent, EventStream};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ============================================================================
// Simulated backend
// ============================================================================

struct SimulatedBackend {
    notifier: Notifier,
    generation: PlayGeneration,
    state: BackendState,
    volume: u32,
    muted: bool,
    subtitles: bool,
    elapsed: Duration,
    info: PlayingMovieInfo,
}

impl SimulatedBackend {
    fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            generation: PlayGeneration::INITIAL,
            state: BackendState::Stopped,
            volume: 70,
            muted: false,
            subtitles: false,
            elapsed: Duration::ZERO,
            info: PlayingMovieInfo::empty(),
        }
    }

    fn transition(&mut self, state: BackendState) {
        self.state = state;
        self.notifier
            .notify(self.generation, BackendEvent::StateChanged(state));
    }

    /// Pretend the decoder thread advanced the clock.
    fn tick_from_worker(&self, ticks: u64) {
        let notifier = self.notifier.clone();
        let generation = self.generation;
        let start = self.elapsed;
        thread::spawn(move || {
            for tick in 1..=ticks {
                let elapsed = start + Duration::from_secs(tick);
                if !notifier.notify(generation, BackendEvent::ElapsedChanged(elapsed)) {
                    break;
                }
            }
        })
        .join()
        .ok();
    }
}

impl PlaybackBackend for SimulatedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn set_play_file(&mut self, path: &Path, generation: PlayGeneration) {
        if self.state != BackendState::Stopped {
            self.transition(BackendState::Stopped);
        }
        self.generation = generation;
        self.elapsed = Duration::ZERO;
        self.info = PlayingMovieInfo {
            title: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            file_path: Some(path.to_path_buf()),
            duration: Duration::from_secs(5 * 60),
            tracks: Vec::new(),
        };
        if self.is_playable() {
            self.notifier.notify(generation, BackendEvent::FileLoaded);
        } else {
            // Load failure is reported for the new target.
            self.transition(BackendState::Stopped);
        }
    }

    fn is_playable(&self) -> bool {
        self.info
            .file_path
            .as_deref()
            .and_then(Path::extension)
            .map_or(false, |ext| ext == "mp4" || ext == "mkv")
    }

    fn play(&mut self) {
        self.transition(BackendState::Playing);
        self.tick_from_worker(3);
    }

    fn pause_resume(&mut self) {
        match self.state {
            BackendState::Playing => self.transition(BackendState::Paused),
            BackendState::Paused => self.transition(BackendState::Playing),
            BackendState::Stopped => {}
        }
    }

    fn stop(&mut self) {
        self.transition(BackendState::Stopped);
    }

    fn state(&self) -> BackendState {
        self.state
    }

    fn seek_forward(&mut self, secs: u32) {
        self.elapsed += Duration::from_secs(secs.into());
        self.notifier
            .notify(self.generation, BackendEvent::ElapsedChanged(self.elapsed));
    }

    fn seek_backward(&mut self, secs: u32) {
        self.elapsed = self.elapsed.saturating_sub(Duration::from_secs(secs.into()));
        self.notifier
            .notify(self.generation, BackendEvent::ElapsedChanged(self.elapsed));
    }

    fn volume(&self) -> u32 {
        self.volume
    }

    fn change_volume(&mut self, volume: u32) {
        self.volume = volume.min(100);
        self.notifier
            .notify(self.generation, BackendEvent::VolumeChanged(self.volume));
    }

    fn volume_up(&mut self) {
        self.change_volume(self.volume + 10);
    }

    fn volume_down(&mut self) {
        self.change_volume(self.volume.saturating_sub(10));
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        self.notifier
            .notify(self.generation, BackendEvent::MuteChanged(self.muted));
    }

    fn load_subtitle(&mut self, _path: &Path) {
        self.subtitles = true;
    }

    fn toggle_subtitle(&mut self) {
        self.subtitles = !self.subtitles;
    }

    fn is_sub_visible(&self) -> bool {
        self.subtitles
    }

    fn take_screenshot(&mut self) -> Screenshot {
        match self.state {
            BackendState::Stopped => Screenshot::null(),
            _ => Screenshot::new(1920, 1080, Bytes::from_static(b"\x89PNG\r\n\x1a\n")),
        }
    }

    fn burst_screenshot(&mut self) {}

    fn stop_burst_screenshot(&mut self) {}

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

struct SimulatedFactory;

impl BackendFactory for SimulatedFactory {
    fn kind(&self) -> BackendKind {
        BackendKind::Software
    }

    fn create(&self, notifier: Notifier) -> BridgeResult<Box<dyn PlaybackBackend>> {
        Ok(Box::new(SimulatedBackend::new(notifier)))
    }
}

// ============================================================================
// Demo
// ============================================================================

fn print_events(stream: &mut EventStream) {
    for event in stream.drain() {
        match &event {
            CoreEvent::Playback(playback) => println!("  event: {:?}", playback),
            CoreEvent::Playlist(playlist) => println!("  playlist: {:?}", playlist),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    println!("=== Player Engine Demo ===\n");

    let config = PlayerConfig::builder()
        .backend_factory(Arc::new(SimulatedFactory))
        .event_buffer_size(64)
        .build()?;
    let mut engine = PlayerEngine::new(&config)?;
    let mut events = EventStream::new(engine.subscribe());

    println!("1. Building playlist");
    engine.add_play_file("/videos/intro.mp4");
    engine.add_play_file("/videos/feature.mkv");
    engine.add_play_file("/videos/notes.txt");
    print_events(&mut events);

    println!("\n2. Seeking while idle does nothing");
    engine.seek_forward(30);
    println!("  state: {}, elapsed: {:?}", engine.state(), engine.elapsed());

    println!("\n3. Play");
    engine.play();
    engine.dispatch_pending();
    print_events(&mut events);
    println!(
        "  state: {}, now playing: {}",
        engine.state(),
        engine.playing_movie_info().title
    );

    println!("\n4. Pause, volume and mute");
    engine.pause_resume();
    engine.volume_up();
    engine.toggle_mute();
    engine.dispatch_pending();
    print_events(&mut events);
    println!("  paused: {}, volume: {}, muted: {}", engine.paused(), engine.volume(), engine.muted());

    println!("\n5. Next item (old generation's teardown is discarded)");
    engine.next();
    engine.dispatch_pending();
    print_events(&mut events);
    println!(
        "  now playing: {}, discarded: {}",
        engine.playing_movie_info().title,
        engine.discarded_notifications()
    );

    let shot = engine.take_screenshot();
    println!("  screenshot: {}x{} ({} bytes)", shot.width, shot.height, shot.data.len());

    println!("\n6. Unplayable item stalls");
    engine.next();
    engine.dispatch_pending();
    print_events(&mut events);
    println!("  state: {}", engine.state());

    println!("\n7. Stop");
    engine.stop();
    engine.dispatch_pending();
    print_events(&mut events);
    println!("  state: {}", engine.state());

    println!("\n=== Demo Complete ===");
    Ok(())
}

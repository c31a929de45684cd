//! Logging system demonstration
//!
//! Shows the output formats and the host sink with log lines shaped like the
//! ones the playback engine emits.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run --example logging_demo -- compact "logging_demo=trace"
//! ```

use bridge_traits::{ConsoleLogger, LogLevel};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::env;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, span, trace, warn, Level};

fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_spans(true)
        .with_logger_sink(Arc::new(ConsoleLogger {
            min_level: LogLevel::Warn,
        }));

    match args.get(2) {
        Some(filter) => config = config.with_filter(filter.clone()),
        None => config = config.with_filter("logging_demo=trace"),
    }

    if let Err(err) = init_logging(config) {
        eprintln!("Failed to initialize logging: {}", err);
        return;
    }

    info!(format = ?format, "Logging initialized");

    demo_session();
    demo_stale_notifications(3);

    info!("=== Demo Complete ===");
}

fn demo_session() {
    let span = span!(Level::INFO, "session", backend = "software");
    let _enter = span.enter();

    let path = Path::new("/home/user/Videos/holiday.mp4");
    info!("Player engine created");
    trace!(operation = "seek_forward", "Skipped while idle");
    debug!(index = 0, file = %strip_path(path), generation = "gen#1", "Play requested");
    debug!(from = "idle", to = "playing", "State changed");

    let broken = Path::new("/home/user/Videos/broken.avi");
    warn!(index = 1, file = %strip_path(broken), "Media not playable, playback stalled");
}

#[instrument]
fn demo_stale_notifications(count: u32) {
    for stale in 0..count {
        debug!(event = "state_changed", stale, current = count, "Discarding stale backend notification");
    }
}

//! Logging setup for Cubby, built on the `tracing` stack.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

/// Map a level name from the config file onto a tracing `Level`.
///
/// Unrecognized names fall back to `INFO`.
fn resolve_level(name: &str) -> Level {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(resolve_level(level).into())
}

/// Install the global subscriber, writing to stdout and the configured log file.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // The log file's directory may not exist on a fresh install.
    if let Some(parent) = Path::new(&config.file).parent() {
        fs::create_dir_all(parent)?;
    }

    let file = Arc::new(File::create(&config.file)?);
    let sink = std::io::stdout.and(file);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(sink)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(build_filter(&config.level))
        .init();

    Ok(())
}

/// Install a stdout-only subscriber, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(layer)
        .with(build_filter(level))
        .init();
}

use notegen_core::config::types::{LoggingConfig, ResolvedConfig};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

/// Diagnostics go to stderr so stdout only carries the note or confirmation.
///
/// A log file that cannot be opened is fatal (exit 1), like any other
/// configuration failure.
pub fn init(cfg: &ResolvedConfig) {
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .with_target(false)
        .with_filter(filter_for(&cfg.logging.level, LevelFilter::WARN));

    let file_layer = cfg.logging.file.as_deref().map(|path| {
        let file = open_log_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to create log file {}: {}", path.display(), e);
            std::process::exit(1);
        });

        let (writer, guard) = tracing_appender::non_blocking(file);
        if let Ok(mut g) = LOG_GUARD.lock() {
            *g = Some(guard);
        }

        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_filter(filter_for(file_level(&cfg.logging), LevelFilter::DEBUG))
    });

    tracing_subscriber::registry().with(stderr_layer).with(file_layer).init();
}

/// Flush the file logger; `process::exit` skips destructors.
pub fn flush() {
    if let Ok(mut g) = LOG_GUARD.lock() {
        g.take();
    }
}

/// `RUST_LOG` wins; otherwise the configured level, or `fallback` if unparseable.
fn filter_for(level: &str, fallback: LevelFilter) -> EnvFilter {
    let default = parse_level(level).unwrap_or(fallback);
    EnvFilter::builder().with_default_directive(default.into()).from_env_lossy()
}

fn file_level(cfg: &LoggingConfig) -> &str {
    cfg.file_level.as_deref().unwrap_or(&cfg.level)
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.to_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

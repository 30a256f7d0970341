//! Logging setup on tracing + tracing-subscriber
//!
//! Console output goes to stderr so recommendations printed on stdout stay
//! machine-readable. A rolling file layer is stacked on top when
//! `[logging] file` is configured. `RUST_LOG` still works for per-module tuning.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Holds the background writer for the log file.
///
/// Dropping it flushes pending lines, so `main` keeps it alive until exit.
pub struct LogGuards {
    _file_guard: Option<WorkerGuard>,
}

/// Where a layer writes, which decides target and ANSI handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Terminal,
    File,
}

/// Install the global subscriber for a CLI run
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = effective_level(&settings.level, verbose, quiet);

    let mut file_guard = None;
    let file_layer = match settings.file.as_deref() {
        Some(log_file) => {
            let (writer, guard) = rolling_writer(log_file, settings)?;
            file_guard = Some(guard);
            Some(event_layer(writer, Sink::File, settings.json_format))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(engine_filter(level)?)
        .with(event_layer(io::stderr, Sink::Terminal, settings.json_format))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(%level, file = ?settings.file, "Logging initialized");
    Ok(LogGuards {
        _file_guard: file_guard,
    })
}

/// Stderr-only logging for commands that run before config is loaded
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(engine_filter(level)?)
        .with(event_layer(io::stderr, Sink::Terminal, false))
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))
}

/// `-q` silences everything but errors; each `-v` steps one level down
fn effective_level(configured: &str, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => configured_level(configured),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Unknown names fall back to info
fn configured_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn engine_filter(level: Level) -> Result<EnvFilter> {
    let name = level.as_str().to_ascii_lowercase();
    let crate_directive = format!("{}={}", env!("CARGO_CRATE_NAME"), name)
        .parse()
        .map_err(|e| Error::Internal(format!("Invalid log directive: {}", e)))?;

    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&name));
    Ok(base.add_directive(crate_directive))
}

fn event_layer<S, W>(writer: W, sink: Sink, json: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(sink == Sink::File || json)
        .with_ansi(sink == Sink::Terminal && !json);

    match (json, sink) {
        (true, _) => Box::new(layer.json().with_line_number(true)),
        (false, Sink::Terminal) => Box::new(layer.compact()),
        (false, Sink::File) => Box::new(layer),
    }
}

/// Non-blocking writer over a rolling appender next to `log_file`.
///
/// Size limits under 10 MB rotate hourly, anything else daily.
fn rolling_writer(
    log_file: &str,
    settings: &LoggingSettings,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let (directory, prefix) = split_log_path(Path::new(log_file));
    fs::create_dir_all(&directory).map_err(|e| Error::IoWrite {
        path: directory.clone(),
        source: e,
    })?;

    let rotation = match settings.max_file_size_mb {
        1..=9 => Rotation::HOURLY,
        _ => Rotation::DAILY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_files.max(1) as usize)
        .build(&directory)
        .map_err(|e| Error::Internal(format!("Failed to create log file appender: {}", e)))?;

    Ok(tracing_appender::non_blocking(appender))
}

/// Directory and file stem of the configured log path
fn split_log_path(path: &Path) -> (PathBuf, String) {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("persona-engine")
        .to_string();
    (directory, prefix)
}

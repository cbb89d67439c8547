//! Tracing subscriber setup: human readable or JSON lines, optionally mirrored to daily files.

use std::{env, sync::OnceLock};

use tracing::Level;
use tracing_appender::{
    non_blocking,
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{fmt, time::ChronoLocal, writer::MakeWriterExt},
};

use crate::error::AppError;

/// Keeps the file writer flushing until shutdown.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `RUST_LOG` filters (default `info`), `LOG_FORMAT=json` switches to JSON lines,
/// `LOG_DIR` adds a rotated file sink capped by `LOG_MAX_FILES`.
pub fn init() -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let file_writer = match env::var("LOG_DIR") {
        Ok(dir) => Some(file_writer(&dir)?),
        Err(_) => None,
    };

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_level(true);
    let stdout = std::io::stdout.with_max_level(Level::INFO);

    let installed = match (json, file_writer) {
        (true, Some(file)) => builder.json().with_writer(stdout.and(file)).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(file)) => builder
            .with_ansi(false)
            .with_writer(stdout.and(file))
            .try_init(),
        (false, None) => builder.with_ansi(true).try_init(),
    };
    installed.map_err(|e| AppError::Config(format!("failed to install logger: {e}")))?;

    tracing::info!(json, "logger initialized");
    Ok(())
}

fn file_writer(dir: &str) -> Result<NonBlocking, AppError> {
    let mut appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("riftradar")
        .filename_suffix("log");

    if let Some(n) = env::var("LOG_MAX_FILES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
    {
        appender = appender.max_log_files(n);
    }

    let appender = appender
        .build(dir)
        .map_err(|e| AppError::Config(format!("cannot open log directory {dir}: {e}")))?;

    let (writer, guard) = non_blocking(appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| AppError::Config("logger already initialized".into()))?;

    Ok(writer)
}

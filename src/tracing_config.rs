use std::{env, io};

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{Result, SettleError, config::ConfigPaths};

const DEFAULT_FILTER: &str = "warn";
const FORMAT_VAR: &str = "SETTLE_LOG_FORMAT";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn wants_json() -> bool {
    env::var(FORMAT_VAR).is_ok_and(|format| format == "json")
}

/// Initialize tracing for the application
///
/// Logs go to stderr so command output on stdout stays clean.
/// Uses RUST_LOG environment variable if set, otherwise defaults to "warn".
/// Supports both pretty console output and JSON output based on SETTLE_LOG_FORMAT.
///
/// # Errors
/// Returns error if a global subscriber is already installed
pub fn init() -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter());

    if wants_json() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .try_init()
            .map_err(SettleError::logging)
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_writer(io::stderr),
            )
            .try_init()
            .map_err(SettleError::logging)
    }
}

/// Initialize tracing with file output
///
/// Similar to init() but also writes logs to a daily rolling file in the
/// settle logs directory. The returned guard flushes the file writer when
/// dropped and must be held for as long as logging is needed.
///
/// # Errors
/// Returns error if file creation or tracing subscriber initialization fails
pub fn init_with_file() -> Result<WorkerGuard> {
    const DAYS_TO_KEEP: usize = 7;

    let log_dir = ConfigPaths::log_dir().map_err(|e| SettleError::io(e, "logs directory"))?;

    let file_appender = Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("settle")
        .filename_suffix("log")
        .build(&log_dir)
        .map_err(SettleError::logging)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(env_filter());

    if wants_json() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init()
            .map_err(SettleError::logging)?;
    } else {
        registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .with(
                fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(non_blocking)
                    .with_ansi(false),
            )
            .try_init()
            .map_err(SettleError::logging)?;
    }

    Ok(guard)
}

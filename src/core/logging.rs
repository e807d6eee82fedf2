//! Logging setup.
//!
//! Everything goes through `tracing`: a daily-rolling JSON file under the
//! app data directory, plus a pretty stdout layer outside the TUI. `log`
//! macros are bridged with `tracing-log`, and miette renders fatal errors.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::AppConfig;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// File name prefix; tracing-appender appends `.YYYY-MM-DD`.
pub const LOG_FILE: &str = "tokendeck.log";

/// Directory the rolling log files are written to.
pub fn log_dir() -> PathBuf {
    AppConfig::data_dir().join("logs")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn file_writer(log_dir: &Path) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    tracing_appender::non_blocking(file_appender)
}

/// Initialize logging for command-line use: JSON file plus pretty stdout.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
pub fn init() -> WorkerGuard {
    let log_dir = log_dir();
    let (non_blocking, guard) = file_writer(&log_dir);
    let filter = env_filter();

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(filter.clone());

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .pretty()
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    bridge_log_crate();
    init_miette();

    log::info!(
        "Logging initialized. Writing to: {:?} (daily rolling)",
        log_dir.join(LOG_FILE)
    );

    guard
}

/// Initialize logging for TUI mode.
///
/// Same as [`init()`] without the stdout layer; ratatui owns the terminal
/// while in raw/alternate-screen mode.
pub fn init_tui() -> WorkerGuard {
    let log_dir = log_dir();
    let (non_blocking, guard) = file_writer(&log_dir);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter());

    // No stdout layer, the TUI owns the terminal
    tracing_subscriber::registry().with(file_layer).init();

    bridge_log_crate();
    init_miette();

    guard
}

/// Route `log` macros into tracing. The subscriber's own `init()` usually
/// installs the bridge already, in which case this is a no-op.
fn bridge_log_crate() {
    if let Err(e) = tracing_log::LogTracer::init() {
        tracing::debug!("LogTracer not installed: {e}");
    }
}

/// Fancy miette reports, with colour only on a real terminal.
fn init_miette() {
    let colorize = io::stderr().is_terminal()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true);

    let result = miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(colorize)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(colorize)
                .build(),
        )
    }));
    if let Err(e) = result {
        log::debug!("miette hook already installed: {e}");
    }
}

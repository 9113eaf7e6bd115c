//! Logging setup.
//!
//! The TUI owns the terminal, so interactive runs log to a file. Headless runs
//! log to stderr where test harnesses can capture it.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "smart-search.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initializes logging for TUI mode.
///
/// The log file is truncated on each run. If it cannot be created, logging is
/// left disabled rather than writing over the UI.
pub fn init_file_logging() {
    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(log_file)
        .with_ansi(false)
        .try_init();
}

/// Initializes logging for headless mode.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the path for the log file.
///
/// `~/.local/state/smart-search/smart-search.log` on Linux, the config
/// directory elsewhere, the temp directory as a last resort.
pub fn get_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("smart-search").join(LOG_FILE);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("smart-search").join(LOG_FILE);
    }

    std::env::temp_dir().join(LOG_FILE)
}

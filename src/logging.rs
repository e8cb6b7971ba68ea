//! File logging setup.
//!
//! Logs go to a daily-rotated file under the user's state directory so
//! they never touch the terminal the UI draws on.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The returned guard must stay alive for the whole run; dropping it
/// flushes and stops the background writer. Returns `None` when no
/// writable log directory exists, in which case logging stays off.
pub fn init() -> Option<WorkerGuard> {
    let log_dir = state_dir()?;
    fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "vivace.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,vivace=debug"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok()?;

    Some(guard)
}

/// `$XDG_STATE_HOME/vivace`, falling back to `~/.local/state/vivace`.
fn state_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("XDG_STATE_HOME") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir).join("vivace"));
        }
    }
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".local/state/vivace"))
}

//! File logging for editor sessions.
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::EditorConfig;

pub const LOG_FILE: &str = "editor.log";

/// Routes `tracing` output to `<log dir>/<session>/editor.log`.
///
/// Stdout stays reserved for command output. The returned guard flushes
/// the writer when dropped and must outlive the command.
pub fn setup_logging(config: &EditorConfig) -> Result<WorkerGuard> {
    let log_dir = config.log_dir.clone().unwrap_or_else(log_directory);
    let session_id = config.session_id.clone().unwrap_or_else(new_session_id);

    // Create session-specific log directory
    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir).with_context(|| {
        format!(
            "Failed to create log directory: {}",
            session_log_dir.display()
        )
    })?;

    // Setup file appender
    let file_appender = tracing_appender::rolling::never(&session_log_dir, LOG_FILE);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // Create env filter
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    // File layer only; stdout carries command output
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}", session_log_dir.join(LOG_FILE).display());

    Ok(guard)
}

/// Platform cache directory for logs.
///
/// - macOS: `~/Library/Caches/dex/logs`
/// - Linux: `~/.cache/dex/logs` (or `$XDG_CACHE_HOME/dex/logs`)
/// - Windows: `%LOCALAPPDATA%\dex\cache\logs`
/// - Fallback: `/tmp/dex/logs`
pub fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "dex")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| Path::new("/tmp").join("dex"))
        .join("logs")
}

fn new_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{timestamp}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_ends_in_logs() {
        assert!(log_directory().ends_with("logs"));
    }

    #[test]
    fn test_session_id_format() {
        let id = new_session_id();
        let suffix = id.strip_prefix("session_").unwrap();
        assert!(suffix.parse::<u64>().is_ok());
    }
}

//! Editor configuration read from the environment.
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dex_core::KeyStyle;

/// Settings shared by every command.
#[derive(Clone, Debug, Default)]
pub struct EditorConfig {
    pub data_dir: Option<PathBuf>,
    pub key_style: KeyStyle,
    pub log_dir: Option<PathBuf>,
    pub session_id: Option<String>,
}

impl EditorConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DEX_DATA_DIR` - Directory holding the data files (default: next to the executable)
    /// - `DEX_KEY_STYLE` - `underscore` or `collapse` (default: underscore)
    /// - `DEX_LOG_DIR` - Directory for log sessions (default: platform cache dir)
    /// - `DEX_SESSION_ID` - Log session identifier (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var("DEX_DATA_DIR").ok().map(PathBuf::from);

        if let Some(style) = read_env::<KeyStyle>("DEX_KEY_STYLE") {
            config.key_style = style;
        }

        config.log_dir = env::var("DEX_LOG_DIR").ok().map(PathBuf::from);
        config.session_id = env::var("DEX_SESSION_ID").ok();

        config
    }

    /// Applies command-line flags on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, key_style: Option<KeyStyle>) -> Self {
        if data_dir.is_some() {
            self.data_dir = data_dir;
        }
        if let Some(style) = key_style {
            self.key_style = style;
        }
        self
    }

    /// The configured data directory, or the directory of the running executable.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        let exe = env::current_exe().context("Failed to locate the running executable")?;
        exe.parent()
            .map(PathBuf::from)
            .with_context(|| format!("Executable has no parent directory: {}", exe.display()))
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

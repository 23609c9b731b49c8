//! Error types raised while loading, saving and decoding documents.

use std::path::PathBuf;

use dex_core::RecordError;
use thiserror::Error;

/// Errors surfaced by the config store.
///
/// Absent sections, stats and lists are not errors: reads default them to
/// empty. Writes are strict.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("section `{0}` is not a table")]
    InvalidSection(String),

    #[error("record `{key}`: {source}")]
    Record {
        key: String,
        #[source]
        source: RecordError,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

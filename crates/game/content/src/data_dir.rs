//! Well-known data files of one data directory.

use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{Result, StoreError};

/// The tables a data directory holds, one file each.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TableKind {
    Moves,
    Pokemon,
    Types,
    Items,
    Abilities,
}

impl TableKind {
    /// Top-level section name inside the file.
    pub const fn section(self) -> &'static str {
        match self {
            Self::Moves => "Moves",
            Self::Pokemon => "Pokemon",
            Self::Types => "Types",
            Self::Items => "Items",
            Self::Abilities => "Abilities",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Moves => "moves.toml.bytes",
            Self::Pokemon => "pokemon.toml.bytes",
            Self::Types => "types.toml.bytes",
            Self::Items => "items.toml.bytes",
            Self::Abilities => "abilities.toml.bytes",
        }
    }
}

/// A directory containing the data files.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── moves.toml.bytes
/// ├── pokemon.toml.bytes
/// ├── types.toml.bytes
/// ├── items.toml.bytes
/// └── abilities.toml.bytes
/// ```
///
/// The directory never picks a fallback location: a missing file is
/// reported as [`StoreError::NotFound`] and the caller decides what to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where `kind` is expected, whether or not it exists.
    pub fn path(&self, kind: TableKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Path of an existing file for `kind`.
    pub fn resolve(&self, kind: TableKind) -> Result<PathBuf> {
        let path = self.path(kind);
        if path.is_file() {
            Ok(path)
        } else {
            Err(StoreError::NotFound(path))
        }
    }

    /// Loads the file for `kind`, creating its section if absent.
    pub fn load(&self, kind: TableKind) -> Result<Document> {
        let path = self.resolve(kind)?;
        Document::load_section(&path, kind.section())
    }

    /// Like [`DataDir::load`] but a missing file yields `None`.
    pub fn load_optional(&self, kind: TableKind) -> Result<Option<Document>> {
        match self.load(kind) {
            Ok(document) => Ok(Some(document)),
            Err(StoreError::NotFound(path)) => {
                tracing::debug!("Optional table {} not found at {}", kind, path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Saves `document` as the file for `kind`.
    pub fn save(&self, kind: TableKind, document: &Document) -> Result<()> {
        document.save(self.path(kind))
    }
}

//! Data directory access shared by the commands.
use anyhow::{Context, Result};
use dex_content::{CrossRefs, DataDir, Document, TableKind};
use dex_core::{CreatureCodec, KeyStyle, MoveCodec};

use crate::output::OutputFormat;

/// One invocation's view of the data directory.
#[derive(Clone, Debug)]
pub struct Session {
    dir: DataDir,
    style: KeyStyle,
    format: OutputFormat,
}

impl Session {
    pub fn new(dir: DataDir, style: KeyStyle, format: OutputFormat) -> Self {
        Self { dir, style, format }
    }

    pub fn dir(&self) -> &DataDir {
        &self.dir
    }

    pub fn style(&self) -> KeyStyle {
        self.style
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn move_codec(&self) -> MoveCodec {
        MoveCodec::new(self.style)
    }

    pub fn creature_codec(&self) -> CreatureCodec {
        CreatureCodec::new(self.style)
    }

    /// Loads an existing table file.
    pub fn load(&self, kind: TableKind) -> Result<Document> {
        self.dir
            .load(kind)
            .with_context(|| format!("Failed to load {} table", kind))
    }

    /// Loads a table file, starting an empty document if it does not exist yet.
    pub fn load_or_create(&self, kind: TableKind) -> Result<Document> {
        let loaded = self
            .dir
            .load_optional(kind)
            .with_context(|| format!("Failed to load {} table", kind))?;

        match loaded {
            Some(document) => Ok(document),
            None => {
                tracing::info!(
                    "Starting new {} table at {}",
                    kind,
                    self.dir.path(kind).display()
                );
                let mut document = Document::new();
                document.ensure_section(kind.section())?;
                Ok(document)
            }
        }
    }

    pub fn save(&self, kind: TableKind, document: &Document) -> Result<()> {
        self.dir
            .save(kind, document)
            .with_context(|| format!("Failed to save {} table", kind))
    }

    /// Names of every referenced table; missing files read as empty.
    pub fn cross_refs(&self) -> Result<CrossRefs> {
        CrossRefs::load(&self.dir, self.style).context("Failed to load cross references")
    }
}

//! `dex refs` command.
use anyhow::Result;
use clap::Parser;
use dex_content::TableKind;

use crate::output;
use crate::session::Session;

/// List the display names of a table, as offered for references
#[derive(Parser)]
pub struct Refs {
    /// moves, pokemon, types, items or abilities
    #[arg(value_name = "TABLE")]
    table: TableKind,
}

impl Refs {
    pub fn execute(self, session: &Session) -> Result<String> {
        let refs = session.cross_refs()?;
        output::render_names(refs.list(self.table), session.format())
    }
}

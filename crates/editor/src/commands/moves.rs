//! `dex moves` subcommands.
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dex_content::{TableKind, list_keys};
use dex_core::{MoveCategory, MoveCodec, MoveFlags, MoveRecord, RecordCodec};

use crate::output::{self, parse_flag_letters};
use crate::session::Session;

/// Edit the Moves table
#[derive(Subcommand)]
pub enum MovesCommand {
    /// List move names in stored order
    List,

    /// Show one move
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Create a move or update the given fields of an existing one
    Set(SetMove),

    /// Remove a move
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Field values for `moves set`; omitted fields keep their stored value.
#[derive(Args, Debug, Default)]
pub struct SetMove {
    #[arg(value_name = "NAME")]
    name: String,

    #[arg(long)]
    type1: Option<String>,

    #[arg(long)]
    type2: Option<String>,

    /// physical, special or status
    #[arg(long)]
    category: Option<MoveCategory>,

    #[arg(long)]
    power: Option<u16>,

    #[arg(long)]
    accuracy: Option<u8>,

    #[arg(long)]
    pp: Option<u8>,

    #[arg(long)]
    target: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    priority: Option<i8>,

    /// Set flags as letters a-h (e.g. `ac`); `-` clears all
    #[arg(long, value_parser = parse_flag_letters, allow_hyphen_values = true)]
    flags: Option<MoveFlags>,

    #[arg(long)]
    description: Option<String>,
}

impl SetMove {
    fn apply(self, record: &mut MoveRecord) {
        if let Some(v) = self.type1 {
            record.type1 = v;
        }
        if let Some(v) = self.type2 {
            record.type2 = v;
        }
        if let Some(v) = self.category {
            record.category = v;
        }
        if let Some(v) = self.power {
            record.power = v;
        }
        if let Some(v) = self.accuracy {
            record.accuracy = v;
        }
        if let Some(v) = self.pp {
            record.pp = v;
        }
        if let Some(v) = self.target {
            record.target = v;
        }
        if let Some(v) = self.priority {
            record.priority = v;
        }
        if let Some(v) = self.flags {
            record.flags = v;
        }
        if let Some(v) = self.description {
            record.description = v;
        }
    }
}

impl MovesCommand {
    pub fn execute(self, session: &Session) -> Result<String> {
        let codec = session.move_codec();

        match self {
            Self::List => {
                let document = session.load(TableKind::Moves)?;
                let names = list_keys(&document, TableKind::Moves.section(), session.style());
                output::render_names(&names, session.format())
            }
            Self::Show { name } => {
                let document = session.load(TableKind::Moves)?;
                let Some(record) = document.fetch(&codec, &name)? else {
                    bail!("Move `{}` not found", name);
                };
                output::render(&codec, &record, session.format())
            }
            Self::Set(set) => {
                let mut document = session.load_or_create(TableKind::Moves)?;
                let mut record = document
                    .fetch(&codec, &set.name)?
                    .unwrap_or_else(|| MoveRecord::new(set.name.trim()));
                set.apply(&mut record);

                let key = document.store(&codec, &record)?;
                session.save(TableKind::Moves, &document)?;
                Ok(format!("Saved [{}.{}]", MoveCodec::SECTION, key))
            }
            Self::Remove { name } => {
                let mut document = session.load(TableKind::Moves)?;
                if document.delete(&codec, &name).is_none() {
                    bail!("Move `{}` not found", name);
                }
                session.save(TableKind::Moves, &document)?;
                Ok(format!("Removed move `{}`", name))
            }
        }
    }
}

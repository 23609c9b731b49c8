//! `dex check` command.
use anyhow::{Result, bail};
use clap::Parser;
use console::style;
use dex_content::{DanglingRef, TableKind};

use crate::session::Session;

/// Report references in moves and Pokemon that name no known entry
#[derive(Parser)]
pub struct Check {}

impl Check {
    pub fn execute(self, session: &Session) -> Result<String> {
        let refs = session.cross_refs()?;
        let mut findings: Vec<(TableKind, String, DanglingRef)> = Vec::new();
        let mut checked = 0usize;

        if let Some(document) = session.dir().load_optional(TableKind::Moves)? {
            for (key, record) in document.records(&session.move_codec())? {
                checked += 1;
                for dangling in refs.check_move(&record) {
                    findings.push((TableKind::Moves, key.clone(), dangling));
                }
            }
        }

        if let Some(document) = session.dir().load_optional(TableKind::Pokemon)? {
            for (key, record) in document.records(&session.creature_codec())? {
                checked += 1;
                for dangling in refs.check_creature(&record) {
                    findings.push((TableKind::Pokemon, key.clone(), dangling));
                }
            }
        }

        tracing::info!(
            "Checked {} records, {} dangling references",
            checked,
            findings.len()
        );

        if findings.is_empty() {
            return Ok(format!(
                "{} {} records checked, all references resolve",
                style("✓").green().bold(),
                checked
            ));
        }

        for (kind, key, dangling) in &findings {
            eprintln!(
                "{} [{}.{}] {} = {} {}",
                style("✗").red().bold(),
                kind.section(),
                key,
                style(&dangling.field).bold(),
                dangling.value,
                style(format!("(not in {})", dangling.table)).dim()
            );
        }

        bail!(
            "{} dangling references in {} records",
            findings.len(),
            checked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::session;

    const TYPES: &str = "[Types.Normal]\n[Types.Grass]\n";
    const MOVES: &str = r#"
[Moves.Tackle]
name = "Tackle"
type1 = "Normal"
type2 = "None"
category = "Physical"
"#;

    #[test]
    fn test_clean_data_passes() {
        let pokemon = r#"
[Pokemon.Oddish]
name = "Oddish"
type1 = "Grass"
type2 = "None"
moves = [{ lvl = 1, move = "Tackle" }]
"#;
        let (_temp, session) = session(&[
            ("types.toml.bytes", TYPES),
            ("moves.toml.bytes", MOVES),
            ("pokemon.toml.bytes", pokemon),
        ]);

        let message = Check {}.execute(&session).unwrap();
        assert!(message.contains("2 records checked"));
    }

    #[test]
    fn test_unknown_move_is_reported() {
        let pokemon = r#"
[Pokemon.Oddish]
name = "Oddish"
type1 = "Grass"
type2 = "Fire"
moves = [{ lvl = 1, move = "Tackle" }, { lvl = 7, move = "Razor Leaf" }]
"#;
        let (_temp, session) = session(&[
            ("types.toml.bytes", TYPES),
            ("moves.toml.bytes", MOVES),
            ("pokemon.toml.bytes", pokemon),
        ]);

        let err = Check {}.execute(&session).unwrap_err();
        assert_eq!(err.to_string(), "2 dangling references in 2 records");
    }
}

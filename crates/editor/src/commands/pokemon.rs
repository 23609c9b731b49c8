//! `dex pokemon` subcommands.
use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use dex_content::{Document, TableKind, list_keys};
use dex_core::{
    CreatureCodec, CreatureRecord, Evolution, EvolutionMethod, EvolutionTrigger, MAX_ABILITIES,
    MAX_LEVEL, RecordCodec, Selection,
};

use crate::output;
use crate::session::Session;

/// Edit the Pokemon table
#[derive(Subcommand)]
pub enum PokemonCommand {
    /// List Pokemon names in stored order
    List,

    /// Show one Pokemon
    Show {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Create a Pokemon or update the given fields of an existing one
    Set(SetPokemon),

    /// Remove a Pokemon
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Append a learned move
    AddMove {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long = "move", value_name = "MOVE")]
        move_name: String,

        /// Level the move is learned at (clamped to 100)
        #[arg(long, default_value_t = 1)]
        level: u8,
    },

    /// Remove a learned move (the last one when no index is given)
    RemoveMove {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        index: Option<usize>,
    },

    /// Append an evolution
    AddEvolution {
        #[arg(value_name = "NAME")]
        name: String,

        /// Pokemon evolved into
        #[arg(long)]
        target: String,

        /// level, item or custom
        #[arg(long, default_value = "level")]
        method: EvolutionMethod,

        /// Level or item name; defaults per method
        #[arg(long)]
        value: Option<String>,
    },

    /// Change the method of an evolution, resetting its value
    SetEvolutionMethod {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        index: usize,

        /// level, item or custom
        #[arg(long)]
        method: EvolutionMethod,
    },

    /// Remove an evolution (the last one when no index is given)
    RemoveEvolution {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(long)]
        index: Option<usize>,
    },
}

/// Field values for `pokemon set`; omitted fields keep their stored value.
#[derive(Args, Debug, Default)]
pub struct SetPokemon {
    #[arg(value_name = "NAME")]
    name: String,

    #[arg(long)]
    type1: Option<String>,

    #[arg(long)]
    type2: Option<String>,

    /// Base stat as `field=value`, e.g. `sp_atk=65` (repeatable)
    #[arg(long = "stat", value_name = "FIELD=VALUE", value_parser = parse_stat)]
    stats: Vec<(String, u16)>,

    /// Ability reference (repeatable, up to 3); replaces the stored list
    #[arg(long = "ability", value_name = "ABILITY")]
    abilities: Vec<String>,
}

fn parse_stat(arg: &str) -> Result<(String, u16), String> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got `{arg}`"))?;
    let field = field.trim().to_ascii_lowercase();
    if !dex_core::creature::field::STATS.contains(&field.as_str()) {
        return Err(format!(
            "unknown stat `{field}`, expected one of {}",
            dex_core::creature::field::STATS.join(", ")
        ));
    }
    let value = value
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid value for `{field}`: {e}"))?;
    Ok((field, value))
}

impl SetPokemon {
    fn apply(self, record: &mut CreatureRecord) -> Result<()> {
        if self.abilities.len() > MAX_ABILITIES {
            bail!(
                "At most {} abilities are allowed, got {}",
                MAX_ABILITIES,
                self.abilities.len()
            );
        }

        if let Some(v) = self.type1 {
            record.type1 = v;
        }
        if let Some(v) = self.type2 {
            record.type2 = v;
        }
        for (field, value) in self.stats {
            if let Some(stat) = record.stats.get_mut(&field) {
                *stat = value;
            }
        }
        if !self.abilities.is_empty() {
            record.abilities = self.abilities;
        }
        Ok(())
    }
}

/// Parses an evolution value for `method`.
///
/// Without a value the method's default applies; Custom takes no value.
fn evolution_trigger(
    method: EvolutionMethod,
    value: Option<String>,
    items: &[String],
) -> Result<EvolutionTrigger> {
    let Some(value) = value else {
        return Ok(EvolutionTrigger::default_for(method, items));
    };

    match method {
        EvolutionMethod::Level => {
            let level = value
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|level| *level <= MAX_LEVEL)
                .with_context(|| format!("Evolution level must be 0-{MAX_LEVEL}, got `{value}`"))?;
            Ok(EvolutionTrigger::Level(level))
        }
        EvolutionMethod::Item => Ok(EvolutionTrigger::Item(value)),
        EvolutionMethod::Custom => {
            tracing::warn!("Ignoring value `{}` for a Custom evolution", value);
            Ok(EvolutionTrigger::Custom)
        }
    }
}

impl PokemonCommand {
    pub fn execute(self, session: &Session) -> Result<String> {
        let codec = session.creature_codec();

        match self {
            Self::List => {
                let document = session.load(TableKind::Pokemon)?;
                let names = list_keys(&document, TableKind::Pokemon.section(), session.style());
                output::render_names(&names, session.format())
            }
            Self::Show { name } => {
                let document = session.load(TableKind::Pokemon)?;
                let record = fetch_existing(&document, &codec, &name)?;
                output::render(&codec, &record, session.format())
            }
            Self::Set(set) => {
                let mut document = session.load_or_create(TableKind::Pokemon)?;
                let mut record = document
                    .fetch(&codec, &set.name)?
                    .unwrap_or_else(|| CreatureRecord::new(set.name.trim()));
                set.apply(&mut record)?;
                save_record(session, &mut document, &codec, &record)
            }
            Self::Remove { name } => {
                let mut document = session.load(TableKind::Pokemon)?;
                if document.delete(&codec, &name).is_none() {
                    bail!("Pokemon `{}` not found", name);
                }
                session.save(TableKind::Pokemon, &document)?;
                Ok(format!("Removed Pokemon `{}`", name))
            }
            Self::AddMove {
                name,
                move_name,
                level,
            } => edit(session, &codec, &name, |record| {
                let index = record.add_move(level, move_name);
                tracing::debug!("Added move at index {}", index);
                Ok(())
            }),
            Self::RemoveMove { name, index } => edit(session, &codec, &name, |record| {
                match record.remove_move(Selection::from(index)) {
                    Some(entry) => {
                        tracing::debug!("Removed move {} (level {})", entry.move_name, entry.level)
                    }
                    None => tracing::debug!("No move to remove"),
                }
                Ok(())
            }),
            Self::AddEvolution {
                name,
                target,
                method,
                value,
            } => {
                let items = session.cross_refs()?.list(TableKind::Items).to_vec();
                let trigger = evolution_trigger(method, value, &items)?;
                edit(session, &codec, &name, |record| {
                    record.add_evolution(Evolution::with_trigger(target, trigger));
                    Ok(())
                })
            }
            Self::SetEvolutionMethod {
                name,
                index,
                method,
            } => {
                let refs = session.cross_refs()?;
                let items = refs.list(TableKind::Items);
                edit(session, &codec, &name, |record| {
                    let count = record.evolutions.len();
                    if record.set_evolution_method(index, method, items).is_none() {
                        bail!("Evolution index {} out of range ({} entries)", index, count);
                    }
                    Ok(())
                })
            }
            Self::RemoveEvolution { name, index } => edit(session, &codec, &name, |record| {
                if let Some(evolution) = record.remove_evolution(Selection::from(index)) {
                    tracing::debug!("Removed evolution into {}", evolution.target);
                }
                Ok(())
            }),
        }
    }
}

fn fetch_existing(
    document: &Document,
    codec: &CreatureCodec,
    name: &str,
) -> Result<CreatureRecord> {
    match document.fetch(codec, name)? {
        Some(record) => Ok(record),
        None => bail!("Pokemon `{}` not found", name),
    }
}

/// Loads an existing Pokemon, applies `change` and saves it back.
fn edit<F>(session: &Session, codec: &CreatureCodec, name: &str, change: F) -> Result<String>
where
    F: FnOnce(&mut CreatureRecord) -> Result<()>,
{
    let mut document = session.load(TableKind::Pokemon)?;
    let mut record = fetch_existing(&document, codec, name)?;
    change(&mut record)?;
    save_record(session, &mut document, codec, &record)
}

fn save_record(
    session: &Session,
    document: &mut Document,
    codec: &CreatureCodec,
    record: &CreatureRecord,
) -> Result<String> {
    let key = document.store(codec, record)?;
    session.save(TableKind::Pokemon, document)?;
    Ok(format!("Saved [{}.{}]", CreatureCodec::SECTION, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::session;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(subcommand)]
        command: PokemonCommand,
    }

    fn run(session: &Session, args: &[&str]) -> Result<String> {
        Cli::try_parse_from(std::iter::once("pokemon").chain(args.iter().copied()))
            .unwrap()
            .command
            .execute(session)
    }

    fn fetch(session: &Session, name: &str) -> CreatureRecord {
        session
            .load(TableKind::Pokemon)
            .unwrap()
            .fetch(&session.creature_codec(), name)
            .unwrap()
            .unwrap()
    }

    const POKEMON: &str = r#"
[Pokemon.Gloom]
name = "Gloom"
type1 = "Grass"
type2 = "Poison"
hp = 60
moves = [{ lvl = 1, move = "Absorb" }, { lvl = 5, move = "Growth" }]
evolutions = [{ pkm = "Vileplume", method = "Item", value = "Leaf Stone" }]
"#;

    const ITEMS: &str = "[Items.Moon_Stone]\n[Items.Leaf_Stone]\n";

    #[test]
    fn test_parse_stat() {
        assert_eq!(parse_stat("SP_ATK=65").unwrap(), ("sp_atk".to_string(), 65));
        assert!(parse_stat("luck=3").is_err());
        assert!(parse_stat("hp").is_err());
        assert!(parse_stat("hp=70000").is_err());
    }

    #[test]
    fn test_set_new_pokemon() {
        let (_temp, session) = session(&[]);

        run(
            &session,
            &[
                "set",
                "Mr Mime",
                "--type1",
                "Psychic",
                "--stat",
                "hp=40",
                "--stat",
                "speed=90",
                "--ability",
                "Soundproof",
            ],
        )
        .unwrap();

        let record = fetch(&session, "Mr Mime");
        assert_eq!(record.name, "Mr Mime");
        assert_eq!(record.type2, "None");
        assert_eq!(record.stats.hp, 40);
        assert_eq!(record.stats.speed, 90);
        assert_eq!(record.abilities, vec!["Soundproof"]);
    }

    #[test]
    fn test_set_rejects_too_many_abilities() {
        let (_temp, session) = session(&[("pokemon.toml.bytes", POKEMON)]);
        let args = [
            "set", "Gloom", "--ability", "A", "--ability", "B", "--ability", "C", "--ability", "D",
        ];
        assert!(run(&session, &args).is_err());
        assert!(fetch(&session, "Gloom").abilities.is_empty());
    }

    #[test]
    fn test_move_list_edits() {
        let (_temp, session) = session(&[("pokemon.toml.bytes", POKEMON)]);

        run(&session, &["add-move", "Gloom", "--move", "Acid", "--level", "120"]).unwrap();
        let moves = fetch(&session, "Gloom").moves;
        assert_eq!(moves.len(), 3);
        assert_eq!(moves[2].level, 100);

        run(&session, &["remove-move", "Gloom", "--index", "0"]).unwrap();
        run(&session, &["remove-move", "Gloom"]).unwrap();
        let moves = fetch(&session, "Gloom").moves;
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].move_name, "Growth");

        // past the end is a no-op
        run(&session, &["remove-move", "Gloom", "--index", "9"]).unwrap();
        assert_eq!(fetch(&session, "Gloom").moves.len(), 1);
    }

    #[test]
    fn test_evolution_method_resets_value() {
        let (_temp, session) = session(&[
            ("pokemon.toml.bytes", POKEMON),
            ("items.toml.bytes", ITEMS),
        ]);

        run(
            &session,
            &["set-evolution-method", "Gloom", "--index", "0", "--method", "level"],
        )
        .unwrap();
        assert_eq!(
            fetch(&session, "Gloom").evolutions[0].trigger,
            EvolutionTrigger::Level(1)
        );

        run(
            &session,
            &["set-evolution-method", "Gloom", "--index", "0", "--method", "item"],
        )
        .unwrap();
        assert_eq!(
            fetch(&session, "Gloom").evolutions[0].trigger,
            EvolutionTrigger::Item("Moon Stone".to_string())
        );

        assert!(
            run(
                &session,
                &["set-evolution-method", "Gloom", "--index", "3", "--method", "custom"],
            )
            .is_err()
        );
    }

    #[test]
    fn test_add_and_remove_evolution() {
        let (_temp, session) = session(&[("pokemon.toml.bytes", POKEMON)]);

        run(
            &session,
            &["add-evolution", "Gloom", "--target", "Bellossom", "--method", "item"],
        )
        .unwrap();
        run(
            &session,
            &["add-evolution", "Gloom", "--target", "Oddish", "--value", "21"],
        )
        .unwrap();
        assert!(
            run(
                &session,
                &["add-evolution", "Gloom", "--target", "X", "--value", "abc"],
            )
            .is_err()
        );

        let evolutions = fetch(&session, "Gloom").evolutions;
        assert_eq!(evolutions.len(), 3);
        // no Items table: the sentinel stands in
        assert_eq!(evolutions[1].trigger, EvolutionTrigger::Item("None".to_string()));
        assert_eq!(evolutions[2].trigger, EvolutionTrigger::Level(21));

        run(&session, &["remove-evolution", "Gloom"]).unwrap();
        run(&session, &["remove-evolution", "Gloom", "--index", "0"]).unwrap();
        let evolutions = fetch(&session, "Gloom").evolutions;
        assert_eq!(evolutions.len(), 1);
        assert_eq!(evolutions[0].target, "Bellossom");
    }

    #[test]
    fn test_edit_unknown_pokemon() {
        let (_temp, session) = session(&[("pokemon.toml.bytes", POKEMON)]);
        let err = run(&session, &["add-move", "Oddish", "--move", "Absorb"]).unwrap_err();
        assert!(err.to_string().contains("Oddish"));
        assert!(run(&session, &["show", "Oddish"]).is_err());
    }

    #[test]
    fn test_list_and_remove() {
        let (_temp, session) = session(&[("pokemon.toml.bytes", POKEMON)]);
        assert_eq!(run(&session, &["list"]).unwrap(), "Gloom");
        run(&session, &["remove", "Gloom"]).unwrap();
        assert_eq!(run(&session, &["list"]).unwrap(), "");
    }
}

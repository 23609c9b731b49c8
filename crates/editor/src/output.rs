//! Rendering records for the terminal.
use anyhow::{Context, Result};
use console::style;
use dex_core::{CreatureRecord, EvolutionTrigger, MoveFlags, MoveRecord, RecordCodec, RecordTable};
use toml::Value;

/// Output format for `show` commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Summary,
    /// The stored TOML table
    Toml,
    /// Full JSON output
    Json,
}

/// Records that have a one-screen summary.
pub trait Summary {
    fn summary(&self) -> String;
}

/// Renders one record in `format`.
pub fn render<C>(codec: &C, record: &C::Record, format: OutputFormat) -> Result<String>
where
    C: RecordCodec,
    C::Record: Summary + serde::Serialize,
{
    match format {
        OutputFormat::Summary => Ok(record.summary()),
        OutputFormat::Toml => {
            let mut records = RecordTable::new();
            records.insert(codec.key(record), Value::Table(codec.encode(record)));
            let mut document = RecordTable::new();
            document.insert(C::SECTION.to_string(), Value::Table(records));
            toml::to_string(&document).context("Failed to render record as TOML")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(record).context("Failed to render record as JSON")
        }
    }
}

/// Renders a list of names, one per line.
pub fn render_names<S: AsRef<str>>(names: &[S], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
            serde_json::to_string_pretty(&names).context("Failed to render names as JSON")
        }
        OutputFormat::Summary | OutputFormat::Toml => Ok(names
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Flag letters with `-` for unset flags, e.g. `a-c-----`.
pub fn flag_letters(flags: MoveFlags) -> String {
    MoveFlags::LETTERS
        .iter()
        .enumerate()
        .map(|(i, letter)| if flags.flag(i) { *letter } else { '-' })
        .collect()
}

/// Parses flag letters such as `ac` into a flag set.
///
/// An empty string or `-` clears every flag.
pub fn parse_flag_letters(letters: &str) -> Result<MoveFlags, String> {
    let mut flags = MoveFlags::empty();
    for letter in letters.chars().filter(|c| *c != '-') {
        let index = MoveFlags::index_of(letter)
            .ok_or_else(|| format!("unknown flag `{letter}`, expected letters a-h"))?;
        flags.set_flag(index, true);
    }
    Ok(flags)
}

fn types(type1: &str, type2: &str) -> String {
    if type2 == dex_core::NONE || type2.is_empty() {
        type1.to_string()
    } else {
        format!("{type1} / {type2}")
    }
}

impl Summary for MoveRecord {
    fn summary(&self) -> String {
        let mut lines = vec![
            format!(
                "{} {}",
                style(&self.name).bold().cyan(),
                style(format!("[{}]", types(&self.type1, &self.type2))).dim()
            ),
            format!("  {} {}", style("Category:").bold(), self.category),
            format!(
                "  {} {}  {} {}  {} {}  {} {}",
                style("Power:").bold(),
                self.power,
                style("Accuracy:").bold(),
                self.accuracy,
                style("PP:").bold(),
                self.pp,
                style("Priority:").bold(),
                self.priority
            ),
            format!("  {} {}", style("Target:").bold(), self.target),
            format!("  {} {}", style("Flags:").bold(), flag_letters(self.flags)),
        ];
        if !self.description.is_empty() {
            lines.push(format!("  {}", style(&self.description).italic()));
        }
        lines.join("\n")
    }
}

impl Summary for CreatureRecord {
    fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            style(&self.name).bold().cyan(),
            style(format!("[{}]", types(&self.type1, &self.type2))).dim()
        )];

        let stats = self
            .stats
            .entries()
            .iter()
            .map(|(name, value)| format!("{name} {value}"))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!(
            "  {} {}  (total {})",
            style("Stats:").bold(),
            stats,
            self.stats.total()
        ));

        if !self.abilities.is_empty() {
            lines.push(format!(
                "  {} {}",
                style("Abilities:").bold(),
                self.abilities.join(", ")
            ));
        }

        lines.push(format!("  {}", style("Moves:").bold()));
        for (i, entry) in self.moves.iter().enumerate() {
            lines.push(format!(
                "    [{i}] Lv {:>3}  {}",
                entry.level, entry.move_name
            ));
        }

        lines.push(format!("  {}", style("Evolutions:").bold()));
        for (i, evolution) in self.evolutions.iter().enumerate() {
            let trigger = match &evolution.trigger {
                EvolutionTrigger::Level(level) => format!("Level {level}"),
                EvolutionTrigger::Item(item) => format!("Item {item}"),
                EvolutionTrigger::Custom => "Custom".to_string(),
            };
            lines.push(format!("    [{i}] {} ({trigger})", evolution.target));
        }

        lines.join("\n")
    }
}

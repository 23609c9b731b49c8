//! Creature definitions and their stored form.
//!
//! ```toml
//! [Pokemon.Bulbasaur]
//! name = "Bulbasaur"
//! type1 = "Grass"
//! type2 = "Poison"
//! hp = 45
//! atk = 49
//! def = 49
//! sp_atk = 65
//! sp_def = 65
//! speed = 45
//! moves = [{ lvl = 1, move = "Tackle" }, { lvl = 7, move = "Growl" }]
//! evolutions = [{ pkm = "Ivysaur", method = "Level", value = 16 }]
//! ```
//!
//! Move and evolution lists are ordered; edit order is stored order.

use toml::Value;

use crate::codec::RecordCodec;
use crate::error::{RecordError, Result};
use crate::key::KeyStyle;
use crate::table::{self, RecordTable};

/// Stored field names of a creature table and its list entries.
pub mod field {
    pub const NAME: &str = "name";
    pub const TYPE1: &str = "type1";
    pub const TYPE2: &str = "type2";
    pub const HP: &str = "hp";
    pub const ATK: &str = "atk";
    pub const DEF: &str = "def";
    pub const SP_ATK: &str = "sp_atk";
    pub const SP_DEF: &str = "sp_def";
    pub const SPEED: &str = "speed";
    pub const ABILITIES: &str = "abilities";
    pub const MOVES: &str = "moves";
    pub const EVOLUTIONS: &str = "evolutions";

    // move entry
    pub const LEVEL: &str = "lvl";
    pub const MOVE: &str = "move";

    // evolution entry
    pub const TARGET: &str = "pkm";
    pub const METHOD: &str = "method";
    pub const VALUE: &str = "value";

    /// Every record-level field the codec models, in write order.
    pub const ALL: [&str; 12] = [
        NAME, TYPE1, TYPE2, HP, ATK, DEF, SP_ATK, SP_DEF, SPEED, ABILITIES, MOVES, EVOLUTIONS,
    ];

    pub const STATS: [&str; 6] = [HP, ATK, DEF, SP_ATK, SP_DEF, SPEED];
}

/// Highest level a move or evolution entry may carry.
pub const MAX_LEVEL: u8 = 100;

/// Ability slots per creature.
pub const MAX_ABILITIES: usize = 3;

/// Base stats. Absent stats read as 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub sp_atk: u16,
    pub sp_def: u16,
    pub speed: u16,
}

impl Stats {
    /// Stats paired with their stored field names, in write order.
    pub fn entries(&self) -> [(&'static str, u16); 6] {
        [
            (field::HP, self.hp),
            (field::ATK, self.atk),
            (field::DEF, self.def),
            (field::SP_ATK, self.sp_atk),
            (field::SP_DEF, self.sp_def),
            (field::SPEED, self.speed),
        ]
    }

    /// Mutable access by stored field name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut u16> {
        match name {
            field::HP => Some(&mut self.hp),
            field::ATK => Some(&mut self.atk),
            field::DEF => Some(&mut self.def),
            field::SP_ATK => Some(&mut self.sp_atk),
            field::SP_DEF => Some(&mut self.sp_def),
            field::SPEED => Some(&mut self.speed),
            _ => None,
        }
    }

    /// Sum of all six stats.
    pub fn total(&self) -> u32 {
        self.entries().iter().map(|(_, v)| u32::from(*v)).sum()
    }
}

/// A move learned at a level.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveEntry {
    pub level: u8,
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub move_name: String,
}

impl MoveEntry {
    /// Levels above [`MAX_LEVEL`] are clamped.
    pub fn new(level: u8, move_name: impl Into<String>) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            move_name: move_name.into(),
        }
    }
}

/// How an evolution is triggered.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum EvolutionMethod {
    #[default]
    Level,
    Item,
    Custom,
}

/// An evolution method together with its method-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionTrigger {
    /// Evolves on reaching a level.
    Level(u8),
    /// Evolves when an item is used.
    Item(String),
    /// Handled by game scripts; carries no payload.
    Custom,
}

impl Default for EvolutionTrigger {
    fn default() -> Self {
        Self::Level(1)
    }
}

impl EvolutionTrigger {
    pub fn method(&self) -> EvolutionMethod {
        match self {
            Self::Level(_) => EvolutionMethod::Level,
            Self::Item(_) => EvolutionMethod::Item,
            Self::Custom => EvolutionMethod::Custom,
        }
    }

    /// Default payload for `method`.
    ///
    /// Level starts at 1, Item at the first available item (or `"None"`),
    /// Custom has no payload.
    pub fn default_for<S: AsRef<str>>(method: EvolutionMethod, items: &[S]) -> Self {
        match method {
            EvolutionMethod::Level => Self::Level(1),
            EvolutionMethod::Item => Self::Item(
                items
                    .first()
                    .map_or(crate::NONE, |item| item.as_ref())
                    .to_string(),
            ),
            EvolutionMethod::Custom => Self::Custom,
        }
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            Self::Level(level) => Some(Value::from(i64::from(*level))),
            Self::Item(item) => Some(Value::from(item.as_str())),
            Self::Custom => None,
        }
    }
}

/// One evolution of a creature.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evolution {
    pub target: String,
    pub trigger: EvolutionTrigger,
}

impl Evolution {
    /// New entry evolving by level, starting at level 1.
    pub fn new(target: impl Into<String>) -> Self {
        Self::with_trigger(target, EvolutionTrigger::default())
    }

    pub fn with_trigger(target: impl Into<String>, trigger: EvolutionTrigger) -> Self {
        Self {
            target: target.into(),
            trigger,
        }
    }

    pub fn method(&self) -> EvolutionMethod {
        self.trigger.method()
    }

    /// Switches the evolution method, resetting the payload to the method's
    /// default. Returns `false` and keeps the payload when `method` is
    /// already the current one.
    pub fn set_method<S: AsRef<str>>(&mut self, method: EvolutionMethod, items: &[S]) -> bool {
        if self.method() == method {
            return false;
        }
        self.trigger = EvolutionTrigger::default_for(method, items);
        true
    }
}

/// Which list entry a remove applies to.
///
/// `None` is the "nothing selected" sentinel and removes the last entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Index(usize),
}

impl From<Option<usize>> for Selection {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Self::None, Self::Index)
    }
}

/// Removes the selected entry; empty lists and indices past the end are no-ops.
fn remove_selected<T>(list: &mut Vec<T>, selection: Selection) -> Option<T> {
    match selection {
        Selection::None => list.pop(),
        Selection::Index(i) if i < list.len() => Some(list.remove(i)),
        Selection::Index(_) => None,
    }
}

/// A creature definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureRecord {
    pub name: String,
    pub type1: String,
    pub type2: String,
    pub stats: Stats,
    /// Up to [`MAX_ABILITIES`] ability references.
    pub abilities: Vec<String>,
    pub moves: Vec<MoveEntry>,
    pub evolutions: Vec<Evolution>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "RecordTable::is_empty")
    )]
    pub extra: RecordTable,
}

impl CreatureRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type1: crate::NONE.to_string(),
            type2: crate::NONE.to_string(),
            ..Self::default()
        }
    }

    /// Appends a move entry and returns its index.
    pub fn add_move(&mut self, level: u8, move_name: impl Into<String>) -> usize {
        self.moves.push(MoveEntry::new(level, move_name));
        self.moves.len() - 1
    }

    pub fn remove_move(&mut self, selection: Selection) -> Option<MoveEntry> {
        remove_selected(&mut self.moves, selection)
    }

    /// Appends an evolution entry and returns its index.
    pub fn add_evolution(&mut self, evolution: Evolution) -> usize {
        self.evolutions.push(evolution);
        self.evolutions.len() - 1
    }

    pub fn remove_evolution(&mut self, selection: Selection) -> Option<Evolution> {
        remove_selected(&mut self.evolutions, selection)
    }

    /// Changes the method of the evolution at `index`, see [`Evolution::set_method`].
    ///
    /// Returns `None` when there is no entry at `index`.
    pub fn set_evolution_method<S: AsRef<str>>(
        &mut self,
        index: usize,
        method: EvolutionMethod,
        items: &[S],
    ) -> Option<&Evolution> {
        let evolution = self.evolutions.get_mut(index)?;
        evolution.set_method(method, items);
        Some(evolution)
    }
}

/// Codec for the `Pokemon` section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CreatureCodec {
    style: KeyStyle,
}

impl CreatureCodec {
    pub const fn new(style: KeyStyle) -> Self {
        Self { style }
    }

    fn decode_move(value: &Value, path: &str) -> Result<MoveEntry> {
        let entry = table::as_table(value, path)?;
        let inner = || -> Result<MoveEntry> {
            let level = match entry.get(field::LEVEL) {
                Some(v) => table::as_integer(v, field::LEVEL)?,
                None => {
                    return Err(RecordError::MissingField {
                        field: field::LEVEL.to_string(),
                    });
                }
            };
            Ok(MoveEntry {
                level: decode_level(level, field::LEVEL)?,
                move_name: table::required_str(entry, field::MOVE)?,
            })
        };
        inner().map_err(|e| e.within(path))
    }

    fn decode_evolution(value: &Value, path: &str) -> Result<Evolution> {
        let entry = table::as_table(value, path)?;
        let inner = || -> Result<Evolution> {
            let target = table::required_str(entry, field::TARGET)?;
            let method = table::required_str(entry, field::METHOD)?;
            let method = method.parse::<EvolutionMethod>().map_err(|_| {
                RecordError::UnknownVariant {
                    field: field::METHOD.to_string(),
                    value: method.clone(),
                }
            })?;
            let payload = entry.get(field::VALUE);
            let trigger = match (method, payload) {
                (EvolutionMethod::Level, Some(v)) => EvolutionTrigger::Level(decode_level(
                    table::as_integer(v, field::VALUE)?,
                    field::VALUE,
                )?),
                (EvolutionMethod::Item, Some(v)) => {
                    EvolutionTrigger::Item(table::as_string(v, field::VALUE)?)
                }
                (method, _) => EvolutionTrigger::default_for::<&str>(method, &[]),
            };
            Ok(Evolution { target, trigger })
        };
        inner().map_err(|e| e.within(path))
    }

    /// Unmodeled fields, plus an explicitly empty `abilities` list.
    ///
    /// `encode` omits `abilities` when there are none, so a stored empty
    /// list rides along with the unknown fields to be written back as-is.
    fn decode_extra(t: &RecordTable) -> RecordTable {
        let mut extra = table::unknown_fields(t, &field::ALL);
        if let Some(abilities) = t.get(field::ABILITIES)
            && abilities.as_array().is_some_and(Vec::is_empty)
        {
            extra.insert(field::ABILITIES.into(), abilities.clone());
        }
        extra
    }

    fn encode_move(entry: &MoveEntry) -> Value {
        let mut t = RecordTable::new();
        t.insert(field::LEVEL.into(), Value::from(i64::from(entry.level)));
        t.insert(field::MOVE.into(), Value::from(entry.move_name.as_str()));
        Value::Table(t)
    }

    fn encode_evolution(evolution: &Evolution) -> Value {
        let mut t = RecordTable::new();
        t.insert(field::TARGET.into(), Value::from(evolution.target.as_str()));
        t.insert(
            field::METHOD.into(),
            Value::from(evolution.method().to_string()),
        );
        if let Some(value) = evolution.trigger.to_value() {
            t.insert(field::VALUE.into(), value);
        }
        Value::Table(t)
    }
}

fn decode_level(raw: i64, field: &str) -> Result<u8> {
    let level: u8 = table::bounded(raw, field)?;
    if level > MAX_LEVEL {
        return Err(RecordError::OutOfRange {
            field: field.to_string(),
            value: raw,
        });
    }
    Ok(level)
}

impl RecordCodec for CreatureCodec {
    type Record = CreatureRecord;

    const SECTION: &'static str = "Pokemon";

    fn key_style(&self) -> KeyStyle {
        self.style
    }

    fn decode(&self, t: &RecordTable) -> Result<CreatureRecord> {
        let stats = Stats {
            hp: table::optional_int(t, field::HP)?,
            atk: table::optional_int(t, field::ATK)?,
            def: table::optional_int(t, field::DEF)?,
            sp_atk: table::optional_int(t, field::SP_ATK)?,
            sp_def: table::optional_int(t, field::SP_DEF)?,
            speed: table::optional_int(t, field::SPEED)?,
        };

        let abilities = table::optional_array(t, field::ABILITIES)?;
        if abilities.len() > MAX_ABILITIES {
            return Err(RecordError::OutOfRange {
                field: field::ABILITIES.to_string(),
                value: abilities.len() as i64,
            });
        }
        let abilities = abilities
            .iter()
            .enumerate()
            .map(|(i, v)| table::as_string(v, &format!("{}[{i}]", field::ABILITIES)))
            .collect::<Result<Vec<_>>>()?;

        let moves = table::optional_array(t, field::MOVES)?
            .iter()
            .enumerate()
            .map(|(i, v)| Self::decode_move(v, &format!("{}[{i}]", field::MOVES)))
            .collect::<Result<Vec<_>>>()?;

        let evolutions = table::optional_array(t, field::EVOLUTIONS)?
            .iter()
            .enumerate()
            .map(|(i, v)| Self::decode_evolution(v, &format!("{}[{i}]", field::EVOLUTIONS)))
            .collect::<Result<Vec<_>>>()?;

        Ok(CreatureRecord {
            name: table::required_str(t, field::NAME)?,
            type1: table::required_str(t, field::TYPE1)?,
            type2: table::required_str(t, field::TYPE2)?,
            stats,
            abilities,
            moves,
            evolutions,
            extra: Self::decode_extra(t),
        })
    }

    fn encode(&self, c: &CreatureRecord) -> RecordTable {
        let mut t = RecordTable::new();
        t.insert(field::NAME.into(), Value::from(c.name.trim()));
        t.insert(field::TYPE1.into(), Value::from(c.type1.as_str()));
        t.insert(field::TYPE2.into(), Value::from(c.type2.as_str()));
        for (name, value) in c.stats.entries() {
            t.insert(name.into(), Value::from(i64::from(value)));
        }
        if !c.abilities.is_empty() {
            let abilities = c.abilities.iter().map(|a| Value::from(a.as_str()));
            t.insert(field::ABILITIES.into(), Value::Array(abilities.collect()));
        }
        t.insert(
            field::MOVES.into(),
            Value::Array(c.moves.iter().map(Self::encode_move).collect()),
        );
        t.insert(
            field::EVOLUTIONS.into(),
            Value::Array(c.evolutions.iter().map(Self::encode_evolution).collect()),
        );
        table::append_unknown(&mut t, &c.extra);
        t
    }

    fn name<'a>(&self, record: &'a CreatureRecord) -> &'a str {
        &record.name
    }
}

//! Move definitions and their stored form.
//!
//! A stored move is a flat table:
//!
//! ```toml
//! [Moves.Tackle]
//! name = "Tackle"
//! type1 = "Normal"
//! type2 = "None"
//! category = "Physical"
//! power = 40
//! accuracy = 100
//! pp = 35
//! target = "Normal"
//! priority = 0
//! flags = 1
//! description = "A physical attack."
//! ```
//!
//! The eight boolean flags share one integer: bit `i` is flag `i`.

use bitflags::bitflags;
use toml::Value;

use crate::codec::RecordCodec;
use crate::error::{RecordError, Result};
use crate::key::KeyStyle;
use crate::table::{self, RecordTable};

/// Stored field names of a move table.
pub mod field {
    pub const NAME: &str = "name";
    pub const TYPE1: &str = "type1";
    pub const TYPE2: &str = "type2";
    pub const CATEGORY: &str = "category";
    pub const POWER: &str = "power";
    pub const ACCURACY: &str = "accuracy";
    pub const PP: &str = "pp";
    pub const TARGET: &str = "target";
    pub const PRIORITY: &str = "priority";
    pub const FLAGS: &str = "flags";
    pub const DESCRIPTION: &str = "description";

    /// Every field the codec models, in write order.
    pub const ALL: [&str; 11] = [
        NAME,
        TYPE1,
        TYPE2,
        CATEGORY,
        POWER,
        ACCURACY,
        PP,
        TARGET,
        PRIORITY,
        FLAGS,
        DESCRIPTION,
    ];
}

bitflags! {
    /// The eight move flags `a`..`h`.
    ///
    /// Bit `i` holds flag `i`, so the stored integer is Σ flag_i · 2^i.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MoveFlags: u8 {
        const A = 1 << 0;
        const B = 1 << 1;
        const C = 1 << 2;
        const D = 1 << 3;
        const E = 1 << 4;
        const F = 1 << 5;
        const G = 1 << 6;
        const H = 1 << 7;
    }
}

impl MoveFlags {
    /// Flag letters in bit order.
    pub const LETTERS: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

    /// Interprets a stored integer. Only the low 8 bits are read.
    pub const fn from_stored(raw: i64) -> Self {
        Self::from_bits_retain((raw & 0xFF) as u8)
    }

    pub fn to_stored(self) -> i64 {
        i64::from(self.bits())
    }

    pub fn from_array(flags: [bool; 8]) -> Self {
        Self::from_bits_retain(encode_flags(flags))
    }

    pub fn to_array(self) -> [bool; 8] {
        decode_flags(i64::from(self.bits()))
    }

    /// Flag at bit `index`; out-of-range indices read as unset.
    pub fn flag(self, index: usize) -> bool {
        index < 8 && self.bits() & (1 << index) != 0
    }

    pub fn set_flag(&mut self, index: usize, value: bool) {
        if index < 8 {
            self.set(Self::from_bits_retain(1 << index), value);
        }
    }

    /// Flag index for a letter `a`..`h` (case-insensitive).
    pub fn index_of(letter: char) -> Option<usize> {
        Self::LETTERS
            .iter()
            .position(|l| *l == letter.to_ascii_lowercase())
    }
}

/// Packs eight booleans into one byte by weighted sum.
pub fn encode_flags(flags: [bool; 8]) -> u8 {
    flags
        .iter()
        .enumerate()
        .map(|(i, &set)| u8::from(set) << i)
        .sum()
}

/// Unpacks the low 8 bits of a stored flag integer.
pub fn decode_flags(raw: i64) -> [bool; 8] {
    std::array::from_fn(|i| raw & (1 << i) != 0)
}

/// Damage category of a move.
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
pub enum MoveCategory {
    #[default]
    Physical,
    Special,
    Status,
}

/// A move definition.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRecord {
    pub name: String,
    pub type1: String,
    pub type2: String,
    pub category: MoveCategory,
    pub power: u16,
    pub accuracy: u8,
    pub pp: u8,
    pub target: String,
    pub priority: i8,
    pub flags: MoveFlags,
    pub description: String,
    /// Stored fields this codec does not model, kept so saving never drops them.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "RecordTable::is_empty")
    )]
    pub extra: RecordTable,
}

impl MoveRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type1: crate::NONE.to_string(),
            type2: crate::NONE.to_string(),
            ..Self::default()
        }
    }
}

/// Codec for the `Moves` section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveCodec {
    style: KeyStyle,
}

impl MoveCodec {
    pub const fn new(style: KeyStyle) -> Self {
        Self { style }
    }
}

impl RecordCodec for MoveCodec {
    type Record = MoveRecord;

    const SECTION: &'static str = "Moves";

    fn key_style(&self) -> KeyStyle {
        self.style
    }

    fn decode(&self, t: &RecordTable) -> Result<MoveRecord> {
        let name = table::required_str(t, field::NAME)?;
        let type1 = table::required_str(t, field::TYPE1)?;
        let type2 = table::required_str(t, field::TYPE2)?;
        let category = table::required_str(t, field::CATEGORY)?;
        let category = category
            .parse::<MoveCategory>()
            .map_err(|_| RecordError::UnknownVariant {
                field: field::CATEGORY.to_string(),
                value: category,
            })?;

        let flags = match t.get(field::FLAGS) {
            Some(value) => MoveFlags::from_stored(table::as_integer(value, field::FLAGS)?),
            None => MoveFlags::empty(),
        };

        Ok(MoveRecord {
            name,
            type1,
            type2,
            category,
            power: table::optional_int(t, field::POWER)?,
            accuracy: table::optional_int(t, field::ACCURACY)?,
            pp: table::optional_int(t, field::PP)?,
            target: table::optional_str(t, field::TARGET)?,
            priority: table::optional_int(t, field::PRIORITY)?,
            flags,
            description: table::optional_str(t, field::DESCRIPTION)?,
            extra: table::unknown_fields(t, &field::ALL),
        })
    }

    fn encode(&self, m: &MoveRecord) -> RecordTable {
        let mut t = RecordTable::new();
        t.insert(field::NAME.into(), Value::from(m.name.trim()));
        t.insert(field::TYPE1.into(), Value::from(m.type1.as_str()));
        t.insert(field::TYPE2.into(), Value::from(m.type2.as_str()));
        t.insert(field::CATEGORY.into(), Value::from(m.category.to_string()));
        t.insert(field::POWER.into(), Value::from(i64::from(m.power)));
        t.insert(field::ACCURACY.into(), Value::from(i64::from(m.accuracy)));
        t.insert(field::PP.into(), Value::from(i64::from(m.pp)));
        t.insert(field::TARGET.into(), Value::from(m.target.as_str()));
        t.insert(field::PRIORITY.into(), Value::from(i64::from(m.priority)));
        t.insert(field::FLAGS.into(), Value::from(m.flags.to_stored()));
        t.insert(field::DESCRIPTION.into(), Value::from(m.description.as_str()));
        table::append_unknown(&mut t, &m.extra);
        t
    }

    fn name<'a>(&self, record: &'a MoveRecord) -> &'a str {
        &record.name
    }
}

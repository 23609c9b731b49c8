//! Record schema and codecs for hand-edited game data.
//!
//! `dex-core` defines the typed move and creature records, the key
//! normalization that names them, and the codecs mapping each record to and
//! from its stored TOML table. It performs no I/O; loading and saving whole
//! documents lives in `dex-content`.
pub mod codec;
pub mod creature;
pub mod error;
pub mod key;
pub mod moves;
pub mod table;

pub use codec::RecordCodec;
pub use creature::{
    CreatureCodec, CreatureRecord, Evolution, EvolutionMethod, EvolutionTrigger, MAX_ABILITIES,
    MAX_LEVEL, MoveEntry, Selection, Stats,
};
pub use error::{RecordError, Result};
pub use key::KeyStyle;
pub use moves::{MoveCategory, MoveCodec, MoveFlags, MoveRecord, decode_flags, encode_flags};
pub use table::RecordTable;

/// Sentinel for an unset type or item reference.
pub const NONE: &str = "None";

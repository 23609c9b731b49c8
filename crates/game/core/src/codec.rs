//! Record codec abstraction.

use crate::error::Result;
use crate::key::KeyStyle;
use crate::table::RecordTable;

/// Paired encode/decode between a typed record and its stored table.
///
/// Implementations must satisfy both round-trip laws:
/// - `decode(&encode(r)) == r` for every record `r`
/// - `encode(&decode(t)?) == t` for every well-formed table `t`
pub trait RecordCodec {
    type Record;

    /// Top-level section the records live under.
    const SECTION: &'static str;

    /// Key normalization used by [`RecordCodec::key`].
    fn key_style(&self) -> KeyStyle;

    fn decode(&self, table: &RecordTable) -> Result<Self::Record>;

    fn encode(&self, record: &Self::Record) -> RecordTable;

    /// Display name of a record.
    fn name<'a>(&self, record: &'a Self::Record) -> &'a str;

    /// Section key under which `record` is stored.
    fn key(&self, record: &Self::Record) -> String {
        self.key_style().key_for(self.name(record))
    }
}

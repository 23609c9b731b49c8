//! Decode failures for stored record tables.
//!
//! Reading is tolerant wherever a field has a defined default (stats, numeric
//! move fields, move and evolution lists). Everything else that does not fit
//! the schema is reported as a [`RecordError`] so the caller can decide what
//! to tell the user. Nothing is silently repaired.

use thiserror::Error;

/// A stored record that does not match the schema.
///
/// `field` is a path into the record table, e.g. `type1` or `moves[2].lvl`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record: missing required field `{field}`")]
    MissingField { field: String },

    #[error("malformed record: field `{field}` should be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("malformed record: field `{field}` value {value} is out of range")]
    OutOfRange { field: String, value: i64 },

    #[error("malformed record: field `{field}` has unknown value `{value}`")]
    UnknownVariant { field: String, value: String },
}

impl RecordError {
    /// Path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownVariant { field, .. } => field,
        }
    }

    /// Prefixes the field path with the entry it was found in.
    pub(crate) fn within(mut self, parent: &str) -> Self {
        let field = match &mut self {
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::UnknownVariant { field, .. } => field,
        };
        *field = format!("{parent}.{field}");
        self
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;

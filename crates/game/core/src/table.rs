//! Typed field access on stored record tables.

use toml::Value;

use crate::error::{RecordError, Result};

/// One stored record: a TOML table of typed fields.
///
/// With the `preserve_order` feature of `toml` enabled, iteration order is
/// insertion order, which is also the order fields are written back.
pub type RecordTable = toml::Table;

pub(crate) fn required_str(table: &RecordTable, field: &str) -> Result<String> {
    match table.get(field) {
        Some(value) => as_string(value, field),
        None => Err(RecordError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Absent string fields read as empty.
pub(crate) fn optional_str(table: &RecordTable, field: &str) -> Result<String> {
    table
        .get(field)
        .map_or_else(|| Ok(String::new()), |value| as_string(value, field))
}

/// Absent integer fields read as the type's default (zero).
pub(crate) fn optional_int<T>(table: &RecordTable, field: &str) -> Result<T>
where
    T: TryFrom<i64> + Default,
{
    match table.get(field) {
        Some(value) => bounded(as_integer(value, field)?, field),
        None => Ok(T::default()),
    }
}

/// Absent arrays read as empty.
pub(crate) fn optional_array<'a>(table: &'a RecordTable, field: &str) -> Result<&'a [Value]> {
    match table.get(field) {
        Some(value) => value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| wrong_type(field, "an array", value)),
        None => Ok(&[]),
    }
}

pub(crate) fn as_string(value: &Value, field: &str) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| wrong_type(field, "a string", value))
}

pub(crate) fn as_integer(value: &Value, field: &str) -> Result<i64> {
    value
        .as_integer()
        .ok_or_else(|| wrong_type(field, "an integer", value))
}

pub(crate) fn as_table<'a>(value: &'a Value, field: &str) -> Result<&'a RecordTable> {
    value
        .as_table()
        .ok_or_else(|| wrong_type(field, "a table", value))
}

pub(crate) fn bounded<T: TryFrom<i64>>(raw: i64, field: &str) -> Result<T> {
    T::try_from(raw).map_err(|_| RecordError::OutOfRange {
        field: field.to_string(),
        value: raw,
    })
}

/// Fields of `table` not listed in `known`, in stored order.
pub(crate) fn unknown_fields(table: &RecordTable, known: &[&str]) -> RecordTable {
    table
        .iter()
        .filter(|(key, _)| !known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Re-appends preserved unknown fields without overwriting modelled ones.
pub(crate) fn append_unknown(table: &mut RecordTable, extra: &RecordTable) {
    for (key, value) in extra {
        if !table.contains_key(key) {
            table.insert(key.clone(), value.clone());
        }
    }
}

fn wrong_type(field: &str, expected: &'static str, found: &Value) -> RecordError {
    RecordError::WrongType {
        field: field.to_string(),
        expected,
        found: found.type_str(),
    }
}

//! Config store and cross-reference lookups for the data files.
//!
//! This crate loads and saves the TOML documents that hold game data:
//! - Moves and Pokemon (edited records)
//! - Types, Items and Abilities (referenced, read-only here)
//!
//! Records inside a document are decoded and encoded through the codecs in
//! `dex-core`; this crate only owns the files and the table-of-tables layout.

pub mod data_dir;
pub mod document;
pub mod error;
pub mod xref;

pub use data_dir::{DataDir, TableKind};
pub use document::Document;
pub use error::{Result, StoreError};
pub use xref::{CrossRefs, DanglingRef, list_keys};

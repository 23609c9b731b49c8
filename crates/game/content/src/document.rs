//! Table-of-tables documents backed by TOML files.
//!
//! A document maps a section name (`Moves`, `Pokemon`, ...) to a table of
//! records keyed by their normalized name. It is loaded once, mutated in
//! place, and written back in full.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dex_core::{RecordCodec, RecordTable};
use toml::Value;

use crate::error::{Result, StoreError};

/// An in-memory configuration document.
///
/// Section and record order is insertion order and is kept on save.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    root: RecordTable,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses document text. `origin` is only used for error reporting.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let root = text
            .parse::<RecordTable>()
            .map_err(|source| StoreError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        Ok(Self { root })
    }

    /// Loads a document from a file.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the file does not exist
    /// - [`StoreError::Io`] if it cannot be read
    /// - [`StoreError::Parse`] if it is not valid TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        let document = Self::parse(&content, path)?;

        tracing::debug!(
            "Loaded document from {} ({} sections)",
            path.display(),
            document.root.len()
        );

        Ok(document)
    }

    /// Loads a document and makes sure `section` exists, creating it empty.
    pub fn load_section(path: impl AsRef<Path>, section: &str) -> Result<Self> {
        let mut document = Self::load(path)?;
        if !document.root.contains_key(section) {
            tracing::info!("Section [{}] missing, starting empty", section);
        }
        document.ensure_section(section)?;
        Ok(document)
    }

    /// Serializes the whole document.
    pub fn render(&self) -> Result<String> {
        Ok(toml::to_string(&self.root)?)
    }

    /// Writes the document to `path`, replacing the file atomically.
    ///
    /// The document is rendered in memory, written to a sibling temporary
    /// file and renamed over the target. On failure the temporary file is
    /// removed and the target is left as it was.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Render in memory before touching the disk
        let rendered = self.render()?;
        let temp_path = temp_path_for(path);

        // Write to temp file, then atomic rename
        let written =
            write_synced(&temp_path, rendered.as_bytes()).and_then(|()| fs::rename(&temp_path, path));

        if let Err(source) = written {
            // Best effort: the temp file may never have been created.
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }

        tracing::debug!("Saved document to {} ({} bytes)", path.display(), rendered.len());

        Ok(())
    }

    /// Returns `section`, creating it empty if absent.
    pub fn ensure_section(&mut self, section: &str) -> Result<&mut RecordTable> {
        if !self.root.contains_key(section) {
            self.root
                .insert(section.to_string(), Value::Table(RecordTable::new()));
        }
        self.root
            .get_mut(section)
            .and_then(Value::as_table_mut)
            .ok_or_else(|| StoreError::InvalidSection(section.to_string()))
    }

    /// Returns `section` if present and a table.
    pub fn section(&self, section: &str) -> Option<&RecordTable> {
        self.root.get(section)?.as_table()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&RecordTable> {
        self.section(section)?.get(key)?.as_table()
    }

    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Inserts or replaces a record, returning the previous one.
    ///
    /// A replaced record keeps its position; a new one is appended.
    pub fn upsert(
        &mut self,
        section: &str,
        key: impl Into<String>,
        record: RecordTable,
    ) -> Result<Option<RecordTable>> {
        let previous = self
            .ensure_section(section)?
            .insert(key.into(), Value::Table(record));
        Ok(previous.and_then(into_table))
    }

    pub fn remove(&mut self, section: &str, key: &str) -> Option<RecordTable> {
        self.root
            .get_mut(section)?
            .as_table_mut()?
            .remove(key)
            .and_then(into_table)
    }

    /// Record keys of `section` in insertion order; empty if the section is absent.
    pub fn keys(&self, section: &str) -> Vec<&str> {
        self.section(section)
            .map(|records| {
                records
                    .iter()
                    .filter(|(_, value)| value.is_table())
                    .map(|(key, _)| key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn len(&self, section: &str) -> usize {
        self.keys(section).len()
    }

    pub fn is_empty(&self, section: &str) -> bool {
        self.len(section) == 0
    }

    /// Encodes `record` and upserts it under its normalized key.
    ///
    /// Returns the key it was stored under.
    pub fn store<C: RecordCodec>(&mut self, codec: &C, record: &C::Record) -> Result<String> {
        let key = codec.key(record);
        let previous = self.upsert(C::SECTION, key.clone(), codec.encode(record))?;

        tracing::info!(
            "{} record [{}.{}]",
            if previous.is_some() { "Updated" } else { "Created" },
            C::SECTION,
            key
        );

        Ok(key)
    }

    /// Looks up a record by display name and decodes it.
    pub fn fetch<C: RecordCodec>(&self, codec: &C, name: &str) -> Result<Option<C::Record>> {
        let key = codec.key_style().key_for(name);
        self.get(C::SECTION, &key)
            .map(|table| decode_keyed(codec, &key, table))
            .transpose()
    }

    /// Removes a record by display name.
    pub fn delete<C: RecordCodec>(&mut self, codec: &C, name: &str) -> Option<RecordTable> {
        let key = codec.key_style().key_for(name);
        let removed = self.remove(C::SECTION, &key);
        if removed.is_some() {
            tracing::info!("Removed record [{}.{}]", C::SECTION, key);
        }
        removed
    }

    /// Decodes every record of the codec's section, in stored order.
    pub fn records<C: RecordCodec>(&self, codec: &C) -> Result<Vec<(String, C::Record)>> {
        let Some(section) = self.section(C::SECTION) else {
            return Ok(Vec::new());
        };
        section
            .iter()
            .filter_map(|(key, value)| Some((key, value.as_table()?)))
            .map(|(key, table)| Ok((key.clone(), decode_keyed(codec, key, table)?)))
            .collect()
    }
}

fn decode_keyed<C: RecordCodec>(codec: &C, key: &str, table: &RecordTable) -> Result<C::Record> {
    codec.decode(table).map_err(|source| StoreError::Record {
        key: key.to_string(),
        source,
    })
}

fn into_table(value: Value) -> Option<RecordTable> {
    match value {
        Value::Table(table) => Some(table),
        _ => None,
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// `moves.toml.bytes` → `moves.toml.bytes.tmp` in the same directory.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::{CreatureCodec, CreatureRecord, KeyStyle, MoveCodec, MoveRecord};
    use tempfile::TempDir;

    const MOVES: &str = r#"
[Moves.Tackle]
name = "Tackle"
type1 = "Normal"
type2 = "None"
category = "Physical"
power = 40
accuracy = 100
pp = 35
target = "Normal"
priority = 0
flags = 1
description = "A physical attack."

[Moves.Growl]
name = "Growl"
type1 = "Normal"
type2 = "None"
category = "Status"
power = 0
accuracy = 100
pp = 40
target = "AllFoes"
priority = 0
flags = 0
description = "Lowers attack."
"#;

    fn setup(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("moves.toml.bytes");
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_load_keeps_key_order() {
        let (_temp, path) = setup(MOVES);
        let doc = Document::load(&path).unwrap();

        assert_eq!(doc.keys("Moves"), vec!["Tackle", "Growl"]);
        assert_eq!(doc.get("Moves", "Growl").unwrap()["pp"].as_integer(), Some(40));
        assert!(doc.get("Moves", "Ember").is_none());
        assert!(doc.contains("Moves", "Tackle"));
        assert!(!doc.contains("Moves", "Ember"));
        assert!(!doc.contains("Types", "Tackle"));
    }

    #[test]
    fn test_missing_section_loads_empty() {
        let (_temp, path) = setup("[Types.Normal]\n");
        let doc = Document::load_section(&path, "Moves").unwrap();

        assert!(doc.section("Moves").unwrap().is_empty());
        assert!(doc.keys("Moves").is_empty());
        assert_eq!(doc.keys("Types"), vec!["Normal"]);
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let (_temp, path) = setup("");
        let doc = Document::load_section(&path, "Pokemon").unwrap();
        assert!(doc.is_empty("Pokemon"));
    }

    #[test]
    fn test_non_table_section_is_rejected() {
        let (_temp, path) = setup("Moves = 3\n");
        assert!(matches!(
            Document::load_section(&path, "Moves"),
            Err(StoreError::InvalidSection(section)) if section == "Moves"
        ));
    }

    #[test]
    fn test_parse_error() {
        let (_temp, path) = setup("[Moves.Tackle\nname = ");
        assert!(matches!(
            Document::load(&path),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.toml.bytes");
        assert!(matches!(
            Document::load(&path),
            Err(StoreError::NotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let (_temp, path) = setup(MOVES);
        let mut doc = Document::load(&path).unwrap();

        let mut ember = MoveRecord::new("Ember");
        ember.type1 = "Fire".to_string();
        ember.power = 40;
        doc.store(&MoveCodec::default(), &ember).unwrap();
        doc.save(&path).unwrap();

        let reloaded = Document::load(&path).unwrap();
        assert_eq!(reloaded, doc);
        assert_eq!(reloaded.keys("Moves"), vec!["Tackle", "Growl", "Ember"]);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_upsert_existing_keeps_position() {
        let (_temp, path) = setup(MOVES);
        let mut doc = Document::load(&path).unwrap();
        let codec = MoveCodec::default();

        let mut tackle = doc.fetch(&codec, "Tackle").unwrap().unwrap();
        tackle.power = 50;
        let key = doc.store(&codec, &tackle).unwrap();

        assert_eq!(key, "Tackle");
        assert_eq!(doc.keys("Moves"), vec!["Tackle", "Growl"]);
        assert_eq!(doc.fetch(&codec, "Tackle").unwrap().unwrap().power, 50);
    }

    #[test]
    fn test_failed_save_cleans_up() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be makes the final rename fail.
        let path = temp_dir.path().join("moves.toml.bytes");
        fs::create_dir(&path).unwrap();

        let doc = Document::parse(MOVES, &path).unwrap();
        assert!(matches!(doc.save(&path), Err(StoreError::Io { .. })));
        assert!(path.is_dir());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_failed_save_keeps_original_bytes() {
        let (_temp, path) = setup(MOVES);
        // Occupy the temp path so the temp file cannot be created.
        let temp_path = temp_path_for(&path);
        fs::create_dir(&temp_path).unwrap();

        let mut doc = Document::load(&path).unwrap();
        doc.remove("Moves", "Growl");
        assert!(matches!(doc.save(&path), Err(StoreError::Io { .. })));

        assert_eq!(fs::read_to_string(&path).unwrap(), MOVES);
        assert!(temp_path.is_dir());
        assert_eq!(fs::read_dir(&temp_path).unwrap().count(), 0);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("moves.toml.bytes");
        let doc = Document::new();
        assert!(matches!(doc.save(&path), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_creature_lists_survive_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pokemon.toml.bytes");
        fs::write(&path, "").unwrap();

        let codec = CreatureCodec::new(KeyStyle::Underscore);
        let mut doc = Document::load_section(&path, "Pokemon").unwrap();
        let mut mime = CreatureRecord::new("Mr Mime");
        mime.add_move(1, "Barrier");
        mime.add_move(1, "Confusion");
        mime.add_move(15, "Confusion");
        assert_eq!(doc.store(&codec, &mime).unwrap(), "Mr_Mime");
        doc.save(&path).unwrap();

        let reloaded = Document::load(&path).unwrap();
        let decoded = reloaded.fetch(&codec, "Mr Mime").unwrap().unwrap();
        assert_eq!(decoded, mime);
    }

    #[test]
    fn test_records_reports_bad_key() {
        let doc = Document::parse(
            "[Moves.Broken]\nname = \"Broken\"\ntype1 = \"Normal\"\n",
            Path::new("inline"),
        )
        .unwrap();

        match doc.records(&MoveCodec::default()) {
            Err(StoreError::Record { key, source }) => {
                assert_eq!(key, "Broken");
                assert_eq!(source.field(), "type2");
            }
            other => panic!("expected record error, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_record() {
        let (_temp, path) = setup(MOVES);
        let mut doc = Document::load(&path).unwrap();

        assert!(doc.delete(&MoveCodec::default(), "Growl").is_some());
        assert!(doc.delete(&MoveCodec::default(), "Growl").is_none());
        assert_eq!(doc.keys("Moves"), vec!["Tackle"]);
    }
}

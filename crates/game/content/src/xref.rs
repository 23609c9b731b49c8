//! Read-only lookups into the tables records refer to.
//!
//! Moves name their types; creatures name types, moves, items, abilities and
//! other creatures. [`CrossRefs`] gathers the display names of each table so
//! a front end can offer them as choices and flag references that point
//! nowhere.

use dex_core::{CreatureRecord, EvolutionTrigger, KeyStyle, MoveRecord};

use crate::data_dir::{DataDir, TableKind};
use crate::document::Document;
use crate::error::Result;

/// Display names of the records in `section`, in stored order.
///
/// A missing section yields an empty list.
pub fn list_keys(document: &Document, section: &str, style: KeyStyle) -> Vec<String> {
    document
        .keys(section)
        .into_iter()
        .map(|key| style.display_name(key))
        .collect()
}

/// A reference that does not name any known entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingRef {
    /// Field path in the referring record, e.g. `moves[1].move`.
    pub field: String,
    pub value: String,
    pub table: TableKind,
}

/// Display names of every referenced table.
#[derive(Clone, Debug, Default)]
pub struct CrossRefs {
    style: KeyStyle,
    moves: Vec<String>,
    pokemon: Vec<String>,
    types: Vec<String>,
    items: Vec<String>,
    abilities: Vec<String>,
}

impl CrossRefs {
    pub fn new(style: KeyStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Loads every table of `dir`. Missing files leave their list empty;
    /// unreadable or malformed files are errors.
    pub fn load(dir: &DataDir, style: KeyStyle) -> Result<Self> {
        use strum::IntoEnumIterator;

        let mut refs = Self::new(style);
        for kind in TableKind::iter() {
            if let Some(document) = dir.load_optional(kind)? {
                refs.insert(kind, &document);
            }
        }

        tracing::debug!(
            "Cross references loaded: {} moves, {} pokemon, {} types, {} items, {} abilities",
            refs.moves.len(),
            refs.pokemon.len(),
            refs.types.len(),
            refs.items.len(),
            refs.abilities.len()
        );

        Ok(refs)
    }

    /// Replaces the names for `kind` with those of `document`.
    pub fn insert(&mut self, kind: TableKind, document: &Document) {
        *self.list_mut(kind) = list_keys(document, kind.section(), self.style);
    }

    /// Builder-style [`CrossRefs::insert`].
    pub fn with(mut self, kind: TableKind, document: &Document) -> Self {
        self.insert(kind, document);
        self
    }

    pub fn list(&self, kind: TableKind) -> &[String] {
        match kind {
            TableKind::Moves => &self.moves,
            TableKind::Pokemon => &self.pokemon,
            TableKind::Types => &self.types,
            TableKind::Items => &self.items,
            TableKind::Abilities => &self.abilities,
        }
    }

    fn list_mut(&mut self, kind: TableKind) -> &mut Vec<String> {
        match kind {
            TableKind::Moves => &mut self.moves,
            TableKind::Pokemon => &mut self.pokemon,
            TableKind::Types => &mut self.types,
            TableKind::Items => &mut self.items,
            TableKind::Abilities => &mut self.abilities,
        }
    }

    /// Whether `value` names an entry of `kind`.
    ///
    /// The `"None"` sentinel always resolves, and a table with no entries
    /// cannot be checked, so everything resolves against it.
    pub fn resolves(&self, kind: TableKind, value: &str) -> bool {
        let names = self.list(kind);
        if value == dex_core::NONE || names.is_empty() {
            return true;
        }
        let key = self.style.key_for(value);
        names.iter().any(|name| self.style.key_for(name) == key)
    }

    pub fn check_move(&self, record: &MoveRecord) -> Vec<DanglingRef> {
        let mut dangling = Vec::new();
        self.check(&mut dangling, "type1", &record.type1, TableKind::Types);
        self.check(&mut dangling, "type2", &record.type2, TableKind::Types);
        dangling
    }

    pub fn check_creature(&self, record: &CreatureRecord) -> Vec<DanglingRef> {
        let mut dangling = Vec::new();
        self.check(&mut dangling, "type1", &record.type1, TableKind::Types);
        self.check(&mut dangling, "type2", &record.type2, TableKind::Types);
        for (i, ability) in record.abilities.iter().enumerate() {
            let field = format!("abilities[{i}]");
            self.check(&mut dangling, &field, ability, TableKind::Abilities);
        }
        for (i, entry) in record.moves.iter().enumerate() {
            let field = format!("moves[{i}].move");
            self.check(&mut dangling, &field, &entry.move_name, TableKind::Moves);
        }
        for (i, evolution) in record.evolutions.iter().enumerate() {
            let field = format!("evolutions[{i}].pkm");
            self.check(&mut dangling, &field, &evolution.target, TableKind::Pokemon);
            if let EvolutionTrigger::Item(item) = &evolution.trigger {
                let field = format!("evolutions[{i}].value");
                self.check(&mut dangling, &field, item, TableKind::Items);
            }
        }
        dangling
    }

    fn check(&self, out: &mut Vec<DanglingRef>, field: &str, value: &str, table: TableKind) {
        if !self.resolves(table, value) {
            out.push(DanglingRef {
                field: field.to_string(),
                value: value.to_string(),
                table,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dex_core::{Evolution, EvolutionTrigger};
    use std::path::Path;

    fn doc(text: &str) -> Document {
        Document::parse(text, Path::new("inline")).unwrap()
    }

    fn refs() -> CrossRefs {
        CrossRefs::new(KeyStyle::Underscore)
            .with(TableKind::Types, &doc("[Types.Normal]\n[Types.Grass]\n"))
            .with(
                TableKind::Moves,
                &doc("[Moves.Tackle]\n[Moves.Vine_Whip]\n"),
            )
            .with(TableKind::Items, &doc("[Items.Leaf_Stone]\n"))
            .with(TableKind::Pokemon, &doc("[Pokemon.Ivysaur]\n"))
    }

    #[test]
    fn test_list_keys_returns_display_names() {
        let moves = doc("[Moves.Tackle]\n[Moves.Vine_Whip]\n");
        assert_eq!(
            list_keys(&moves, "Moves", KeyStyle::Underscore),
            vec!["Tackle", "Vine Whip"]
        );
        assert!(list_keys(&moves, "Abilities", KeyStyle::Underscore).is_empty());
    }

    #[test]
    fn test_check_creature_flags_unknown_references() {
        let mut c = CreatureRecord::new("Bulbasaur");
        c.type1 = "Grass".to_string();
        c.add_move(1, "Tackle");
        c.add_move(3, "Vine Whip");
        c.add_move(9, "Razor Leaf");
        c.add_evolution(Evolution::new("Ivysaur"));
        c.add_evolution(Evolution::with_trigger(
            "Venusaur",
            EvolutionTrigger::Item("Moon Stone".to_string()),
        ));

        let dangling = refs().check_creature(&c);
        let fields: Vec<_> = dangling.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["moves[2].move", "evolutions[1].pkm", "evolutions[1].value"]
        );
        assert_eq!(dangling[0].table, TableKind::Moves);
        assert_eq!(dangling[0].value, "Razor Leaf");
    }

    #[test]
    fn test_empty_table_and_sentinel_always_resolve() {
        let refs = refs();
        assert!(refs.resolves(TableKind::Types, "None"));
        assert!(refs.resolves(TableKind::Abilities, "Overgrow"));
        assert!(!refs.resolves(TableKind::Types, "Fire"));
    }

    #[test]
    fn test_check_move_types() {
        let mut m = MoveRecord::new("Ember");
        m.type1 = "Fire".to_string();

        let dangling = refs().check_move(&m);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].field, "type1");
    }
}

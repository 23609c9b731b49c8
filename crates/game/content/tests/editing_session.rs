//! Load → edit → save sessions against real files.

use std::fs;

use dex_content::{CrossRefs, DataDir, Document, StoreError, TableKind};
use dex_core::{
    CreatureCodec, CreatureRecord, Evolution, EvolutionMethod, EvolutionTrigger, KeyStyle,
    MoveCategory, MoveCodec, MoveFlags, MoveRecord, RecordCodec, Selection,
};
use tempfile::TempDir;

fn data_dir() -> (TempDir, DataDir) {
    let temp = TempDir::new().unwrap();
    let dir = DataDir::new(temp.path());
    fs::write(dir.path(TableKind::Moves), "").unwrap();
    fs::write(dir.path(TableKind::Pokemon), "").unwrap();
    fs::write(
        dir.path(TableKind::Types),
        "[Types.Normal]\n[Types.Grass]\n[Types.Poison]\n",
    )
    .unwrap();
    fs::write(
        dir.path(TableKind::Items),
        "[Items.Leaf_Stone]\n[Items.Moon_Stone]\n",
    )
    .unwrap();
    (temp, dir)
}

fn tackle() -> MoveRecord {
    MoveRecord {
        name: "Tackle".to_string(),
        type1: "Normal".to_string(),
        type2: "None".to_string(),
        category: MoveCategory::Physical,
        power: 40,
        accuracy: 100,
        pp: 35,
        target: "Normal".to_string(),
        priority: 0,
        flags: MoveFlags::A,
        description: "A physical attack.".to_string(),
        ..MoveRecord::default()
    }
}

#[test]
fn test_move_session() {
    let (_temp, dir) = data_dir();
    let codec = MoveCodec::new(KeyStyle::Underscore);

    let mut moves = dir.load(TableKind::Moves).unwrap();
    assert!(moves.is_empty(MoveCodec::SECTION));

    moves.store(&codec, &tackle()).unwrap();
    dir.save(TableKind::Moves, &moves).unwrap();

    let text = fs::read_to_string(dir.path(TableKind::Moves)).unwrap();
    assert!(text.contains("flags = 1"), "{text}");

    let reloaded = dir.load(TableKind::Moves).unwrap();
    let decoded = reloaded.fetch(&codec, "Tackle").unwrap().unwrap();
    assert_eq!(decoded, tackle());
    assert_eq!(
        decoded.flags.to_array(),
        [true, false, false, false, false, false, false, false]
    );
}

#[test]
fn test_creature_session() {
    let (_temp, dir) = data_dir();
    let codec = CreatureCodec::new(KeyStyle::Underscore);

    let refs = CrossRefs::load(&dir, KeyStyle::Underscore).unwrap();
    assert_eq!(refs.list(TableKind::Items), ["Leaf Stone", "Moon Stone"]);
    assert!(refs.list(TableKind::Abilities).is_empty());

    let mut pokemon = dir.load(TableKind::Pokemon).unwrap();
    let mut oddish = CreatureRecord::new("Oddish");
    oddish.type1 = "Grass".to_string();
    oddish.type2 = "Poison".to_string();
    oddish.add_move(1, "Absorb");
    oddish.add_move(1, "Growth");
    oddish.add_move(14, "Poison Powder");
    oddish.remove_move(Selection::None);

    let i = oddish.add_evolution(Evolution::new("Gloom"));
    oddish.stats.hp = 45;
    oddish
        .set_evolution_method(i, EvolutionMethod::Item, refs.list(TableKind::Items))
        .unwrap();
    oddish.evolutions[i].trigger = EvolutionTrigger::Level(21);

    pokemon.store(&codec, &oddish).unwrap();
    dir.save(TableKind::Pokemon, &pokemon).unwrap();

    let reloaded = dir.load(TableKind::Pokemon).unwrap();
    let decoded = reloaded.fetch(&codec, "Oddish").unwrap().unwrap();
    assert_eq!(decoded, oddish);
    let moves: Vec<_> = decoded.moves.iter().map(|m| m.move_name.as_str()).collect();
    assert_eq!(moves, vec!["Absorb", "Growth"]);
    assert_eq!(decoded.evolutions[0].trigger, EvolutionTrigger::Level(21));
}

#[test]
fn test_item_then_level_resets_to_one() {
    let (_temp, dir) = data_dir();
    let refs = CrossRefs::load(&dir, KeyStyle::Underscore).unwrap();
    let items = refs.list(TableKind::Items);

    let mut gloom = CreatureRecord::new("Gloom");
    let i = gloom.add_evolution(Evolution::new("Vileplume"));
    gloom.set_evolution_method(i, EvolutionMethod::Item, items);
    assert_eq!(
        gloom.evolutions[i].trigger,
        EvolutionTrigger::Item("Leaf Stone".to_string())
    );

    gloom.set_evolution_method(i, EvolutionMethod::Level, items);
    assert_eq!(gloom.evolutions[i].trigger, EvolutionTrigger::Level(1));
}

#[test]
fn test_collapse_style_keys() {
    let (_temp, dir) = data_dir();
    let codec = MoveCodec::new(KeyStyle::Collapse);

    let mut moves = dir.load(TableKind::Moves).unwrap();
    let mut punch = tackle();
    punch.name = "Thunder Punch".to_string();
    assert_eq!(moves.store(&codec, &punch).unwrap(), "ThunderPunch");
    dir.save(TableKind::Moves, &moves).unwrap();

    let reloaded = Document::load(dir.path(TableKind::Moves)).unwrap();
    assert_eq!(reloaded.keys("Moves"), vec!["ThunderPunch"]);
    assert_eq!(
        dex_content::list_keys(&reloaded, "Moves", KeyStyle::Collapse),
        vec!["Thunder Punch"]
    );
}

#[test]
fn test_missing_data_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let dir = DataDir::new(temp.path());
    assert!(matches!(
        dir.load(TableKind::Pokemon),
        Err(StoreError::NotFound(_))
    ));
}

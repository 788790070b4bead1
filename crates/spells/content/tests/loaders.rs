use std::fs;
use std::path::Path;

use spells_content::{
    AimSpec, CasterRef, ContentFactory, ScenarioLoader, SpellLoader, TextLoader,
};
use spells_core::{
    Behavior, BattleInfo, ConditionCheck, Mode, ObstacleSpell, SchoolSet, SpellConfig, SpellId,
    TextKey, UnitFlags, UnitId,
};
use tempfile::TempDir;

fn shipped() -> ContentFactory {
    ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

#[test]
fn test_shipped_catalog_loads_every_spell() {
    let catalog = shipped().load_spells().unwrap();
    assert_eq!(catalog.len(), 17);

    let fire_wall = catalog.by_identifier("fire_wall").unwrap();
    assert_eq!(
        fire_wall.factory().behavior(),
        &Behavior::Obstacle(ObstacleSpell::FireWall)
    );

    let age = catalog.get(SpellId::AGE).unwrap();
    assert!(age.has_battle_effects());
    assert!(matches!(age.factory().behavior(), Behavior::Configured(_)));

    let arrow = catalog.by_identifier("magic_arrow").unwrap();
    assert!(matches!(arrow.factory().behavior(), Behavior::Fallback(_)));
    assert_eq!(arrow.schools.schools().count(), 4);

    assert!(catalog.by_identifier("town_portal").unwrap().adventure);
}

#[test]
fn test_shipped_texts_and_config() {
    let factory = shipped();
    let texts = factory.load_texts().unwrap();
    assert_eq!(
        texts.render(TextKey::NoEffect, &[("caster", "Solmyr")]),
        "Solmyr recites the incantations but they seem to have no effect."
    );
    assert_eq!(factory.load_config().unwrap(), SpellConfig::default());
}

#[test]
fn test_invalid_entry_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("spells.ron");
    fs::write(
        &path,
        r#"(
            spells: [
                (id: SpellId(41), identifier: "bless", name: "Bless", level: 1),
                (
                    id: SpellId(54),
                    identifier: "slow",
                    name: "Slow",
                    level: 1,
                    levels: (
                        (battle_effects: Some([(name: "slow", kind: Timed((bonuses: [])))])),
                        (cost: 6),
                        (cost: 6),
                        (cost: 6),
                    ),
                ),
                (id: SpellId(42), identifier: "bless", name: "Bless again", level: 1),
            ],
        )"#,
    )
    .unwrap();

    let catalog = SpellLoader::load(&path).unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get(SpellId::BLESS).is_some());
    assert!(catalog.get(SpellId::SLOW).is_none());
    assert!(catalog.get(SpellId(42)).is_none());
}

#[test]
fn test_malformed_catalog_is_fatal() {
    let err = SpellLoader::parse("(spells: [(id: 3,)]").unwrap_err();
    assert!(err.to_string().contains("Failed to parse spell catalog RON"));
}

#[test]
fn test_text_overrides_and_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("texts.toml");
    fs::write(
        &path,
        "no_appropriate_target = \"Kein passendes Ziel.\"\nnot_a_key = \"ignored\"\n",
    )
    .unwrap();

    let texts = TextLoader::load(&path).unwrap();
    assert_eq!(texts.template(TextKey::NoAppropriateTarget), "Kein passendes Ziel.");
    assert_eq!(
        texts.template(TextKey::CursedGround),
        TextKey::CursedGround.default_template()
    );
}

#[test]
fn test_mirror_duel_scenario() {
    let factory = shipped();
    let catalog = factory.load_spells().unwrap();
    let scenario = factory.load_scenario("mirror_duel").unwrap();
    scenario.validate(&catalog).unwrap();

    assert_eq!(scenario.seed, Some(42));
    let battle = scenario.battle();
    assert_eq!(battle.units().len(), 4);
    let archer = battle.unit(UnitId(2)).unwrap();
    assert!(archer.has_flags(UnitFlags::SHOOTER));

    let heroes = scenario.heroes(&catalog).unwrap();
    let solmyr = heroes.iter().find(|h| h.name == "Solmyr").unwrap();
    assert!(solmyr.known_spells.contains(&SpellId::LIGHTNING_BOLT));
    assert_eq!(solmyr.mana, 60);

    let first = &scenario.casts[0];
    assert_eq!(first.caster, CasterRef::Hero("Solmyr".into()));
    assert_eq!(first.mode, Mode::Hero);
    assert_eq!(first.targets, vec![AimSpec::Unit(4)]);
    assert_eq!(scenario.casts[4].overrides.effect_level, Some(3));
}

#[test]
fn test_siege_scenario() {
    let factory = shipped();
    let catalog = factory.load_spells().unwrap();
    let scenario = factory.load_scenario("siege").unwrap();
    scenario.validate(&catalog).unwrap();

    let battle = scenario.battle();
    assert_eq!(battle.wall_parts().len(), 4);
    assert!(scenario.casts.iter().any(|cast| cast.forced));
    assert_eq!(scenario.casts[2].mode, Mode::AfterAttack);
}

#[test]
fn test_shipped_flag_sets_decode() {
    let factory = shipped();
    let catalog = factory.load_spells().unwrap();

    assert_eq!(catalog.by_identifier("magic_arrow").unwrap().schools, SchoolSet::all());
    assert_eq!(catalog.by_identifier("fire_wall").unwrap().schools, SchoolSet::FIRE);

    let age = catalog.get(SpellId::AGE).unwrap();
    let checks: Vec<_> = age
        .target_condition
        .normal
        .iter()
        .map(|item| (item.check.clone(), item.inverted))
        .collect();
    assert_eq!(
        checks,
        vec![
            (ConditionCheck::HasFlag(UnitFlags::SIEGE_WEAPON), true),
            (ConditionCheck::HasFlag(UnitFlags::UNDEAD), true),
        ]
    );

    let battle = factory.load_scenario("siege").unwrap().battle();
    let dragon = battle.unit(UnitId(1)).unwrap();
    assert_eq!(dragon.flags, UnitFlags::FLYING | UnitFlags::UNDEAD);
    let tower = battle.unit(UnitId(4)).unwrap();
    assert_eq!(tower.flags, UnitFlags::SIEGE_WEAPON | UnitFlags::SHOOTER);
    assert!(battle.unit(UnitId(3)).unwrap().flags.is_empty());
}

#[test]
fn test_unknown_names_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.ron");
    fs::write(
        &path,
        r#"(
            name: "Broken",
            attacker: 0,
            defender: 1,
            heroes: [(name: "Adela", owner: 0, spell_power: 1, knowledge: 1, spells: ["armageddon"])],
            casts: [(caster: Hero("Crag Hack"), spell: "bless")],
        )"#,
    )
    .unwrap();

    let scenario = ScenarioLoader::load(&path).unwrap();
    let catalog = shipped().load_spells().unwrap();
    assert!(scenario.heroes(&catalog).is_err());
    let err = scenario.validate(&catalog).unwrap_err();
    assert!(err.to_string().contains("unknown caster"));
}

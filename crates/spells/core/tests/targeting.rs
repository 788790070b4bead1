use spells_core::{
    AimType, BattleCast, BattleHex, BattleInfo, BattleState, BattlefieldKind, BonusKind,
    Destination, HeroCaster, LevelInfo, Mode, PlayerId, Positiveness, Problem, SchoolSet, Side,
    Spell, SpellBonus, SpellId, SpellRange, SpellSchool, TextTable, Unit, UnitFlags, UnitId,
};

fn battle() -> BattleState {
    BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(Unit::new(
            UnitId(1),
            PlayerId(0),
            Side::Attacker,
            BattleHex::from_xy(1, 1),
            "archer",
            12,
            10,
        ))
        .with_unit(
            Unit::new(
                UnitId(2),
                PlayerId(0),
                Side::Attacker,
                BattleHex::from_xy(0, 5),
                "ballista",
                1,
                250,
            )
            .with_flags(UnitFlags::SIEGE_WEAPON),
        )
        .with_unit(Unit::new(
            UnitId(3),
            PlayerId(1),
            Side::Defender,
            BattleHex::from_xy(15, 5),
            "orc",
            8,
            15,
        ))
}

fn teleport() -> Spell {
    Spell::new(SpellId::TELEPORT, "teleport", "Teleport", 3)
        .with_schools(SchoolSet::WATER)
        .with_positiveness(Positiveness::Positive)
        .with_aim(AimType::Creature)
        .with_all_levels(LevelInfo::new(15, 0))
}

/// Two-slot spell: every returned pair is a movable friendly unit followed by a
/// free hex, and every such pair is returned.
#[test]
fn two_slot_spell_yields_full_cross_product() {
    let battle = battle();
    let spell = teleport();
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 3, 5)
        .with_school_level(SpellSchool::Water, 2)
        .with_spell(SpellId::TELEPORT);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let targets = cast.find_potential_targets(&battle);

    let free = BattleHex::all().filter(|hex| battle.is_free_hex(*hex)).count();
    assert_eq!(free, BattleHex::COUNT as usize - 3);
    // Only the archer can be moved: the ballista is a siege weapon, the orc is hostile.
    assert_eq!(targets.len(), free);

    for target in &targets {
        let [Destination::Unit(id, _), Destination::Location(hex)] = target.as_slice() else {
            panic!("unexpected target shape: {target:?}");
        };
        assert_eq!(*id, UnitId(1));
        assert!(battle.is_free_hex(*hex));
        assert_ne!(*hex, BattleHex::from_xy(1, 1));
    }

    let mut sample = BattleCast::new(&spell, &hero, Mode::Hero);
    sample.aim_to_unit_id(&battle, UnitId(1));
    sample.aim_to_hex(targets[0][1].hex());
    let mut problem = Problem::new();
    assert!(sample.can_be_cast_at(&battle, &TextTable::default(), &mut problem));
    assert!(problem.is_empty());
}

/// Without school mastery the second slot still only offers free hexes, each once.
#[test]
fn second_slot_offers_only_free_hexes() {
    let battle = battle();
    let spell = teleport();
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 3, 5).with_spell(SpellId::TELEPORT);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let targets = cast.find_potential_targets(&battle);
    assert!(!targets.is_empty());
    assert!(targets.iter().all(|target| target.len() == 2));
    assert!(targets.iter().all(|target| target[0].hex() == BattleHex::from_xy(1, 1)));
    assert!(targets.iter().all(|target| battle.is_free_hex(target[1].hex())));

    let mut offered: Vec<BattleHex> = targets.iter().map(|target| target[1].hex()).collect();
    offered.sort();
    offered.dedup();
    assert_eq!(offered.len(), targets.len());
    assert!(!offered.contains(&BattleHex::from_xy(15, 5)));
    assert!(!offered.contains(&BattleHex::from_xy(0, 5)));
}

#[test]
fn uncastable_spell_has_no_targets() {
    let battle = battle();
    let spell = teleport();
    // Does not know the spell: no target-type slots at all.
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 3, 5);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);
    assert!(cast.find_potential_targets(&battle).is_empty());
}

#[test]
fn massive_spell_targets_nothing_in_particular() {
    let battle = battle();
    let spell = Spell::new(SpellId::SLOW, "slow", "Slow", 1)
        .with_schools(SchoolSet::EARTH)
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .with_all_levels(LevelInfo::new(6, 0).with_effects([SpellBonus::new(BonusKind::Speed, -3)]))
        .with_level(
            3,
            LevelInfo::new(6, 0)
                .with_range(SpellRange::Massive)
                .smart()
                .with_effects([SpellBonus::new(BonusKind::Speed, -3)]),
        );
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 3, 5)
        .with_school_level(SpellSchool::Earth, 3)
        .with_spell(SpellId::SLOW);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let m = spell.battle_mechanics(&cast, &battle);
    assert!(m.is_massive());
    assert_eq!(m.target_types(&battle), vec![AimType::NoTarget]);
    assert_eq!(
        cast.find_potential_targets(&battle),
        vec![vec![Destination::NoTarget]]
    );
}

#[test]
fn single_target_spell_lists_each_receptive_unit() {
    let battle = battle();
    let spell = Spell::new(SpellId::MAGIC_ARROW, "magic_arrow", "Magic Arrow", 1)
        .with_schools(SchoolSet::all())
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .offensive()
        .with_power(10)
        .with_all_levels(LevelInfo::new(5, 10));
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 3, 5).with_spell(SpellId::MAGIC_ARROW);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let mut units: Vec<UnitId> = cast
        .find_potential_targets(&battle)
        .iter()
        .filter_map(|target| target.first().and_then(Destination::unit_id))
        .collect();
    units.sort();
    assert_eq!(units, vec![UnitId(1), UnitId(2), UnitId(3)]);
}

use spells_core::{
    AimType, BattleCast, BattleEnvironment, BattleHex, BattleRng, BattleState,
    BattlefieldKind, Behavior, BonusKind, CastOverrides, CatapultEffect, ConditionItemConfig,
    DamageEffect, EffectConfig, EffectKind, HeroCaster, LevelInfo, LevelLimiter, Mode, PlayerId,
    Positiveness, Problem, ResolvedParameters, SchoolSet, Severity, Side, Spell, SpellBonus,
    SpellCastEnvironment, SpellConfig, SpellId, SpellSchool, TargetConditionConfig, TextTable, Unit,
    UnitCaster, UnitFlags, UnitId, UnitTrait, WallPart,
};

fn unit(id: u32, owner: u8, side: Side, x: i16, creature: &str) -> Unit {
    Unit::new(
        UnitId(id),
        PlayerId(owner),
        side,
        BattleHex::from_xy(x, 4),
        creature,
        10,
        10,
    )
}

fn magic_arrow() -> Spell {
    Spell::new(SpellId::MAGIC_ARROW, "magic_arrow", "Magic Arrow", 1)
        .with_schools(SchoolSet::all())
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .offensive()
        .with_power(10)
        .with_all_levels(LevelInfo::new(5, 10))
}

fn solmyr() -> HeroCaster {
    HeroCaster::new("Solmyr", PlayerId(0), 2, 5).with_spell(SpellId::MAGIC_ARROW)
}

fn health(env: &BattleEnvironment, id: u32) -> u64 {
    env.battle()
        .unit(UnitId(id))
        .map_or(0, Unit::total_health)
}

// ============================================================================
// Parameter resolution
// ============================================================================

#[test]
fn parameters_follow_caster_without_overrides() {
    let spell = magic_arrow();
    let hero = solmyr().with_school_level(SpellSchool::Fire, 2);
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1));
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let m = spell.battle_mechanics(&cast, &state);
    assert_eq!(
        m.parameters(),
        ResolvedParameters {
            range_level: 2,
            effect_level: 2,
            effect_power: 2,
            effect_duration: 2,
            // 2 * 10 spell power + 1 * 10 level power
            effect_value: 30,
        }
    );
}

#[test]
fn every_override_wins_independently() {
    let spell = magic_arrow();
    let hero = solmyr();
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1));
    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.set_range_level(7);
    cast.set_effect_level(1);
    cast.set_effect_power(-4);
    cast.set_effect_duration(9);
    cast.set_effect_value(55);

    let params = spell.battle_mechanics(&cast, &state).parameters();
    assert_eq!(params.range_level, 3);
    assert_eq!(params.effect_level, 1);
    assert_eq!(params.effect_power, 0);
    assert_eq!(params.effect_duration, 9);
    assert_eq!(params.effect_value, 55);
    assert_eq!(
        *cast.overrides(),
        CastOverrides {
            spell_level: None,
            range_level: Some(7),
            effect_level: Some(1),
            effect_power: Some(-4),
            effect_duration: Some(9),
            effect_value: Some(55),
        }
    );
}

#[test]
fn creature_magnitude_is_used_as_is() {
    let spell = magic_arrow();
    let caster_unit = unit(1, 0, Side::Attacker, 2, "sprite").with_trait(UnitTrait::SpecificSpellPower {
        spell: SpellId::MAGIC_ARROW,
        value: 4,
    });
    let caster = UnitCaster::new(&caster_unit);
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1)).with_unit(caster_unit);
    let cast = BattleCast::new(&spell, &caster, Mode::CreatureAbility);

    // 4 per creature, 10 creatures
    assert_eq!(spell.battle_mechanics(&cast, &state).effect_value(), 40);
}

// ============================================================================
// Factory selection
// ============================================================================

#[test]
fn offensive_spell_without_tables_gets_direct_damage_only() {
    let spell = magic_arrow();
    let Behavior::Fallback(effects) = spell.factory().behavior() else {
        panic!("expected fallback behavior");
    };
    for level in 0..4 {
        let configs = effects.level(level);
        let damage = configs
            .iter()
            .filter(|c| matches!(c.kind, EffectKind::Damage(_)))
            .count();
        let timed = configs
            .iter()
            .filter(|c| matches!(c.kind, EffectKind::Timed(_)))
            .count();
        assert_eq!((damage, timed), (1, 0), "level {level}");
    }
}

#[test]
fn configured_pipeline_wins_over_dedicated_behavior() {
    let spell = Spell::new(SpellId::FIRE_WALL, "fire_wall", "Fire Wall", 2).with_all_levels(
        LevelInfo::new(8, 10).with_battle_effects(vec![EffectConfig::new(
            "damage",
            EffectKind::Damage(DamageEffect::new()),
        )]),
    );
    assert!(matches!(spell.factory().behavior(), Behavior::Configured(_)));
}

// ============================================================================
// Cast pipeline
// ============================================================================

#[test]
fn reduced_entry_point_matches_full_pipeline() {
    let spell = magic_arrow();
    let hero = solmyr();
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(unit(1, 0, Side::Attacker, 2, "pikeman"))
        .with_unit(
            unit(2, 1, Side::Defender, 12, "genie").with_trait(UnitTrait::MagicMirror { chance: 100 }),
        );

    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.aim_to_unit_id(&state, UnitId(2));

    let mut full = BattleEnvironment::new(state.clone(), 11);
    let full_report = cast.cast(&mut full);

    let mut bare = state;
    let mut rng = BattleRng::new(11);
    let bare_report = cast.cast_on(&mut bare, &mut rng, &full.config, &full.texts);

    assert_eq!(full_report, bare_report);
    assert_eq!(full.state, bare);
    assert_eq!(full_report.reflections.len(), 1);
}

#[test]
fn reduced_entry_point_honors_runtime_config() {
    let spell = Spell::new(SpellId::FIRE_WALL, "fire_wall", "Fire Wall", 2)
        .with_schools(SchoolSet::FIRE)
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Obstacle)
        .offensive()
        .with_power(10)
        .with_all_levels(LevelInfo::new(8, 10));
    let hero = HeroCaster::new("Luna", PlayerId(0), 2, 5).with_spell(SpellId::FIRE_WALL);
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(unit(1, 0, Side::Attacker, 2, "pikeman"))
        .with_unit(unit(2, 1, Side::Defender, 12, "orc"));
    let config = SpellConfig {
        obstacle_turns: 7,
        ..SpellConfig::default()
    };
    let texts = TextTable::default();

    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.aim_to_hex(BattleHex::from_xy(7, 2));

    let mut full = BattleEnvironment::new(state.clone(), 5).with_config(config.clone());
    let full_report = cast.cast(&mut full);

    let mut bare = state;
    let mut rng = BattleRng::new(5);
    let bare_report = cast.cast_on(&mut bare, &mut rng, &config, &texts);

    assert_eq!(full_report, bare_report);
    assert_eq!(full.state, bare);
    assert_eq!(bare.obstacles.len(), 1);
    assert_eq!(full.state.obstacles[0].turns_remaining, Some(7));
    assert_eq!(bare.obstacles[0].turns_remaining, Some(7));
}

/// The genie throws the arrow back at the pikemen, who are unprotected.
#[test]
fn reflected_spell_hits_original_caster_army() {
    let spell = magic_arrow();
    let hero = solmyr();
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(unit(1, 0, Side::Attacker, 2, "pikeman"))
        .with_unit(
            unit(2, 1, Side::Defender, 12, "genie").with_trait(UnitTrait::MagicMirror { chance: 100 }),
        );
    let mut env = BattleEnvironment::new(state, 3);

    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.aim_to_unit_id(env.battle(), UnitId(2));
    let report = cast.cast(&mut env);

    assert!(report.affected.is_empty());
    assert_eq!(report.reflections.len(), 1);
    let reflection = &report.reflections[0];
    assert_eq!(reflection.reflector, UnitId(2));
    assert_eq!(reflection.target, BattleHex::from_xy(2, 4));
    assert_eq!(reflection.report.mode, Mode::MagicMirror);
    assert_eq!(reflection.report.affected, vec![UnitId(1)]);
    assert!(!report.reflection_refused);

    assert_eq!(health(&env, 2), 100);
    assert_eq!(health(&env, 1), 70);
}

/// Two mirror-protected units: the reflected cast is reflected again, and that
/// second reflection is refused.
#[test]
fn reflection_of_reflection_is_refused() {
    let spell = magic_arrow();
    let hero = solmyr();
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(
            unit(1, 0, Side::Attacker, 2, "genie").with_trait(UnitTrait::MagicMirror { chance: 100 }),
        )
        .with_unit(
            unit(2, 1, Side::Defender, 12, "genie").with_trait(UnitTrait::MagicMirror { chance: 100 }),
        );
    let mut env = BattleEnvironment::new(state, 5);

    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.aim_to_unit_id(env.battle(), UnitId(2));
    let report = cast.cast(&mut env);

    assert_eq!(report.reflections.len(), 1);
    let mirrored = &report.reflections[0].report;
    assert!(mirrored.reflections.is_empty());
    assert!(mirrored.reflection_refused);
    assert!(report.reflection_refused);

    assert_eq!(health(&env, 1), 100);
    assert_eq!(health(&env, 2), 100);
    // The hero cast and the single reflected cast.
    assert_eq!(env.state.cast_log.len(), 2);
    assert_eq!(env.state.cast_log[1].mode, Mode::MagicMirror);
}

#[test]
fn friendly_spells_are_never_reflected() {
    let bless = Spell::new(SpellId::BLESS, "bless", "Bless", 1)
        .with_schools(SchoolSet::WATER)
        .with_positiveness(Positiveness::Positive)
        .with_aim(AimType::Creature)
        .with_all_levels(LevelInfo::new(5, 0).with_effects([SpellBonus::new(BonusKind::AlwaysMaximumDamage, 0)]));
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 5).with_spell(SpellId::BLESS);
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1)).with_unit(
        unit(1, 0, Side::Attacker, 2, "genie").with_trait(UnitTrait::MagicMirror { chance: 100 }),
    );
    let mut env = BattleEnvironment::new(state, 5);

    let mut cast = BattleCast::new(&bless, &hero, Mode::Hero);
    cast.aim_to_unit_id(env.battle(), UnitId(1));
    let report = cast.cast(&mut env);

    assert_eq!(report.affected, vec![UnitId(1)]);
    assert!(report.reflections.is_empty());
    let active = env.state.units[0].active_spell(SpellId::BLESS).expect("blessed");
    assert_eq!(active.turns_remaining, 2);
}

/// After-attack reaction of a ghost dragon against a war machine: the target is
/// illegal, yet the cast itself is allowed and simply changes nothing.
#[test]
fn after_attack_spell_on_war_machine_is_a_legal_no_op() {
    let age = Spell::new(SpellId::AGE, "age", "Age", 3)
        .with_schools(SchoolSet::EARTH)
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .with_all_levels(LevelInfo::new(0, 0).with_effects([SpellBonus::new(BonusKind::StackHealth, -50)]))
        .with_target_condition(TargetConditionConfig {
            normal: vec![ConditionItemConfig::without_flag(UnitFlags::SIEGE_WEAPON)],
            ..TargetConditionConfig::default()
        });
    let dragon = unit(1, 0, Side::Attacker, 2, "ghost_dragon").with_flags(UnitFlags::UNDEAD | UnitFlags::FLYING);
    let ballista = unit(2, 1, Side::Defender, 14, "ballista").with_flags(UnitFlags::SIEGE_WEAPON);
    let caster = UnitCaster::new(&dragon);
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(dragon)
        .with_unit(ballista);
    let mut env = BattleEnvironment::new(state, 9);

    let mut cast = BattleCast::new(&age, &caster, Mode::AfterAttack);
    cast.set_spell_level(3);
    cast.aim_to_unit_id(env.battle(), UnitId(2));

    let mut problem = Problem::new();
    assert!(!cast.can_be_cast_at(env.battle(), env.texts(), &mut problem));
    assert_eq!(problem.severity(), Some(Severity::Normal));

    assert!(cast.cast_if_possible(&mut env));
    let ballista = env.battle().unit(UnitId(2)).expect("ballista");
    assert!(ballista.active_spells.is_empty());
}

#[test]
fn dead_caster_cannot_cast() {
    let spell = magic_arrow();
    let mut sprite = unit(1, 0, Side::Attacker, 2, "sprite");
    let caster = UnitCaster::new(&sprite);
    sprite.count = 0;
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(sprite)
        .with_unit(unit(2, 1, Side::Defender, 12, "orc"));
    let mut env = BattleEnvironment::new(state, 1);

    let mut cast = BattleCast::new(&spell, &caster, Mode::CreatureAbility);
    cast.aim_to_unit_id(env.battle(), UnitId(2));
    let problem = cast.cast_checked(&mut env).expect_err("caster is dead");
    assert!(!problem.is_empty());
    assert_eq!(health(&env, 2), 100);
}

// ============================================================================
// Problems
// ============================================================================

#[test]
fn artifact_limiter_names_the_artifact() {
    let spell = Spell::new(SpellId::AGE, "age", "Age", 3)
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .with_all_levels(LevelInfo::new(0, 0).with_effects([SpellBonus::new(BonusKind::StackHealth, -50)]));
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 5)
        .with_spell(SpellId::AGE)
        .with_limiter(LevelLimiter::artifact("Recanter's Cloak", 2));
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_unit(unit(2, 1, Side::Defender, 12, "orc"));
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    let mut problem = Problem::new();
    assert!(!cast.can_be_cast(&state, &TextTable::default(), &mut problem));
    let message = problem.messages().next().expect("message");
    assert!(message.contains("Recanter's Cloak"), "{message}");
}

#[test]
fn cursed_ground_blocks_high_level_spells() {
    let spell = magic_arrow();
    let high = Spell::new(SpellId::LIGHTNING_BOLT, "lightning_bolt", "Lightning Bolt", 2)
        .with_schools(SchoolSet::AIR)
        .with_positiveness(Positiveness::Negative)
        .with_aim(AimType::Creature)
        .offensive()
        .with_all_levels(LevelInfo::new(10, 10));
    let hero = solmyr().with_spell(SpellId::LIGHTNING_BOLT);
    let state = BattleState::new(BattlefieldKind::CursedGround, PlayerId(0), PlayerId(1))
        .with_unit(unit(2, 1, Side::Defender, 12, "orc"));
    let texts = TextTable::default();

    let mut problem = Problem::new();
    assert!(BattleCast::new(&spell, &hero, Mode::Hero).can_be_cast(&state, &texts, &mut problem));
    assert!(!BattleCast::new(&high, &hero, Mode::Hero).can_be_cast(&state, &texts, &mut problem));
    assert_eq!(problem.entries().len(), 1);
}

#[test]
fn immune_target_reports_no_appropriate_target() {
    let spell = magic_arrow();
    let hero = solmyr();
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1)).with_unit(
        unit(2, 1, Side::Defender, 12, "black_dragon").with_trait(UnitTrait::LevelSpellImmunity {
            level: 5,
            absolute: false,
        }),
    );
    let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
    cast.aim_to_unit_id(&state, UnitId(2));

    let mut problem = Problem::new();
    assert!(!cast.can_be_cast_at(&state, &TextTable::default(), &mut problem));
    assert_eq!(problem.entries().len(), 1);
}

// ============================================================================
// Partial application
// ============================================================================

#[test]
fn deterministic_application_skips_random_effects() {
    let spell = Spell::new(SpellId(90), "earthquake", "Earthquake", 3)
        .with_schools(SchoolSet::EARTH)
        .with_all_levels(LevelInfo::new(20, 0).with_battle_effects(vec![EffectConfig::new(
            "catapult",
            EffectKind::Catapult(CatapultEffect::new(2, 1)),
        )]));
    let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 5).with_spell(SpellId(90));
    let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
        .with_walls((0..3).map(|y| WallPart {
            hex: BattleHex::from_xy(12, y),
            hp: 1,
        }));
    let mut env = BattleEnvironment::new(state, 4);
    let cast = BattleCast::new(&spell, &hero, Mode::Hero);

    cast.apply_effects(&mut env);
    assert!(env.state.walls.iter().all(WallPart::intact));
    assert!(env.state.cast_log.is_empty());

    cast.apply_effects_forced(&mut env);
    assert_eq!(env.state.walls.iter().filter(|w| !w.intact()).count(), 2);
    assert!(env.state.cast_log.is_empty());
}

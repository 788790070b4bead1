//! Deterministic spell-cast resolution for tactical battles.
//!
//! `spells-core` decides whether a spell may be cast, where it may land, with
//! what strength, and runs the cast against the battle, including magic mirror
//! reflections. Every spell gets a cached [`MechanicsFactory`]; every cast
//! attempt is a [`BattleCast`] that builds fresh [`Mechanics`] from it.
//! Battle state, randomness and caster capabilities are injected through
//! traits so the rules stay free of I/O.
pub mod adventure;
pub mod cast;
pub mod caster;
pub mod config;
pub mod effects;
pub mod env;
pub mod error;
pub mod mechanics;
pub mod spell;
pub mod state;

pub use adventure::{
    AdventureBonus, AdventureCastError, AdventureHero, AdventureMap, AdventureMechanics,
    AdventureOutcome, AdventureWorld, MapPos, RevealKind, Terrain,
};
pub use cast::{BattleCast, CastReport, Destination, Mode, Reflection, Target};
pub use caster::{Caster, HeroCaster, LevelLimiter, LimiterSource, UnitCaster};
pub use config::SpellConfig;
pub use effects::{
    CatapultEffect, DamageEffect, EffectConfig, EffectKind, Effects, TimedEffect,
};
pub use env::{
    BattleEnvironment, BattleRng, RandomSource, SpellCastEnvironment, StateCastEnvironment,
    compute_seed, random_item,
};
pub use error::{EngineError, ErrorSeverity};
pub use mechanics::{
    Behavior, CastOutcome, CastOverrides, CastProblem, ConditionCheck, ConditionItemConfig,
    DimensionSpell, Mechanics, MechanicsFactory, MinefieldSpell, ObstacleSpell, Problem,
    ResolvedParameters, Severity, TargetCondition, TargetConditionConfig, TextKey, TextTable,
};
pub use spell::{
    AimType, BonusKind, ConfigError, LevelInfo, Positiveness, SchoolSet, Spell, SpellBonus,
    SpellCatalog, SpellId, SpellRange, SpellSchool, TargetInfo,
};
pub use state::{
    ActiveSpell, BattleError, BattleHex, BattleInfo, BattleMutation, BattleState,
    BattlefieldKind, CastRecord, DamageResult, Obstacle, ObstacleHexes, ObstacleKind,
    ObstacleSpawn, PlayerId, Side, TraitKind, Unit, UnitFlags, UnitId, UnitTrait, WallPart,
};

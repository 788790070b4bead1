//! Caster capability queries.
//!
//! A [`Caster`] answers every per-mode, per-spell question the parameter
//! resolution pipeline asks: proficiency tiers, power, duration, magnitude and
//! bonus multipliers. Heroes and battle units answer them differently.
mod hero;
mod unit;

pub use hero::HeroCaster;
pub use unit::UnitCaster;

use crate::cast::Mode;
use crate::spell::{Spell, SpellId};
use crate::state::{BattlefieldKind, PlayerId, Unit, UnitId};

/// Where a spell level restriction comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LimiterSource {
    /// Equipped artifact, by display name.
    Artifact(String),
    /// Battlefield terrain overlay.
    Terrain(BattlefieldKind),
    Other,
}

/// Blocks casting spells above `max_level`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelLimiter {
    pub max_level: i32,
    pub source: LimiterSource,
}

impl LevelLimiter {
    pub fn artifact(name: impl Into<String>, max_level: i32) -> Self {
        Self {
            max_level,
            source: LimiterSource::Artifact(name.into()),
        }
    }

    pub fn blocks(&self, spell_level: i32) -> bool {
        spell_level > self.max_level
    }
}

/// Capability queries answered by whoever casts a spell.
pub trait Caster {
    fn owner(&self) -> PlayerId;

    /// Battle unit doing the casting, if the caster is a unit.
    fn caster_unit(&self) -> Option<UnitId> {
        None
    }

    fn name(&self) -> &str;

    /// Proficiency tier used for range (single, area, massive).
    fn spell_school_level(&self, mode: Mode, spell: &Spell) -> i32;

    /// Proficiency tier used to pick the effect table row.
    fn effect_level(&self, mode: Mode, spell: &Spell) -> i32;

    fn effect_power(&self, mode: Mode, spell: &Spell) -> i32;

    /// Duration of timed effects, in rounds.
    fn enchant_power(&self, mode: Mode, spell: &Spell) -> i32;

    /// Configured magnitude; zero means none is configured.
    fn effect_value(&self, mode: Mode, spell: &Spell) -> i64;

    /// General damage bonus (sorcery and the like) against `target`.
    fn spell_bonus(&self, spell: &Spell, value: i64, target: Option<&Unit>) -> i64;

    /// Per-spell specialty bonus.
    fn specific_spell_bonus(&self, spell: &Spell, value: i64) -> i64;

    fn knows_spell(&self, _spell: SpellId) -> bool {
        true
    }

    fn level_limiter(&self) -> Option<LevelLimiter> {
        None
    }
}

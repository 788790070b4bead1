//! Spell effect pipeline.
//!
//! # Architecture
//!
//! This module uses an **Enum + Struct hybrid** approach:
//! - Individual effects are structs ([`DamageEffect`], [`TimedEffect`], [`CatapultEffect`])
//! - [`EffectKind`] wraps them for serialization and dispatching
//! - [`Effects`] holds the named effects of each spell level
//!
//! Every effect answers the same questions: is it applicable at all, which
//! units or hexes does an aim resolve to, and what happens when it is applied.
//! Random effects are skipped when only the deterministic part of a spell is
//! evaluated.

mod catapult;
mod damage;
pub(crate) mod targeting;
mod timed;

pub use catapult::CatapultEffect;
pub use damage::DamageEffect;
pub use timed::TimedEffect;

use crate::cast::Target;
use crate::config::SpellConfig;
use crate::env::RandomSource;
use crate::mechanics::Mechanics;
use crate::spell::{ConfigError, Spell, SpellId};
use crate::state::{BattleInfo, BattleMutation, UnitId};

/// The actual effect to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Damage(DamageEffect),
    Timed(TimedEffect),
    Catapult(CatapultEffect),
}

impl EffectKind {
    /// Whether the effect can take place at all, ignoring destinations.
    pub fn applicable(&self, m: &Mechanics<'_>, battle: &dyn BattleInfo) -> bool {
        match self {
            Self::Damage(effect) => effect.applicable(m, battle),
            Self::Timed(effect) => effect.applicable(m, battle),
            Self::Catapult(effect) => effect.applicable(m, battle),
        }
    }

    /// Whether the effect does something for an already resolved target.
    pub fn applicable_to(&self, m: &Mechanics<'_>, battle: &dyn BattleInfo, target: &Target) -> bool {
        match self {
            Self::Damage(_) | Self::Timed(_) => !target.is_empty(),
            Self::Catapult(effect) => effect.applicable(m, battle),
        }
    }

    /// Resolves the spell's aim into this effect's own target.
    pub fn transform_target(&self, m: &Mechanics<'_>, battle: &dyn BattleInfo, aim: &Target) -> Target {
        match self {
            Self::Damage(effect) => effect.transform_target(m, battle, aim),
            Self::Timed(effect) => effect.transform_target(m, battle, aim),
            Self::Catapult(_) => aim.clone(),
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, Self::Catapult(_))
    }

    /// Applies the effect, returning the units it changed.
    pub fn apply(
        &self,
        battle: &mut dyn BattleMutation,
        rng: &mut dyn RandomSource,
        m: &Mechanics<'_>,
        target: &Target,
    ) -> Vec<UnitId> {
        match self {
            Self::Damage(effect) => effect.apply(battle, m, target),
            Self::Timed(effect) => effect.apply(battle, m, target),
            Self::Catapult(effect) => {
                effect.apply(battle, rng, m);
                Vec::new()
            }
        }
    }

    fn validate(&self, spell: SpellId, level: usize, name: &str) -> Result<(), ConfigError> {
        match self {
            Self::Timed(timed) if timed.bonuses.is_empty() => Err(ConfigError::EmptyTimedBonus {
                spell,
                level,
                name: name.to_owned(),
            }),
            Self::Catapult(catapult) if catapult.shots == 0 => Err(ConfigError::NoCatapultShots {
                spell,
                level,
                name: name.to_owned(),
            }),
            _ => Ok(()),
        }
    }
}

/// Named effect with its pipeline flags.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectConfig {
    pub name: String,
    pub kind: EffectKind,

    /// Not applicable is fine; the spell still can be cast.
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,

    /// Side effect of another effect; does not count towards applicability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub indirect: bool,
}

impl EffectConfig {
    pub fn new(name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            indirect: false,
        }
    }

    /// Builder: mark as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Builder: mark as indirect.
    pub fn indirect(mut self) -> Self {
        self.indirect = true;
        self
    }
}

/// Effects of a spell, per level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Effects {
    levels: [Vec<EffectConfig>; SpellConfig::SPELL_SCHOOL_LEVELS],
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named effect to one level, rejecting duplicates and malformed entries.
    pub fn add(
        &mut self,
        spell: SpellId,
        level: usize,
        effect: EffectConfig,
    ) -> Result<(), ConfigError> {
        let slot = &mut self.levels[level.min(SpellConfig::SPELL_SCHOOL_LEVELS - 1)];
        if slot.iter().any(|existing| existing.name == effect.name) {
            return Err(ConfigError::DuplicateEffect {
                spell,
                level,
                name: effect.name,
            });
        }
        effect.kind.validate(spell, level, &effect.name)?;
        slot.push(effect);
        Ok(())
    }

    /// Compiles the authored pipeline of every level.
    pub fn configured(spell: &Spell) -> Result<Self, ConfigError> {
        let mut effects = Self::new();
        for (level, info) in spell.levels.iter().enumerate() {
            for effect in info.battle_effects.iter().flatten() {
                effects.add(spell.id, level, effect.clone())?;
            }
        }
        Ok(effects)
    }

    /// Synthesizes a pipeline from the legacy level tables.
    ///
    /// Offensive spells get direct damage. A non-empty bonus table becomes a
    /// timed effect; the cumulative table wins when both are present.
    pub fn fallback(spell: &Spell) -> Self {
        let mut effects = Self::new();
        for (level, info) in spell.levels.iter().enumerate() {
            if spell.offensive {
                effects.levels[level].push(EffectConfig::new(
                    "directDamage",
                    EffectKind::Damage(DamageEffect::new()),
                ));
            }

            let timed = if !info.cumulative_effects.is_empty() {
                Some(TimedEffect::new(info.cumulative_effects.clone(), true))
            } else if !info.effects.is_empty() {
                Some(TimedEffect::new(info.effects.clone(), false))
            } else {
                None
            };
            if let Some(timed) = timed {
                effects.levels[level].push(EffectConfig::new("timed", EffectKind::Timed(timed)));
            }
        }
        effects
    }

    pub fn level(&self, level: i32) -> &[EffectConfig] {
        &self.levels[SpellConfig::clamp_school_level(level) as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }
}

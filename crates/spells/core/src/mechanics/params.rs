//! Numeric parameter resolution for one cast.
//!
//! Each parameter resolves as: explicit override, else the caster's capability
//! query. Levels are then clamped to `0..=3` and power and duration floored at
//! zero. A zero magnitude from the caster means "not configured" and is
//! replaced by the level table default.

use crate::cast::Mode;
use crate::caster::Caster;
use crate::config::SpellConfig;
use crate::spell::Spell;

/// Explicit per-cast overrides. `spell_level` backs both range and effect level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CastOverrides {
    pub spell_level: Option<i32>,
    pub range_level: Option<i32>,
    pub effect_level: Option<i32>,
    pub effect_power: Option<i32>,
    pub effect_duration: Option<i32>,
    pub effect_value: Option<i64>,
}

impl CastOverrides {
    pub fn range_level(&self) -> Option<i32> {
        self.range_level.or(self.spell_level)
    }

    pub fn effect_level(&self) -> Option<i32> {
        self.effect_level.or(self.spell_level)
    }

    /// Overrides pinning every parameter to already resolved values.
    pub fn pinned(resolved: &ResolvedParameters) -> Self {
        Self {
            spell_level: None,
            range_level: Some(resolved.range_level),
            effect_level: Some(resolved.effect_level),
            effect_power: Some(resolved.effect_power),
            effect_duration: Some(resolved.effect_duration),
            effect_value: Some(resolved.effect_value),
        }
    }
}

/// The five resolved numeric parameters of one cast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolvedParameters {
    pub range_level: i32,
    pub effect_level: i32,
    pub effect_power: i32,
    pub effect_duration: i32,
    pub effect_value: i64,
}

impl ResolvedParameters {
    pub fn resolve(
        overrides: &CastOverrides,
        caster: &dyn Caster,
        mode: Mode,
        spell: &Spell,
    ) -> Self {
        let range_level = SpellConfig::clamp_school_level(
            overrides
                .range_level()
                .unwrap_or_else(|| caster.spell_school_level(mode, spell)),
        );
        let effect_level = SpellConfig::clamp_school_level(
            overrides
                .effect_level()
                .unwrap_or_else(|| caster.effect_level(mode, spell)),
        );
        let effect_power = overrides
            .effect_power
            .unwrap_or_else(|| caster.effect_power(mode, spell))
            .max(0);
        let effect_duration = overrides
            .effect_duration
            .unwrap_or_else(|| caster.enchant_power(mode, spell))
            .max(0);
        let effect_value = match overrides.effect_value {
            Some(value) => value,
            None => match caster.effect_value(mode, spell) {
                0 => spell.calculate_raw_effect_value(effect_level, effect_power, 1),
                value => value,
            },
        }
        .max(0);

        Self {
            range_level,
            effect_level,
            effect_power,
            effect_duration,
            effect_value,
        }
    }
}

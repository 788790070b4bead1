//! Spell definitions: identity, schools, per-level tables and targeting data.

use std::sync::OnceLock;

use crate::cast::{BattleCast, Mode};
use crate::caster::Caster;
use crate::config::SpellConfig;
use crate::effects::EffectConfig;
use crate::mechanics::{Mechanics, MechanicsFactory, TargetConditionConfig};
use crate::state::{BattleInfo, TraitKind, Unit, UnitTrait};

use super::{SchoolSet, SpellBonus, SpellId};

/// Whether a spell helps or harms the units it lands on.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Positiveness {
    Negative,
    #[default]
    Neutral,
    Positive,
}

/// What a spell is aimed at.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AimType {
    #[default]
    NoTarget,
    Location,
    Creature,
    /// Placed on the battlefield; aimed like a location.
    Obstacle,
}

/// Area covered around the aim point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellRange {
    /// Only the aimed unit or hex.
    #[default]
    Single,
    /// Every hex within the given distance of the aim point.
    Radius(u8),
    /// Every valid unit on the battlefield; needs no aim.
    Massive,
}

/// One row of a spell's per-level table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelInfo {
    pub cost: i32,
    pub power: i32,
    pub range: SpellRange,
    /// Auto-selects friendly or hostile units according to positiveness.
    pub smart: bool,
    /// Legacy replacing bonus set.
    pub effects: Vec<SpellBonus>,
    /// Legacy stacking bonus set.
    pub cumulative_effects: Vec<SpellBonus>,
    /// Authored effect pipeline; overrides the legacy tables when present.
    pub battle_effects: Option<Vec<EffectConfig>>,
}

impl LevelInfo {
    pub fn new(cost: i32, power: i32) -> Self {
        Self {
            cost,
            power,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, range: SpellRange) -> Self {
        self.range = range;
        self
    }

    pub fn smart(mut self) -> Self {
        self.smart = true;
        self
    }

    pub fn with_effects(mut self, bonuses: impl IntoIterator<Item = SpellBonus>) -> Self {
        self.effects.extend(bonuses);
        self
    }

    pub fn with_cumulative_effects(mut self, bonuses: impl IntoIterator<Item = SpellBonus>) -> Self {
        self.cumulative_effects.extend(bonuses);
        self
    }

    pub fn with_battle_effects(mut self, effects: Vec<EffectConfig>) -> Self {
        self.battle_effects = Some(effects);
        self
    }
}

/// Smart and massive flags for one range level and trigger mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetInfo {
    pub aim: AimType,
    pub smart: bool,
    pub massive: bool,
}

/// Immutable spell definition shared by every cast of the spell.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub id: SpellId,
    /// Stable text key, e.g. `magic_arrow`.
    pub identifier: String,
    pub name: String,
    pub level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub schools: SchoolSet,
    #[cfg_attr(feature = "serde", serde(default))]
    pub positiveness: Positiveness,
    #[cfg_attr(feature = "serde", serde(default))]
    pub aim: AimType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub offensive: bool,
    /// Base power multiplied by the caster's effect power.
    #[cfg_attr(feature = "serde", serde(default))]
    pub power: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub levels: [LevelInfo; SpellConfig::SPELL_SCHOOL_LEVELS],
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_condition: TargetConditionConfig,
    /// Adventure map spell; cannot be cast in battle.
    #[cfg_attr(feature = "serde", serde(default))]
    pub adventure: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    factory: OnceLock<MechanicsFactory>,
}

impl Spell {
    pub fn new(id: SpellId, identifier: impl Into<String>, name: impl Into<String>, level: i32) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            name: name.into(),
            level,
            schools: SchoolSet::empty(),
            positiveness: Positiveness::Neutral,
            aim: AimType::NoTarget,
            offensive: false,
            power: 0,
            levels: Default::default(),
            target_condition: TargetConditionConfig::default(),
            adventure: false,
            factory: OnceLock::new(),
        }
    }

    pub fn with_schools(mut self, schools: SchoolSet) -> Self {
        self.schools = schools;
        self
    }

    pub fn with_positiveness(mut self, positiveness: Positiveness) -> Self {
        self.positiveness = positiveness;
        self
    }

    pub fn with_aim(mut self, aim: AimType) -> Self {
        self.aim = aim;
        self
    }

    pub fn offensive(mut self) -> Self {
        self.offensive = true;
        self
    }

    pub fn adventure(mut self) -> Self {
        self.adventure = true;
        self
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    /// Sets the same row for all four levels.
    pub fn with_all_levels(mut self, level: LevelInfo) -> Self {
        self.levels = std::array::from_fn(|_| level.clone());
        self
    }

    pub fn with_level(mut self, index: usize, level: LevelInfo) -> Self {
        if let Some(slot) = self.levels.get_mut(index) {
            *slot = level;
        }
        self
    }

    pub fn with_target_condition(mut self, condition: TargetConditionConfig) -> Self {
        self.target_condition = condition;
        self
    }

    pub fn is_negative(&self) -> bool {
        self.positiveness == Positiveness::Negative
    }

    pub fn is_positive(&self) -> bool {
        self.positiveness == Positiveness::Positive
    }

    /// Table row for a proficiency tier, clamped into range.
    pub fn level_info(&self, level: i32) -> &LevelInfo {
        &self.levels[SpellConfig::clamp_school_level(level) as usize]
    }

    /// Whether any level carries an authored effect pipeline.
    pub fn has_battle_effects(&self) -> bool {
        self.levels.iter().any(|level| level.battle_effects.is_some())
    }

    pub fn target_info(&self, range_level: i32, mode: Mode) -> TargetInfo {
        let level = self.level_info(range_level);
        let mut info = TargetInfo {
            aim: self.aim,
            smart: level.smart,
            massive: level.range == SpellRange::Massive,
        };
        match mode {
            Mode::CreatureAbility => info.smart = true,
            Mode::AfterAttack | Mode::SpellLikeAttack | Mode::MagicMirror => info.massive = false,
            Mode::Hero => {}
        }
        info
    }

    /// Immunity trait kinds granted against this spell's schools.
    pub fn elemental_immunities(&self) -> Vec<TraitKind> {
        self.schools
            .schools()
            .map(|school| school.immunity_trait())
            .collect()
    }

    /// `base_power_multiplier * power + level_power_multiplier * level power`.
    pub fn calculate_raw_effect_value(
        &self,
        effect_level: i32,
        base_power_multiplier: i32,
        level_power_multiplier: i32,
    ) -> i64 {
        i64::from(base_power_multiplier) * i64::from(self.power)
            + i64::from(level_power_multiplier) * i64::from(self.level_info(effect_level).power)
    }

    /// Applies the target's damage reductions, then the caster's spell bonus.
    pub fn adjust_raw_damage(&self, caster: &dyn Caster, target: Option<&Unit>, raw: i64) -> i64 {
        let mut value = raw;
        if let Some(unit) = target {
            let school_reduction = self.schools.schools().find_map(|school| {
                unit.traits.iter().find_map(|t| match t {
                    UnitTrait::SpellDamageReduction {
                        school: Some(s),
                        percent,
                    } if *s == school => Some(*percent),
                    _ => None,
                })
            });
            if let Some(percent) = school_reduction {
                value = value * i64::from(100 - percent.clamp(0, 100)) / 100;
            }
            let general: i32 = unit
                .traits
                .iter()
                .map(|t| match t {
                    UnitTrait::SpellDamageReduction {
                        school: None,
                        percent,
                    } => *percent,
                    _ => 0,
                })
                .sum();
            if general > 0 {
                value = value * i64::from(100 - general.clamp(0, 100)) / 100;
            }
        }
        caster.spell_bonus(self, value, target)
    }

    /// Cached factory, built on first request.
    pub fn factory(&self) -> &MechanicsFactory {
        self.factory.get_or_init(|| MechanicsFactory::get(self))
    }

    /// Fresh behavior bound to one cast event.
    pub fn battle_mechanics<'a>(
        &'a self,
        cast: &BattleCast<'a>,
        battle: &dyn BattleInfo,
    ) -> Mechanics<'a> {
        self.factory().create(cast, battle)
    }
}

//! Compiled predicate deciding whether a unit can be affected by a spell.
//!
//! A condition has three item lists:
//! - **absolute**: every item must accept, nothing overrides them
//! - **negation**: any accepting item makes the unit receptive regardless of `normal`
//! - **normal**: otherwise every item must accept
//!
//! Configured items come from the spell definition. Immunity checks driven by
//! unit traits are appended to every condition at compile time.

use crate::spell::{ConfigError, Spell};
use crate::state::{TraitKind, Unit, UnitFlags, UnitTrait};

use super::Mechanics;

/// What a configured item checks on the unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConditionCheck {
    HasTrait(TraitKind),
    /// Unit has all of the given flags.
    HasFlag(UnitFlags),
    Creature(String),
}

/// Configured condition item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionItemConfig {
    pub check: ConditionCheck,
    /// Accept units that fail the check instead.
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
}

impl ConditionItemConfig {
    pub fn new(check: ConditionCheck) -> Self {
        Self {
            check,
            inverted: false,
        }
    }

    /// Item accepting only units without `flags`.
    pub fn without_flag(flags: UnitFlags) -> Self {
        Self {
            check: ConditionCheck::HasFlag(flags),
            inverted: true,
        }
    }
}

/// Target condition as written in spell data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TargetConditionConfig {
    pub absolute: Vec<ConditionItemConfig>,
    pub normal: Vec<ConditionItemConfig>,
    pub negation: Vec<ConditionItemConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum ConditionItem {
    Configured(ConditionItemConfig),
    /// Absolute level immunity.
    AbsoluteLevel,
    /// Immunity to this particular spell.
    SpellImmunity,
    /// Non-absolute level immunity.
    NormalLevel,
    /// Immunity to one of the spell's schools.
    Elemental,
    /// Friendly spells land on receptive units.
    ReceptiveFeature,
    /// Unit has lost all natural immunities.
    ImmunityNegation,
}

impl ConditionItem {
    fn accepts(&self, m: &Mechanics<'_>, unit: &Unit) -> bool {
        let spell = m.spell();
        match self {
            Self::Configured(item) => {
                let hit = match &item.check {
                    ConditionCheck::HasTrait(kind) => unit.has_trait(*kind),
                    ConditionCheck::HasFlag(flags) => unit.has_flags(*flags),
                    ConditionCheck::Creature(name) => unit.creature == *name,
                };
                hit != item.inverted
            }
            Self::AbsoluteLevel => !unit.traits.iter().any(|t| {
                matches!(t, UnitTrait::LevelSpellImmunity { level, absolute: true } if *level >= spell.level)
            }),
            Self::NormalLevel => !unit.traits.iter().any(|t| {
                matches!(t, UnitTrait::LevelSpellImmunity { level, absolute: false } if *level >= spell.level)
            }),
            Self::SpellImmunity => !unit
                .traits
                .iter()
                .any(|t| matches!(t, UnitTrait::SpellImmunity { spell: id } if *id == spell.id)),
            Self::Elemental => !unit.traits.iter().any(|t| match t {
                UnitTrait::ElementalImmunity {
                    school,
                    negative_only,
                } => spell.schools.contains(school.flag()) && (!negative_only || spell.is_negative()),
                _ => false,
            }),
            Self::ReceptiveFeature => spell.is_positive() && unit.has_trait(TraitKind::Receptive),
            Self::ImmunityNegation => unit.has_trait(TraitKind::NegateAllNaturalImmunities),
        }
    }
}

/// Compiled, immutable condition shared by every cast of one spell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetCondition {
    absolute: Vec<ConditionItem>,
    normal: Vec<ConditionItem>,
    negation: Vec<ConditionItem>,
}

impl TargetCondition {
    pub fn compile(spell: &Spell) -> Result<Self, ConfigError> {
        let config = &spell.target_condition;
        let configured = |items: &[ConditionItemConfig]| -> Result<Vec<ConditionItem>, ConfigError> {
            items
                .iter()
                .map(|item| match &item.check {
                    ConditionCheck::HasFlag(flags) if flags.is_empty() => {
                        Err(ConfigError::EmptyConditionItem { spell: spell.id })
                    }
                    ConditionCheck::Creature(name) if name.is_empty() => {
                        Err(ConfigError::EmptyConditionItem { spell: spell.id })
                    }
                    _ => Ok(ConditionItem::Configured(item.clone())),
                })
                .collect()
        };

        let mut absolute = configured(&config.absolute)?;
        let mut normal = configured(&config.normal)?;
        let mut negation = configured(&config.negation)?;

        absolute.push(ConditionItem::AbsoluteLevel);
        normal.extend([
            ConditionItem::SpellImmunity,
            ConditionItem::NormalLevel,
            ConditionItem::Elemental,
        ]);
        negation.extend([
            ConditionItem::ReceptiveFeature,
            ConditionItem::ImmunityNegation,
        ]);

        Ok(Self {
            absolute,
            normal,
            negation,
        })
    }

    pub fn is_receptive(&self, m: &Mechanics<'_>, unit: &Unit) -> bool {
        if !self.absolute.iter().all(|item| item.accepts(m, unit)) {
            return false;
        }
        if self.negation.iter().any(|item| item.accepts(m, unit)) {
            return true;
        }
        self.normal.iter().all(|item| item.accepts(m, unit))
    }
}

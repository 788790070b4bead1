//! Spell catalog with load-time validation.

use std::collections::HashMap;

use crate::effects::Effects;
use crate::error::{EngineError, ErrorSeverity};
use crate::mechanics::{MechanicsFactory, TargetCondition};

use super::{Spell, SpellId};

/// Malformed spell configuration detected while building the catalog.
///
/// The offending entry is rejected as a whole.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{spell}: duplicate effect name `{name}` at level {level}")]
    DuplicateEffect {
        spell: SpellId,
        level: usize,
        name: String,
    },

    #[error("{spell}: timed effect `{name}` at level {level} grants no bonuses")]
    EmptyTimedBonus {
        spell: SpellId,
        level: usize,
        name: String,
    },

    #[error("{spell}: catapult effect `{name}` at level {level} has no shots")]
    NoCatapultShots {
        spell: SpellId,
        level: usize,
        name: String,
    },

    #[error("{spell}: target condition item checks nothing")]
    EmptyConditionItem { spell: SpellId },

    #[error("spell id {0} already registered")]
    DuplicateSpell(SpellId),

    #[error("spell identifier `{0}` already registered")]
    DuplicateIdentifier(String),
}

impl ConfigError {
    pub fn spell(&self) -> Option<SpellId> {
        match self {
            Self::DuplicateEffect { spell, .. }
            | Self::EmptyTimedBonus { spell, .. }
            | Self::NoCatapultShots { spell, .. }
            | Self::EmptyConditionItem { spell } => Some(*spell),
            Self::DuplicateSpell(id) => Some(*id),
            Self::DuplicateIdentifier(_) => None,
        }
    }
}

impl EngineError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateEffect { .. } => "CONFIG_DUPLICATE_EFFECT",
            Self::EmptyTimedBonus { .. } => "CONFIG_EMPTY_TIMED_BONUS",
            Self::NoCatapultShots { .. } => "CONFIG_NO_CATAPULT_SHOTS",
            Self::EmptyConditionItem { .. } => "CONFIG_EMPTY_CONDITION_ITEM",
            Self::DuplicateSpell(_) => "CONFIG_DUPLICATE_SPELL",
            Self::DuplicateIdentifier(_) => "CONFIG_DUPLICATE_IDENTIFIER",
        }
    }
}

/// Compiles everything a factory will need, without caching it.
pub fn validate(spell: &Spell) -> Result<(), ConfigError> {
    TargetCondition::compile(spell)?;
    if spell.has_battle_effects() {
        Effects::configured(spell)?;
    }
    Ok(())
}

/// Every spell known to the game, addressable by id or identifier.
#[derive(Clone, Debug, Default)]
pub struct SpellCatalog {
    spells: Vec<Spell>,
    by_id: HashMap<SpellId, usize>,
    by_identifier: HashMap<String, usize>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a spell.
    pub fn insert(&mut self, spell: Spell) -> Result<(), ConfigError> {
        if self.by_id.contains_key(&spell.id) {
            return Err(ConfigError::DuplicateSpell(spell.id));
        }
        if self.by_identifier.contains_key(&spell.identifier) {
            return Err(ConfigError::DuplicateIdentifier(spell.identifier));
        }
        validate(&spell)?;

        let index = self.spells.len();
        self.by_id.insert(spell.id, index);
        self.by_identifier.insert(spell.identifier.clone(), index);
        self.spells.push(spell);
        Ok(())
    }

    pub fn get(&self, id: SpellId) -> Option<&Spell> {
        self.by_id.get(&id).map(|&index| &self.spells[index])
    }

    pub fn by_identifier(&self, identifier: &str) -> Option<&Spell> {
        self.by_identifier
            .get(identifier)
            .map(|&index| &self.spells[index])
    }

    /// Cached mechanics factory of a registered spell.
    pub fn factory(&self, id: SpellId) -> Option<&MechanicsFactory> {
        self.get(id).map(Spell::factory)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{EffectConfig, EffectKind, TimedEffect};
    use crate::spell::LevelInfo;

    #[test]
    fn rejects_duplicate_ids() {
        let mut catalog = SpellCatalog::new();
        catalog
            .insert(Spell::new(SpellId::BLESS, "bless", "Bless", 1))
            .unwrap();
        let err = catalog
            .insert(Spell::new(SpellId::BLESS, "bless2", "Bless", 1))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateSpell(SpellId::BLESS));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rejects_entry_with_malformed_pipeline() {
        let mut catalog = SpellCatalog::new();
        let spell = Spell::new(SpellId::SLOW, "slow", "Slow", 1).with_all_levels(
            LevelInfo::new(6, 0).with_battle_effects(vec![EffectConfig::new(
                "timed",
                EffectKind::Timed(TimedEffect::new(Vec::new(), false)),
            )]),
        );
        let err = catalog.insert(spell).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyTimedBonus { level: 0, .. }));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(catalog.get(SpellId::SLOW).is_none());
    }

    #[test]
    fn lookup_by_identifier() {
        let mut catalog = SpellCatalog::new();
        catalog
            .insert(Spell::new(SpellId::AGE, "age", "Age", 3))
            .unwrap();
        assert_eq!(catalog.by_identifier("age").map(|s| s.id), Some(SpellId::AGE));
        assert!(catalog.by_identifier("youth").is_none());
    }
}

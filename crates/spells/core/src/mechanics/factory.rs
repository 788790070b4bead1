//! Maps a spell definition to the behavior its casts run.
//!
//! Selection order: a spell with configured battle effects always runs the
//! generic effect pipeline. Otherwise a handful of well-known ids get their
//! dedicated behavior, and everything else gets effects synthesized from the
//! legacy level tables.

use std::sync::Arc;

use crate::cast::BattleCast;
use crate::effects::Effects;
use crate::spell::{ConfigError, Spell, SpellId};
use crate::state::BattleInfo;

use super::{DimensionSpell, Mechanics, MinefieldSpell, ObstacleSpell, TargetCondition};

/// Behavior selected for a spell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Effects declared in the spell's battle effect tables.
    Configured(Arc<Effects>),
    /// Effects synthesized from the legacy level tables.
    Fallback(Arc<Effects>),
    Obstacle(ObstacleSpell),
    Minefield(MinefieldSpell),
    Dimension(DimensionSpell),
}

impl Behavior {
    pub fn effects(&self) -> Option<&Effects> {
        match self {
            Self::Configured(effects) | Self::Fallback(effects) => Some(effects.as_ref()),
            _ => None,
        }
    }

    fn special(id: SpellId) -> Option<Self> {
        Some(match id {
            SpellId::FIRE_WALL => Self::Obstacle(ObstacleSpell::FireWall),
            SpellId::FORCE_FIELD => Self::Obstacle(ObstacleSpell::ForceField),
            SpellId::LAND_MINE => Self::Minefield(MinefieldSpell::LandMine),
            SpellId::QUICKSAND => Self::Minefield(MinefieldSpell::Quicksand),
            SpellId::TELEPORT => Self::Dimension(DimensionSpell::Teleport),
            _ => return None,
        })
    }
}

/// Per-spell factory, built once and cached on the spell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MechanicsFactory {
    behavior: Behavior,
    condition: Arc<TargetCondition>,
}

impl MechanicsFactory {
    pub fn build(spell: &Spell) -> Result<Self, ConfigError> {
        let condition = Arc::new(TargetCondition::compile(spell)?);
        let behavior = if spell.has_battle_effects() {
            Behavior::Configured(Arc::new(Effects::configured(spell)?))
        } else if let Some(special) = Behavior::special(spell.id) {
            special
        } else {
            Behavior::Fallback(Arc::new(Effects::fallback(spell)))
        };
        tracing::trace!(spell = %spell.id, ?behavior, "mechanics factory built");
        Ok(Self {
            behavior,
            condition,
        })
    }

    /// Factory for `spell`; a broken definition yields an inert factory whose
    /// casts are never applicable.
    pub fn get(spell: &Spell) -> Self {
        Self::build(spell).unwrap_or_else(|err| {
            tracing::error!(spell = %spell.id, error = %err, "invalid spell definition");
            Self {
                behavior: Behavior::Fallback(Arc::new(Effects::new())),
                condition: Arc::new(TargetCondition::default()),
            }
        })
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn create<'a>(&self, cast: &BattleCast<'a>, battle: &dyn BattleInfo) -> Mechanics<'a> {
        Mechanics::new(
            cast,
            battle,
            self.behavior.clone(),
            Arc::clone(&self.condition),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{DamageEffect, EffectConfig, EffectKind};
    use crate::spell::LevelInfo;

    #[test]
    fn well_known_ids_get_dedicated_behavior() {
        let wall = Spell::new(SpellId::FIRE_WALL, "fire_wall", "Fire Wall", 2);
        assert_eq!(
            MechanicsFactory::get(&wall).behavior(),
            &Behavior::Obstacle(ObstacleSpell::FireWall)
        );
        let teleport = Spell::new(SpellId::TELEPORT, "teleport", "Teleport", 3);
        assert_eq!(
            MechanicsFactory::get(&teleport).behavior(),
            &Behavior::Dimension(DimensionSpell::Teleport)
        );
    }

    #[test]
    fn configured_effects_win_over_special_ids() {
        let wall = Spell::new(SpellId::FIRE_WALL, "fire_wall", "Fire Wall", 2).with_all_levels(
            LevelInfo::new(10, 10).with_battle_effects(vec![EffectConfig::new(
                "burn",
                EffectKind::Damage(DamageEffect::default()),
            )]),
        );
        assert!(matches!(
            MechanicsFactory::get(&wall).behavior(),
            Behavior::Configured(_)
        ));
    }

    #[test]
    fn broken_definition_yields_inert_factory() {
        let broken = Spell::new(SpellId::MAGIC_ARROW, "magic_arrow", "Magic Arrow", 1)
            .offensive()
            .with_all_levels(LevelInfo::new(5, 10).with_battle_effects(vec![
                EffectConfig::new("hit", EffectKind::Damage(DamageEffect::default())),
                EffectConfig::new("hit", EffectKind::Damage(DamageEffect::default())),
            ]));
        assert!(MechanicsFactory::build(&broken).is_err());
        let factory = MechanicsFactory::get(&broken);
        assert!(factory.behavior().effects().is_some_and(Effects::is_empty));
    }
}

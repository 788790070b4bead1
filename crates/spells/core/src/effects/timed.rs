//! Timed status effect carrying a set of bonuses.

use crate::cast::Target;
use crate::mechanics::Mechanics;
use crate::spell::SpellBonus;
use crate::state::{ActiveSpell, BattleInfo, BattleMutation, UnitId};

use super::targeting::{affected_units, target_units};

/// Grant bonuses for the resolved duration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEffect {
    pub bonuses: Vec<SpellBonus>,
    /// Stacks onto an existing instance instead of replacing it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cumulative: bool,
}

impl TimedEffect {
    pub fn new(bonuses: Vec<SpellBonus>, cumulative: bool) -> Self {
        Self {
            bonuses,
            cumulative,
        }
    }

    pub fn applicable(&self, m: &Mechanics<'_>, battle: &dyn BattleInfo) -> bool {
        m.has_receptive_unit(battle)
    }

    pub fn transform_target(
        &self,
        m: &Mechanics<'_>,
        battle: &dyn BattleInfo,
        aim: &Target,
    ) -> Target {
        affected_units(m, battle, aim)
    }

    pub fn apply(
        &self,
        battle: &mut dyn BattleMutation,
        m: &Mechanics<'_>,
        target: &Target,
    ) -> Vec<UnitId> {
        let turns = m.effect_duration().max(0) as u32;
        let mut affected = Vec::new();
        for id in target_units(target) {
            let spell = ActiveSpell {
                spell: m.spell_id(),
                bonuses: self.bonuses.clone(),
                turns_remaining: turns,
            };
            match battle.add_active_spell(id, spell, self.cumulative) {
                Ok(()) => affected.push(id),
                Err(err) => tracing::warn!(unit = %id, error = %err, "timed effect skipped"),
            }
        }
        affected
    }
}

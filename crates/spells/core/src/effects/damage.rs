//! Direct damage effect.

use crate::cast::Target;
use crate::mechanics::Mechanics;
use crate::state::{BattleInfo, BattleMutation, Unit, UnitId};

use super::targeting::{affected_units, target_units};

/// Deal the resolved magnitude as damage to every affected unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageEffect {
    /// Magnitude is the percentage of creatures killed.
    pub kill_by_percentage: bool,
    /// Magnitude is the number of creatures killed.
    pub kill_by_count: bool,
}

impl DamageEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kill_by_percentage(mut self) -> Self {
        self.kill_by_percentage = true;
        self
    }

    pub fn kill_by_count(mut self) -> Self {
        self.kill_by_count = true;
        self
    }

    /// Damage this effect deals to `unit`.
    pub fn damage_for(&self, m: &Mechanics<'_>, unit: &Unit) -> i64 {
        let health = i64::from(unit.unit_health);
        if self.kill_by_percentage {
            i64::from(unit.count) * m.effect_value() / 100 * health
        } else if self.kill_by_count {
            m.effect_value() * health
        } else {
            m.apply_specific_spell_bonus(m.adjust_effect_value(Some(unit)))
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
        let mut affected = Vec::new();
        for id in target_units(target) {
            let Some(unit) = battle.unit(id) else {
                continue;
            };
            let amount = self.damage_for(m, unit);
            match battle.apply_damage(id, amount) {
                Ok(result) => {
                    tracing::debug!(
                        spell = %m.spell_id(),
                        unit = %id,
                        damage = result.damage_dealt,
                        killed = result.killed,
                        "spell damage"
                    );
                    affected.push(id);
                }
                Err(err) => tracing::warn!(unit = %id, error = %err, "damage skipped"),
            }
        }
        affected
    }
}

//! Spells moving units through space.

use crate::cast::{Destination, Target};
use crate::env::SpellCastEnvironment;
use crate::mechanics::{CastProblem, Mechanics};
use crate::spell::AimType;
use crate::state::{BattleHex, BattleInfo, Unit, UnitFlags, UnitId};

/// Two-destination spells: first a unit, then where it goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DimensionSpell {
    Teleport,
}

impl DimensionSpell {
    pub const TARGET_TYPES: [AimType; 2] = [AimType::Creature, AimType::Location];

    /// Friendly unit that may be teleported.
    fn movable(m: &Mechanics<'_>, unit: &Unit) -> bool {
        unit.owner == m.caster().owner()
            && unit.is_valid_target(false)
            && !unit.has_flags(UnitFlags::SIEGE_WEAPON)
            && m.is_receptive(unit)
    }

    pub fn has_movable_unit(self, m: &Mechanics<'_>, battle: &dyn BattleInfo) -> bool {
        battle.units().iter().any(|unit| Self::movable(m, unit))
    }

    pub fn destinations(
        self,
        m: &Mechanics<'_>,
        battle: &dyn BattleInfo,
        index: usize,
        current: &Target,
    ) -> Vec<Destination> {
        match index {
            0 => battle
                .units()
                .iter()
                .filter(|unit| Self::movable(m, unit))
                .map(Destination::unit)
                .collect(),
            1 => {
                let Some(unit) = current
                    .first()
                    .and_then(Destination::unit_id)
                    .and_then(|id| battle.unit(id))
                else {
                    return Vec::new();
                };
                BattleHex::all()
                    .filter(|hex| *hex != unit.position && battle.is_free_hex(*hex))
                    .map(Destination::Location)
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn check_target(
        self,
        m: &Mechanics<'_>,
        battle: &dyn BattleInfo,
        target: &Target,
    ) -> CastProblem {
        let [Destination::Unit(id, _), Destination::Location(hex)] = target.as_slice() else {
            return CastProblem::WrongSpellTarget;
        };
        let Some(unit) = battle.unit(*id) else {
            return CastProblem::WrongSpellTarget;
        };
        if !Self::movable(m, unit) {
            return if m.is_receptive(unit) {
                CastProblem::WrongSpellTarget
            } else {
                CastProblem::StackImmuneToSpell
            };
        }
        if *hex == unit.position || !battle.is_free_hex(*hex) {
            return CastProblem::NoAppropriateTarget;
        }
        CastProblem::Ok
    }

    pub fn apply(
        self,
        m: &Mechanics<'_>,
        env: &mut dyn SpellCastEnvironment,
        target: &Target,
    ) -> Vec<UnitId> {
        let [Destination::Unit(id, _), Destination::Location(hex)] = target.as_slice() else {
            tracing::warn!(spell = %m.spell_id(), "teleport needs a unit and a destination hex");
            return Vec::new();
        };
        match env.battle_mut().move_unit(*id, *hex) {
            Ok(()) => {
                tracing::debug!(unit = %id, hex = %hex, "teleported");
                vec![*id]
            }
            Err(err) => {
                tracing::warn!(unit = %id, error = %err, "teleport failed");
                Vec::new()
            }
        }
    }
}

//! Unit collection shared by unit-affecting effects.

use crate::cast::{Destination, Target};
use crate::mechanics::Mechanics;
use crate::spell::SpellRange;
use crate::state::{BattleHex, BattleInfo, Unit, UnitId};

/// Units a unit effect lands on for the given aim, in aim order and without
/// duplicates. Only valid, receptive units are kept.
pub(crate) fn affected_units(m: &Mechanics<'_>, battle: &dyn BattleInfo, aim: &Target) -> Target {
    let mut picked: Vec<&Unit> = Vec::new();

    if m.is_massive() {
        for unit in battle.units() {
            if !m.is_smart() || m.owner_matches(battle, unit) {
                push(unit, &mut picked);
            }
        }
    } else {
        let range = m.spell().level_info(m.range_level()).range;
        for destination in aim {
            match (range, destination) {
                (_, Destination::NoTarget) => {}
                (SpellRange::Radius(radius), dest) => {
                    let center = dest.hex();
                    for unit in units_around(battle, center, radius) {
                        if !m.is_smart() || m.owner_matches(battle, unit) {
                            push(unit, &mut picked);
                        }
                    }
                }
                (_, Destination::Unit(id, _)) => match battle.unit(*id) {
                    Some(unit) => push(unit, &mut picked),
                    None => tracing::warn!(unit = %id, "aimed unit is not in battle"),
                },
                (_, Destination::Location(hex)) => {
                    if let Some(unit) = battle.unit_at(*hex) {
                        push(unit, &mut picked);
                    }
                }
            }
        }
    }

    picked
        .into_iter()
        .filter(|unit| unit.is_valid_target(false) && m.is_receptive(unit))
        .map(Destination::unit)
        .collect()
}

fn push<'a>(unit: &'a Unit, picked: &mut Vec<&'a Unit>) {
    if !picked.iter().any(|u| u.id == unit.id) {
        picked.push(unit);
    }
}

fn units_around(battle: &dyn BattleInfo, center: BattleHex, radius: u8) -> Vec<&Unit> {
    if !center.is_valid() {
        return Vec::new();
    }
    battle
        .units()
        .iter()
        .filter(|unit| unit.position.is_valid() && unit.position.distance(center) <= u32::from(radius))
        .collect()
}

/// Unit ids of an effect target.
pub(crate) fn target_units(target: &Target) -> impl Iterator<Item = UnitId> + '_ {
    target.iter().filter_map(Destination::unit_id)
}

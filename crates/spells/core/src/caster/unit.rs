use crate::cast::Mode;
use crate::spell::Spell;
use crate::state::{PlayerId, Unit, UnitId, UnitTrait};

use super::Caster;

/// Snapshot of a battle unit acting as a caster.
///
/// Taken before the cast starts so the caster stays valid while effects mutate
/// the battle, including when the unit dies mid-cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitCaster {
    id: UnitId,
    owner: PlayerId,
    name: String,
    count: u32,
    traits: Vec<UnitTrait>,
}

impl UnitCaster {
    /// Rounds a creature spell lasts when the creature has no enchant power.
    const DEFAULT_ENCHANT_POWER: i32 = 3;

    pub fn new(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            owner: unit.owner,
            name: unit.creature.clone(),
            count: unit.count,
            traits: unit.traits.clone(),
        }
    }

    fn caster_level(&self, spell: &Spell) -> i32 {
        self.traits
            .iter()
            .filter_map(|t| match t {
                UnitTrait::Spellcaster { spell: id, level } if *id == spell.id => Some(*level),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl Caster for UnitCaster {
    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn caster_unit(&self) -> Option<UnitId> {
        Some(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn spell_school_level(&self, _mode: Mode, spell: &Spell) -> i32 {
        self.caster_level(spell)
    }

    fn effect_level(&self, _mode: Mode, spell: &Spell) -> i32 {
        self.caster_level(spell)
    }

    fn effect_power(&self, _mode: Mode, _spell: &Spell) -> i32 {
        let percent: i64 = self
            .traits
            .iter()
            .map(|t| match t {
                UnitTrait::CreatureSpellPower { percent } => i64::from(*percent),
                _ => 0,
            })
            .sum();
        (percent * i64::from(self.count) / 100) as i32
    }

    fn enchant_power(&self, _mode: Mode, _spell: &Spell) -> i32 {
        let turns: i32 = self
            .traits
            .iter()
            .map(|t| match t {
                UnitTrait::CreatureEnchantPower { turns } => *turns,
                _ => 0,
            })
            .sum();
        if turns <= 0 {
            Self::DEFAULT_ENCHANT_POWER
        } else {
            turns
        }
    }

    fn effect_value(&self, _mode: Mode, spell: &Spell) -> i64 {
        let per_creature: i64 = self
            .traits
            .iter()
            .map(|t| match t {
                UnitTrait::SpecificSpellPower { spell: id, value } if *id == spell.id => {
                    i64::from(*value)
                }
                _ => 0,
            })
            .sum();
        per_creature * i64::from(self.count)
    }

    fn spell_bonus(&self, _spell: &Spell, value: i64, _target: Option<&Unit>) -> i64 {
        value
    }

    fn specific_spell_bonus(&self, _spell: &Spell, value: i64) -> i64 {
        value
    }
}

//! Battle units (creature stacks) and the traits that shape how spells treat them.

use bitflags::bitflags;

use crate::spell::{SpellBonus, SpellId, SpellSchool};

use super::BattleHex;

/// Identifier of a unit within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u32);

impl core::fmt::Display for UnitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Player colour owning units and casters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u8);

/// Battle side.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub const fn index(self) -> usize {
        match self {
            Self::Attacker => 0,
            Self::Defender => 1,
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Self::Attacker => Self::Defender,
            Self::Defender => Self::Attacker,
        }
    }
}

bitflags! {
    /// Static creature properties relevant to spell targeting.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitFlags: u16 {
        /// Ballista, catapult, first aid tent, ammo cart.
        const SIEGE_WEAPON = 1 << 0;
        const UNDEAD = 1 << 1;
        const NON_LIVING = 1 << 2;
        const FLYING = 1 << 3;
        const SHOOTER = 1 << 4;
        /// Removed from play but still referenced (e.g. dismissed clone).
        const GHOST = 1 << 5;
    }
}

/// Trait a unit carries, standing in for the external bonus system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitTrait {
    /// Percent chance to reflect a harmful single-target spell at the caster's army.
    MagicMirror { chance: i32 },
    SpellImmunity { spell: SpellId },
    /// Immune to spells up to and including `level`. Absolute immunity ignores negation.
    LevelSpellImmunity { level: i32, absolute: bool },
    /// Immune to a school; `negative_only` lets friendly spells of that school through.
    ElementalImmunity {
        school: SpellSchool,
        negative_only: bool,
    },
    /// Reduces spell damage from a school (or from every school when `school` is None).
    SpellDamageReduction {
        school: Option<SpellSchool>,
        percent: i32,
    },
    NegateAllNaturalImmunities,
    /// Friendly spells ignore this unit's natural immunities.
    Receptive,
    /// Spell power per 100 creatures in the stack.
    CreatureSpellPower { percent: i32 },
    /// Fixed per-creature magnitude for one spell.
    SpecificSpellPower { spell: SpellId, value: i32 },
    /// Duration of spells cast by this creature.
    CreatureEnchantPower { turns: i32 },
    /// Casts `spell` at the given school level.
    Spellcaster { spell: SpellId, level: i32 },
}

/// Discriminant of [`UnitTrait`], with school immunities split per school.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TraitKind {
    MagicMirror,
    SpellImmunity,
    LevelSpellImmunity,
    AirImmunity,
    FireImmunity,
    WaterImmunity,
    EarthImmunity,
    SpellDamageReduction,
    NegateAllNaturalImmunities,
    Receptive,
    CreatureSpellPower,
    SpecificSpellPower,
    CreatureEnchantPower,
    Spellcaster,
}

impl UnitTrait {
    pub fn kind(&self) -> TraitKind {
        match self {
            Self::MagicMirror { .. } => TraitKind::MagicMirror,
            Self::SpellImmunity { .. } => TraitKind::SpellImmunity,
            Self::LevelSpellImmunity { .. } => TraitKind::LevelSpellImmunity,
            Self::ElementalImmunity { school, .. } => school.immunity_trait(),
            Self::SpellDamageReduction { .. } => TraitKind::SpellDamageReduction,
            Self::NegateAllNaturalImmunities => TraitKind::NegateAllNaturalImmunities,
            Self::Receptive => TraitKind::Receptive,
            Self::CreatureSpellPower { .. } => TraitKind::CreatureSpellPower,
            Self::SpecificSpellPower { .. } => TraitKind::SpecificSpellPower,
            Self::CreatureEnchantPower { .. } => TraitKind::CreatureEnchantPower,
            Self::Spellcaster { .. } => TraitKind::Spellcaster,
        }
    }
}

/// Timed spell currently affecting a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSpell {
    pub spell: SpellId,
    pub bonuses: Vec<SpellBonus>,
    pub turns_remaining: u32,
}

/// A creature stack on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerId,
    pub side: Side,
    pub position: BattleHex,
    pub creature: String,
    pub count: u32,
    /// Maximum health of one creature.
    pub unit_health: u32,
    /// Remaining health of the top creature.
    pub first_hp_left: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: UnitFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<UnitTrait>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub active_spells: Vec<ActiveSpell>,
}

impl Unit {
    pub fn new(
        id: UnitId,
        owner: PlayerId,
        side: Side,
        position: BattleHex,
        creature: impl Into<String>,
        count: u32,
        unit_health: u32,
    ) -> Self {
        Self {
            id,
            owner,
            side,
            position,
            creature: creature.into(),
            count,
            unit_health,
            first_hp_left: unit_health,
            flags: UnitFlags::empty(),
            traits: Vec::new(),
            active_spells: Vec::new(),
        }
    }

    /// Builder: add static flags.
    pub fn with_flags(mut self, flags: UnitFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Builder: add a trait.
    pub fn with_trait(mut self, unit_trait: UnitTrait) -> Self {
        self.traits.push(unit_trait);
        self
    }

    pub fn alive(&self) -> bool {
        self.count > 0
    }

    pub fn total_health(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        u64::from(self.count - 1) * u64::from(self.unit_health) + u64::from(self.first_hp_left)
    }

    /// Whether spells and attacks may aim at this unit at all.
    pub fn is_valid_target(&self, allow_dead: bool) -> bool {
        (self.alive() || allow_dead) && self.position.is_valid() && !self.flags.contains(UnitFlags::GHOST)
    }

    pub fn has_trait(&self, kind: TraitKind) -> bool {
        self.traits.iter().any(|t| t.kind() == kind)
    }

    pub fn has_flags(&self, flags: UnitFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Summed reflection chance from every magic mirror trait, capped at 100.
    pub fn magic_mirror_chance(&self) -> i32 {
        self.traits
            .iter()
            .map(|t| match t {
                UnitTrait::MagicMirror { chance } => *chance,
                _ => 0,
            })
            .sum::<i32>()
            .min(100)
    }

    pub fn active_spell(&self, spell: SpellId) -> Option<&ActiveSpell> {
        self.active_spells.iter().find(|s| s.spell == spell)
    }

    /// Removes health from the stack, returning the number of creatures killed.
    pub fn take_damage(&mut self, amount: u64) -> u32 {
        let before = self.count;
        let remaining = self.total_health().saturating_sub(amount);
        if remaining == 0 {
            self.count = 0;
            self.first_hp_left = 0;
        } else {
            let unit_health = u64::from(self.unit_health.max(1));
            let full = (remaining - 1) / unit_health;
            self.count = (full + 1) as u32;
            self.first_hp_left = (remaining - full * unit_health) as u32;
        }
        before - self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(count: u32, health: u32) -> Unit {
        Unit::new(
            UnitId(1),
            PlayerId(0),
            Side::Attacker,
            BattleHex::from_xy(1, 1),
            "pikeman",
            count,
            health,
        )
    }

    #[test]
    fn damage_kills_whole_creatures_first_from_top() {
        let mut unit = stack(10, 10);
        let killed = unit.take_damage(25);
        assert_eq!(killed, 2);
        assert_eq!(unit.count, 8);
        assert_eq!(unit.first_hp_left, 5);
        assert_eq!(unit.total_health(), 75);
    }

    #[test]
    fn overkill_leaves_dead_stack() {
        let mut unit = stack(3, 10);
        assert_eq!(unit.take_damage(1000), 3);
        assert!(!unit.alive());
        assert!(!unit.is_valid_target(false));
        assert!(unit.is_valid_target(true));
    }

    #[test]
    fn mirror_chance_is_capped() {
        let unit = stack(1, 1)
            .with_trait(UnitTrait::MagicMirror { chance: 80 })
            .with_trait(UnitTrait::MagicMirror { chance: 50 });
        assert_eq!(unit.magic_mirror_chance(), 100);
    }

    #[test]
    fn elemental_immunity_reports_school_kind() {
        let t = UnitTrait::ElementalImmunity {
            school: SpellSchool::Fire,
            negative_only: false,
        };
        assert_eq!(t.kind(), TraitKind::FireImmunity);
    }
}

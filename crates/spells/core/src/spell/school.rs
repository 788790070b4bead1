//! Magic schools and their immunity traits.

use bitflags::bitflags;

use crate::state::TraitKind;

/// One of the four elemental magic schools.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SpellSchool {
    Air,
    Fire,
    Water,
    Earth,
}

impl SpellSchool {
    /// Trait kind that grants immunity against this school.
    pub const fn immunity_trait(self) -> TraitKind {
        match self {
            Self::Air => TraitKind::AirImmunity,
            Self::Fire => TraitKind::FireImmunity,
            Self::Water => TraitKind::WaterImmunity,
            Self::Earth => TraitKind::EarthImmunity,
        }
    }

    pub const fn flag(self) -> SchoolSet {
        match self {
            Self::Air => SchoolSet::AIR,
            Self::Fire => SchoolSet::FIRE,
            Self::Water => SchoolSet::WATER,
            Self::Earth => SchoolSet::EARTH,
        }
    }
}

bitflags! {
    /// Set of schools a spell belongs to.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SchoolSet: u8 {
        const AIR = 1 << 0;
        const FIRE = 1 << 1;
        const WATER = 1 << 2;
        const EARTH = 1 << 3;
    }
}

impl SchoolSet {
    /// Iterates over member schools in canonical order (air, fire, water, earth).
    pub fn schools(self) -> impl Iterator<Item = SpellSchool> {
        use strum::IntoEnumIterator;
        SpellSchool::iter().filter(move |school| self.contains(school.flag()))
    }
}

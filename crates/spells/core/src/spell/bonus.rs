//! Stat modifiers granted by timed spell effects.

/// Stat or behaviour a spell bonus modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BonusKind {
    Attack,
    Defence,
    Speed,
    /// Percentage change of the maximum health of each creature.
    StackHealth,
    /// Damage dealt is always maximal.
    AlwaysMaximumDamage,
    /// Unit cannot act while the bonus lasts.
    NotActive,
}

/// A single modifier carried by a timed spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellBonus {
    pub kind: BonusKind,
    pub value: i32,
}

impl SpellBonus {
    pub const fn new(kind: BonusKind, value: i32) -> Self {
        Self { kind, value }
    }
}

/// Context under which a cast was triggered.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum Mode {
    /// Deliberate cast by a hero, limited to one per side per round.
    #[default]
    Hero,
    /// Activated creature ability.
    CreatureAbility,
    /// Spell delivered as the attack itself.
    SpellLikeAttack,
    /// Reaction after a melee or ranged attack.
    AfterAttack,
    /// Re-cast produced by a reflecting unit. Never reflected again.
    MagicMirror,
}

impl Mode {
    pub const fn is_reflected(self) -> bool {
        matches!(self, Self::MagicMirror)
    }
}

/// Spell engine constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellConfig {
    /// Number of rounds a placed fire wall or force field stays on the battlefield.
    pub obstacle_turns: u32,

    /// Mines or quicksand patches placed per range level (none, basic, advanced, expert).
    pub minefield_sizes: [u32; SpellConfig::SPELL_SCHOOL_LEVELS],
}

impl SpellConfig {
    // ===== compile-time constants used as type parameters =====
    /// Spell school proficiency tiers (none, basic, advanced, expert).
    pub const SPELL_SCHOOL_LEVELS: usize = 4;
    /// Highest proficiency tier index.
    pub const MAX_SCHOOL_LEVEL: i32 = Self::SPELL_SCHOOL_LEVELS as i32 - 1;
    /// Destinations a spell may require before auto-targeting gives up.
    pub const MAX_AUTO_TARGET_SLOTS: usize = 2;
    /// Hexes covered by the largest placed obstacle (expert force field).
    pub const MAX_OBSTACLE_HEXES: usize = 3;
    pub const BATTLEFIELD_WIDTH: i16 = 17;
    pub const BATTLEFIELD_HEIGHT: i16 = 11;
    /// Exclusive upper bound used when rolling percentage chances.
    pub const PERCENT_ROLL: i64 = 100;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_OBSTACLE_TURNS: u32 = 2;
    pub const DEFAULT_MINEFIELD_SIZES: [u32; Self::SPELL_SCHOOL_LEVELS] = [4, 4, 6, 8];

    pub fn new() -> Self {
        Self {
            obstacle_turns: Self::DEFAULT_OBSTACLE_TURNS,
            minefield_sizes: Self::DEFAULT_MINEFIELD_SIZES,
        }
    }

    /// Clamps a proficiency tier into the valid `0..=3` range.
    pub fn clamp_school_level(level: i32) -> i32 {
        level.clamp(0, Self::MAX_SCHOOL_LEVEL)
    }

    pub fn minefield_size(&self, range_level: i32) -> u32 {
        self.minefield_sizes[Self::clamp_school_level(range_level) as usize]
    }
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric spell identity.
///
/// Identities are stable across catalog versions; dispatch to dedicated mechanics
/// relies on the named constants below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u16);

impl SpellId {
    // ===== adventure map =====
    pub const SUMMON_BOAT: Self = Self(0);
    pub const SCUTTLE_BOAT: Self = Self(1);
    pub const VISIONS: Self = Self(2);
    pub const VIEW_EARTH: Self = Self(3);
    pub const DISGUISE: Self = Self(4);
    pub const VIEW_AIR: Self = Self(5);
    pub const FLY: Self = Self(6);
    pub const WATER_WALK: Self = Self(7);
    pub const DIMENSION_DOOR: Self = Self(8);
    pub const TOWN_PORTAL: Self = Self(9);

    // ===== battle, dedicated mechanics =====
    pub const QUICKSAND: Self = Self(10);
    pub const LAND_MINE: Self = Self(11);
    pub const FORCE_FIELD: Self = Self(12);
    pub const FIRE_WALL: Self = Self(13);
    pub const TELEPORT: Self = Self(63);

    // ===== battle, effect pipelines =====
    pub const MAGIC_ARROW: Self = Self(15);
    pub const LIGHTNING_BOLT: Self = Self(17);
    pub const FIREBALL: Self = Self(21);
    pub const SLOW: Self = Self(54);
    pub const BLESS: Self = Self(41);
    pub const AGE: Self = Self(75);
}

impl core::fmt::Display for SpellId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "spell#{}", self.0)
    }
}

//! Spell-created battlefield obstacles and siege fortifications.

use arrayvec::ArrayVec;

use crate::config::SpellConfig;
use crate::spell::SpellId;

use super::{BattleHex, Side};

/// Hexes covered by one obstacle.
pub type ObstacleHexes = ArrayVec<BattleHex, { SpellConfig::MAX_OBSTACLE_HEXES }>;

/// Kind of spell-created obstacle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ObstacleKind {
    FireWall,
    ForceField,
    LandMine,
    Quicksand,
}

impl ObstacleKind {
    /// Whether units can neither stand on nor walk through the obstacle.
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::ForceField)
    }

    /// Whether the obstacle is hidden from the opposing side.
    pub const fn hidden(self) -> bool {
        matches!(self, Self::LandMine | Self::Quicksand)
    }
}

/// Request to place an obstacle; the battle assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleSpawn {
    pub kind: ObstacleKind,
    pub spell: SpellId,
    pub hexes: ObstacleHexes,
    pub caster_side: Side,
    /// Damage dealt to units entering or standing in the obstacle.
    pub damage: i64,
    /// Remaining rounds, or `None` for obstacles lasting until triggered.
    pub turns_remaining: Option<u32>,
}

/// Obstacle present on the battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub spell: SpellId,
    pub hexes: ObstacleHexes,
    pub caster_side: Side,
    pub damage: i64,
    pub turns_remaining: Option<u32>,
}

impl Obstacle {
    pub fn from_spawn(id: u32, spawn: ObstacleSpawn) -> Self {
        Self {
            id,
            kind: spawn.kind,
            spell: spawn.spell,
            hexes: spawn.hexes,
            caster_side: spawn.caster_side,
            damage: spawn.damage,
            turns_remaining: spawn.turns_remaining,
        }
    }

    pub fn covers(&self, hex: BattleHex) -> bool {
        self.hexes.contains(&hex)
    }

    /// Whether `side` can see this obstacle.
    pub fn visible_to(&self, side: Side) -> bool {
        !self.kind.hidden() || self.caster_side == side
    }
}

/// Destructible section of town fortifications during a siege.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallPart {
    pub hex: BattleHex,
    pub hp: u32,
}

impl WallPart {
    pub fn intact(&self) -> bool {
        self.hp > 0
    }
}

//! Battle model consumed by the cast pipeline.
//!
//! The pipeline reads through [`BattleInfo`] and writes through [`BattleMutation`];
//! [`BattleState`] is the in-memory implementation.
mod battle;
mod hex;
mod obstacle;
mod unit;

pub use battle::{
    BattleError, BattleInfo, BattleMutation, BattleState, BattlefieldKind, CastRecord,
    DamageResult,
};
pub use hex::BattleHex;
pub use obstacle::{Obstacle, ObstacleHexes, ObstacleKind, ObstacleSpawn, WallPart};
pub use unit::{ActiveSpell, PlayerId, Side, TraitKind, Unit, UnitFlags, UnitId, UnitTrait};

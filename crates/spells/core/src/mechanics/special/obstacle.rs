//! Wall-building spells: fire wall and force field.

use crate::cast::{Destination, Target};
use crate::env::SpellCastEnvironment;
use crate::mechanics::{CastProblem, Mechanics};
use crate::state::{BattleHex, BattleInfo, ObstacleHexes, ObstacleKind, ObstacleSpawn};

/// Builds a short wall extending rightwards from the aimed hex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ObstacleSpell {
    /// Burns units standing in or entering it.
    FireWall,
    /// Impassable; cannot be raised on top of units.
    ForceField,
}

impl ObstacleSpell {
    pub const fn kind(self) -> ObstacleKind {
        match self {
            Self::FireWall => ObstacleKind::FireWall,
            Self::ForceField => ObstacleKind::ForceField,
        }
    }

    /// Two hexes, three at expert level.
    pub const fn length(range_level: i32) -> usize {
        if range_level >= 3 { 3 } else { 2 }
    }

    fn hex_available(self, battle: &dyn BattleInfo, hex: BattleHex) -> bool {
        battle.obstacles_at(hex).is_empty()
            && (self == Self::FireWall || battle.unit_at(hex).is_none())
    }

    /// Hexes the wall would cover when aimed at `hex`, cut short at the
    /// battlefield edge, or `None` if any of them is taken.
    pub fn placement(
        self,
        battle: &dyn BattleInfo,
        hex: BattleHex,
        range_level: i32,
    ) -> Option<ObstacleHexes> {
        if !hex.is_valid() {
            return None;
        }
        let mut hexes = ObstacleHexes::new();
        let mut current = hex;
        while current.is_valid() && !hexes.is_full() && hexes.len() < Self::length(range_level) {
            if !self.hex_available(battle, current) {
                return None;
            }
            hexes.push(current);
            current = current.right();
        }
        Some(hexes)
    }

    pub fn any_placement(self, m: &Mechanics<'_>, battle: &dyn BattleInfo) -> bool {
        BattleHex::all().any(|hex| self.placement(battle, hex, m.range_level()).is_some())
    }

    pub fn check_target(
        self,
        m: &Mechanics<'_>,
        battle: &dyn BattleInfo,
        target: &Target,
    ) -> CastProblem {
        match target.as_slice() {
            [Destination::Location(hex)]
                if self.placement(battle, *hex, m.range_level()).is_some() =>
            {
                CastProblem::Ok
            }
            _ => CastProblem::NoAppropriateTarget,
        }
    }

    pub fn apply(self, m: &Mechanics<'_>, env: &mut dyn SpellCastEnvironment, target: &Target) {
        let Some(side) = m.caster_side() else {
            tracing::warn!(spell = %m.spell_id(), "obstacle caster has no battle side");
            return;
        };
        let turns = env.config().obstacle_turns;
        for destination in target {
            let Some(hexes) = self.placement(env.battle(), destination.hex(), m.range_level())
            else {
                tracing::warn!(hex = %destination.hex(), obstacle = %self, "obstacle placement blocked");
                continue;
            };
            let spawn = ObstacleSpawn {
                kind: self.kind(),
                spell: m.spell_id(),
                hexes,
                caster_side: side,
                damage: match self {
                    Self::FireWall => m.effect_value(),
                    Self::ForceField => 0,
                },
                turns_remaining: Some(turns),
            };
            match env.battle_mut().spawn_obstacle(spawn) {
                Ok(id) => tracing::debug!(obstacle = id, kind = %self, "obstacle placed"),
                Err(err) => tracing::warn!(error = %err, "obstacle not placed"),
            }
        }
    }
}

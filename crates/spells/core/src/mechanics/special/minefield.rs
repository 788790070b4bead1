//! Hidden trap spells: land mine and quicksand.

use crate::env::SpellCastEnvironment;
use crate::mechanics::Mechanics;
use crate::state::{BattleHex, BattleInfo, ObstacleHexes, ObstacleKind, ObstacleSpawn};

/// Scatters single-hex traps over random free hexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MinefieldSpell {
    LandMine,
    Quicksand,
}

impl MinefieldSpell {
    pub const fn kind(self) -> ObstacleKind {
        match self {
            Self::LandMine => ObstacleKind::LandMine,
            Self::Quicksand => ObstacleKind::Quicksand,
        }
    }

    pub fn free_hexes(battle: &dyn BattleInfo) -> Vec<BattleHex> {
        BattleHex::all().filter(|hex| battle.is_free_hex(*hex)).collect()
    }

    /// Places the traps; returns how many were placed.
    pub fn apply(self, m: &Mechanics<'_>, env: &mut dyn SpellCastEnvironment) -> usize {
        let Some(side) = m.caster_side() else {
            tracing::warn!(spell = %m.spell_id(), "minefield caster has no battle side");
            return 0;
        };
        let count = env.config().minefield_size(m.range_level()) as usize;
        let mut free = Self::free_hexes(env.battle());
        let (battle, rng) = env.battle_and_rng();

        let mut placed = 0;
        while placed < count && !free.is_empty() {
            let index = rng.next_int(0, free.len() as i64 - 1) as usize;
            let mut hexes = ObstacleHexes::new();
            hexes.push(free.swap_remove(index));
            let spawn = ObstacleSpawn {
                kind: self.kind(),
                spell: m.spell_id(),
                hexes,
                caster_side: side,
                damage: match self {
                    Self::LandMine => m.effect_value(),
                    Self::Quicksand => 0,
                },
                turns_remaining: None,
            };
            match battle.spawn_obstacle(spawn) {
                Ok(_) => placed += 1,
                Err(err) => tracing::warn!(error = %err, "trap not placed"),
            }
        }
        tracing::debug!(kind = %self, placed, "minefield");
        placed
    }
}

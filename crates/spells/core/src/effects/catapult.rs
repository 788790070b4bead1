//! Siege wall damage effect.

use crate::env::{RandomSource, random_item};
use crate::mechanics::Mechanics;
use crate::state::{BattleInfo, BattleMutation, Side};

/// Hit random intact wall parts. Only the attacking side can use it, and only
/// while some fortification still stands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatapultEffect {
    pub shots: u32,
    /// Wall hit points removed per hit.
    pub damage: u32,
}

impl CatapultEffect {
    pub fn new(shots: u32, damage: u32) -> Self {
        Self { shots, damage }
    }

    pub fn applicable(&self, m: &Mechanics<'_>, battle: &dyn BattleInfo) -> bool {
        m.caster_side() == Some(Side::Attacker) && battle.wall_parts().iter().any(|w| w.intact())
    }

    pub fn apply(
        &self,
        battle: &mut dyn BattleMutation,
        rng: &mut dyn RandomSource,
        m: &Mechanics<'_>,
    ) -> usize {
        let mut hits = 0;
        for _ in 0..self.shots {
            let intact: Vec<usize> = battle
                .wall_parts()
                .iter()
                .enumerate()
                .filter(|(_, w)| w.intact())
                .map(|(index, _)| index)
                .collect();
            let Some(&part) = random_item(&intact, rng) else {
                break;
            };
            match battle.damage_wall(part, self.damage) {
                Ok(()) => hits += 1,
                Err(err) => tracing::warn!(part, error = %err, "catapult shot skipped"),
            }
        }
        tracing::debug!(spell = %m.spell_id(), hits, "catapult");
        hits
    }
}

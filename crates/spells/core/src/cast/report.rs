use crate::spell::SpellId;
use crate::state::{BattleHex, UnitId};

use super::Mode;

/// What a cast did, including the casts it provoked by reflection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastReport {
    pub spell: SpellId,
    pub mode: Mode,
    pub affected: Vec<UnitId>,
    pub reflections: Vec<Reflection>,
    /// A reflected cast was reflected again and the second reflection dropped.
    pub reflection_refused: bool,
}

impl CastReport {
    pub fn new(spell: SpellId, mode: Mode) -> Self {
        Self {
            spell,
            mode,
            affected: Vec::new(),
            reflections: Vec::new(),
            reflection_refused: false,
        }
    }

    /// Units affected by this cast and every reflection below it.
    pub fn all_affected(&self) -> Vec<UnitId> {
        let mut all = self.affected.clone();
        for reflection in &self.reflections {
            for id in reflection.report.all_affected() {
                if !all.contains(&id) {
                    all.push(id);
                }
            }
        }
        all
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reflection {
    pub reflector: UnitId,
    /// Hex of the original caster's unit the spell was thrown back at.
    pub target: BattleHex,
    pub report: CastReport,
}

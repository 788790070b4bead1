use crate::state::{BattleHex, Unit, UnitId};

/// One resolved placement of a spell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Destination {
    /// No target; also the placeholder inserted when nothing was aimed at.
    #[default]
    NoTarget,
    Location(BattleHex),
    /// A unit and the hex it stood on when aimed at.
    Unit(UnitId, BattleHex),
}

impl Destination {
    pub fn unit(unit: &Unit) -> Self {
        Self::Unit(unit.id, unit.position)
    }

    pub fn hex(&self) -> BattleHex {
        match self {
            Self::NoTarget => BattleHex::INVALID,
            Self::Location(hex) | Self::Unit(_, hex) => *hex,
        }
    }

    pub fn unit_id(&self) -> Option<UnitId> {
        match self {
            Self::Unit(id, _) => Some(*id),
            _ => None,
        }
    }
}

/// Ordered destinations of one fully resolved placement.
pub type Target = Vec<Destination>;

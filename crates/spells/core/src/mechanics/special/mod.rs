//! Spells whose behavior the generic effect pipeline cannot express.
mod dimension;
mod minefield;
mod obstacle;

pub use dimension::DimensionSpell;
pub use minefield::MinefieldSpell;
pub use obstacle::ObstacleSpell;

//! Spell definitions and the catalog that owns them.
mod bonus;
mod catalog;
mod definition;
mod id;
mod school;

pub use bonus::{BonusKind, SpellBonus};
pub use catalog::{ConfigError, SpellCatalog, validate};
pub use definition::{AimType, LevelInfo, Positiveness, Spell, SpellRange, TargetInfo};
pub use id::SpellId;
pub use school::{SchoolSet, SpellSchool};

//! Content loaders for reading spell data from files.
//!
//! Every loader turns one RON/TOML file into the spells-core type it describes.

pub mod config;
pub mod factory;
pub mod scenario;
pub mod spells;
pub mod texts;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use scenario::{
    AimSpec, BattleScenario, CasterRef, HeroSpec, OverrideSpec, ScenarioLoader, ScriptedCast,
    UnitSpec, WallSpec,
};
pub use spells::{SpellCatalogFile, SpellLoader};
pub use texts::TextLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

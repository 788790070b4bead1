//! Content factory for loading spell content from a data directory.

use std::path::{Path, PathBuf};

use spells_core::{SpellCatalog, SpellConfig, TextTable};

use crate::loaders::{
    BattleScenario, ConfigLoader, LoadResult, ScenarioLoader, SpellLoader, TextLoader,
};

/// Content factory that loads all spell content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells.ron
/// ├── texts.toml
/// └── scenarios/
///     ├── mirror_duel.ron
///     └── siege.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Path to the directory containing data files
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine tunables from `config.toml`, falling back to defaults when absent.
    pub fn load_config(&self) -> LoadResult<SpellConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("No config.toml in {}; using defaults", self.data_dir.display());
            return Ok(SpellConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the spell catalog from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellCatalog> {
        let path = self.data_dir.join("spells.ron");
        SpellLoader::load(&path)
    }

    /// Load problem message templates from `texts.toml`.
    pub fn load_texts(&self) -> LoadResult<TextTable> {
        let path = self.data_dir.join("texts.toml");
        TextLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    ///
    /// # Arguments
    ///
    /// * `name` - Scenario file name without extension
    pub fn load_scenario(&self, name: &str) -> LoadResult<BattleScenario> {
        let path = self.data_dir.join("scenarios").join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

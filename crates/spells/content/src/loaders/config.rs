//! Spell engine configuration loader.

use std::path::Path;

use spells_core::SpellConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine tunables from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing SpellConfig
    ///
    /// # Returns
    ///
    /// Returns a SpellConfig.
    pub fn load(path: &Path) -> LoadResult<SpellConfig> {
        let content = read_file(path)?;
        let config: SpellConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell config TOML: {}", e))?;

        Ok(config)
    }
}

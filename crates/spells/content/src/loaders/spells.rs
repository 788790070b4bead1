//! Spell catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spells_core::{EngineError, Spell, SpellCatalog};

use crate::loaders::{LoadResult, read_file};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellCatalogFile {
    pub spells: Vec<Spell>,
}

/// Loader for the spell catalog from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load the spell catalog from a RON file.
    ///
    /// A file that fails to parse is an error. An entry that parses but fails
    /// validation is logged and left out of the catalog; the rest still load.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing SpellCatalogFile
    ///
    /// # Returns
    ///
    /// Returns a validated SpellCatalog.
    pub fn load(path: &Path) -> LoadResult<SpellCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<SpellCatalog> {
        let file: SpellCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;

        let mut catalog = SpellCatalog::new();
        for spell in file.spells {
            let identifier = spell.identifier.clone();
            if let Err(e) = catalog.insert(spell) {
                tracing::warn!(
                    spell = %identifier,
                    code = e.error_code(),
                    severity = %e.severity(),
                    "Rejected spell entry: {}",
                    e
                );
            }
        }

        tracing::debug!(count = catalog.len(), "Spell catalog loaded");
        Ok(catalog)
    }
}

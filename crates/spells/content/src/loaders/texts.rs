//! Localized problem text loader.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use spells_core::{TextKey, TextTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for problem message templates from TOML files.
///
/// Keys are snake_case [`TextKey`] names. Keys missing from the file keep the
/// built-in English template; unknown keys are logged and ignored.
pub struct TextLoader;

impl TextLoader {
    /// Load message templates from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file with one `key = "template"` line per message
    ///
    /// # Returns
    ///
    /// Returns a TextTable.
    pub fn load(path: &Path) -> LoadResult<TextTable> {
        let content = read_file(path)?;
        let entries: BTreeMap<String, String> = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse texts TOML: {}", e))?;

        let mut table = TextTable::new();
        for (key, template) in entries {
            match TextKey::from_str(&key) {
                Ok(key) => table.set(key, template),
                Err(_) => tracing::warn!(key = %key, "Unknown text key ignored"),
            }
        }
        Ok(table)
    }
}

//! Data-driven spell content and loaders.
//!
//! This crate reads the static data the spell engine runs on:
//! - Spell catalogs (data-driven via RON)
//! - Localized problem texts (data-driven via TOML)
//! - Engine tunables (data-driven via TOML)
//! - Battle scenarios with scripted casts (data-driven via RON)
//!
//! All loaders use spells-core types directly with serde for RON/TOML deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AimSpec, BattleScenario, CasterRef, ConfigLoader, ContentFactory, HeroSpec, LoadResult,
    OverrideSpec, ScenarioLoader, ScriptedCast, SpellCatalogFile, SpellLoader, TextLoader,
    UnitSpec, WallSpec,
};

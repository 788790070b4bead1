//! Spell battle simulator.
//!
//! Composition root that loads spell content, builds a battle from a scenario
//! and replays its scripted casts from a fixed seed.
//!
//! # Examples
//!
//! ```bash
//! SPELLS_SCENARIO=siege SPELLS_SEED=7 cargo run -p spells-sim
//! ```
mod config;
mod runner;

use anyhow::Result;
use config::SimConfig;
use runner::{CastResolution, ScenarioRunner};
use spells_content::ContentFactory;
use spells_core::BattleInfo;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    dotenvy::dotenv().ok();

    setup_logging();

    let config = SimConfig::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Scenario: {}", config.scenario);

    let factory = ContentFactory::new(&config.data_dir);
    let catalog = factory.load_spells()?;
    let texts = factory.load_texts()?;
    let spell_config = factory.load_config()?;
    let scenario = factory.load_scenario(&config.scenario)?;

    let seed = config.seed_for(scenario.seed);
    tracing::info!(spells = catalog.len(), seed, "Replaying {}", scenario.name);

    let mut runner = ScenarioRunner::new(&catalog, &scenario, seed, spell_config, texts)?;
    let summaries = runner.run(&scenario.casts)?;

    let rejected = summaries
        .iter()
        .filter(|s| matches!(s.resolution, CastResolution::Rejected(_)))
        .count();
    tracing::info!(
        casts = summaries.len(),
        rejected,
        "Scenario finished after round {}",
        runner.battle().turn
    );
    for unit in runner.battle().units() {
        tracing::info!(
            unit = %unit.id,
            creature = %unit.creature,
            count = unit.count,
            spells = unit.active_spells.len(),
            "final state"
        );
    }

    Ok(())
}

/// Setup logging to stderr.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

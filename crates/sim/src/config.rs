//! Simulator configuration.
use std::env;
use std::path::PathBuf;

/// Where content lives and which scenario to replay.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub data_dir: PathBuf,
    pub scenario: String,
    /// Overrides the scenario's own seed.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Seed used when neither the environment nor the scenario sets one.
    pub const DEFAULT_SEED: u64 = 0x5EED;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SPELLS_DATA_DIR` - Content directory (default: `crates/spells/content/data`)
    /// - `SPELLS_SCENARIO` - Scenario name under `scenarios/` (default: `mirror_duel`)
    /// - `SPELLS_SEED` - Battle seed (default: scenario seed)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("SPELLS_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(scenario) = read_env::<String>("SPELLS_SCENARIO")
            && !scenario.is_empty()
        {
            config.scenario = scenario;
        }
        config.seed = read_env::<u64>("SPELLS_SEED");

        config
    }

    /// Configured seed, else the scenario's, else [`Self::DEFAULT_SEED`].
    pub fn seed_for(&self, scenario_seed: Option<u64>) -> u64 {
        self.seed.or(scenario_seed).unwrap_or(Self::DEFAULT_SEED)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/spells/content/data"),
            scenario: "mirror_duel".to_string(),
            seed: None,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

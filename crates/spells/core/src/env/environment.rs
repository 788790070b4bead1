use crate::config::SpellConfig;
use crate::mechanics::TextTable;
use crate::state::{BattleInfo, BattleMutation, BattleState};

use super::{BattleRng, RandomSource};

/// Services a battle cast needs: the battle itself, its random source, engine
/// configuration and the texts used to explain rejected casts.
pub trait SpellCastEnvironment {
    fn battle(&self) -> &dyn BattleInfo;

    fn battle_mut(&mut self) -> &mut dyn BattleMutation;

    fn rng(&mut self) -> &mut dyn RandomSource;

    /// Battle and random source borrowed together, as effects need both at once.
    fn battle_and_rng(&mut self) -> (&mut dyn BattleMutation, &mut dyn RandomSource);

    fn config(&self) -> &SpellConfig;

    fn texts(&self) -> &TextTable;
}

/// Environment owning an in-memory battle and its generator.
#[derive(Clone, Debug)]
pub struct BattleEnvironment {
    pub state: BattleState,
    pub rng: BattleRng,
    pub config: SpellConfig,
    pub texts: TextTable,
}

impl BattleEnvironment {
    pub fn new(state: BattleState, seed: u64) -> Self {
        Self {
            state,
            rng: BattleRng::new(seed),
            config: SpellConfig::default(),
            texts: TextTable::default(),
        }
    }

    pub fn with_config(mut self, config: SpellConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_texts(mut self, texts: TextTable) -> Self {
        self.texts = texts;
        self
    }
}

impl SpellCastEnvironment for BattleEnvironment {
    fn battle(&self) -> &dyn BattleInfo {
        &self.state
    }

    fn battle_mut(&mut self) -> &mut dyn BattleMutation {
        &mut self.state
    }

    fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }

    fn battle_and_rng(&mut self) -> (&mut dyn BattleMutation, &mut dyn RandomSource) {
        (&mut self.state, &mut self.rng)
    }

    fn config(&self) -> &SpellConfig {
        &self.config
    }

    fn texts(&self) -> &TextTable {
        &self.texts
    }
}

/// Environment borrowed from an abstract battle, an injected random source
/// and the caller's runtime tunables.
pub struct StateCastEnvironment<'a> {
    battle: &'a mut dyn BattleMutation,
    rng: &'a mut dyn RandomSource,
    config: &'a SpellConfig,
    texts: &'a TextTable,
}

impl<'a> StateCastEnvironment<'a> {
    pub fn new(
        battle: &'a mut dyn BattleMutation,
        rng: &'a mut dyn RandomSource,
        config: &'a SpellConfig,
        texts: &'a TextTable,
    ) -> Self {
        Self {
            battle,
            rng,
            config,
            texts,
        }
    }
}

impl SpellCastEnvironment for StateCastEnvironment<'_> {
    fn battle(&self) -> &dyn BattleInfo {
        self.battle.info()
    }

    fn battle_mut(&mut self) -> &mut dyn BattleMutation {
        &mut *self.battle
    }

    fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    fn battle_and_rng(&mut self) -> (&mut dyn BattleMutation, &mut dyn RandomSource) {
        (&mut *self.battle, &mut *self.rng)
    }

    fn config(&self) -> &SpellConfig {
        self.config
    }

    fn texts(&self) -> &TextTable {
        self.texts
    }
}

//! Services injected into a cast: randomness and the battle environment.
mod environment;
mod rng;

pub use environment::{BattleEnvironment, SpellCastEnvironment, StateCastEnvironment};
pub use rng::{BattleRng, RandomSource, compute_seed, random_item};

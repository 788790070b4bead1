//! Spell behavior: factory selection, per-cast mechanics and legality checks.
//!
//! [`MechanicsFactory`] is built once per spell and picks a [`Behavior`].
//! Every cast attempt then gets a fresh [`Mechanics`] carrying the resolved
//! parameters of that attempt. Rejections are reported as a [`CastProblem`]
//! code and translated into player-facing [`Problem`] messages.
mod base;
mod factory;
mod params;
mod problem;
mod special;
mod target_condition;

pub use base::{CastOutcome, Mechanics};
pub use factory::{Behavior, MechanicsFactory};
pub use params::{CastOverrides, ResolvedParameters};
pub use problem::{CastProblem, Problem, Severity, TextKey, TextTable};
pub use special::{DimensionSpell, MinefieldSpell, ObstacleSpell};
pub use target_condition::{
    ConditionCheck, ConditionItemConfig, TargetCondition, TargetConditionConfig,
};

//! Scripted scenario replay.

use anyhow::{Context, Result, anyhow};
use spells_content::{BattleScenario, CasterRef, ScriptedCast};
use spells_core::{
    BattleCast, BattleEnvironment, BattleInfo, BattleState, CastReport, Caster, HeroCaster, Mode,
    Problem, SpellCastEnvironment, SpellCatalog, SpellConfig, TextTable, UnitCaster, UnitId,
};

/// How one scripted cast ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastResolution {
    Cast(CastReport),
    /// Legality failed; the battle is untouched.
    Rejected(String),
    /// Effects applied without legality checks.
    Forced(Vec<UnitId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastSummary {
    pub round: u32,
    pub caster: String,
    pub spell: String,
    pub resolution: CastResolution,
}

/// Replays a scenario's casts against one battle.
pub struct ScenarioRunner<'a> {
    catalog: &'a SpellCatalog,
    heroes: Vec<HeroCaster>,
    env: BattleEnvironment,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(
        catalog: &'a SpellCatalog,
        scenario: &BattleScenario,
        seed: u64,
        config: SpellConfig,
        texts: TextTable,
    ) -> Result<Self> {
        scenario.validate(catalog)?;
        let heroes = scenario.heroes(catalog)?;
        let env = BattleEnvironment::new(scenario.battle(), seed)
            .with_config(config)
            .with_texts(texts);
        Ok(Self {
            catalog,
            heroes,
            env,
        })
    }

    pub fn battle(&self) -> &BattleState {
        &self.env.state
    }

    /// Runs every cast in order, advancing rounds as the script asks.
    pub fn run(&mut self, casts: &[ScriptedCast]) -> Result<Vec<CastSummary>> {
        casts
            .iter()
            .enumerate()
            .map(|(index, cast)| {
                self.run_cast(cast)
                    .with_context(|| format!("scripted cast #{index} ({})", cast.spell))
            })
            .collect()
    }

    fn run_cast(&mut self, cast: &ScriptedCast) -> Result<CastSummary> {
        while self.env.state.turn < cast.turn {
            self.env.state.next_turn();
            tracing::info!(round = self.env.state.turn, "next round");
        }

        let spell = self
            .catalog
            .by_identifier(&cast.spell)
            .ok_or_else(|| anyhow!("unknown spell `{}`", cast.spell))?;

        let unit_caster;
        let caster: &dyn Caster = match &cast.caster {
            CasterRef::Hero(name) => self
                .heroes
                .iter()
                .find(|hero| &hero.name == name)
                .ok_or_else(|| anyhow!("unknown hero `{name}`"))?,
            CasterRef::Unit(id) => {
                let unit = self
                    .env
                    .state
                    .unit(UnitId(*id))
                    .ok_or_else(|| anyhow!("unknown unit {id}"))?;
                unit_caster = UnitCaster::new(unit);
                &unit_caster
            }
        };

        let mut battle_cast = BattleCast::new(spell, caster, cast.mode);
        cast.overrides.apply_to(&mut battle_cast);
        for aim in &cast.targets {
            aim.aim(&mut battle_cast, &self.env.state);
        }

        let resolution = if cast.forced {
            CastResolution::Forced(battle_cast.apply_effects_forced(&mut self.env))
        } else {
            Self::resolve(&battle_cast, &mut self.env)
        };

        let summary = CastSummary {
            round: self.env.state.turn,
            caster: caster.name().to_string(),
            spell: spell.name.clone(),
            resolution,
        };
        log_summary(&summary);
        Ok(summary)
    }

    /// Deliberate hero casts are checked against their aim; triggered casts
    /// only need the spell to be castable at all.
    fn resolve(battle_cast: &BattleCast<'_>, env: &mut BattleEnvironment) -> CastResolution {
        if battle_cast.mode() == Mode::Hero {
            let mut problem = Problem::new();
            if !battle_cast.can_be_cast_at(env.battle(), env.texts(), &mut problem) {
                return CastResolution::Rejected(problem.to_string());
            }
        }
        match battle_cast.cast_checked(env) {
            Ok(report) => CastResolution::Cast(report),
            Err(problem) => CastResolution::Rejected(problem.to_string()),
        }
    }
}

fn log_summary(summary: &CastSummary) {
    match &summary.resolution {
        CastResolution::Cast(report) => tracing::info!(
            round = summary.round,
            caster = %summary.caster,
            spell = %summary.spell,
            affected = ?report.all_affected(),
            reflections = report.reflections.len(),
            refused = report.reflection_refused,
            "cast resolved"
        ),
        CastResolution::Rejected(problem) => tracing::warn!(
            round = summary.round,
            caster = %summary.caster,
            spell = %summary.spell,
            "cast rejected: {}",
            problem
        ),
        CastResolution::Forced(affected) => tracing::info!(
            round = summary.round,
            caster = %summary.caster,
            spell = %summary.spell,
            affected = ?affected,
            "effects forced"
        ),
    }
}

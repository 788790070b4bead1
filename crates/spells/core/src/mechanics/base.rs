//! Per-cast behavior object.
//!
//! A [`Mechanics`] is created fresh for every cast attempt from the spell's
//! cached factory. It owns the resolved parameters and answers every legality,
//! targeting and application question for that one cast.

use std::sync::Arc;

use crate::cast::{BattleCast, Destination, Mode, Target};
use crate::caster::{Caster, LevelLimiter, LimiterSource};
use crate::config::SpellConfig;
use crate::effects::{EffectConfig, Effects, targeting};
use crate::env::SpellCastEnvironment;
use crate::spell::{AimType, Spell, SpellId, SpellRange};
use crate::state::{BattleHex, BattleInfo, BattlefieldKind, CastRecord, Side, TraitKind, Unit, UnitId};

use super::factory::Behavior;
use super::{CastProblem, Problem, ResolvedParameters, Severity, TargetCondition, TextKey, TextTable};

/// What one pass of the cast pipeline did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastOutcome {
    /// Units changed by the spell.
    pub affected: Vec<UnitId>,
    /// Units that threw the spell back at its caster.
    pub reflected: Vec<UnitId>,
}

pub struct Mechanics<'a> {
    spell: &'a Spell,
    caster: &'a dyn Caster,
    mode: Mode,
    caster_unit: Option<UnitId>,
    caster_side: Option<Side>,
    params: ResolvedParameters,
    condition: Arc<TargetCondition>,
    behavior: Behavior,
}

impl<'a> Mechanics<'a> {
    pub(crate) fn new(
        cast: &BattleCast<'a>,
        battle: &dyn BattleInfo,
        behavior: Behavior,
        condition: Arc<TargetCondition>,
    ) -> Self {
        let spell = cast.spell();
        let caster = cast.caster();
        let mode = cast.mode();
        let caster_side = battle.player_to_side(caster.owner());
        if caster_side.is_none() {
            tracing::warn!(spell = %spell.id, caster = caster.name(), "caster owner takes no part in battle");
        }
        Self {
            spell,
            caster,
            mode,
            caster_unit: caster.caster_unit(),
            caster_side,
            params: ResolvedParameters::resolve(cast.overrides(), caster, mode, spell),
            condition,
            behavior,
        }
    }

    // ===== resolved parameters =====

    pub fn parameters(&self) -> ResolvedParameters {
        self.params
    }

    pub fn range_level(&self) -> i32 {
        self.params.range_level
    }

    pub fn effect_level(&self) -> i32 {
        self.params.effect_level
    }

    pub fn effect_power(&self) -> i32 {
        self.params.effect_power
    }

    pub fn effect_duration(&self) -> i32 {
        self.params.effect_duration
    }

    pub fn effect_value(&self) -> i64 {
        self.params.effect_value
    }

    // ===== spell and caster =====

    pub fn spell(&self) -> &'a Spell {
        self.spell
    }

    pub fn spell_id(&self) -> SpellId {
        self.spell.id
    }

    pub fn spell_name(&self) -> &str {
        &self.spell.name
    }

    pub fn spell_level(&self) -> i32 {
        self.spell.level
    }

    pub fn caster(&self) -> &'a dyn Caster {
        self.caster
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn caster_unit(&self) -> Option<UnitId> {
        self.caster_unit
    }

    pub fn caster_side(&self) -> Option<Side> {
        self.caster_side
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn is_smart(&self) -> bool {
        self.spell.target_info(self.range_level(), self.mode).smart
    }

    pub fn is_massive(&self) -> bool {
        self.spell.target_info(self.range_level(), self.mode).massive
    }

    pub fn is_negative_spell(&self) -> bool {
        self.spell.is_negative()
    }

    pub fn is_positive_spell(&self) -> bool {
        self.spell.is_positive()
    }

    pub fn elemental_immunity(&self) -> Vec<TraitKind> {
        self.spell.elemental_immunities()
    }

    // ===== value helpers =====

    /// Resolved magnitude after the target's reductions and the caster's bonus.
    pub fn adjust_effect_value(&self, target: Option<&Unit>) -> i64 {
        self.spell
            .adjust_raw_damage(self.caster, target, self.effect_value())
    }

    pub fn apply_spell_bonus(&self, value: i64, target: Option<&Unit>) -> i64 {
        self.caster.spell_bonus(self.spell, value, target)
    }

    pub fn apply_specific_spell_bonus(&self, value: i64) -> i64 {
        self.caster.specific_spell_bonus(self.spell, value)
    }

    pub fn calculate_raw_effect_value(&self, base_power_multiplier: i32, level_power_multiplier: i32) -> i64 {
        self.spell.calculate_raw_effect_value(
            self.effect_level(),
            base_power_multiplier,
            level_power_multiplier,
        )
    }

    // ===== receptivity =====

    pub fn owner_matches(&self, battle: &dyn BattleInfo, unit: &Unit) -> bool {
        battle.match_owner(self.caster.owner(), unit, self.spell.positiveness)
    }

    pub fn is_receptive(&self, unit: &Unit) -> bool {
        self.condition.is_receptive(self, unit)
    }

    /// Some valid unit this cast could land on.
    pub fn has_receptive_unit(&self, battle: &dyn BattleInfo) -> bool {
        let smart = self.is_smart();
        battle.units().iter().any(|unit| {
            unit.is_valid_target(false)
                && (!smart || self.owner_matches(battle, unit))
                && self.is_receptive(unit)
        })
    }

    // ===== legality =====

    /// Restriction currently blocking this spell's level, if any.
    pub fn level_limiter(&self, battle: &dyn BattleInfo) -> Option<LevelLimiter> {
        if let Some(limiter) = self.caster.level_limiter()
            && limiter.blocks(self.spell.level)
        {
            return Some(limiter);
        }
        let cursed = LevelLimiter {
            max_level: 1,
            source: LimiterSource::Terrain(BattlefieldKind::CursedGround),
        };
        (battle.battlefield() == BattlefieldKind::CursedGround && cursed.blocks(self.spell.level))
            .then_some(cursed)
    }

    /// Legality of the cast ignoring destinations.
    pub fn battle_can_cast_spell(&self, battle: &dyn BattleInfo) -> CastProblem {
        if self.spell.adventure {
            return CastProblem::AdventureSpellInBattle;
        }
        let Some(side) = self.caster_side else {
            return CastProblem::Invalid;
        };
        if let Some(id) = self.caster_unit
            && !battle.unit(id).is_some_and(Unit::alive)
        {
            return CastProblem::CasterDead;
        }
        if self.mode == Mode::Hero {
            if battle.casts_this_turn(side) > 0 {
                return CastProblem::CastsPerTurnLimit;
            }
            if !self.caster.knows_spell(self.spell.id) {
                return CastProblem::HeroDoesntKnowSpell;
            }
        }
        if self.level_limiter(battle).is_some() {
            return CastProblem::SpellLevelLimitExceeded;
        }
        if !self.behavior_applicable(battle) {
            return CastProblem::NoAppropriateTarget;
        }
        CastProblem::Ok
    }

    /// Legality of the cast at a concrete target.
    pub fn cast_at_problem(&self, battle: &dyn BattleInfo, target: &Target) -> CastProblem {
        let generic = self.battle_can_cast_spell(battle);
        if !generic.is_ok() {
            return generic;
        }
        match &self.behavior {
            Behavior::Configured(effects) | Behavior::Fallback(effects) => {
                self.effects_cast_at(effects, battle, target)
            }
            Behavior::Obstacle(spell) => spell.check_target(self, battle, target),
            Behavior::Minefield(_) => CastProblem::Ok,
            Behavior::Dimension(spell) => spell.check_target(self, battle, target),
        }
    }

    pub fn can_be_cast(&self, battle: &dyn BattleInfo, texts: &TextTable, problem: &mut Problem) -> bool {
        self.adapt_problem(self.battle_can_cast_spell(battle), battle, texts, problem)
    }

    pub fn can_be_cast_at(
        &self,
        battle: &dyn BattleInfo,
        texts: &TextTable,
        problem: &mut Problem,
        target: &Target,
    ) -> bool {
        self.adapt_problem(self.cast_at_problem(battle, target), battle, texts, problem)
    }

    /// Turns a rejection code into a player-facing message. Returns true only for `Ok`.
    pub fn adapt_problem(
        &self,
        source: CastProblem,
        battle: &dyn BattleInfo,
        texts: &TextTable,
        target: &mut Problem,
    ) -> bool {
        match source {
            CastProblem::Ok => return true,
            CastProblem::SpellLevelLimitExceeded => match self.level_limiter(battle) {
                Some(LevelLimiter {
                    max_level: 2,
                    source: LimiterSource::Artifact(artifact),
                }) => target.add(
                    texts.render(
                        TextKey::ArtifactBlocksHighLevel,
                        &[("artifact", artifact.as_str()), ("caster", self.caster.name())],
                    ),
                    Severity::Normal,
                ),
                Some(LevelLimiter {
                    source: LimiterSource::Terrain(BattlefieldKind::CursedGround),
                    ..
                }) => target.add(texts.render(TextKey::CursedGround, &[]), Severity::Normal),
                _ => self.adapt_generic_problem(texts, target),
            },
            CastProblem::WrongSpellTarget
            | CastProblem::StackImmuneToSpell
            | CastProblem::NoAppropriateTarget => target.add(
                texts.render(TextKey::NoAppropriateTarget, &[]),
                Severity::Normal,
            ),
            CastProblem::Invalid => {
                tracing::error!(spell = %self.spell.id, "internal error during check of spell cast");
                target.add(texts.render(TextKey::InternalError, &[]), Severity::Critical)
            }
            _ => self.adapt_generic_problem(texts, target),
        }
        tracing::debug!(spell = %self.spell.id, problem = %source, "cast rejected");
        false
    }

    fn adapt_generic_problem(&self, texts: &TextTable, target: &mut Problem) {
        target.add(
            texts.render(TextKey::NoEffect, &[("caster", self.caster.name())]),
            Severity::Normal,
        );
    }

    fn behavior_applicable(&self, battle: &dyn BattleInfo) -> bool {
        match &self.behavior {
            Behavior::Configured(effects) | Behavior::Fallback(effects) => {
                self.effects_applicable(effects.level(self.effect_level()), battle)
            }
            Behavior::Obstacle(spell) => spell.any_placement(self, battle),
            Behavior::Minefield(_) => BattleHex::all().any(|hex| battle.is_free_hex(hex)),
            Behavior::Dimension(spell) => spell.has_movable_unit(self, battle),
        }
    }

    /// At least one direct effect applies and no required one is left out.
    fn effects_applicable(&self, effects: &[EffectConfig], battle: &dyn BattleInfo) -> bool {
        let mut any = false;
        for effect in effects.iter().filter(|e| !e.indirect) {
            if effect.kind.applicable(self, battle) {
                any = true;
            } else if !effect.optional {
                return false;
            }
        }
        any
    }

    fn effects_cast_at(&self, effects: &Effects, battle: &dyn BattleInfo, target: &Target) -> CastProblem {
        if !self.is_massive() && self.spell.aim == AimType::Creature {
            let smart = self.is_smart();
            for destination in target {
                let unit = match destination {
                    Destination::Unit(id, _) => battle.unit(*id),
                    Destination::Location(hex) => battle.unit_at(*hex),
                    Destination::NoTarget => None,
                };
                let Some(unit) = unit else {
                    return CastProblem::WrongSpellTarget;
                };
                if !unit.is_valid_target(false) || (smart && !self.owner_matches(battle, unit)) {
                    return CastProblem::WrongSpellTarget;
                }
                if !self.is_receptive(unit) {
                    return CastProblem::StackImmuneToSpell;
                }
            }
        }

        let mut any = false;
        for effect in effects.level(self.effect_level()).iter().filter(|e| !e.indirect) {
            let effect_target = effect.kind.transform_target(self, battle, target);
            if effect.kind.applicable_to(self, battle, &effect_target) {
                any = true;
            } else if !effect.optional {
                return CastProblem::NoAppropriateTarget;
            }
        }
        if any {
            CastProblem::Ok
        } else {
            CastProblem::NoAppropriateTarget
        }
    }

    // ===== targeting =====

    /// Kinds of destinations this cast needs, in order. Empty if it cannot be cast.
    pub fn target_types(&self, battle: &dyn BattleInfo) -> Vec<AimType> {
        if !self.battle_can_cast_spell(battle).is_ok() {
            return Vec::new();
        }
        if let Behavior::Dimension(_) = self.behavior {
            return crate::mechanics::DimensionSpell::TARGET_TYPES.to_vec();
        }
        let aim = if self.is_massive() {
            AimType::NoTarget
        } else if self.spell.aim == AimType::Obstacle {
            AimType::Location
        } else {
            self.spell.aim
        };
        vec![aim]
    }

    /// Destinations legal at slot `index` given the destinations already chosen.
    pub fn possible_destinations(
        &self,
        battle: &dyn BattleInfo,
        index: usize,
        aim: AimType,
        current: &Target,
    ) -> Vec<Destination> {
        if let Behavior::Dimension(spell) = &self.behavior {
            return spell.destinations(self, battle, index, current);
        }
        let candidates: Vec<Destination> = match aim {
            AimType::NoTarget => vec![Destination::NoTarget],
            AimType::Creature => battle
                .units()
                .iter()
                .filter(|unit| unit.is_valid_target(false))
                .map(Destination::unit)
                .collect(),
            AimType::Location | AimType::Obstacle => {
                BattleHex::all().map(Destination::Location).collect()
            }
        };
        candidates
            .into_iter()
            .filter(|candidate| {
                let mut extended = current.clone();
                extended.push(*candidate);
                self.cast_at_problem(battle, &extended).is_ok()
            })
            .collect()
    }

    // ===== application =====

    /// Full cast: applies effects, rolls reflections and records the cast.
    pub fn cast(&self, env: &mut dyn SpellCastEnvironment, target: &Target) -> CastOutcome {
        tracing::debug!(
            spell = %self.spell.id,
            mode = %self.mode,
            range_level = self.range_level(),
            effect_level = self.effect_level(),
            value = self.effect_value(),
            "casting"
        );
        let outcome = match &self.behavior {
            Behavior::Configured(effects) | Behavior::Fallback(effects) => {
                self.cast_effects(env, effects, target)
            }
            Behavior::Obstacle(spell) => {
                spell.apply(self, env, target);
                CastOutcome::default()
            }
            Behavior::Minefield(spell) => {
                spell.apply(self, env);
                CastOutcome::default()
            }
            Behavior::Dimension(spell) => CastOutcome {
                affected: spell.apply(self, env, target),
                reflected: Vec::new(),
            },
        };

        if let Some(side) = self.caster_side {
            let turn = env.battle().turn();
            env.battle_mut().record_cast(CastRecord {
                side,
                spell: self.spell.id,
                mode: self.mode,
                turn,
            });
        }
        outcome
    }

    fn cast_effects(
        &self,
        env: &mut dyn SpellCastEnvironment,
        effects: &Effects,
        target: &Target,
    ) -> CastOutcome {
        let level = effects.level(self.effect_level());
        let mut targets: Vec<Target> = level
            .iter()
            .map(|effect| effect.kind.transform_target(self, env.battle(), target))
            .collect();

        let reflected = self.roll_reflections(env, &targets);
        if !reflected.is_empty() {
            for effect_target in &mut targets {
                effect_target.retain(|d| d.unit_id().is_none_or(|id| !reflected.contains(&id)));
            }
        }

        let (battle, rng) = env.battle_and_rng();
        let mut affected = Vec::new();
        for (effect, effect_target) in level.iter().zip(&targets) {
            if !effect.kind.applicable_to(self, battle.info(), effect_target) {
                tracing::debug!(effect = %effect.name, "effect not applicable");
                continue;
            }
            for id in effect.kind.apply(battle, rng, self, effect_target) {
                if !affected.contains(&id) {
                    affected.push(id);
                }
            }
        }
        CastOutcome {
            affected,
            reflected,
        }
    }

    /// Units reflecting this cast. Only harmful single-target spells are reflected.
    fn roll_reflections(&self, env: &mut dyn SpellCastEnvironment, targets: &[Target]) -> Vec<UnitId> {
        let single = self.spell.level_info(self.range_level()).range == SpellRange::Single;
        if !self.spell.is_negative() || self.is_massive() || !single {
            return Vec::new();
        }
        let mut seen = Vec::new();
        let mut reflected = Vec::new();
        for id in targets.iter().flat_map(targeting::target_units) {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            let chance = env.battle().unit(id).map_or(0, Unit::magic_mirror_chance);
            if chance <= 0 {
                continue;
            }
            let roll = env.rng().next_int(0, SpellConfig::PERCENT_ROLL - 1);
            if roll < i64::from(chance) {
                tracing::debug!(unit = %id, chance, roll, "spell reflected");
                reflected.push(id);
            }
        }
        reflected
    }

    /// Deterministic part of the spell only: no random effects, no reflection,
    /// no cast bookkeeping.
    pub fn apply_effects(&self, env: &mut dyn SpellCastEnvironment, target: &Target) -> Vec<UnitId> {
        match &self.behavior {
            Behavior::Configured(effects) | Behavior::Fallback(effects) => {
                self.apply_level(env, effects, target, false)
            }
            Behavior::Obstacle(spell) => {
                spell.apply(self, env, target);
                Vec::new()
            }
            Behavior::Minefield(spell) => {
                tracing::debug!(spell = %self.spell.id, kind = %spell, "random placement skipped");
                Vec::new()
            }
            Behavior::Dimension(spell) => spell.apply(self, env, target),
        }
    }

    /// Every effect, without legality or applicability checks.
    pub fn apply_effects_forced(&self, env: &mut dyn SpellCastEnvironment, target: &Target) -> Vec<UnitId> {
        match &self.behavior {
            Behavior::Configured(effects) | Behavior::Fallback(effects) => {
                self.apply_level(env, effects, target, true)
            }
            Behavior::Obstacle(spell) => {
                spell.apply(self, env, target);
                Vec::new()
            }
            Behavior::Minefield(spell) => {
                spell.apply(self, env);
                Vec::new()
            }
            Behavior::Dimension(spell) => spell.apply(self, env, target),
        }
    }

    fn apply_level(
        &self,
        env: &mut dyn SpellCastEnvironment,
        effects: &Effects,
        target: &Target,
        forced: bool,
    ) -> Vec<UnitId> {
        let mut affected = Vec::new();
        for effect in effects.level(self.effect_level()) {
            if !forced && effect.kind.is_random() {
                continue;
            }
            let effect_target = effect.kind.transform_target(self, env.battle(), target);
            if !forced && !effect.kind.applicable_to(self, env.battle(), &effect_target) {
                continue;
            }
            let (battle, rng) = env.battle_and_rng();
            for id in effect.kind.apply(battle, rng, self, &effect_target) {
                if !affected.contains(&id) {
                    affected.push(id);
                }
            }
        }
        affected
    }
}

impl core::fmt::Debug for Mechanics<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mechanics")
            .field("spell", &self.spell.id)
            .field("caster", &self.caster.name())
            .field("mode", &self.mode)
            .field("caster_side", &self.caster_side)
            .field("params", &self.params)
            .field("behavior", &self.behavior)
            .finish()
    }
}

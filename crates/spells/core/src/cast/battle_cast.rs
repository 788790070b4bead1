//! A single request to cast a spell in battle.
//!
//! A [`BattleCast`] collects the spell, the caster, the trigger mode, optional
//! parameter overrides and the aimed destinations. Executing it resolves fresh
//! [`Mechanics`] from the spell's cached factory, applies them and handles
//! magic mirror reflections. A reflected cast carries [`Mode::MagicMirror`]
//! and is never reflected again.

use crate::caster::{Caster, UnitCaster};
use crate::config::SpellConfig;
use crate::env::{RandomSource, SpellCastEnvironment, StateCastEnvironment, random_item};
use crate::mechanics::{CastOverrides, Mechanics, Problem, ResolvedParameters, TextTable};
use crate::spell::Spell;
use crate::state::{BattleHex, BattleInfo, BattleMutation, Unit, UnitId};

use super::{CastReport, Destination, Mode, Reflection, Target};

pub struct BattleCast<'a> {
    spell: &'a Spell,
    caster: &'a dyn Caster,
    mode: Mode,
    overrides: CastOverrides,
    target: Target,
}

impl<'a> BattleCast<'a> {
    pub fn new(spell: &'a Spell, caster: &'a dyn Caster, mode: Mode) -> Self {
        Self {
            spell,
            caster,
            mode,
            overrides: CastOverrides::default(),
            target: Target::new(),
        }
    }

    // ===== accessors =====

    pub fn spell(&self) -> &'a Spell {
        self.spell
    }

    pub fn caster(&self) -> &'a dyn Caster {
        self.caster
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn overrides(&self) -> &CastOverrides {
        &self.overrides
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    // ===== overrides =====

    /// Sets both range and effect level unless they are set on their own.
    pub fn set_spell_level(&mut self, level: i32) {
        self.overrides.spell_level = Some(level);
    }

    pub fn set_range_level(&mut self, level: i32) {
        self.overrides.range_level = Some(level);
    }

    pub fn set_effect_level(&mut self, level: i32) {
        self.overrides.effect_level = Some(level);
    }

    pub fn set_effect_power(&mut self, power: i32) {
        self.overrides.effect_power = Some(power);
    }

    pub fn set_effect_duration(&mut self, duration: i32) {
        self.overrides.effect_duration = Some(duration);
    }

    pub fn set_effect_value(&mut self, value: i64) {
        self.overrides.effect_value = Some(value);
    }

    fn with_overrides(mut self, overrides: CastOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    // ===== aiming =====

    pub fn aim_to_hex(&mut self, hex: BattleHex) {
        self.target.push(Destination::Location(hex));
    }

    pub fn aim_to_unit(&mut self, unit: &Unit) {
        self.target.push(Destination::unit(unit));
    }

    /// Aims at a unit by id. Unknown ids are logged and skipped.
    pub fn aim_to_unit_id(&mut self, battle: &dyn BattleInfo, id: UnitId) {
        match battle.unit(id) {
            Some(unit) => self.aim_to_unit(unit),
            None => tracing::error!(spell = %self.spell.id, unit = %id, "aimed at unknown unit"),
        }
    }

    /// Staged destinations, or the no-target placeholder when nothing was aimed at.
    fn effective_target(&self) -> Target {
        if self.target.is_empty() {
            vec![Destination::NoTarget]
        } else {
            self.target.clone()
        }
    }

    fn mechanics(&self, battle: &dyn BattleInfo) -> Mechanics<'a> {
        self.spell.battle_mechanics(self, battle)
    }

    // ===== legality =====

    pub fn can_be_cast(&self, battle: &dyn BattleInfo, texts: &TextTable, problem: &mut Problem) -> bool {
        self.mechanics(battle).can_be_cast(battle, texts, problem)
    }

    pub fn can_be_cast_at(&self, battle: &dyn BattleInfo, texts: &TextTable, problem: &mut Problem) -> bool {
        self.mechanics(battle)
            .can_be_cast_at(battle, texts, problem, &self.effective_target())
    }

    // ===== execution =====

    /// Casts the spell and resolves any reflections it provokes.
    pub fn cast(&self, env: &mut dyn SpellCastEnvironment) -> CastReport {
        let target = self.effective_target();
        let m = self.mechanics(env.battle());
        let outcome = m.cast(env, &target);

        let mut report = CastReport::new(self.spell.id, self.mode);
        report.affected = outcome.affected;

        for reflector in outcome.reflected {
            if self.mode.is_reflected() {
                tracing::error!(spell = %self.spell.id, unit = %reflector, "magic mirror recurrence");
                report.reflection_refused = true;
                break;
            }
            if let Some(reflection) = self.reflect(env, m.parameters(), reflector) {
                report.reflection_refused |= reflection.report.reflection_refused;
                report.reflections.push(reflection);
            }
        }
        report
    }

    /// Re-casts the spell from `reflector` at a random unit of the original caster.
    fn reflect(
        &self,
        env: &mut dyn SpellCastEnvironment,
        params: ResolvedParameters,
        reflector: UnitId,
    ) -> Option<Reflection> {
        let owner = self.caster.owner();
        let (mirror_caster, candidates) = {
            let battle = env.battle();
            let Some(unit) = battle.unit(reflector) else {
                tracing::warn!(unit = %reflector, "reflecting unit vanished");
                return None;
            };
            let candidates: Vec<BattleHex> = battle
                .units()
                .iter()
                .filter(|unit| unit.owner == owner && unit.is_valid_target(false))
                .map(|unit| unit.position)
                .collect();
            (UnitCaster::new(unit), candidates)
        };

        let Some(&hex) = random_item(&candidates, env.rng()) else {
            tracing::debug!(unit = %reflector, "no unit to reflect the spell at");
            return None;
        };

        let mut mirror = BattleCast::new(self.spell, &mirror_caster, Mode::MagicMirror)
            .with_overrides(CastOverrides::pinned(&params));
        mirror.aim_to_hex(hex);
        tracing::debug!(spell = %self.spell.id, unit = %reflector, hex = %hex, "spell reflected back");

        Some(Reflection {
            reflector,
            target: hex,
            report: mirror.cast(env),
        })
    }

    /// Casts against a bare battle and random source, with the same pipeline and
    /// runtime tunables as [`cast`](Self::cast).
    pub fn cast_on(
        &self,
        battle: &mut dyn BattleMutation,
        rng: &mut dyn RandomSource,
        config: &SpellConfig,
        texts: &TextTable,
    ) -> CastReport {
        let mut env = StateCastEnvironment::new(battle, rng, config, texts);
        self.cast(&mut env)
    }

    /// Re-validates legality against the current battle, then casts.
    pub fn cast_checked(&self, env: &mut dyn SpellCastEnvironment) -> Result<CastReport, Problem> {
        let mut problem = Problem::new();
        if !self.can_be_cast(env.battle(), env.texts(), &mut problem) {
            tracing::debug!(spell = %self.spell.id, mode = %self.mode, %problem, "cast skipped");
            return Err(problem);
        }
        Ok(self.cast(env))
    }

    /// Whether the cast went ahead.
    pub fn cast_if_possible(&self, env: &mut dyn SpellCastEnvironment) -> bool {
        self.cast_checked(env).is_ok()
    }

    /// Deterministic part of the spell only, for previews and evaluation.
    pub fn apply_effects(&self, env: &mut dyn SpellCastEnvironment) -> Vec<UnitId> {
        let target = self.effective_target();
        self.mechanics(env.battle()).apply_effects(env, &target)
    }

    /// Every effect, bypassing legality.
    pub fn apply_effects_forced(&self, env: &mut dyn SpellCastEnvironment) -> Vec<UnitId> {
        let target = self.effective_target();
        self.mechanics(env.battle()).apply_effects_forced(env, &target)
    }

    // ===== targeting =====

    /// Every legal full destination sequence. Empty if the spell needs no slot
    /// or more slots than can be enumerated.
    pub fn find_potential_targets(&self, battle: &dyn BattleInfo) -> Vec<Target> {
        let m = self.mechanics(battle);
        let types = m.target_types(battle);
        if types.is_empty() || types.len() > SpellConfig::MAX_AUTO_TARGET_SLOTS {
            return Vec::new();
        }

        let mut partial = vec![Target::new()];
        for (index, aim) in types.iter().enumerate() {
            let mut next = Vec::new();
            for current in &partial {
                for destination in m.possible_destinations(battle, index, *aim, current) {
                    let mut extended = current.clone();
                    extended.push(destination);
                    next.push(extended);
                }
            }
            if next.is_empty() {
                return Vec::new();
            }
            partial = next;
        }
        partial
    }
}

impl core::fmt::Debug for BattleCast<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleCast")
            .field("spell", &self.spell.id)
            .field("caster", &self.caster.name())
            .field("mode", &self.mode)
            .field("overrides", &self.overrides)
            .field("target", &self.target)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::HeroCaster;
    use crate::env::BattleEnvironment;
    use crate::spell::{LevelInfo, SchoolSet, SpellId, SpellSchool};
    use crate::state::{BattleState, BattlefieldKind, PlayerId, Side};

    fn arrow() -> Spell {
        Spell::new(SpellId::MAGIC_ARROW, "magic_arrow", "Magic Arrow", 1)
            .with_schools(SchoolSet::all())
            .offensive()
            .with_power(10)
            .with_all_levels(LevelInfo::new(5, 10))
    }

    fn env() -> BattleEnvironment {
        let state = BattleState::new(BattlefieldKind::Grass, PlayerId(0), PlayerId(1))
            .with_unit(Unit::new(
                UnitId(1),
                PlayerId(0),
                Side::Attacker,
                BattleHex::from_xy(1, 1),
                "pikeman",
                10,
                10,
            ))
            .with_unit(Unit::new(
                UnitId(2),
                PlayerId(1),
                Side::Defender,
                BattleHex::from_xy(10, 1),
                "goblin",
                20,
                5,
            ));
        BattleEnvironment::new(state, 7)
    }

    #[test]
    fn hero_cast_damages_aimed_unit_and_counts_towards_limit() {
        let spell = arrow();
        let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 3)
            .with_school_level(SpellSchool::Fire, 1)
            .with_spell(SpellId::MAGIC_ARROW);
        let mut env = env();

        let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
        cast.aim_to_unit_id(env.battle(), UnitId(2));
        let report = cast.cast(&mut env);
        assert_eq!(report.affected, vec![UnitId(2)]);

        let goblin = env.state.unit(UnitId(2)).expect("goblin");
        assert!(goblin.total_health() < 100);

        let mut problem = Problem::new();
        assert!(!cast.can_be_cast(env.battle(), env.texts(), &mut problem));
        assert_eq!(problem.entries().len(), 1);
    }

    #[test]
    fn unknown_unit_is_not_aimed_at() {
        let spell = arrow();
        let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 3);
        let env = env();
        let mut cast = BattleCast::new(&spell, &hero, Mode::Hero);
        cast.aim_to_unit_id(env.battle(), UnitId(99));
        assert!(cast.target().is_empty());
    }

    #[test]
    fn empty_target_casts_against_placeholder() {
        let spell = arrow();
        let hero = HeroCaster::new("Solmyr", PlayerId(0), 2, 3).with_spell(SpellId::MAGIC_ARROW);
        let mut env = env();
        let report = BattleCast::new(&spell, &hero, Mode::Hero).cast(&mut env);
        assert!(report.affected.is_empty());
        assert_eq!(env.state.casts_this_turn(Side::Attacker), 1);
    }
}

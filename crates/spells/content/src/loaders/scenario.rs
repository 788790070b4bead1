//! Battle scenario loader.
//!
//! A scenario describes a starting battle (players, heroes, units, walls) and
//! an ordered script of casts to replay against it. Casters and spells are
//! referenced by name so scenario files stay readable; they are resolved
//! against a [`SpellCatalog`] when the battle is built.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spells_core::{
    BattleCast, BattleHex, BattleInfo, BattleState, BattlefieldKind, HeroCaster, LevelLimiter,
    Mode, PlayerId, Side, SpellCatalog, SpellSchool, Unit, UnitFlags, UnitId, UnitTrait, WallPart,
};

use crate::loaders::{LoadResult, read_file};

/// Battle scenario structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleScenario {
    pub name: String,
    #[serde(default)]
    pub battlefield: BattlefieldKind,
    /// Player commanding the attacking side.
    pub attacker: u8,
    /// Player commanding the defending side.
    pub defender: u8,
    /// Seed used when none is configured.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub heroes: Vec<HeroSpec>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    #[serde(default)]
    pub casts: Vec<ScriptedCast>,
}

/// Hero commanding one side, with spells named by identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroSpec {
    pub name: String,
    pub owner: u8,
    pub spell_power: i32,
    pub knowledge: i32,
    /// Defaults to ten points per knowledge.
    #[serde(default)]
    pub mana: Option<i32>,
    #[serde(default)]
    pub schools: Vec<(SpellSchool, i32)>,
    #[serde(default)]
    pub spells: Vec<String>,
    #[serde(default)]
    pub sorcery_percent: i32,
    #[serde(default)]
    pub extra_duration: i32,
    /// Specialty bonus in percent, by spell identifier.
    #[serde(default)]
    pub specialties: Vec<(String, i32)>,
    #[serde(default)]
    pub limiter: Option<LevelLimiter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: u32,
    pub owner: u8,
    pub side: Side,
    /// Column and row on the battlefield.
    pub hex: (i16, i16),
    pub creature: String,
    pub count: u32,
    pub health: u32,
    #[serde(default)]
    pub flags: UnitFlags,
    #[serde(default)]
    pub traits: Vec<UnitTrait>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSpec {
    pub hex: (i16, i16),
    pub hp: u32,
}

/// Who casts a scripted spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CasterRef {
    /// Hero, by name.
    Hero(String),
    /// Battle unit, by id.
    Unit(u32),
}

/// One aim point of a scripted cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimSpec {
    Hex(i16, i16),
    Unit(u32),
}

impl AimSpec {
    /// Appends this aim point to the cast.
    pub fn aim(&self, cast: &mut BattleCast<'_>, battle: &dyn BattleInfo) {
        match *self {
            Self::Hex(x, y) => cast.aim_to_hex(BattleHex::from_xy(x, y)),
            Self::Unit(id) => cast.aim_to_unit_id(battle, UnitId(id)),
        }
    }
}

/// Pinned cast parameters; unset values follow the caster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSpec {
    pub spell_level: Option<i32>,
    pub range_level: Option<i32>,
    pub effect_level: Option<i32>,
    pub effect_power: Option<i32>,
    pub effect_duration: Option<i32>,
    pub effect_value: Option<i64>,
}

impl OverrideSpec {
    pub fn apply_to(&self, cast: &mut BattleCast<'_>) {
        if let Some(level) = self.spell_level {
            cast.set_spell_level(level);
        }
        if let Some(level) = self.range_level {
            cast.set_range_level(level);
        }
        if let Some(level) = self.effect_level {
            cast.set_effect_level(level);
        }
        if let Some(power) = self.effect_power {
            cast.set_effect_power(power);
        }
        if let Some(duration) = self.effect_duration {
            cast.set_effect_duration(duration);
        }
        if let Some(value) = self.effect_value {
            cast.set_effect_value(value);
        }
    }
}

/// A cast replayed at the start of the given battle round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedCast {
    #[serde(default)]
    pub turn: u32,
    pub caster: CasterRef,
    /// Spell identifier, e.g. `magic_arrow`.
    pub spell: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub targets: Vec<AimSpec>,
    #[serde(default)]
    pub overrides: OverrideSpec,
    /// Apply every effect without legality checks or reflection.
    #[serde(default)]
    pub forced: bool,
}

impl BattleScenario {
    /// Builds the starting battle.
    pub fn battle(&self) -> BattleState {
        let state = BattleState::new(
            self.battlefield,
            PlayerId(self.attacker),
            PlayerId(self.defender),
        );
        let state = self.units.iter().fold(state, |state, spec| {
            let (x, y) = spec.hex;
            let mut unit = Unit::new(
                UnitId(spec.id),
                PlayerId(spec.owner),
                spec.side,
                BattleHex::from_xy(x, y),
                spec.creature.clone(),
                spec.count,
                spec.health,
            )
            .with_flags(spec.flags);
            unit.traits.extend(spec.traits.iter().copied());
            state.with_unit(unit)
        });
        state.with_walls(self.walls.iter().map(|wall| WallPart {
            hex: BattleHex::from_xy(wall.hex.0, wall.hex.1),
            hp: wall.hp,
        }))
    }

    /// Builds every hero, resolving spell identifiers against the catalog.
    pub fn heroes(&self, catalog: &SpellCatalog) -> LoadResult<Vec<HeroCaster>> {
        self.heroes
            .iter()
            .map(|spec| spec.build(catalog))
            .collect()
    }

    /// Checks that every scripted cast names a known spell and caster.
    pub fn validate(&self, catalog: &SpellCatalog) -> LoadResult<()> {
        for (index, cast) in self.casts.iter().enumerate() {
            if catalog.by_identifier(&cast.spell).is_none() {
                anyhow::bail!("Cast #{} uses unknown spell `{}`", index, cast.spell);
            }
            let known = match &cast.caster {
                CasterRef::Hero(name) => self.heroes.iter().any(|hero| &hero.name == name),
                CasterRef::Unit(id) => self.units.iter().any(|unit| unit.id == *id),
            };
            if !known {
                anyhow::bail!("Cast #{} uses unknown caster {:?}", index, cast.caster);
            }
        }
        Ok(())
    }
}

impl HeroSpec {
    fn build(&self, catalog: &SpellCatalog) -> LoadResult<HeroCaster> {
        let lookup = |identifier: &str| {
            catalog.by_identifier(identifier).map(|spell| spell.id).ok_or_else(|| {
                anyhow::anyhow!("Hero {} references unknown spell `{}`", self.name, identifier)
            })
        };

        let mut hero = HeroCaster::new(
            self.name.clone(),
            PlayerId(self.owner),
            self.spell_power,
            self.knowledge,
        );
        for &(school, level) in &self.schools {
            hero = hero.with_school_level(school, level);
        }
        for identifier in &self.spells {
            hero = hero.with_spell(lookup(identifier.as_str())?);
        }
        for (identifier, percent) in &self.specialties {
            hero.specialties.push((lookup(identifier.as_str())?, *percent));
        }
        if let Some(mana) = self.mana {
            hero.mana = mana;
        }
        hero.sorcery_percent = self.sorcery_percent;
        hero.extra_duration = self.extra_duration;
        hero.limiter = self.limiter.clone();
        Ok(hero)
    }
}

/// Loader for battle scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    /// Load a battle scenario from a RON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the RON file containing a BattleScenario
    ///
    /// # Returns
    ///
    /// Returns the parsed BattleScenario; names are resolved later.
    pub fn load(path: &Path) -> LoadResult<BattleScenario> {
        let content = read_file(path)?;
        let scenario: BattleScenario = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse battle scenario RON: {}", e))?;

        Ok(scenario)
    }
}

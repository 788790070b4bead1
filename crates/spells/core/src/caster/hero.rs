use crate::cast::Mode;
use crate::spell::{Spell, SpellId, SpellSchool};
use crate::state::{PlayerId, Unit};

use super::{Caster, LevelLimiter};

/// Hero commanding one side of the battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroCaster {
    pub name: String,
    pub owner: PlayerId,
    /// Skill tier per school, indexed in [`SpellSchool`] declaration order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub school_levels: [i32; 4],
    pub spell_power: i32,
    pub knowledge: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: i32,
    /// Percentage added to spell damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sorcery_percent: i32,
    /// Extra rounds added to every timed effect.
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_duration: i32,
    /// Per-spell specialty bonus in percent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub specialties: Vec<(SpellId, i32)>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub known_spells: Vec<SpellId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub limiter: Option<LevelLimiter>,
}

impl HeroCaster {
    pub fn new(name: impl Into<String>, owner: PlayerId, spell_power: i32, knowledge: i32) -> Self {
        Self {
            name: name.into(),
            owner,
            school_levels: [0; 4],
            spell_power,
            knowledge,
            mana: knowledge * 10,
            sorcery_percent: 0,
            extra_duration: 0,
            specialties: Vec::new(),
            known_spells: Vec::new(),
            limiter: None,
        }
    }

    pub fn with_school_level(mut self, school: SpellSchool, level: i32) -> Self {
        self.school_levels[school as usize] = level;
        self
    }

    pub fn with_spell(mut self, spell: SpellId) -> Self {
        self.known_spells.push(spell);
        self
    }

    pub fn with_limiter(mut self, limiter: LevelLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    fn best_school_level(&self, spell: &Spell) -> i32 {
        spell
            .schools
            .schools()
            .map(|school| self.school_levels[school as usize])
            .max()
            .unwrap_or(0)
    }
}

impl Caster for HeroCaster {
    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn spell_school_level(&self, _mode: Mode, spell: &Spell) -> i32 {
        self.best_school_level(spell)
    }

    fn effect_level(&self, _mode: Mode, spell: &Spell) -> i32 {
        self.best_school_level(spell)
    }

    fn effect_power(&self, _mode: Mode, _spell: &Spell) -> i32 {
        self.spell_power
    }

    fn enchant_power(&self, _mode: Mode, _spell: &Spell) -> i32 {
        self.spell_power + self.extra_duration
    }

    fn effect_value(&self, _mode: Mode, _spell: &Spell) -> i64 {
        0
    }

    fn spell_bonus(&self, _spell: &Spell, value: i64, _target: Option<&Unit>) -> i64 {
        value + value * i64::from(self.sorcery_percent) / 100
    }

    fn specific_spell_bonus(&self, spell: &Spell, value: i64) -> i64 {
        let percent: i32 = self
            .specialties
            .iter()
            .filter(|(id, _)| *id == spell.id)
            .map(|(_, percent)| *percent)
            .sum();
        value + value * i64::from(percent) / 100
    }

    fn knows_spell(&self, spell: SpellId) -> bool {
        self.known_spells.contains(&spell)
    }

    fn level_limiter(&self) -> Option<LevelLimiter> {
        self.limiter.clone()
    }
}

//! Player-facing explanations of rejected casts.

use std::collections::HashMap;

/// How serious a rejection message is.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Info,
    #[default]
    Normal,
    /// Engine inconsistency rather than a rules rejection.
    Critical,
}

/// Low-level reason a cast cannot proceed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CastProblem {
    Ok,
    CastsPerTurnLimit,
    HeroDoesntKnowSpell,
    AdventureSpellInBattle,
    SpellLevelLimitExceeded,
    NoAppropriateTarget,
    StackImmuneToSpell,
    WrongSpellTarget,
    MagicIsBlocked,
    /// The casting unit is dead or gone.
    CasterDead,
    /// Internal inconsistency detected while checking the cast.
    Invalid,
}

impl CastProblem {
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Accumulated `(message, severity)` pairs for one legality check.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Problem {
    entries: Vec<(String, Severity)>,
}

impl Problem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, message: impl Into<String>, severity: Severity) {
        self.entries.push((message.into(), severity));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Severity)] {
        &self.entries
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(message, _)| message.as_str())
    }

    /// Most severe entry, if any.
    pub fn severity(&self) -> Option<Severity> {
        self.entries.iter().map(|(_, severity)| *severity).max()
    }
}

impl core::fmt::Display for Problem {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (index, message) in self.messages().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

/// Localizable message templates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TextKey {
    /// `{caster}`
    NoEffect,
    /// `{artifact}`, `{caster}`
    ArtifactBlocksHighLevel,
    CursedGround,
    NoAppropriateTarget,
    InternalError,
}

impl TextKey {
    pub const fn default_template(self) -> &'static str {
        match self {
            Self::NoEffect => "{caster} recites the incantations but they seem to have no effect.",
            Self::ArtifactBlocksHighLevel => {
                "The {artifact} prevents {caster} from casting 3rd level or higher spells."
            }
            Self::CursedGround => {
                "The cursed ground prevents any spell above the first level from being cast."
            }
            Self::NoAppropriateTarget => "That spell has no appropriate target.",
            Self::InternalError => "Internal error during check of spell cast.",
        }
    }
}

/// Message templates with `{name}` placeholders, defaulting to English.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextTable {
    overrides: HashMap<TextKey, String>,
}

impl TextTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: TextKey, template: impl Into<String>) {
        self.overrides.insert(key, template.into());
    }

    pub fn template(&self, key: TextKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_template())
    }

    /// Substitutes `{name}` placeholders.
    pub fn render(&self, key: TextKey, replacements: &[(&str, &str)]) -> String {
        replacements
            .iter()
            .fold(self.template(key).to_owned(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

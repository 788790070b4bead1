//! World map spells.
//!
//! Same pattern as battle spells, smaller surface: [`AdventureMechanics::create`]
//! maps a spell to one of a closed set of behaviors, each of which validates
//! the request against an [`AdventureWorld`], spends mana and applies itself.
//! Requests that fail validation cost nothing. Boat spells roll for success
//! after the mana is spent.
mod world;

pub use world::{AdventureBonus, AdventureHero, AdventureMap, AdventureWorld, MapPos, RevealKind, Terrain};

use crate::config::SpellConfig;
use crate::env::RandomSource;
use crate::error::{EngineError, ErrorSeverity};
use crate::spell::{Spell, SpellId};

/// Errors raised by adventure casts. Nothing was spent when one is returned.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AdventureCastError {
    #[error("{0} is not an adventure spell")]
    NotAnAdventureSpell(SpellId),

    #[error("hero does not know spell {0}")]
    SpellUnknown(SpellId),

    #[error("not enough mana: need {needed}, have {available}")]
    NotEnoughMana { needed: i32, available: i32 },

    #[error("spell {0} needs a target tile")]
    MissingTarget(SpellId),

    #[error("no free water next to the hero")]
    NoWaterNearby,

    #[error("no boat at {0}")]
    NoBoatAtTarget(MapPos),

    #[error("cannot travel to {0}")]
    InvalidDestination(MapPos),

    #[error("no town to travel to")]
    NoTownAvailable,

    #[error("cannot cast while sailing")]
    InBoat,

    #[error("not enough movement points left")]
    NoMovementLeft,

    #[error("no more dimension door jumps today")]
    JumpLimitReached,
}

impl EngineError for AdventureCastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAnAdventureSpell(_) => ErrorSeverity::Internal,
            Self::NotEnoughMana { .. }
            | Self::NoMovementLeft
            | Self::JumpLimitReached
            | Self::InBoat => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAnAdventureSpell(_) => "ADVENTURE_NOT_ADVENTURE_SPELL",
            Self::SpellUnknown(_) => "ADVENTURE_SPELL_UNKNOWN",
            Self::NotEnoughMana { .. } => "ADVENTURE_NOT_ENOUGH_MANA",
            Self::MissingTarget(_) => "ADVENTURE_MISSING_TARGET",
            Self::NoWaterNearby => "ADVENTURE_NO_WATER_NEARBY",
            Self::NoBoatAtTarget(_) => "ADVENTURE_NO_BOAT_AT_TARGET",
            Self::InvalidDestination(_) => "ADVENTURE_INVALID_DESTINATION",
            Self::NoTownAvailable => "ADVENTURE_NO_TOWN_AVAILABLE",
            Self::InBoat => "ADVENTURE_IN_BOAT",
            Self::NoMovementLeft => "ADVENTURE_NO_MOVEMENT_LEFT",
            Self::JumpLimitReached => "ADVENTURE_JUMP_LIMIT_REACHED",
        }
    }
}

/// Result of an adventure cast that went ahead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdventureOutcome {
    pub spell: SpellId,
    pub mana_spent: i32,
    /// False when a success roll failed; the mana is gone regardless.
    pub succeeded: bool,
}

/// Behavior of a world map spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AdventureMechanics {
    SummonBoat,
    ScuttleBoat,
    DimensionDoor,
    /// Grants a bonus lasting until the end of the day.
    BonusBased(AdventureBonus),
    TownPortal,
    ViewEarth,
    ViewAir,
}

impl AdventureMechanics {
    /// Movement points spent by spells that relocate the hero.
    const TRAVEL_COST: u32 = 300;
    const JUMPS_PER_DAY: [u32; SpellConfig::SPELL_SCHOOL_LEVELS] = [1, 1, 2, 3];

    /// Behavior for `spell`, or `None` if it has no world map use.
    pub fn create(spell: &Spell) -> Option<Self> {
        Some(match spell.id {
            SpellId::SUMMON_BOAT => Self::SummonBoat,
            SpellId::SCUTTLE_BOAT => Self::ScuttleBoat,
            SpellId::DIMENSION_DOOR => Self::DimensionDoor,
            SpellId::FLY => Self::BonusBased(AdventureBonus::Fly),
            SpellId::WATER_WALK => Self::BonusBased(AdventureBonus::WaterWalk),
            SpellId::VISIONS => Self::BonusBased(AdventureBonus::Visions),
            SpellId::DISGUISE => Self::BonusBased(AdventureBonus::Disguise),
            SpellId::TOWN_PORTAL => Self::TownPortal,
            SpellId::VIEW_EARTH => Self::ViewEarth,
            SpellId::VIEW_AIR => Self::ViewAir,
            _ => return None,
        })
    }

    /// Looks up the behavior and casts it in one step.
    pub fn cast_spell(
        spell: &Spell,
        world: &mut dyn AdventureWorld,
        rng: &mut dyn RandomSource,
        target: Option<MapPos>,
    ) -> Result<AdventureOutcome, AdventureCastError> {
        Self::create(spell)
            .ok_or(AdventureCastError::NotAnAdventureSpell(spell.id))?
            .cast(spell, world, rng, target)
    }

    pub fn cast(
        self,
        spell: &Spell,
        world: &mut dyn AdventureWorld,
        rng: &mut dyn RandomSource,
        target: Option<MapPos>,
    ) -> Result<AdventureOutcome, AdventureCastError> {
        let hero = world.hero();
        let level = SpellConfig::clamp_school_level(hero.school_level);
        if !hero.known_spells.contains(&spell.id) {
            return Err(AdventureCastError::SpellUnknown(spell.id));
        }
        let cost = spell.level_info(level).cost;
        if hero.mana < cost {
            return Err(AdventureCastError::NotEnoughMana {
                needed: cost,
                available: hero.mana,
            });
        }

        let plan = self.validate(spell, world, level, target)?;
        world.hero_mut().mana -= cost;

        let succeeded = match self {
            Self::SummonBoat | Self::ScuttleBoat => {
                let chance = i64::from(spell.level_info(level).power);
                rng.next_int(0, SpellConfig::PERCENT_ROLL - 1) < chance
            }
            _ => true,
        };
        if succeeded {
            self.apply(world, plan);
        }
        tracing::debug!(spell = %spell.id, mechanics = %self, level, cost, succeeded, "adventure cast");
        Ok(AdventureOutcome {
            spell: spell.id,
            mana_spent: cost,
            succeeded,
        })
    }

    /// Checks the request and resolves the tile the spell acts on.
    fn validate(
        self,
        spell: &Spell,
        world: &dyn AdventureWorld,
        level: i32,
        target: Option<MapPos>,
    ) -> Result<Option<MapPos>, AdventureCastError> {
        let hero = world.hero();
        let required = || target.ok_or(AdventureCastError::MissingTarget(spell.id));
        match self {
            Self::SummonBoat => {
                if hero.in_boat {
                    return Err(AdventureCastError::InBoat);
                }
                hero.position
                    .neighbours()
                    .find(|pos| world.terrain(*pos) == Some(Terrain::Water) && !world.has_boat(*pos))
                    .map(Some)
                    .ok_or(AdventureCastError::NoWaterNearby)
            }
            Self::ScuttleBoat => {
                let pos = required()?;
                if !world.has_boat(pos) {
                    return Err(AdventureCastError::NoBoatAtTarget(pos));
                }
                Ok(Some(pos))
            }
            Self::DimensionDoor => {
                let pos = required()?;
                if hero.in_boat {
                    return Err(AdventureCastError::InBoat);
                }
                if hero.jumps_today >= Self::JUMPS_PER_DAY[level as usize] {
                    return Err(AdventureCastError::JumpLimitReached);
                }
                if hero.movement < Self::TRAVEL_COST {
                    return Err(AdventureCastError::NoMovementLeft);
                }
                if !world.is_passable(pos) {
                    return Err(AdventureCastError::InvalidDestination(pos));
                }
                Ok(Some(pos))
            }
            Self::TownPortal => {
                if hero.in_boat {
                    return Err(AdventureCastError::InBoat);
                }
                if hero.movement < Self::TRAVEL_COST {
                    return Err(AdventureCastError::NoMovementLeft);
                }
                let towns = world.towns_of(hero.owner);
                match target {
                    // From advanced level on any owned town may be chosen.
                    Some(pos) if level >= 2 => {
                        if towns.contains(&pos) {
                            Ok(Some(pos))
                        } else {
                            Err(AdventureCastError::InvalidDestination(pos))
                        }
                    }
                    _ => towns
                        .into_iter()
                        .min_by_key(|town| (hero.position.distance(*town), *town))
                        .map(Some)
                        .ok_or(AdventureCastError::NoTownAvailable),
                }
            }
            Self::BonusBased(_) | Self::ViewEarth | Self::ViewAir => Ok(None),
        }
    }

    fn apply(self, world: &mut dyn AdventureWorld, tile: Option<MapPos>) {
        let owner = world.hero().owner;
        match (self, tile) {
            (Self::SummonBoat, Some(pos)) => world.place_boat(pos),
            (Self::ScuttleBoat, Some(pos)) => {
                world.remove_boat(pos);
            }
            (Self::DimensionDoor, Some(pos)) => {
                let hero = world.hero_mut();
                hero.position = pos;
                hero.movement -= Self::TRAVEL_COST;
                hero.jumps_today += 1;
            }
            (Self::TownPortal, Some(pos)) => {
                let hero = world.hero_mut();
                hero.position = pos;
                hero.movement -= Self::TRAVEL_COST;
            }
            (Self::BonusBased(bonus), _) => {
                let hero = world.hero_mut();
                if !hero.has_bonus(bonus) {
                    hero.bonuses.push(bonus);
                }
            }
            (Self::ViewEarth, _) => world.reveal(owner, RevealKind::Earth),
            (Self::ViewAir, _) => world.reveal(owner, RevealKind::Air),
            (mechanics, None) => {
                tracing::error!(%mechanics, "adventure spell resolved no tile");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::BattleRng;
    use crate::spell::LevelInfo;
    use crate::state::PlayerId;

    fn spell(id: SpellId, identifier: &str, chance: i32) -> Spell {
        Spell::new(id, identifier, identifier, 1)
            .adventure()
            .with_all_levels(LevelInfo::new(8, chance))
    }

    fn map(hero: AdventureHero) -> AdventureMap {
        AdventureMap::new(10, 10, hero).with_terrain(MapPos::new(3, 2), Terrain::Water)
    }

    #[test]
    fn dispatch_covers_world_spells_only() {
        let fly = spell(SpellId::FLY, "fly", 0);
        assert_eq!(
            AdventureMechanics::create(&fly),
            Some(AdventureMechanics::BonusBased(AdventureBonus::Fly))
        );
        let arrow = spell(SpellId::MAGIC_ARROW, "magic_arrow", 0);
        assert_eq!(AdventureMechanics::create(&arrow), None);
    }

    #[test]
    fn summon_boat_places_boat_on_adjacent_water() {
        let summon = spell(SpellId::SUMMON_BOAT, "summon_boat", 100);
        let hero = AdventureHero::new("Crag", PlayerId(0), MapPos::new(2, 2), 20).with_spell(SpellId::SUMMON_BOAT);
        let mut world = map(hero);
        let mut rng = BattleRng::new(1);

        let outcome = AdventureMechanics::cast_spell(&summon, &mut world, &mut rng, None).expect("cast");
        assert!(outcome.succeeded);
        assert_eq!(world.boats, vec![MapPos::new(3, 2)]);
        assert_eq!(world.hero.mana, 12);
    }

    #[test]
    fn failed_roll_still_spends_mana() {
        let summon = spell(SpellId::SUMMON_BOAT, "summon_boat", 0);
        let hero = AdventureHero::new("Crag", PlayerId(0), MapPos::new(2, 2), 20).with_spell(SpellId::SUMMON_BOAT);
        let mut world = map(hero);
        let mut rng = BattleRng::new(1);

        let outcome = AdventureMechanics::cast_spell(&summon, &mut world, &mut rng, None).expect("cast");
        assert!(!outcome.succeeded);
        assert!(world.boats.is_empty());
        assert_eq!(world.hero.mana, 12);
    }

    #[test]
    fn invalid_request_costs_nothing() {
        let door = spell(SpellId::DIMENSION_DOOR, "dimension_door", 0);
        let hero = AdventureHero::new("Crag", PlayerId(0), MapPos::new(2, 2), 20).with_spell(SpellId::DIMENSION_DOOR);
        let mut world = map(hero);
        let mut rng = BattleRng::new(1);

        let err = AdventureMechanics::cast_spell(&door, &mut world, &mut rng, Some(MapPos::new(3, 2)))
            .expect_err("water is not a destination");
        assert_eq!(err, AdventureCastError::InvalidDestination(MapPos::new(3, 2)));
        assert_eq!(err.error_code(), "ADVENTURE_INVALID_DESTINATION");
        assert_eq!(world.hero.mana, 20);
    }

    #[test]
    fn dimension_door_is_limited_per_day() {
        let door = spell(SpellId::DIMENSION_DOOR, "dimension_door", 0);
        let hero = AdventureHero::new("Crag", PlayerId(0), MapPos::new(2, 2), 40).with_spell(SpellId::DIMENSION_DOOR);
        let mut world = map(hero);
        let mut rng = BattleRng::new(1);

        AdventureMechanics::cast_spell(&door, &mut world, &mut rng, Some(MapPos::new(6, 6))).expect("jump");
        assert_eq!(world.hero.position, MapPos::new(6, 6));
        let err = AdventureMechanics::cast_spell(&door, &mut world, &mut rng, Some(MapPos::new(7, 7)))
            .expect_err("second jump");
        assert_eq!(err, AdventureCastError::JumpLimitReached);

        world.next_day();
        AdventureMechanics::cast_spell(&door, &mut world, &mut rng, Some(MapPos::new(7, 7))).expect("next day");
    }

    #[test]
    fn town_portal_picks_nearest_town_below_advanced() {
        let portal = spell(SpellId::TOWN_PORTAL, "town_portal", 0);
        let hero = AdventureHero::new("Crag", PlayerId(0), MapPos::new(0, 0), 40).with_spell(SpellId::TOWN_PORTAL);
        let mut world = map(hero)
            .with_town(MapPos::new(9, 9), PlayerId(0))
            .with_town(MapPos::new(4, 1), PlayerId(0))
            .with_town(MapPos::new(1, 1), PlayerId(1));
        let mut rng = BattleRng::new(1);

        AdventureMechanics::cast_spell(&portal, &mut world, &mut rng, Some(MapPos::new(9, 9))).expect("portal");
        assert_eq!(world.hero.position, MapPos::new(4, 1));
    }
}

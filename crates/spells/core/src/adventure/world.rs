//! World map model the adventure spells run against.

use crate::spell::SpellId;
use crate::state::PlayerId;

/// Tile coordinate on the world map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapPos {
    pub x: i32,
    pub y: i32,
}

impl MapPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: diagonal steps count as one.
    pub fn distance(self, other: MapPos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn neighbours(self) -> impl Iterator<Item = MapPos> {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| MapPos::new(self.x + dx, self.y + dy))
    }
}

impl core::fmt::Display for MapPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Terrain {
    #[default]
    Land,
    Water,
    Rock,
}

/// Day-long hero effect granted by a bonus-based spell.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AdventureBonus {
    Fly,
    WaterWalk,
    Visions,
    Disguise,
}

/// What a view spell uncovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum RevealKind {
    /// Resources and mines.
    Earth,
    /// Artifacts, and heroes at expert level.
    Air,
}

/// Hero casting on the world map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdventureHero {
    pub name: String,
    pub owner: PlayerId,
    pub position: MapPos,
    pub mana: i32,
    /// Movement points left today.
    pub movement: u32,
    pub in_boat: bool,
    /// Skill tier used for every adventure spell.
    #[cfg_attr(feature = "serde", serde(default))]
    pub school_level: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub known_spells: Vec<SpellId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bonuses: Vec<AdventureBonus>,
    /// Dimension door jumps used today.
    #[cfg_attr(feature = "serde", serde(default))]
    pub jumps_today: u32,
}

impl AdventureHero {
    pub fn new(name: impl Into<String>, owner: PlayerId, position: MapPos, mana: i32) -> Self {
        Self {
            name: name.into(),
            owner,
            position,
            mana,
            movement: 1500,
            in_boat: false,
            school_level: 0,
            known_spells: Vec::new(),
            bonuses: Vec::new(),
            jumps_today: 0,
        }
    }

    pub fn with_spell(mut self, spell: SpellId) -> Self {
        self.known_spells.push(spell);
        self
    }

    pub fn with_school_level(mut self, level: i32) -> Self {
        self.school_level = level;
        self
    }

    pub fn has_bonus(&self, bonus: AdventureBonus) -> bool {
        self.bonuses.contains(&bonus)
    }
}

/// Queries and mutations an adventure spell needs from the world.
pub trait AdventureWorld {
    fn hero(&self) -> &AdventureHero;

    fn hero_mut(&mut self) -> &mut AdventureHero;

    /// `None` outside the map.
    fn terrain(&self, pos: MapPos) -> Option<Terrain>;

    fn has_boat(&self, pos: MapPos) -> bool;

    fn place_boat(&mut self, pos: MapPos);

    fn remove_boat(&mut self, pos: MapPos) -> bool;

    fn towns_of(&self, owner: PlayerId) -> Vec<MapPos>;

    fn reveal(&mut self, owner: PlayerId, kind: RevealKind);

    /// Free tile the hero may stand on.
    fn is_passable(&self, pos: MapPos) -> bool {
        self.terrain(pos) == Some(Terrain::Land) && !self.has_boat(pos)
    }
}

/// In-memory rectangular world with a single active hero.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdventureMap {
    pub width: i32,
    pub height: i32,
    tiles: Vec<Terrain>,
    pub hero: AdventureHero,
    pub boats: Vec<MapPos>,
    pub towns: Vec<(MapPos, PlayerId)>,
    pub revealed: Vec<(PlayerId, RevealKind)>,
}

impl AdventureMap {
    pub fn new(width: i32, height: i32, hero: AdventureHero) -> Self {
        let size = usize::try_from(width.max(0) * height.max(0)).unwrap_or_default();
        Self {
            width,
            height,
            tiles: vec![Terrain::Land; size],
            hero,
            boats: Vec::new(),
            towns: Vec::new(),
            revealed: Vec::new(),
        }
    }

    fn index(&self, pos: MapPos) -> Option<usize> {
        (pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    pub fn with_terrain(mut self, pos: MapPos, terrain: Terrain) -> Self {
        if let Some(index) = self.index(pos) {
            self.tiles[index] = terrain;
        }
        self
    }

    pub fn with_boat(mut self, pos: MapPos) -> Self {
        self.boats.push(pos);
        self
    }

    pub fn with_town(mut self, pos: MapPos, owner: PlayerId) -> Self {
        self.towns.push((pos, owner));
        self
    }

    /// Starts a new day: bonuses expire, movement and jumps reset.
    pub fn next_day(&mut self) {
        self.hero.bonuses.clear();
        self.hero.jumps_today = 0;
        self.hero.movement = 1500;
    }
}

impl AdventureWorld for AdventureMap {
    fn hero(&self) -> &AdventureHero {
        &self.hero
    }

    fn hero_mut(&mut self) -> &mut AdventureHero {
        &mut self.hero
    }

    fn terrain(&self, pos: MapPos) -> Option<Terrain> {
        self.index(pos).map(|index| self.tiles[index])
    }

    fn has_boat(&self, pos: MapPos) -> bool {
        self.boats.contains(&pos)
    }

    fn place_boat(&mut self, pos: MapPos) {
        if !self.boats.contains(&pos) {
            self.boats.push(pos);
        }
    }

    fn remove_boat(&mut self, pos: MapPos) -> bool {
        let before = self.boats.len();
        self.boats.retain(|boat| *boat != pos);
        self.boats.len() != before
    }

    fn towns_of(&self, owner: PlayerId) -> Vec<MapPos> {
        self.towns
            .iter()
            .filter(|(_, town_owner)| *town_owner == owner)
            .map(|(pos, _)| *pos)
            .collect()
    }

    fn reveal(&mut self, owner: PlayerId, kind: RevealKind) {
        if !self.revealed.contains(&(owner, kind)) {
            self.revealed.push((owner, kind));
        }
    }
}

//! Battle queries, battle mutations, and the in-memory battle they run against.
//!
//! The cast pipeline only ever talks to [`BattleInfo`] and [`BattleMutation`];
//! [`BattleState`] is the concrete battle used by tests, tools and the simulator.

use crate::cast::Mode;
use crate::error::{EngineError, ErrorSeverity};
use crate::spell::{Positiveness, SpellId};

use super::{
    ActiveSpell, BattleHex, Obstacle, ObstacleSpawn, PlayerId, Side, Unit, UnitId, WallPart,
};

/// Terrain the battle takes place on.
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
pub enum BattlefieldKind {
    #[default]
    Grass,
    Dirt,
    Sand,
    Snow,
    Swamp,
    /// No spell above first level can be cast here.
    CursedGround,
    MagicPlains,
}

/// Bookkeeping entry written for every completed cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastRecord {
    pub side: Side,
    pub spell: SpellId,
    pub mode: Mode,
    pub turn: u32,
}

/// Outcome of damaging a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageResult {
    pub damage_dealt: u64,
    pub killed: u32,
}

/// Errors raised by [`BattleMutation`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("{0} not found in battle")]
    UnitNotFound(UnitId),

    #[error("{0} is dead")]
    UnitDead(UnitId),

    #[error("hex {0} is not on the battlefield")]
    InvalidHex(BattleHex),

    #[error("hex {0} is occupied")]
    HexOccupied(BattleHex),

    #[error("wall part {0} does not exist")]
    WallPartNotFound(usize),
}

impl EngineError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnitNotFound(_) | Self::WallPartNotFound(_) => ErrorSeverity::Internal,
            Self::UnitDead(_) | Self::HexOccupied(_) => ErrorSeverity::Recoverable,
            Self::InvalidHex(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "BATTLE_UNIT_NOT_FOUND",
            Self::UnitDead(_) => "BATTLE_UNIT_DEAD",
            Self::InvalidHex(_) => "BATTLE_INVALID_HEX",
            Self::HexOccupied(_) => "BATTLE_HEX_OCCUPIED",
            Self::WallPartNotFound(_) => "BATTLE_WALL_PART_NOT_FOUND",
        }
    }
}

/// Read-only battle queries used by mechanics, effects and target conditions.
pub trait BattleInfo {
    fn units(&self) -> &[Unit];

    fn obstacles(&self) -> &[Obstacle];

    fn wall_parts(&self) -> &[WallPart];

    fn battlefield(&self) -> BattlefieldKind;

    fn turn(&self) -> u32;

    fn player_to_side(&self, player: PlayerId) -> Option<Side>;

    /// Casts recorded for `side` during the current turn.
    fn casts_this_turn(&self, side: Side) -> usize;

    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units().iter().find(|u| u.id == id)
    }

    /// Alive unit standing on `hex`.
    fn unit_at(&self, hex: BattleHex) -> Option<&Unit> {
        if !hex.is_valid() {
            return None;
        }
        self.units()
            .iter()
            .find(|u| u.alive() && u.position == hex)
    }

    fn units_if(&self, predicate: &dyn Fn(&Unit) -> bool) -> Vec<&Unit> {
        self.units().iter().filter(|u| predicate(u)).collect()
    }

    fn obstacles_at(&self, hex: BattleHex) -> Vec<&Obstacle> {
        self.obstacles().iter().filter(|o| o.covers(hex)).collect()
    }

    /// Valid hex with neither a living unit nor any obstacle on it.
    fn is_free_hex(&self, hex: BattleHex) -> bool {
        hex.is_valid() && self.unit_at(hex).is_none() && self.obstacles_at(hex).is_empty()
    }

    /// Whether `unit` is on the side a spell of the given positiveness is meant for.
    fn match_owner(&self, owner: PlayerId, unit: &Unit, positiveness: Positiveness) -> bool {
        match positiveness {
            Positiveness::Positive => unit.owner == owner,
            Positiveness::Negative => unit.owner != owner,
            Positiveness::Neutral => true,
        }
    }
}

/// Battle-state mutations invoked by effect implementations.
pub trait BattleMutation: BattleInfo {
    /// Read-only view of the same battle.
    fn info(&self) -> &dyn BattleInfo;

    fn apply_damage(&mut self, unit: UnitId, amount: i64) -> Result<DamageResult, BattleError>;

    /// Adds a timed spell. Cumulative spells stack their bonuses onto an existing
    /// instance; others replace it.
    fn add_active_spell(
        &mut self,
        unit: UnitId,
        spell: ActiveSpell,
        cumulative: bool,
    ) -> Result<(), BattleError>;

    fn spawn_obstacle(&mut self, spawn: ObstacleSpawn) -> Result<u32, BattleError>;

    fn move_unit(&mut self, unit: UnitId, destination: BattleHex) -> Result<(), BattleError>;

    fn damage_wall(&mut self, part: usize, amount: u32) -> Result<(), BattleError>;

    fn record_cast(&mut self, record: CastRecord);
}

/// In-memory battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub battlefield: BattlefieldKind,
    pub turn: u32,
    /// Player controlling each side, indexed by [`Side::index`].
    pub sides: [Option<PlayerId>; 2],
    pub units: Vec<Unit>,
    pub obstacles: Vec<Obstacle>,
    pub walls: Vec<WallPart>,
    pub cast_log: Vec<CastRecord>,
    next_obstacle_id: u32,
}

impl BattleState {
    pub fn new(battlefield: BattlefieldKind, attacker: PlayerId, defender: PlayerId) -> Self {
        Self {
            battlefield,
            sides: [Some(attacker), Some(defender)],
            ..Self::default()
        }
    }

    /// Builder: add a unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Builder: add siege fortifications.
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = WallPart>) -> Self {
        self.walls.extend(walls);
        self
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// Advances to the next round: ticks down timed spells and obstacles.
    pub fn next_turn(&mut self) {
        self.turn += 1;
        for unit in &mut self.units {
            unit.active_spells.retain_mut(|s| {
                s.turns_remaining = s.turns_remaining.saturating_sub(1);
                s.turns_remaining > 0
            });
        }
        self.obstacles.retain_mut(|o| match o.turns_remaining.as_mut() {
            Some(turns) => {
                *turns = turns.saturating_sub(1);
                *turns > 0
            }
            None => true,
        });
    }

    fn alive_unit_mut(&mut self, id: UnitId) -> Result<&mut Unit, BattleError> {
        let unit = self.unit_mut(id).ok_or(BattleError::UnitNotFound(id))?;
        if !unit.alive() {
            return Err(BattleError::UnitDead(id));
        }
        Ok(unit)
    }
}

impl BattleInfo for BattleState {
    fn units(&self) -> &[Unit] {
        &self.units
    }

    fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn wall_parts(&self) -> &[WallPart] {
        &self.walls
    }

    fn battlefield(&self) -> BattlefieldKind {
        self.battlefield
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn player_to_side(&self, player: PlayerId) -> Option<Side> {
        [Side::Attacker, Side::Defender]
            .into_iter()
            .find(|side| self.sides[side.index()] == Some(player))
    }

    fn casts_this_turn(&self, side: Side) -> usize {
        self.cast_log
            .iter()
            .filter(|r| r.side == side && r.turn == self.turn && r.mode == Mode::Hero)
            .count()
    }
}

impl BattleMutation for BattleState {
    fn info(&self) -> &dyn BattleInfo {
        self
    }

    fn apply_damage(&mut self, unit: UnitId, amount: i64) -> Result<DamageResult, BattleError> {
        let unit = self.alive_unit_mut(unit)?;
        let before = unit.total_health();
        let killed = unit.take_damage(amount.max(0) as u64);
        Ok(DamageResult {
            damage_dealt: before - unit.total_health(),
            killed,
        })
    }

    fn add_active_spell(
        &mut self,
        unit: UnitId,
        spell: ActiveSpell,
        cumulative: bool,
    ) -> Result<(), BattleError> {
        let unit = self.alive_unit_mut(unit)?;
        match unit
            .active_spells
            .iter_mut()
            .find(|active| active.spell == spell.spell)
        {
            Some(existing) if cumulative => {
                existing.bonuses.extend(spell.bonuses);
                existing.turns_remaining = existing.turns_remaining.max(spell.turns_remaining);
            }
            Some(existing) => *existing = spell,
            None => unit.active_spells.push(spell),
        }
        Ok(())
    }

    fn spawn_obstacle(&mut self, spawn: ObstacleSpawn) -> Result<u32, BattleError> {
        if let Some(hex) = spawn.hexes.iter().find(|hex| !hex.is_valid()) {
            return Err(BattleError::InvalidHex(*hex));
        }
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        self.obstacles.push(Obstacle::from_spawn(id, spawn));
        Ok(id)
    }

    fn move_unit(&mut self, unit: UnitId, destination: BattleHex) -> Result<(), BattleError> {
        if !destination.is_valid() {
            return Err(BattleError::InvalidHex(destination));
        }
        if self.unit_at(destination).is_some_and(|other| other.id != unit)
            || self
                .obstacles_at(destination)
                .iter()
                .any(|o| o.kind.blocks_movement())
        {
            return Err(BattleError::HexOccupied(destination));
        }
        self.alive_unit_mut(unit)?.position = destination;
        Ok(())
    }

    fn damage_wall(&mut self, part: usize, amount: u32) -> Result<(), BattleError> {
        let wall = self
            .walls
            .get_mut(part)
            .ok_or(BattleError::WallPartNotFound(part))?;
        wall.hp = wall.hp.saturating_sub(amount);
        Ok(())
    }

    fn record_cast(&mut self, record: CastRecord) {
        self.cast_log.push(record);
    }
}

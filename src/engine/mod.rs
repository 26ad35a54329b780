//! The map engine: owns all floor state and resolves turns.
//!
//! The engine owns:
//! - the entity grid and the per-tile visibility grid
//! - the player and enemy rosters
//! - the floor counter, stairs position, seeded RNG, and event log
//!
//! Consumers (renderers, shells, bots) see deep copies through the query
//! surface and drive the simulation through the command surface:
//! [`Map::possible_moves`], [`Map::process_action`], [`Map::end_turn`],
//! [`Map::next_floor`]. Nothing they receive can reach back into engine
//! state, and invalid commands are rejected silently instead of failing.

mod actions;
mod enemy_turns;
mod floor_transition;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::constants::*;
use crate::entity::{Enemy, Entity, Player};
use crate::error::MapError;
use crate::events::{EventLog, GameEvent};
use crate::fov;
use crate::grid::Grid;
use crate::mapgen::{EntityGrid, MapKind};
use crate::pathfinding::TileMap;
use crate::position::Position;

/// The engine's capability view for pathfinding and sight: a tile is
/// occupiable when it is in bounds and empty, and opaque only when a wall
/// stands on it (players, enemies, and stairs are see-through).
pub(crate) struct OccupancyView<'a> {
    pub entities: &'a EntityGrid,
}

impl TileMap for OccupancyView<'_> {
    fn occupiable(&self, pos: Position) -> bool {
        matches!(self.entities.get(pos), Some(None))
    }

    fn transparent(&self, pos: Position) -> bool {
        match self.entities.get(pos) {
            Some(None) => true,
            Some(Some(entity)) => !entity.blocks_sight(),
            None => false,
        }
    }
}

/// The stateful dungeon simulation.
pub struct Map {
    entities: EntityGrid,
    visibility: Grid<f32>,
    /// Roster positions in placement order. The grid owns the payloads;
    /// every entry points at a `Player` / `Enemy` cell whose stored position
    /// matches the entry.
    players: Vec<Position>,
    enemies: Vec<Position>,
    stairs: Position,
    floor: i32,
    kind: MapKind,
    rng: ChaCha8Rng,
    events: EventLog,
    game_over: bool,
}

/// Configures and builds a [`Map`].
pub struct MapBuilder {
    width: usize,
    height: usize,
    party_size: usize,
    seed: Option<u64>,
}

impl MapBuilder {
    fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            party_size: 1,
            seed: None,
        }
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    pub fn party_size(mut self, party_size: usize) -> Self {
        self.party_size = party_size;
        self
    }

    /// Seed the engine RNG. Two maps built with the same configuration and
    /// seed generate identical floors and make identical AI decisions.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate the configuration, roll the party, and generate floor 1.
    pub fn build(self) -> Result<Map, MapError> {
        if self.width < MIN_MAP_DIMENSION || self.height < MIN_MAP_DIMENSION {
            return Err(MapError::MapTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_MAP_DIMENSION,
            });
        }
        if self.party_size == 0 {
            return Err(MapError::EmptyParty);
        }

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let party: Vec<Player> = (1..=self.party_size)
            .map(|i| Player::random(&mut rng, format!("Adventurer {i}")))
            .collect();

        let mut map = Map {
            entities: Grid::new(self.width, self.height, None),
            visibility: Grid::new(self.width, self.height, 0.0),
            players: Vec::new(),
            enemies: Vec::new(),
            stairs: Position::new(0, 0),
            floor: 0,
            kind: MapKind::Tower,
            rng,
            events: EventLog::new(),
            game_over: false,
        };
        map.advance_floor(party);
        Ok(map)
    }
}

impl Map {
    pub fn builder() -> MapBuilder {
        MapBuilder::new()
    }

    // --- query surface: everything returned is an independent copy ---

    /// Deep copy of the entity grid.
    pub fn grid(&self) -> EntityGrid {
        self.entities.clone()
    }

    /// Deep copy of the per-tile lit values in `[0, 1]`.
    pub fn visibility_grid(&self) -> Grid<f32> {
        self.visibility.clone()
    }

    /// The party in roster order.
    pub fn players(&self) -> Vec<Player> {
        self.players
            .iter()
            .filter_map(|&pos| self.player_at(pos).cloned())
            .collect()
    }

    /// The surviving enemies in roster order.
    pub fn enemies(&self) -> Vec<Enemy> {
        self.enemies
            .iter()
            .filter_map(|&pos| self.enemy_at(pos).cloned())
            .collect()
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    /// The generation family of the current floor.
    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn stairs(&self) -> Position {
        self.stairs
    }

    pub fn position_on_map(&self, pos: Position) -> bool {
        self.entities.in_bounds(pos)
    }

    /// True once the last party member has died. All commands are no-ops
    /// from then on.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Observe logged events oldest-first without consuming them.
    pub fn events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Consume and return all logged events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // --- internal accessors keeping grid and rosters in sync ---

    pub(crate) fn player_at(&self, pos: Position) -> Option<&Player> {
        match self.entities.get(pos) {
            Some(Some(Entity::Player(player))) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn player_at_mut(&mut self, pos: Position) -> Option<&mut Player> {
        match self.entities.get_mut(pos) {
            Some(Some(Entity::Player(player))) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn enemy_at(&self, pos: Position) -> Option<&Enemy> {
        match self.entities.get(pos) {
            Some(Some(Entity::Enemy(enemy))) => Some(enemy),
            _ => None,
        }
    }

    /// Move an entity to an empty cell, keeping its stored position and its
    /// roster entry in sync with the grid.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) {
        if from == to {
            return;
        }
        let Some(mut entity) = self.entities.get_mut(from).and_then(|cell| cell.take()) else {
            return;
        };

        entity.set_position(to);
        let is_player = entity.is_player();
        self.entities.set(to, Some(entity));

        let roster = if is_player {
            &mut self.players
        } else {
            &mut self.enemies
        };
        if let Some(slot) = roster.iter_mut().find(|slot| **slot == from) {
            *slot = to;
        }
    }

    /// Remove an entity from its cell and whichever roster held it.
    pub(crate) fn remove_entity(&mut self, pos: Position) {
        if let Some(cell) = self.entities.get_mut(pos) {
            cell.take();
        }
        self.players.retain(|&p| p != pos);
        self.enemies.retain(|&p| p != pos);
    }

    /// Refresh the lit grid from every party member's field of view.
    ///
    /// Per visible tile the lit value is `min(1, 1.1 - (d/r)^2)` with `d`
    /// the Euclidean distance; the maximum across the party wins. Values
    /// only ever increase within a floor — a tile seen once stays at its
    /// brightest until the next floor resets the grid.
    pub(crate) fn recompute_visibility(&mut self) {
        let radius_sq = (FOV_RADIUS * FOV_RADIUS) as f32;

        let mut lit_tiles: Vec<(Position, f32)> = Vec::new();
        {
            let view = OccupancyView {
                entities: &self.entities,
            };
            for &origin in &self.players {
                for pos in fov::visibility(&view, origin, FOV_RADIUS) {
                    let dx = (pos.x - origin.x) as f32;
                    let dy = (pos.y - origin.y) as f32;
                    let lit = (VISIBILITY_BASE - (dx * dx + dy * dy) / radius_sq).min(1.0);
                    lit_tiles.push((pos, lit));
                }
            }
        }

        for (pos, lit) in lit_tiles {
            if let Some(cell) = self.visibility.get_mut(pos) {
                if lit > *cell {
                    *cell = lit;
                }
            }
        }
    }
}

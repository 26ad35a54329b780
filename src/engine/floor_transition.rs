//! Floor progression and repopulation.

use crate::constants::*;
use crate::entity::Player;
use crate::events::GameEvent;
use crate::grid::Grid;
use crate::mapgen::{self, MapKind};

use super::Map;

impl Map {
    /// Advance to the next floor.
    ///
    /// The floor number picks the generation family (towers, then caves,
    /// then dungeons, then the boss arena); the surviving party is carried
    /// over and re-placed with full stamina, stairs and enemies are placed
    /// fresh, and visibility is rebuilt from scratch — nothing from the old
    /// floor survives.
    pub fn next_floor(&mut self) {
        if self.is_game_over() {
            return;
        }
        let party = self.players();
        self.advance_floor(party);
    }

    pub(crate) fn advance_floor(&mut self, mut party: Vec<Player>) {
        self.floor += 1;
        let width = self.entities.width();
        let height = self.entities.height();

        let (kind, boss) = floor_family(self.floor);
        self.kind = kind;

        let mut grid = if boss {
            mapgen::generate_boss_arena(width, height, &mut self.rng)
        } else {
            match kind {
                MapKind::Tower => mapgen::generate_circle(width, height, &mut self.rng),
                MapKind::Cave => mapgen::generate_cave(width, height, &mut self.rng),
                MapKind::Dungeon => mapgen::generate_dungeon(width, height, &mut self.rng),
            }
        };

        mapgen::place_players(&mut grid, &mut party, &mut self.rng);
        let stairs = mapgen::place_stairs(&mut grid, &party, &mut self.rng);
        let enemies = if boss {
            mapgen::place_elite(&mut grid, &party, self.floor, &mut self.rng)
        } else {
            mapgen::place_enemies(&mut grid, &party, self.floor, &mut self.rng)
        };

        self.players = party.iter().map(|p| p.position).collect();
        self.enemies = enemies.iter().map(|e| e.position).collect();
        self.stairs = stairs;
        self.entities = grid;
        self.visibility = Grid::new(width, height, 0.0);
        self.recompute_visibility();

        self.events.push(GameEvent::FloorChanged {
            floor: self.floor,
            kind,
        });
        tracing::info!(floor = self.floor, ?kind, boss, "floor generated");
    }
}

/// Which generation family a floor number belongs to; `true` marks the boss
/// arena.
fn floor_family(floor: i32) -> (MapKind, bool) {
    if floor <= TOWER_TOP_FLOOR {
        (MapKind::Tower, false)
    } else if floor <= CAVE_TOP_FLOOR {
        (MapKind::Cave, false)
    } else if floor <= DUNGEON_TOP_FLOOR {
        (MapKind::Dungeon, false)
    } else {
        // past the dungeon floors the arena repeats; the kind stays Dungeon
        (MapKind::Dungeon, true)
    }
}

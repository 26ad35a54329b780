//! floorcrawl — a turn-based grid roguelike simulation engine.
//!
//! The engine owns procedurally generated dungeon floors, a party of player
//! characters, hostile enemies, and the staircase down, advanced one discrete
//! action at a time. It handles:
//! - grid pathfinding (bounded BFS reachability, A* with a closest-approach
//!   reroute) and octant shadowcasting visibility
//! - procedural floor generation (towers, caves, dungeons, the boss arena)
//! - turn resolution: player movement, combat, enemy AI, floor progression
//!
//! Presentation is somebody else's job: renderers, shells, and bots consume
//! the engine through [`Map`]'s query and command surface, receive deep
//! copies and [`Turn`] reports, and observe notable moments through the
//! bounded [`GameEvent`] log. The engine does no I/O, runs single-threaded,
//! and draws all randomness from one seedable generator, so a seed pins the
//! whole run.
//!
//! ```no_run
//! use floorcrawl::Map;
//!
//! let mut map = Map::builder().seed(7).party_size(2).build().unwrap();
//! let hero = map.players()[0].position;
//! if let Some(step) = map.possible_moves(hero).into_iter().find(|m| *m != hero) {
//!     let turn = map.process_action(hero, step);
//!     println!("moved: {turn:?}");
//! }
//! for report in map.end_turn() {
//!     println!("enemy acted: {report:?}");
//! }
//! ```

pub mod constants;
mod engine;
mod entity;
mod error;
mod events;
mod fov;
mod grid;
mod mapgen;
mod pathfinding;
mod position;
mod systems;
mod turn;

pub use engine::{Map, MapBuilder};
pub use entity::{Enemy, Entity, Obstacle, Player, Stairs, Stats};
pub use error::MapError;
pub use events::{EventLog, GameEvent};
pub use grid::Grid;
pub use mapgen::MapKind;
pub use position::Position;
pub use turn::Turn;

// the algorithm and generation layers are usable on their own
pub use fov::{line_of_sight, visibility};
pub use pathfinding::{movement_for_position, shortest_path, TileMap};

pub mod generation {
    //! Direct access to the floor generator families and placement helpers.
    pub use crate::mapgen::{
        generate_boss_arena, generate_cave, generate_circle, generate_dungeon, generate_random,
        is_open, place_elite, place_enemies, place_players, place_stairs, EntityGrid,
    };
}

pub mod rules {
    //! Combat, experience, and AI building blocks used by the engine.
    pub use crate::systems::ai::{decide, EnemyDecision};
    pub use crate::systems::combat::{
        damage, resolve_enemy_attack, resolve_player_attack, AttackOutcome,
    };
    pub use crate::systems::experience::grant_exp;
}

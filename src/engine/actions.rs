//! Player-driven action resolution.

use std::collections::HashSet;

use crate::entity::Entity;
use crate::events::GameEvent;
use crate::pathfinding;
use crate::position::Position;
use crate::systems::combat;
use crate::turn::Turn;

use super::{Map, OccupancyView};

impl Map {
    /// Legal destinations for the player standing at `p`.
    ///
    /// Empty when no player is there or its stamina is spent. Otherwise the
    /// BFS-reachable tiles within stamina, plus each enemy and the stairs
    /// the player can stand next to with a step to spare (some adjacent tile
    /// at cost strictly below stamina) — melee and interact range.
    pub fn possible_moves(&self, p: Position) -> HashSet<Position> {
        let Some(player) = self.player_at(p) else {
            return HashSet::new();
        };
        let stamina = player.stamina;
        if stamina <= 0 {
            return HashSet::new();
        }

        let view = OccupancyView {
            entities: &self.entities,
        };
        let mut moves = pathfinding::movement_for_position(&view, p, stamina);
        let near = pathfinding::movement_for_position(&view, p, stamina - 1);

        for target in self
            .enemies
            .iter()
            .copied()
            .chain(std::iter::once(self.stairs))
        {
            if target.adjacent().iter().any(|a| near.contains(a)) {
                moves.insert(target);
            }
        }

        moves
    }

    /// Resolve one player action: move to an empty tile, take the stairs, or
    /// attack an enemy.
    ///
    /// Invalid orders are expected input, not errors: when `from == to`, no
    /// player stands at `from`, or `to` is not in `possible_moves(from)`,
    /// nothing changes and `None` comes back.
    ///
    /// Turn economy: movement costs stamina equal to the path length; an
    /// attack (approach steps included) costs all remaining stamina; taking
    /// the stairs ends the floor outright.
    pub fn process_action(&mut self, from: Position, to: Position) -> Option<Turn> {
        if self.is_game_over() || from == to {
            return None;
        }
        self.player_at(from)?;
        if !self.possible_moves(from).contains(&to) {
            return None;
        }

        // snapshot what stands at the destination before resolution mutates
        // the grid
        enum Destination {
            Empty,
            Stairs,
            Enemy,
        }
        let destination = match self.entities.get(to) {
            Some(None) => Destination::Empty,
            Some(Some(Entity::Stairs(_))) => Destination::Stairs,
            Some(Some(Entity::Enemy(_))) => Destination::Enemy,
            // the legal set never contains walls or other players
            _ => return None,
        };

        match destination {
            Destination::Empty => self.resolve_move(from, to),
            Destination::Stairs => self.resolve_stairs(from, to),
            Destination::Enemy => self.resolve_attack(from, to),
        }
    }

    fn resolve_move(&mut self, from: Position, to: Position) -> Option<Turn> {
        let path = {
            let view = OccupancyView {
                entities: &self.entities,
            };
            pathfinding::shortest_path(&view, from, to)
        };
        // possible_moves vetted the destination, so the path is never empty
        let cost = path.len() as i32;

        self.relocate(from, to);
        if let Some(player) = self.player_at_mut(to) {
            player.stamina -= cost;
        }

        self.recompute_visibility();
        Some(Turn::movement(from, to, path))
    }

    fn resolve_stairs(&mut self, from: Position, to: Position) -> Option<Turn> {
        let path = {
            let view = OccupancyView {
                entities: &self.entities,
            };
            pathfinding::shortest_path(&view, from, to)
        };
        // the report describes the old floor, so build it before the world
        // is replaced underneath it
        let turn = Turn::movement(from, to, path);

        tracing::info!(floor = self.floor, "party takes the stairs");
        self.next_floor();
        Some(turn)
    }

    fn resolve_attack(&mut self, from: Position, to: Position) -> Option<Turn> {
        // close to melee range first when needed
        let mut position = from;
        let mut path = Vec::new();
        if from.distance_to(to) != 1 {
            let stamina = self.player_at(from)?.stamina;
            let view = OccupancyView {
                entities: &self.entities,
            };
            let near = pathfinding::movement_for_position(&view, from, stamina - 1);

            // nearest reachable tile adjacent to the enemy; ties fall to
            // position order so the approach is deterministic
            let (_, approach) = to
                .adjacent()
                .iter()
                .copied()
                .filter(|a| near.contains(a))
                .map(|a| (pathfinding::shortest_path(&view, from, a).len(), a))
                .min()?;

            path = pathfinding::shortest_path(&view, from, approach);
            position = approach;
            self.relocate(from, position);
        }

        // one attack, at the cost of everything left this turn
        let mut player = self.player_at(position)?.clone();
        let mut enemy = self.enemy_at(to)?.clone();
        let outcome = combat::resolve_player_attack(&mut player, &mut enemy, &mut self.rng);
        player.stamina = 0;
        self.entities.set(position, Some(Entity::Player(player)));

        self.events.push(GameEvent::DamageDealt {
            attacker: position,
            target: to,
            damage: outcome.damage,
        });

        if outcome.killed {
            self.events.push(GameEvent::ExperienceGained {
                amount: outcome.exp_gained,
            });
            if let Some(level) = outcome.new_level {
                self.events.push(GameEvent::LevelUp { level });
            }
            self.events.push(GameEvent::Death {
                position: to,
                was_player: false,
            });
            self.remove_entity(to);
        } else {
            self.entities.set(to, Some(Entity::Enemy(enemy)));
        }

        self.recompute_visibility();
        Some(Turn {
            start: from,
            end: position,
            path,
            attack_target: Some(to),
            damage: outcome.damage,
        })
    }
}

//! Enemy turn resolution.

use crate::entity::Entity;
use crate::events::GameEvent;
use crate::pathfinding;
use crate::position::Position;
use crate::systems::ai::{self, EnemyDecision};
use crate::systems::combat;
use crate::turn::Turn;

use super::{Map, OccupancyView};

impl Map {
    /// End the party's turn: refill every member's stamina, then let each
    /// enemy act once, in roster order.
    ///
    /// Decisions come from [`ai::decide`] and are validated before they
    /// apply; one that went stale mid-loop (target died, destination filled)
    /// is skipped rather than resolved badly. Returns one report per enemy
    /// that actually did something.
    pub fn end_turn(&mut self) -> Vec<Turn> {
        if self.is_game_over() {
            return Vec::new();
        }

        let party: Vec<Position> = self.players.clone();
        for pos in party {
            if let Some(player) = self.player_at_mut(pos) {
                player.stamina = player.stats.spd;
            }
        }

        let mut turns = Vec::new();
        let order: Vec<Position> = self.enemies.clone();

        for enemy_pos in order {
            let Some(enemy) = self.enemy_at(enemy_pos) else {
                continue;
            };
            let speed = enemy.stats.spd;

            let decision = ai::decide(
                &OccupancyView {
                    entities: &self.entities,
                },
                enemy_pos,
                speed,
                &self.players,
                &mut self.rng,
            );

            match decision {
                EnemyDecision::Wait => {}
                EnemyDecision::Move(to) => {
                    if !matches!(self.entities.get(to), Some(None)) {
                        continue;
                    }
                    let path = {
                        let view = OccupancyView {
                            entities: &self.entities,
                        };
                        pathfinding::shortest_path(&view, enemy_pos, to)
                    };
                    self.relocate(enemy_pos, to);
                    turns.push(Turn::movement(enemy_pos, to, path));
                }
                EnemyDecision::Attack(target) => {
                    if let Some(turn) = self.resolve_enemy_attack(enemy_pos, target, speed) {
                        turns.push(turn);
                    }
                }
            }

            if self.is_game_over() {
                break;
            }
        }

        turns
    }

    /// Walk the enemy adjacent to its target when needed, then land one
    /// attack. Mirrors the player's attack flow.
    fn resolve_enemy_attack(
        &mut self,
        enemy_pos: Position,
        target: Position,
        speed: i32,
    ) -> Option<Turn> {
        self.player_at(target)?;

        let mut position = enemy_pos;
        let mut path = Vec::new();
        if enemy_pos.distance_to(target) != 1 {
            let view = OccupancyView {
                entities: &self.entities,
            };
            let near = pathfinding::movement_for_position(&view, enemy_pos, speed - 1);

            let (_, approach) = target
                .adjacent()
                .iter()
                .copied()
                .filter(|a| near.contains(a))
                .map(|a| (pathfinding::shortest_path(&view, enemy_pos, a).len(), a))
                .min()?;

            path = pathfinding::shortest_path(&view, enemy_pos, approach);
            position = approach;
            self.relocate(enemy_pos, position);
        }

        let enemy = self.enemy_at(position)?.clone();
        let mut player = self.player_at(target)?.clone();
        let outcome = combat::resolve_enemy_attack(&enemy, &mut player);

        self.events.push(GameEvent::DamageDealt {
            attacker: position,
            target,
            damage: outcome.damage,
        });

        if outcome.killed {
            tracing::info!(name = %player.name, at = %target, "party member has fallen");
            self.events.push(GameEvent::Death {
                position: target,
                was_player: true,
            });
            self.remove_entity(target);

            if self.players.is_empty() {
                self.game_over = true;
                self.events.push(GameEvent::GameOver);
                tracing::info!("the last party member is down, game over");
            }
        } else {
            self.entities.set(target, Some(Entity::Player(player)));
        }

        Some(Turn {
            start: enemy_pos,
            end: position,
            path,
            attack_target: Some(target),
            damage: outcome.damage,
        })
    }
}

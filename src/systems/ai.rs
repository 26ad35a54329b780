//! Enemy decision-making.
//!
//! Enemies perceive the floor through the same capability view the engine
//! hands to pathfinding, so their options are exactly what the movement
//! rules allow. Decisions are values; the engine validates and applies them.

use std::collections::HashSet;

use rand::Rng;

use crate::constants::ENEMY_SIGHT_RANGE;
use crate::fov;
use crate::pathfinding::{self, TileMap};
use crate::position::Position;

/// What an enemy wants to do with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyDecision {
    /// Nothing useful to do (boxed in, or wandering in place).
    Wait,
    /// Step to a reachable tile.
    Move(Position),
    /// Close on and attack the player at this position.
    Attack(Position),
}

/// Decide an enemy's turn.
///
/// A player is a candidate target when it is within `ENEMY_SIGHT_RANGE`
/// (Manhattan, strict) and in line of sight; the closest wins, ties broken
/// by position order. The enemy attacks when it can end this turn adjacent
/// to the target (already adjacent, or some tile next to the target costs
/// less than its full speed to reach). Otherwise it advances to the furthest
/// tile of the shortest path it can reach this turn. With no target it
/// wanders to a uniformly random reachable tile.
pub fn decide(
    map: &impl TileMap,
    enemy_pos: Position,
    speed: i32,
    players: &[Position],
    rng: &mut impl Rng,
) -> EnemyDecision {
    let moves = pathfinding::movement_for_position(map, enemy_pos, speed);

    // one visibility sweep covers every line-of-sight check from this tile
    let seen = fov::visibility(map, enemy_pos, -1);
    let target = players
        .iter()
        .copied()
        .filter(|p| enemy_pos.distance_to(*p) < ENEMY_SIGHT_RANGE && seen.contains(p))
        .min_by_key(|p| (enemy_pos.distance_to(*p), *p));

    let Some(target) = target else {
        return random_wander(&moves, enemy_pos, rng);
    };

    if enemy_pos.distance_to(target) == 1 {
        return EnemyDecision::Attack(target);
    }

    // adjacent tiles reachable at cost < speed leave a step to attack with
    let near = pathfinding::movement_for_position(map, enemy_pos, speed - 1);
    if target.adjacent().iter().any(|a| near.contains(a)) {
        return EnemyDecision::Attack(target);
    }

    // advance: the furthest path tile reachable this turn
    let path = pathfinding::shortest_path(map, enemy_pos, target);
    let step = path
        .iter()
        .rev()
        .find(|&&p| p != target && moves.contains(&p))
        .copied();

    match step {
        Some(step) => {
            tracing::debug!(from = %enemy_pos, to = %step, target = %target, "enemy advances");
            EnemyDecision::Move(step)
        }
        None => EnemyDecision::Wait,
    }
}

/// Pick a uniformly random reachable tile.
///
/// The reachable set is sorted before indexing: `HashSet` iteration order is
/// not deterministic, and a seeded run must always wander the same way.
fn random_wander(
    moves: &HashSet<Position>,
    enemy_pos: Position,
    rng: &mut impl Rng,
) -> EnemyDecision {
    if moves.is_empty() {
        return EnemyDecision::Wait;
    }

    let mut options: Vec<Position> = moves.iter().copied().collect();
    options.sort_unstable();

    let pick = options[rng.gen_range(0..options.len())];
    if pick == enemy_pos {
        EnemyDecision::Wait
    } else {
        EnemyDecision::Move(pick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct TestMap {
        width: i32,
        height: i32,
        walls: HashSet<Position>,
    }

    impl TestMap {
        fn new(width: i32, height: i32, walls: &[(i32, i32)]) -> Self {
            Self {
                width,
                height,
                walls: walls.iter().map(|&(x, y)| Position::new(x, y)).collect(),
            }
        }
    }

    impl TileMap for TestMap {
        fn occupiable(&self, pos: Position) -> bool {
            pos.x >= 0
                && pos.y >= 0
                && pos.x < self.width
                && pos.y < self.height
                && !self.walls.contains(&pos)
        }
    }

    #[test]
    fn test_adjacent_player_is_attacked() {
        let map = TestMap::new(10, 10, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let decision = decide(
            &map,
            Position::new(4, 4),
            2,
            &[Position::new(5, 4)],
            &mut rng,
        );
        assert_eq!(decision, EnemyDecision::Attack(Position::new(5, 4)));
    }

    #[test]
    fn test_player_in_reach_is_attacked() {
        // player 3 tiles away; speed 3 reaches an adjacent tile at cost 2
        let map = TestMap::new(10, 10, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let decision = decide(
            &map,
            Position::new(2, 4),
            3,
            &[Position::new(5, 4)],
            &mut rng,
        );
        assert_eq!(decision, EnemyDecision::Attack(Position::new(5, 4)));
    }

    #[test]
    fn test_distant_player_draws_enemy_closer() {
        // player visible but 5 tiles away; speed 2 cannot reach melee
        let map = TestMap::new(10, 10, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let enemy_pos = Position::new(2, 4);
        let target = Position::new(7, 4);

        let decision = decide(&map, enemy_pos, 2, &[target], &mut rng);
        match decision {
            EnemyDecision::Move(step) => {
                // two steps along the straight path toward the player
                assert_eq!(enemy_pos.distance_to(step), 2);
                assert_eq!(step.distance_to(target), 3);
            }
            other => panic!("expected a move toward the player, got {other:?}"),
        }
    }

    #[test]
    fn test_unseen_player_means_wandering() {
        // wall column hides the player entirely
        let walls: Vec<(i32, i32)> = (0..10).map(|y| (5, y)).collect();
        let map = TestMap::new(10, 10, &walls);
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let decision = decide(
            &map,
            Position::new(2, 4),
            2,
            &[Position::new(8, 4)],
            &mut rng,
        );
        match decision {
            EnemyDecision::Wait => {}
            EnemyDecision::Move(step) => {
                assert!(Position::new(2, 4).distance_to(step) <= 2);
                assert!(step.x < 5);
            }
            EnemyDecision::Attack(_) => panic!("cannot attack an unseen player"),
        }
    }

    #[test]
    fn test_boxed_in_enemy_waits() {
        let map = TestMap::new(
            5,
            5,
            &[(1, 2), (3, 2), (2, 1), (2, 3)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let decision = decide(&map, Position::new(2, 2), 3, &[], &mut rng);
        assert_eq!(decision, EnemyDecision::Wait);
    }

    #[test]
    fn test_decisions_are_deterministic_for_a_seed() {
        let map = TestMap::new(10, 10, &[]);
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        let a = decide(&map, Position::new(4, 4), 3, &[], &mut rng_a);
        let b = decide(&map, Position::new(4, 4), 3, &[], &mut rng_b);
        assert_eq!(a, b);
    }
}

//! Grid pathfinding: bounded-range reachability and shortest paths.
//!
//! The algorithms are stateless and see the map only through the [`TileMap`]
//! capability trait, so the engine, the map generator, and tests can all
//! drive them with their own notions of "passable".

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::position::Position;

/// Capability view of a map, as far as pathfinding and sight are concerned.
pub trait TileMap {
    /// Can a mover stand on this tile? Must return false out of bounds.
    fn occupiable(&self, pos: Position) -> bool;

    /// Does sight pass through this tile? Defaults to [`TileMap::occupiable`],
    /// which is right for maps where the only opaque thing is a wall.
    fn transparent(&self, pos: Position) -> bool {
        self.occupiable(pos)
    }
}

/// All positions reachable from `start` in at most `range` steps.
///
/// Breadth-first search through occupiable tiles. The result always contains
/// `start` (even at range 0, and even if `start` itself is not occupiable —
/// the mover is already standing there). Order of expansion follows
/// [`Position::adjacent`], so the visited set is deterministic.
pub fn movement_for_position(
    map: &impl TileMap,
    start: Position,
    range: i32,
) -> HashSet<Position> {
    let mut positions = HashSet::new();
    let mut frontier = VecDeque::new();
    let mut distances: HashMap<Position, i32> = HashMap::new();

    frontier.push_back(start);
    distances.insert(start, 0);

    while let Some(pos) = frontier.pop_front() {
        positions.insert(pos);

        let dist = distances[&pos];
        if dist >= range {
            continue;
        }

        for next in pos.adjacent() {
            // BFS reaches every tile by a shortest route first, so a visited
            // tile never needs updating
            if map.occupiable(next) && !distances.contains_key(&next) {
                distances.insert(next, dist + 1);
                frontier.push_back(next);
            }
        }
    }

    positions
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredNode {
    position: Position,
    f_score: i32, // g_score + heuristic
}

// BinaryHeap is a max-heap; reverse the ordering for min-heap behavior.
// Equal scores fall back to position order so the search is deterministic.
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.position.cmp(&self.position))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest path from `start` to `end` using A* with a Manhattan heuristic.
///
/// Returns the ordered positions from the step after `start` through `end`
/// inclusive; empty when `start == end`. The `end` tile itself is allowed to
/// be non-occupiable so callers can path up to an occupied target (attacking
/// an enemy, walking onto stairs).
///
/// When `end` is unreachable the search does not give up: it picks the
/// expanded node closest to `end` (ties by cost, then position) and reroutes
/// to that node instead. This "closest approach" result is an approximation —
/// it is the best reachable node found by the failed search, not a proven
/// optimum — and it recurses exactly once. Enemy stepping relies on the
/// prefix it returns, so keep the policy as is.
pub fn shortest_path(map: &impl TileMap, start: Position, end: Position) -> Vec<Position> {
    shortest_path_impl(map, start, end, true)
}

fn shortest_path_impl(
    map: &impl TileMap,
    start: Position,
    end: Position,
    allow_reroute: bool,
) -> Vec<Position> {
    if start == end {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_score: HashMap<Position, i32> = HashMap::new();

    g_score.insert(start, 0);
    open_set.push(ScoredNode {
        position: start,
        f_score: start.distance_to(end),
    });

    while let Some(current) = open_set.pop() {
        if current.position == end {
            return reconstruct_path(&came_from, end);
        }

        let current_g = *g_score.get(&current.position).unwrap_or(&i32::MAX);

        for neighbor in current.position.adjacent() {
            // only the goal may be occupied; every intermediate step must be
            // a tile the mover could stand on
            if neighbor != end && !map.occupiable(neighbor) {
                continue;
            }

            let tentative_g = current_g + 1;
            if tentative_g < *g_score.get(&neighbor).unwrap_or(&i32::MAX) {
                came_from.insert(neighbor, current.position);
                g_score.insert(neighbor, tentative_g);
                open_set.push(ScoredNode {
                    position: neighbor,
                    f_score: tentative_g + neighbor.distance_to(end),
                });
            }
        }
    }

    // end unreachable: reroute once toward the closest approach
    if allow_reroute {
        let closest = g_score
            .iter()
            .map(|(&pos, &cost)| (pos.distance_to(end), cost, pos))
            .min()
            .map(|(_, _, pos)| pos);

        if let Some(target) = closest {
            if target != start {
                return shortest_path_impl(map, start, target, false);
            }
        }
    }

    Vec::new()
}

/// Walk the `came_from` chain back from `end`, dropping the start position.
fn reconstruct_path(came_from: &HashMap<Position, Position>, end: Position) -> Vec<Position> {
    let mut path = vec![end];
    let mut current = end;

    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }

    path.reverse();
    // first element is the start position itself
    path.remove(0);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rectangular map with a wall set, for exercising the algorithms.
    pub(crate) struct TestMap {
        pub width: i32,
        pub height: i32,
        pub walls: HashSet<Position>,
    }

    impl TestMap {
        pub fn open(width: i32, height: i32) -> Self {
            Self {
                width,
                height,
                walls: HashSet::new(),
            }
        }

        pub fn with_walls(width: i32, height: i32, walls: &[(i32, i32)]) -> Self {
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
    fn test_reachability_always_contains_start() {
        let map = TestMap::open(5, 5);
        let start = Position::new(2, 2);
        assert!(movement_for_position(&map, start, 0).contains(&start));
        assert!(movement_for_position(&map, start, 3).contains(&start));
    }

    #[test]
    fn test_reachability_range_zero_is_only_start() {
        let map = TestMap::open(5, 5);
        let moves = movement_for_position(&map, Position::new(2, 2), 0);
        assert_eq!(moves.len(), 1);
    }

    #[test]
    fn test_reachability_diamond_clipped_to_strip() {
        // 6-wide, 3-tall open strip, mover at (1,0), range 2: the distance-2
        // diamond clipped to the strip has exactly 8 tiles
        let map = TestMap::open(6, 3);
        let moves = movement_for_position(&map, Position::new(1, 0), 2);

        let expected: HashSet<Position> = [
            (1, 0),
            (0, 0),
            (2, 0),
            (3, 0),
            (1, 1),
            (0, 1),
            (2, 1),
            (1, 2),
        ]
        .iter()
        .map(|&(x, y)| Position::new(x, y))
        .collect();

        assert_eq!(moves, expected);
    }

    #[test]
    fn test_reachability_respects_walls() {
        // wall column splits the map; nothing beyond it is reachable
        let map = TestMap::with_walls(5, 3, &[(2, 0), (2, 1), (2, 2)]);
        let moves = movement_for_position(&map, Position::new(0, 1), 10);
        assert!(moves.iter().all(|p| p.x < 2));
    }

    #[test]
    fn test_shortest_path_length_matches_manhattan() {
        let map = TestMap::open(10, 10);
        let start = Position::new(1, 1);
        let end = Position::new(6, 4);
        let path = shortest_path(&map, start, end);
        assert_eq!(path.len() as i32, start.distance_to(end));
        assert_eq!(*path.last().unwrap(), end);
    }

    #[test]
    fn test_shortest_path_adjacent_is_single_step() {
        let map = TestMap::open(5, 5);
        let path = shortest_path(&map, Position::new(2, 2), Position::new(3, 2));
        assert_eq!(path, vec![Position::new(3, 2)]);
    }

    #[test]
    fn test_shortest_path_same_start_and_end_is_empty() {
        let map = TestMap::open(5, 5);
        assert!(shortest_path(&map, Position::new(2, 2), Position::new(2, 2)).is_empty());
    }

    #[test]
    fn test_shortest_path_excludes_start_includes_end() {
        let map = TestMap::open(5, 5);
        let start = Position::new(0, 0);
        let path = shortest_path(&map, start, Position::new(3, 0));
        assert!(!path.contains(&start));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_unreachable_target_reroutes_to_closest_approach() {
        // wall column at x=2 seals off the right half; target on the far side
        let map = TestMap::with_walls(6, 3, &[(2, 0), (2, 1), (2, 2)]);
        let path = shortest_path(&map, Position::new(0, 1), Position::new(5, 1));

        // the reroute lands on the reachable tile nearest the target
        assert!(!path.is_empty());
        let last = *path.last().unwrap();
        assert_eq!(last, Position::new(1, 1));
    }

    #[test]
    fn test_occupied_goal_is_still_pathable() {
        // goal tile is a wall (stands in for an occupied tile); intermediate
        // steps must avoid walls but the goal itself is fair game
        let map = TestMap::with_walls(5, 5, &[(3, 2)]);
        let path = shortest_path(&map, Position::new(1, 2), Position::new(3, 2));
        assert_eq!(path.len(), 2);
        assert_eq!(*path.last().unwrap(), Position::new(3, 2));
    }
}

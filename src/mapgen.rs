//! Procedural floor generation.
//!
//! Pure functions that synthesize an entity grid — walls are `Obstacle`
//! entities, open tiles are `None` — plus placement helpers that put the
//! party, the stairs, and the enemy pack onto a generated layout. All
//! randomness comes in through `&mut impl Rng`, and every rejection-sampling
//! loop is capped so generation can degrade but never spin forever.

use std::collections::VecDeque;

use rand::Rng;

use crate::constants::*;
use crate::entity::{Enemy, Entity, Obstacle, Player, Stairs};
use crate::grid::Grid;
use crate::pathfinding::{self, TileMap};
use crate::position::Position;

/// The generation family a floor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    /// Elliptical tower rooms.
    Tower,
    /// Carved caves and mine tunnels.
    Cave,
    /// Rooms-and-corridors or hallway dungeons.
    Dungeon,
}

/// An entity grid under construction or play.
pub type EntityGrid = Grid<Option<Entity>>;

/// Whether a tile exists and holds nothing.
pub fn is_open(grid: &EntityGrid, pos: Position) -> bool {
    matches!(grid.get(pos), Some(None))
}

/// Unconstrained pathfinding delegate for corridor carving: every tile is
/// fair game, walls included.
struct OpenField;

impl TileMap for OpenField {
    fn occupiable(&self, _pos: Position) -> bool {
        true
    }
}

fn empty_grid(width: usize, height: usize) -> EntityGrid {
    Grid::new(width, height, None)
}

fn new_wall(pos: Position) -> Option<Entity> {
    Some(Entity::Obstacle(Obstacle::wall(pos)))
}

fn fill_walls(grid: &mut EntityGrid) {
    let all: Vec<Position> = grid.positions().collect();
    for pos in all {
        grid.set(pos, new_wall(pos));
    }
}

fn wall_border(grid: &mut EntityGrid) {
    let max_x = grid.width() as i32 - 1;
    let max_y = grid.height() as i32 - 1;

    for x in 0..=max_x {
        grid.set(Position::new(x, 0), new_wall(Position::new(x, 0)));
        grid.set(Position::new(x, max_y), new_wall(Position::new(x, max_y)));
    }
    for y in 0..=max_y {
        grid.set(Position::new(0, y), new_wall(Position::new(0, y)));
        grid.set(Position::new(max_x, y), new_wall(Position::new(max_x, y)));
    }
}

fn random_interior(width: usize, height: usize, rng: &mut impl Rng) -> Position {
    Position::new(
        rng.gen_range(1..=(width as i32 - 2)),
        rng.gen_range(1..=(height as i32 - 2)),
    )
}

/// A staircase random walk from `start` up to (excluding) `end`.
///
/// Used instead of a shortest path where the layout should meander; A* is
/// too straight for cave texture.
fn random_walk_line(start: Position, end: Position, rng: &mut impl Rng) -> Vec<Position> {
    let mut line = Vec::new();
    let mut pos = start;

    while pos != end {
        line.push(pos);

        if pos.x != end.x {
            if pos.y != end.y && rng.gen_bool(0.5) {
                pos = pos.moved(0, if pos.y > end.y { -1 } else { 1 });
            } else {
                pos = pos.moved(if pos.x > end.x { -1 } else { 1 }, 0);
            }
        } else {
            pos = pos.moved(0, if pos.y > end.y { -1 } else { 1 });
        }
    }

    line
}

/// Entirely random fill: each tile is a wall with probability 1/3, inside a
/// walled border.
pub fn generate_random(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    let mut grid = empty_grid(width, height);

    let all: Vec<Position> = grid.positions().collect();
    for pos in all {
        if rng.gen_range(0..RANDOM_WALL_ONE_IN) == 0 {
            grid.set(pos, new_wall(pos));
        }
    }

    wall_border(&mut grid);
    grid
}

/// One large elliptical room, via the ellipse test `(dx/w)² + (dy/h)² < 1`.
///
/// Three variants, picked uniformly: the plain ellipse; quartered by axis
/// walls with a doorway through up to three of the four arms; or an annulus
/// with a walled inner ellipse at half the radii.
pub fn generate_circle(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    let mut grid = empty_grid(width, height);

    let center_x = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;
    let w = center_x - 1.0;
    let h = center_y - 1.0;

    let all: Vec<Position> = grid.positions().collect();
    for pos in &all {
        let dx = pos.x as f64 - center_x + 0.5;
        let dy = pos.y as f64 - center_y + 0.5;

        if (dx / w).powi(2) + (dy / h).powi(2) >= 1.0 {
            grid.set(*pos, new_wall(*pos));
        }
    }

    // variants: 0 = plain ellipse
    let variant = rng.gen_range(0..3);

    if variant == 1 {
        // quarter the room with axis walls
        let cx = center_x as i32;
        let cy = center_y as i32;
        for x in 0..width as i32 {
            grid.set(Position::new(x, cy), new_wall(Position::new(x, cy)));
        }
        for y in 0..height as i32 {
            grid.set(Position::new(cx, y), new_wall(Position::new(cx, y)));
        }

        // cut a doorway through each arm except one randomly kept sealed
        let missing_door = rng.gen_range(0..4);
        if missing_door != 0 {
            let offset = rng.gen_range(1..=(cy - 2));
            grid.set(Position::new(cx, offset), None);
        }
        if missing_door != 1 {
            let offset = rng.gen_range(1..=(cy - 2));
            grid.set(Position::new(cx, cy + offset), None);
        }
        if missing_door != 2 {
            let offset = rng.gen_range(1..=(cx - 2));
            grid.set(Position::new(offset, cy), None);
        }
        if missing_door != 3 {
            let offset = rng.gen_range(1..=(cx - 2));
            grid.set(Position::new(cx + offset, cy), None);
        }
    } else if variant == 2 {
        // walled inner ellipse turns the room into an annulus
        let w = w / 2.0;
        let h = h / 2.0;
        for pos in &all {
            let dx = pos.x as f64 - center_x + 0.5;
            let dy = pos.y as f64 - center_y + 0.5;

            if (dx / w).powi(2) + (dy / h).powi(2) < 1.0 {
                grid.set(*pos, new_wall(*pos));
            }
        }
    }

    grid
}

/// A dungeon-like floor: either rooms joined by corridors or a central
/// hallway flanked by rooms.
pub fn generate_dungeon(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    if rng.gen_range(0..2) == 0 {
        generate_dungeon_rooms(width, height, rng)
    } else {
        generate_dungeon_hallway(width, height, rng)
    }
}

/// As many non-overlapping rectangular rooms as rejection sampling finds in
/// its attempt budget, each corridor-connected to an earlier room.
fn generate_dungeon_rooms(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    #[derive(Clone, Copy)]
    struct Room {
        origin: Position,
        width: i32,
        height: i32,
    }

    impl Room {
        /// True when the rooms overlap or sit flush against each other.
        fn touches(&self, other: &Room) -> bool {
            // grow the other room by one so a wall always separates rooms
            let bx = other.origin.x - 1;
            let by = other.origin.y - 1;
            let bw = other.width + 2;
            let bh = other.height + 2;

            !(self.origin.x > bx + bw
                || self.origin.x + self.width < bx
                || self.origin.y > by + bh
                || self.origin.y + self.height < by)
        }

        /// A position strictly inside the room.
        fn random_position(&self, rng: &mut impl Rng) -> Position {
            self.origin.moved(
                rng.gen_range(1..(self.width - 1)),
                rng.gen_range(1..(self.height - 1)),
            )
        }
    }

    let mut grid = empty_grid(width, height);
    fill_walls(&mut grid);

    let w = width as i32;
    let h = height as i32;

    // pack in rooms until the attempt budget runs out
    let mut rooms: Vec<Room> = Vec::new();
    let mut tries = 0;
    while tries < PLACEMENT_ATTEMPT_CAP {
        tries += 1;

        let origin = Position::new(rng.gen_range(1..=(w - 6)), rng.gen_range(1..=(h - 6)));
        let dw = (w - origin.x - 3).min(ROOM_MAX_SIDE);
        let dh = (h - origin.y - 3).min(ROOM_MAX_SIDE);
        let room = Room {
            origin,
            width: rng.gen_range(0..dw) + ROOM_MIN_SIDE,
            height: rng.gen_range(0..dh) + ROOM_MIN_SIDE,
        };

        if rooms.iter().any(|r| r.touches(&room)) {
            continue;
        }

        for x in room.origin.x..room.origin.x + room.width {
            for y in room.origin.y..room.origin.y + room.height {
                grid.set(Position::new(x, y), None);
            }
        }
        rooms.push(room);
    }

    // connect every room to a random already-connected one
    let mut connected: Vec<Room> = Vec::new();
    for room in &rooms {
        if connected.is_empty() {
            connected.push(*room);
            continue;
        }

        let other = connected[rng.gen_range(0..connected.len())];
        connected.push(*room);

        let start = room.random_position(rng);
        let end = other.random_position(rng);
        for pos in pathfinding::shortest_path(&OpenField, start, end) {
            grid.set(pos, None);
        }
    }

    grid
}

/// A central two-row hallway with alternating door and divider segments
/// carving rooms off both sides.
fn generate_dungeon_hallway(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    let w = width as i32;
    let h = height as i32;

    let mut grid = empty_grid(width, height);
    wall_border(&mut grid);

    let top_y = rng.gen_range(0..(h / 2 - 4)) + 3;
    let bot_y = h / 2 + rng.gen_range(0..(h / 2 - 4)) + 1;

    for x in 0..w {
        grid.set(Position::new(x, top_y), new_wall(Position::new(x, top_y)));
        grid.set(Position::new(x, bot_y), new_wall(Position::new(x, bot_y)));
    }

    // top rooms: alternate doors through the wall row and dividers up to the
    // border, at random strides
    let mut door = true;
    let mut x = rng.gen_range(0..5) + 2;
    while x < w - 2 {
        if door {
            grid.set(Position::new(x, top_y), None);
        } else {
            for y in 0..top_y {
                grid.set(Position::new(x, y), new_wall(Position::new(x, y)));
            }
        }
        door = !door;
        x += rng.gen_range(0..5) + 2;
    }
    if door {
        // the last room would be sealed without this doorway
        grid.set(Position::new(w - 2, top_y), None);
    }

    // bottom rooms, mirrored
    let mut door = true;
    let mut x = rng.gen_range(0..5) + 2;
    while x < w - 2 {
        if door {
            grid.set(Position::new(x, bot_y), None);
        } else {
            for y in (bot_y + 1)..h {
                grid.set(Position::new(x, y), new_wall(Position::new(x, y)));
            }
        }
        door = !door;
        x += rng.gen_range(0..5) + 2;
    }
    if door {
        grid.set(Position::new(w - 2, bot_y), None);
    }

    grid
}

/// A cave-like floor: either a messy carved cave or straight mine tunnels.
pub fn generate_cave(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    if rng.gen_range(0..2) == 0 {
        generate_messy_cave(width, height, rng)
    } else {
        generate_mine(width, height, rng)
    }
}

/// A chain of random-walk segments with probabilistic clearing around each
/// line tile; the chance of clearing decays with distance from the line.
fn generate_messy_cave(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    let mut grid = empty_grid(width, height);
    fill_walls(&mut grid);

    let mut probability = CAVE_CONTINUE_START;
    let mut start = random_interior(width, height, rng);

    loop {
        // an end position far enough away to be worth carving toward
        let mut tries = 0;
        let mut end = random_interior(width, height, rng);
        while start.distance_to(end) <= CAVE_SEGMENT_MIN_SPAN && tries < PLACEMENT_ATTEMPT_CAP {
            tries += 1;
            end = random_interior(width, height, rng);
        }

        let line = random_walk_line(start, end, rng);

        // flood outward from each line tile; the further from the line, the
        // less likely a tile is cleared
        for &center in &line {
            let mut to_clear = VecDeque::new();
            to_clear.push_back(center);

            while let Some(pos) = to_clear.pop_front() {
                let is_wall = grid.get(pos).map(|c| c.is_some()).unwrap_or(false);
                if grid.in_bounds(pos)
                    && is_wall
                    && rng.gen_range(0..(pos.distance_to(center) + 1)) == 0
                {
                    grid.set(pos, None);
                    for adj in pos.adjacent() {
                        to_clear.push_back(adj);
                    }
                }
            }
        }

        start = end;

        // each segment makes continuing less likely
        probability -= CAVE_CONTINUE_DECAY;
        if rng.gen_range(0..100) >= probability {
            break;
        }
    }

    wall_border(&mut grid);
    grid
}

/// Long straight tunnels between well-separated anchor points.
fn generate_mine(width: usize, height: usize, rng: &mut impl Rng) -> EntityGrid {
    let mut grid = empty_grid(width, height);
    fill_walls(&mut grid);

    let min_dist = (width as i32 + height as i32) / MINE_SEPARATION_DIVISOR;
    let n_lines = rng.gen_range(MINE_LINES_MIN..=MINE_LINES_MAX);

    // anchors with minimum pairwise separation; past the attempt cap any
    // candidate is accepted
    let mut points: Vec<Position> = Vec::new();
    let mut tries = 0;
    while (points.len() as u32) < n_lines {
        let pos = random_interior(width, height, rng);
        tries += 1;

        if tries > PLACEMENT_ATTEMPT_CAP {
            points.push(pos);
        } else if points.iter().any(|p| p.distance_to(pos) < min_dist) {
            continue;
        } else {
            points.push(pos);
        }
    }

    // carve a tunnel (one tile wide plus its neighbors) between consecutive
    // anchors
    for i in 1..points.len() {
        for pos in random_walk_line(points[i - 1], points[i], rng) {
            grid.set(pos, None);
            for adj in pos.adjacent() {
                if grid.in_bounds(adj) {
                    grid.set(adj, None);
                }
            }
        }
    }

    wall_border(&mut grid);
    grid
}

/// The boss arena: a double-thick border and a regular grid of 2x2 pillars.
///
/// The layout is fixed; the unused generator keeps the family signatures
/// uniform.
pub fn generate_boss_arena(width: usize, height: usize, _rng: &mut impl Rng) -> EntityGrid {
    let mut grid = empty_grid(width, height);
    let w = width as i32;
    let h = height as i32;

    let all: Vec<Position> = grid.positions().collect();
    for pos in all {
        if pos.x <= 1 || pos.y <= 1 || pos.x >= w - 2 || pos.y >= h - 2 {
            grid.set(pos, new_wall(pos));
        }
    }

    for py in (4..height.saturating_sub(5)).step_by(ARENA_PILLAR_STRIDE) {
        for px in (4..width.saturating_sub(5)).step_by(ARENA_PILLAR_STRIDE) {
            for dy in 0..2 {
                for dx in 0..2 {
                    let pos = Position::new(px as i32 + dx, py as i32 + dy);
                    grid.set(pos, new_wall(pos));
                }
            }
        }
    }

    grid
}

/// Put the party on the map: the first member at a random open tile, the
/// rest clustered nearby through an expanding random-offset search.
///
/// Every placed member gets its grid cell, its position updated, and a full
/// stamina pool for the floor's first turn.
pub fn place_players(grid: &mut EntityGrid, players: &mut [Player], rng: &mut impl Rng) {
    let open: Vec<Position> = grid
        .positions()
        .filter(|&p| is_open(grid, p))
        .collect();
    // degenerate layouts still get a starting tile
    let start = if open.is_empty() {
        Position::new(1, 1)
    } else {
        open[rng.gen_range(0..open.len())]
    };

    let mut placed_first = false;
    let mut dist = 1.0f64;

    for player in players.iter_mut() {
        let pos = if placed_first {
            // widen the offset ring a little on every miss
            loop {
                let reach = dist as i32;
                let candidate =
                    start.moved(rng.gen_range(-reach..=reach), rng.gen_range(-reach..=reach));
                dist += 0.1;
                if is_open(grid, candidate) {
                    break candidate;
                }
            }
        } else {
            placed_first = true;
            start
        };

        player.position = pos;
        player.stamina = player.stats.spd;
        grid.set(pos, Some(Entity::Player(player.clone())));
    }
}

/// Place the stairs at an open tile away from the whole party.
///
/// The required distance scales with the floor dimensions; after the attempt
/// cap the constraint is dropped and any open tile is accepted.
pub fn place_stairs(grid: &mut EntityGrid, players: &[Player], rng: &mut impl Rng) -> Position {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    let min_dist = (w + h) / STAIRS_SEPARATION_DIVISOR;

    let mut tries = 0;
    loop {
        tries += 1;
        let pos = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if !is_open(grid, pos) {
            continue;
        }

        let far_enough = players
            .iter()
            .all(|p| p.position.distance_to(pos) > min_dist);
        if far_enough || tries > PLACEMENT_ATTEMPT_CAP {
            grid.set(pos, Some(Entity::Stairs(Stairs::new(pos))));
            return pos;
        }
    }
}

/// Scatter 3-7 floor-scaled enemies, each at least a dimension-scaled
/// distance from every player. The attempt cap abandons unplaced spawns
/// rather than looping forever.
pub fn place_enemies(
    grid: &mut EntityGrid,
    players: &[Player],
    floor: i32,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    let min_dist = (w + h) / ENEMY_SEPARATION_DIVISOR;

    let count = rng.gen_range(ENEMY_COUNT_MIN..=ENEMY_COUNT_MAX);
    let mut enemies = Vec::new();
    let mut tries = 0;

    while enemies.len() < count {
        tries += 1;
        if tries > PLACEMENT_ATTEMPT_CAP {
            break;
        }

        let pos = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if !is_open(grid, pos)
            || players
                .iter()
                .any(|p| p.position.distance_to(pos) < min_dist)
        {
            continue;
        }

        let mut enemy = Enemy::random(rng, floor);
        enemy.position = pos;
        grid.set(pos, Some(Entity::Enemy(enemy.clone())));
        enemies.push(enemy);
    }

    enemies
}

/// The boss arena gets a single elite instead of a pack.
pub fn place_elite(
    grid: &mut EntityGrid,
    players: &[Player],
    floor: i32,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let w = grid.width() as i32;
    let h = grid.height() as i32;
    let min_dist = (w + h) / ENEMY_SEPARATION_DIVISOR;

    let mut tries = 0;
    loop {
        tries += 1;
        let pos = Position::new(rng.gen_range(0..w), rng.gen_range(0..h));
        if !is_open(grid, pos) {
            continue;
        }

        let far_enough = players
            .iter()
            .all(|p| p.position.distance_to(pos) >= min_dist);
        if far_enough || tries > PLACEMENT_ATTEMPT_CAP {
            let mut elite = Enemy::elite(rng, floor);
            elite.position = pos;
            grid.set(pos, Some(Entity::Enemy(elite.clone())));
            return vec![elite];
        }
    }
}

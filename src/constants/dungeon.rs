//! Map generation tuning.

/// Default floor dimensions used by the map builder
pub const DEFAULT_WIDTH: usize = 30;
pub const DEFAULT_HEIGHT: usize = 30;
/// Smallest side length the generator families can work with
pub const MIN_MAP_DIMENSION: usize = 16;

/// Cap on rejection-sampling loops; past this the constraint is relaxed
/// rather than spinning forever
pub const PLACEMENT_ATTEMPT_CAP: u32 = 1000;

/// Fully random map: each tile is a wall with probability 1 in this
pub const RANDOM_WALL_ONE_IN: u32 = 3;

/// Dungeon room side lengths, inclusive of the minimum
pub const ROOM_MIN_SIDE: i32 = 3;
pub const ROOM_MAX_SIDE: i32 = 10;

/// Messy cave: continuation roll starts here and drops per segment
pub const CAVE_CONTINUE_START: i32 = 140;
pub const CAVE_CONTINUE_DECAY: i32 = 20;
/// Minimum Manhattan span of each cave segment
pub const CAVE_SEGMENT_MIN_SPAN: i32 = 8;

/// Mine tunnel anchor count, inclusive
pub const MINE_LINES_MIN: u32 = 4;
pub const MINE_LINES_MAX: u32 = 6;
/// Anchor separation: minimum pairwise distance = (W + H) / this
pub const MINE_SEPARATION_DIVISOR: i32 = 5;

/// Stairs placement: minimum distance from every player = (W + H) / this
pub const STAIRS_SEPARATION_DIVISOR: i32 = 6;
/// Enemy placement: minimum distance from every player = (W + H) / this
pub const ENEMY_SEPARATION_DIVISOR: i32 = 8;

/// Enemies placed per floor, inclusive
pub const ENEMY_COUNT_MIN: usize = 3;
pub const ENEMY_COUNT_MAX: usize = 7;

/// Floor schedule: towers, then caves, then dungeons, then the boss arena
pub const TOWER_TOP_FLOOR: i32 = 3;
pub const CAVE_TOP_FLOOR: i32 = 6;
pub const DUNGEON_TOP_FLOOR: i32 = 9;

/// Boss arena: a 2x2 pillar starts every this-many tiles along each axis
pub const ARENA_PILLAR_STRIDE: usize = 4;

//! Core gameplay constants (party stats, experience, visibility).

/// Field of view radius for player visibility
pub const FOV_RADIUS: i32 = 7;
/// Lit value before distance falloff; clamped to 1.0 when applied
pub const VISIBILITY_BASE: f32 = 1.1;

/// Player health roll, inclusive
pub const PLAYER_HP_MIN: i32 = 10;
pub const PLAYER_HP_MAX: i32 = 19;
/// Player attack roll, inclusive
pub const PLAYER_ATK_MIN: i32 = 5;
pub const PLAYER_ATK_MAX: i32 = 9;
/// Player defense roll, inclusive
pub const PLAYER_DEF_MIN: i32 = 1;
pub const PLAYER_DEF_MAX: i32 = 9;
/// Player speed roll, inclusive; speed doubles as the per-turn stamina pool
pub const PLAYER_SPD_MIN: i32 = 4;
pub const PLAYER_SPD_MAX: i32 = 5;

/// Experience needed to level: threshold = level * this
pub const LEVEL_THRESHOLD_STEP: i32 = 150;
/// Experience awarded for a kill, inclusive
pub const KILL_EXP_MIN: i32 = 30;
pub const KILL_EXP_MAX: i32 = 50;

/// Entries kept in the engine event log before the oldest are dropped
pub const EVENT_LOG_CAPACITY: usize = 20;

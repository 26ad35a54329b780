//! Combat tuning.

/// Damage formula: damage = atk * DAMAGE_SCALE / (def + DAMAGE_DEF_OFFSET)
pub const DAMAGE_SCALE: i32 = 10;
pub const DAMAGE_DEF_OFFSET: i32 = 5;

/// How far an enemy spots a player (Manhattan distance, strict less-than)
pub const ENEMY_SIGHT_RANGE: i32 = 7;

/// Enemy health roll, inclusive, multiplied by the floor number
pub const ENEMY_HP_MIN: i32 = 3;
pub const ENEMY_HP_MAX: i32 = 11;
/// Enemy attack roll, inclusive, multiplied by the floor number
pub const ENEMY_ATK_MIN: i32 = 1;
pub const ENEMY_ATK_MAX: i32 = 9;
/// Enemy defense roll, inclusive, multiplied by the floor number
pub const ENEMY_DEF_MIN: i32 = 1;
pub const ENEMY_DEF_MAX: i32 = 9;
/// Enemy speed roll, inclusive (not floor-scaled)
pub const ENEMY_SPD_MIN: i32 = 1;
pub const ENEMY_SPD_MAX: i32 = 3;

/// Boss arena elite scaling over a normal roll for the same floor
pub const ELITE_HP_MULTIPLIER: i32 = 3;
pub const ELITE_ATK_MULTIPLIER: i32 = 2;
pub const ELITE_DEF_MULTIPLIER: i32 = 2;
/// Elites never roll slower than this
pub const ELITE_MIN_SPD: i32 = 3;

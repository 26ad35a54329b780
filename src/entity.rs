//! The entities that occupy dungeon tiles.
//!
//! One closed enum covers everything a grid cell can hold. Combat, AI, and
//! presentation consumers pattern-match on the variant instead of inspecting
//! runtime types, and a `clone()` is a full deep copy: no variant shares
//! interior state, so handed-out copies can never reach back into the engine.

use rand::Rng;

use crate::constants::*;
use crate::position::Position;

/// Hit points and defense used for the immovable kinds (walls, stairs).
const IMMOVABLE_HP: i32 = 1000;
const IMMOVABLE_DEF: i32 = 1000;

/// Stat payload shared by every entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub max_hp: i32,
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub lvl: i32,
}

impl Stats {
    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// A party member under user control.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub stats: Stats,
    pub position: Position,
    /// Remaining action budget this turn, `0..=stats.spd`. Movement costs
    /// path length; an attack drains whatever is left.
    pub stamina: i32,
    pub exp: i32,
    /// Experience needed for the next level (`lvl * LEVEL_THRESHOLD_STEP`).
    pub level_threshold: i32,
    pub name: String,
}

impl Player {
    /// Roll a fresh level-1 party member.
    pub fn random(rng: &mut impl Rng, name: impl Into<String>) -> Self {
        let hp = rng.gen_range(PLAYER_HP_MIN..=PLAYER_HP_MAX);
        let spd = rng.gen_range(PLAYER_SPD_MIN..=PLAYER_SPD_MAX);
        Self {
            stats: Stats {
                max_hp: hp,
                hp,
                atk: rng.gen_range(PLAYER_ATK_MIN..=PLAYER_ATK_MAX),
                def: rng.gen_range(PLAYER_DEF_MIN..=PLAYER_DEF_MAX),
                spd,
                lvl: 1,
            },
            position: Position::new(0, 0),
            stamina: spd,
            exp: 0,
            level_threshold: LEVEL_THRESHOLD_STEP,
            name: name.into(),
        }
    }
}

/// A hostile unit. Decision logic lives in [`crate::systems::ai`].
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub stats: Stats,
    pub position: Position,
}

impl Enemy {
    /// Roll an enemy scaled to the floor number.
    pub fn random(rng: &mut impl Rng, floor: i32) -> Self {
        let scale = floor.max(1);
        let hp = rng.gen_range(ENEMY_HP_MIN..=ENEMY_HP_MAX) * scale;
        Self {
            stats: Stats {
                max_hp: hp,
                hp,
                atk: rng.gen_range(ENEMY_ATK_MIN..=ENEMY_ATK_MAX) * scale,
                def: rng.gen_range(ENEMY_DEF_MIN..=ENEMY_DEF_MAX) * scale,
                spd: rng.gen_range(ENEMY_SPD_MIN..=ENEMY_SPD_MAX),
                lvl: 1,
            },
            position: Position::new(0, 0),
        }
    }

    /// Roll the boss-arena elite: a floor-scaled enemy pushed harder.
    pub fn elite(rng: &mut impl Rng, floor: i32) -> Self {
        let mut enemy = Self::random(rng, floor);
        enemy.stats.max_hp *= ELITE_HP_MULTIPLIER;
        enemy.stats.hp = enemy.stats.max_hp;
        enemy.stats.atk *= ELITE_ATK_MULTIPLIER;
        enemy.stats.def *= ELITE_DEF_MULTIPLIER;
        enemy.stats.spd = enemy.stats.spd.max(ELITE_MIN_SPD);
        enemy
    }
}

/// Indestructible wall filler; blocks movement and sight.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub stats: Stats,
    pub position: Position,
}

impl Obstacle {
    pub fn wall(position: Position) -> Self {
        Self {
            stats: immovable_stats(),
            position,
        }
    }
}

/// The floor-transition trigger tile. Occupies its cell but lets sight pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Stairs {
    pub stats: Stats,
    pub position: Position,
}

impl Stairs {
    pub fn new(position: Position) -> Self {
        Self {
            stats: immovable_stats(),
            position,
        }
    }
}

fn immovable_stats() -> Stats {
    Stats {
        max_hp: IMMOVABLE_HP,
        hp: IMMOVABLE_HP,
        atk: 0,
        def: IMMOVABLE_DEF,
        spd: 0,
        lvl: 1,
    }
}

/// Everything a grid cell can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    Obstacle(Obstacle),
    Stairs(Stairs),
}

impl Entity {
    pub fn position(&self) -> Position {
        match self {
            Entity::Player(p) => p.position,
            Entity::Enemy(e) => e.position,
            Entity::Obstacle(o) => o.position,
            Entity::Stairs(s) => s.position,
        }
    }

    pub fn set_position(&mut self, pos: Position) {
        match self {
            Entity::Player(p) => p.position = pos,
            Entity::Enemy(e) => e.position = pos,
            Entity::Obstacle(o) => o.position = pos,
            Entity::Stairs(s) => s.position = pos,
        }
    }

    pub fn stats(&self) -> &Stats {
        match self {
            Entity::Player(p) => &p.stats,
            Entity::Enemy(e) => &e.stats,
            Entity::Obstacle(o) => &o.stats,
            Entity::Stairs(s) => &s.stats,
        }
    }

    /// Only walls stop sight; players, enemies, and stairs are see-through.
    pub fn blocks_sight(&self) -> bool {
        matches!(self, Entity::Obstacle(_))
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Entity::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Entity::Enemy(_))
    }

    pub fn is_stairs(&self) -> bool {
        matches!(self, Entity::Stairs(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_random_player_rolls_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..50 {
            let player = Player::random(&mut rng, "test");
            assert!((PLAYER_HP_MIN..=PLAYER_HP_MAX).contains(&player.stats.hp));
            assert!((PLAYER_ATK_MIN..=PLAYER_ATK_MAX).contains(&player.stats.atk));
            assert!((PLAYER_DEF_MIN..=PLAYER_DEF_MAX).contains(&player.stats.def));
            assert!((PLAYER_SPD_MIN..=PLAYER_SPD_MAX).contains(&player.stats.spd));
            assert_eq!(player.stats.lvl, 1);
            assert_eq!(player.stamina, player.stats.spd);
            assert_eq!(player.level_threshold, LEVEL_THRESHOLD_STEP);
        }
    }

    #[test]
    fn test_random_enemy_scales_with_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..50 {
            let enemy = Enemy::random(&mut rng, 4);
            assert!(enemy.stats.hp >= ENEMY_HP_MIN * 4);
            assert!(enemy.stats.hp <= ENEMY_HP_MAX * 4);
            assert!(enemy.stats.atk % 4 == 0);
            assert!((ENEMY_SPD_MIN..=ENEMY_SPD_MAX).contains(&enemy.stats.spd));
        }
    }

    #[test]
    fn test_elite_outclasses_base_roll() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let elite = Enemy::elite(&mut rng, 10);
        assert!(elite.stats.hp >= ENEMY_HP_MIN * 10 * ELITE_HP_MULTIPLIER);
        assert_eq!(elite.stats.hp, elite.stats.max_hp);
        assert!(elite.stats.spd >= ELITE_MIN_SPD);
    }

    #[test]
    fn test_only_obstacles_block_sight() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let pos = Position::new(3, 3);
        assert!(Entity::Obstacle(Obstacle::wall(pos)).blocks_sight());
        assert!(!Entity::Stairs(Stairs::new(pos)).blocks_sight());
        assert!(!Entity::Player(Player::random(&mut rng, "p")).blocks_sight());
        assert!(!Entity::Enemy(Enemy::random(&mut rng, 1)).blocks_sight());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let original = Entity::Player(Player::random(&mut rng, "p"));
        let mut copy = original.clone();
        copy.set_position(Position::new(9, 9));
        if let Entity::Player(p) = &mut copy {
            p.stats.hp = 1;
        }
        assert_ne!(original.position(), copy.position());
        assert_ne!(original.stats().hp, copy.stats().hp);
    }
}

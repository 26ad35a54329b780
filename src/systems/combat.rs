//! Combat resolution.

use rand::Rng;

use crate::constants::*;
use crate::entity::{Enemy, Player};
use crate::systems::experience;

/// Damage dealt by an attacker with `atk` against a defender with `def`.
pub fn damage(atk: i32, def: i32) -> i32 {
    (atk * DAMAGE_SCALE / (def + DAMAGE_DEF_OFFSET)).max(0)
}

/// Outcome of a resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub killed: bool,
    /// Experience the attacker earned; only players earn any.
    pub exp_gained: i32,
    /// New level, when the earned experience crossed a threshold.
    pub new_level: Option<i32>,
}

/// Resolve one player attack against an enemy.
///
/// A kill awards 30-50 experience and may level the player up.
pub fn resolve_player_attack(
    player: &mut Player,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AttackOutcome {
    let dealt = damage(player.stats.atk, enemy.stats.def);
    enemy.stats.hp -= dealt;

    let killed = enemy.stats.is_dead();
    let mut exp_gained = 0;
    let mut new_level = None;
    if killed {
        exp_gained = rng.gen_range(KILL_EXP_MIN..=KILL_EXP_MAX);
        new_level = experience::grant_exp(player, exp_gained);
    }

    tracing::debug!(name = %player.name, damage = dealt, killed, "player attack");
    AttackOutcome {
        damage: dealt,
        killed,
        exp_gained,
        new_level,
    }
}

/// Resolve one enemy attack against a player.
pub fn resolve_enemy_attack(enemy: &Enemy, player: &mut Player) -> AttackOutcome {
    let dealt = damage(enemy.stats.atk, player.stats.def);
    player.stats.hp -= dealt;

    tracing::debug!(name = %player.name, damage = dealt, "enemy attack");
    AttackOutcome {
        damage: dealt,
        killed: player.stats.is_dead(),
        exp_gained: 0,
        new_level: None,
    }
}

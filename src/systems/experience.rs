//! Experience and leveling.

use crate::constants::LEVEL_THRESHOLD_STEP;
use crate::entity::Player;

/// Add experience to a player, chaining level-ups past each threshold.
///
/// Experience is cumulative and never reset; each level moves the threshold
/// to `lvl * LEVEL_THRESHOLD_STEP`. Returns the new level when at least one
/// level was gained.
pub fn grant_exp(player: &mut Player, amount: i32) -> Option<i32> {
    player.exp += amount;
    let mut leveled = false;
    while player.exp >= player.level_threshold {
        level_up(player);
        leveled = true;
    }
    leveled.then_some(player.stats.lvl)
}

/// Raise the player one level, scaling stats by new/old level.
fn level_up(player: &mut Player) {
    let old = player.stats.lvl;
    let new = old + 1;

    let stats = &mut player.stats;
    stats.lvl = new;
    // multiply before dividing so integer stats keep their precision
    stats.max_hp = stats.max_hp * new / old;
    stats.hp = stats.hp * new / old;
    stats.atk = stats.atk * new / old;
    stats.def = stats.def * new / old;

    player.level_threshold = new * LEVEL_THRESHOLD_STEP;
    tracing::info!(name = %player.name, level = new, "level up");
}

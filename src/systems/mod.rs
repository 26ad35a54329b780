//! Game rule systems: combat resolution, experience, and enemy AI.

pub mod ai;
pub mod combat;
pub mod experience;

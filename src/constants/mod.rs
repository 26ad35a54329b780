//! Engine constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod combat;
mod dungeon;
mod gameplay;

// Re-export all constants at the module level
pub use combat::*;
pub use dungeon::*;
pub use gameplay::*;

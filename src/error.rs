//! Engine error types.

use thiserror::Error;

/// Construction-time validation failures.
///
/// Play-time invalid actions are not errors: [`crate::Map::process_action`]
/// rejects them silently with no state change. Building a map is the only
/// fallible public operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("map dimensions {width}x{height} are below the {min}x{min} minimum")]
    MapTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },

    #[error("party size must be at least 1")]
    EmptyParty,
}

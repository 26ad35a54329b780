//! Field of view via recursive shadowcasting.
//!
//! The algorithm divides the field of view into 8 octants and scans each one
//! row by row, tracking the angular interval that is still lit. It is more
//! accurate than raycasting (no missed corners) and faster (O(visible tiles)
//! instead of O(rays × radius)).

use std::collections::HashSet;

use crate::pathfinding::TileMap;
use crate::position::Position;

/// All positions visible from `origin` within `range`.
///
/// `range <= 0` means unlimited: the sweep runs until every octant is fully
/// in shadow, which any bounded map guarantees because out-of-bounds tiles
/// are opaque. The origin is always visible, and so are the opaque tiles
/// that terminate sight lines (walls light up when you can see them).
pub fn visibility(map: &impl TileMap, origin: Position, range: i32) -> HashSet<Position> {
    let mut visible = HashSet::new();
    visible.insert(origin);

    for octant in 0..8 {
        cast_light(map, &mut visible, origin, range, 1, 1.0, 0.0, octant);
    }

    visible
}

/// Whether `to` is visible from `from`, at unlimited range.
///
/// Callers checking many targets from one origin should call [`visibility`]
/// once and query the returned set instead of paying for a full sweep per
/// target.
pub fn line_of_sight(map: &impl TileMap, from: Position, to: Position) -> bool {
    visibility(map, from, -1).contains(&to)
}

/// Transform (row, col) coordinates based on octant to get (dx, dy).
///
/// Octants are numbered 0-7, starting from the top and going clockwise:
///   \1|2/
///   0\|/3
///   --@--
///   7/|\4
///   /6|5\
#[inline]
fn transform(octant: u8, row: i32, col: i32) -> (i32, i32) {
    match octant {
        0 => (-col, -row),
        1 => (-row, -col),
        2 => (-row, col),
        3 => (col, -row),
        4 => (col, row),
        5 => (row, col),
        6 => (row, -col),
        7 => (-col, row),
        _ => unreachable!(),
    }
}

/// Recursively cast light in one octant.
///
/// - `row`: current row being scanned (distance from origin)
/// - `start_slope`: slope of the wide edge of the lit interval (1.0 = 45°)
/// - `end_slope`: slope of the narrow edge (0.0 = straight along the axis)
///
/// An opaque tile narrows the interval; a run of opaque tiles followed by an
/// open one splits it, recursing into the part that stays lit.
#[allow(clippy::too_many_arguments)]
fn cast_light(
    map: &impl TileMap,
    visible: &mut HashSet<Position>,
    origin: Position,
    range: i32,
    row: i32,
    mut start_slope: f32,
    end_slope: f32,
    octant: u8,
) {
    if start_slope < end_slope {
        return;
    }
    if range > 0 && row > range {
        return;
    }

    let mut prev_blocked = false;
    let mut saved_start_slope = start_slope;

    // scan columns in this row from start_slope to end_slope
    let min_col = (row as f32 * end_slope).floor() as i32;
    let max_col = (row as f32 * start_slope).ceil() as i32;

    for col in (min_col..=max_col).rev() {
        let (dx, dy) = transform(octant, row, col);
        let pos = origin.moved(dx, dy);

        if range > 0 && dx * dx + dy * dy > range * range {
            continue;
        }

        let left_slope = (col as f32 + 0.5) / (row as f32 - 0.5);
        let right_slope = (col as f32 - 0.5) / (row as f32 + 0.5);

        // skip tiles entirely outside the lit interval
        if right_slope > start_slope {
            continue;
        }
        if left_slope < end_slope {
            break;
        }

        visible.insert(pos);

        let is_blocked = !map.transparent(pos);

        if prev_blocked {
            if is_blocked {
                // still in shadow; remember where it would end
                saved_start_slope = right_slope;
            } else {
                prev_blocked = false;
                start_slope = saved_start_slope;
            }
        } else if is_blocked {
            // entering shadow: recurse into the lit part before this blocker
            prev_blocked = true;
            cast_light(
                map,
                visible,
                origin,
                range,
                row + 1,
                start_slope,
                left_slope,
                octant,
            );
            saved_start_slope = right_slope;
        }
    }

    // continue to the next row unless this one ended in shadow
    if !prev_blocked {
        cast_light(
            map,
            visible,
            origin,
            range,
            row + 1,
            start_slope,
            end_slope,
            octant,
        );
    }
}

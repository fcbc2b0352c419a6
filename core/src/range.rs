//! Movement and attack reach under Manhattan distance.
//!
//! Both functions walk the board row-major from the top-left of the bounding
//! square, so callers that take "the first match" get a stable order. Results
//! reflect the grid at call time and must be recomputed after any mutation.

use alloc::vec::Vec;

use crate::config::GRID_SIZE;
use crate::grid::Grid;
use crate::types::Position;

fn manhattan_area(origin: Position, radius: u8) -> impl Iterator<Item = Position> {
    let max = GRID_SIZE - 1;
    let row_lo = origin.row.saturating_sub(radius);
    let row_hi = origin.row.saturating_add(radius).min(max);
    let col_lo = origin.col.saturating_sub(radius);
    let col_hi = origin.col.saturating_add(radius).min(max);
    (row_lo..=row_hi)
        .flat_map(move |row| (col_lo..=col_hi).map(move |col| Position::new(row, col)))
        .filter(move |pos| pos.distance(origin) <= radius as u32)
}

/// Cells a unit at `origin` may move to: within `radius`, on the board, unoccupied.
///
/// Only the destination is checked; units do not block the path.
pub fn move_range(grid: &Grid, origin: Position, radius: u8) -> Vec<Position> {
    manhattan_area(origin, radius)
        .filter(|pos| !grid.is_occupied(*pos))
        .collect()
}

/// Cells reachable by an attack from `origin`, occupied or not
pub fn attack_range(origin: Position, radius: u8) -> Vec<Position> {
    manhattan_area(origin, radius).collect()
}

/// Whether `pos` appears in a computed range
pub fn contains(range: &[Position], pos: Position) -> bool {
    range.iter().any(|p| *p == pos)
}

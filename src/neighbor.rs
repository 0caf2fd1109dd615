//! Sibling lookups and k-ring traversal.
//!
//! Moving off the edge of the grid is not an error: it produces `None`, and ring
//! positions that fall off the grid are left out of the ring.

use crate::codec::{cell_to_tile, encode};
use crate::error::{QuadbinError, Result};
use quadbin_types::{RingCell, Tile};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Cardinal direction of a sibling. North is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Left,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Left,
        Direction::Down,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
        }
    }
}

impl FromStr for Direction {
    type Err = QuadbinError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            "down" => Ok(Direction::Down),
            _ => Err(QuadbinError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moves `steps` tiles in `direction`, or returns `None` if that leaves the grid.
fn walk(tile: Tile, direction: Direction, steps: u64) -> Option<Tile> {
    let dim = tile.dim();
    let (x, y) = (u64::from(tile.x), u64::from(tile.y));

    let (x, y) = match direction {
        Direction::Left => (x.checked_sub(steps)?, y),
        Direction::Up => (x, y.checked_sub(steps)?),
        Direction::Right => (x.checked_add(steps).filter(|&x| x < dim)?, y),
        Direction::Down => (x, y.checked_add(steps).filter(|&y| y < dim)?),
    };
    Some(Tile::new(x as u32, y as u32, tile.z))
}

/// Tile displaced by `dx` columns and `dy` rows, horizontal leg first.
fn offset(tile: Tile, dx: i64, dy: i64) -> Option<Tile> {
    let horizontal = if dx < 0 { Direction::Left } else { Direction::Right };
    let vertical = if dy < 0 { Direction::Up } else { Direction::Down };

    walk(tile, horizontal, dx.unsigned_abs())
        .and_then(|tile| walk(tile, vertical, dy.unsigned_abs()))
}

/// The adjacent tile in `direction`, or `None` at the edge of the grid.
///
/// Resolution 0 has no siblings at all.
pub fn tile_sibling(tile: Tile, direction: Direction) -> Option<Tile> {
    walk(tile, direction, 1)
}

/// The adjacent cell in `direction`, or `None` at the edge of the grid.
///
/// # Examples
///
/// ```
/// use quadbin::neighbor::{cell_sibling, Direction};
///
/// assert_eq!(cell_sibling(5209574053332910079, Direction::Up), Some(5208061125333090303));
/// assert_eq!(cell_sibling(5192650370358181887, Direction::Up), None);
/// ```
pub fn cell_sibling(cell: u64, direction: Direction) -> Option<u64> {
    tile_sibling(cell_to_tile(cell), direction).map(encode)
}

/// The existing siblings of `cell` in [`Direction::ALL`] order.
pub fn cell_neighbors(cell: u64) -> SmallVec<[u64; 4]> {
    Direction::ALL
        .iter()
        .filter_map(|&direction| cell_sibling(cell, direction))
        .collect()
}

/// Row-major sweep over the `(2k+1) x (2k+1)` block centered on `origin`.
fn sweep(origin: u64, k: i32) -> Result<Vec<RingCell>> {
    if k < 0 {
        return Err(QuadbinError::InvalidDistance(k));
    }

    let tile = cell_to_tile(origin);
    let dim = tile.dim();
    // Offsets past the grid size can only fall off it.
    let reach = i64::from(k).min(dim as i64);
    let side = (2 * reach + 1) as u64;

    let mut cells = Vec::with_capacity(side.saturating_mul(side).min(dim * dim) as usize);
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if let Some(neighbor) = offset(tile, dx, dy) {
                let distance = dx.unsigned_abs().max(dy.unsigned_abs()) as u32;
                cells.push(RingCell::new(encode(neighbor), distance));
            }
        }
    }
    Ok(cells)
}

/// Cells within Chebyshev distance `k` of `origin`, in row-major order from the
/// north-west corner.
///
/// Away from the grid edges the result holds `(2k+1)^2` cells.
///
/// # Errors
///
/// `InvalidDistance` if `k` is negative.
pub fn k_ring(origin: u64, k: i32) -> Result<Vec<u64>> {
    Ok(sweep(origin, k)?.into_iter().map(|cell| cell.index).collect())
}

/// Like [`k_ring`], pairing every cell with its distance from `origin`.
pub fn k_ring_distances(origin: u64, k: i32) -> Result<Vec<RingCell>> {
    sweep(origin, k)
}

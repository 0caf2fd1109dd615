//! Quadbin cell codec.
//!
//! A cell index packs a tile into a single `u64` (most significant bit first):
//!
//! | bits  | field                                                      |
//! |-------|------------------------------------------------------------|
//! | 63    | unused, always 0                                           |
//! | 62    | header, always 1                                           |
//! | 61-59 | mode (1 = cell)                                            |
//! | 58-57 | mode-dependent extra bits, 0 for cells                     |
//! | 56-52 | resolution `z`                                             |
//! | 51-0  | interleaved `(x, y)` Morton code, then `52 - 2z` footer 1s |

use crate::error::{QuadbinError, Result};
use quadbin_types::Tile;

/// Finest supported resolution.
pub const MAX_RESOLUTION: u8 = 26;

pub const HEADER: u64 = 0x4000_0000_0000_0000;

/// Mode field value of a cell.
pub const CELL_MODE: u64 = 1;

/// The 52 position/footer bits.
pub const FOOTER: u64 = 0x000F_FFFF_FFFF_FFFF;

const MODE_SHIFT: u32 = 59;
const RESOLUTION_SHIFT: u32 = 52;
const RESOLUTION_MASK: u64 = 0x1F;

/// Interleave masks and the shifts that go with them.
const B: [u64; 6] = [
    0x5555_5555_5555_5555,
    0x3333_3333_3333_3333,
    0x0F0F_0F0F_0F0F_0F0F,
    0x00FF_00FF_00FF_00FF,
    0x0000_FFFF_0000_FFFF,
    0x0000_0000_FFFF_FFFF,
];
const S: [u32; 5] = [1, 2, 4, 8, 16];

/// Low-order padding bits for a resolution.
#[inline]
const fn footer(resolution: u8) -> u64 {
    FOOTER >> (2 * resolution as u32)
}

#[inline]
fn mode(index: u64) -> u64 {
    (index >> MODE_SHIFT) & 7
}

/// Returns true if `index` is a well-formed value of the Quadbin family (any mode
/// from 0 to 6).
pub fn is_valid_index(index: u64) -> bool {
    let resolution = get_resolution(index);
    let unused = footer(resolution);

    index >> 63 == 0
        && index & HEADER == HEADER
        && mode(index) <= 6
        && resolution <= MAX_RESOLUTION
        && index & unused == unused
}

/// Returns true if `cell` is a valid index in cell mode.
///
/// # Examples
///
/// ```
/// use quadbin::codec::is_valid_cell;
///
/// assert!(is_valid_cell(5209574053332910079));
/// assert!(!is_valid_cell(5209574053332910078));
/// assert!(!is_valid_cell(0));
/// ```
pub fn is_valid_cell(cell: u64) -> bool {
    is_valid_index(cell) && mode(cell) == CELL_MODE
}

/// Extracts the resolution field.
///
/// This is a plain bit extraction and works on any `u64`, valid or not.
#[inline]
pub fn get_resolution(index: u64) -> u8 {
    ((index >> RESOLUTION_SHIFT) & RESOLUTION_MASK) as u8
}

/// Decodes a cell into its tile.
pub fn cell_to_tile(cell: u64) -> Tile {
    let z = get_resolution(cell);
    let q = (cell & FOOTER) << 12;

    let mut x = q & B[0];
    let mut y = (q >> 1) & B[0];

    x = (x | (x >> S[0])) & B[1];
    y = (y | (y >> S[0])) & B[1];

    x = (x | (x >> S[1])) & B[2];
    y = (y | (y >> S[1])) & B[2];

    x = (x | (x >> S[2])) & B[3];
    y = (y | (y >> S[2])) & B[3];

    x = (x | (x >> S[3])) & B[4];
    y = (y | (y >> S[3])) & B[4];

    x = (x | (x >> S[4])) & B[5];
    y = (y | (y >> S[4])) & B[5];

    let shift = 32 - u32::from(z);
    Tile::new((x >> shift) as u32, (y >> shift) as u32, z)
}

/// Encodes a tile into a cell.
///
/// # Errors
///
/// `InvalidResolution` when `z > 26`, `InvalidInput` when the tile is off the grid.
///
/// # Examples
///
/// ```
/// use quadbin::{codec::tile_to_cell, Tile};
///
/// assert_eq!(tile_to_cell(Tile::new(9, 8, 4))?, 5209574053332910079);
/// # Ok::<(), quadbin::QuadbinError>(())
/// ```
pub fn tile_to_cell(tile: Tile) -> Result<u64> {
    if tile.z > MAX_RESOLUTION {
        return Err(QuadbinError::resolution_out_of_range(tile.z));
    }
    if !tile.is_valid() {
        return Err(QuadbinError::InvalidInput(format!(
            "Tile {} lies outside the {}x{} grid",
            tile,
            tile.dim(),
            tile.dim()
        )));
    }
    Ok(encode(tile))
}

/// Encodes a tile that is known to be valid.
pub(crate) fn encode(tile: Tile) -> u64 {
    let shift = 32 - u32::from(tile.z);
    let mut x = u64::from(tile.x) << shift;
    let mut y = u64::from(tile.y) << shift;

    x = (x | (x << S[4])) & B[4];
    y = (y | (y << S[4])) & B[4];

    x = (x | (x << S[3])) & B[3];
    y = (y | (y << S[3])) & B[3];

    x = (x | (x << S[2])) & B[2];
    y = (y | (y << S[2])) & B[2];

    x = (x | (x << S[1])) & B[1];
    y = (y | (y << S[1])) & B[1];

    x = (x | (x << S[0])) & B[0];
    y = (y | (y << S[0])) & B[0];

    HEADER
        | (CELL_MODE << MODE_SHIFT)
        | (u64::from(tile.z) << RESOLUTION_SHIFT)
        | ((x | (y << 1)) >> 12)
        | footer(tile.z)
}

/// Rewrites the resolution field and footer of `cell`.
#[inline]
fn with_resolution(cell: u64, resolution: u8) -> u64 {
    (cell & !(RESOLUTION_MASK << RESOLUTION_SHIFT))
        | (u64::from(resolution) << RESOLUTION_SHIFT)
        | footer(resolution)
}

/// Computes the ancestor of `cell` at `parent_resolution`.
///
/// Position bits finer than the parent resolution are overwritten with footer
/// padding, so the result is the canonical encoding of the enclosing tile.
///
/// # Errors
///
/// `InvalidResolution` if `parent_resolution` is finer than the cell's own.
pub fn cell_to_parent(cell: u64, parent_resolution: u8) -> Result<u64> {
    let resolution = get_resolution(cell);
    if parent_resolution > resolution {
        return Err(QuadbinError::InvalidResolution(format!(
            "parent resolution {} is finer than cell resolution {}",
            parent_resolution, resolution
        )));
    }
    Ok(with_resolution(cell, parent_resolution))
}

/// Computes every descendant of `cell` at `child_resolution`, in ascending order.
///
/// # Errors
///
/// `InvalidResolution` unless `resolution(cell) < child_resolution <= 26`.
pub fn cell_to_children(cell: u64, child_resolution: u8) -> Result<Vec<u64>> {
    cell_to_children_iter(cell, child_resolution).map(|children| children.collect())
}

/// Lazy form of [`cell_to_children`].
pub fn cell_to_children_iter(
    cell: u64,
    child_resolution: u8,
) -> Result<impl Iterator<Item = u64>> {
    let resolution = get_resolution(cell);
    if child_resolution > MAX_RESOLUTION {
        return Err(QuadbinError::resolution_out_of_range(child_resolution));
    }
    if child_resolution <= resolution {
        return Err(QuadbinError::InvalidResolution(format!(
            "child resolution {} is not finer than cell resolution {}",
            child_resolution, resolution
        )));
    }

    let diff = u32::from(child_resolution - resolution);
    let base = with_resolution(cell & !footer(resolution), child_resolution);
    let low = 52 - 2 * u32::from(child_resolution);

    Ok((0..1u64 << (2 * diff)).map(move |bits| base | (bits << low)))
}

/// Renders an index as lowercase hexadecimal without a prefix.
pub fn index_to_string(index: u64) -> String {
    format!("{:x}", index)
}

/// Parses a hexadecimal index. A leading `0x` is accepted.
pub fn string_to_index(index: &str) -> Result<u64> {
    let digits = index
        .strip_prefix("0x")
        .or_else(|| index.strip_prefix("0X"))
        .unwrap_or(index);

    u64::from_str_radix(digits, 16).map_err(|e| {
        QuadbinError::InvalidInput(format!("'{}' is not a hexadecimal index: {}", index, e))
    })
}

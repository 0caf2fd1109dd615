//! Approximate cell area on a spherical Earth.
//!
//! The estimate is O(1): a per-resolution factor gives the area of a cell next
//! to the equator, and cells further north or south are scaled by the squared
//! Mercator distortion ratio between their center and the equatorial row.

use crate::codec::cell_to_tile;
use crate::mercator::tile_to_latitude;
use quadbin_types::Tile;
use std::f64::consts::PI;

/// Spherical Earth radius in meters (WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Surface of the reference sphere in square meters.
const REFERENCE_AREA: f64 = 4.0 * PI * EARTH_RADIUS * EARTH_RADIUS;

/// Area of an equator-adjacent cell at resolution `z`, as a multiple of
/// `REFERENCE_AREA / 4^z`. Converges on π as cells become small enough to be
/// square on the sphere.
static AREA_FACTORS: [f64; 21] = [
    0.9962720762207499,
    0.9962720762207499,
    1.8343046713345486,
    2.623176810530689,
    2.9894779832097216,
    3.1018329300334195,
    3.1315382257664774,
    3.1390717859902124,
    3.140961981240404,
    3.1414349570107896,
    3.141553227663928,
    3.141582796997034,
    3.141590189434542,
    3.1415920375502346,
    3.1415924995802422,
    3.1415926150834754,
    3.1415926439596418,
    3.1415926511865413,
    3.1415926529689795,
    3.141592653377444,
    3.1415926535709926,
];

/// First row south of the equator at this zoom level.
#[inline]
fn equator_row(z: u8) -> u32 {
    if z == 0 { 0 } else { 1 << (z - 1) }
}

/// Approximate area of a cell in square meters.
///
/// Exact for resolutions 0 and 1 and for the two rows touching the equator. Off
/// the equator the error is under 4% from resolution 4 upwards and shrinks
/// quickly with resolution; the coarse resolutions 2 and 3 are the least precise.
pub fn cell_area(cell: u64) -> f64 {
    let tile = cell_to_tile(cell);
    let z = tile.z;

    let factor = AREA_FACTORS[usize::from(z).min(AREA_FACTORS.len() - 1)];
    let area = REFERENCE_AREA / 4f64.powi(i32::from(z)) * factor;

    let equator = equator_row(z);
    if z == 0 || tile.y == equator || tile.y + 1 == equator {
        return area;
    }

    let center = tile_to_latitude(&tile, 0.5).to_radians().cos();
    let reference = tile_to_latitude(&Tile::new(tile.x, equator, z), 0.5)
        .to_radians()
        .cos();
    area * (center * center) / (reference * reference)
}

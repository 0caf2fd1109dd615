//! Spherical Web Mercator tile math.
//!
//! Conversions between geographic coordinates (longitude/latitude in decimal
//! degrees) and slippy-map tile coordinates at a given zoom level.

use crate::codec::MAX_RESOLUTION;
use crate::error::{QuadbinError, Result};
use quadbin_types::Tile;
use std::f64::consts::PI;

pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LONGITUDE: f64 = -MAX_LONGITUDE;

/// Northern limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051129;
pub const MIN_LATITUDE: f64 = -MAX_LATITUDE;

/// Limit a number to `[lower, upper]`.
#[inline]
pub fn clip_number(num: f64, lower: f64, upper: f64) -> f64 {
    num.clamp(lower, upper)
}

#[inline]
pub fn clip_longitude(longitude: f64) -> f64 {
    clip_number(longitude, MIN_LONGITUDE, MAX_LONGITUDE)
}

/// Limit latitude to the Web Mercator bounds.
#[inline]
pub fn clip_latitude(latitude: f64) -> f64 {
    clip_number(latitude, MIN_LATITUDE, MAX_LATITUDE)
}

/// Fraction of the way down the Mercator square, 0 at the northern edge and 1 at
/// the southern edge.
#[inline]
fn mercator_y(latitude: f64) -> f64 {
    0.5 - (PI / 4.0 + latitude * PI / 360.0).tan().ln() / (2.0 * PI)
}

/// Computes the tile containing a point at zoom level `z`.
///
/// Latitude is clipped to the Web Mercator band and the row is clamped onto the
/// grid, so the poles land in the first or last row. Longitude is not clipped:
/// the column wraps around the antimeridian instead.
///
/// # Errors
///
/// `InvalidResolution` if `z > 26`.
///
/// # Examples
///
/// ```
/// use quadbin::mercator::point_to_tile;
/// use quadbin::Tile;
///
/// assert_eq!(point_to_tile(33.75, -11.178401873711776, 4)?, Tile::new(9, 8, 4));
/// assert_eq!(point_to_tile(-185.0, 85.0, 2)?, Tile::new(3, 0, 2));
/// # Ok::<(), quadbin::QuadbinError>(())
/// ```
pub fn point_to_tile(longitude: f64, latitude: f64, z: u8) -> Result<Tile> {
    check_zoom(z)?;
    Ok(point_to_tile_within(longitude, latitude, z, MAX_LATITUDE))
}

fn check_zoom(z: u8) -> Result<()> {
    if z > MAX_RESOLUTION {
        return Err(QuadbinError::resolution_out_of_range(z));
    }
    Ok(())
}

pub(crate) fn point_to_tile_within(
    longitude: f64,
    latitude: f64,
    z: u8,
    max_latitude: f64,
) -> Tile {
    let latitude = clip_number(latitude, -max_latitude, max_latitude);
    let n = 1i64 << z;
    let dim = n as f64;

    let x = (dim * (longitude / 360.0 + 0.5)).floor() as i64;
    let y = (dim * mercator_y(latitude)).floor() as i64;

    Tile::new(x.rem_euclid(n) as u32, y.clamp(0, n - 1) as u32, z)
}

/// Computes the unfloored tile position of a point at zoom level `z`.
///
/// Both coordinates are clipped first, so each component lies in `[0, 2^z]`.
///
/// # Errors
///
/// `InvalidResolution` if `z > 26`.
pub fn point_to_tile_fraction(longitude: f64, latitude: f64, z: u8) -> Result<(f64, f64)> {
    check_zoom(z)?;
    Ok(point_to_tile_fraction_within(longitude, latitude, z, MAX_LATITUDE))
}

pub(crate) fn point_to_tile_fraction_within(
    longitude: f64,
    latitude: f64,
    z: u8,
    max_latitude: f64,
) -> (f64, f64) {
    let longitude = clip_longitude(longitude);
    let latitude = clip_number(latitude, -max_latitude, max_latitude);
    let dim = (1u64 << z) as f64;

    let x = dim * (longitude / 360.0 + 0.5);
    let y = dim * mercator_y(latitude);
    (x, y)
}

/// Longitude of a point inside a tile.
///
/// `offset` runs from 0 (western edge) through 0.5 (center) to 1 (eastern edge).
pub fn tile_to_longitude(tile: &Tile, offset: f64) -> f64 {
    let dim = tile.dim() as f64;
    180.0 * (2.0 * (f64::from(tile.x) + offset) / dim - 1.0)
}

/// Latitude of a point inside a tile.
///
/// `offset` runs from 0 (northern edge) through 0.5 (center) to 1 (southern edge).
pub fn tile_to_latitude(tile: &Tile, offset: f64) -> f64 {
    let dim = tile.dim() as f64;
    let expy = (-(2.0 * (f64::from(tile.y) + offset) / dim - 1.0) * PI).exp();
    360.0 * (expy.atan() / PI - 0.25)
}

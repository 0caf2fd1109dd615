//! Geographic views of a cell: center point, boundary and bounding box, plus the
//! point-to-cell entry point.

use crate::codec::{MAX_RESOLUTION, cell_to_tile, encode};
use crate::error::{QuadbinError, Result};
use crate::mercator::{self, MAX_LATITUDE, clip_longitude, tile_to_latitude, tile_to_longitude};
use geo::{LineString, Point, Polygon, coord};

/// Converts a point into the cell containing it at `resolution`.
///
/// Out-of-range coordinates are clipped, never rejected.
///
/// # Errors
///
/// `InvalidResolution` if `resolution > 26`.
///
/// # Examples
///
/// ```
/// use quadbin::cell::point_to_cell;
///
/// assert_eq!(point_to_cell(33.75, -11.178401873711776, 4)?, 5209574053332910079);
/// assert!(point_to_cell(33.75, -11.178401873711776, 27).is_err());
/// # Ok::<(), quadbin::QuadbinError>(())
/// ```
pub fn point_to_cell(longitude: f64, latitude: f64, resolution: u8) -> Result<u64> {
    point_to_cell_within(longitude, latitude, resolution, MAX_LATITUDE)
}

pub(crate) fn point_to_cell_within(
    longitude: f64,
    latitude: f64,
    resolution: u8,
    max_latitude: f64,
) -> Result<u64> {
    if resolution > MAX_RESOLUTION {
        return Err(QuadbinError::resolution_out_of_range(resolution));
    }

    let tile = mercator::point_to_tile_within(
        clip_longitude(longitude),
        latitude,
        resolution,
        max_latitude,
    );
    Ok(encode(tile))
}

/// Center of the cell as a `(longitude, latitude)` point.
pub fn cell_to_point(cell: u64) -> Point {
    let tile = cell_to_tile(cell);
    Point::new(tile_to_longitude(&tile, 0.5), tile_to_latitude(&tile, 0.5))
}

/// Bounding box of the cell in degrees, as `[xmin, ymin, xmax, ymax]`.
pub fn cell_to_bounding_box(cell: u64) -> [f64; 4] {
    let tile = cell_to_tile(cell);

    let xmin = tile_to_longitude(&tile, 0.0);
    let xmax = tile_to_longitude(&tile, 1.0);
    let ymin = tile_to_latitude(&tile, 1.0);
    let ymax = tile_to_latitude(&tile, 0.0);

    [xmin, ymin, xmax, ymax]
}

/// Boundary of the cell as a closed ring starting at the north-west corner and
/// running counter-clockwise (NW, SW, SE, NE, NW).
pub fn cell_to_boundary(cell: u64) -> Polygon {
    let [xmin, ymin, xmax, ymax] = cell_to_bounding_box(cell);

    let ring = LineString::new(vec![
        coord! { x: xmin, y: ymax },
        coord! { x: xmin, y: ymin },
        coord! { x: xmax, y: ymin },
        coord! { x: xmax, y: ymax },
        coord! { x: xmin, y: ymax },
    ]);
    Polygon::new(ring, vec![])
}

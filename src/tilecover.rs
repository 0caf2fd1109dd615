//! Tile covers of geometries.
//!
//! Points map to the tile containing them. Lines are traced tile by tile with a
//! grid-traversal DDA: at every step the walk crosses whichever grid line
//! (vertical or horizontal) is closer along the segment. Polygons trace their
//! rings the same way, remember where each ring crosses into a new row, and fill
//! the row spans between sorted pairs of crossings.

use crate::codec::{MAX_RESOLUTION, encode};
use crate::error::{QuadbinError, Result};
use crate::mercator::{
    MAX_LATITUDE, clip_longitude, point_to_tile_fraction_within, point_to_tile_within,
};
use geo::{Coord, Geometry, Polygon};
use quadbin_types::Tile;
use rustc_hash::FxHashSet;

/// Grid position in tile units. Ring tracing can step one tile past the grid
/// edge, so positions are kept signed until they become tiles.
type GridPos = (i64, i64);

/// Computes the distinct tiles intersecting `geometry` at `resolution`, sorted by
/// column, then row.
///
/// Supported geometries are points, lines, polygons, their multi-part forms and
/// collections of any of these.
///
/// # Errors
///
/// `InvalidResolution` if `resolution > 26`, `UnsupportedGeometryType` for
/// `Line`, `Rect` and `Triangle` geometries.
pub fn geometry_to_tiles(geometry: &Geometry, resolution: u8) -> Result<Vec<Tile>> {
    let mut tiles: Vec<Tile> = cover(geometry, resolution, MAX_LATITUDE, None)?
        .into_iter()
        .collect();
    tiles.sort_unstable();
    Ok(tiles)
}

/// Computes the distinct cells intersecting `geometry` at `resolution`, in
/// ascending order.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, point};
/// use quadbin::tilecover::geometry_to_cells;
///
/// let madrid = Geometry::Point(point! { x: -3.71219873428345, y: 40.413365349070865 });
/// assert_eq!(geometry_to_cells(&madrid, 10)?, vec![5234261499580514303]);
/// # Ok::<(), quadbin::QuadbinError>(())
/// ```
pub fn geometry_to_cells(geometry: &Geometry, resolution: u8) -> Result<Vec<u64>> {
    cover_cells(geometry, resolution, MAX_LATITUDE, None)
}

pub(crate) fn cover_cells(
    geometry: &Geometry,
    resolution: u8,
    max_latitude: f64,
    limit: Option<usize>,
) -> Result<Vec<u64>> {
    let mut cells: Vec<u64> = cover(geometry, resolution, max_latitude, limit)?
        .into_iter()
        .map(encode)
        .collect();
    cells.sort_unstable();
    Ok(cells)
}

fn cover(
    geometry: &Geometry,
    resolution: u8,
    max_latitude: f64,
    limit: Option<usize>,
) -> Result<FxHashSet<Tile>> {
    if resolution > MAX_RESOLUTION {
        return Err(QuadbinError::resolution_out_of_range(resolution));
    }

    let mut cover = TileCover::new(resolution, max_latitude, limit);
    cover.add_geometry(geometry)?;

    if cover.overflowed {
        let limit = limit.unwrap_or_default();
        log::warn!(
            "Rejecting {} cover at resolution {}: more than {} cells",
            geometry_type(geometry),
            resolution,
            limit
        );
        return Err(QuadbinError::CoverTooLarge { limit, resolution });
    }

    log::debug!(
        "Covered {} with {} tiles at resolution {}",
        geometry_type(geometry),
        cover.tiles.len(),
        resolution
    );
    Ok(cover.tiles)
}

fn geometry_type(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Accumulates the tiles of one cover.
struct TileCover {
    zoom: u8,
    /// Highest grid coordinate on either axis
    max_coord: i64,
    max_latitude: f64,
    limit: Option<usize>,
    overflowed: bool,
    tiles: FxHashSet<Tile>,
}

impl TileCover {
    fn new(zoom: u8, max_latitude: f64, limit: Option<usize>) -> Self {
        Self {
            zoom,
            max_coord: (1i64 << zoom) - 1,
            max_latitude,
            limit,
            overflowed: false,
            tiles: FxHashSet::default(),
        }
    }

    fn add_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        match geometry {
            Geometry::Point(point) => self.add_point(point.0),
            Geometry::MultiPoint(points) => {
                for point in points {
                    self.add_point(point.0);
                }
            }
            Geometry::LineString(line) => self.add_line(&line.0, None),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line(&line.0, None);
                }
            }
            Geometry::Polygon(polygon) => self.add_polygon(polygon),
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    self.add_polygon(polygon);
                }
            }
            Geometry::GeometryCollection(collection) => {
                for member in collection {
                    self.add_geometry(member)?;
                }
            }
            Geometry::Line(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                return Err(QuadbinError::UnsupportedGeometryType(
                    geometry_type(geometry).to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Records a grid position, clamped onto the grid.
    fn insert(&mut self, (x, y): GridPos) {
        if self.overflowed {
            return;
        }
        let tile = Tile::new(
            x.clamp(0, self.max_coord) as u32,
            y.clamp(0, self.max_coord) as u32,
            self.zoom,
        );
        self.tiles.insert(tile);
        if self.limit.is_some_and(|limit| self.tiles.len() > limit) {
            self.overflowed = true;
        }
    }

    fn add_point(&mut self, coord: Coord) {
        let tile = point_to_tile_within(
            clip_longitude(coord.x),
            coord.y,
            self.zoom,
            self.max_latitude,
        );
        self.insert((i64::from(tile.x), i64::from(tile.y)));
    }

    /// Traces a line through the grid.
    ///
    /// With `ring` set, every position where the trace enters a new row is pushed
    /// onto it. If the trace ends on the row it started on, the last crossing
    /// duplicates the first and is dropped.
    fn add_line(&mut self, coords: &[Coord], mut ring: Option<&mut Vec<GridPos>>) {
        let mut prev: Option<GridPos> = None;
        let mut last_row: Option<i64> = None;

        for segment in coords.windows(2) {
            if self.overflowed {
                return;
            }
            let (x0, y0) = point_to_tile_fraction_within(
                segment[0].x,
                segment[0].y,
                self.zoom,
                self.max_latitude,
            );
            let (x1, y1) = point_to_tile_fraction_within(
                segment[1].x,
                segment[1].y,
                self.zoom,
                self.max_latitude,
            );
            let (dx, dy) = (x1 - x0, y1 - y0);
            if dx == 0.0 && dy == 0.0 {
                continue;
            }

            let sx: i64 = if dx > 0.0 { 1 } else { -1 };
            let sy: i64 = if dy > 0.0 { 1 } else { -1 };
            let mut x = x0.floor() as i64;
            let mut y = y0.floor() as i64;

            // Segment parameter at which the next vertical / horizontal grid line
            // is crossed, and the parameter span of one whole tile.
            let mut t_max_x = if dx == 0.0 {
                f64::INFINITY
            } else {
                ((if dx > 0.0 { 1.0 } else { 0.0 }) + x as f64 - x0) / dx
            }
            .abs();
            let mut t_max_y = if dy == 0.0 {
                f64::INFINITY
            } else {
                ((if dy > 0.0 { 1.0 } else { 0.0 }) + y as f64 - y0) / dy
            }
            .abs();
            let t_delta_x = if dx == 0.0 { f64::INFINITY } else { (sx as f64 / dx).abs() };
            let t_delta_y = if dy == 0.0 { f64::INFINITY } else { (sy as f64 / dy).abs() };

            if prev != Some((x, y)) {
                self.visit((x, y), &mut prev, ring.as_deref_mut());
            }

            while (t_max_x < 1.0 || t_max_y < 1.0) && !self.overflowed {
                if t_max_x < t_max_y {
                    t_max_x += t_delta_x;
                    x += sx;
                } else {
                    t_max_y += t_delta_y;
                    y += sy;
                }
                self.visit((x, y), &mut prev, ring.as_deref_mut());
            }

            last_row = Some(y);
        }

        if let Some(ring) = ring
            && let (Some(&(_, first_row)), Some(row)) = (ring.first(), last_row)
            && first_row == row
        {
            ring.pop();
        }
    }

    fn visit(
        &mut self,
        pos: GridPos,
        prev: &mut Option<GridPos>,
        ring: Option<&mut Vec<GridPos>>,
    ) {
        self.insert(pos);
        if let Some(ring) = ring
            && prev.map(|(_, y)| y) != Some(pos.1)
        {
            ring.push(pos);
        }
        *prev = Some(pos);
    }

    fn add_polygon(&mut self, polygon: &Polygon) {
        let mut intersections: Vec<GridPos> = Vec::new();

        for line in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let mut ring = Vec::new();
            self.add_line(&line.0, Some(&mut ring));

            let n = ring.len();
            for j in 0..n {
                let y = ring[j].1;
                let before = ring[(j + n - 1) % n].1;
                let after = ring[(j + 1) % n].1;

                // Local extrema and the first of two crossings on one row are
                // not span boundaries.
                if (y > before || y > after) && (y < before || y < after) && y != after {
                    intersections.push(ring[j]);
                }
            }
        }

        self.fill_spans(&mut intersections);
    }

    /// Fills the tiles strictly between consecutive crossings of each row.
    ///
    /// A row with an odd number of crossings keeps its complete pairs and
    /// drops the last crossing.
    fn fill_spans(&mut self, intersections: &mut [GridPos]) {
        intersections.sort_unstable_by_key(|&(x, y)| (y, x));

        for row in intersections.chunk_by(|a, b| a.1 == b.1) {
            let spans = row.chunks_exact(2);
            if let [(x, y)] = spans.remainder() {
                log::warn!(
                    "Unmatched scanline crossing at ({}, {}) on zoom {}; span skipped",
                    x,
                    y,
                    self.zoom
                );
            }

            for span in spans {
                let (start, end) = (span[0], span[1]);
                for x in start.0 + 1..end.0 {
                    if self.overflowed {
                        return;
                    }
                    self.insert((x, start.1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::cell_to_tile;
    use geo::{Geometry, GeometryCollection, MultiPolygon, Rect, coord, line_string, point, polygon};

    const MADRID: (f64, f64) = (-3.71219873428345, 40.413365349070865);

    fn triangle() -> Polygon {
        polygon![
            (x: -3.71219873428345, y: 40.413365349070865),
            (x: -3.7144088745117, y: 40.40965661286395),
            (x: -3.70659828186035, y: 40.409525904775634),
            (x: -3.71219873428345, y: 40.413365349070865),
        ]
    }

    #[test]
    fn test_point_cover() {
        let geometry = Geometry::Point(point! { x: MADRID.0, y: MADRID.1 });
        assert_eq!(geometry_to_cells(&geometry, 0).unwrap(), vec![5192650370358181887]);
        assert_eq!(geometry_to_cells(&geometry, 10).unwrap(), vec![5234261499580514303]);
        assert_eq!(geometry_to_cells(&geometry, 17).unwrap(), vec![5265786693163941887]);
        assert_eq!(geometry_to_cells(&geometry, 26).unwrap(), vec![5306319089810037072]);
    }

    #[test]
    fn test_line_cover() {
        let geometry = Geometry::LineString(line_string![
            (x: -3.71219873428345, y: 40.413365349070865),
            (x: -3.7144088745117, y: 40.40965661286395),
        ]);
        assert_eq!(geometry_to_cells(&geometry, 10).unwrap(), vec![5234261499580514303]);
        assert_eq!(
            geometry_to_cells(&geometry, 17).unwrap(),
            vec![5265786693153193983, 5265786693163941887, 5265786693164466175]
        );
    }

    #[test]
    fn test_line_cover_is_connected() {
        let geometry = Geometry::LineString(line_string![
            (x: -10.0, y: -10.0),
            (x: 12.0, y: 7.5),
            (x: 30.0, y: -2.0),
        ]);
        let tiles = geometry_to_tiles(&geometry, 9).unwrap();
        for tile in &tiles {
            let has_neighbor = tiles.iter().any(|other| {
                other != tile
                    && (i64::from(other.x) - i64::from(tile.x)).abs()
                        + (i64::from(other.y) - i64::from(tile.y)).abs()
                        == 1
            });
            assert!(has_neighbor, "isolated tile {}", tile);
        }
    }

    #[test]
    fn test_degenerate_line_covers_nothing() {
        let geometry = Geometry::LineString(line_string![
            (x: MADRID.0, y: MADRID.1),
            (x: MADRID.0, y: MADRID.1),
        ]);
        assert!(geometry_to_cells(&geometry, 12).unwrap().is_empty());
    }

    #[test]
    fn test_polygon_cover() {
        let geometry = Geometry::Polygon(triangle());
        assert_eq!(geometry_to_cells(&geometry, 0).unwrap(), vec![5192650370358181887]);
        assert_eq!(
            geometry_to_cells(&geometry, 17).unwrap(),
            vec![
                5265786693153193983,
                5265786693163941887,
                5265786693164204031,
                5265786693164466175,
                5265786693164728319,
                5265786693165514751,
            ]
        );
    }

    #[test]
    fn test_polygon_cover_fills_interior() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ];
        let tiles = geometry_to_tiles(&Geometry::Polygon(square), 8).unwrap();

        let xs = tiles.iter().map(|t| t.x);
        let ys = tiles.iter().map(|t| t.y);
        let (min_x, max_x) = (xs.clone().min().unwrap(), xs.max().unwrap());
        let (min_y, max_y) = (ys.clone().min().unwrap(), ys.max().unwrap());
        let expected = ((max_x - min_x + 1) * (max_y - min_y + 1)) as usize;
        assert_eq!(tiles.len(), expected);
    }

    #[test]
    fn test_polygon_hole_is_not_filled() {
        let ring = line_string![
            (x: 0.0, y: 0.0),
            (x: 20.0, y: 0.0),
            (x: 20.0, y: 20.0),
            (x: 0.0, y: 20.0),
            (x: 0.0, y: 0.0),
        ];
        let hole = line_string![
            (x: 5.0, y: 5.0),
            (x: 15.0, y: 5.0),
            (x: 15.0, y: 15.0),
            (x: 5.0, y: 15.0),
            (x: 5.0, y: 5.0),
        ];
        let with_hole = Polygon::new(ring.clone(), vec![hole]);
        let solid = Polygon::new(ring, vec![]);

        let holed = geometry_to_cells(&Geometry::Polygon(with_hole), 8).unwrap();
        let full = geometry_to_cells(&Geometry::Polygon(solid), 8).unwrap();
        assert!(holed.len() < full.len());

        let center = crate::cell::point_to_cell(10.0, 10.0, 8).unwrap();
        assert!(full.contains(&center));
        assert!(!holed.contains(&center));
    }

    #[test]
    fn test_multi_polygon_is_union() {
        let other = polygon![
            (x: -3.708035945892334, y: 40.411176075761475),
            (x: -3.70863676071167, y: 40.409003069883845),
            (x: -3.7063729763031006, y: 40.41048170181224),
            (x: -3.708035945892334, y: 40.411176075761475),
        ];
        let first = geometry_to_cells(&Geometry::Polygon(triangle()), 17).unwrap();
        let second = geometry_to_cells(&Geometry::Polygon(other.clone()), 17).unwrap();
        let both = geometry_to_cells(
            &Geometry::MultiPolygon(MultiPolygon::new(vec![triangle(), other])),
            17,
        )
        .unwrap();

        let mut union: Vec<u64> = first.into_iter().chain(second).collect();
        union.sort_unstable();
        union.dedup();
        assert_eq!(both, union);
        assert_eq!(both.len(), 7);
    }

    #[test]
    fn test_geometry_collection() {
        let collection = Geometry::GeometryCollection(GeometryCollection(vec![
            Geometry::Point(point! { x: -3.7118983268737793, y: 40.4116172037252 }),
            Geometry::LineString(line_string![
                (x: -3.71219873428345, y: 40.413365349070865),
                (x: -3.7144088745117, y: 40.40965661286395),
            ]),
        ]));
        assert_eq!(
            geometry_to_cells(&collection, 17).unwrap(),
            vec![5265786693153193983, 5265786693163941887, 5265786693164466175]
        );
    }

    #[test]
    fn test_unsupported_geometry() {
        let rect = Geometry::Rect(Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 1.0, y: 1.0 }));
        assert_eq!(
            geometry_to_cells(&rect, 5),
            Err(QuadbinError::UnsupportedGeometryType("Rect".to_string()))
        );

        let nested = Geometry::GeometryCollection(GeometryCollection(vec![rect]));
        assert!(matches!(
            geometry_to_cells(&nested, 5),
            Err(QuadbinError::UnsupportedGeometryType(_))
        ));
    }

    #[test]
    fn test_invalid_resolution() {
        let geometry = Geometry::Point(point! { x: MADRID.0, y: MADRID.1 });
        assert!(matches!(
            geometry_to_cells(&geometry, 27),
            Err(QuadbinError::InvalidResolution(_))
        ));
    }

    #[test]
    fn test_cover_limit() {
        let geometry = Geometry::Polygon(triangle());
        assert_eq!(
            cover_cells(&geometry, 17, MAX_LATITUDE, Some(5)),
            Err(QuadbinError::CoverTooLarge { limit: 5, resolution: 17 })
        );
        assert_eq!(cover_cells(&geometry, 17, MAX_LATITUDE, Some(6)).unwrap().len(), 6);
    }

    #[test]
    fn test_limit_stops_line_trace() {
        let mut cover = TileCover::new(20, MAX_LATITUDE, Some(1));
        let mut ring = Vec::new();
        let coords = [
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 0.0, y: 60.0 },
            coord! { x: 1.0, y: 60.0 },
        ];
        cover.add_line(&coords, Some(&mut ring));

        assert!(cover.overflowed);
        assert_eq!(cover.tiles.len(), 2);
        assert_eq!(ring.len(), 2);

        let geometry = Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 0.0, y: 60.0)]);
        assert_eq!(
            cover_cells(&geometry, 20, MAX_LATITUDE, Some(1)),
            Err(QuadbinError::CoverTooLarge { limit: 1, resolution: 20 })
        );
    }

    #[test]
    fn test_unmatched_crossing_keeps_complete_spans() {
        let mut cover = TileCover::new(10, MAX_LATITUDE, None);
        let mut intersections = vec![(9, 5), (1, 7), (6, 5), (4, 7), (2, 5)];
        cover.fill_spans(&mut intersections);

        let mut filled: Vec<GridPos> = cover
            .tiles
            .iter()
            .map(|tile| (i64::from(tile.x), i64::from(tile.y)))
            .collect();
        filled.sort_unstable_by_key(|&(x, y)| (y, x));
        assert_eq!(filled, vec![(3, 5), (4, 5), (5, 5), (2, 7), (3, 7)]);
    }

    #[test]
    fn test_antimeridian_line_stays_on_grid() {
        let geometry = Geometry::LineString(line_string![(x: 170.0, y: 0.5), (x: 180.0, y: 0.5)]);
        let cells = geometry_to_cells(&geometry, 4).unwrap();
        assert!(cells.iter().all(|&cell| cell_to_tile(cell).is_valid()));
        assert!(cells.iter().any(|&cell| cell_to_tile(cell).x == 15));
    }
}

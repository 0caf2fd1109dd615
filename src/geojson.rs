//! GeoJSON input and output for cells and covers.

use crate::cell::{cell_to_boundary, cell_to_point};
use crate::error::{QuadbinError, Result};
use crate::tilecover::geometry_to_cells;
use geo::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use geojson::{GeoJson, Geometry, Value};

/// Parses a GeoJSON document into a `geo` geometry.
///
/// A bare geometry is taken as is and a `Feature` contributes its geometry.
/// Feature collections are rejected: cover each feature separately.
pub fn geometry_from_geojson(geojson: &str) -> Result<geo::Geometry> {
    let document: GeoJson = geojson
        .parse()
        .map_err(|e| QuadbinError::InvalidInput(format!("Failed to parse GeoJSON: {}", e)))?;

    match document {
        GeoJson::Geometry(geometry) => convert_geometry(&geometry),
        GeoJson::Feature(feature) => match feature.geometry {
            Some(geometry) => convert_geometry(&geometry),
            None => Err(QuadbinError::UnsupportedGeometryType(
                "Feature without geometry".to_string(),
            )),
        },
        GeoJson::FeatureCollection(_) => Err(QuadbinError::UnsupportedGeometryType(
            "FeatureCollection".to_string(),
        )),
    }
}

/// Cells covering a GeoJSON geometry or feature at `resolution`.
pub fn geojson_to_cells(geojson: &str, resolution: u8) -> Result<Vec<u64>> {
    geometry_to_cells(&geometry_from_geojson(geojson)?, resolution)
}

/// The center of `cell` as a serialized GeoJSON Point.
pub fn cell_to_point_geojson(cell: u64) -> Result<String> {
    let point = cell_to_point(cell);
    let geom = Geometry::new(Value::Point(vec![point.x(), point.y()]));

    serde_json::to_string(&geom).map_err(|e| {
        QuadbinError::SerializationErrorWithContext(format!("Failed to serialize point: {}", e))
    })
}

/// The boundary of `cell` as a serialized GeoJSON Polygon.
pub fn cell_to_boundary_geojson(cell: u64) -> Result<String> {
    let boundary = cell_to_boundary(cell);
    let ring: Vec<Vec<f64>> = boundary
        .exterior()
        .coords()
        .map(|coord| vec![coord.x, coord.y])
        .collect();
    let geom = Geometry::new(Value::Polygon(vec![ring]));

    serde_json::to_string(&geom).map_err(|e| {
        QuadbinError::SerializationErrorWithContext(format!("Failed to serialize polygon: {}", e))
    })
}

fn convert_geometry(geometry: &Geometry) -> Result<geo::Geometry> {
    let converted = match &geometry.value {
        Value::Point(position) => geo::Geometry::Point(Point(convert_position(position)?)),
        Value::MultiPoint(positions) => geo::Geometry::MultiPoint(MultiPoint(
            positions
                .iter()
                .map(|position| convert_position(position).map(Point))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::LineString(positions) => geo::Geometry::LineString(convert_line(positions)?),
        Value::MultiLineString(lines) => geo::Geometry::MultiLineString(MultiLineString(
            lines
                .iter()
                .map(|line| convert_line(line))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::Polygon(rings) => geo::Geometry::Polygon(convert_polygon(rings)?),
        Value::MultiPolygon(polygons) => geo::Geometry::MultiPolygon(MultiPolygon(
            polygons
                .iter()
                .map(|rings| convert_polygon(rings))
                .collect::<Result<Vec<_>>>()?,
        )),
        Value::GeometryCollection(members) => {
            geo::Geometry::GeometryCollection(geo::GeometryCollection(
                members
                    .iter()
                    .map(convert_geometry)
                    .collect::<Result<Vec<_>>>()?,
            ))
        }
    };
    Ok(converted)
}

fn convert_position(position: &[f64]) -> Result<Coord> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => Err(QuadbinError::InvalidInput(
            "Coordinate must have at least 2 values".to_string(),
        )),
    }
}

fn convert_line(positions: &[Vec<f64>]) -> Result<LineString> {
    positions
        .iter()
        .map(|position| convert_position(position))
        .collect::<Result<Vec<_>>>()
        .map(LineString::from)
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Result<Polygon> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(QuadbinError::InvalidInput(
            "Polygon must have at least one ring".to_string(),
        ));
    };

    let interiors = interiors
        .iter()
        .map(|ring| convert_line(ring))
        .collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(convert_line(exterior)?, interiors))
}

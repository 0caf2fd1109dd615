//! Configured entry point for indexing points and geometries.

use crate::cell::point_to_cell_within;
use crate::codec::MAX_RESOLUTION;
use crate::config::Config;
use crate::error::{QuadbinError, Result};
use crate::mercator::{clip_longitude, point_to_tile_within};
use crate::tilecover::cover_cells;
use geo::Geometry;
use quadbin_types::Tile;

/// Indexes points and geometries under a validated [`Config`].
///
/// ```rust
/// use quadbin::{Config, Indexer, QuadbinError};
/// use geo::{Geometry, polygon};
///
/// let indexer = Indexer::with_config(Config::default().with_max_cover_cells(4))?;
/// let square = Geometry::Polygon(polygon![
///     (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0),
/// ]);
///
/// assert_eq!(indexer.geometry_to_cells(&square, 2)?.len(), 2);
/// assert!(matches!(
///     indexer.geometry_to_cells(&square, 12),
///     Err(QuadbinError::CoverTooLarge { limit: 4, resolution: 12 })
/// ));
/// # Ok::<(), QuadbinError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    config: Config,
}

impl Indexer {
    /// Indexer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(QuadbinError::InvalidInput)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn max_latitude(&self) -> f64 {
        self.config.latitude_bound.max_latitude()
    }

    pub fn point_to_tile(&self, longitude: f64, latitude: f64, resolution: u8) -> Result<Tile> {
        if resolution > MAX_RESOLUTION {
            return Err(QuadbinError::resolution_out_of_range(resolution));
        }
        Ok(point_to_tile_within(
            clip_longitude(longitude),
            latitude,
            resolution,
            self.max_latitude(),
        ))
    }

    pub fn point_to_cell(&self, longitude: f64, latitude: f64, resolution: u8) -> Result<u64> {
        point_to_cell_within(longitude, latitude, resolution, self.max_latitude())
    }

    /// Cells covering `geometry`, in ascending order.
    ///
    /// Fails with `CoverTooLarge` when the cover exceeds the configured limit.
    pub fn geometry_to_cells(&self, geometry: &Geometry, resolution: u8) -> Result<Vec<u64>> {
        cover_cells(
            geometry,
            resolution,
            self.max_latitude(),
            self.config.max_cover_cells,
        )
    }

    #[cfg(feature = "geojson")]
    pub fn geojson_to_cells(&self, geojson: &str, resolution: u8) -> Result<Vec<u64>> {
        let geometry = crate::geojson::geometry_from_geojson(geojson)?;
        self.geometry_to_cells(&geometry, resolution)
    }
}

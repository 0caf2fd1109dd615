//! Quadbin: a 64-bit hierarchical index for Web Mercator quadtree tiles.
//!
//! A cell packs a zoom level and a Morton-interleaved tile position into one
//! `u64`, so ancestry, sorting and range scans are plain integer operations.
//!
//! ```rust
//! use quadbin::{Direction, point_to_cell, cell_to_parent, cell_sibling, get_resolution};
//!
//! let cell = point_to_cell(-3.7038, 40.4168, 10)?;
//! assert_eq!(get_resolution(cell), 10);
//!
//! let parent = cell_to_parent(cell, 4)?;
//! assert_eq!(get_resolution(parent), 4);
//!
//! let east = cell_sibling(cell, Direction::Right).expect("not on the grid edge");
//! assert_ne!(east, cell);
//! # Ok::<(), quadbin::QuadbinError>(())
//! ```

pub mod area;
pub mod cell;
pub mod codec;
pub mod config;
pub mod error;
#[cfg(feature = "geojson")]
pub mod geojson;
pub mod indexer;
pub mod mercator;
pub mod neighbor;
pub mod tilecover;

pub use error::{QuadbinError, Result};

pub use quadbin_types::{MAX_ZOOM, RingCell, Tile};

pub use area::cell_area;
pub use cell::{cell_to_boundary, cell_to_bounding_box, cell_to_point, point_to_cell};
pub use codec::{
    MAX_RESOLUTION, cell_to_children, cell_to_children_iter, cell_to_parent, cell_to_tile,
    get_resolution, index_to_string, is_valid_cell, is_valid_index, string_to_index, tile_to_cell,
};
pub use mercator::{point_to_tile, point_to_tile_fraction, tile_to_latitude, tile_to_longitude};
pub use neighbor::{Direction, cell_neighbors, cell_sibling, k_ring, k_ring_distances, tile_sibling};
pub use tilecover::{geometry_to_cells, geometry_to_tiles};

#[cfg(feature = "geojson")]
pub use crate::geojson::{
    cell_to_boundary_geojson, cell_to_point_geojson, geojson_to_cells, geometry_from_geojson,
};

pub use config::{Config, LatitudeBound};
pub use indexer::Indexer;

pub use geo::{Geometry, Point, Polygon};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{QuadbinError, Result, RingCell, Tile};

    pub use geo::{Geometry, Point, Polygon};

    pub use crate::codec::{
        cell_to_children, cell_to_parent, cell_to_tile, get_resolution, tile_to_cell,
    };

    pub use crate::cell::{cell_to_boundary, cell_to_point, point_to_cell};

    pub use crate::neighbor::{Direction, k_ring};

    pub use crate::{Config, Indexer, LatitudeBound, geometry_to_cells};

    #[cfg(feature = "geojson")]
    pub use crate::geojson_to_cells;
}

//! # quadbin-types
//!
//! Core data types for the Quadbin index.
//!
//! This crate provides the plain values exchanged with the `quadbin` library:
//!
//! - **Tile types**: `Tile`, an `(x, y, z)` slippy-map tile coordinate
//! - **Ring types**: `RingCell`, a cell paired with its ring distance
//!
//! All types are serializable with Serde.
//!
//! ## Examples
//!
//! ```rust
//! use quadbin_types::tile::Tile;
//!
//! let tile = Tile::new(9, 8, 4);
//! assert!(tile.is_valid());
//! assert_eq!(tile.parent(), Some(Tile::new(4, 4, 3)));
//! ```

pub mod ring;
pub mod tile;

pub use ring::RingCell;
pub use tile::{MAX_ZOOM, Tile};

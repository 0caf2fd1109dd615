use serde::{Deserialize, Serialize};
use std::fmt;

/// Deepest zoom level a tile may have.
pub const MAX_ZOOM: u8 = 26;

/// A slippy-map tile coordinate.
///
/// `x` grows eastwards from the antimeridian and `y` grows southwards from the
/// northern edge of the Web Mercator square. A tile is only meaningful when
/// `z <= 26` and both `x` and `y` are below `2^z`; see [`Tile::is_valid`].
///
/// # Examples
///
/// ```
/// use quadbin_types::tile::Tile;
///
/// let tile = Tile::new(9, 8, 4);
/// assert_eq!(tile.dim(), 16);
/// assert_eq!(tile.children().map(|children| children.len()), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    /// Column, counted from the west edge
    pub x: u32,
    /// Row, counted from the north edge
    pub y: u32,
    /// Zoom level (resolution)
    pub z: u8,
}

impl Tile {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The single tile covering the whole world.
    pub fn root() -> Self {
        Self { x: 0, y: 0, z: 0 }
    }

    /// Number of tiles along each axis at this zoom level.
    pub fn dim(&self) -> u64 {
        1u64 << self.z.min(63)
    }

    /// Returns true if the zoom level is supported and the tile lies on the grid.
    pub fn is_valid(&self) -> bool {
        self.z <= MAX_ZOOM && u64::from(self.x) < self.dim() && u64::from(self.y) < self.dim()
    }

    /// The enclosing tile one zoom level up, or `None` for the root.
    pub fn parent(&self) -> Option<Tile> {
        if self.z == 0 {
            return None;
        }
        Some(Tile::new(self.x >> 1, self.y >> 1, self.z - 1))
    }

    /// The four tiles one zoom level down, in NW, NE, SW, SE order, or `None`
    /// at the deepest zoom level.
    pub fn children(&self) -> Option<[Tile; 4]> {
        if self.z >= MAX_ZOOM {
            return None;
        }
        let (x, y, z) = (self.x << 1, self.y << 1, self.z + 1);
        Some([
            Tile::new(x, y, z),
            Tile::new(x + 1, y, z),
            Tile::new(x, y + 1, z),
            Tile::new(x + 1, y + 1, z),
        ])
    }
}

impl From<(u32, u32, u8)> for Tile {
    fn from((x, y, z): (u32, u32, u8)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Tile> for (u32, u32, u8) {
    fn from(tile: Tile) -> Self {
        (tile.x, tile.y, tile.z)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_bounds() {
        assert!(Tile::root().is_valid());
        assert!(Tile::new(15, 15, 4).is_valid());
        assert!(!Tile::new(16, 0, 4).is_valid());
        assert!(!Tile::new(0, 16, 4).is_valid());
        assert!(!Tile::new(0, 0, 27).is_valid());
    }

    #[test]
    fn test_parent_and_children() {
        let tile = Tile::new(9, 8, 4);
        assert_eq!(tile.parent(), Some(Tile::new(4, 4, 3)));
        assert_eq!(Tile::root().parent(), None);

        for child in tile.children().unwrap() {
            assert_eq!(child.parent(), Some(tile));
        }
    }

    #[test]
    fn test_children_stop_at_max_zoom() {
        let deepest = Tile::new(0, 0, MAX_ZOOM);
        assert!(deepest.children().is_none());
        assert!(Tile::new(0, 0, u8::MAX).children().is_none());

        let children = Tile::new(3, 5, MAX_ZOOM - 1).children().unwrap();
        assert!(children.iter().all(|child| child.z == MAX_ZOOM && child.is_valid()));
    }

    #[test]
    fn test_tuple_conversion_and_display() {
        let tile: Tile = (9, 8, 4).into();
        assert_eq!(tile, Tile::new(9, 8, 4));
        assert_eq!(<(u32, u32, u8)>::from(tile), (9, 8, 4));
        assert_eq!(tile.to_string(), "4/9/8");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Tile::new(9, 8, 4)).unwrap();
        assert_eq!(json, r#"{"x":9,"y":8,"z":4}"#);
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tile::new(9, 8, 4));
    }
}

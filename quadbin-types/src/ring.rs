use serde::{Deserialize, Serialize};

/// A cell reached by a k-ring traversal together with its Chebyshev distance
/// from the ring origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RingCell {
    pub index: u64,
    pub distance: u32,
}

impl RingCell {
    pub fn new(index: u64, distance: u32) -> Self {
        Self { index, distance }
    }

    /// Returns true for the ring origin itself.
    pub fn is_origin(&self) -> bool {
        self.distance == 0
    }
}

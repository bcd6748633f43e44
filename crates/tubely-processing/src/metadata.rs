//! Media metadata types

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the primary video stream. Both sides are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamGeometry {
    pub width: u32,
    pub height: u32,
}

impl StreamGeometry {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sides_are_rejected() {
        assert!(StreamGeometry::new(0, 720).is_none());
        assert!(StreamGeometry::new(1280, 0).is_none());
        assert_eq!(
            StreamGeometry::new(1280, 720),
            Some(StreamGeometry {
                width: 1280,
                height: 720
            })
        );
    }
}

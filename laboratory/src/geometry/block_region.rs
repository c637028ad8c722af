use serde::{Deserialize, Serialize};

use super::{BlockPosition, GeometryError, same_world};

/// An inclusive box of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBlockRegion")]
pub struct BlockRegion {
    min: BlockPosition,
    max: BlockPosition,
}

#[derive(Deserialize)]
struct RawBlockRegion {
    min: BlockPosition,
    max: BlockPosition,
}

impl TryFrom<RawBlockRegion> for BlockRegion {
    type Error = GeometryError;

    fn try_from(raw: RawBlockRegion) -> Result<Self, Self::Error> {
        BlockRegion::new(raw.min, raw.max)
    }
}

impl BlockRegion {
    pub fn new(a: BlockPosition, b: BlockPosition) -> Result<Self, GeometryError> {
        same_world(a.world(), b.world())?;
        let min = BlockPosition::new(
            a.x().min(b.x()),
            a.y().min(b.y()),
            a.z().min(b.z()),
            a.world(),
        );
        let max = BlockPosition::new(
            a.x().max(b.x()),
            a.y().max(b.y()),
            a.z().max(b.z()),
            a.world(),
        );
        Ok(Self { min, max })
    }

    pub fn min(&self) -> &BlockPosition {
        &self.min
    }

    pub fn max(&self) -> &BlockPosition {
        &self.max
    }

    pub fn world(&self) -> &str {
        self.min.world()
    }

    /// Difference of the x bounds; a single block has width 0. Wraps when the
    /// bounds span more than `i32::MAX`.
    pub fn width(&self) -> i32 {
        self.max.x().wrapping_sub(self.min.x())
    }

    pub fn height(&self) -> i32 {
        self.max.y().wrapping_sub(self.min.y())
    }

    pub fn depth(&self) -> i32 {
        self.max.z().wrapping_sub(self.min.z())
    }

    pub fn contains(&self, block: &BlockPosition) -> bool {
        block.world() == self.world() && self.contains_xyz(block.x(), block.y(), block.z())
    }

    pub fn contains_xyz(&self, x: i32, y: i32, z: i32) -> bool {
        (self.min.x()..=self.max.x()).contains(&x)
            && (self.min.y()..=self.max.y()).contains(&y)
            && (self.min.z()..=self.max.z()).contains(&z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_and_contains_bounds() {
        let region = BlockPosition::new(4, 70, -4, "overworld")
            .region_with(&BlockPosition::new(0, 60, 4, "overworld"))
            .expect("region");
        assert_eq!(region.min(), &BlockPosition::new(0, 60, -4, "overworld"));
        assert_eq!((region.width(), region.height(), region.depth()), (4, 10, 8));
        assert!(region.contains(&BlockPosition::new(4, 70, 4, "overworld")));
        assert!(!region.contains(&BlockPosition::new(5, 70, 4, "overworld")));
        assert!(!region.contains(&BlockPosition::new(1, 65, 0, "end")));
    }

    #[test]
    fn full_span_width_wraps() {
        let region = BlockRegion::new(
            BlockPosition::new(i32::MIN, 0, 0, "overworld"),
            BlockPosition::new(i32::MAX, 0, 0, "overworld"),
        )
        .expect("region");
        assert_eq!(region.width(), -1);
        assert!(region.contains_xyz(0, 0, 0));
    }

    #[test]
    fn rejects_mixed_worlds() {
        let result = BlockRegion::new(BlockPosition::new(0, 0, 0, "a"), BlockPosition::new(0, 0, 0, "b"));
        assert!(matches!(result, Err(GeometryError::DifferentWorlds { .. })));
    }

    #[test]
    fn json_shape() {
        let region = BlockRegion::new(BlockPosition::new(1, 2, 3, "w"), BlockPosition::new(0, 0, 0, "w"))
            .expect("region");
        let json = serde_json::to_string(&region).expect("json");
        assert_eq!(
            json,
            r#"{"min":{"x":0,"y":0,"z":0,"world":"w"},"max":{"x":1,"y":2,"z":3,"world":"w"}}"#
        );
        assert_eq!(serde_json::from_str::<BlockRegion>(&json).expect("parse"), region);
    }
}

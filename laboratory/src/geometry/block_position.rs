use serde::{Deserialize, Serialize};

use super::{BlockRegion, ChunkPosition, GeometryError, Position};

/// Integer coordinates of a single block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPosition {
    x: i32,
    y: i32,
    z: i32,
    world: String,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32, world: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            world: world.into(),
        }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    /// The block's minimum corner.
    pub fn to_position(&self) -> Position {
        Position::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.z),
            self.world.clone(),
        )
    }

    pub fn to_position_center(&self) -> Position {
        self.to_position().add(0.5, 0.5, 0.5)
    }

    pub fn to_chunk(&self) -> ChunkPosition {
        ChunkPosition::new(self.x >> 4, self.z >> 4, self.world.clone())
    }

    /// Whether `position` lies inside this block.
    pub fn contains(&self, position: &Position) -> bool {
        *self == position.floor()
    }

    /// Offset the block; coordinates wrap at the `i32` bounds.
    pub fn add(&self, x: i32, y: i32, z: i32) -> Self {
        Self::new(
            self.x.wrapping_add(x),
            self.y.wrapping_add(y),
            self.z.wrapping_add(z),
            self.world.clone(),
        )
    }

    pub fn subtract(&self, x: i32, y: i32, z: i32) -> Self {
        Self::new(
            self.x.wrapping_sub(x),
            self.y.wrapping_sub(y),
            self.z.wrapping_sub(z),
            self.world.clone(),
        )
    }

    pub fn region_with(&self, other: &BlockPosition) -> Result<BlockRegion, GeometryError> {
        BlockRegion::new(self.clone(), other.clone())
    }
}

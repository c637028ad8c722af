use serde::{Deserialize, Serialize};

use super::{ChunkPosition, GeometryError, same_world};

/// An inclusive rectangle of chunks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawChunkRegion")]
pub struct ChunkRegion {
    min: ChunkPosition,
    max: ChunkPosition,
}

#[derive(Deserialize)]
struct RawChunkRegion {
    min: ChunkPosition,
    max: ChunkPosition,
}

impl TryFrom<RawChunkRegion> for ChunkRegion {
    type Error = GeometryError;

    fn try_from(raw: RawChunkRegion) -> Result<Self, Self::Error> {
        ChunkRegion::new(raw.min, raw.max)
    }
}

impl ChunkRegion {
    pub fn new(a: ChunkPosition, b: ChunkPosition) -> Result<Self, GeometryError> {
        same_world(a.world(), b.world())?;
        let min = ChunkPosition::new(a.x().min(b.x()), a.z().min(b.z()), a.world());
        let max = ChunkPosition::new(a.x().max(b.x()), a.z().max(b.z()), a.world());
        Ok(Self { min, max })
    }

    pub fn min(&self) -> &ChunkPosition {
        &self.min
    }

    pub fn max(&self) -> &ChunkPosition {
        &self.max
    }

    pub fn world(&self) -> &str {
        self.min.world()
    }

    pub fn width(&self) -> i32 {
        self.max.x().wrapping_sub(self.min.x())
    }

    pub fn depth(&self) -> i32 {
        self.max.z().wrapping_sub(self.min.z())
    }

    pub fn contains(&self, chunk: &ChunkPosition) -> bool {
        chunk.world() == self.world() && self.contains_xz(chunk.x(), chunk.z())
    }

    pub fn contains_xz(&self, x: i32, z: i32) -> bool {
        (self.min.x()..=self.max.x()).contains(&x) && (self.min.z()..=self.max.z()).contains(&z)
    }
}

use serde::{Deserialize, Serialize};

use super::{BlockPosition, Position};

const CHUNK_WIDTH: i32 = 16;
const CHUNK_HEIGHT: i32 = 256;

/// A 16×16 column of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPosition {
    x: i32,
    z: i32,
    world: String,
}

impl ChunkPosition {
    pub fn new(x: i32, z: i32, world: impl Into<String>) -> Self {
        Self {
            x,
            z,
            world: world.into(),
        }
    }

    /// Decode a value produced by [`encoded`](Self::encoded).
    pub fn from_encoded(encoded: i64, world: impl Into<String>) -> Self {
        Self::new(encoded as i32, (encoded >> 32) as i32, world)
    }

    /// `x` in the low 32 bits, `z` in the high 32 bits.
    pub fn encoded(&self) -> i64 {
        i64::from(self.x as u32) | (i64::from(self.z) << 32)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn contains_block(&self, block: &BlockPosition) -> bool {
        *self == block.to_chunk()
    }

    pub fn contains(&self, position: &Position) -> bool {
        self.contains_block(&position.floor())
    }

    /// The block at chunk-local `x`/`z` (masked to `0..16`) and absolute `y`.
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockPosition {
        BlockPosition::new(
            (self.x << 4) | (x & 0xF),
            y,
            (self.z << 4) | (z & 0xF),
            self.world.clone(),
        )
    }

    /// Every block of the chunk from `y = 0` to `255`, x-major then z then y.
    pub fn blocks(&self) -> impl Iterator<Item = BlockPosition> + '_ {
        (0..CHUNK_WIDTH).flat_map(move |x| {
            (0..CHUNK_WIDTH)
                .flat_map(move |z| (0..CHUNK_HEIGHT).map(move |y| self.block(x, y, z)))
        })
    }

    /// Offset the chunk; coordinates wrap at the `i32` bounds.
    pub fn add(&self, x: i32, z: i32) -> Self {
        Self::new(self.x.wrapping_add(x), self.z.wrapping_add(z), self.world.clone())
    }

    pub fn subtract(&self, x: i32, z: i32) -> Self {
        Self::new(self.x.wrapping_sub(x), self.z.wrapping_sub(z), self.world.clone())
    }
}

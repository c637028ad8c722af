use serde::{Deserialize, Serialize};

use super::{BlockPosition, Direction, GeometryError, Point, Region};

/// A precise location in a world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f64,
    y: f64,
    z: f64,
    world: String,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64, world: impl Into<String>) -> Self {
        Self {
            x,
            y,
            z,
            world: world.into(),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    /// The block containing this position.
    pub fn floor(&self) -> BlockPosition {
        BlockPosition::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
            self.world.clone(),
        )
    }

    pub fn add(&self, x: f64, y: f64, z: f64) -> Self {
        Self::new(self.x + x, self.y + y, self.z + z, self.world.clone())
    }

    pub fn subtract(&self, x: f64, y: f64, z: f64) -> Self {
        self.add(-x, -y, -z)
    }

    /// Squared euclidean distance, ignoring worlds.
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn region_with(&self, other: &Position) -> Result<Region, GeometryError> {
        Region::new(self.clone(), other.clone())
    }

    pub fn with_direction(&self, direction: Direction) -> Point {
        Point::new(self.clone(), direction)
    }
}

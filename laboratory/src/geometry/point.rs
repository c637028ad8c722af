use serde::{Deserialize, Serialize};

use super::{Direction, Position};

/// A position with a facing direction.
///
/// Serialized as one flat object: `{x, y, z, world, yaw, pitch}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(flatten)]
    position: Position,
    #[serde(flatten)]
    direction: Direction,
}

impl Point {
    pub fn new(position: Position, direction: Direction) -> Self {
        Self {
            position,
            direction,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn add(&self, x: f64, y: f64, z: f64) -> Self {
        self.position.add(x, y, z).with_direction(self.direction)
    }

    pub fn subtract(&self, x: f64, y: f64, z: f64) -> Self {
        self.position.subtract(x, y, z).with_direction(self.direction)
    }
}

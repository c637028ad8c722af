use serde::{Deserialize, Serialize};

use super::{GeometryError, Position, same_world};

/// An axis-aligned box between two positions, bounds inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRegion")]
pub struct Region {
    min: Position,
    max: Position,
}

#[derive(Deserialize)]
struct RawRegion {
    min: Position,
    max: Position,
}

impl TryFrom<RawRegion> for Region {
    type Error = GeometryError;

    fn try_from(raw: RawRegion) -> Result<Self, Self::Error> {
        Region::new(raw.min, raw.max)
    }
}

impl Region {
    /// Build the region spanned by two corners of the same world.
    pub fn new(a: Position, b: Position) -> Result<Self, GeometryError> {
        same_world(a.world(), b.world())?;
        let min = Position::new(
            a.x().min(b.x()),
            a.y().min(b.y()),
            a.z().min(b.z()),
            a.world(),
        );
        let max = Position::new(
            a.x().max(b.x()),
            a.y().max(b.y()),
            a.z().max(b.z()),
            a.world(),
        );
        Ok(Self { min, max })
    }

    pub fn min(&self) -> &Position {
        &self.min
    }

    pub fn max(&self) -> &Position {
        &self.max
    }

    pub fn world(&self) -> &str {
        self.min.world()
    }

    pub fn width(&self) -> f64 {
        self.max.x() - self.min.x()
    }

    pub fn height(&self) -> f64 {
        self.max.y() - self.min.y()
    }

    pub fn depth(&self) -> f64 {
        self.max.z() - self.min.z()
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.world() == self.world()
            && self.contains_xyz(position.x(), position.y(), position.z())
    }

    pub fn contains_xyz(&self, x: f64, y: f64, z: f64) -> bool {
        (self.min.x()..=self.max.x()).contains(&x)
            && (self.min.y()..=self.max.y()).contains(&y)
            && (self.min.z()..=self.max.z()).contains(&z)
    }
}

use std::collections::HashSet;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{BlockPosition, GeometryError, Position};
use crate::core::fast_math;

/// A sphere around `center`, used as a horizontal circle for outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircularRegion")]
pub struct CircularRegion {
    center: Position,
    radius: f64,
}

#[derive(Deserialize)]
struct RawCircularRegion {
    center: Position,
    radius: f64,
}

impl TryFrom<RawCircularRegion> for CircularRegion {
    type Error = GeometryError;

    fn try_from(raw: RawCircularRegion) -> Result<Self, Self::Error> {
        CircularRegion::new(raw.center, raw.radius)
    }
}

impl CircularRegion {
    pub fn new(center: Position, radius: f64) -> Result<Self, GeometryError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(GeometryError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> &Position {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.radius
    }

    /// Strictly inside the sphere and in the same world.
    pub fn contains(&self, position: &Position) -> bool {
        position.world() == self.center.world()
            && position.distance_squared(&self.center) < self.radius * self.radius
    }

    /// Blocks on the horizontal outline at the center's height.
    ///
    /// Samples one point per degree and truncates each offset toward zero.
    pub fn outer_block_positions(&self) -> HashSet<BlockPosition> {
        (0..360u16)
            .map(|degree| {
                let radians = fast_math::to_radians(f32::from(degree));
                let x = f64::from(fast_math::cos(radians)) * self.radius;
                let z = f64::from(fast_math::sin(radians)) * self.radius;
                self.center.add(x.trunc(), 0.0, z.trunc()).floor()
            })
            .collect()
    }
}

use serde::{Deserialize, Serialize};

/// Yaw and pitch in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Direction {
    yaw: f32,
    pitch: f32,
}

impl Direction {
    pub const ZERO: Direction = Direction::new(0.0, 0.0);

    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

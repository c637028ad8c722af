//! Table-driven trigonometry for `f32` angles in radians.

use std::f32::consts::PI;
use std::sync::LazyLock;

const TABLE_SIZE: usize = 65_536;
const RADIANS_TO_INDEX: f32 = 10_430.378;
const QUARTER_TURN: f32 = 16_384.0;

static SIN_TABLE: LazyLock<Box<[f32]>> = LazyLock::new(|| {
    (0..TABLE_SIZE)
        .map(|i| (i as f64 * std::f64::consts::PI * 2.0 / TABLE_SIZE as f64).sin() as f32)
        .collect()
});

fn lookup(index: f32) -> f32 {
    SIN_TABLE[(index as i32 & 0xFFFF) as usize]
}

/// Sine from the lookup table; accurate to about 1e-4.
pub fn sin(radians: f32) -> f32 {
    lookup(radians * RADIANS_TO_INDEX)
}

/// Cosine from the lookup table; accurate to about 1e-4.
pub fn cos(radians: f32) -> f32 {
    lookup(radians * RADIANS_TO_INDEX + QUARTER_TURN)
}

pub fn to_radians(degrees: f32) -> f32 {
    degrees / 180.0 * PI
}

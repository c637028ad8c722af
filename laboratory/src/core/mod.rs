//! Deterministic, pure logic with no I/O.
//!
//! Anything time-dependent takes the current instant as an argument so the
//! results are reproducible in tests.

pub mod cooldown;
pub mod damage;
pub mod duration;
pub mod expression;
pub mod fast_math;
pub mod schedule;

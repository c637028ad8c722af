//! Immutable world-space value types.
//!
//! Every type serializes to the same JSON shape it is read from, e.g. a
//! [`Position`] is `{"x":1.0,"y":64.0,"z":-3.5,"world":"overworld"}` and a
//! [`Point`] flattens its direction into the same object. Regions are
//! normalized (`min <= max` component-wise) on construction and when read.

use thiserror::Error;

mod block_position;
mod block_region;
mod chunk_position;
mod chunk_region;
mod circular_region;
mod direction;
mod point;
mod position;
mod region;

pub use block_position::BlockPosition;
pub use block_region::BlockRegion;
pub use chunk_position::ChunkPosition;
pub use chunk_region::ChunkRegion;
pub use circular_region::CircularRegion;
pub use direction::Direction;
pub use point::Point;
pub use position::Position;
pub use region::Region;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("positions are in different worlds ({first} and {second})")]
    DifferentWorlds { first: String, second: String },
    #[error("radius must be positive (got {0})")]
    NonPositiveRadius(f64),
}

fn same_world(first: &str, second: &str) -> Result<(), GeometryError> {
    if first == second {
        return Ok(());
    }
    Err(GeometryError::DifferentWorlds {
        first: first.to_string(),
        second: second.to_string(),
    })
}

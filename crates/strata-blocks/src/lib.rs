//! Block kinds, packed block states, and block tags.
#![forbid(unsafe_code)]

pub mod state;
pub mod tags;
pub mod types;

pub use state::{DripstoneThickness, MAX_PLANT_AGE};
pub use tags::BlockTag;
pub use types::{Block, BlockKind, FluidState, Shape};

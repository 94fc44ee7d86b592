//! World access traits, deterministic randomness, and reference voxel volumes.
#![forbid(unsafe_code)]

pub mod access;
pub mod behavior;
pub mod caves;
pub mod generator;
pub mod grid;
pub mod random;
pub mod worldgen;

pub use access::{BlockGetter, Heightmap, UpdateFlags, WorldAccess};
pub use behavior::can_survive;
pub use caves::CaveGenerator;
pub use generator::{ChunkGenerator, FlatGenerator};
pub use grid::{BlockChange, VoxelGrid};
pub use random::{RandomSource, WorldRandom};
pub use worldgen::{TerrainConfig, TerrainConfigError, TerrainMode};

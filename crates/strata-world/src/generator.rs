use strata_blocks::Block;
use strata_geom::BlockPos;

use crate::grid::VoxelGrid;
use crate::worldgen::{Layer, TerrainConfig};

/// Terrain source handed through to features that need the sea level.
pub trait ChunkGenerator {
    fn sea_level(&self) -> i32;

    /// Overwrites every cell of `grid` without recording changes.
    fn fill(&self, grid: &mut VoxelGrid);
}

/// Stacks configured layers upward from the bottom of the volume.
#[derive(Clone, Debug)]
pub struct FlatGenerator {
    layers: Vec<Layer>,
    sea_level: i32,
}

impl FlatGenerator {
    pub fn new(layers: Vec<Layer>, sea_level: i32) -> Self {
        Self { layers, sea_level }
    }

    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self::new(cfg.flat.layers.clone(), cfg.sea_level)
    }

    /// Block at height `dy` above the bottom of the volume.
    pub fn block_at(&self, dy: i32) -> Block {
        let mut top = 0;
        for layer in &self.layers {
            top += layer.thickness;
            if dy < top {
                return layer.block;
            }
        }
        Block::AIR
    }
}

impl ChunkGenerator for FlatGenerator {
    #[inline]
    fn sea_level(&self) -> i32 {
        self.sea_level
    }

    fn fill(&self, grid: &mut VoxelGrid) {
        let b = grid.bounds();
        for y in b.min.y..=b.max.y {
            let block = self.block_at(y - b.min.y);
            for z in b.min.z..=b.max.z {
                for x in b.min.x..=b.max.x {
                    grid.put(BlockPos::new(x, y, z), block);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{BlockGetter, Heightmap};
    use strata_blocks::BlockKind;

    #[test]
    fn layers_stack_from_the_bottom() {
        let g = FlatGenerator::from_config(&TerrainConfig::default());
        let mut grid = VoxelGrid::with_size(BlockPos::new(0, -10, 0), 4, 32, 4);
        g.fill(&mut grid);
        assert_eq!(grid.block(BlockPos::new(0, -10, 0)).kind, BlockKind::Bedrock);
        assert_eq!(grid.block(BlockPos::new(1, 6, 1)).kind, BlockKind::GrassBlock);
        assert!(grid.block(BlockPos::new(1, 7, 1)).is_air());
        assert_eq!(grid.height(Heightmap::WorldSurfaceWg, 2, 2), 7);
        assert!(grid.changes().is_empty());
    }
}

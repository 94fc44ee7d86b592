use serde::Deserialize;
use strata_geom::{BlockPos, BoundingBox, ChunkPos, CHUNK_WIDTH};
use strata_world::Heightmap;

use super::{Feature, FeaturePlaceContext};
use crate::template::{StructureProcessor, StructureTemplate, count_empty_corners};

#[derive(Clone, Debug, Deserialize)]
pub struct FossilConfig {
    /// Paired by index with `overlay_structures`.
    pub fossil_structures: Vec<StructureTemplate>,
    pub overlay_structures: Vec<StructureTemplate>,
    #[serde(default)]
    pub fossil_processors: Vec<StructureProcessor>,
    #[serde(default)]
    pub overlay_processors: Vec<StructureProcessor>,
    #[serde(default = "default_max_empty_corners")]
    pub max_empty_corners_allowed: i32,
}

fn default_max_empty_corners() -> i32 {
    4
}

/// Buried skeleton template plus an ore overlay, sunk below the ocean floor.
pub struct FossilFeature;

impl Feature for FossilFeature {
    type Config = FossilConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, FossilConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let rotation = random.next_rotation();
        let index = random.next_int(config.fossil_structures.len() as i32) as usize;
        let fossil = &config.fossil_structures[index];
        let overlay = &config.overlay_structures[index];

        let chunk = ChunkPos::containing(origin);
        let clip = BoundingBox::new(
            BlockPos::new(
                chunk.min_block_x() - CHUNK_WIDTH,
                level.min_build_height(),
                chunk.min_block_z() - CHUNK_WIDTH,
            ),
            BlockPos::new(
                chunk.max_block_x() + CHUNK_WIDTH,
                level.max_build_height() - 1,
                chunk.max_block_z() + CHUNK_WIDTH,
            ),
        );

        let (sx, _, sz) = fossil.rotated_size(rotation);
        let base = origin.offset(-sx / 2, 0, -sz / 2);
        let mut floor = origin.y;
        for dx in 0..sx {
            for dz in 0..sz {
                floor = floor.min(level.height(Heightmap::OceanFloorWg, base.x + dx, base.z + dz));
            }
        }
        let y = (floor - 15 - random.next_int(10)).max(level.min_build_height() + 10);
        let corner = base.at_y(y);
        if count_empty_corners(&*level, &fossil.bounding_box(corner, rotation)) > config.max_empty_corners_allowed {
            return false;
        }

        fossil.place(level, corner, rotation, &clip, &config.fossil_processors, random);
        overlay.place(level, corner, rotation, &clip, &config.overlay_processors, random);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::{Block, BlockKind};
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn bones() -> StructureTemplate {
        let bone = Block::new(BlockKind::BoneBlock);
        StructureTemplate::new(
            (3, 1, 1),
            vec![
                (BlockPos::new(0, 0, 0), bone),
                (BlockPos::new(1, 0, 0), bone),
                (BlockPos::new(2, 0, 0), bone),
            ],
        )
    }

    fn config(max_empty_corners_allowed: i32) -> FossilConfig {
        FossilConfig {
            fossil_structures: vec![bones()],
            overlay_structures: vec![StructureTemplate::new(
                (3, 1, 1),
                vec![(BlockPos::new(1, 0, 0), Block::new(BlockKind::CoalOre))],
            )],
            fossil_processors: Vec::new(),
            overlay_processors: Vec::new(),
            max_empty_corners_allowed,
        }
    }

    #[test]
    fn buries_below_the_floor() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-8, 0, -8), 17, 48, 17);
        g.fill_layers(0, 39, Block::STONE);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let cfg = config(0);
        let mut r = WorldRandom::new(3);
        let ok = FossilFeature.place(FeaturePlaceContext::new(
            &mut g,
            &generator,
            &mut r,
            BlockPos::new(0, 44, 0),
            &cfg,
        ));
        assert!(ok);
        assert_eq!(g.count(|b| b.is(BlockKind::BoneBlock)), 2);
        assert_eq!(g.count(|b| b.is(BlockKind::CoalOre)), 1);
        for c in g.changes() {
            assert!((16..=25).contains(&c.pos.y), "y={}", c.pos.y);
        }
    }

    #[test]
    fn open_cave_declines() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-8, 0, -8), 17, 48, 17);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let cfg = config(0);
        let mut r = WorldRandom::new(3);
        let ok = FossilFeature.place(FeaturePlaceContext::new(
            &mut g,
            &generator,
            &mut r,
            BlockPos::new(0, 44, 0),
            &cfg,
        ));
        assert!(!ok);
        assert!(g.changes().is_empty());
    }
}

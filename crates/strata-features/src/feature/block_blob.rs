use serde::Deserialize;
use strata_blocks::{Block, BlockTag};
use strata_geom::BlockPos;
use strata_world::UpdateFlags;

use super::{Feature, FeaturePlaceContext};

#[derive(Clone, Debug, Deserialize)]
pub struct BlockBlobConfig {
    pub state: Block,
}

/// Three overlapping small spheres dropped onto dirt or stone ground.
pub struct BlockBlobFeature;

impl Feature for BlockBlobFeature {
    type Config = BlockBlobConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, BlockBlobConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            mut origin,
            config,
            ..
        } = ctx;
        let floor = level.min_build_height() + 3;
        while origin.y > floor {
            let below = level.block(origin.below());
            if !below.is_air() && (below.is_in(BlockTag::Dirt) || below.is_in(BlockTag::BaseStoneOverworld)) {
                break;
            }
            origin = origin.below();
        }
        if origin.y <= floor {
            return false;
        }

        for _ in 0..3 {
            let i = random.next_int(2);
            let j = random.next_int(2);
            let k = random.next_int(2);
            let f = (i + j + k) as f32 * 0.333 + 0.5;
            let limit = (f * f) as f64;
            for p in BlockPos::between_closed(origin.offset(-i, -j, -k), origin.offset(i, j, k)) {
                if p.dist_sqr(origin) as f64 <= limit {
                    level.set_block(p, config.state, UpdateFlags(4));
                }
            }
            origin = origin.offset(-1 + random.next_int(2), -random.next_int(2), -1 + random.next_int(2));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::BlockKind;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn drop_blob(g: &mut VoxelGrid, origin: BlockPos) -> bool {
        let generator = FlatGenerator::new(Vec::new(), 0);
        let cfg = BlockBlobConfig {
            state: Block::new(BlockKind::MossyCobblestone),
        };
        let mut r = WorldRandom::new(12);
        BlockBlobFeature.place(FeaturePlaceContext::new(g, &generator, &mut r, origin, &cfg))
    }

    #[test]
    fn falls_to_the_ground() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-4, 0, -4), 9, 20, 9);
        g.fill_layers(0, 5, Block::new(BlockKind::Dirt));
        assert!(drop_blob(&mut g, BlockPos::new(0, 15, 0)));
        assert!(g.block(BlockPos::new(0, 6, 0)).is(BlockKind::MossyCobblestone));
        assert!(g.changes().iter().all(|c| c.pos.y <= 8));
    }

    #[test]
    fn bottomless_column_declines() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-4, 0, -4), 9, 20, 9);
        assert!(!drop_blob(&mut g, BlockPos::new(0, 15, 0)));
        assert!(g.changes().is_empty());
    }
}

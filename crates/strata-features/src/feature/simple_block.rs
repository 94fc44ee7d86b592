use serde::Deserialize;
use strata_world::{UpdateFlags, can_survive};

use super::{Feature, FeaturePlaceContext};
use crate::providers::BlockStateProvider;

#[derive(Clone, Debug, Deserialize)]
pub struct SimpleBlockConfig {
    pub to_place: BlockStateProvider,
}

/// Places one block if it could survive at the origin.
pub struct SimpleBlockFeature;

impl Feature for SimpleBlockFeature {
    type Config = SimpleBlockConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, SimpleBlockConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let state = config.to_place.state(random);
        if !can_survive(&*level, state, origin) {
            return false;
        }
        level.set_block(origin, state, UpdateFlags::CLIENTS);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::{Block, BlockKind};
    use strata_geom::BlockPos;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    #[test]
    fn grass_needs_dirt() {
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 2, 2, 1);
        g.put(BlockPos::new(0, 0, 0), Block::new(BlockKind::Dirt));
        g.put(BlockPos::new(1, 0, 0), Block::STONE);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let cfg = SimpleBlockConfig {
            to_place: Block::new(BlockKind::Grass).into(),
        };
        let mut r = WorldRandom::new(0);
        for (x, expected) in [(0, true), (1, false)] {
            let origin = BlockPos::new(x, 1, 0);
            let ok = SimpleBlockFeature.place(FeaturePlaceContext::new(&mut g, &generator, &mut r, origin, &cfg));
            assert_eq!(ok, expected);
            assert_eq!(g.block(origin).is(BlockKind::Grass), expected);
        }
    }
}

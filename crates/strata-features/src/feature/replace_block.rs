use serde::Deserialize;
use strata_blocks::Block;
use strata_world::UpdateFlags;

use super::{Feature, FeaturePlaceContext};
use crate::rule_test::RuleTest;

#[derive(Clone, Debug, Deserialize)]
pub struct TargetBlockState {
    pub target: RuleTest,
    pub state: Block,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReplaceBlockConfig {
    pub targets: Vec<TargetBlockState>,
}

/// Swaps the origin block for the state of the first matching rule.
pub struct ReplaceBlockFeature;

impl Feature for ReplaceBlockFeature {
    type Config = ReplaceBlockConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, ReplaceBlockConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let current = level.block(origin);
        if let Some(t) = config.targets.iter().find(|t| t.target.test(current, random)) {
            level.set_block(origin, t.state, UpdateFlags::CLIENTS);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::{BlockKind, BlockTag};
    use strata_geom::BlockPos;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    #[test]
    fn first_matching_rule_wins() {
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 1, 1, 1);
        g.put(BlockPos::new(0, 0, 0), Block::new(BlockKind::Deepslate));
        let cfg = ReplaceBlockConfig {
            targets: vec![
                TargetBlockState {
                    target: RuleTest::BlockMatch {
                        block: BlockKind::Stone,
                    },
                    state: Block::new(BlockKind::CoalOre),
                },
                TargetBlockState {
                    target: RuleTest::TagMatch {
                        tag: BlockTag::BaseStoneOverworld,
                    },
                    state: Block::new(BlockKind::DeepslateCoalOre),
                },
                TargetBlockState {
                    target: RuleTest::AlwaysTrue,
                    state: Block::new(BlockKind::Dirt),
                },
            ],
        };
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(0);
        let origin = BlockPos::new(0, 0, 0);
        assert!(ReplaceBlockFeature.place(FeaturePlaceContext::new(&mut g, &generator, &mut r, origin, &cfg)));
        assert!(g.block(origin).is(BlockKind::DeepslateCoalOre));
        assert_eq!(g.changes().len(), 1);
    }
}

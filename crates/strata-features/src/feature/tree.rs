use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::BlockPos;
use strata_world::BlockGetter;

use super::{Feature, FeaturePlaceContext, set_block};
use crate::providers::{BlockStateProvider, IntDistribution, IntProvider};

#[derive(Clone, Debug, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_trunk")]
    pub trunk_provider: BlockStateProvider,
    #[serde(default = "default_foliage")]
    pub foliage_provider: BlockStateProvider,
    #[serde(default = "default_dirt")]
    pub dirt_provider: BlockStateProvider,
    #[serde(default = "default_trunk_height")]
    pub trunk_height: IntProvider,
    #[serde(default = "default_foliage_radius")]
    pub foliage_radius: IntProvider,
}

fn default_trunk() -> BlockStateProvider {
    Block::new(BlockKind::OakLog).into()
}
fn default_foliage() -> BlockStateProvider {
    Block::new(BlockKind::AzaleaLeaves).into()
}
fn default_dirt() -> BlockStateProvider {
    Block::new(BlockKind::RootedDirt).into()
}
fn default_trunk_height() -> IntProvider {
    IntProvider::Sampled(IntDistribution::Uniform {
        min_inclusive: 4,
        max_inclusive: 6,
    })
}
fn default_foliage_radius() -> IntProvider {
    IntProvider::Constant(2)
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            trunk_provider: default_trunk(),
            foliage_provider: default_foliage(),
            dirt_provider: default_dirt(),
            trunk_height: default_trunk_height(),
            foliage_radius: default_foliage_radius(),
        }
    }
}

/// Straight trunk topped with a diamond-shaped leaf blob.
pub struct TreeFeature;

impl Feature for TreeFeature {
    type Config = TreeConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, TreeConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let height = config.trunk_height.sample(random).max(1);
        let radius = config.foliage_radius.sample(random).max(0);

        let ground = level.block(origin.below());
        if !(ground.is_in(BlockTag::Dirt) || ground.is_in(BlockTag::AzaleaGrowsOn)) {
            return false;
        }
        if origin.y + height + 2 >= level.max_build_height() {
            return false;
        }
        if !(0..height).all(|dy| is_free(&*level, origin.above_n(dy))) {
            return false;
        }

        let dirt = config.dirt_provider.state(random);
        set_block(level, origin.below(), dirt);
        for dy in 0..height {
            let log = config.trunk_provider.state(random);
            set_block(level, origin.above_n(dy), log);
        }

        let top = origin.above_n(height - 1);
        for dy in -2i32..=2 {
            let rad = if dy.abs() == 2 { radius - 1 } else { radius };
            let reach = rad + if dy < 1 { 1 } else { 0 };
            if reach < 0 {
                continue;
            }
            for dx in -reach..=reach {
                for dz in -reach..=reach {
                    let man = dx.abs() + dz.abs();
                    if man > reach {
                        continue;
                    }
                    // Trim the outer ring so the blob is not a perfect diamond.
                    if man == reach && reach > 0 && random.next_float() < 0.5 {
                        continue;
                    }
                    let p = top.offset(dx, dy, dz);
                    if is_free(&*level, p) {
                        let leaves = config.foliage_provider.state(random);
                        set_block(level, p, leaves);
                    }
                }
            }
        }
        true
    }
}

fn is_free<W: BlockGetter + ?Sized>(level: &W, pos: BlockPos) -> bool {
    let b = level.block(pos);
    !level.is_outside_build_height(pos.y) && (b.is_air() || b.is_replaceable())
}

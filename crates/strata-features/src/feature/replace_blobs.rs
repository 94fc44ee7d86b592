use serde::Deserialize;
use strata_blocks::{Block, BlockKind};
use strata_geom::BlockPos;
use strata_world::BlockGetter;

use super::{Feature, FeaturePlaceContext, set_block};
use crate::providers::IntProvider;

#[derive(Clone, Debug, Deserialize)]
pub struct ReplaceBlobsConfig {
    pub target: BlockKind,
    pub state: Block,
    pub radius: IntProvider,
}

/// Replaces `target` blocks in a diamond-shaped region around the nearest
/// target at or below the origin.
pub struct ReplaceBlobsFeature;

impl Feature for ReplaceBlobsFeature {
    type Config = ReplaceBlobsConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, ReplaceBlobsConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let start = origin.at_y(
            origin
                .y
                .clamp(level.min_build_height() + 1, level.max_build_height() - 1),
        );
        let Some(center) = find_target(&*level, start, config.target) else {
            return false;
        };
        let rx = config.radius.sample(random);
        let ry = config.radius.sample(random);
        let rz = config.radius.sample(random);
        let reach = rx.max(ry).max(rz);

        let mut replaced = false;
        for p in BlockPos::within_manhattan(center, rx, ry, rz) {
            if p.dist_manhattan(center) > reach {
                break;
            }
            if level.block(p).is(config.target) {
                set_block(level, p, config.state);
                replaced = true;
            }
        }
        replaced
    }
}

fn find_target<W: BlockGetter + ?Sized>(level: &W, start: BlockPos, target: BlockKind) -> Option<BlockPos> {
    let mut m = start;
    while m.y > level.min_build_height() + 1 {
        if level.block(m).is(target) {
            return Some(m);
        }
        m = m.below();
    }
    None
}

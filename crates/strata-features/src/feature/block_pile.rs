use serde::Deserialize;
use strata_blocks::BlockKind;
use strata_geom::{BlockPos, Direction};
use strata_world::{RandomSource, UpdateFlags, WorldAccess};

use super::{Feature, FeaturePlaceContext};
use crate::providers::BlockStateProvider;

#[derive(Clone, Debug, Deserialize)]
pub struct BlockPileConfig {
    pub state_provider: BlockStateProvider,
}

/// Low elliptical heap, one or two blocks tall, with stray blocks around the rim.
pub struct BlockPileFeature;

impl Feature for BlockPileFeature {
    type Config = BlockPileConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, BlockPileConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        if origin.y < level.min_build_height() + 5 {
            return false;
        }
        let rx = 2 + random.next_int(2);
        let rz = 2 + random.next_int(2);
        for p in BlockPos::between_closed(origin.offset(-rx, 0, -rz), origin.offset(rx, 1, rz)) {
            let dx = origin.x - p.x;
            let dz = origin.z - p.z;
            let reach = random.next_float() * 10.0 - random.next_float() * 6.0;
            if (dx * dx + dz * dz) as f32 <= reach {
                try_place(level, random, p, config);
            } else if random.next_float() < 0.031 {
                try_place(level, random, p, config);
            }
        }
        true
    }
}

fn try_place(level: &mut dyn WorldAccess, random: &mut dyn RandomSource, pos: BlockPos, config: &BlockPileConfig) {
    if level.is_empty_block(pos) && may_place_on(&*level, random, pos) {
        let state = config.state_provider.state(random);
        level.set_block(pos, state, UpdateFlags(4));
    }
}

fn may_place_on(level: &dyn WorldAccess, random: &mut dyn RandomSource, pos: BlockPos) -> bool {
    let below = level.block(pos.below());
    if below.is(BlockKind::DirtPath) {
        random.next_bool()
    } else {
        below.is_face_sturdy(Direction::Up)
    }
}

use serde::Deserialize;
use strata_blocks::{Block, BlockKind, MAX_PLANT_AGE};
use strata_geom::BlockPos;
use strata_world::{BlockGetter, RandomSource, UpdateFlags, WorldAccess};

use super::{Feature, FeaturePlaceContext};

#[derive(Clone, Debug, Deserialize)]
pub struct TwistingVinesConfig {
    #[serde(default = "default_spread_width")]
    pub spread_width: i32,
    #[serde(default = "default_spread_height")]
    pub spread_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    #[serde(default = "default_min_age")]
    pub min_age: i32,
    #[serde(default = "default_max_age")]
    pub max_age: i32,
}

fn default_spread_width() -> i32 {
    8
}
fn default_spread_height() -> i32 {
    4
}
fn default_max_height() -> i32 {
    8
}
fn default_min_age() -> i32 {
    17
}
fn default_max_age() -> i32 {
    25
}

impl Default for TwistingVinesConfig {
    fn default() -> Self {
        Self {
            spread_width: default_spread_width(),
            spread_height: default_spread_height(),
            max_height: default_max_height(),
            min_age: default_min_age(),
            max_age: default_max_age(),
        }
    }
}

/// Scatter of upward-growing vine columns on warped nether ground.
///
/// Individual columns land only on valid ground; the feature itself always
/// reports success.
pub struct TwistingVinesFeature;

impl Feature for TwistingVinesFeature {
    type Config = TwistingVinesConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, TwistingVinesConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let w = config.spread_width;
        let h = config.spread_height;
        for _ in 0..w * w {
            let dx = random.next_int_in(-w, w);
            let dy = random.next_int_in(-h, h);
            let dz = random.next_int_in(-w, w);
            let Some(pos) = first_air_above_ground(&*level, origin.offset(dx, dy, dz)) else {
                continue;
            };
            if is_invalid_placement(&*level, pos) {
                continue;
            }
            let mut len = random.next_int_in(1, config.max_height);
            if random.next_int(6) == 0 {
                len *= 2;
            }
            if random.next_int(5) == 0 {
                len = 1;
            }
            place_column(level, random, pos, len, config.min_age, config.max_age);
        }
        true
    }
}

/// Drops from `pos` to the first non-air cell and returns the cell above it.
fn first_air_above_ground<W: BlockGetter + ?Sized>(level: &W, pos: BlockPos) -> Option<BlockPos> {
    let mut m = pos;
    loop {
        m = m.below();
        if level.is_outside_build_height(m.y) {
            return None;
        }
        if !level.block(m).is_air() {
            break;
        }
    }
    Some(m.above())
}

fn is_invalid_placement<W: BlockGetter + ?Sized>(level: &W, pos: BlockPos) -> bool {
    if !level.is_empty_block(pos) {
        return true;
    }
    let below = level.block(pos.below());
    !(below.is(BlockKind::Netherrack) || below.is(BlockKind::WarpedNylium) || below.is(BlockKind::WarpedWartBlock))
}

fn place_column(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    pos: BlockPos,
    len: i32,
    min_age: i32,
    max_age: i32,
) {
    let mut m = pos;
    for i in 1..=len {
        if level.is_empty_block(m) {
            if i == len || !level.is_empty_block(m.above()) {
                let age = random.next_int_in(min_age, max_age).clamp(0, i32::from(MAX_PLANT_AGE));
                let head = Block::new(BlockKind::TwistingVines).with_age(age as u8);
                level.set_block(m, head, UpdateFlags::CLIENTS);
                break;
            }
            level.set_block(m, Block::new(BlockKind::TwistingVinesPlant), UpdateFlags::CLIENTS);
        }
        m = m.above();
    }
}

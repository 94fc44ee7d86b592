use serde::Deserialize;
use strata_geom::{BlockPos, Direction};
use strata_world::{RandomSource, WorldAccess};

use super::{Feature, FeaturePlaceContext};
use crate::dripstone;

#[derive(Clone, Debug, Deserialize)]
pub struct PointedDripstoneConfig {
    #[serde(default = "default_taller")]
    pub chance_of_taller_dripstone: f32,
    #[serde(default = "default_directional_spread")]
    pub chance_of_directional_spread: f32,
    #[serde(default = "default_spread")]
    pub chance_of_spread_radius2: f32,
    #[serde(default = "default_spread")]
    pub chance_of_spread_radius3: f32,
}

fn default_taller() -> f32 {
    0.2
}
fn default_directional_spread() -> f32 {
    0.7
}
fn default_spread() -> f32 {
    0.5
}

impl Default for PointedDripstoneConfig {
    fn default() -> Self {
        Self {
            chance_of_taller_dripstone: default_taller(),
            chance_of_directional_spread: default_directional_spread(),
            chance_of_spread_radius2: default_spread(),
            chance_of_spread_radius3: default_spread(),
        }
    }
}

/// Single small spike with a ragged patch of dripstone blocks at its base.
pub struct PointedDripstoneFeature;

impl Feature for PointedDripstoneFeature {
    type Config = PointedDripstoneConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, PointedDripstoneConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        let Some(tip) = tip_direction(&*level, origin, random) else {
            return false;
        };
        place_patch(level, random, origin.relative(tip.opposite()), config);
        let height = if random.next_float() < config.chance_of_taller_dripstone
            && dripstone::is_empty_or_water(level.block(origin.relative(tip)))
        {
            2
        } else {
            1
        };
        dripstone::grow_pointed_dripstone(level, origin, tip, height, false);
        true
    }
}

fn tip_direction(level: &dyn WorldAccess, pos: BlockPos, random: &mut dyn RandomSource) -> Option<Direction> {
    let above = dripstone::is_dripstone_base(level.block(pos.above()));
    let below = dripstone::is_dripstone_base(level.block(pos.below()));
    match (above, below) {
        (true, true) => Some(if random.next_bool() {
            Direction::Down
        } else {
            Direction::Up
        }),
        (true, false) => Some(Direction::Down),
        (false, true) => Some(Direction::Up),
        (false, false) => None,
    }
}

fn place_patch(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    pos: BlockPos,
    config: &PointedDripstoneConfig,
) {
    dripstone::place_dripstone_block_if_possible(level, pos);
    for dir in Direction::HORIZONTAL {
        if random.next_float() > config.chance_of_directional_spread {
            continue;
        }
        let first = pos.relative(dir);
        dripstone::place_dripstone_block_if_possible(level, first);
        if random.next_float() > config.chance_of_spread_radius2 {
            continue;
        }
        let second = first.relative(random.next_direction());
        dripstone::place_dripstone_block_if_possible(level, second);
        if random.next_float() > config.chance_of_spread_radius3 {
            continue;
        }
        let third = second.relative(random.next_direction());
        dripstone::place_dripstone_block_if_possible(level, third);
    }
}

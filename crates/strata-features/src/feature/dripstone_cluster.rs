use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::{BlockPos, Direction};
use strata_world::{RandomSource, WorldAccess};

use super::{Feature, FeaturePlaceContext, set_block};
use crate::column::Column;
use crate::dripstone;
use crate::providers::{
    FloatDistribution, FloatProvider, IntDistribution, IntProvider, clamped_map, clamped_normal,
};

#[derive(Clone, Debug, Deserialize)]
pub struct DripstoneClusterConfig {
    #[serde(default = "default_search_range")]
    pub floor_to_ceiling_search_range: i32,
    #[serde(default = "default_height")]
    pub height: IntProvider,
    #[serde(default = "default_radius")]
    pub radius: IntProvider,
    #[serde(default = "default_height_diff")]
    pub max_stalagmite_stalactite_height_diff: i32,
    #[serde(default = "default_height_deviation")]
    pub height_deviation: i32,
    #[serde(default = "default_layer_thickness")]
    pub dripstone_block_layer_thickness: IntProvider,
    #[serde(default = "default_density")]
    pub density: FloatProvider,
    #[serde(default = "default_wetness")]
    pub wetness: FloatProvider,
    #[serde(default = "default_chance_at_max_distance")]
    pub chance_of_dripstone_column_at_max_distance_from_center: f32,
    #[serde(default = "default_edge_distance")]
    pub max_distance_from_edge_affecting_chance_of_dripstone_column: i32,
    #[serde(default = "default_center_distance")]
    pub max_distance_from_center_affecting_height_bias: i32,
}

fn default_search_range() -> i32 {
    12
}
fn default_height() -> IntProvider {
    IntProvider::Sampled(IntDistribution::Uniform {
        min_inclusive: 3,
        max_inclusive: 6,
    })
}
fn default_radius() -> IntProvider {
    IntProvider::Sampled(IntDistribution::Uniform {
        min_inclusive: 2,
        max_inclusive: 8,
    })
}
fn default_height_diff() -> i32 {
    1
}
fn default_height_deviation() -> i32 {
    3
}
fn default_layer_thickness() -> IntProvider {
    IntProvider::Sampled(IntDistribution::Uniform {
        min_inclusive: 2,
        max_inclusive: 4,
    })
}
fn default_density() -> FloatProvider {
    FloatProvider::Sampled(FloatDistribution::Uniform {
        min_inclusive: 0.3,
        max_exclusive: 0.7,
    })
}
fn default_wetness() -> FloatProvider {
    FloatProvider::Sampled(FloatDistribution::ClampedNormal {
        mean: 0.1,
        deviation: 0.3,
        min: 0.1,
        max: 0.9,
    })
}
fn default_chance_at_max_distance() -> f32 {
    0.1
}
fn default_edge_distance() -> i32 {
    3
}
fn default_center_distance() -> i32 {
    8
}

impl Default for DripstoneClusterConfig {
    fn default() -> Self {
        Self {
            floor_to_ceiling_search_range: default_search_range(),
            height: default_height(),
            radius: default_radius(),
            max_stalagmite_stalactite_height_diff: default_height_diff(),
            height_deviation: default_height_deviation(),
            dripstone_block_layer_thickness: default_layer_thickness(),
            density: default_density(),
            wetness: default_wetness(),
            chance_of_dripstone_column_at_max_distance_from_center: default_chance_at_max_distance(),
            max_distance_from_edge_affecting_chance_of_dripstone_column: default_edge_distance(),
            max_distance_from_center_affecting_height_bias: default_center_distance(),
        }
    }
}

/// Field of stalactites and stalagmites around a cave opening, with the odd pool.
pub struct DripstoneClusterFeature;

impl Feature for DripstoneClusterFeature {
    type Config = DripstoneClusterConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, DripstoneClusterConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            config,
            ..
        } = ctx;
        if !dripstone::is_empty_or_water(level.block(origin)) {
            return false;
        }
        let height = config.height.sample(random);
        let wetness = config.wetness.sample(random);
        let density = config.density.sample(random);
        let rx = config.radius.sample(random);
        let rz = config.radius.sample(random);

        for dx in -rx..=rx {
            for dz in -rz..=rz {
                let chance = column_chance(rx, rz, dx, dz, config);
                let col = Columnar {
                    pos: origin.offset(dx, 0, dz),
                    dx,
                    dz,
                    wetness,
                    chance,
                    height,
                    density,
                };
                col.place(level, random, config);
            }
        }
        true
    }
}

struct Columnar {
    pos: BlockPos,
    dx: i32,
    dz: i32,
    wetness: f32,
    chance: f64,
    height: i32,
    density: f32,
}

impl Columnar {
    fn place(&self, level: &mut dyn WorldAccess, random: &mut dyn RandomSource, config: &DripstoneClusterConfig) {
        let Some(scanned) = Column::scan(
            &*level,
            self.pos,
            config.floor_to_ceiling_search_range,
            dripstone::is_empty_or_water,
            dripstone::is_neither_empty_nor_water,
        ) else {
            return;
        };
        let ceiling = scanned.ceiling;
        if ceiling.is_none() && scanned.floor.is_none() {
            return;
        }

        let wet = random.next_float() < self.wetness;
        let column = match scanned.floor {
            Some(floor) if wet && can_place_pool(&*level, self.pos.at_y(floor)) => {
                set_block(level, self.pos.at_y(floor), Block::WATER);
                scanned.with_floor(Some(floor - 1))
            }
            _ => scanned,
        };
        let floor = column.floor;

        let roll = random.next_double() < self.chance;
        let stalactite = match ceiling {
            Some(c) if roll && !is_lava(&*level, self.pos.at_y(c)) => {
                let thickness = config.dripstone_block_layer_thickness.sample(random);
                replace_with_dripstone_blocks(level, self.pos.at_y(c), thickness, Direction::Up);
                let max = match floor {
                    Some(f) => self.height.min(c - f),
                    None => self.height,
                };
                self.spike_height(random, max, config)
            }
            _ => 0,
        };

        let roll = random.next_double() < self.chance;
        let stalagmite = match floor {
            Some(f) if roll && !is_lava(&*level, self.pos.at_y(f)) => {
                let thickness = config.dripstone_block_layer_thickness.sample(random);
                replace_with_dripstone_blocks(level, self.pos.at_y(f), thickness, Direction::Down);
                if ceiling.is_some() {
                    let diff = config.max_stalagmite_stalactite_height_diff;
                    (stalactite + random.next_int_between_inclusive(-diff, diff)).max(0)
                } else {
                    self.spike_height(random, self.height, config)
                }
            }
            _ => 0,
        };

        let (down, up) = match (ceiling, floor) {
            (Some(c), Some(f)) if c - stalactite <= f + stalagmite => {
                let lo = (c - stalactite).max(f + 1);
                let hi = (f + stalagmite).min(c - 1);
                let meet = random.next_int_between_inclusive(lo, hi + 1);
                (c - meet, meet - 1 - f)
            }
            _ => (stalactite, stalagmite),
        };

        let merge = random.next_bool()
            && down > 0
            && up > 0
            && column.height().is_some_and(|h| down + up == h);
        if let Some(c) = ceiling {
            dripstone::grow_pointed_dripstone(level, self.pos.at_y(c - 1), Direction::Down, down, merge);
        }
        if let Some(f) = floor {
            dripstone::grow_pointed_dripstone(level, self.pos.at_y(f + 1), Direction::Up, up, merge);
        }
    }

    fn spike_height(&self, random: &mut dyn RandomSource, max_height: i32, config: &DripstoneClusterConfig) -> i32 {
        if random.next_float() > self.density {
            return 0;
        }
        let dist = self.dx.abs() + self.dz.abs();
        let mean = clamped_map(
            dist as f64,
            0.0,
            config.max_distance_from_center_affecting_height_bias as f64,
            max_height as f64 / 2.0,
            0.0,
        ) as f32;
        clamped_normal(random, mean, config.height_deviation as f32, 0.0, max_height as f32) as i32
    }
}

fn column_chance(rx: i32, rz: i32, dx: i32, dz: i32, config: &DripstoneClusterConfig) -> f64 {
    let edge = (rx - dx.abs()).min(rz - dz.abs());
    clamped_map(
        edge as f64,
        0.0,
        config.max_distance_from_edge_affecting_chance_of_dripstone_column as f64,
        config.chance_of_dripstone_column_at_max_distance_from_center as f64,
        1.0,
    )
}

fn is_lava(level: &dyn WorldAccess, pos: BlockPos) -> bool {
    level.block(pos).is(BlockKind::Lava)
}

fn can_place_pool(level: &dyn WorldAccess, pos: BlockPos) -> bool {
    let b = level.block(pos);
    if b.is(BlockKind::Water) || b.is(BlockKind::DripstoneBlock) || b.is(BlockKind::PointedDripstone) {
        return false;
    }
    if level.fluid(pos.above()).is_water() {
        return false;
    }
    Direction::HORIZONTAL
        .into_iter()
        .all(|d| can_be_adjacent_to_water(level, pos.relative(d)))
        && can_be_adjacent_to_water(level, pos.below())
}

fn can_be_adjacent_to_water(level: &dyn WorldAccess, pos: BlockPos) -> bool {
    let b = level.block(pos);
    b.is_in(BlockTag::BaseStoneOverworld) || b.fluid_state().is_water()
}

fn replace_with_dripstone_blocks(level: &mut dyn WorldAccess, pos: BlockPos, thickness: i32, direction: Direction) {
    let mut m = pos;
    for _ in 0..thickness {
        if !dripstone::place_dripstone_block_if_possible(level, m) {
            return;
        }
        m = m.relative(direction);
    }
}

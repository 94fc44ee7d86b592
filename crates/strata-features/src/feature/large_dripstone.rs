use std::f32::consts::PI;

use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::{BlockPos, Direction, Vec3};
use strata_world::{Heightmap, RandomSource, UpdateFlags, WorldAccess};

use super::{Feature, FeaturePlaceContext};
use crate::column::Column;
use crate::dripstone;
use crate::providers::{FloatDistribution, FloatProvider, IntDistribution, IntProvider};

#[derive(Clone, Debug, Deserialize)]
pub struct LargeDripstoneConfig {
    #[serde(default = "default_search_range")]
    pub floor_to_ceiling_search_range: i32,
    #[serde(default = "default_column_radius")]
    pub column_radius: IntProvider,
    #[serde(default = "default_height_scale")]
    pub height_scale: FloatProvider,
    #[serde(default = "default_radius_ratio")]
    pub max_column_radius_to_cave_height_ratio: f32,
    #[serde(default = "default_stalactite_bluntness")]
    pub stalactite_bluntness: FloatProvider,
    #[serde(default = "default_stalagmite_bluntness")]
    pub stalagmite_bluntness: FloatProvider,
    #[serde(default = "default_wind_speed")]
    pub wind_speed: FloatProvider,
    #[serde(default = "default_min_radius_for_wind")]
    pub min_radius_for_wind: i32,
    #[serde(default = "default_min_bluntness_for_wind")]
    pub min_bluntness_for_wind: f32,
}

fn uniform(min_inclusive: f32, max_exclusive: f32) -> FloatProvider {
    FloatProvider::Sampled(FloatDistribution::Uniform {
        min_inclusive,
        max_exclusive,
    })
}

fn default_search_range() -> i32 {
    30
}
fn default_column_radius() -> IntProvider {
    IntProvider::Sampled(IntDistribution::Uniform {
        min_inclusive: 3,
        max_inclusive: 19,
    })
}
fn default_height_scale() -> FloatProvider {
    uniform(0.4, 2.0)
}
fn default_radius_ratio() -> f32 {
    0.33
}
fn default_stalactite_bluntness() -> FloatProvider {
    uniform(0.3, 0.9)
}
fn default_stalagmite_bluntness() -> FloatProvider {
    uniform(0.4, 1.0)
}
fn default_wind_speed() -> FloatProvider {
    uniform(0.0, 0.3)
}
fn default_min_radius_for_wind() -> i32 {
    4
}
fn default_min_bluntness_for_wind() -> f32 {
    0.6
}

impl Default for LargeDripstoneConfig {
    fn default() -> Self {
        Self {
            floor_to_ceiling_search_range: default_search_range(),
            column_radius: default_column_radius(),
            height_scale: default_height_scale(),
            max_column_radius_to_cave_height_ratio: default_radius_ratio(),
            stalactite_bluntness: default_stalactite_bluntness(),
            stalagmite_bluntness: default_stalagmite_bluntness(),
            wind_speed: default_wind_speed(),
            min_radius_for_wind: default_min_radius_for_wind(),
            min_bluntness_for_wind: default_min_bluntness_for_wind(),
        }
    }
}

/// Opposing pair of thick dripstone cones filling a cave column.
pub struct LargeDripstoneFeature;

impl Feature for LargeDripstoneFeature {
    type Config = LargeDripstoneConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, LargeDripstoneConfig>) -> bool {
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
        let Some(Column {
            ceiling: Some(ceiling),
            floor: Some(floor),
        }) = Column::scan(
            &*level,
            origin,
            config.floor_to_ceiling_search_range,
            dripstone::is_empty_or_water,
            dripstone::is_dripstone_base_or_lava,
        )
        else {
            return false;
        };
        let height = ceiling - floor - 1;
        if height < 4 {
            return false;
        }

        let (rmin, rmax) = (config.column_radius.min_value(), config.column_radius.max_value());
        let capped = ((height as f32 * config.max_column_radius_to_cave_height_ratio) as i32).clamp(rmin, rmax);
        let radius = random.next_int_between_inclusive(rmin, capped);

        let mut stalactite = LargeDripstone::new(
            origin.at_y(ceiling - 1),
            false,
            random,
            radius,
            &config.stalactite_bluntness,
            &config.height_scale,
        );
        let mut stalagmite = LargeDripstone::new(
            origin.at_y(floor + 1),
            true,
            random,
            radius,
            &config.stalagmite_bluntness,
            &config.height_scale,
        );
        let wind = if stalactite.is_suitable_for_wind(config) && stalagmite.is_suitable_for_wind(config) {
            WindOffsetter::new(origin.y, random, &config.wind_speed)
        } else {
            WindOffsetter::none()
        };

        let down_ok = stalactite.move_back_until_base_is_inside_stone(&*level, &wind);
        let up_ok = stalagmite.move_back_until_base_is_inside_stone(&*level, &wind);
        if down_ok {
            stalactite.place_blocks(level, random, &wind);
        }
        if up_ok {
            stalagmite.place_blocks(level, random, &wind);
        }
        true
    }
}

/// Horizontal drift applied in proportion to the distance from the origin height.
#[derive(Clone, Copy, Debug)]
pub struct WindOffsetter {
    origin_y: i32,
    speed: Option<Vec3>,
}

impl WindOffsetter {
    pub fn new(origin_y: i32, random: &mut dyn RandomSource, magnitude: &FloatProvider) -> Self {
        let f = magnitude.sample(random);
        let angle = random.float_between(0.0, PI);
        Self {
            origin_y,
            speed: Some(Vec3::new((angle.cos() * f) as f64, 0.0, (angle.sin() * f) as f64)),
        }
    }

    pub fn none() -> Self {
        Self {
            origin_y: 0,
            speed: None,
        }
    }

    pub fn offset(&self, pos: BlockPos) -> BlockPos {
        match self.speed {
            None => pos,
            Some(speed) => {
                let v = speed.scale((self.origin_y - pos.y) as f64);
                pos.offset_f64(v.x, 0.0, v.z)
            }
        }
    }
}

pub(crate) struct LargeDripstone {
    pub(crate) root: BlockPos,
    pub(crate) pointing_up: bool,
    pub(crate) radius: i32,
    pub(crate) bluntness: f64,
    pub(crate) scale: f64,
}

impl LargeDripstone {
    fn new(
        root: BlockPos,
        pointing_up: bool,
        random: &mut dyn RandomSource,
        radius: i32,
        bluntness: &FloatProvider,
        scale: &FloatProvider,
    ) -> Self {
        let bluntness = bluntness.sample(random) as f64;
        let scale = scale.sample(random) as f64;
        Self {
            root,
            pointing_up,
            radius,
            bluntness,
            scale,
        }
    }

    #[inline]
    fn height_at_radius(&self, r: f32) -> i32 {
        dripstone::dripstone_height(r as f64, self.radius as f64, self.scale, self.bluntness) as i32
    }

    fn is_suitable_for_wind(&self, config: &LargeDripstoneConfig) -> bool {
        self.radius >= config.min_radius_for_wind && self.bluntness >= config.min_bluntness_for_wind as f64
    }

    #[inline]
    fn away_from_tip(&self) -> Direction {
        if self.pointing_up { Direction::Down } else { Direction::Up }
    }

    /// Walks the root into the rock until the base circle is embedded, halving
    /// the radius after each unsuccessful run. False on lava or when the radius
    /// reaches one.
    pub(crate) fn move_back_until_base_is_inside_stone(
        &mut self,
        level: &dyn WorldAccess,
        wind: &WindOffsetter,
    ) -> bool {
        while self.radius > 1 {
            let mut m = self.root;
            let attempts = self.height_at_radius(0.0).min(10);
            for _ in 0..attempts {
                if level.block(m).is(BlockKind::Lava) {
                    return false;
                }
                if dripstone::is_circle_mostly_embedded_in_stone(level, wind.offset(m), self.radius) {
                    self.root = m;
                    return true;
                }
                m = m.relative(self.away_from_tip());
            }
            self.radius /= 2;
        }
        false
    }

    fn place_blocks(&self, level: &mut dyn WorldAccess, random: &mut dyn RandomSource, wind: &WindOffsetter) {
        let toward_tip = self.away_from_tip().opposite();
        for dx in -self.radius..=self.radius {
            for dz in -self.radius..=self.radius {
                let f = ((dx * dx + dz * dz) as f32).sqrt();
                if f > self.radius as f32 {
                    continue;
                }
                let mut k = self.height_at_radius(f);
                if k <= 0 {
                    continue;
                }
                if random.next_float() < 0.2 {
                    k = (k as f32 * random.float_between(0.8, 1.0)) as i32;
                }
                let mut m = self.root.offset(dx, 0, dz);
                let limit = if self.pointing_up {
                    level.height(Heightmap::WorldSurfaceWg, m.x, m.z)
                } else {
                    i32::MAX
                };
                let mut placed = false;
                let mut n = 0;
                while n < k && m.y < limit {
                    let p = wind.offset(m);
                    let here = level.block(p);
                    if dripstone::is_empty_or_water_or_lava(here) {
                        placed = true;
                        level.set_block(p, Block::DRIPSTONE_BLOCK, UpdateFlags::CLIENTS);
                    } else if placed && here.is_in(BlockTag::BaseStoneOverworld) {
                        break;
                    }
                    m = m.relative(toward_tip);
                    n += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::{VoxelGrid, WorldRandom};

    #[test]
    fn no_wind_is_identity() {
        let w = WindOffsetter::none();
        let p = BlockPos::new(3, -7, 11);
        assert_eq!(w.offset(p), p);
    }

    #[test]
    fn wind_grows_with_distance_from_origin() {
        let w = WindOffsetter {
            origin_y: 10,
            speed: Some(Vec3::new(0.5, 0.0, 0.0)),
        };
        assert_eq!(w.offset(BlockPos::new(0, 10, 0)), BlockPos::new(0, 10, 0));
        assert_eq!(w.offset(BlockPos::new(0, 6, 0)), BlockPos::new(2, 6, 0));
        assert_eq!(w.offset(BlockPos::new(0, 14, 0)), BlockPos::new(-2, 14, 0));
    }

    #[test]
    fn open_void_shrinks_radius_to_one() {
        let g = VoxelGrid::with_size(BlockPos::new(-20, 0, -20), 41, 40, 41);
        let mut d = LargeDripstone {
            root: BlockPos::new(0, 20, 0),
            pointing_up: true,
            radius: 16,
            bluntness: 0.5,
            scale: 1.5,
        };
        assert!(!d.move_back_until_base_is_inside_stone(&g, &WindOffsetter::none()));
        assert_eq!(d.radius, 1);
    }

    #[test]
    fn wind_draws_speed_then_angle() {
        let mut a = WorldRandom::new(9);
        let mut b = a.clone();
        let w = WindOffsetter::new(0, &mut a, &FloatProvider::Constant(0.25));
        let angle = b.float_between(0.0, PI);
        let speed = w.speed.unwrap();
        assert!((speed.x - (angle.cos() * 0.25) as f64).abs() < 1e-6);
        assert!((speed.z - (angle.sin() * 0.25) as f64).abs() < 1e-6);
    }
}

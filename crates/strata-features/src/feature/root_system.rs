use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::{BlockPos, Direction};
use strata_world::{BlockGetter, ChunkGenerator, RandomSource, UpdateFlags, WorldAccess, can_survive};

use super::{ConfiguredFeature, Feature, FeaturePlaceContext};
use crate::predicate::BlockPredicate;
use crate::providers::BlockStateProvider;

#[derive(Clone, Debug, Deserialize)]
pub struct RootSystemConfig {
    /// Placed on top of the root column; usually a tree.
    pub feature: Box<ConfiguredFeature>,
    #[serde(default = "default_vertical_space")]
    pub required_vertical_space_for_tree: i32,
    #[serde(default = "default_radius")]
    pub root_radius: i32,
    #[serde(default = "default_root_replaceable")]
    pub root_replaceable: BlockTag,
    #[serde(default = "default_root_state")]
    pub root_state_provider: BlockStateProvider,
    #[serde(default = "default_attempts")]
    pub root_placement_attempts: i32,
    #[serde(default = "default_column_max_height")]
    pub root_column_max_height: i32,
    #[serde(default = "default_radius")]
    pub hanging_root_radius: i32,
    #[serde(default = "default_vertical_span")]
    pub hanging_roots_vertical_span: i32,
    #[serde(default = "default_hanging_state")]
    pub hanging_root_state_provider: BlockStateProvider,
    #[serde(default = "default_attempts")]
    pub hanging_root_placement_attempts: i32,
    #[serde(default = "default_allowed_water")]
    pub allowed_vertical_water_for_tree: i32,
    #[serde(default = "default_tree_position")]
    pub allowed_tree_position: BlockPredicate,
}

fn default_vertical_space() -> i32 {
    3
}
fn default_radius() -> i32 {
    3
}
fn default_root_replaceable() -> BlockTag {
    BlockTag::AzaleaRootReplaceable
}
fn default_root_state() -> BlockStateProvider {
    Block::new(BlockKind::RootedDirt).into()
}
fn default_attempts() -> i32 {
    20
}
fn default_column_max_height() -> i32 {
    100
}
fn default_vertical_span() -> i32 {
    2
}
fn default_hanging_state() -> BlockStateProvider {
    Block::new(BlockKind::HangingRoots).into()
}
fn default_allowed_water() -> i32 {
    2
}
fn default_tree_position() -> BlockPredicate {
    BlockPredicate::Replaceable {
        offset: BlockPos::default(),
    }
}

/// Tree on the surface above a cave, with rooted dirt down the column and
/// hanging roots from the cave ceiling.
pub struct RootSystemFeature;

impl Feature for RootSystemFeature {
    type Config = RootSystemConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, RootSystemConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            generator,
            random,
            origin,
            config,
        } = ctx;
        if !level.block(origin).is_air() {
            return false;
        }
        if place_dirt_and_tree(level, generator, random, origin, config) {
            place_roots(level, random, origin, config);
        }
        true
    }
}

fn place_dirt_and_tree(
    level: &mut dyn WorldAccess,
    generator: &dyn ChunkGenerator,
    random: &mut dyn RandomSource,
    origin: BlockPos,
    config: &RootSystemConfig,
) -> bool {
    let mut m = origin;
    for i in 0..config.root_column_max_height {
        m = m.above();
        if !(config.allowed_tree_position.test(&*level, m) && space_for_tree(&*level, m, config)) {
            continue;
        }
        let below = level.block(m.below());
        if below.fluid_state().is_lava() || !below.is_solid() {
            return false;
        }
        if config.feature.place(&mut *level, generator, &mut *random, m) {
            place_dirt(level, random, origin, origin.y + i, config);
            return true;
        }
    }
    false
}

fn space_for_tree<W: BlockGetter + ?Sized>(level: &W, pos: BlockPos, config: &RootSystemConfig) -> bool {
    (1..=config.required_vertical_space_for_tree).all(|i| {
        let b = level.block(pos.above_n(i));
        b.is_air() || (i < config.allowed_vertical_water_for_tree && b.fluid_state().is_water())
    })
}

fn place_dirt(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    origin: BlockPos,
    max_y: i32,
    config: &RootSystemConfig,
) {
    let r = config.root_radius;
    for y in origin.y..max_y {
        let column = origin.at_y(y);
        for _ in 0..config.root_placement_attempts {
            let dx = random.next_int(r) - random.next_int(r);
            let dz = random.next_int(r) - random.next_int(r);
            let p = column.offset(dx, 0, dz);
            if level.block(p).is_in(config.root_replaceable) {
                let state = config.root_state_provider.state(random);
                level.set_block(p, state, UpdateFlags::CLIENTS);
            }
        }
    }
}

fn place_roots(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    origin: BlockPos,
    config: &RootSystemConfig,
) {
    let r = config.hanging_root_radius;
    let span = config.hanging_roots_vertical_span;
    for _ in 0..config.hanging_root_placement_attempts {
        let dx = random.next_int(r) - random.next_int(r);
        let dy = random.next_int(span) - random.next_int(span);
        let dz = random.next_int(r) - random.next_int(r);
        let p = origin.offset(dx, dy, dz);
        if !level.is_empty_block(p) {
            continue;
        }
        let state = config.hanging_root_state_provider.state(random);
        if can_survive(&*level, state, p) && level.block(p.above()).is_face_sturdy(Direction::Down) {
            level.set_block(p, state, UpdateFlags::CLIENTS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::TreeConfig;
    use strata_world::{FlatGenerator, VoxelGrid, WorldRandom};

    fn config() -> RootSystemConfig {
        RootSystemConfig {
            feature: Box::new(ConfiguredFeature::Tree(TreeConfig::default())),
            required_vertical_space_for_tree: default_vertical_space(),
            root_radius: default_radius(),
            root_replaceable: default_root_replaceable(),
            root_state_provider: default_root_state(),
            root_placement_attempts: default_attempts(),
            root_column_max_height: default_column_max_height(),
            hanging_root_radius: default_radius(),
            hanging_roots_vertical_span: default_vertical_span(),
            hanging_root_state_provider: default_hanging_state(),
            hanging_root_placement_attempts: default_attempts(),
            allowed_vertical_water_for_tree: default_allowed_water(),
            allowed_tree_position: default_tree_position(),
        }
    }

    #[test]
    fn solid_origin_declines() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-4, 0, -4), 9, 9, 9);
        g.fill(Block::STONE);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(1);
        let cfg = config();
        let ok = RootSystemFeature.place(FeaturePlaceContext::new(
            &mut g,
            &generator,
            &mut r,
            BlockPos::new(0, 4, 0),
            &cfg,
        ));
        assert!(!ok);
    }

    #[test]
    fn cave_under_meadow_gets_tree_and_roots() {
        // Cave air at y 2..=4, stone roof 5..=9, dirt 10..=11, open sky above.
        let mut g = VoxelGrid::with_size(BlockPos::new(-8, 0, -8), 17, 24, 17);
        g.fill_layers(0, 1, Block::STONE);
        g.fill_layers(5, 9, Block::STONE);
        g.fill_layers(10, 11, Block::new(BlockKind::Dirt));
        let generator = FlatGenerator::new(Vec::new(), 0);
        let cfg = config();
        let mut r = WorldRandom::new(77);
        let ok = RootSystemFeature.place(FeaturePlaceContext::new(
            &mut g,
            &generator,
            &mut r,
            BlockPos::new(0, 4, 0),
            &cfg,
        ));
        assert!(ok);
        assert!(g.block(BlockPos::new(0, 12, 0)).is(BlockKind::OakLog));
        assert!(g.count(|b| b.is(BlockKind::RootedDirt)) > 0);
        for c in g.changes() {
            if c.block.is(BlockKind::HangingRoots) {
                assert!(g.block(c.pos.above()).is_face_sturdy(Direction::Down));
            }
        }
    }
}

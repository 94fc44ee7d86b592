use serde::Deserialize;
use strata_blocks::{Block, BlockTag};
use strata_geom::{BlockPos, Direction};
use strata_world::{ChunkGenerator, RandomSource, UpdateFlags, WorldAccess};

use super::{ConfiguredFeature, Feature, FeaturePlaceContext};
use crate::providers::{BlockStateProvider, IntProvider};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaveSurface {
    Floor,
    Ceiling,
}

impl CaveSurface {
    /// Direction from an open cell towards the surface it rests on.
    #[inline]
    pub fn direction(self) -> Direction {
        match self {
            CaveSurface::Floor => Direction::Down,
            CaveSurface::Ceiling => Direction::Up,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct VegetationPatchConfig {
    pub replaceable: BlockTag,
    pub ground_state: BlockStateProvider,
    pub vegetation_feature: Box<ConfiguredFeature>,
    pub surface: CaveSurface,
    pub depth: IntProvider,
    #[serde(default)]
    pub extra_bottom_block_chance: f32,
    pub vertical_range: i32,
    #[serde(default)]
    pub vegetation_chance: f32,
    pub xz_radius: IntProvider,
    #[serde(default)]
    pub extra_edge_column_chance: f32,
}

/// Carpet of ground blocks on a cave floor or ceiling, dotted with vegetation.
pub struct VegetationPatchFeature;

impl Feature for VegetationPatchFeature {
    type Config = VegetationPatchConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, VegetationPatchConfig>) -> bool {
        place_patch(ctx, false)
    }
}

/// Same patch, with enclosed ground cells flooded and vegetation waterlogged.
pub struct WaterloggedVegetationPatchFeature;

impl Feature for WaterloggedVegetationPatchFeature {
    type Config = VegetationPatchConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, VegetationPatchConfig>) -> bool {
        place_patch(ctx, true)
    }
}

fn place_patch(ctx: FeaturePlaceContext<'_, VegetationPatchConfig>, waterlogged: bool) -> bool {
    let FeaturePlaceContext {
        level,
        generator,
        random,
        origin,
        config,
    } = ctx;
    let xr = config.xz_radius.sample(random) + 1;
    let zr = config.xz_radius.sample(random) + 1;
    let mut ground = place_ground_patch(level, random, origin, xr, zr, config);
    if waterlogged {
        ground = flood_enclosed(level, ground);
    }
    for &pos in &ground {
        if config.vegetation_chance > 0.0 && random.next_float() < config.vegetation_chance {
            if waterlogged {
                place_waterlogged_vegetation(level, generator, random, pos, config);
            } else {
                place_vegetation(level, generator, random, pos, config);
            }
        }
    }
    !ground.is_empty()
}

fn place_ground_patch(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    origin: BlockPos,
    xr: i32,
    zr: i32,
    config: &VegetationPatchConfig,
) -> Vec<BlockPos> {
    let toward = config.surface.direction();
    let away = toward.opposite();
    let mut accepted = Vec::new();
    for i in -xr..=xr {
        let x_edge = i == -xr || i == xr;
        for j in -zr..=zr {
            let z_edge = j == -zr || j == zr;
            if x_edge && z_edge {
                continue;
            }
            if (x_edge || z_edge)
                && (config.extra_edge_column_chance == 0.0 || random.next_float() > config.extra_edge_column_chance)
            {
                continue;
            }

            let mut m = origin.offset(i, 0, j);
            let mut k = 0;
            while level.block(m).is_air() && k < config.vertical_range {
                m = m.relative(toward);
                k += 1;
            }
            let mut k = 0;
            while !level.block(m).is_air() && k < config.vertical_range {
                m = m.relative(away);
                k += 1;
            }

            let surface = m.relative(toward);
            if !(level.is_empty_block(m) && level.block(surface).is_face_sturdy(away)) {
                continue;
            }
            let depth = config.depth.sample(random);
            let extra = config.extra_bottom_block_chance > 0.0 && random.next_float() < config.extra_bottom_block_chance;
            let depth = depth + i32::from(extra);
            if place_ground(level, random, surface, depth, config) {
                accepted.push(surface);
            }
        }
    }
    accepted
}

/// Converts up to `depth` cells into the ground state, walking into the surface.
/// A column already made of the ground block is left as is.
fn place_ground(
    level: &mut dyn WorldAccess,
    random: &mut dyn RandomSource,
    start: BlockPos,
    depth: i32,
    config: &VegetationPatchConfig,
) -> bool {
    let mut m = start;
    for i in 0..depth {
        let state = config.ground_state.state(random);
        let current = level.block(m);
        if state.kind != current.kind {
            if !current.is_in(config.replaceable) {
                return i != 0;
            }
            level.set_block(m, state, UpdateFlags::CLIENTS);
            m = m.relative(config.surface.direction());
        }
    }
    true
}

fn place_vegetation(
    level: &mut dyn WorldAccess,
    generator: &dyn ChunkGenerator,
    random: &mut dyn RandomSource,
    pos: BlockPos,
    config: &VegetationPatchConfig,
) -> bool {
    let at = pos.relative(config.surface.direction().opposite());
    config.vegetation_feature.place(level, generator, random, at)
}

fn flood_enclosed(level: &mut dyn WorldAccess, ground: Vec<BlockPos>) -> Vec<BlockPos> {
    let kept: Vec<BlockPos> = ground
        .into_iter()
        .filter(|&p| !is_exposed(&*level, p))
        .collect();
    for &p in &kept {
        level.set_block(p, Block::WATER, UpdateFlags::CLIENTS);
    }
    kept
}

fn is_exposed(level: &dyn WorldAccess, pos: BlockPos) -> bool {
    [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::Down,
    ]
    .into_iter()
    .any(|d| !level.block(pos.relative(d)).is_face_sturdy(d.opposite()))
}

fn place_waterlogged_vegetation(
    level: &mut dyn WorldAccess,
    generator: &dyn ChunkGenerator,
    random: &mut dyn RandomSource,
    pos: BlockPos,
    config: &VegetationPatchConfig,
) -> bool {
    if !place_vegetation(level, generator, random, pos.below(), config) {
        return false;
    }
    let here = level.block(pos);
    if here.kind.is_waterloggable() && !here.is_waterlogged() {
        level.set_block(pos, here.with_waterlogged(true), UpdateFlags::CLIENTS);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::SimpleBlockConfig;
    use crate::providers::IntDistribution;
    use strata_blocks::BlockKind;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn moss_patch(surface: CaveSurface) -> VegetationPatchConfig {
        VegetationPatchConfig {
            replaceable: BlockTag::MossReplaceable,
            ground_state: Block::new(BlockKind::MossBlock).into(),
            vegetation_feature: Box::new(ConfiguredFeature::SimpleBlock(SimpleBlockConfig {
                to_place: Block::new(BlockKind::MossCarpet).into(),
            })),
            surface,
            depth: IntProvider::Constant(1),
            extra_bottom_block_chance: 0.0,
            vertical_range: 5,
            vegetation_chance: 1.0,
            xz_radius: IntProvider::Constant(2),
            extra_edge_column_chance: 0.0,
        }
    }

    fn cave() -> VoxelGrid {
        let mut g = VoxelGrid::with_size(BlockPos::new(-6, 0, -6), 13, 12, 13);
        g.fill_layers(0, 3, Block::STONE);
        g.fill_layers(9, 11, Block::STONE);
        g
    }

    fn run<F: Feature<Config = VegetationPatchConfig>>(feature: F, g: &mut VoxelGrid, cfg: &VegetationPatchConfig) -> bool {
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(10);
        feature.place(FeaturePlaceContext::new(g, &generator, &mut r, BlockPos::new(0, 6, 0), cfg))
    }

    #[test]
    fn floor_patch_mosses_the_ground_inside_the_square() {
        let mut g = cave();
        let cfg = moss_patch(CaveSurface::Floor);
        assert!(run(VegetationPatchFeature, &mut g, &cfg));
        // xz radius 2 + 1, edges dropped: the inner 5x5 gets moss.
        assert_eq!(g.count(|b| b.is(BlockKind::MossBlock)), 25);
        assert_eq!(g.count(|b| b.is(BlockKind::MossCarpet)), 25);
        assert!(g.block(BlockPos::new(0, 3, 0)).is(BlockKind::MossBlock));
        assert!(g.block(BlockPos::new(3, 3, 0)).is(BlockKind::Stone));
    }

    #[test]
    fn ceiling_patch_walks_up() {
        let mut g = cave();
        let mut cfg = moss_patch(CaveSurface::Ceiling);
        cfg.vegetation_chance = 0.0;
        assert!(run(VegetationPatchFeature, &mut g, &cfg));
        assert!(g.block(BlockPos::new(0, 9, 0)).is(BlockKind::MossBlock));
        assert!(g.block(BlockPos::new(0, 3, 0)).is(BlockKind::Stone));
    }

    #[test]
    fn waterlogged_patch_floods_enclosed_cells_and_waterlogs_plants() {
        let mut g = cave();
        let mut cfg = moss_patch(CaveSurface::Floor);
        cfg.vegetation_feature = Box::new(ConfiguredFeature::SimpleBlock(SimpleBlockConfig {
            to_place: Block::new(BlockKind::PointedDripstone).into(),
        }));
        assert!(run(WaterloggedVegetationPatchFeature, &mut g, &cfg));
        let flooded: Vec<_> = g.changes().iter().filter(|c| c.block.is(BlockKind::Water)).collect();
        assert_eq!(flooded.len(), 25);
        assert!(flooded.iter().all(|c| c.pos.y == 3));
        let spike = g.block(BlockPos::new(0, 3, 0));
        assert!(spike.is(BlockKind::PointedDripstone));
        assert!(spike.is_waterlogged());
    }

    #[test]
    fn unbacked_column_is_skipped() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-6, 0, -6), 13, 12, 13);
        let cfg = moss_patch(CaveSurface::Floor);
        assert!(!run(VegetationPatchFeature, &mut g, &cfg));
        assert!(g.changes().is_empty());
    }

    #[test]
    fn depth_is_sampled_before_the_extra_bottom_block() {
        let mut cfg = moss_patch(CaveSurface::Floor);
        cfg.xz_radius = IntProvider::Constant(0);
        cfg.vegetation_chance = 0.0;
        cfg.depth = IntProvider::Sampled(IntDistribution::Uniform {
            min_inclusive: 1,
            max_inclusive: 2,
        });
        cfg.extra_bottom_block_chance = 0.5;
        let generator = FlatGenerator::new(Vec::new(), 0);
        for seed in 0..32 {
            let mut r = WorldRandom::new(seed);
            let mut replay = r.clone();
            let expected = cfg.depth.sample(&mut replay) + i32::from(replay.next_float() < 0.5);

            let mut g = cave();
            let origin = BlockPos::new(0, 6, 0);
            assert!(VegetationPatchFeature.place(FeaturePlaceContext::new(&mut g, &generator, &mut r, origin, &cfg)));
            assert_eq!(g.count(|b| b.is(BlockKind::MossBlock)), expected as usize, "seed {seed}");
        }
    }
}

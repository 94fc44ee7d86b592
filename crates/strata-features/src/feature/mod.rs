//! Placement algorithms and the configured-feature dispatch.
//!
//! Every feature exposes one operation, [`Feature::place`], which reports
//! whether anything was placed. A `false` return may still leave earlier
//! writes in the volume; there is no rollback.

mod block_blob;
mod block_pile;
mod blue_ice;
mod dripstone_cluster;
mod end_island;
mod fossil;
mod large_dripstone;
mod pointed_dripstone;
mod replace_blobs;
mod replace_block;
mod root_system;
mod selector;
mod simple_block;
mod tree;
mod twisting_vines;
mod vegetation_patch;
mod vines;

pub use block_blob::{BlockBlobConfig, BlockBlobFeature};
pub use block_pile::{BlockPileConfig, BlockPileFeature};
pub use blue_ice::BlueIceFeature;
pub use dripstone_cluster::{DripstoneClusterConfig, DripstoneClusterFeature};
pub use end_island::EndIslandFeature;
pub use fossil::{FossilConfig, FossilFeature};
pub use large_dripstone::{LargeDripstoneConfig, LargeDripstoneFeature, WindOffsetter};
pub use pointed_dripstone::{PointedDripstoneConfig, PointedDripstoneFeature};
pub use replace_blobs::{ReplaceBlobsConfig, ReplaceBlobsFeature};
pub use replace_block::{ReplaceBlockConfig, ReplaceBlockFeature, TargetBlockState};
pub use root_system::{RootSystemConfig, RootSystemFeature};
pub use selector::{
    RandomBooleanSelectorConfig, RandomBooleanSelectorFeature, RandomSelectorConfig,
    RandomSelectorFeature, SimpleRandomSelectorConfig, SimpleRandomSelectorFeature,
    WeightedFeature,
};
pub use simple_block::{SimpleBlockConfig, SimpleBlockFeature};
pub use tree::{TreeConfig, TreeFeature};
pub use twisting_vines::{TwistingVinesConfig, TwistingVinesFeature};
pub use vegetation_patch::{
    CaveSurface, VegetationPatchConfig, VegetationPatchFeature, WaterloggedVegetationPatchFeature,
};
pub use vines::VinesFeature;

use serde::Deserialize;
use strata_blocks::Block;
use strata_geom::BlockPos;
use strata_world::{ChunkGenerator, RandomSource, UpdateFlags, WorldAccess};

/// Everything one placement call sees. Lives for the duration of that call.
pub struct FeaturePlaceContext<'a, C> {
    pub level: &'a mut dyn WorldAccess,
    pub generator: &'a dyn ChunkGenerator,
    pub random: &'a mut dyn RandomSource,
    pub origin: BlockPos,
    pub config: &'a C,
}

impl<'a, C> FeaturePlaceContext<'a, C> {
    pub fn new(
        level: &'a mut dyn WorldAccess,
        generator: &'a dyn ChunkGenerator,
        random: &'a mut dyn RandomSource,
        origin: BlockPos,
        config: &'a C,
    ) -> Self {
        Self {
            level,
            generator,
            random,
            origin,
            config,
        }
    }
}

pub trait Feature {
    type Config;

    fn place(&self, ctx: FeaturePlaceContext<'_, Self::Config>) -> bool;
}

/// Does nothing and reports success.
pub struct NoOpFeature;

impl Feature for NoOpFeature {
    type Config = ();

    fn place(&self, _ctx: FeaturePlaceContext<'_, ()>) -> bool {
        true
    }
}

/// Write used by features for regular blocks.
#[inline]
pub(crate) fn set_block(level: &mut dyn WorldAccess, pos: BlockPos, block: Block) -> bool {
    level.set_block(pos, block, UpdateFlags::ALL)
}

/// A feature kind bound to its configuration, as loaded from TOML.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConfiguredFeature {
    NoOp,
    DripstoneCluster(DripstoneClusterConfig),
    LargeDripstone(LargeDripstoneConfig),
    PointedDripstone(PointedDripstoneConfig),
    BlockBlob(BlockBlobConfig),
    BlockPile(BlockPileConfig),
    BlueIce,
    EndIsland,
    RootSystem(RootSystemConfig),
    Tree(TreeConfig),
    SimpleBlock(SimpleBlockConfig),
    TwistingVines(TwistingVinesConfig),
    VegetationPatch(VegetationPatchConfig),
    WaterloggedVegetationPatch(VegetationPatchConfig),
    ReplaceBlobs(ReplaceBlobsConfig),
    ReplaceBlock(ReplaceBlockConfig),
    Fossil(FossilConfig),
    Vines,
    RandomBooleanSelector(RandomBooleanSelectorConfig),
    RandomSelector(RandomSelectorConfig),
    SimpleRandomSelector(SimpleRandomSelectorConfig),
}

impl ConfiguredFeature {
    pub fn place(
        &self,
        level: &mut dyn WorldAccess,
        generator: &dyn ChunkGenerator,
        random: &mut dyn RandomSource,
        origin: BlockPos,
    ) -> bool {
        macro_rules! run {
            ($feature:expr, $config:expr) => {
                $feature.place(FeaturePlaceContext::new(level, generator, random, origin, $config))
            };
        }
        match self {
            ConfiguredFeature::NoOp => run!(NoOpFeature, &()),
            ConfiguredFeature::DripstoneCluster(c) => run!(DripstoneClusterFeature, c),
            ConfiguredFeature::LargeDripstone(c) => run!(LargeDripstoneFeature, c),
            ConfiguredFeature::PointedDripstone(c) => run!(PointedDripstoneFeature, c),
            ConfiguredFeature::BlockBlob(c) => run!(BlockBlobFeature, c),
            ConfiguredFeature::BlockPile(c) => run!(BlockPileFeature, c),
            ConfiguredFeature::BlueIce => run!(BlueIceFeature, &()),
            ConfiguredFeature::EndIsland => run!(EndIslandFeature, &()),
            ConfiguredFeature::RootSystem(c) => run!(RootSystemFeature, c),
            ConfiguredFeature::Tree(c) => run!(TreeFeature, c),
            ConfiguredFeature::SimpleBlock(c) => run!(SimpleBlockFeature, c),
            ConfiguredFeature::TwistingVines(c) => run!(TwistingVinesFeature, c),
            ConfiguredFeature::VegetationPatch(c) => run!(VegetationPatchFeature, c),
            ConfiguredFeature::WaterloggedVegetationPatch(c) => {
                run!(WaterloggedVegetationPatchFeature, c)
            }
            ConfiguredFeature::ReplaceBlobs(c) => run!(ReplaceBlobsFeature, c),
            ConfiguredFeature::ReplaceBlock(c) => run!(ReplaceBlockFeature, c),
            ConfiguredFeature::Fossil(c) => run!(FossilFeature, c),
            ConfiguredFeature::Vines => run!(VinesFeature, &()),
            ConfiguredFeature::RandomBooleanSelector(c) => run!(RandomBooleanSelectorFeature, c),
            ConfiguredFeature::RandomSelector(c) => run!(RandomSelectorFeature, c),
            ConfiguredFeature::SimpleRandomSelector(c) => run!(SimpleRandomSelectorFeature, c),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ConfiguredFeature::NoOp => "no_op",
            ConfiguredFeature::DripstoneCluster(_) => "dripstone_cluster",
            ConfiguredFeature::LargeDripstone(_) => "large_dripstone",
            ConfiguredFeature::PointedDripstone(_) => "pointed_dripstone",
            ConfiguredFeature::BlockBlob(_) => "block_blob",
            ConfiguredFeature::BlockPile(_) => "block_pile",
            ConfiguredFeature::BlueIce => "blue_ice",
            ConfiguredFeature::EndIsland => "end_island",
            ConfiguredFeature::RootSystem(_) => "root_system",
            ConfiguredFeature::Tree(_) => "tree",
            ConfiguredFeature::SimpleBlock(_) => "simple_block",
            ConfiguredFeature::TwistingVines(_) => "twisting_vines",
            ConfiguredFeature::VegetationPatch(_) => "vegetation_patch",
            ConfiguredFeature::WaterloggedVegetationPatch(_) => "waterlogged_vegetation_patch",
            ConfiguredFeature::ReplaceBlobs(_) => "replace_blobs",
            ConfiguredFeature::ReplaceBlock(_) => "replace_block",
            ConfiguredFeature::Fossil(_) => "fossil",
            ConfiguredFeature::Vines => "vines",
            ConfiguredFeature::RandomBooleanSelector(_) => "random_boolean_selector",
            ConfiguredFeature::RandomSelector(_) => "random_selector",
            ConfiguredFeature::SimpleRandomSelector(_) => "simple_random_selector",
        }
    }
}

//! Feature placement: configured decoration algorithms run against a mutable voxel volume.
#![forbid(unsafe_code)]

pub mod column;
pub mod dripstone;
pub mod feature;
pub mod predicate;
pub mod providers;
pub mod registry;
pub mod rule_test;
pub mod template;

pub use column::Column;
pub use feature::{ConfiguredFeature, Feature, FeaturePlaceContext, NoOpFeature};
pub use predicate::BlockPredicate;
pub use providers::{
    BlockStateProvider, FloatDistribution, FloatProvider, IntDistribution, IntProvider, WeightedState,
    clamped_map, clamped_normal,
};
pub use registry::{ConfigError, FeatureRegistry};
pub use rule_test::RuleTest;
pub use template::{StructureProcessor, StructureTemplate};

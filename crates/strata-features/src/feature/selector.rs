use serde::Deserialize;

use super::{ConfiguredFeature, Feature, FeaturePlaceContext};

#[derive(Clone, Debug, Deserialize)]
pub struct RandomBooleanSelectorConfig {
    pub feature_true: Box<ConfiguredFeature>,
    pub feature_false: Box<ConfiguredFeature>,
}

/// One coin flip between two sub-features.
pub struct RandomBooleanSelectorFeature;

impl Feature for RandomBooleanSelectorFeature {
    type Config = RandomBooleanSelectorConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, RandomBooleanSelectorConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            generator,
            random,
            origin,
            config,
        } = ctx;
        let chosen = if random.next_bool() {
            &config.feature_true
        } else {
            &config.feature_false
        };
        chosen.place(level, generator, random, origin)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WeightedFeature {
    pub feature: ConfiguredFeature,
    pub chance: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RandomSelectorConfig {
    /// Tried in order; the first entry whose draw lands under its chance is placed.
    pub features: Vec<WeightedFeature>,
    pub default: Box<ConfiguredFeature>,
}

/// Ordered chance list with a fallback.
pub struct RandomSelectorFeature;

impl Feature for RandomSelectorFeature {
    type Config = RandomSelectorConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, RandomSelectorConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            generator,
            random,
            origin,
            config,
        } = ctx;
        for entry in &config.features {
            if random.next_float() < entry.chance {
                return entry.feature.place(level, generator, random, origin);
            }
        }
        config.default.place(level, generator, random, origin)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SimpleRandomSelectorConfig {
    pub features: Vec<ConfiguredFeature>,
}

/// Uniform pick from a non-empty list.
pub struct SimpleRandomSelectorFeature;

impl Feature for SimpleRandomSelectorFeature {
    type Config = SimpleRandomSelectorConfig;

    fn place(&self, ctx: FeaturePlaceContext<'_, SimpleRandomSelectorConfig>) -> bool {
        let FeaturePlaceContext {
            level,
            generator,
            random,
            origin,
            config,
        } = ctx;
        let i = random.next_int(config.features.len() as i32) as usize;
        config.features[i].place(level, generator, random, origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::BlockBlobConfig;
    use strata_blocks::{Block, BlockKind};
    use strata_geom::BlockPos;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn marker(kind: BlockKind) -> ConfiguredFeature {
        ConfiguredFeature::ReplaceBlock(crate::feature::ReplaceBlockConfig {
            targets: vec![crate::feature::TargetBlockState {
                target: crate::rule_test::RuleTest::AlwaysTrue,
                state: Block::new(kind),
            }],
        })
    }

    #[test]
    fn boolean_selector_hits_both_branches() {
        let cfg = RandomBooleanSelectorConfig {
            feature_true: Box::new(marker(BlockKind::Sand)),
            feature_false: Box::new(marker(BlockKind::Gravel)),
        };
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(40);
        let mut seen = (false, false);
        for _ in 0..32 {
            let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 1, 1, 1);
            let origin = BlockPos::new(0, 0, 0);
            assert!(RandomBooleanSelectorFeature.place(FeaturePlaceContext::new(
                &mut g,
                &generator,
                &mut r,
                origin,
                &cfg
            )));
            match g.block(origin).kind {
                BlockKind::Sand => seen.0 = true,
                BlockKind::Gravel => seen.1 = true,
                other => panic!("unexpected {other}"),
            }
        }
        assert_eq!(seen, (true, true));
    }

    #[test]
    fn simple_selector_delegates_result() {
        let cfg = SimpleRandomSelectorConfig {
            features: vec![ConfiguredFeature::BlockBlob(BlockBlobConfig {
                state: Block::STONE,
            })],
        };
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 1, 4, 1);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(0);
        // Blob declines this close to the bottom, and so does the selector.
        assert!(!SimpleRandomSelectorFeature.place(FeaturePlaceContext::new(
            &mut g,
            &generator,
            &mut r,
            BlockPos::new(0, 2, 0),
            &cfg
        )));
    }
}

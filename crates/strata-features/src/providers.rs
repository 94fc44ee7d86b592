//! Sampled numeric ranges and block-state providers used by feature configs.

use serde::Deserialize;
use strata_blocks::Block;
use strata_world::RandomSource;

/// An integer that is either fixed or drawn per placement.
///
/// TOML accepts a bare integer or a table with a `type` key.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IntProvider {
    Constant(i32),
    Sampled(IntDistribution),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntDistribution {
    Uniform {
        min_inclusive: i32,
        max_inclusive: i32,
    },
    /// Nested uniform draw; small values are more likely.
    BiasedToBottom {
        min_inclusive: i32,
        max_inclusive: i32,
    },
    ClampedNormal {
        mean: f32,
        deviation: f32,
        min_inclusive: i32,
        max_inclusive: i32,
    },
    Clamped {
        source: Box<IntProvider>,
        min_inclusive: i32,
        max_inclusive: i32,
    },
}

impl IntProvider {
    pub fn sample(&self, random: &mut dyn RandomSource) -> i32 {
        match self {
            IntProvider::Constant(v) => *v,
            IntProvider::Sampled(d) => d.sample(random),
        }
    }

    pub fn min_value(&self) -> i32 {
        match self {
            IntProvider::Constant(v) => *v,
            IntProvider::Sampled(d) => d.min_value(),
        }
    }

    pub fn max_value(&self) -> i32 {
        match self {
            IntProvider::Constant(v) => *v,
            IntProvider::Sampled(d) => d.max_value(),
        }
    }

    /// Problem with the declared range, if any.
    pub fn check(&self) -> Result<(), String> {
        match self {
            IntProvider::Constant(_) => Ok(()),
            IntProvider::Sampled(IntDistribution::Clamped { source, .. }) => {
                source.check()?;
                self.check_range()
            }
            IntProvider::Sampled(IntDistribution::ClampedNormal { deviation, .. }) if *deviation < 0.0 => {
                Err(format!("negative deviation {deviation}"))
            }
            IntProvider::Sampled(_) => self.check_range(),
        }
    }

    fn check_range(&self) -> Result<(), String> {
        let (lo, hi) = (self.min_value(), self.max_value());
        if lo > hi {
            Err(format!("range {lo}..={hi} is empty"))
        } else {
            Ok(())
        }
    }
}

impl IntDistribution {
    fn sample(&self, random: &mut dyn RandomSource) -> i32 {
        match *self {
            IntDistribution::Uniform {
                min_inclusive,
                max_inclusive,
            } => random.next_int_between_inclusive(min_inclusive, max_inclusive),
            IntDistribution::BiasedToBottom {
                min_inclusive,
                max_inclusive,
            } => {
                let upper = random.next_int(max_inclusive - min_inclusive + 1) + 1;
                min_inclusive + random.next_int(upper)
            }
            IntDistribution::ClampedNormal {
                mean,
                deviation,
                min_inclusive,
                max_inclusive,
            } => {
                let v = mean + random.next_gaussian() as f32 * deviation;
                v.max(min_inclusive as f32).min(max_inclusive as f32) as i32
            }
            IntDistribution::Clamped {
                ref source,
                min_inclusive,
                max_inclusive,
            } => source.sample(random).max(min_inclusive).min(max_inclusive),
        }
    }

    fn min_value(&self) -> i32 {
        match self {
            IntDistribution::Uniform { min_inclusive, .. }
            | IntDistribution::BiasedToBottom { min_inclusive, .. }
            | IntDistribution::ClampedNormal { min_inclusive, .. } => *min_inclusive,
            IntDistribution::Clamped {
                source,
                min_inclusive,
                ..
            } => source.min_value().max(*min_inclusive),
        }
    }

    fn max_value(&self) -> i32 {
        match self {
            IntDistribution::Uniform { max_inclusive, .. }
            | IntDistribution::BiasedToBottom { max_inclusive, .. }
            | IntDistribution::ClampedNormal { max_inclusive, .. } => *max_inclusive,
            IntDistribution::Clamped {
                source,
                max_inclusive,
                ..
            } => source.max_value().min(*max_inclusive),
        }
    }
}

impl From<i32> for IntProvider {
    fn from(v: i32) -> Self {
        IntProvider::Constant(v)
    }
}

/// A float that is either fixed or drawn per placement.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FloatProvider {
    Constant(f32),
    Sampled(FloatDistribution),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FloatDistribution {
    Uniform {
        min_inclusive: f32,
        max_exclusive: f32,
    },
    ClampedNormal {
        mean: f32,
        deviation: f32,
        min: f32,
        max: f32,
    },
    /// Sum of two uniform draws; flat between the plateau edges.
    Trapezoid { min: f32, max: f32, plateau: f32 },
}

impl FloatProvider {
    pub fn sample(&self, random: &mut dyn RandomSource) -> f32 {
        match *self {
            FloatProvider::Constant(v) => v,
            FloatProvider::Sampled(FloatDistribution::Uniform {
                min_inclusive,
                max_exclusive,
            }) => random.float_between(min_inclusive, max_exclusive),
            FloatProvider::Sampled(FloatDistribution::ClampedNormal {
                mean,
                deviation,
                min,
                max,
            }) => clamped_normal(random, mean, deviation, min, max),
            FloatProvider::Sampled(FloatDistribution::Trapezoid { min, max, plateau }) => {
                let range = max - min;
                let slope = (range - plateau) / 2.0;
                let rest = range - slope;
                min + random.next_float() * rest + random.next_float() * slope
            }
        }
    }

    pub fn min_value(&self) -> f32 {
        match *self {
            FloatProvider::Constant(v) => v,
            FloatProvider::Sampled(FloatDistribution::Uniform { min_inclusive, .. }) => min_inclusive,
            FloatProvider::Sampled(FloatDistribution::ClampedNormal { min, .. })
            | FloatProvider::Sampled(FloatDistribution::Trapezoid { min, .. }) => min,
        }
    }

    pub fn max_value(&self) -> f32 {
        match *self {
            FloatProvider::Constant(v) => v,
            FloatProvider::Sampled(FloatDistribution::Uniform { max_exclusive, .. }) => max_exclusive,
            FloatProvider::Sampled(FloatDistribution::ClampedNormal { max, .. })
            | FloatProvider::Sampled(FloatDistribution::Trapezoid { max, .. }) => max,
        }
    }

    pub fn check(&self) -> Result<(), String> {
        let (lo, hi) = (self.min_value(), self.max_value());
        match *self {
            FloatProvider::Sampled(FloatDistribution::Uniform { .. }) if lo >= hi => {
                Err(format!("uniform range {lo}..{hi} is empty"))
            }
            FloatProvider::Sampled(FloatDistribution::Trapezoid { plateau, .. })
                if plateau < 0.0 || plateau > hi - lo =>
            {
                Err(format!("trapezoid plateau {plateau} does not fit {lo}..{hi}"))
            }
            _ if lo > hi => Err(format!("range {lo}..{hi} is empty")),
            _ => Ok(()),
        }
    }
}

impl From<f32> for FloatProvider {
    fn from(v: f32) -> Self {
        FloatProvider::Constant(v)
    }
}

/// `mean + gaussian * deviation`, clamped into `[min, max]`.
pub fn clamped_normal(random: &mut dyn RandomSource, mean: f32, deviation: f32, min: f32, max: f32) -> f32 {
    let v = mean + random.next_gaussian() as f32 * deviation;
    v.max(min).min(max)
}

/// Picks the block a feature writes. TOML accepts a bare block name, or
/// `{ weighted = [{ data = "...", weight = N }, ...] }`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BlockStateProvider {
    Simple(Block),
    Weighted { weighted: Vec<WeightedState> },
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct WeightedState {
    pub data: Block,
    pub weight: i32,
}

impl BlockStateProvider {
    pub fn state(&self, random: &mut dyn RandomSource) -> Block {
        match self {
            BlockStateProvider::Simple(b) => *b,
            BlockStateProvider::Weighted { weighted } => {
                let total: i32 = weighted.iter().map(|w| w.weight).sum();
                let mut pick = random.next_int(total);
                for w in weighted {
                    pick -= w.weight;
                    if pick < 0 {
                        return w.data;
                    }
                }
                Block::AIR
            }
        }
    }

    pub fn check(&self) -> Result<(), String> {
        match self {
            BlockStateProvider::Simple(_) => Ok(()),
            BlockStateProvider::Weighted { weighted } if weighted.is_empty() => {
                Err("weighted provider has no entries".into())
            }
            BlockStateProvider::Weighted { weighted } => match weighted.iter().find(|w| w.weight <= 0) {
                Some(w) => Err(format!("weight {} for {} must be positive", w.weight, w.data)),
                None => Ok(()),
            },
        }
    }
}

impl From<Block> for BlockStateProvider {
    fn from(b: Block) -> Self {
        BlockStateProvider::Simple(b)
    }
}

/// Linear remap of `value` from `[from_min, from_max]` to `[to_min, to_max]`, clamped at both ends.
pub fn clamped_map(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let t = ((value - from_min) / (from_max - from_min)).clamp(0.0, 1.0);
    to_min + t * (to_max - to_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::BlockKind;

    #[derive(Deserialize)]
    struct Doc {
        a: IntProvider,
        b: IntProvider,
        c: FloatProvider,
        d: BlockStateProvider,
        e: BlockStateProvider,
    }

    #[test]
    fn providers_parse_both_forms() {
        let doc: Doc = toml::from_str(
            r#"
            a = 4
            b = { type = "uniform", min_inclusive = 2, max_inclusive = 8 }
            c = { type = "clamped_normal", mean = 0.1, deviation = 0.3, min = 0.1, max = 0.9 }
            d = "moss_block"
            e = { weighted = [{ data = "grass", weight = 3 }, { data = "moss_carpet", weight = 1 }] }
            "#,
        )
        .unwrap();
        assert_eq!(doc.a, IntProvider::Constant(4));
        assert_eq!((doc.b.min_value(), doc.b.max_value()), (2, 8));
        assert_eq!(doc.c.max_value(), 0.9);
        assert_eq!(doc.d, BlockStateProvider::Simple(Block::new(BlockKind::MossBlock)));
        assert!(doc.e.check().is_ok());
    }

    #[test]
    fn clamped_map_saturates() {
        assert_eq!(clamped_map(-1.0, 0.0, 4.0, 0.1, 1.0), 0.1);
        assert_eq!(clamped_map(9.0, 0.0, 4.0, 0.1, 1.0), 1.0);
        assert!((clamped_map(2.0, 0.0, 4.0, 0.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let p = IntProvider::Sampled(IntDistribution::Uniform {
            min_inclusive: 5,
            max_inclusive: 1,
        });
        assert!(p.check().is_err());
        let w = BlockStateProvider::Weighted { weighted: vec![] };
        assert!(w.check().is_err());
    }
}

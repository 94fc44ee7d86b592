use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_world::RandomSource;

/// Block-only test used by replacement rules.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleTest {
    AlwaysTrue,
    BlockMatch { block: BlockKind },
    TagMatch { tag: BlockTag },
    /// Matches `block`, then passes with `probability`.
    RandomBlockMatch { block: BlockKind, probability: f32 },
}

impl RuleTest {
    pub fn test(&self, block: Block, random: &mut dyn RandomSource) -> bool {
        match *self {
            RuleTest::AlwaysTrue => true,
            RuleTest::BlockMatch { block: kind } => block.is(kind),
            RuleTest::TagMatch { tag } => block.is_in(tag),
            RuleTest::RandomBlockMatch { block: kind, probability } => {
                block.is(kind) && random.next_float() < probability
            }
        }
    }
}

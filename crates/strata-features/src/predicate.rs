use serde::Deserialize;
use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::BlockPos;
use strata_world::{BlockGetter, can_survive};

/// Position test evaluated against the live volume.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockPredicate {
    MatchingBlocks {
        blocks: Vec<BlockKind>,
        #[serde(default)]
        offset: BlockPos,
    },
    MatchingBlockTag {
        tag: BlockTag,
        #[serde(default)]
        offset: BlockPos,
    },
    Solid {
        #[serde(default)]
        offset: BlockPos,
    },
    Replaceable {
        #[serde(default)]
        offset: BlockPos,
    },
    WouldSurvive {
        state: Block,
        #[serde(default)]
        offset: BlockPos,
    },
    AllOf {
        predicates: Vec<BlockPredicate>,
    },
    AnyOf {
        predicates: Vec<BlockPredicate>,
    },
    Not {
        predicate: Box<BlockPredicate>,
    },
    True,
}

impl BlockPredicate {
    pub fn test<W: BlockGetter + ?Sized>(&self, level: &W, pos: BlockPos) -> bool {
        let at = |o: &BlockPos| pos.offset(o.x, o.y, o.z);
        match self {
            BlockPredicate::MatchingBlocks { blocks, offset } => {
                let kind = level.block(at(offset)).kind;
                blocks.contains(&kind)
            }
            BlockPredicate::MatchingBlockTag { tag, offset } => level.block(at(offset)).is_in(*tag),
            BlockPredicate::Solid { offset } => level.block(at(offset)).is_solid(),
            BlockPredicate::Replaceable { offset } => level.block(at(offset)).is_replaceable(),
            BlockPredicate::WouldSurvive { state, offset } => can_survive(level, *state, at(offset)),
            BlockPredicate::AllOf { predicates } => predicates.iter().all(|p| p.test(level, pos)),
            BlockPredicate::AnyOf { predicates } => predicates.iter().any(|p| p.test(level, pos)),
            BlockPredicate::Not { predicate } => !predicate.test(level, pos),
            BlockPredicate::True => true,
        }
    }
}

impl Default for BlockPredicate {
    fn default() -> Self {
        BlockPredicate::True
    }
}

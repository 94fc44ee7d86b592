use serde::{Deserialize, Serialize};

use crate::BlockKind;

/// Named block sets that feature rules test against.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    BaseStoneOverworld,
    DripstoneReplaceable,
    Dirt,
    MossReplaceable,
    LushGroundReplaceable,
    AzaleaGrowsOn,
    AzaleaRootReplaceable,
    FeaturesCannotReplace,
    Leaves,
    Logs,
    Ice,
    Nylium,
}

impl BlockTag {
    pub const ALL: [BlockTag; 12] = [
        BlockTag::BaseStoneOverworld,
        BlockTag::DripstoneReplaceable,
        BlockTag::Dirt,
        BlockTag::MossReplaceable,
        BlockTag::LushGroundReplaceable,
        BlockTag::AzaleaGrowsOn,
        BlockTag::AzaleaRootReplaceable,
        BlockTag::FeaturesCannotReplace,
        BlockTag::Leaves,
        BlockTag::Logs,
        BlockTag::Ice,
        BlockTag::Nylium,
    ];

    pub fn contains(self, kind: BlockKind) -> bool {
        use BlockKind as K;
        match self {
            BlockTag::BaseStoneOverworld | BlockTag::DripstoneReplaceable => matches!(
                kind,
                K::Stone | K::Granite | K::Diorite | K::Andesite | K::Deepslate | K::Tuff
            ),
            BlockTag::Dirt => matches!(
                kind,
                K::Dirt | K::CoarseDirt | K::GrassBlock | K::RootedDirt | K::MossBlock
            ),
            BlockTag::MossReplaceable => {
                BlockTag::BaseStoneOverworld.contains(kind) || BlockTag::Dirt.contains(kind)
            }
            BlockTag::LushGroundReplaceable => {
                BlockTag::MossReplaceable.contains(kind)
                    || matches!(kind, K::Clay | K::Gravel | K::Sand)
            }
            BlockTag::AzaleaGrowsOn => BlockTag::Dirt.contains(kind) || matches!(kind, K::Sand),
            BlockTag::AzaleaRootReplaceable => {
                BlockTag::BaseStoneOverworld.contains(kind)
                    || BlockTag::Dirt.contains(kind)
                    || matches!(kind, K::Clay | K::Gravel | K::Sand)
            }
            BlockTag::FeaturesCannotReplace => matches!(kind, K::Bedrock),
            BlockTag::Leaves => matches!(kind, K::AzaleaLeaves),
            BlockTag::Logs => matches!(kind, K::OakLog),
            BlockTag::Ice => matches!(kind, K::Ice | K::PackedIce | K::BlueIce),
            BlockTag::Nylium => matches!(kind, K::WarpedNylium),
        }
    }

    /// Kinds in this tag, in declaration order.
    pub fn members(self) -> impl Iterator<Item = BlockKind> {
        BlockKind::ALL.iter().copied().filter(move |&k| self.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lush_ground_extends_moss_replaceable() {
        for kind in BlockTag::MossReplaceable.members() {
            assert!(BlockTag::LushGroundReplaceable.contains(kind), "{kind}");
        }
        assert!(BlockTag::LushGroundReplaceable.contains(BlockKind::Clay));
        assert!(!BlockTag::MossReplaceable.contains(BlockKind::Clay));
    }

    #[test]
    fn no_tag_contains_air() {
        for tag in BlockTag::ALL {
            assert!(!tag.contains(BlockKind::Air), "{tag:?}");
        }
    }
}

use strata_blocks::{Block, BlockKind, BlockTag};
use strata_geom::{BlockPos, Direction};

use crate::access::BlockGetter;

/// Whether `block` could stay at `pos` given its current neighbours.
pub fn can_survive<W: BlockGetter + ?Sized>(world: &W, block: Block, pos: BlockPos) -> bool {
    let below = world.block(pos.below());
    match block.kind {
        BlockKind::Grass => below.is_in(BlockTag::Dirt),
        BlockKind::Azalea | BlockKind::FloweringAzalea => {
            below.is_in(BlockTag::Dirt) || below.is(BlockKind::Clay)
        }
        BlockKind::MossCarpet => !below.is_air(),
        BlockKind::HangingRoots => world.block(pos.above()).is_face_sturdy(Direction::Down),
        BlockKind::TwistingVines | BlockKind::TwistingVinesPlant => {
            below.is(BlockKind::TwistingVines)
                || below.is(BlockKind::TwistingVinesPlant)
                || below.is_face_sturdy(Direction::Up)
        }
        BlockKind::PointedDripstone => {
            let Some(tip) = block.vertical_direction() else {
                return false;
            };
            let anchor = world.block(pos.relative(tip.opposite()));
            anchor.is_face_sturdy(tip) || anchor.vertical_direction() == Some(tip)
        }
        BlockKind::Vine => Direction::ALL.into_iter().any(|face| {
            block.has_vine_face(face)
                && world.block(pos.relative(face)).is_face_sturdy(face.opposite())
        }),
        _ => true,
    }
}

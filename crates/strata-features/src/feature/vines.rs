use strata_blocks::{Block, BlockKind};
use strata_geom::Direction;
use strata_world::UpdateFlags;

use super::{Feature, FeaturePlaceContext};

/// A single vine attached to the first sturdy neighbouring face.
pub struct VinesFeature;

impl Feature for VinesFeature {
    type Config = ();

    fn place(&self, ctx: FeaturePlaceContext<'_, ()>) -> bool {
        let FeaturePlaceContext { level, origin, .. } = ctx;
        if !level.is_empty_block(origin) {
            return false;
        }
        for face in Direction::ALL {
            if face == Direction::Down {
                continue;
            }
            if level.block(origin.relative(face)).is_face_sturdy(face.opposite()) {
                let vine = Block::new(BlockKind::Vine).with_vine_face(face, true);
                level.set_block(origin, vine, UpdateFlags::CLIENTS);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::BlockPos;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn run(g: &mut VoxelGrid, origin: BlockPos) -> bool {
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(0);
        VinesFeature.place(FeaturePlaceContext::new(g, &generator, &mut r, origin, &()))
    }

    #[test]
    fn clings_to_a_wall() {
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 3, 3, 3);
        g.put(BlockPos::new(2, 1, 1), Block::STONE);
        assert!(run(&mut g, BlockPos::new(1, 1, 1)));
        let vine = g.block(BlockPos::new(1, 1, 1));
        assert!(vine.has_vine_face(Direction::East));
        assert!(!vine.has_vine_face(Direction::North));
    }

    #[test]
    fn floor_alone_is_not_enough() {
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 3, 3, 3);
        g.put(BlockPos::new(1, 0, 1), Block::STONE);
        assert!(!run(&mut g, BlockPos::new(1, 1, 1)));
    }
}

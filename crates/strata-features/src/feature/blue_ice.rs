use strata_blocks::{Block, BlockKind};
use strata_geom::Direction;
use strata_world::UpdateFlags;

use super::{Feature, FeaturePlaceContext};

/// Grows a cluster of blue ice out of packed ice bordering water.
pub struct BlueIceFeature;

const SPREAD_ATTEMPTS: usize = 200;

impl Feature for BlueIceFeature {
    type Config = ();

    fn place(&self, ctx: FeaturePlaceContext<'_, ()>) -> bool {
        let FeaturePlaceContext {
            level,
            generator,
            random,
            origin,
            ..
        } = ctx;
        if origin.y > generator.sea_level() - 1 {
            return false;
        }
        if !level.block(origin).is(BlockKind::Water) && !level.block(origin.below()).is(BlockKind::Water) {
            return false;
        }
        let touches_packed_ice = Direction::ALL
            .into_iter()
            .filter(|&d| d != Direction::Down)
            .any(|d| level.block(origin.relative(d)).is(BlockKind::PackedIce));
        if !touches_packed_ice {
            return false;
        }

        let blue = Block::new(BlockKind::BlueIce);
        level.set_block(origin, blue, UpdateFlags::CLIENTS);
        for _ in 0..SPREAD_ATTEMPTS {
            let dy = random.next_int(5) - random.next_int(6);
            let mut r = 3;
            if dy < 2 {
                r += dy / 2;
            }
            if r < 1 {
                continue;
            }
            let p = origin.offset(
                random.next_int(r) - random.next_int(r),
                dy,
                random.next_int(r) - random.next_int(r),
            );
            let here = level.block(p);
            let open = here.is_air()
                || here.is(BlockKind::Water)
                || here.is(BlockKind::PackedIce)
                || here.is(BlockKind::Ice);
            if open
                && Direction::ALL
                    .into_iter()
                    .any(|d| level.block(p.relative(d)).is(BlockKind::BlueIce))
            {
                level.set_block(p, blue, UpdateFlags::CLIENTS);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::BlockPos;
    use strata_world::{BlockGetter, FlatGenerator, VoxelGrid, WorldRandom};

    fn frozen_sea() -> VoxelGrid {
        let mut g = VoxelGrid::with_size(BlockPos::new(-8, 0, -8), 17, 16, 17);
        g.fill_layers(0, 9, Block::WATER);
        g.fill_layers(10, 11, Block::new(BlockKind::PackedIce));
        g
    }

    fn run(g: &mut VoxelGrid, origin: BlockPos, sea_level: i32) -> bool {
        let generator = FlatGenerator::new(Vec::new(), sea_level);
        let mut r = WorldRandom::new(6);
        BlueIceFeature.place(FeaturePlaceContext::new(g, &generator, &mut r, origin, &()))
    }

    #[test]
    fn spreads_from_packed_ice() {
        let mut g = frozen_sea();
        assert!(run(&mut g, BlockPos::new(0, 9, 0), 12));
        assert!(g.block(BlockPos::new(0, 9, 0)).is(BlockKind::BlueIce));
        assert!(g.count(|b| b.is(BlockKind::BlueIce)) > 1);
    }

    #[test]
    fn above_sea_level_declines() {
        let mut g = frozen_sea();
        assert!(!run(&mut g, BlockPos::new(0, 9, 0), 9));
        assert!(g.changes().is_empty());
    }

    #[test]
    fn needs_packed_ice_beside_or_above() {
        let mut g = frozen_sea();
        assert!(!run(&mut g, BlockPos::new(0, 5, 0), 12));
    }
}

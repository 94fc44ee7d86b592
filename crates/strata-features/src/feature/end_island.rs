use strata_blocks::{Block, BlockKind};

use super::{Feature, FeaturePlaceContext, set_block};

/// Inverted cone of end stone hanging below the origin.
pub struct EndIslandFeature;

impl Feature for EndIslandFeature {
    type Config = ();

    fn place(&self, ctx: FeaturePlaceContext<'_, ()>) -> bool {
        let FeaturePlaceContext {
            level,
            random,
            origin,
            ..
        } = ctx;
        let stone = Block::new(BlockKind::EndStone);
        let mut f = (random.next_int(3) + 4) as f32;
        let mut dy = 0;
        while f > 0.5 {
            let lo = (-f).floor() as i32;
            let hi = f.ceil() as i32;
            for dx in lo..=hi {
                for dz in lo..=hi {
                    if ((dx * dx + dz * dz) as f32) <= (f + 1.0) * (f + 1.0) {
                        set_block(level, origin.offset(dx, dy, dz), stone);
                    }
                }
            }
            f -= random.next_int(2) as f32 + 0.5;
            dy -= 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_geom::BlockPos;
    use strata_world::{FlatGenerator, VoxelGrid, WorldRandom};

    #[test]
    fn layers_narrow_downwards() {
        let mut g = VoxelGrid::with_size(BlockPos::new(-8, 0, -8), 17, 24, 17);
        let generator = FlatGenerator::new(Vec::new(), 0);
        let mut r = WorldRandom::new(31);
        let origin = BlockPos::new(0, 20, 0);
        assert!(EndIslandFeature.place(FeaturePlaceContext::new(&mut g, &generator, &mut r, origin, &())));
        let width = |y: i32| g.changes().iter().filter(|c| c.pos.y == y).count();
        assert!(width(20) > 0);
        let mut prev = width(20);
        for y in (0..20).rev() {
            let w = width(y);
            assert!(w <= prev, "layer {y} wider than the one above");
            prev = w;
        }
    }
}

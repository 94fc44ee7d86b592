use std::cell::RefCell;

use proptest::prelude::*;
use strata_blocks::{Block, DripstoneThickness};
use strata_features::Column;
use strata_features::dripstone::{base_to_tip_column, dripstone_height};
use strata_geom::BlockPos;
use strata_world::{BlockGetter, VoxelGrid};

/// Forwards reads to a volume and remembers every position asked for.
struct Recording<'a> {
    inner: &'a VoxelGrid,
    reads: RefCell<Vec<BlockPos>>,
}

impl BlockGetter for Recording<'_> {
    fn block(&self, pos: BlockPos) -> Block {
        self.reads.borrow_mut().push(pos);
        self.inner.block(pos)
    }

    fn min_build_height(&self) -> i32 {
        self.inner.min_build_height()
    }

    fn max_build_height(&self) -> i32 {
        self.inner.max_build_height()
    }
}

proptest! {
    // Spike profile is never negative
    #[test]
    fn height_is_non_negative(
        r in 0.0f64..40.0,
        max_radius in 1.0f64..40.0,
        scale in 0.1f64..3.0,
        bluntness in 0.1f64..1.0,
    ) {
        let h = dripstone_height(r, max_radius, scale, bluntness);
        prop_assert!(h >= 0.0, "h = {h}");
    }

    // The profile reaches (nearly) zero at the rim
    #[test]
    fn height_vanishes_at_rim(max_radius in 1.0f64..40.0, scale in 0.1f64..3.0) {
        let h = dripstone_height(max_radius, max_radius, scale, 0.1);
        prop_assert!(h <= 5e-4 * scale * max_radius, "h = {h}");
    }

    // Moving outward never makes the spike taller
    #[test]
    fn height_is_monotone(
        max_radius in 1.0f64..40.0,
        scale in 0.1f64..3.0,
        bluntness in 0.1f64..1.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        let h_near = dripstone_height(near * max_radius, max_radius, scale, bluntness);
        let h_far = dripstone_height(far * max_radius, max_radius, scale, bluntness);
        prop_assert!(h_far <= h_near + 1e-9, "{h_far} > {h_near}");
    }

    // Column scans only read the scanned x/z and stay within range
    #[test]
    fn scan_stays_in_range(
        cells in proptest::collection::vec(any::<bool>(), 64),
        start in 0i32..64,
        max_distance in 0i32..40,
    ) {
        let mut g = VoxelGrid::with_size(BlockPos::new(0, 0, 0), 1, 64, 1);
        for (y, &solid) in cells.iter().enumerate() {
            if solid {
                g.put(BlockPos::new(0, y as i32, 0), Block::STONE);
            }
        }
        let rec = Recording { inner: &g, reads: RefCell::new(Vec::new()) };
        let pos = BlockPos::new(0, start, 0);
        let _ = Column::scan(&rec, pos, max_distance, |b| b.is_air(), |b| b.is_solid());
        let reach = (max_distance - 1).max(0);
        for p in rec.reads.borrow().iter() {
            prop_assert_eq!((p.x, p.z), (0, 0));
            prop_assert!((p.y - start).abs() <= reach, "read y {} from {start}", p.y);
        }
    }
}

#[test]
fn column_lengths_match_height() {
    for h in 0..=20 {
        for merge in [false, true] {
            let col = base_to_tip_column(h, merge);
            assert_eq!(col.len(), h as usize);
            let middles = col.iter().filter(|t| **t == DripstoneThickness::Middle).count();
            assert_eq!(middles, (h - 3).max(0) as usize);
            if h >= 3 {
                assert_eq!(col[0], DripstoneThickness::Base);
            }
            if h >= 2 {
                assert_eq!(col[col.len() - 2], DripstoneThickness::Frustum);
            }
            if h >= 1 {
                let tip = if merge { DripstoneThickness::TipMerge } else { DripstoneThickness::Tip };
                assert_eq!(col[col.len() - 1], tip);
            }
        }
    }
}

use strata_blocks::Block;
use strata_geom::{BlockPos, BoundingBox};

use crate::access::{BlockGetter, UpdateFlags, WorldAccess};

/// One successful write, in the order it happened.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BlockChange {
    pub pos: BlockPos,
    pub block: Block,
}

/// Dense in-memory volume over an inclusive bounding box.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    bounds: BoundingBox,
    sx: usize,
    sy: usize,
    sz: usize,
    blocks: Vec<Block>,
    changes: Vec<BlockChange>,
    recording: bool,
}

impl VoxelGrid {
    pub fn new(bounds: BoundingBox) -> Self {
        let (sx, sy, sz) = bounds.size();
        let (sx, sy, sz) = (sx as usize, sy as usize, sz as usize);
        Self {
            bounds,
            sx,
            sy,
            sz,
            blocks: vec![Block::AIR; sx * sy * sz],
            changes: Vec::new(),
            recording: true,
        }
    }

    /// Volume of `sx * sy * sz` cells whose minimum corner is `origin`.
    pub fn with_size(origin: BlockPos, sx: i32, sy: i32, sz: i32) -> Self {
        Self::new(BoundingBox::from_origin_size(origin, sx, sy, sz))
    }

    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.sx, self.sy, self.sz)
    }

    #[inline]
    fn idx(&self, pos: BlockPos) -> Option<usize> {
        if !self.bounds.contains(pos) {
            return None;
        }
        let x = (pos.x - self.bounds.min.x) as usize;
        let y = (pos.y - self.bounds.min.y) as usize;
        let z = (pos.z - self.bounds.min.z) as usize;
        Some((y * self.sz + z) * self.sx + x)
    }

    /// Write without touching the change log; used by terrain fill.
    pub fn put(&mut self, pos: BlockPos, block: Block) -> bool {
        match self.idx(pos) {
            Some(i) => {
                self.blocks[i] = block;
                true
            }
            None => false,
        }
    }

    pub fn fill(&mut self, block: Block) {
        self.blocks.fill(block);
    }

    /// Fills every cell in `[y0, y1]` (clipped to the volume) with `block`.
    pub fn fill_layers(&mut self, y0: i32, y1: i32, block: Block) {
        let lo = y0.max(self.bounds.min.y);
        let hi = y1.min(self.bounds.max.y);
        for y in lo..=hi {
            for z in self.bounds.min.z..=self.bounds.max.z {
                for x in self.bounds.min.x..=self.bounds.max.x {
                    self.put(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    #[inline]
    pub fn changes(&self) -> &[BlockChange] {
        &self.changes
    }

    pub fn take_changes(&mut self) -> Vec<BlockChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn set_recording(&mut self, on: bool) {
        self.recording = on;
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.blocks.iter().all(|b| b.is_air())
    }

    /// Number of cells holding `pred`-matching blocks.
    pub fn count(&self, pred: impl Fn(Block) -> bool) -> usize {
        self.blocks.iter().filter(|b| pred(**b)).count()
    }
}

impl BlockGetter for VoxelGrid {
    #[inline]
    fn block(&self, pos: BlockPos) -> Block {
        match self.idx(pos) {
            Some(i) => self.blocks[i],
            None => Block::VOID_AIR,
        }
    }

    #[inline]
    fn min_build_height(&self) -> i32 {
        self.bounds.min.y
    }

    #[inline]
    fn max_build_height(&self) -> i32 {
        self.bounds.max.y + 1
    }
}

impl WorldAccess for VoxelGrid {
    fn set_block(&mut self, pos: BlockPos, block: Block, _flags: UpdateFlags) -> bool {
        let Some(i) = self.idx(pos) else {
            return false;
        };
        self.blocks[i] = block;
        if self.recording {
            self.changes.push(BlockChange { pos, block });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Heightmap;
    use strata_blocks::BlockKind;

    fn grid() -> VoxelGrid {
        VoxelGrid::with_size(BlockPos::new(-4, -8, -4), 8, 16, 8)
    }

    #[test]
    fn outside_reads_void_air_and_rejects_writes() {
        let mut g = grid();
        let out = BlockPos::new(100, 0, 0);
        assert_eq!(g.block(out), Block::VOID_AIR);
        assert!(!g.set_block(out, Block::STONE, UpdateFlags::default()));
        assert!(g.changes().is_empty());
    }

    #[test]
    fn change_log_keeps_write_order() {
        let mut g = grid();
        let a = BlockPos::new(0, 0, 0);
        let b = BlockPos::new(1, 2, 3);
        g.set_block(b, Block::STONE, UpdateFlags::default());
        g.set_block(a, Block::WATER, UpdateFlags::default());
        let log: Vec<BlockPos> = g.changes().iter().map(|c| c.pos).collect();
        assert_eq!(log, vec![b, a]);
        assert_eq!(g.block(a), Block::WATER);
    }

    #[test]
    fn heightmaps_skip_what_they_ignore() {
        let mut g = grid();
        g.fill_layers(-8, -3, Block::STONE);
        g.put(BlockPos::new(0, -2, 0), Block::WATER);
        g.put(BlockPos::new(0, 0, 0), Block::new(BlockKind::Vine));
        assert_eq!(g.height(Heightmap::WorldSurfaceWg, 0, 0), 1);
        assert_eq!(g.height(Heightmap::MotionBlocking, 0, 0), -1);
        assert_eq!(g.height(Heightmap::OceanFloorWg, 0, 0), -2);
        assert_eq!(g.height(Heightmap::OceanFloorWg, 100, 0), -8);
    }
}

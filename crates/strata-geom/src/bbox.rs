use serde::{Deserialize, Serialize};

use crate::BlockPos;

/// Inclusive integer box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BoundingBox {
    #[inline]
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Box starting at `origin` spanning `sx * sy * sz` cells.
    #[inline]
    pub fn from_origin_size(origin: BlockPos, sx: i32, sy: i32, sz: i32) -> Self {
        Self::new(
            origin,
            origin.offset(sx.max(1) - 1, sy.max(1) - 1, sz.max(1) - 1),
        )
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn size(&self) -> (i32, i32, i32) {
        (
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }

    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = BlockPos::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = BlockPos::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        if min.x > max.x || min.y > max.y || min.z > max.z {
            None
        } else {
            Some(BoundingBox { min, max })
        }
    }

    pub fn corners(&self) -> [BlockPos; 8] {
        let (a, b) = (self.min, self.max);
        [
            BlockPos::new(a.x, a.y, a.z),
            BlockPos::new(b.x, a.y, a.z),
            BlockPos::new(a.x, b.y, a.z),
            BlockPos::new(b.x, b.y, a.z),
            BlockPos::new(a.x, a.y, b.z),
            BlockPos::new(b.x, a.y, b.z),
            BlockPos::new(a.x, b.y, b.z),
            BlockPos::new(b.x, b.y, b.z),
        ]
    }
}

pub const CHUNK_WIDTH: i32 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkPos {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn containing(pos: BlockPos) -> Self {
        Self {
            cx: pos.x.div_euclid(CHUNK_WIDTH),
            cz: pos.z.div_euclid(CHUNK_WIDTH),
        }
    }

    #[inline]
    pub fn min_block_x(self) -> i32 {
        self.cx * CHUNK_WIDTH
    }

    #[inline]
    pub fn min_block_z(self) -> i32 {
        self.cz * CHUNK_WIDTH
    }

    #[inline]
    pub fn max_block_x(self) -> i32 {
        self.min_block_x() + CHUNK_WIDTH - 1
    }

    #[inline]
    pub fn max_block_z(self) -> i32 {
        self.min_block_z() + CHUNK_WIDTH - 1
    }
}

use strata_blocks::{Block, FluidState};
use strata_geom::BlockPos;

/// Column height queries; each reports the Y just above the block it finds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Heightmap {
    /// First non-air block from the top.
    WorldSurfaceWg,
    /// First block whose material is solid.
    OceanFloorWg,
    /// First block that is solid or holds fluid.
    MotionBlocking,
}

impl Heightmap {
    #[inline]
    pub fn is_opaque(self, block: Block) -> bool {
        match self {
            Heightmap::WorldSurfaceWg => !block.is_air(),
            Heightmap::OceanFloorWg => block.is_solid(),
            Heightmap::MotionBlocking => block.is_solid() || !block.fluid_state().is_empty(),
        }
    }
}

/// Neighbour-notification flags carried with a write. The reference volumes
/// record them but do not propagate updates.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UpdateFlags(pub u8);

impl UpdateFlags {
    pub const NEIGHBORS: UpdateFlags = UpdateFlags(1);
    pub const CLIENTS: UpdateFlags = UpdateFlags(2);
    pub const ALL: UpdateFlags = UpdateFlags(3);

    #[inline]
    pub fn contains(self, other: UpdateFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for UpdateFlags {
    fn default() -> Self {
        UpdateFlags::CLIENTS
    }
}

pub trait BlockGetter {
    /// Block at `pos`; positions outside the stored volume read as `void_air`.
    fn block(&self, pos: BlockPos) -> Block;

    /// Lowest valid Y.
    fn min_build_height(&self) -> i32;

    /// One past the highest valid Y.
    fn max_build_height(&self) -> i32;

    fn height(&self, heightmap: Heightmap, x: i32, z: i32) -> i32 {
        let min = self.min_build_height();
        let mut y = self.max_build_height() - 1;
        while y >= min {
            if heightmap.is_opaque(self.block(BlockPos::new(x, y, z))) {
                return y + 1;
            }
            y -= 1;
        }
        min
    }

    #[inline]
    fn fluid(&self, pos: BlockPos) -> FluidState {
        self.block(pos).fluid_state()
    }

    #[inline]
    fn is_empty_block(&self, pos: BlockPos) -> bool {
        self.block(pos).is_air()
    }

    #[inline]
    fn is_outside_build_height(&self, y: i32) -> bool {
        y < self.min_build_height() || y >= self.max_build_height()
    }
}

pub trait WorldAccess: BlockGetter {
    /// Returns false when the write falls outside the stored volume.
    fn set_block(&mut self, pos: BlockPos, block: Block, flags: UpdateFlags) -> bool;
}

//! Shared geometry for the dripstone features.

use std::f32::consts::PI;

use strata_blocks::{Block, BlockKind, BlockTag, DripstoneThickness};
use strata_geom::{BlockPos, Direction};
use strata_world::{BlockGetter, UpdateFlags, WorldAccess};

/// Cone-like spike profile: tall at the centre, zero at `max_radius`.
pub fn dripstone_height(radius: f64, max_radius: f64, scale: f64, min_radius: f64) -> f64 {
    let r = radius.max(min_radius).min(max_radius);
    let x = r / max_radius * 0.384;
    let a = 0.75 * x.powf(4.0 / 3.0);
    let b = x.powf(2.0 / 3.0);
    let c = x.ln() / 3.0;
    let h = (scale * (a - b - c)).max(0.0);
    h / 0.384 * max_radius
}

/// False when `pos` or any probe on a circle of `radius` around it is open.
pub fn is_circle_mostly_embedded_in_stone<W: BlockGetter + ?Sized>(
    level: &W,
    pos: BlockPos,
    radius: i32,
) -> bool {
    if is_empty_or_water_or_lava(level.block(pos)) {
        return false;
    }
    let step = 6.0 / radius as f32;
    let mut angle = 0.0f32;
    while angle < PI * 2.0 {
        let dx = (angle.cos() * radius as f32) as i32;
        let dz = (angle.sin() * radius as f32) as i32;
        if is_empty_or_water_or_lava(level.block(pos.offset(dx, 0, dz))) {
            return false;
        }
        angle += step;
    }
    true
}

/// Segments from the anchored end to the point, in placement order.
pub fn base_to_tip_column(height: i32, merge_tip: bool) -> Vec<DripstoneThickness> {
    let mut out = Vec::with_capacity(height.max(0) as usize);
    if height >= 3 {
        out.push(DripstoneThickness::Base);
        for _ in 0..height - 3 {
            out.push(DripstoneThickness::Middle);
        }
    }
    if height >= 2 {
        out.push(DripstoneThickness::Frustum);
    }
    if height >= 1 {
        out.push(if merge_tip {
            DripstoneThickness::TipMerge
        } else {
            DripstoneThickness::Tip
        });
    }
    out
}

/// Grows a pointed spike from `pos` towards `direction` when the cell behind it is a dripstone base.
pub fn grow_pointed_dripstone(
    level: &mut dyn WorldAccess,
    pos: BlockPos,
    direction: Direction,
    height: i32,
    merge_tip: bool,
) {
    if !is_dripstone_base(level.block(pos.relative(direction.opposite()))) {
        return;
    }
    let mut m = pos;
    for thickness in base_to_tip_column(height, merge_tip) {
        let wet = level.fluid(m).is_water();
        let block = Block::pointed_dripstone(direction, thickness).with_waterlogged(wet);
        level.set_block(m, block, UpdateFlags::CLIENTS);
        m = m.relative(direction);
    }
}

pub fn place_dripstone_block_if_possible(level: &mut dyn WorldAccess, pos: BlockPos) -> bool {
    if level.block(pos).is_in(BlockTag::DripstoneReplaceable) {
        level.set_block(pos, Block::DRIPSTONE_BLOCK, UpdateFlags::CLIENTS);
        true
    } else {
        false
    }
}

#[inline]
pub fn is_empty_or_water(b: Block) -> bool {
    b.is_air() || b.is(BlockKind::Water)
}

#[inline]
pub fn is_neither_empty_nor_water(b: Block) -> bool {
    !is_empty_or_water(b)
}

#[inline]
pub fn is_empty_or_water_or_lava(b: Block) -> bool {
    is_empty_or_water(b) || b.is(BlockKind::Lava)
}

#[inline]
pub fn is_dripstone_base(b: Block) -> bool {
    b.is(BlockKind::DripstoneBlock) || b.is_in(BlockTag::DripstoneReplaceable)
}

#[inline]
pub fn is_dripstone_base_or_lava(b: Block) -> bool {
    is_dripstone_base(b) || b.is(BlockKind::Lava)
}

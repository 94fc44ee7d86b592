//! Packed property layout for the block kinds that carry state.
//!
//! Pointed dripstone: bits 0..3 thickness, bit 3 tip direction (set = down),
//! bit 4 waterlogged. Hanging roots share the waterlogged bit. Twisting vine
//! heads keep their age in bits 0..5. Vines keep one bit per attached face.

use serde::{Deserialize, Serialize};
use strata_geom::Direction;

pub const WATERLOGGED_BIT: u16 = 1 << 4;
pub const AGE_MASK: u16 = 0x1f;
pub const MAX_PLANT_AGE: u8 = 25;

const THICKNESS_MASK: u16 = 0x7;
const DOWN_BIT: u16 = 1 << 3;

/// Segment kind along a pointed dripstone, from the tip back to the base.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DripstoneThickness {
    TipMerge,
    Tip,
    Frustum,
    Middle,
    Base,
}

impl DripstoneThickness {
    pub const ALL: [DripstoneThickness; 5] = [
        DripstoneThickness::TipMerge,
        DripstoneThickness::Tip,
        DripstoneThickness::Frustum,
        DripstoneThickness::Middle,
        DripstoneThickness::Base,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DripstoneThickness::TipMerge => "tip_merge",
            DripstoneThickness::Tip => "tip",
            DripstoneThickness::Frustum => "frustum",
            DripstoneThickness::Middle => "middle",
            DripstoneThickness::Base => "base",
        }
    }

    #[inline]
    const fn bits(self) -> u16 {
        match self {
            DripstoneThickness::TipMerge => 0,
            DripstoneThickness::Tip => 1,
            DripstoneThickness::Frustum => 2,
            DripstoneThickness::Middle => 3,
            DripstoneThickness::Base => 4,
        }
    }
}

pub const fn pack_dripstone(direction: Direction, thickness: DripstoneThickness, waterlogged: bool) -> u16 {
    let mut s = thickness.bits();
    if !matches!(direction, Direction::Up) {
        s |= DOWN_BIT;
    }
    if waterlogged {
        s |= WATERLOGGED_BIT;
    }
    s
}

pub fn dripstone_thickness(state: u16) -> DripstoneThickness {
    match state & THICKNESS_MASK {
        0 => DripstoneThickness::TipMerge,
        1 => DripstoneThickness::Tip,
        2 => DripstoneThickness::Frustum,
        3 => DripstoneThickness::Middle,
        _ => DripstoneThickness::Base,
    }
}

#[inline]
pub fn dripstone_direction(state: u16) -> Direction {
    if state & DOWN_BIT != 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Vines attach to the four sides and the ceiling, never the floor.
pub fn vine_face_bit(face: Direction) -> Option<u16> {
    match face {
        Direction::Down => None,
        Direction::Up => Some(1 << 0),
        Direction::North => Some(1 << 1),
        Direction::South => Some(1 << 2),
        Direction::West => Some(1 << 3),
        Direction::East => Some(1 << 4),
    }
}

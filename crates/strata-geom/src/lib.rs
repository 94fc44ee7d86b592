//! Integer block geometry and a minimal vector type for feature placement.
#![forbid(unsafe_code)]

mod bbox;
mod direction;
mod pos;

pub use bbox::{BoundingBox, CHUNK_WIDTH, ChunkPos};
pub use direction::{Axis, Direction, Rotation};
pub use pos::{BetweenClosed, BlockPos};

use core::ops::Mul;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Vec3 {
        self * factor
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scale_matches_mul(v in any::<Vec3>(), f in -100.0f64..100.0) {
            prop_assume!(v.x.is_finite() && v.y.is_finite() && v.z.is_finite());
            prop_assert_eq!(v.scale(f), v * f);
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::Direction;

/// Integer block coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ZERO: BlockPos = BlockPos { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Offset by a fractional amount, flooring each component.
    #[inline]
    pub fn offset_f64(self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            x: (self.x as f64 + dx).floor() as i32,
            y: (self.y as f64 + dy).floor() as i32,
            z: (self.z as f64 + dz).floor() as i32,
        }
    }

    #[inline]
    pub fn relative(self, dir: Direction) -> Self {
        self.relative_n(dir, 1)
    }

    #[inline]
    pub fn relative_n(self, dir: Direction, n: i32) -> Self {
        let (dx, dy, dz) = dir.normal();
        self.offset(dx * n, dy * n, dz * n)
    }

    #[inline]
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    #[inline]
    pub fn above_n(self, n: i32) -> Self {
        self.offset(0, n, 0)
    }

    #[inline]
    pub fn below(self) -> Self {
        self.offset(0, -1, 0)
    }

    #[inline]
    pub fn at_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    #[inline]
    pub fn dist_manhattan(self, other: BlockPos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    #[inline]
    pub fn dist_sqr(self, other: BlockPos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        let dz = i64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Every position in the inclusive box spanned by `a` and `b`, x fastest, then y, then z.
    pub fn between_closed(a: BlockPos, b: BlockPos) -> BetweenClosed {
        let min = BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let max = BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        BetweenClosed {
            min,
            max,
            next: Some(min),
        }
    }

    /// Positions inside the `rx`/`ry`/`rz` box around `center`, ordered by
    /// non-decreasing Manhattan distance from it.
    pub fn within_manhattan(center: BlockPos, rx: i32, ry: i32, rz: i32) -> Vec<BlockPos> {
        let (rx, ry, rz) = (rx.max(0), ry.max(0), rz.max(0));
        let mut out = Vec::new();
        for d in 0..=(rx + ry + rz) {
            for dx in -rx..=rx {
                let rest = d - dx.abs();
                if rest < 0 {
                    continue;
                }
                for dy in -ry..=ry {
                    let dz_abs = rest - dy.abs();
                    if dz_abs < 0 || dz_abs > rz {
                        continue;
                    }
                    out.push(center.offset(dx, dy, dz_abs));
                    if dz_abs != 0 {
                        out.push(center.offset(dx, dy, -dz_abs));
                    }
                }
            }
        }
        out
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from(value: [i32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<BlockPos> for (i32, i32, i32) {
    fn from(value: BlockPos) -> Self {
        (value.x, value.y, value.z)
    }
}

pub struct BetweenClosed {
    min: BlockPos,
    max: BlockPos,
    next: Option<BlockPos>,
}

impl Iterator for BetweenClosed {
    type Item = BlockPos;

    fn next(&mut self) -> Option<BlockPos> {
        let cur = self.next?;
        let mut n = cur;
        n.x += 1;
        if n.x > self.max.x {
            n.x = self.min.x;
            n.y += 1;
            if n.y > self.max.y {
                n.y = self.min.y;
                n.z += 1;
            }
        }
        self.next = if n.z > self.max.z { None } else { Some(n) };
        Some(cur)
    }
}

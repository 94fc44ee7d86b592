use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Six axis-aligned directions, in the canonical `Down, Up, North, South, West, East` order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Down = 0,
    Up = 1,
    North = 2,
    South = 3,
    West = 4,
    East = 5,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Horizontal plane, clockwise from north.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Index into [`Direction::ALL`]; callers draw `i` from `next_int(6)`.
    #[inline]
    pub fn from_index(i: i32) -> Direction {
        Self::ALL[i.rem_euclid(6) as usize]
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    #[inline]
    pub fn normal(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    #[inline]
    pub fn is_horizontal(self) -> bool {
        !matches!(self.axis(), Axis::Y)
    }
}

/// Quarter-turn rotation about the Y axis.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    None,
    Clockwise90,
    Clockwise180,
    CounterClockwise90,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise90,
        Rotation::Clockwise180,
        Rotation::CounterClockwise90,
    ];

    #[inline]
    pub fn from_index(i: i32) -> Rotation {
        Self::ALL[i.rem_euclid(4) as usize]
    }

    /// Size of an `sx * sz` footprint after rotation.
    #[inline]
    pub fn rotate_size(self, sx: i32, sz: i32) -> (i32, i32) {
        match self {
            Rotation::None | Rotation::Clockwise180 => (sx, sz),
            Rotation::Clockwise90 | Rotation::CounterClockwise90 => (sz, sx),
        }
    }

    /// Map a local `(x, z)` inside an `sx * sz` footprint to its position inside
    /// the rotated footprint, keeping the result in the positive quadrant.
    #[inline]
    pub fn rotate_in_footprint(self, x: i32, z: i32, sx: i32, sz: i32) -> (i32, i32) {
        match self {
            Rotation::None => (x, z),
            Rotation::Clockwise90 => (sz - 1 - z, x),
            Rotation::Clockwise180 => (sx - 1 - x, sz - 1 - z),
            Rotation::CounterClockwise90 => (z, sx - 1 - x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (x, y, z) = d.normal();
            let (ox, oy, oz) = d.opposite().normal();
            assert_eq!((x + ox, y + oy, z + oz), (0, 0, 0));
        }
    }

    #[test]
    fn rotated_footprint_stays_in_bounds() {
        let (sx, sz) = (5, 3);
        for rot in Rotation::ALL {
            let (rx, rz) = rot.rotate_size(sx, sz);
            for x in 0..sx {
                for z in 0..sz {
                    let (px, pz) = rot.rotate_in_footprint(x, z, sx, sz);
                    assert!((0..rx).contains(&px) && (0..rz).contains(&pz), "{rot:?}");
                }
            }
        }
    }
}

//! Deterministic random stream consumed by every placement algorithm.
//!
//! Features must draw in a fixed order; identical seeds over identical
//! volumes reproduce identical change logs.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_geom::{Direction, Rotation};

const FLOAT_UNIT: f32 = 1.0 / (1u32 << 24) as f32;
const DOUBLE_UNIT: f64 = 1.0 / (1u64 << 53) as f64;

pub trait RandomSource {
    fn next_u32(&mut self) -> u32;

    fn next_u64(&mut self) -> u64;

    /// Uniform in `[0, bound)`. Panics when `bound <= 0`.
    fn next_int(&mut self, bound: i32) -> i32 {
        assert!(bound > 0, "next_int bound must be positive, got {bound}");
        ((u64::from(self.next_u32()) * bound as u64) >> 32) as i32
    }

    /// Uniform in `[min, max]`.
    #[inline]
    fn next_int_between_inclusive(&mut self, min: i32, max: i32) -> i32 {
        self.next_int(max - min + 1) + min
    }

    /// Uniform in `[min, max]`, or `min` without drawing when `min >= max`.
    #[inline]
    fn next_int_in(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            min
        } else {
            self.next_int_between_inclusive(min, max)
        }
    }

    /// Uniform in `[0, 1)` with 24 bits of precision.
    #[inline]
    fn next_float(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 * FLOAT_UNIT
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    #[inline]
    fn next_double(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * DOUBLE_UNIT
    }

    #[inline]
    fn next_bool(&mut self) -> bool {
        self.next_u32() >> 31 != 0
    }

    /// Standard normal draw (Marsaglia polar method).
    fn next_gaussian(&mut self) -> f64 {
        polar_pair(self).0
    }

    /// `mode + deviation * (a - b)` for two uniform doubles.
    #[inline]
    fn triangle(&mut self, mode: f64, deviation: f64) -> f64 {
        mode + deviation * (self.next_double() - self.next_double())
    }

    #[inline]
    fn float_between(&mut self, min: f32, max: f32) -> f32 {
        self.next_float() * (max - min) + min
    }

    #[inline]
    fn next_direction(&mut self) -> Direction {
        Direction::from_index(self.next_int(6))
    }

    #[inline]
    fn next_rotation(&mut self) -> Rotation {
        Rotation::from_index(self.next_int(4))
    }
}

fn polar_pair<R: RandomSource + ?Sized>(r: &mut R) -> (f64, f64) {
    loop {
        let v1 = 2.0 * r.next_double() - 1.0;
        let v2 = 2.0 * r.next_double() - 1.0;
        let s = v1 * v1 + v2 * v2;
        if s < 1.0 && s != 0.0 {
            let m = (-2.0 * s.ln() / s).sqrt();
            return (v1 * m, v2 * m);
        }
    }
}

/// Seedable stream over ChaCha8. Cloning forks an identical stream,
/// including any cached gaussian spare.
#[derive(Clone, Debug)]
pub struct WorldRandom {
    rng: ChaCha8Rng,
    spare_gaussian: Option<f64>,
}

impl WorldRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spare_gaussian: None,
        }
    }

    /// Independent stream for a sub-task, derived from this one's next draw.
    pub fn fork(&mut self) -> WorldRandom {
        WorldRandom::new(self.rng.next_u64())
    }
}

impl RandomSource for WorldRandom {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn next_gaussian(&mut self) -> f64 {
        if let Some(g) = self.spare_gaussian.take() {
            return g;
        }
        let (a, b) = polar_pair(self);
        self.spare_gaussian = Some(b);
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_reproduces_stream() {
        let mut a = WorldRandom::new(42);
        a.next_gaussian();
        let mut b = a.clone();
        for _ in 0..32 {
            assert_eq!(a.next_gaussian().to_bits(), b.next_gaussian().to_bits());
            assert_eq!(a.next_int(17), b.next_int(17));
        }
    }

    #[test]
    fn next_int_in_collapses_empty_range() {
        let mut r = WorldRandom::new(1);
        let before = r.clone().next_u32();
        assert_eq!(r.next_int_in(5, 5), 5);
        assert_eq!(r.next_int_in(9, 3), 9);
        assert_eq!(r.next_u32(), before);
    }

    #[test]
    #[should_panic]
    fn next_int_zero_bound_panics() {
        WorldRandom::new(0).next_int(0);
    }
}

//! Precomputed multiples of the generator for fixed-base multiplication.
//!
//! Window w holds j * 16^w * G for j in 0..16, so k * G is the sum of one
//! entry per window: 64 additions and no doublings.

#![forbid(unsafe_code)]

use super::point::{Point, WINDOW_SIZE};
use super::scalar::{Scalar, NIBBLES};

/// Generator multiples, one 16-entry table per 4-bit window.
pub struct GeneratorTable {
    windows: Vec<[Point; WINDOW_SIZE]>,
}

impl GeneratorTable {
    /// Build the table. This is the expensive start-up step of a context.
    pub fn new() -> Self {
        let mut windows = Vec::with_capacity(NIBBLES);
        let mut base = Point::generator();

        for _ in 0..NIBBLES {
            windows.push(base.window_table());
            base = base.double().double().double().double();
        }

        Self { windows }
    }

    /// Multiply generator G by scalar k: k * G.
    pub fn mul(&self, k: &Scalar) -> Point {
        self.windows
            .iter()
            .enumerate()
            .fold(Point::INFINITY, |acc, (i, window)| {
                acc.add(&Point::select(window, k.nibble(i)))
            })
    }

    /// u1 * G + u2 * Q, the ECDSA verification combination.
    pub fn mul_add(&self, u1: &Scalar, q: &Point, u2: &Scalar) -> Point {
        self.mul(u1).add(&q.mul(u2))
    }
}

impl Default for GeneratorTable {
    fn default() -> Self {
        Self::new()
    }
}

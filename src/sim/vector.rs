//! 2D vector arithmetic
//!
//! Positions and velocities are `glam::DVec2`. Its operators already give the
//! allocating algebra (`a + b`, `a - b`, `a * s`, `length`, `normalize_or_zero`);
//! this module adds the named in-place helpers used on the per-tick hot path
//! and the distance functions used by collision checks.

use glam::DVec2;

/// Vector type used for every position and velocity in the simulation
pub type Vector2D = DVec2;

/// In-place counterparts of the allocating operators.
///
/// Each method must produce bit-identical results to the expression in its
/// doc line, so callers can switch between the two freely.
pub trait VectorExt {
    /// `*self = *self + other`
    fn add_inline(&mut self, other: DVec2) -> &mut Self;
    /// `*self = *self * scalar`
    fn multiply_inline(&mut self, scalar: f64) -> &mut Self;
    /// `*self = other`
    fn copy_from(&mut self, other: DVec2) -> &mut Self;
    /// `*self = DVec2::ZERO`
    fn reset(&mut self) -> &mut Self;
}

impl VectorExt for DVec2 {
    #[inline]
    fn add_inline(&mut self, other: DVec2) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    #[inline]
    fn multiply_inline(&mut self, scalar: f64) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    #[inline]
    fn copy_from(&mut self, other: DVec2) -> &mut Self {
        self.x = other.x;
        self.y = other.y;
        self
    }

    #[inline]
    fn reset(&mut self) -> &mut Self {
        self.x = 0.0;
        self.y = 0.0;
        self
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    distance_squared(a, b).sqrt()
}

/// Squared distance; avoids the square root in the collision fast path
#[inline]
pub fn distance_squared(a: DVec2, b: DVec2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_matches_allocating() {
        let samples = [
            (DVec2::new(1.5, -2.25), DVec2::new(0.1, 0.2), 3.7),
            (DVec2::new(-1e6, 1e-6), DVec2::new(1e-3, -7.0), -0.125),
            (DVec2::new(0.3, 0.6), DVec2::new(0.7, 0.4), 1.0 / 60.0),
        ];

        for (a, b, s) in samples {
            let mut v = a;
            v.add_inline(b);
            assert_eq!(v, a + b);

            let mut v = a;
            v.multiply_inline(s);
            assert_eq!(v, a * s);

            let mut v = a;
            v.add_inline(b * s);
            assert_eq!(v, a + b * s);
        }
    }

    #[test]
    fn test_copy_and_reset() {
        let mut v = DVec2::new(4.0, 5.0);
        v.copy_from(DVec2::new(-1.0, 2.0));
        assert_eq!(v, DVec2::new(-1.0, 2.0));
        v.reset();
        assert_eq!(v, DVec2::ZERO);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(DVec2::ZERO.normalize_or_zero(), DVec2::ZERO);
        let n = DVec2::new(3.0, 4.0).normalize_or_zero();
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(3.0, 4.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance_squared(a, b), 25.0);
        assert_eq!(distance(b, a), distance(a, b));
    }
}

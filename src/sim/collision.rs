//! Circular bounding volumes and the shared entity capabilities
//!
//! Every actor in the simulation is approximated by a circle. Boxes are
//! derived from the entity's current position on demand, so there is no
//! cached state to invalidate between ticks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::vector::distance_squared;

/// Circular collision volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    pub center: DVec2,
    pub radius: f64,
}

impl CollisionBox {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Closed test: circles that exactly touch count as intersecting
    #[inline]
    pub fn intersects(&self, other: &CollisionBox) -> bool {
        let reach = self.radius + other.radius;
        distance_squared(self.center, other.center) <= reach * reach
    }
}

/// Anything that integrates its position over time
pub trait Movable {
    /// Advance by `dt` seconds (explicit Euler, no sub-stepping)
    fn update(&mut self, dt: f64);
}

/// Anything that takes part in collision checks
pub trait Collidable {
    fn position(&self) -> DVec2;
    fn radius(&self) -> f64;

    fn collision_box(&self) -> CollisionBox {
        CollisionBox::new(self.position(), self.radius())
    }

    fn collides_with(&self, other: &impl Collidable) -> bool
    where
        Self: Sized,
    {
        self.collision_box().intersects(&other.collision_box())
    }
}

/// Map a coordinate onto `[0, dimension)` (toroidal topology)
#[inline]
pub fn wrap_coordinate(c: f64, dimension: f64) -> f64 {
    if c < 0.0 {
        let wrapped = dimension + c;
        // A tiny negative can round up to exactly `dimension`
        if wrapped >= dimension { 0.0 } else { wrapped }
    } else if c >= dimension {
        c - dimension
    } else {
        c
    }
}

/// Wrap a position inside a `width` x `height` torus
#[inline]
pub fn wrap_point(p: DVec2, width: f64, height: f64) -> DVec2 {
    DVec2::new(wrap_coordinate(p.x, width), wrap_coordinate(p.y, height))
}

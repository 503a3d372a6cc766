//! Simulation actors: ship, asteroids, bullets and saucers
//!
//! Radius and point values are pure functions of each actor's size or
//! pattern enum; nothing mutates them independently.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Collidable, Movable, wrap_point};
use super::vector::VectorExt;
use crate::consts::*;
use crate::{heading, normalize_angle};

/// Monotonic entity ID allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Asteroid size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

impl AsteroidSize {
    pub fn radius(&self) -> f64 {
        match self {
            AsteroidSize::Large => 60.0,
            AsteroidSize::Medium => 30.0,
            AsteroidSize::Small => 15.0,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            AsteroidSize::Large => 20,
            AsteroidSize::Medium => 50,
            AsteroidSize::Small => 100,
        }
    }

    /// Size of the fragments produced when this asteroid breaks
    pub fn smaller(&self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AsteroidSize::Large => "large",
            AsteroidSize::Medium => "medium",
            AsteroidSize::Small => "small",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "large" => Some(AsteroidSize::Large),
            "medium" => Some(AsteroidSize::Medium),
            "small" => Some(AsteroidSize::Small),
            _ => None,
        }
    }
}

/// Saucer behaviour pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaucerPattern {
    /// Big, slow, rarely fires
    Large,
    /// Small, fast, fires twice as often and is worth far more
    Small,
}

impl SaucerPattern {
    pub fn radius(&self) -> f64 {
        match self {
            SaucerPattern::Large => 50.0,
            SaucerPattern::Small => 35.0,
        }
    }

    pub fn speed(&self) -> f64 {
        match self {
            SaucerPattern::Large => 30.0,
            SaucerPattern::Small => 60.0,
        }
    }

    /// Seconds between shots
    pub fn fire_interval(&self) -> f64 {
        match self {
            SaucerPattern::Large => 3.0,
            SaucerPattern::Small => 1.5,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            SaucerPattern::Large => 200,
            SaucerPattern::Small => 1000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SaucerPattern::Large => "large",
            SaucerPattern::Small => "small",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "large" => Some(SaucerPattern::Large),
            "small" => Some(SaucerPattern::Small),
            _ => None,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    /// Heading in radians (0 = +x, -π/2 = up on screen)
    pub rotation: f64,
    /// Radians per second
    pub rotation_speed: f64,
    /// Acceleration while thrusting
    pub thrust_power: f64,
    pub is_thrusting: bool,
    /// Seconds of remaining collision immunity
    #[serde(default)]
    pub invulnerable: f64,
}

impl Ship {
    pub fn new(id: u32, position: DVec2) -> Self {
        Self {
            id,
            position,
            velocity: DVec2::ZERO,
            rotation: -FRAC_PI_2,
            rotation_speed: SHIP_ROTATION_SPEED,
            thrust_power: SHIP_THRUST_POWER,
            is_thrusting: false,
            invulnerable: 0.0,
        }
    }

    /// Unit vector along the current heading
    #[inline]
    pub fn heading(&self) -> DVec2 {
        heading(self.rotation)
    }

    pub fn is_vulnerable(&self) -> bool {
        self.invulnerable <= 0.0
    }

    /// Turn by one fixed step; `direction` is -1.0 (left) or +1.0 (right)
    pub fn rotate(&mut self, direction: f64) {
        self.rotation = normalize_angle(self.rotation + direction * self.rotation_speed * SIM_DT);
    }

    /// Apply one fixed step of thrust along the heading.
    ///
    /// The impulse is scaled by `SIM_DT`, not by the `dt` given to `update`.
    pub fn thrust(&mut self) {
        let impulse = self.heading() * (self.thrust_power * SIM_DT);
        self.velocity.add_inline(impulse);
        self.is_thrusting = true;
    }

    pub fn release_thrust(&mut self) {
        self.is_thrusting = false;
    }

    /// Spawn a bullet just ahead of the nose
    pub fn fire(&self, ids: &mut EntityIds) -> Bullet {
        let dir = self.heading();
        Bullet::new(
            ids.next_id(),
            self.position + dir * BULLET_SPAWN_OFFSET,
            dir * BULLET_SPEED,
        )
    }

    /// Jump to a random spot, losing all momentum
    pub fn hyperspace(&mut self, rng: &mut impl Rng, width: f64, height: f64) {
        self.position = DVec2::new(rng.random_range(0.0..width), rng.random_range(0.0..height));
        self.velocity.reset();
    }

    pub fn wrap_position(&mut self, width: f64, height: f64) {
        self.position = wrap_point(self.position, width, height);
    }
}

impl Movable for Ship {
    fn update(&mut self, dt: f64) {
        self.position.add_inline(self.velocity * dt);

        // Coast to rest when not thrusting
        self.velocity.multiply_inline(SHIP_DRAG.powf(dt));
        let speed = self.velocity.length();
        if speed > SHIP_MAX_SPEED {
            self.velocity.multiply_inline(SHIP_MAX_SPEED / speed);
        }

        if self.invulnerable > 0.0 {
            self.invulnerable = (self.invulnerable - dt).max(0.0);
        }
    }
}

impl Collidable for Ship {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        SHIP_RADIUS
    }
}

/// A drifting rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    pub size: AsteroidSize,
}

impl Asteroid {
    /// New asteroid drifting in a uniformly random direction
    pub fn new(id: u32, position: DVec2, size: AsteroidSize, rng: &mut impl Rng) -> Self {
        let angle = rng.random_range(0.0..TAU);
        Self::with_velocity(id, position, size, heading(angle) * ASTEROID_SPEED)
    }

    pub fn with_velocity(id: u32, position: DVec2, size: AsteroidSize, velocity: DVec2) -> Self {
        Self {
            id,
            position,
            velocity,
            size,
        }
    }

    pub fn points(&self) -> u64 {
        self.size.points()
    }

    /// Break into two smaller fragments at this exact position.
    ///
    /// Small asteroids leave nothing behind.
    pub fn split(&self, ids: &mut EntityIds, rng: &mut impl Rng) -> Vec<Asteroid> {
        match self.size.smaller() {
            Some(child) => (0..2)
                .map(|_| Asteroid::new(ids.next_id(), self.position, child, rng))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn wrap_position(&mut self, width: f64, height: f64) {
        self.position = wrap_point(self.position, width, height);
    }
}

impl Movable for Asteroid {
    fn update(&mut self, dt: f64) {
        self.position.add_inline(self.velocity * dt);
    }
}

impl Collidable for Asteroid {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.size.radius()
    }
}

/// A projectile with a fixed lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    pub lifetime: f64,
    pub age: f64,
    pub is_alive: bool,
}

impl Bullet {
    pub fn new(id: u32, position: DVec2, velocity: DVec2) -> Self {
        Self {
            id,
            position,
            velocity,
            lifetime: BULLET_LIFETIME,
            age: 0.0,
            is_alive: true,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

impl Movable for Bullet {
    fn update(&mut self, dt: f64) {
        if !self.is_alive {
            return;
        }
        self.position.add_inline(self.velocity * dt);
        self.age += dt;
        if self.is_expired() {
            self.is_alive = false;
        }
    }
}

impl Collidable for Bullet {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        BULLET_RADIUS
    }
}

/// An enemy saucer crossing the screen horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saucer {
    pub id: u32,
    pub position: DVec2,
    pub velocity: DVec2,
    pub pattern: SaucerPattern,
    /// Seconds until the next shot is allowed
    pub shoot_cooldown: f64,
    /// Seconds until the saucer leaves on its own
    #[serde(default)]
    pub remaining: f64,
}

impl Saucer {
    /// `direction` is +1.0 to travel right, -1.0 to travel left
    pub fn new(id: u32, position: DVec2, pattern: SaucerPattern, direction: f64) -> Self {
        Self {
            id,
            position,
            velocity: DVec2::new(direction.signum() * pattern.speed(), 0.0),
            pattern,
            shoot_cooldown: pattern.fire_interval(),
            remaining: SAUCER_LIFETIME,
        }
    }

    pub fn points(&self) -> u64 {
        self.pattern.points()
    }

    /// Fire straight down if the cooldown has elapsed
    pub fn try_fire(&mut self, ids: &mut EntityIds) -> Option<Bullet> {
        if self.shoot_cooldown > 0.0 {
            return None;
        }
        self.shoot_cooldown = self.pattern.fire_interval();
        Some(Bullet::new(
            ids.next_id(),
            self.position,
            DVec2::new(0.0, SAUCER_BULLET_SPEED),
        ))
    }

    /// True once the despawn timer ran out or the saucer left the screen
    pub fn is_despawned(&self, width: f64) -> bool {
        let r = self.pattern.radius();
        self.remaining <= 0.0 || self.position.x < -r || self.position.x > width + r
    }
}

impl Movable for Saucer {
    fn update(&mut self, dt: f64) {
        self.position.add_inline(self.velocity * dt);
        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);
        self.remaining -= dt;
    }
}

impl Collidable for Saucer {
    fn position(&self) -> DVec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.pattern.radius()
    }
}

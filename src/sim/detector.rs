//! Per-category collision queries
//!
//! The detector only reads entity state and reports what touched what this
//! tick. Applying the consequences is the orchestrator's job.

use serde::{Deserialize, Serialize};

use super::collision::Collidable;
use super::entities::{Asteroid, Bullet, Saucer, Ship};
use super::grid::SpatialGrid;
use crate::consts::GRID_CELL_SIZE;

/// One contact found during a tick, identified by entity IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    ShipAsteroid { ship: u32, asteroid: u32 },
    BulletAsteroid { bullet: u32, asteroid: u32 },
    BulletSaucer { bullet: u32, saucer: u32 },
    ShipSaucer { ship: u32, saucer: u32 },
    /// Saucer fire hitting the ship
    SaucerBulletShip { bullet: u32, ship: u32 },
}

impl Collision {
    pub fn label(&self) -> &'static str {
        match self {
            Collision::ShipAsteroid { .. } => "ship-asteroid",
            Collision::BulletAsteroid { .. } => "bullet-asteroid",
            Collision::BulletSaucer { .. } => "bullet-saucer",
            Collision::ShipSaucer { .. } => "ship-saucer",
            Collision::SaucerBulletShip { .. } => "saucer-bullet-ship",
        }
    }
}

/// Borrowed view of every entity collection for one query cycle
#[derive(Debug, Clone, Copy)]
pub struct CollisionWorld<'a> {
    pub ship: Option<&'a Ship>,
    pub asteroids: &'a [Asteroid],
    pub bullets: &'a [Bullet],
    pub saucers: &'a [Saucer],
    pub saucer_bullets: &'a [Bullet],
}

/// Collision queries backed by a reusable spatial grid
#[derive(Debug, Clone)]
pub struct CollisionDetector {
    grid: SpatialGrid,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl CollisionDetector {
    pub fn new(cell_size: f64) -> Self {
        Self {
            grid: SpatialGrid::new(cell_size),
        }
    }

    /// First asteroid touching the ship, if any
    pub fn check_ship_asteroid(&self, ship: &Ship, asteroids: &[Asteroid]) -> Option<Collision> {
        if !ship.is_vulnerable() {
            return None;
        }
        asteroids
            .iter()
            .find(|a| ship.collides_with(*a))
            .map(|a| Collision::ShipAsteroid {
                ship: ship.id,
                asteroid: a.id,
            })
    }

    /// First saucer touching the ship, if any
    pub fn check_ship_saucer(&self, ship: &Ship, saucers: &[Saucer]) -> Option<Collision> {
        if !ship.is_vulnerable() {
            return None;
        }
        saucers
            .iter()
            .find(|s| ship.collides_with(*s))
            .map(|s| Collision::ShipSaucer {
                ship: ship.id,
                saucer: s.id,
            })
    }

    /// First saucer bullet touching the ship, if any
    pub fn check_saucer_bullet_ship(&self, ship: &Ship, bullets: &[Bullet]) -> Option<Collision> {
        if !ship.is_vulnerable() {
            return None;
        }
        bullets
            .iter()
            .filter(|b| b.is_alive)
            .find(|b| ship.collides_with(*b))
            .map(|b| Collision::SaucerBulletShip {
                bullet: b.id,
                ship: ship.id,
            })
    }

    /// Grid-accelerated bullet vs asteroid pass, at most one hit per bullet
    pub fn check_bullet_asteroid(&mut self, bullets: &[Bullet], asteroids: &[Asteroid]) -> Vec<Collision> {
        self.bullet_hits(bullets, asteroids)
            .into_iter()
            .map(|(bullet, target)| Collision::BulletAsteroid {
                bullet,
                asteroid: asteroids[target].id,
            })
            .collect()
    }

    /// Grid-accelerated bullet vs saucer pass, at most one hit per bullet
    pub fn check_bullet_saucer(&mut self, bullets: &[Bullet], saucers: &[Saucer]) -> Vec<Collision> {
        self.bullet_hits(bullets, saucers)
            .into_iter()
            .map(|(bullet, target)| Collision::BulletSaucer {
                bullet,
                saucer: saucers[target].id,
            })
            .collect()
    }

    /// Every collision this tick.
    ///
    /// Order is fixed for reproducibility: ship-asteroid, bullet-asteroid,
    /// bullet-saucer, ship-saucer, then saucer fire against the ship.
    pub fn check_all(&mut self, world: &CollisionWorld<'_>) -> Vec<Collision> {
        let mut collisions = Vec::new();

        if let Some(ship) = world.ship {
            collisions.extend(self.check_ship_asteroid(ship, world.asteroids));
        }
        collisions.extend(self.check_bullet_asteroid(world.bullets, world.asteroids));
        collisions.extend(self.check_bullet_saucer(world.bullets, world.saucers));
        if let Some(ship) = world.ship {
            collisions.extend(self.check_ship_saucer(ship, world.saucers));
            collisions.extend(self.check_saucer_bullet_ship(ship, world.saucer_bullets));
        }

        collisions
    }

    /// Fill the grid with `targets` and pair each live bullet's ID with the
    /// index of the first target it overlaps
    fn bullet_hits<T: Collidable>(&mut self, bullets: &[Bullet], targets: &[T]) -> Vec<(u32, usize)> {
        self.grid.clear();
        if targets.is_empty() {
            return Vec::new();
        }
        self.grid.insert_all(targets);

        let grid = &self.grid;
        bullets
            .iter()
            .filter(|b| b.is_alive)
            .filter_map(|bullet| {
                grid.query(bullet)
                    .into_iter()
                    .find(|&i| bullet.collides_with(&targets[i]))
                    .map(|i| (bullet.id, i))
            })
            .collect()
    }
}

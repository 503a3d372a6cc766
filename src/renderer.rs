//! Rendering boundary
//!
//! Drawing happens outside the core. A renderer receives a borrowed,
//! read-only snapshot once per frame and cannot affect the simulation.

use crate::sim::{Asteroid, Bullet, GamePhase, Saucer, Ship};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// `None` between a ship's destruction and game over
    pub ship: Option<&'a Ship>,
    pub asteroids: &'a [Asteroid],
    pub bullets: &'a [Bullet],
    pub saucer_bullets: &'a [Bullet],
    pub saucers: &'a [Saucer],
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub level: u32,
    pub phase: GamePhase,
}

impl Snapshot<'_> {
    /// Total live actors, handy for HUD debug overlays
    pub fn entity_count(&self) -> usize {
        self.ship.is_some() as usize
            + self.asteroids.len()
            + self.bullets.len()
            + self.saucer_bullets.len()
            + self.saucers.len()
    }
}

/// Consumer of per-frame snapshots
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

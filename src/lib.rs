//! Rock Drift - a toroidal asteroids arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `renderer`: Read-only snapshot boundary for external renderers
//! - `audio`: Fire-and-forget sound notifications
//! - `highscores`: Best-effort high score persistence
//! - `settings`: Data-driven gameplay tuning

pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioSink, LogAudio, NullAudio, SoundEffect};
pub use highscores::{MemoryScoreStore, ScoreStore};
pub use renderer::{Renderer, Snapshot};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum catch-up steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest real frame time fed into the accumulator (seconds)
    pub const MAX_FRAME_TIME: f64 = 0.25;

    /// Default world dimensions
    pub const WORLD_WIDTH: f64 = 800.0;
    pub const WORLD_HEIGHT: f64 = 600.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f64 = 15.0;
    /// Radians per second
    pub const SHIP_ROTATION_SPEED: f64 = 5.0;
    /// Pixels/s² while thrusting
    pub const SHIP_THRUST_POWER: f64 = 300.0;
    /// Fraction of velocity kept after one second of coasting
    pub const SHIP_DRAG: f64 = 0.6;
    pub const SHIP_MAX_SPEED: f64 = 400.0;
    /// Seconds of immunity after a respawn
    pub const RESPAWN_INVULNERABILITY: f64 = 2.0;

    /// Bullet defaults
    pub const BULLET_RADIUS: f64 = 5.0;
    pub const BULLET_LIFETIME: f64 = 2.0;
    pub const BULLET_SPEED: f64 = 300.0;
    /// Distance ahead of the ship's centre where bullets appear
    pub const BULLET_SPAWN_OFFSET: f64 = 20.0;
    pub const SAUCER_BULLET_SPEED: f64 = 200.0;

    /// Asteroid drift speed for every size
    pub const ASTEROID_SPEED: f64 = 50.0;
    /// Hard cap on the size of a single wave
    pub const MAX_WAVE_ASTEROIDS: u32 = 12;
    /// New waves never spawn closer than this to the ship
    pub const SAFE_SPAWN_DISTANCE: f64 = 150.0;

    /// Saucers despawn after this many seconds even if still on screen
    pub const SAUCER_LIFETIME: f64 = 15.0;

    /// Broad-phase cell size, well above the largest entity radius (60)
    pub const GRID_CELL_SIZE: f64 = 100.0;

    /// Score interval between bonus lives
    pub const EXTRA_LIFE_SCORE: u64 = 10_000;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (radians, 0 = +x, screen y grows down)
#[inline]
pub fn heading(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

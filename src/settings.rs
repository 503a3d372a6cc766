//! Gameplay tuning
//!
//! Everything here is data: a host can ship a JSON file to rebalance a run
//! without touching the simulation. Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === World ===
    /// Playfield width in world units
    pub world_width: f64,
    /// Playfield height in world units
    pub world_height: f64,

    // === Run ===
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Asteroids in the first wave
    pub initial_asteroids: u32,
    /// Seconds of immunity after respawning
    pub respawn_invulnerability: f64,

    // === Saucers ===
    pub saucers_enabled: bool,

    // === Broad phase ===
    /// Spatial grid cell size; keep above twice the largest radius
    pub grid_cell_size: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,

            starting_lives: 3,
            initial_asteroids: 4,
            respawn_invulnerability: RESPAWN_INVULNERABILITY,

            saucers_enabled: true,

            grid_cell_size: GRID_CELL_SIZE,
        }
    }
}

impl Settings {
    /// Parse settings, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Invalid settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace nonsensical values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.world_width > 0.0 && self.world_width.is_finite()) {
            self.world_width = defaults.world_width;
        }
        if !(self.world_height > 0.0 && self.world_height.is_finite()) {
            self.world_height = defaults.world_height;
        }
        if self.starting_lives == 0 {
            self.starting_lives = defaults.starting_lives;
        }
        if self.initial_asteroids == 0 {
            self.initial_asteroids = defaults.initial_asteroids;
        }
        if !(self.grid_cell_size > 0.0 && self.grid_cell_size.is_finite()) {
            self.grid_cell_size = defaults.grid_cell_size;
        }
        if !(self.respawn_invulnerability >= 0.0) {
            self.respawn_invulnerability = defaults.respawn_invulnerability;
        }
        self
    }

    /// Centre of the playfield
    pub fn center(&self) -> glam::DVec2 {
        glam::DVec2::new(self.world_width / 2.0, self.world_height / 2.0)
    }
}

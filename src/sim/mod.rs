//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, IDs allocated monotonically)
//! - No rendering, audio or platform dependencies beyond the boundary traits

pub mod collision;
pub mod detector;
pub mod entities;
pub mod game;
pub mod grid;
pub mod input;
pub mod invariants;
pub mod state;
pub mod timestep;
pub mod vector;

pub use collision::{Collidable, CollisionBox, Movable, wrap_coordinate, wrap_point};
pub use detector::{Collision, CollisionDetector, CollisionWorld};
pub use entities::{Asteroid, AsteroidSize, Bullet, EntityIds, Saucer, SaucerPattern, Ship};
pub use game::{Game, GameEvent, saucer_interval, small_saucer_chance, wave_size};
pub use grid::SpatialGrid;
pub use input::{InputTracker, Key, TickInput};
pub use invariants::InvariantViolation;
pub use state::{GamePhase, GameState};
pub use timestep::FixedTimestep;
pub use vector::{Vector2D, VectorExt, distance, distance_squared};

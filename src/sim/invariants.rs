//! Structural invariants of a running game
//!
//! A broken invariant (a NaN position, a bullet older than its lifetime
//! still flying) is a simulation bug, not a recoverable condition. Hosts and
//! tests call `Game::validate_invariants` after a step to catch one early.

use std::fmt;

use glam::DVec2;

use super::game::Game;
use super::state::GamePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Lives and phase disagree (no lives while playing, or a ship after game over)
    PhaseLivesMismatch,
    /// An entity has a NaN or infinite position or velocity
    NonFiniteState { id: u32 },
    /// Ship or asteroid outside the wrapped playfield
    OutOfBounds { id: u32 },
    /// A bullet is still alive past its lifetime
    StaleBullet { id: u32 },
    /// Saucer cooldown negative or beyond its fire interval
    SaucerCooldown { id: u32 },
    /// Two entities share an ID
    DuplicateId { id: u32 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseLivesMismatch => write!(f, "phase and lives disagree"),
            Self::NonFiniteState { id } => write!(f, "entity {id} has non-finite state"),
            Self::OutOfBounds { id } => write!(f, "entity {id} is outside the playfield"),
            Self::StaleBullet { id } => write!(f, "bullet {id} outlived its lifetime"),
            Self::SaucerCooldown { id } => write!(f, "saucer {id} cooldown out of range"),
            Self::DuplicateId { id } => write!(f, "entity id {id} used twice"),
        }
    }
}

impl std::error::Error for InvariantViolation {}

fn finite(v: DVec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

impl Game {
    /// Check every structural invariant, reporting the first failure
    pub fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        match self.state.phase {
            GamePhase::Playing | GamePhase::Paused if self.state.lives == 0 => {
                return Err(InvariantViolation::PhaseLivesMismatch);
            }
            GamePhase::GameOver if self.ship.is_some() || self.state.lives != 0 => {
                return Err(InvariantViolation::PhaseLivesMismatch);
            }
            _ => {}
        }

        let (w, h) = (self.settings.world_width, self.settings.world_height);
        let in_bounds = |p: DVec2| p.x >= 0.0 && p.x < w && p.y >= 0.0 && p.y < h;

        let mut ids = std::collections::HashSet::new();
        let mut claim = |id: u32| {
            if ids.insert(id) {
                Ok(())
            } else {
                Err(InvariantViolation::DuplicateId { id })
            }
        };

        if let Some(ship) = &self.ship {
            claim(ship.id)?;
            if !finite(ship.position) || !finite(ship.velocity) || !ship.rotation.is_finite() {
                return Err(InvariantViolation::NonFiniteState { id: ship.id });
            }
            if !in_bounds(ship.position) {
                return Err(InvariantViolation::OutOfBounds { id: ship.id });
            }
        }

        for asteroid in &self.asteroids {
            claim(asteroid.id)?;
            if !finite(asteroid.position) || !finite(asteroid.velocity) {
                return Err(InvariantViolation::NonFiniteState { id: asteroid.id });
            }
            if !in_bounds(asteroid.position) {
                return Err(InvariantViolation::OutOfBounds { id: asteroid.id });
            }
        }

        for bullet in self.bullets.iter().chain(&self.saucer_bullets) {
            claim(bullet.id)?;
            if !finite(bullet.position) || !finite(bullet.velocity) {
                return Err(InvariantViolation::NonFiniteState { id: bullet.id });
            }
            if bullet.is_alive && bullet.age >= bullet.lifetime {
                return Err(InvariantViolation::StaleBullet { id: bullet.id });
            }
        }

        for saucer in &self.saucers {
            claim(saucer.id)?;
            if !finite(saucer.position) || !finite(saucer.velocity) {
                return Err(InvariantViolation::NonFiniteState { id: saucer.id });
            }
            if !(0.0..=saucer.pattern.fire_interval()).contains(&saucer.shoot_cooldown) {
                return Err(InvariantViolation::SaucerCooldown { id: saucer.id });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::highscores::MemoryScoreStore;
    use crate::settings::Settings;

    fn assert_violation(mutate: impl FnOnce(&mut Game), expected: InvariantViolation) {
        let mut game = Game::new(
            Settings::default(),
            0xDEAD_BEEF,
            Box::new(MemoryScoreStore::new()),
            Box::new(NullAudio),
        );
        game.start();
        game.validate_invariants().expect("fresh game must be valid");
        mutate(&mut game);
        assert_eq!(game.validate_invariants(), Err(expected));
    }

    #[test]
    fn test_nan_position_detected() {
        // Ship takes ID 1, the first wave IDs 2..
        assert_violation(
            |g| g.asteroids[0].position.x = f64::NAN,
            InvariantViolation::NonFiniteState { id: 2 },
        );
    }

    #[test]
    fn test_zero_lives_while_playing() {
        assert_violation(|g| g.state.lives = 0, InvariantViolation::PhaseLivesMismatch);
    }

    #[test]
    fn test_ship_out_of_bounds() {
        assert_violation(
            |g| {
                if let Some(ship) = g.ship.as_mut() {
                    ship.position.x = -5.0;
                }
            },
            InvariantViolation::OutOfBounds { id: 1 },
        );
    }

    #[test]
    fn test_stale_bullet() {
        assert_violation(
            |g| {
                let id = g.next_entity_id();
                let mut b = crate::sim::Bullet::new(id, DVec2::new(1.0, 1.0), DVec2::ZERO);
                b.age = b.lifetime;
                g.bullets.push(b);
            },
            InvariantViolation::StaleBullet { id: 6 },
        );
    }

    #[test]
    fn test_duplicate_id() {
        assert_violation(
            |g| {
                let first = g.asteroids[0].id;
                g.asteroids[1].id = first;
            },
            InvariantViolation::DuplicateId { id: 2 },
        );
    }

    #[test]
    fn test_long_run_stays_valid() {
        let mut game = Game::new(
            Settings::default(),
            42,
            Box::new(MemoryScoreStore::new()),
            Box::new(NullAudio),
        );
        game.start();
        for i in 0..3600u32 {
            game.set_input(crate::sim::TickInput {
                thrust: i % 120 < 30,
                rotate_left: i % 90 < 20,
                fire: i % 15 == 0,
                ..Default::default()
            });
            game.update(crate::consts::SIM_DT);
            if let Err(e) = game.validate_invariants() {
                panic!("step {i}: {e}");
            }
            if game.phase() == GamePhase::GameOver {
                break;
            }
        }
    }
}

//! Game orchestrator
//!
//! Owns every entity collection and advances the world one fixed step at a
//! time. Per step, in order:
//! 1. apply buffered input to the ship
//! 2. integrate all entities
//! 3. wrap ship and asteroids (bullets and saucers may leave the screen)
//! 4. collect this step's collisions
//! 5. apply their effects
//! 6. prune dead bullets and departed saucers
//! 7. run the saucer schedule
//! 8. start the next wave once the field is clear

use std::collections::HashSet;

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Movable;
use super::detector::{Collision, CollisionDetector, CollisionWorld};
use super::entities::{Asteroid, AsteroidSize, Bullet, EntityIds, Saucer, SaucerPattern, Ship};
use super::input::TickInput;
use super::state::{GamePhase, GameState};
use super::vector::distance_squared;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;
use crate::highscores::ScoreStore;
use crate::renderer::Snapshot;
use crate::settings::Settings;

/// Notable things that happened during `update`, for HUD adapters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32, asteroids: u32 },
    AsteroidDestroyed { size: AsteroidSize, points: u64 },
    SaucerSpawned { pattern: SaucerPattern },
    SaucerDestroyed { pattern: SaucerPattern, points: u64 },
    ShipDestroyed { lives_left: u32 },
    ExtraLife { lives: u32 },
    GameOver { score: u64 },
}

/// Seconds between saucer appearances at `level`
pub fn saucer_interval(level: u32) -> f64 {
    (20.0 - 2.0 * level.saturating_sub(1) as f64).max(8.0)
}

/// Probability that a spawned saucer is the small, dangerous kind
pub fn small_saucer_chance(level: u32) -> f64 {
    (0.1 * level as f64).min(0.7)
}

/// Asteroids in the wave for `level` (1-based): one more per level
pub fn wave_size(initial: u32, level: u32) -> u32 {
    (initial + level.saturating_sub(1)).min(MAX_WAVE_ASTEROIDS)
}

pub struct Game {
    pub settings: Settings,
    pub state: GameState,
    pub ship: Option<Ship>,
    pub asteroids: Vec<Asteroid>,
    /// Player bullets
    pub bullets: Vec<Bullet>,
    /// Saucer bullets; these only threaten the ship
    pub saucer_bullets: Vec<Bullet>,
    pub saucers: Vec<Saucer>,
    /// Countdown to the next saucer (seconds)
    pub saucer_timer: f64,
    /// Run seed for reproducibility
    pub seed: u64,
    ids: EntityIds,
    rng: Pcg32,
    detector: CollisionDetector,
    input: TickInput,
    events: Vec<GameEvent>,
    store: Box<dyn ScoreStore>,
    audio: Box<dyn AudioSink>,
}

impl Game {
    /// New game sitting in the menu
    pub fn new(
        settings: Settings,
        seed: u64,
        store: Box<dyn ScoreStore>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let settings = settings.sanitized();
        let high_score = store.high_score();
        Self {
            state: GameState::new(settings.starting_lives, high_score),
            detector: CollisionDetector::new(settings.grid_cell_size),
            settings,
            ship: None,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            saucer_bullets: Vec::new(),
            saucers: Vec::new(),
            saucer_timer: 0.0,
            seed,
            ids: EntityIds::new(),
            rng: Pcg32::seed_from_u64(seed),
            input: TickInput::default(),
            events: Vec::new(),
            store,
            audio,
        }
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> bool {
        if !self.state.start() {
            return false;
        }
        self.begin_run();
        true
    }

    /// GameOver -> Playing
    pub fn restart(&mut self) -> bool {
        if !self.state.restart() {
            return false;
        }
        self.begin_run();
        true
    }

    /// GameOver -> Menu
    pub fn return_to_menu(&mut self) -> bool {
        self.state.return_to_menu()
    }

    pub fn toggle_pause(&mut self) -> bool {
        let toggled = self.state.toggle_pause();
        if toggled && self.state.phase == GamePhase::Paused {
            if let Some(ship) = self.ship.as_mut().filter(|s| s.is_thrusting) {
                ship.release_thrust();
                self.audio.stop_thrust();
            }
        }
        toggled
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Buffer input for the next `update`.
    ///
    /// Held keys take the latest value. One-shot presses accumulate until a
    /// step consumes them, so a frame that runs no steps cannot drop one.
    pub fn set_input(&mut self, input: TickInput) {
        let pending = self.input;
        self.input = TickInput {
            fire: input.fire || pending.fire,
            hyperspace: input.hyperspace || pending.hyperspace,
            pause: input.pause || pending.pause,
            ..input
        };
    }

    /// Advance the world by one step of `dt` seconds
    pub fn update(&mut self, dt: f64) {
        let input = self.input;
        self.input.clear_edges();

        if input.pause {
            self.toggle_pause();
        }
        if !self.state.is_playing() {
            return;
        }

        self.apply_input(&input);
        self.integrate(dt);
        self.wrap();

        let collisions = self.detector.check_all(&CollisionWorld {
            ship: self.ship.as_ref(),
            asteroids: &self.asteroids,
            bullets: &self.bullets,
            saucers: &self.saucers,
            saucer_bullets: &self.saucer_bullets,
        });
        let mut consumed = HashSet::new();
        for collision in collisions {
            if !self.state.is_playing() {
                break;
            }
            self.apply_collision(collision, &mut consumed);
        }

        self.prune();
        if !self.state.is_playing() {
            return;
        }

        self.run_saucer_schedule(dt);
        if self.asteroids.is_empty() {
            self.next_level();
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            ship: self.ship.as_ref(),
            asteroids: &self.asteroids,
            bullets: &self.bullets,
            saucer_bullets: &self.saucer_bullets,
            saucers: &self.saucers,
            score: self.state.score,
            high_score: self.state.high_score,
            lives: self.state.lives,
            level: self.state.level,
            phase: self.state.phase,
        }
    }

    /// Take the events accumulated since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Allocate an ID for an entity the caller wants to insert
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    fn begin_run(&mut self) {
        self.asteroids.clear();
        self.bullets.clear();
        self.saucer_bullets.clear();
        self.saucers.clear();
        self.events.clear();
        self.input = TickInput::default();

        let id = self.ids.next_id();
        self.ship = Some(Ship::new(id, self.settings.center()));
        self.next_level();
        log::info!("Run started (seed {})", self.seed);
    }

    fn apply_input(&mut self, input: &TickInput) {
        let Some(ship) = self.ship.as_mut() else {
            return;
        };

        let turn = input.rotation();
        if turn != 0.0 {
            ship.rotate(turn);
        }

        if input.thrust {
            if !ship.is_thrusting {
                self.audio.start_thrust();
            }
            ship.thrust();
        } else if ship.is_thrusting {
            ship.release_thrust();
            self.audio.stop_thrust();
        }

        if input.fire {
            self.bullets.push(ship.fire(&mut self.ids));
            self.audio.play(SoundEffect::Shoot);
        }

        if input.hyperspace {
            ship.hyperspace(&mut self.rng, self.settings.world_width, self.settings.world_height);
        }
    }

    fn integrate(&mut self, dt: f64) {
        if let Some(ship) = self.ship.as_mut() {
            ship.update(dt);
        }
        for asteroid in &mut self.asteroids {
            asteroid.update(dt);
        }
        for bullet in &mut self.bullets {
            bullet.update(dt);
        }
        for bullet in &mut self.saucer_bullets {
            bullet.update(dt);
        }
        for saucer in &mut self.saucers {
            saucer.update(dt);
            if let Some(bullet) = saucer.try_fire(&mut self.ids) {
                self.saucer_bullets.push(bullet);
            }
        }
    }

    fn wrap(&mut self) {
        let (w, h) = (self.settings.world_width, self.settings.world_height);
        if let Some(ship) = self.ship.as_mut() {
            ship.wrap_position(w, h);
        }
        for asteroid in &mut self.asteroids {
            asteroid.wrap_position(w, h);
        }
    }

    /// Apply one collision unless an entity it names was already used up
    /// earlier in this step
    fn apply_collision(&mut self, collision: Collision, consumed: &mut HashSet<u32>) {
        let (a, b) = match collision {
            Collision::ShipAsteroid { ship, asteroid } => (ship, asteroid),
            Collision::BulletAsteroid { bullet, asteroid } => (bullet, asteroid),
            Collision::BulletSaucer { bullet, saucer } => (bullet, saucer),
            Collision::ShipSaucer { ship, saucer } => (ship, saucer),
            Collision::SaucerBulletShip { bullet, ship } => (bullet, ship),
        };
        if consumed.contains(&a) || consumed.contains(&b) {
            log::trace!("Skipping stale {} collision", collision.label());
            return;
        }
        consumed.insert(a);
        consumed.insert(b);

        match collision {
            Collision::ShipAsteroid { asteroid, .. } => {
                self.destroy_asteroid(asteroid);
                self.destroy_ship();
            }
            Collision::ShipSaucer { saucer, .. } => {
                self.remove_saucer(saucer);
                self.destroy_ship();
            }
            Collision::SaucerBulletShip { bullet, .. } => {
                kill_bullet(&mut self.saucer_bullets, bullet);
                self.destroy_ship();
            }
            Collision::BulletAsteroid { bullet, asteroid } => {
                kill_bullet(&mut self.bullets, bullet);
                if let Some(points) = self.destroy_asteroid(asteroid) {
                    self.audio.play(SoundEffect::Hit);
                    self.award(points);
                }
            }
            Collision::BulletSaucer { bullet, saucer } => {
                kill_bullet(&mut self.bullets, bullet);
                if let Some(removed) = self.remove_saucer(saucer) {
                    let points = removed.points();
                    self.events.push(GameEvent::SaucerDestroyed {
                        pattern: removed.pattern,
                        points,
                    });
                    self.audio.play(SoundEffect::Hit);
                    self.award(points);
                }
            }
        }
    }

    /// Remove an asteroid, replacing it with its fragments. Returns its
    /// point value.
    fn destroy_asteroid(&mut self, id: u32) -> Option<u64> {
        let index = self.asteroids.iter().position(|a| a.id == id)?;
        let asteroid = self.asteroids.remove(index);
        let fragments = asteroid.split(&mut self.ids, &mut self.rng);
        self.asteroids.extend(fragments);

        let points = asteroid.points();
        self.events.push(GameEvent::AsteroidDestroyed {
            size: asteroid.size,
            points,
        });
        Some(points)
    }

    fn remove_saucer(&mut self, id: u32) -> Option<Saucer> {
        let index = self.saucers.iter().position(|s| s.id == id)?;
        Some(self.saucers.remove(index))
    }

    fn award(&mut self, points: u64) {
        let granted = self.state.add_score(points);
        for _ in 0..granted {
            self.events.push(GameEvent::ExtraLife {
                lives: self.state.lives,
            });
            self.audio.play(SoundEffect::ExtraLife);
        }
    }

    /// Lose a life; respawn at the centre or end the run
    fn destroy_ship(&mut self) {
        self.audio.play(SoundEffect::Explosion);
        if self.ship.as_ref().is_some_and(|s| s.is_thrusting) {
            self.audio.stop_thrust();
        }

        let game_over = self.state.lose_life();
        self.events.push(GameEvent::ShipDestroyed {
            lives_left: self.state.lives,
        });

        if game_over {
            self.ship = None;
            let score = self.state.score;
            self.store.save_high_score(score);
            self.events.push(GameEvent::GameOver { score });
            log::info!("Game over: score {} on level {}", score, self.state.level);
        } else {
            let id = self.ids.next_id();
            let mut ship = Ship::new(id, self.settings.center());
            ship.invulnerable = self.settings.respawn_invulnerability;
            self.ship = Some(ship);
            log::debug!("Ship respawned, {} lives left", self.state.lives);
        }
    }

    fn prune(&mut self) {
        self.bullets.retain(|b| b.is_alive);
        self.saucer_bullets.retain(|b| b.is_alive);
        let width = self.settings.world_width;
        self.saucers.retain(|s| !s.is_despawned(width));
    }

    fn run_saucer_schedule(&mut self, dt: f64) {
        if !self.settings.saucers_enabled || !self.saucers.is_empty() {
            return;
        }
        self.saucer_timer -= dt;
        if self.saucer_timer <= 0.0 {
            self.spawn_saucer();
            self.saucer_timer = saucer_interval(self.state.level);
        }
    }

    fn spawn_saucer(&mut self) {
        let pattern = if self.rng.random_bool(small_saucer_chance(self.state.level)) {
            SaucerPattern::Small
        } else {
            SaucerPattern::Large
        };
        let (w, h) = (self.settings.world_width, self.settings.world_height);
        let enter_from_left = self.rng.random_bool(0.5);
        let r = pattern.radius();
        let (x, direction) = if enter_from_left { (-r, 1.0) } else { (w + r, -1.0) };
        let y = self.rng.random_range(h * 0.1..h * 0.9);

        let id = self.ids.next_id();
        self.saucers.push(Saucer::new(id, DVec2::new(x, y), pattern, direction));
        self.events.push(GameEvent::SaucerSpawned { pattern });
        log::debug!("{} saucer entering at y={:.0}", pattern.as_str(), y);
    }

    /// Advance the level counter and spawn a fresh wave of large asteroids
    fn next_level(&mut self) {
        self.state.level += 1;
        let level = self.state.level;
        let count = wave_size(self.settings.initial_asteroids, level);

        for _ in 0..count {
            let position = self.safe_spawn_point();
            let id = self.ids.next_id();
            let asteroid = Asteroid::new(id, position, AsteroidSize::Large, &mut self.rng);
            self.asteroids.push(asteroid);
        }
        self.saucer_timer = saucer_interval(level);

        self.events.push(GameEvent::LevelStarted {
            level,
            asteroids: count,
        });
        log::info!("Level {}: {} asteroids", level, count);
    }

    /// Random point at least `SAFE_SPAWN_DISTANCE` from the ship
    fn safe_spawn_point(&mut self) -> DVec2 {
        let (w, h) = (self.settings.world_width, self.settings.world_height);
        let avoid = self.ship.as_ref().map(|s| s.position);
        let min_dist_sq = SAFE_SPAWN_DISTANCE * SAFE_SPAWN_DISTANCE;

        let mut candidate = DVec2::ZERO;
        for _ in 0..32 {
            candidate = DVec2::new(self.rng.random_range(0.0..w), self.rng.random_range(0.0..h));
            match avoid {
                Some(ship) if distance_squared(candidate, ship) < min_dist_sq => continue,
                _ => return candidate,
            }
        }
        // Tiny worlds: fall back to the point opposite the ship
        match avoid {
            Some(ship) => super::collision::wrap_point(ship + DVec2::new(w / 2.0, h / 2.0), w, h),
            None => candidate,
        }
    }
}

fn kill_bullet(bullets: &mut [Bullet], id: u32) {
    if let Some(bullet) = bullets.iter_mut().find(|b| b.id == id) {
        bullet.is_alive = false;
    }
}

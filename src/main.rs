//! Rock Drift entry point
//!
//! The native binary runs a headless, autopiloted session: it drives the
//! fixed-timestep loop with synthetic frame times, logs the HUD once a second
//! and persists the high score next to the working directory.
//!
//! Usage: `rock-drift [seed] [seconds] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rock_drift::consts::SIM_DT;
    use rock_drift::highscores::FileScoreStore;
    use rock_drift::sim::{FixedTimestep, Game, GameEvent, GamePhase, InputTracker, Key, Ship};
    use rock_drift::{LogAudio, Renderer, Settings, Snapshot, normalize_angle};

    const HIGH_SCORE_FILE: &str = "rock_drift_highscore.json";

    /// Logs a HUD line every `interval` frames
    struct LogRenderer {
        frame: u64,
        interval: u64,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, snapshot: &Snapshot<'_>) {
            self.frame += 1;
            if self.frame % self.interval != 0 {
                return;
            }
            log::info!(
                "[{:?}] level {} score {} (best {}) lives {} entities {}",
                snapshot.phase,
                snapshot.level,
                snapshot.score,
                snapshot.high_score,
                snapshot.lives,
                snapshot.entity_count()
            );
        }
    }

    /// Aim at the nearest asteroid, shoot, and drift when nothing is close
    fn autopilot(game: &Game, keys: &mut InputTracker, frame: u64) {
        for key in [Key::Thrust, Key::RotateLeft, Key::RotateRight, Key::Fire] {
            keys.release(key);
        }
        let Some(ship) = game.ship.as_ref() else {
            return;
        };
        let Some(target) = nearest_asteroid(game, ship) else {
            return;
        };

        let to_target = target - ship.position;
        let error = normalize_angle(to_target.y.atan2(to_target.x) - ship.rotation);
        if error > 0.05 {
            keys.press(Key::RotateRight);
        } else if error < -0.05 {
            keys.press(Key::RotateLeft);
        }
        if error.abs() < 0.2 && frame % 8 == 0 {
            keys.press(Key::Fire);
        }
        if to_target.length() > 250.0 && frame % 90 < 20 {
            keys.press(Key::Thrust);
        }
    }

    fn nearest_asteroid(game: &Game, ship: &Ship) -> Option<glam::DVec2> {
        game.asteroids
            .iter()
            .map(|a| a.position)
            .min_by(|a, b| {
                a.distance_squared(ship.position)
                    .total_cmp(&b.distance_squared(ship.position))
            })
    }

    /// Jittered 60 Hz frames with an occasional long stall
    fn frame_time(frame: u64) -> f64 {
        if frame % 600 == 599 {
            0.5
        } else {
            [0.014, 0.017, 0.020][(frame % 3) as usize]
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args: Vec<String> = std::env::args().skip(1).collect();
        let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);
        let seconds: f64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(60.0);
        let settings = match args.get(2) {
            Some(path) => Settings::load(path),
            None => Settings::default(),
        };

        log::info!("Rock Drift (headless) starting, seed {seed}, {seconds}s");

        let mut game = Game::new(
            settings,
            seed,
            Box::new(FileScoreStore::new(HIGH_SCORE_FILE)),
            Box::new(LogAudio),
        );
        let mut clock = FixedTimestep::default();
        let mut keys = InputTracker::new();
        let mut renderer = LogRenderer {
            frame: 0,
            interval: 60,
        };

        game.start();

        let mut elapsed = 0.0;
        let mut frame = 0u64;
        let mut steps_total = 0u64;
        while elapsed < seconds {
            let dt = frame_time(frame);
            elapsed += dt;

            autopilot(&game, &mut keys, frame);
            game.set_input(keys.snapshot());
            let steps = clock.advance(dt);
            for _ in 0..steps {
                game.update(SIM_DT);
            }
            steps_total += u64::from(steps);
            keys.end_frame();

            for event in game.drain_events() {
                match event {
                    GameEvent::GameOver { score } => log::info!("Game over with {score} points"),
                    other => log::debug!("{other:?}"),
                }
            }
            if let Err(e) = game.validate_invariants() {
                log::error!("Invariant broken at frame {frame}: {e}");
                break;
            }

            renderer.render(&game.snapshot());
            if game.phase() == GamePhase::GameOver {
                break;
            }
            frame += 1;
        }

        log::info!(
            "Finished after {frame} frames / {steps_total} steps: score {}, level {}, best {}",
            game.state.score,
            game.state.level,
            game.state.high_score
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}

//! Game phase machine and run counters
//!
//! Transitions are only ever requested from outside (start, pause toggle,
//! a lost life, restart). Requests that make no sense for the current phase
//! are ignored and reported as `false`.

use serde::{Deserialize, Serialize};

use crate::consts::EXTRA_LIFE_SCORE;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulates
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen by the player
    Paused,
    /// All lives lost
    GameOver,
}

/// Phase plus score, lives and level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    /// Current wave (1-based once playing)
    pub level: u32,
    pub high_score: u64,
    /// Score at which the next bonus life is granted
    #[serde(default)]
    pub next_extra_life: u64,
    starting_lives: u32,
}

impl GameState {
    pub fn new(starting_lives: u32, high_score: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: starting_lives,
            level: 0,
            high_score,
            next_extra_life: EXTRA_LIFE_SCORE,
            starting_lives,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Menu -> Playing
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("Ignoring start request in {:?}", self.phase);
            return false;
        }
        self.reset_run();
        self.phase = GamePhase::Playing;
        true
    }

    /// Playing <-> Paused; any other phase ignores the request
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => {
                log::debug!("Ignoring pause toggle in {:?}", other);
                return false;
            }
        };
        true
    }

    /// Take one life away. Returns `true` if that ended the game.
    pub fn lose_life(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    /// GameOver -> Playing with fresh counters
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            log::debug!("Ignoring restart request in {:?}", self.phase);
            return false;
        }
        self.reset_run();
        self.phase = GamePhase::Playing;
        true
    }

    /// GameOver -> Menu
    pub fn return_to_menu(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::Menu;
        true
    }

    /// Award points. Returns the number of bonus lives granted.
    pub fn add_score(&mut self, points: u64) -> u32 {
        self.score += points;
        self.high_score = self.high_score.max(self.score);

        let mut granted = 0;
        while self.score >= self.next_extra_life {
            self.lives += 1;
            self.next_extra_life += EXTRA_LIFE_SCORE;
            granted += 1;
        }
        granted
    }

    fn reset_run(&mut self) {
        self.score = 0;
        self.lives = self.starting_lives;
        self.level = 0;
        self.next_extra_life = EXTRA_LIFE_SCORE;
    }
}

//! High score persistence
//!
//! Only a single number is kept. Storage is best-effort: every adapter
//! swallows its own failures, logs them, and falls back to 0 / no-op so the
//! simulation never sees an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persistent home for the best score
pub trait ScoreStore {
    /// Stored best score, or 0 if unavailable
    fn high_score(&self) -> u64;
    /// Persist `score`; failures are logged, never returned
    fn save_high_score(&mut self, score: u64);
}

/// On-disk / LocalStorage representation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SavedHighScore {
    pub high_score: u64,
}

/// Reasons a storage backend could not be used
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "storage io error: {e}"),
            Self::Parse(e) => write!(f, "malformed high score record: {e}"),
            Self::Unavailable => write!(f, "storage backend unavailable"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Session-only store
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryScoreStore {
    best: u64,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(best: u64) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn high_score(&self) -> u64 {
        self.best
    }

    fn save_high_score(&mut self, score: u64) {
        self.best = self.best.max(score);
    }
}

/// JSON file store for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileScoreStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<u64, StoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        let saved: SavedHighScore = serde_json::from_str(&json)?;
        Ok(saved.high_score)
    }

    fn write(&self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&SavedHighScore { high_score: score })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileScoreStore {
    fn high_score(&self) -> u64 {
        match self.read() {
            Ok(score) => score,
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Could not load high score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) {
        if score <= self.high_score() {
            return;
        }
        match self.write(score) {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Could not save high score: {}", e),
        }
    }
}

/// LocalStorage store for the browser
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalScoreStore;

#[cfg(target_arch = "wasm32")]
impl LocalScoreStore {
    const STORAGE_KEY: &'static str = "rock_drift_highscore";

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }

    fn read() -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Ok(serde_json::from_str::<SavedHighScore>(&json)?.high_score),
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn write(score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&SavedHighScore { high_score: score })?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalScoreStore {
    fn high_score(&self) -> u64 {
        Self::read().unwrap_or_else(|e| {
            log::warn!("High score unavailable: {}", e);
            0
        })
    }

    fn save_high_score(&mut self, score: u64) {
        if score <= self.high_score() {
            return;
        }
        if let Err(e) = Self::write(score) {
            log::warn!("Could not save high score: {}", e);
        }
    }
}

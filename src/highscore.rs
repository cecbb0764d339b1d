//! Persisted high score
//!
//! A single integer stored under `highestScore`. Native builds keep it in a
//! small JSON file, the browser build in LocalStorage. Storage failures never
//! end the game: the keeper falls back to an in-memory value for the session.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key (and JSON field name)
pub const STORAGE_KEY: &str = "highestScore";

/// High score storage failure
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("high score I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored high score is malformed: {0}")]
    Format(#[from] serde_json::Error),

    #[error("high score storage unavailable")]
    Unavailable,
}

/// Backend holding the persisted value
pub trait HighScoreStore {
    /// Stored value, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<u64>, PersistError>;
    fn save(&mut self, score: u64) -> Result<(), PersistError>;
}

/// On-disk/in-storage representation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "highestScore")]
    highest_score: u64,
}

/// Process-local store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Rc<Cell<Option<u64>>>,
}

impl MemoryStore {
    pub fn with_value(score: u64) -> Self {
        Self {
            value: Rc::new(Cell::new(Some(score))),
        }
    }

    pub fn value(&self) -> Option<u64> {
        self.value.get()
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>, PersistError> {
        Ok(self.value.get())
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        self.value.set(Some(score));
        Ok(())
    }
}

/// JSON file store (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Default file name in the working directory
    pub const DEFAULT_PATH: &'static str = "flappy_beetle_highscore.json";

    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HighScoreStore for FileStore {
    fn load(&self) -> Result<Option<u64>, PersistError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: HighScoreRecord = serde_json::from_str(&json)?;
        Ok(Some(record.highest_score))
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        let json = serde_json::to_string(&HighScoreRecord {
            highest_score: score,
        })?;
        // Write to a sibling temp file first so a crash never leaves a torn file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, PersistError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<u64>, PersistError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(json)) => {
                let record: HighScoreRecord = serde_json::from_str(&json)?;
                Ok(Some(record.highest_score))
            }
            Ok(None) => Ok(None),
            Err(_) => Err(PersistError::Unavailable),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), PersistError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&HighScoreRecord {
            highest_score: score,
        })?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|_| PersistError::Unavailable)
    }
}

/// Platform default store
pub fn default_store() -> Box<dyn HighScoreStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorageStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(FileStore::new(FileStore::DEFAULT_PATH))
    }
}

/// Best score with write-through persistence
pub struct HighScoreKeeper {
    best: u64,
    store: Box<dyn HighScoreStore>,
    /// Cleared after the first storage failure
    persistent: bool,
}

impl HighScoreKeeper {
    /// Read the stored value; failures start the session at 0 in memory only
    pub fn load(store: Box<dyn HighScoreStore>) -> Self {
        match store.load() {
            Ok(value) => {
                let best = value.unwrap_or(0);
                log::info!("Loaded high score {}", best);
                Self {
                    best,
                    store,
                    persistent: true,
                }
            }
            Err(e) => {
                log::warn!("High score unavailable, keeping it in memory: {}", e);
                Self {
                    best: 0,
                    store,
                    persistent: false,
                }
            }
        }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Record a final score; returns true if it beat the best
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if self.persistent {
            match self.store.save(score) {
                Ok(()) => log::info!("High score saved ({})", score),
                Err(e) => {
                    log::warn!("Failed to save high score, keeping it in memory: {}", e);
                    self.persistent = false;
                }
            }
        }
        true
    }
}

impl std::fmt::Debug for HighScoreKeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScoreKeeper")
            .field("best", &self.best)
            .field("persistent", &self.persistent)
            .finish()
    }
}

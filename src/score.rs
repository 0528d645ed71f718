use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::APP_DIR_NAME;

/// Storage key holding the best score.
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

const SCORE_FILE_NAME: &str = "scores.json";

/// Failures of the key-value persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("score store at {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("score store is unavailable")]
    Unavailable,
}

/// Integer key-value storage used for the persisted high score.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError>;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn default_scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// JSON object of integer values on disk, e.g. `{"snakeHighScore": 12}`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, u32>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.read_entries()?.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_owned(), value);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(&entries).map_err(|source| {
            StoreError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

/// Volatile store for tests and for runs without a data directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, u32>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u32>, StoreError> {
        Ok(self.entries.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Tracks the best score and persists it whenever it rises.
///
/// Store failures are logged and otherwise ignored; the in-memory high score
/// stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct ScoreTracker<S> {
    store: S,
    high_score: u32,
}

impl<S: ScoreStore> ScoreTracker<S> {
    /// Reads the persisted high score, falling back to zero.
    pub fn load(store: S) -> Self {
        Self::load_checked(store).0
    }

    /// Like [`ScoreTracker::load`], but also hands back the read error.
    ///
    /// The tracker is usable either way; on error it starts from zero.
    pub fn load_checked(store: S) -> (Self, Result<(), StoreError>) {
        let (high_score, status) = match store.get(HIGH_SCORE_KEY) {
            Ok(value) => (value.unwrap_or(0), Ok(())),
            Err(error) => {
                warn!(%error, "failed to read high score, starting from 0");
                (0, Err(error))
            }
        };

        (Self { store, high_score }, status)
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Returns true when `score` beats the previous high score.
    pub fn record_score(&mut self, score: u32) -> bool {
        if score <= self.high_score {
            return false;
        }

        self.high_score = score;
        match self.store.set(HIGH_SCORE_KEY, score) {
            Ok(()) => debug!(high_score = score, "persisted new high score"),
            Err(error) => warn!(%error, high_score = score, "failed to persist high score"),
        }
        true
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

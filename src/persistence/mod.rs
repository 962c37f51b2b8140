//! High score persistence
//!
//! Stores hold a single scalar under [`HIGH_SCORE_KEY`]. The [`ScoreStore`]
//! contract is best effort: reads of a missing or unreadable value yield 0,
//! and failed writes are logged and otherwise ignored.
//!
//! Backends:
//! - [`MemoryStore`] for tests and embedding
//! - [`JsonFileStore`] on native targets
//! - [`LocalStorageStore`] in the browser (wasm32 only)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "highScore";

/// Opaque key-value store for the best score
pub trait ScoreStore {
    /// Last written value, or 0 when nothing was stored
    fn read_high_score(&self) -> f64;

    /// Overwrite the stored value
    fn write_high_score(&mut self, score: f64);
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn read_high_score(&self) -> f64 {
        (**self).read_high_score()
    }

    fn write_high_score(&mut self, score: f64) {
        (**self).write_high_score(score)
    }
}

/// Failure inside a storage backend (never crosses the [`ScoreStore`] boundary)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("high score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("browser storage is unavailable")]
    Unavailable,
}

/// Volatile store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<f64>,
    writes: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a value
    pub fn with_value(score: f64) -> Self {
        Self {
            value: Some(score),
            writes: 0,
        }
    }

    /// Number of writes performed so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn read_high_score(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }

    fn write_high_score(&mut self, score: f64) {
        self.value = Some(score);
        self.writes += 1;
    }
}

/// On-disk document layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ScoreDocument {
    #[serde(rename = "highScore", default)]
    high_score: f64,
}

/// JSON file store (`{"highScore": 12.3}`)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored value, `Ok(None)` when the file does not exist
    pub fn try_load(&self) -> Result<Option<f64>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc: ScoreDocument = serde_json::from_str(&json)?;
        Ok(Some(doc.high_score))
    }

    /// Write the value, replacing the file atomically (tmp then rename)
    pub fn try_save(&self, score: f64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&ScoreDocument { high_score: score })?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn read_high_score(&self) -> f64 {
        match self.try_load() {
            Ok(Some(score)) => score,
            Ok(None) => 0.0,
            Err(e) => {
                log::warn!("Ignoring high score at {}: {}", self.path.display(), e);
                0.0
            }
        }
    }

    fn write_high_score(&mut self, score: f64) {
        match self.try_save(score) {
            Ok(()) => log::info!("High score saved ({:.1})", score),
            Err(e) => log::warn!("Could not save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Browser `localStorage` store
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn read_high_score(&self) -> f64 {
        let storage = match Self::storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("{}", e);
                return 0.0;
            }
        };
        match storage.get_item(HIGH_SCORE_KEY) {
            Ok(Some(value)) => value.parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn write_high_score(&mut self, score: f64) {
        match Self::storage() {
            Ok(storage) => {
                if storage.set_item(HIGH_SCORE_KEY, &score.to_string()).is_err() {
                    log::warn!("localStorage rejected the high score");
                } else {
                    log::info!("High score saved ({:.1})", score);
                }
            }
            Err(e) => log::warn!("{}", e),
        }
    }
}

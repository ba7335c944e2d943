//! Store - Durable best-score persistence
//!
//! The engine only sees `BestScoreStore`; reads never fail (anything
//! unreadable counts as zero) and writes are best-effort.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::game::error::{GameError, Result};

/// File name used inside the app data directory
pub const BEST_SCORE_FILE: &str = "best_score.json";

/// Get/set access to the persisted best score
pub trait BestScoreStore: Send {
    /// Stored best score, or 0 when nothing usable is stored
    fn load(&self) -> u64;

    fn save(&mut self, best: u64) -> Result<()>;
}

/// Volatile store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new(best: u64) -> Self {
        Self {
            best: Arc::new(AtomicU64::new(best)),
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load(&self) -> u64 {
        self.best.load(Ordering::Relaxed)
    }

    fn save(&mut self, best: u64) -> Result<()> {
        self.best.store(best, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct BestScoreRecord {
    #[serde(rename = "bestScore")]
    best_score: u64,
}

/// Best score kept as `{"bestScore": N}` in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `BEST_SCORE_FILE` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(BEST_SCORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<u64> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| GameError::Io {
            path: self.path.clone(),
            source,
        })?;
        let record: BestScoreRecord = serde_json::from_str(&json)?;
        Ok(record.best_score)
    }
}

impl BestScoreStore for JsonFileStore {
    fn load(&self) -> u64 {
        match self.read() {
            Ok(best) => best,
            Err(GameError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => {
                log::warn!("Treating best score as 0: {}", e);
                0
            }
        }
    }

    fn save(&mut self, best: u64) -> Result<()> {
        let io_err = |source| GameError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string(&BestScoreRecord { best_score: best })?;
        std::fs::write(&self.path, json).map_err(io_err)?;
        log::debug!("Saved best score {} to {}", best, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_value() {
        let store = MemoryStore::new(5);
        let mut writer = store.clone();
        writer.save(9).unwrap();
        assert_eq!(store.load(), 9);
    }

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::in_dir(&dir.path().join("nested"));
        store.save(700).unwrap();

        let reopened = JsonFileStore::in_dir(&dir.path().join("nested"));
        assert_eq!(reopened.load(), 700);

        let raw = std::fs::read_to_string(reopened.path()).unwrap();
        assert_eq!(raw, r#"{"bestScore":700}"#);
    }

    #[test]
    fn malformed_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::in_dir(dir.path());
        for junk in ["", "{", r#"{"bestScore":"lots"}"#, r#"{"bestScore":-3}"#, "null"] {
            std::fs::write(store.path(), junk).unwrap();
            assert_eq!(store.load(), 0, "input {junk:?}");
        }
    }
}

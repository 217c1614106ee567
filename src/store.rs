use std::{fs, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Persistence for the single best-score value.
pub trait ScoreStore {
    fn load_best(&self) -> Result<u32>;
    fn save_best(&mut self, best: u32) -> Result<()>;
}

#[derive(Serialize, Deserialize, Default)]
struct SaveData {
    best_score: u32,
}

/// Keeps the best score in a small JSON file. A missing file reads as 0.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::StoreIo { path: self.path.clone(), source }
    }
}

impl ScoreStore for JsonFileStore {
    fn load_best(&self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let data: SaveData = serde_json::from_str(&text)
            .map_err(|source| Error::StoreFormat { path: self.path.clone(), source })?;
        Ok(data.best_score)
    }

    fn save_best(&mut self, best: u32) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let text = serde_json::to_string_pretty(&SaveData { best_score: best })
            .map_err(|source| Error::StoreFormat { path: self.path.clone(), source })?;
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }
}

/// In-memory store for tests. Counts writes so callers can check that a
/// save actually happened.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub best: u32,
    pub saves: u32,
    pub fail: bool,
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn load_best(&self) -> Result<u32> {
        if self.fail {
            return Err(Error::StoreIo {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "unavailable"),
            });
        }
        Ok(self.best)
    }

    fn save_best(&mut self, best: u32) -> Result<()> {
        self.saves += 1;
        self.best = best;
        Ok(())
    }
}

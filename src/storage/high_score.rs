use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Key the high score is stored under
pub const STORAGE_KEY: &str = "snake_highscore";

/// Key-value store holding the best score across sessions
pub trait HighScoreStore {
    /// Read the stored high score; anything unreadable counts as 0
    fn load(&self) -> u32;

    /// Overwrite the stored high score
    fn save(&mut self, score: u32) -> Result<()>;
}

/// On-disk layout of the high score file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    #[serde(rename = "snake_highscore")]
    high_score: u32,
}

/// High score kept as a small JSON document on disk
///
/// ```json
/// { "snake_highscore": 120 }
/// ```
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_record(&self) -> Result<HighScoreRecord> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score from {:?}", self.path))?;
        let record = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse high score file {:?}", self.path))?;
        Ok(record)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        if !self.path.exists() {
            log::info!("No high score at {:?}, starting fresh", self.path);
            return 0;
        }

        match self.read_record() {
            Ok(record) => {
                log::info!("Loaded high score {}", record.high_score);
                record.high_score
            }
            Err(err) => {
                log::warn!("Ignoring unreadable high score: {:#}", err);
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let record = HighScoreRecord { high_score: score };
        let json = serde_json::to_string(&record).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;

        log::info!("High score {} saved to {:?}", score, self.path);
        Ok(())
    }
}

/// In-process store, forgotten on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    value: u32,
    /// Number of successful writes
    pub writes: usize,
    /// Make every write fail, for exercising the best-effort path
    pub fail_writes: bool,
}

impl MemoryHighScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(value: u32) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("high score store is read-only");
        }
        self.value = score;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_zero() {
        let dir = TempDir::new().unwrap();
        let store = FileHighScoreStore::new(dir.path().join("highscore.json"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("highscore.json");

        let mut store = FileHighScoreStore::new(&path);
        store.save(120).unwrap();

        let reopened = FileHighScoreStore::new(&path);
        assert_eq!(reopened.load(), 120);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains(STORAGE_KEY));
    }

    #[test]
    fn test_corrupt_file_reads_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("highscore.json");
        std::fs::write(&path, "not json").unwrap();

        assert_eq!(FileHighScoreStore::new(&path).load(), 0);
    }

    #[test]
    fn test_save_into_missing_location_fails() {
        let dir = TempDir::new().unwrap();
        // A file standing where the parent directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let mut store = FileHighScoreStore::new(blocker.join("highscore.json"));
        assert!(store.save(10).is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScoreStore::with_score(30);
        assert_eq!(store.load(), 30);

        store.save(50).unwrap();
        assert_eq!(store.load(), 50);
        assert_eq!(store.writes, 1);

        store.fail_writes = true;
        assert!(store.save(70).is_err());
        assert_eq!(store.load(), 50);
    }
}

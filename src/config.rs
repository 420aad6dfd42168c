use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::Result;

pub const DEFAULT_WPM_GOAL: u32 = 40;

fn default_wpm_goal() -> u32 {
    DEFAULT_WPM_GOAL
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_wpm_goal")]
    pub wpm_goal: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wpm_goal: DEFAULT_WPM_GOAL,
        }
    }
}

/// Where the WPM goal lives between runs.
pub trait GoalStore {
    /// Stored goal, or [`DEFAULT_WPM_GOAL`] when unset or unreadable.
    fn load_goal(&self) -> u32;
    fn save_goal(&self, goal: u32) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileGoalStore {
    path: PathBuf,
}

impl FileGoalStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|err| {
                tracing::warn!(path = %self.path.display(), %err, "ignoring malformed config");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    pub fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl Default for FileGoalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalStore for FileGoalStore {
    fn load_goal(&self) -> u32 {
        self.load().wpm_goal
    }

    fn save_goal(&self, goal: u32) -> Result<()> {
        let mut cfg = self.load();
        cfg.wpm_goal = goal;
        self.save(&cfg)
    }
}

/// Goal store that never touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryGoalStore {
    goal: Cell<Option<u32>>,
}

impl GoalStore for MemoryGoalStore {
    fn load_goal(&self) -> u32 {
        self.goal.get().unwrap_or(DEFAULT_WPM_GOAL)
    }

    fn save_goal(&self, goal: u32) -> Result<()> {
        self.goal.set(Some(goal));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_default_goal() {
        let dir = tempdir().unwrap();
        let store = FileGoalStore::with_path(dir.path().join("config.json"));
        assert_eq!(store.load_goal(), DEFAULT_WPM_GOAL);
    }

    #[test]
    fn save_and_load_goal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileGoalStore::with_path(&path);
        store.save_goal(75).unwrap();
        assert!(path.exists());
        assert_eq!(store.load_goal(), 75);
        assert_eq!(FileGoalStore::with_path(&path).load(), Config { wpm_goal: 75 });
    }

    #[test]
    fn malformed_file_yields_default_goal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"not json").unwrap();
        assert_eq!(FileGoalStore::with_path(&path).load_goal(), DEFAULT_WPM_GOAL);
    }

    #[test]
    fn missing_field_uses_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{}").unwrap();
        assert_eq!(FileGoalStore::with_path(&path).load_goal(), DEFAULT_WPM_GOAL);
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryGoalStore::default();
        assert_eq!(store.load_goal(), DEFAULT_WPM_GOAL);
        store.save_goal(0).unwrap();
        assert_eq!(store.load_goal(), 0);
    }
}

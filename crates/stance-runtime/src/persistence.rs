//! Stats stores - where the cumulative statistics live between runs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use stance_core::{StanceError, StanceResult};
use stance_posture::StatsSnapshot;

use crate::StatsStore;

/// In-process store, mostly for tests and short-lived runs
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    slot: Mutex<Option<StatsSnapshot>>,
    saves: Mutex<u64>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a snapshot
    pub fn seeded(snapshot: StatsSnapshot) -> Self {
        MemoryStatsStore {
            slot: Mutex::new(Some(snapshot)),
            saves: Mutex::new(0),
        }
    }

    pub fn current(&self) -> Option<StatsSnapshot> {
        self.slot.lock().clone()
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> u64 {
        *self.saves.lock()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> StanceResult<Option<StatsSnapshot>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, snapshot: &StatsSnapshot) -> StanceResult<()> {
        *self.slot.lock() = Some(snapshot.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}

/// One pretty-printed JSON document on disk.
///
/// A missing file loads as `None`; an unreadable or malformed one is an error.
#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    path: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStatsStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStatsStore {
    fn load(&self) -> StanceResult<Option<StatsSnapshot>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(persistence_error(&self.path, err)),
        };

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| persistence_error(&self.path, err))
    }

    fn save(&self, snapshot: &StatsSnapshot) -> StanceResult<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| persistence_error(&self.path, err))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| persistence_error(&self.path, err))?;
        }

        fs::write(&self.path, json).map_err(|err| persistence_error(&self.path, err))
    }
}

fn persistence_error(path: &Path, err: impl std::fmt::Display) -> StanceError {
    StanceError::Persistence(format!("{}: {}", path.display(), err))
}

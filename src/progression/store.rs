//! Where player progress lives between runs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

use super::types::PlayerProgress;
use crate::core::constants::PROGRESS_FILE_EXTENSION;
use crate::core::{EngineError, Result};
use crate::utils::persistence::{data_dir, load_json, save_json};

/// Load/save boundary for player progress documents.
pub trait ProgressStore {
    /// Returns `None` for a player with no saved progress.
    fn load(&self, player_id: &str) -> Result<Option<PlayerProgress>>;

    /// Stamps `last_saved` and writes the record.
    fn save(&mut self, progress: &mut PlayerProgress) -> Result<()>;
}

/// One pretty-printed JSON file per player.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the configured data directory.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a player's progress file.
    pub fn path_for(&self, player_id: &str) -> Result<PathBuf> {
        let valid = !player_id.is_empty()
            && player_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(EngineError::config(format!(
                "player id {:?} is not usable as a file name",
                player_id
            )));
        }
        Ok(self
            .dir
            .join(format!("{}.{}", player_id, PROGRESS_FILE_EXTENSION)))
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self, player_id: &str) -> Result<Option<PlayerProgress>> {
        let path = self.path_for(player_id)?;
        load_json(&path)
    }

    fn save(&mut self, progress: &mut PlayerProgress) -> Result<()> {
        let path = self.path_for(&progress.player_id)?;
        progress.last_saved = Some(Utc::now());
        save_json(&path, progress)?;
        debug!("Saved progress for {} to {}", progress.player_id, path.display());
        Ok(())
    }
}

/// In-process store for guest play and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, PlayerProgress>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, player_id: &str) -> Result<Option<PlayerProgress>> {
        Ok(self.records.get(player_id).cloned())
    }

    fn save(&mut self, progress: &mut PlayerProgress) -> Result<()> {
        progress.last_saved = Some(Utc::now());
        self.records
            .insert(progress.player_id.clone(), progress.clone());
        Ok(())
    }
}

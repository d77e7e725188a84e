//! Progression records: per-level sub-level completions and jigsaw pieces.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants::FIRST_LEVEL_ID;
use crate::tiers::LevelTier;

/// Progress through one main level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Sub-levels cleared so far. Sub-levels unlock in order, so this is
    /// also the index of the next unplayed one.
    pub completed_sub_levels: usize,
    /// Jigsaw piece ids earned, in the order they were awarded.
    pub owned_pieces: Vec<String>,
    pub is_puzzle_complete: bool,
}

impl LevelProgress {
    pub fn owns_piece(&self, piece: &str) -> bool {
        self.owned_pieces.iter().any(|p| p == piece)
    }
}

/// Everything persisted for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub player_id: String,
    pub username: String,
    /// Highest main level the player may enter.
    pub max_unlocked_level: u32,
    #[serde(default)]
    pub levels: BTreeMap<u32, LevelProgress>,
    /// Set by the store on every save.
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

impl PlayerProgress {
    /// Fresh progress with an empty entry for every tier and only level 1 open.
    pub fn new(player_id: impl Into<String>, username: impl Into<String>, tiers: &[LevelTier]) -> Self {
        let mut progress = Self {
            player_id: player_id.into(),
            username: username.into(),
            max_unlocked_level: FIRST_LEVEL_ID,
            levels: BTreeMap::new(),
            last_saved: None,
        };
        progress.ensure_levels(tiers);
        progress
    }

    /// Adds empty entries for tiers the record does not know yet.
    ///
    /// Loaded records may predate a tier table that grew.
    pub fn ensure_levels(&mut self, tiers: &[LevelTier]) {
        for tier in tiers {
            self.levels.entry(tier.id).or_default();
        }
        if self.max_unlocked_level < FIRST_LEVEL_ID {
            self.max_unlocked_level = FIRST_LEVEL_ID;
        }
    }

    pub fn level(&self, level_id: u32) -> Option<&LevelProgress> {
        self.levels.get(&level_id)
    }
}

/// What a sub-level win earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    pub first_completion: bool,
    /// Newly awarded piece; `None` on replays or once every piece is owned.
    pub piece: Option<String>,
}

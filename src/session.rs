//! Session manager: owns the player's progress, the active sub-level and the
//! events produced when a sub-level ends.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{EngineError, Result};
use crate::minesweeper::{
    self, GameEvent, GameParams, GameSnapshot, HintOutcome, MinesweeperGame, RevealOutcome,
};
use crate::progression::{PlayerProgress, ProgressStore};
use crate::tiers::{find_tier, validate_tiers, LevelTier};

/// Raised when a sub-level ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Won {
        level: u32,
        sub_level: usize,
        first_completion: bool,
        /// Jigsaw piece awarded for this clear, if any.
        piece: Option<String>,
    },
    Lost {
        level: u32,
        sub_level: usize,
    },
}

/// The sub-level currently being played.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub level_id: u32,
    pub sub_level_index: usize,
    pub game: MinesweeperGame,
}

pub struct SessionManager {
    tiers: Vec<LevelTier>,
    progress: PlayerProgress,
    store: Box<dyn ProgressStore>,
    rng: StdRng,
    active: Option<ActiveSession>,
    events: Vec<SessionEvent>,
}

impl SessionManager {
    pub fn new(
        tiers: Vec<LevelTier>,
        mut progress: PlayerProgress,
        store: Box<dyn ProgressStore>,
        rng: StdRng,
    ) -> Result<Self> {
        validate_tiers(&tiers)?;
        progress.ensure_levels(&tiers);
        Ok(Self {
            tiers,
            progress,
            store,
            rng,
            active: None,
            events: Vec::new(),
        })
    }

    /// Loads the player's saved progress from `store`, or starts fresh.
    pub fn for_player(
        tiers: Vec<LevelTier>,
        store: Box<dyn ProgressStore>,
        player_id: &str,
        username: &str,
        rng: StdRng,
    ) -> Result<Self> {
        let progress = match store.load(player_id)? {
            Some(progress) => {
                info!("Loaded progress for {}", player_id);
                progress
            }
            None => {
                info!("No saved progress for {}, starting fresh", player_id);
                PlayerProgress::new(player_id, username, &tiers)
            }
        };
        Self::new(tiers, progress, store, rng)
    }

    pub fn tiers(&self) -> &[LevelTier] {
        &self.tiers
    }

    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Render state of the active sub-level.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.active.as_ref().map(|s| GameSnapshot::from(&s.game))
    }

    /// Starts a fresh attempt at a sub-level, replacing any session in progress.
    pub fn start_sub_level(&mut self, level_id: u32, index: usize) -> Result<&MinesweeperGame> {
        let tier = find_tier(&self.tiers, level_id).ok_or(EngineError::UnknownLevel(level_id))?;
        tier.validate()?;

        if !self.progress.is_level_unlocked(level_id) {
            return Err(EngineError::LevelLocked(level_id));
        }
        if index >= tier.sub_level_count {
            return Err(EngineError::SubLevelOutOfRange {
                level: level_id,
                index,
                count: tier.sub_level_count,
            });
        }
        if !self.progress.can_play_sub_level(tier, index) {
            return Err(EngineError::SubLevelLocked {
                level: level_id,
                index,
                completed: self.progress.completed_sub_levels(level_id),
            });
        }

        let first_completion = self.progress.is_first_completion(level_id, index);
        let game = MinesweeperGame::new(GameParams::for_sub_level(tier, index), first_completion)?;

        if let Some(previous) = &self.active {
            if !previous.game.is_over() {
                info!(
                    "Abandoning level {} sub-level {} in progress",
                    previous.level_id,
                    previous.sub_level_index + 1
                );
            }
        }
        info!(
            "Starting level {} sub-level {} ({} mines, {} errors allowed)",
            level_id,
            index + 1,
            game.board().mine_target(),
            game.errors_allowed()
        );

        let session = self.active.insert(ActiveSession {
            level_id,
            sub_level_index: index,
            game,
        });
        Ok(&session.game)
    }

    pub fn reveal(&mut self, row: usize, col: usize) -> Result<RevealOutcome> {
        let session = self.active.as_mut().ok_or(EngineError::NoActiveSession)?;
        let outcome = minesweeper::reveal(&mut session.game, row, col, &mut self.rng)?;
        if let RevealOutcome::Finished(event) = outcome {
            self.finish(event);
        }
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<bool> {
        let session = self.active.as_mut().ok_or(EngineError::NoActiveSession)?;
        minesweeper::toggle_flag(&mut session.game, row, col)
    }

    pub fn use_hint(&mut self) -> Result<HintOutcome> {
        let session = self.active.as_mut().ok_or(EngineError::NoActiveSession)?;
        Ok(minesweeper::use_hint(&mut session.game))
    }

    /// Drops the active session. Nothing is recorded.
    pub fn abandon(&mut self) -> Option<ActiveSession> {
        self.active.take()
    }

    /// Drains the events raised since the last call.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Records that the level's jigsaw was assembled and saves.
    ///
    /// Fails while any piece of the level is still unowned. Returns whether
    /// the next level was unlocked.
    pub fn complete_puzzle(&mut self, level_id: u32) -> Result<bool> {
        let tier = find_tier(&self.tiers, level_id).ok_or(EngineError::UnknownLevel(level_id))?;
        if !self.progress.is_level_unlocked(level_id) {
            return Err(EngineError::LevelLocked(level_id));
        }
        let unlocked = self.progress.complete_puzzle(tier, self.tiers.len())?;
        self.persist();
        Ok(unlocked)
    }

    fn finish(&mut self, event: GameEvent) {
        let Some(session) = &self.active else {
            return;
        };
        let level = session.level_id;
        let sub_level = session.sub_level_index;

        match event {
            GameEvent::Won { .. } => {
                let Some(tier) = find_tier(&self.tiers, level) else {
                    return;
                };
                let reward = self
                    .progress
                    .record_sub_level_win(tier, sub_level, &mut self.rng);
                self.persist();
                self.events.push(SessionEvent::Won {
                    level,
                    sub_level,
                    first_completion: reward.first_completion,
                    piece: reward.piece,
                });
            }
            GameEvent::Lost => {
                info!("Level {} sub-level {} lost", level, sub_level + 1);
                self.events.push(SessionEvent::Lost { level, sub_level });
            }
        }
    }

    /// Best effort: a failed save is logged and play continues.
    fn persist(&mut self) {
        if let Err(e) = self.store.save(&mut self.progress) {
            warn!(
                "Could not save progress for {}: {}",
                self.progress.player_id, e
            );
        }
    }
}

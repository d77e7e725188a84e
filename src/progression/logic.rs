//! Unlock gating, completion recording and jigsaw piece rewards.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::types::{PlayerProgress, RewardOutcome};
use crate::core::{EngineError, Result};
use crate::tiers::LevelTier;

impl PlayerProgress {
    /// Checks if a main level is open.
    pub fn is_level_unlocked(&self, level_id: u32) -> bool {
        level_id >= 1 && level_id <= self.max_unlocked_level
    }

    /// Sub-levels unlock in order: index `i` is playable once `i` earlier ones are cleared.
    pub fn can_play_sub_level(&self, tier: &LevelTier, index: usize) -> bool {
        if !self.is_level_unlocked(tier.id) || index >= tier.sub_level_count {
            return false;
        }
        index <= self.completed_sub_levels(tier.id)
    }

    /// Whether a win at `index` would be its first clear.
    pub fn is_first_completion(&self, level_id: u32, index: usize) -> bool {
        index >= self.completed_sub_levels(level_id)
    }

    pub fn completed_sub_levels(&self, level_id: u32) -> usize {
        self.levels
            .get(&level_id)
            .map(|l| l.completed_sub_levels)
            .unwrap_or(0)
    }

    /// Records a sub-level win and issues its reward.
    ///
    /// Only a win on the frontier sub-level counts: it advances the completion
    /// count and awards one random unowned jigsaw piece. Replays change nothing.
    pub fn record_sub_level_win<R: Rng>(
        &mut self,
        tier: &LevelTier,
        index: usize,
        rng: &mut R,
    ) -> RewardOutcome {
        let level = self.levels.entry(tier.id).or_default();

        if index != level.completed_sub_levels {
            info!(
                "Replay of level {} sub-level {}: no reward",
                tier.id,
                index + 1
            );
            return RewardOutcome {
                first_completion: false,
                piece: None,
            };
        }

        level.completed_sub_levels += 1;

        let unowned: Vec<String> = tier
            .piece_ids()
            .into_iter()
            .filter(|id| !level.owns_piece(id))
            .collect();
        let piece = unowned.choose(rng).cloned();

        match &piece {
            Some(id) => {
                level.owned_pieces.push(id.clone());
                info!(
                    "Level {} sub-level {} cleared: awarded {}",
                    tier.id,
                    index + 1,
                    id
                );
            }
            None => info!(
                "Level {} sub-level {} cleared: every piece already owned",
                tier.id,
                index + 1
            ),
        }

        RewardOutcome {
            first_completion: true,
            piece,
        }
    }

    /// Marks a level's jigsaw as assembled.
    ///
    /// Every piece must be owned first. Completing the frontier level unlocks
    /// the next one, if any. Returns whether a new level was unlocked.
    pub fn complete_puzzle(&mut self, tier: &LevelTier, tier_count: usize) -> Result<bool> {
        let (owned, total) = self.puzzle_progress(tier);
        if owned < total {
            return Err(EngineError::PuzzleIncomplete {
                level: tier.id,
                owned,
                total,
            });
        }

        self.levels.entry(tier.id).or_default().is_puzzle_complete = true;

        if tier.id == self.max_unlocked_level && (tier.id as usize) < tier_count {
            self.max_unlocked_level += 1;
            info!(
                "Puzzle {} complete: level {} unlocked",
                tier.id, self.max_unlocked_level
            );
            return Ok(true);
        }
        Ok(false)
    }

    /// Owned and total jigsaw pieces for a level.
    pub fn puzzle_progress(&self, tier: &LevelTier) -> (usize, usize) {
        let owned = self
            .levels
            .get(&tier.id)
            .map(|l| l.owned_pieces.len())
            .unwrap_or(0);
        (owned, tier.puzzle_piece_count())
    }
}

//! Level tier records and the built-in tier table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::constants::{FIRST_LEVEL_ID, MAX_GRID_SIZE};
use crate::core::{EngineError, Result};

/// Static configuration for one main level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTier {
    /// Main level id, starting at 1.
    pub id: u32,
    pub name: String,
    /// Side length of the square minesweeper grid.
    pub grid_size: usize,
    /// Mine reveals that end a sub-level in a loss.
    pub max_errors: u32,
    pub sub_level_count: usize,
    /// Mine density of the first sub-level.
    pub density_start: f64,
    /// Mine density of the last sub-level.
    pub density_end: f64,
    /// Hints available per sub-level attempt.
    pub hint_allowance: u32,
    /// Jigsaw dimensions; one piece is awarded per first-time sub-level clear.
    pub puzzle_rows: usize,
    pub puzzle_cols: usize,
}

impl LevelTier {
    pub fn total_cells(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn puzzle_piece_count(&self) -> usize {
        self.puzzle_rows * self.puzzle_cols
    }

    /// All piece ids of this level's jigsaw, row-major.
    pub fn piece_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.puzzle_piece_count());
        for row in 0..self.puzzle_rows {
            for col in 0..self.puzzle_cols {
                ids.push(piece_id(row, col));
            }
        }
        ids
    }

    /// Rejects records that could not produce a playable sub-level.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(EngineError::config(format!(
                "level {}: grid size {} is not within 1..={}",
                self.id, self.grid_size, MAX_GRID_SIZE
            )));
        }
        if self.max_errors == 0 {
            return Err(EngineError::config(format!(
                "level {}: error tolerance must be positive",
                self.id
            )));
        }
        if self.sub_level_count == 0 {
            return Err(EngineError::config(format!(
                "level {}: needs at least one sub-level",
                self.id
            )));
        }
        for (label, density) in [
            ("start", self.density_start),
            ("end", self.density_end),
        ] {
            if !density.is_finite() || !(0.0..=1.0).contains(&density) {
                return Err(EngineError::config(format!(
                    "level {}: {} density {} is not within [0, 1]",
                    self.id, label, density
                )));
            }
        }
        if self.puzzle_rows > MAX_GRID_SIZE || self.puzzle_cols > MAX_GRID_SIZE {
            return Err(EngineError::config(format!(
                "level {}: puzzle sides are limited to {}",
                self.id, MAX_GRID_SIZE
            )));
        }
        if self.puzzle_piece_count() == 0 {
            return Err(EngineError::config(format!(
                "level {}: puzzle needs at least one piece",
                self.id
            )));
        }
        Ok(())
    }
}

/// Piece id for the jigsaw slot at (row, col).
pub fn piece_id(row: usize, col: usize) -> String {
    format!("piece_r{}c{}", row, col)
}

/// Validates a whole tier table: every record, plus ids numbered 1..=n in order.
pub fn validate_tiers(tiers: &[LevelTier]) -> Result<()> {
    if tiers.is_empty() {
        return Err(EngineError::config("tier table is empty"));
    }
    for (position, tier) in tiers.iter().enumerate() {
        tier.validate()?;
        let expected = FIRST_LEVEL_ID + position as u32;
        if tier.id != expected {
            return Err(EngineError::config(format!(
                "tier ids must run 1..={} in order, found {} at position {}",
                tiers.len(),
                tier.id,
                position
            )));
        }
    }
    Ok(())
}

/// Looks up a tier by level id.
pub fn find_tier(tiers: &[LevelTier], id: u32) -> Option<&LevelTier> {
    tiers.iter().find(|t| t.id == id)
}

/// Loads and validates a JSON array of tier records.
pub fn load_tiers(path: &Path) -> Result<Vec<LevelTier>> {
    let json = fs::read_to_string(path)?;
    let tiers: Vec<LevelTier> = serde_json::from_str(&json)?;
    validate_tiers(&tiers)?;
    info!("Loaded {} level tiers from {}", tiers.len(), path.display());
    Ok(tiers)
}

/// The three main levels shipped with the game.
pub fn default_tiers() -> Vec<LevelTier> {
    vec![
        LevelTier {
            id: 1,
            name: "Level One".to_string(),
            grid_size: 10,
            max_errors: 3,
            sub_level_count: 9,
            density_start: 0.08,
            density_end: 0.13,
            hint_allowance: 3,
            puzzle_rows: 3,
            puzzle_cols: 3,
        },
        LevelTier {
            id: 2,
            name: "Level Two".to_string(),
            grid_size: 15,
            max_errors: 4,
            sub_level_count: 16,
            density_start: 0.12,
            density_end: 0.16,
            hint_allowance: 4,
            puzzle_rows: 4,
            puzzle_cols: 4,
        },
        LevelTier {
            id: 3,
            name: "Level Three".to_string(),
            grid_size: 20,
            max_errors: 5,
            sub_level_count: 25,
            density_start: 0.15,
            density_end: 0.18,
            hint_allowance: 5,
            puzzle_rows: 5,
            puzzle_cols: 5,
        },
    ]
}

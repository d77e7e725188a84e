//! Main-level tiers and the sub-level difficulty curve.
//!
//! Each main level owns a fixed grid size and error tolerance; its sub-levels
//! get denser as the player advances through them.

mod data;
pub mod difficulty;

pub use data::{default_tiers, find_tier, load_tiers, piece_id, validate_tiers, LevelTier};
pub use difficulty::{density_for, mine_count};

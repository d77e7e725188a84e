//! Player progression: sequential sub-level unlocks, jigsaw piece rewards
//! and persistence of the resulting record.

mod logic;
pub mod store;
mod types;

pub use store::{JsonFileStore, MemoryStore, ProgressStore};
pub use types::{LevelProgress, PlayerProgress, RewardOutcome};

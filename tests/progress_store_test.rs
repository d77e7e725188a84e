//! Integration test: persisting progress through the store boundary
//!
//! Covers the JSON file store, reloading a player through the session
//! manager, and best-effort saves that must not disturb game state.

use std::env;
use std::fs;
use std::path::PathBuf;

use jigsweeper::minesweeper::GameStatus;
use jigsweeper::progression::{JsonFileStore, PlayerProgress, ProgressStore};
use jigsweeper::tiers::default_tiers;
use jigsweeper::{EngineError, Result, SessionEvent, SessionManager};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("jigsweeper-store-{}-{}", name, std::process::id()));
    fs::remove_dir_all(&dir).ok();
    dir
}

/// A store whose disk is always full.
struct FailingStore;

impl ProgressStore for FailingStore {
    fn load(&self, _player_id: &str) -> Result<Option<PlayerProgress>> {
        Ok(None)
    }

    fn save(&mut self, _progress: &mut PlayerProgress) -> Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
    }
}

#[test]
fn test_json_store_roundtrip() {
    let dir = scratch_dir("roundtrip");
    let mut store = JsonFileStore::new(&dir);
    let mut progress = PlayerProgress::new("ada", "Ada", &default_tiers());
    progress.levels.get_mut(&1).unwrap().completed_sub_levels = 2;
    progress
        .levels
        .get_mut(&1)
        .unwrap()
        .owned_pieces
        .push("piece_r0c1".to_string());

    assert!(store.load("ada").unwrap().is_none());
    store.save(&mut progress).unwrap();

    assert!(dir.join("ada.json").exists());
    let loaded = store.load("ada").unwrap().unwrap();
    assert_eq!(loaded, progress);
    assert!(loaded.last_saved.is_some());

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = scratch_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ada.json"), "not json").unwrap();

    let store = JsonFileStore::new(&dir);
    assert!(matches!(store.load("ada"), Err(EngineError::Json(_))));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_progress_survives_reload() {
    let dir = scratch_dir("reload");
    let tiers = default_tiers();

    // A player who has already collected every level-one piece
    let mut saved = PlayerProgress::new("ada", "Ada", &tiers);
    let level_one = saved.levels.get_mut(&1).unwrap();
    level_one.completed_sub_levels = tiers[0].sub_level_count;
    level_one.owned_pieces = tiers[0].piece_ids();
    JsonFileStore::new(&dir).save(&mut saved).unwrap();

    let mut manager = SessionManager::for_player(
        tiers.clone(),
        Box::new(JsonFileStore::new(&dir)),
        "ada",
        "Ada",
        StdRng::seed_from_u64(8),
    )
    .unwrap();
    assert!(manager.complete_puzzle(1).unwrap());

    let reloaded = SessionManager::for_player(
        tiers,
        Box::new(JsonFileStore::new(&dir)),
        "ada",
        "Someone Else",
        StdRng::seed_from_u64(8),
    )
    .unwrap();

    assert_eq!(reloaded.progress().username, "Ada");
    assert_eq!(reloaded.progress().max_unlocked_level, 2);
    let level_one = reloaded.progress().level(1).unwrap();
    assert!(level_one.is_puzzle_complete);
    assert_eq!(level_one.owned_pieces.len(), 9);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_failed_save_keeps_in_memory_progress() {
    let tiers = default_tiers();
    let progress = PlayerProgress::new("ada", "Ada", &tiers);
    let mut manager = SessionManager::new(
        tiers,
        progress,
        Box::new(FailingStore),
        StdRng::seed_from_u64(21),
    )
    .unwrap();
    manager.start_sub_level(1, 0).unwrap();

    manager.reveal(5, 5).unwrap();
    let safe: Vec<(usize, usize)> = manager
        .active()
        .unwrap()
        .game
        .board()
        .cells()
        .filter(|c| !c.is_mine())
        .map(|c| (c.row(), c.col()))
        .collect();
    for (row, col) in safe {
        manager.reveal(row, col).unwrap();
    }

    assert_eq!(manager.active().unwrap().game.status(), GameStatus::Won);
    assert!(matches!(
        manager.take_events().as_slice(),
        [SessionEvent::Won {
            first_completion: true,
            ..
        }]
    ));
    assert_eq!(manager.progress().completed_sub_levels(1), 1);
    assert!(manager.progress().last_saved.is_none());
}

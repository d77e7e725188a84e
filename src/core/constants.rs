// Board generation
/// Largest accepted grid side length.
pub const MAX_GRID_SIZE: usize = 100;
/// Cells reserved around the first click (the clicked cell plus its 8 neighbors).
pub const SAFE_ZONE_CELLS: usize = 9;
/// Random placement tries per grid cell before settling for fewer mines.
pub const PLACEMENT_ATTEMPTS_PER_CELL: usize = 2;
/// Lower bound on the mine count of any generated sub-level.
pub const MIN_MINES: usize = 1;

// Progression
/// Main levels are numbered from 1; level 1 is always unlocked.
pub const FIRST_LEVEL_ID: u32 = 1;
pub const GUEST_USERNAME: &str = "Guest";

// Persistence
pub const DATA_DIR_NAME: &str = ".jigsweeper";
pub const PROGRESS_FILE_EXTENSION: &str = "json";

// Environment overrides
pub const ENV_DATA_DIR: &str = "JIGSWEEPER_DATA_DIR";
pub const ENV_TIERS_FILE: &str = "JIGSWEEPER_TIERS";
pub const ENV_SEED: &str = "JIGSWEEPER_SEED";

//! Difficulty curve: mine density interpolated across a tier's sub-levels.

use super::data::LevelTier;
use crate::core::constants::{MIN_MINES, SAFE_ZONE_CELLS};

/// Mine density for a sub-level, linear from `density_start` to `density_end`.
///
/// Indices past the last sub-level use the last sub-level's density.
pub fn density_for(tier: &LevelTier, sub_level_index: usize) -> f64 {
    if tier.sub_level_count <= 1 {
        return tier.density_start;
    }
    let last = tier.sub_level_count - 1;
    let index = sub_level_index.min(last);
    let progress = index as f64 / last as f64;
    tier.density_start + (tier.density_end - tier.density_start) * progress
}

/// Number of mines to place for a sub-level.
///
/// Clamped to `[1, cells - 9]` so a full 3x3 safety zone always fits; boards
/// too small for that still get a single mine.
pub fn mine_count(tier: &LevelTier, sub_level_index: usize) -> usize {
    let total = tier.total_cells();
    let raw = (total as f64 * density_for(tier, sub_level_index)).floor() as usize;
    raw.min(total.saturating_sub(SAFE_ZONE_CELLS)).max(MIN_MINES)
}

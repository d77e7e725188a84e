//! Board generation: empty grids, deferred mine placement, adjacency counts.

use rand::Rng;
use tracing::{debug, info, warn};

use super::types::{Board, Cell};
use crate::core::constants::{MAX_GRID_SIZE, PLACEMENT_ATTEMPTS_PER_CELL, SAFE_ZONE_CELLS};
use crate::core::{EngineError, Result};

/// Get valid neighbor coordinates for a cell.
///
/// Returns (row, col) tuples for all in-bounds neighbors (up to 8 directions).
pub fn get_neighbors(row: usize, col: usize, size: usize) -> Vec<(usize, usize)> {
    let mut neighbors = Vec::with_capacity(8);

    for d_row in -1i64..=1 {
        for d_col in -1i64..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }

            let new_row = row as i64 + d_row;
            let new_col = col as i64 + d_col;

            if new_row >= 0 && new_row < size as i64 && new_col >= 0 && new_col < size as i64 {
                neighbors.push((new_row as usize, new_col as usize));
            }
        }
    }

    neighbors
}

fn empty_cells(size: usize) -> Vec<Cell> {
    let mut cells = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            cells.push(Cell {
                row,
                col,
                ..Cell::default()
            });
        }
    }
    cells
}

/// Allocates a `size` x `size` board with no mines yet.
pub fn create_board(size: usize, mine_target: usize) -> Result<Board> {
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(EngineError::config(format!(
            "grid size {} is not within 1..={}",
            size, MAX_GRID_SIZE
        )));
    }
    if mine_target == 0 {
        return Err(EngineError::config("mine count must be positive"));
    }
    let total = size * size;
    if mine_target >= total {
        return Err(EngineError::config(format!(
            "{} mines do not fit on a {}x{} board",
            mine_target, size, size
        )));
    }
    if total >= SAFE_ZONE_CELLS && mine_target > total - SAFE_ZONE_CELLS {
        warn!(
            "{} mines on a {}x{} board leave less than a full safety zone; placement may fall short",
            mine_target, size, size
        );
    }

    info!(
        "Creating {}x{} board with {} target mines",
        size, size, mine_target
    );

    Ok(Board {
        size,
        cells: empty_cells(size),
        mine_target,
        mine_actual: mine_target,
        mines_placed: false,
    })
}

/// Builds a board with mines at fixed positions and adjacency already computed.
pub fn board_from_layout(size: usize, mines: &[(usize, usize)]) -> Result<Board> {
    if size == 0 || size > MAX_GRID_SIZE {
        return Err(EngineError::config(format!(
            "grid size {} is not within 1..={}",
            size, MAX_GRID_SIZE
        )));
    }
    let mut board = Board {
        size,
        cells: empty_cells(size),
        mine_target: 0,
        mine_actual: 0,
        mines_placed: true,
    };
    for &(row, col) in mines {
        let index = board.index_of(row, col)?;
        if !board.cells[index].is_mine {
            board.cells[index].is_mine = true;
            board.mine_actual += 1;
        }
    }
    if board.mine_actual == 0 || board.mine_actual >= board.total_cells() {
        return Err(EngineError::config(format!(
            "layout needs between 1 and {} mines, got {}",
            board.total_cells() - 1,
            board.mine_actual
        )));
    }
    board.mine_target = board.mine_actual;
    calculate_adjacent_counts(&mut board);
    Ok(board)
}

/// Scatter mines outside the 3x3 zone around the first click.
///
/// Tries random cells up to `2 * size * size` times. If the budget runs out the
/// board keeps the mines placed so far and `mine_actual` is lowered to match.
/// Does nothing if mines were already placed. Returns the number of mines on
/// the board, or a bounds error if the safe cell is off the grid.
pub fn place_mines<R: Rng>(
    board: &mut Board,
    safe_row: usize,
    safe_col: usize,
    rng: &mut R,
) -> Result<usize> {
    let safe_index = board.index_of(safe_row, safe_col)?;
    if board.mines_placed {
        return Ok(board.mine_actual);
    }

    let size = board.size;
    let mut forbidden = vec![false; board.total_cells()];
    forbidden[safe_index] = true;
    for n in board.neighbor_indices(safe_index) {
        forbidden[n] = true;
    }

    let budget = PLACEMENT_ATTEMPTS_PER_CELL * board.total_cells();
    let mut placed = 0;
    let mut attempts = 0;
    while placed < board.mine_target && attempts < budget {
        let row = rng.gen_range(0..size);
        let col = rng.gen_range(0..size);
        let index = row * size + col;
        if !board.cells[index].is_mine && !forbidden[index] {
            board.cells[index].is_mine = true;
            placed += 1;
        }
        attempts += 1;
    }

    if placed < board.mine_target {
        warn!(
            "Placed only {} of {} mines after {} attempts",
            placed, board.mine_target, attempts
        );
    }
    board.mine_actual = placed;

    calculate_adjacent_counts(board);
    board.mines_placed = true;

    debug!(
        "Mines placed after first click at ({}, {}): {} mines",
        safe_row, safe_col, placed
    );
    Ok(placed)
}

/// Calculate adjacent mine counts for all non-mine cells.
pub fn calculate_adjacent_counts(board: &mut Board) {
    for index in 0..board.total_cells() {
        if board.cells[index].is_mine {
            board.cells[index].adjacent_mines = 0;
            continue;
        }

        let count = board
            .neighbor_indices(index)
            .into_iter()
            .filter(|&n| board.cells[n].is_mine)
            .count();

        board.cells[index].adjacent_mines = count as u8;
    }
}

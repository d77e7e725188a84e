//! Minesweeper data structures.
//!
//! A square grid stored row-major in a flat vector. Mines are not placed until
//! the first reveal so the first click is always safe.

use serde::{Deserialize, Serialize};

use super::hints::HintAllowance;
use crate::core::{EngineError, Result};
use crate::tiers::{mine_count, LevelTier};

/// One grid position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) is_mine: bool,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    /// Number of adjacent mines (0-8). Always 0 on mine cells.
    pub(crate) adjacent_mines: u8,
    /// Set by the loss display pass on flags that covered a safe cell.
    pub(crate) wrong_flag: bool,
}

impl Cell {
    pub fn row(&self) -> usize {
        self.row
    }
    pub fn col(&self) -> usize {
        self.col
    }
    pub fn is_mine(&self) -> bool {
        self.is_mine
    }
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }
    pub fn adjacent_mines(&self) -> u8 {
        self.adjacent_mines
    }
    pub fn is_wrong_flag(&self) -> bool {
        self.wrong_flag
    }
}

/// Square minesweeper grid.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) size: usize,
    pub(crate) cells: Vec<Cell>,
    /// Requested mine count.
    pub(crate) mine_target: usize,
    /// Mines actually placed; below `mine_target` when placement ran out of attempts.
    pub(crate) mine_actual: usize,
    pub(crate) mines_placed: bool,
}

impl Board {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn mine_target(&self) -> usize {
        self.mine_target
    }

    /// Mines on the board. Equals the target until placement has happened.
    pub fn mine_actual(&self) -> usize {
        self.mine_actual
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.size && col < self.size {
            self.cells.get(row * self.size + col)
        } else {
            None
        }
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Flat index for (row, col), or a bounds error.
    pub(crate) fn index_of(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.size && col < self.size {
            Ok(row * self.size + col)
        } else {
            Err(EngineError::OutOfBounds {
                row,
                col,
                size: self.size,
            })
        }
    }

    /// Flat indices of the up-to-8 neighbors of `index`.
    pub(crate) fn neighbor_indices(&self, index: usize) -> Vec<usize> {
        let row = index / self.size;
        let col = index % self.size;
        super::generation::get_neighbors(row, col, self.size)
            .into_iter()
            .map(|(r, c)| r * self.size + c)
            .collect()
    }
}

/// Phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No reveal yet; mines not placed.
    Unstarted,
    InProgress,
    Won,
    Lost,
}

/// Emitted when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Won { first_completion: bool },
    Lost,
}

/// Result of a reveal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing changed: game over, protected cell, or an unsatisfied chord.
    Ignored,
    /// Safe cells opened, including cascade and chord reveals.
    Opened { cells: usize },
    /// At least one mine was revealed but the tolerance still holds.
    MineHit { errors: u32 },
    /// Hint redirect landed on a mine and flagged it.
    HintFlagged,
    /// Hint redirect aimed at an open or flagged cell; the redirect stays armed.
    HintRejected,
    Finished(GameEvent),
}

/// Result of a hint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// A charge was spent; the next reveal is redirected.
    Armed { remaining: u32 },
    /// A redirect is already pending; no charge spent.
    AlreadyArmed,
    Exhausted,
    /// The game is over.
    Unavailable,
}

/// Parameters for one minesweeper session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParams {
    pub grid_size: usize,
    pub mine_target: usize,
    pub max_errors: u32,
    pub hint_allowance: u32,
}

impl GameParams {
    /// Parameters for sub-level `sub_level_index` of `tier`.
    pub fn for_sub_level(tier: &LevelTier, sub_level_index: usize) -> Self {
        Self {
            grid_size: tier.grid_size,
            mine_target: mine_count(tier, sub_level_index),
            max_errors: tier.max_errors,
            hint_allowance: tier.hint_allowance,
        }
    }
}

/// Active minesweeper game session.
#[derive(Debug, Clone)]
pub struct MinesweeperGame {
    pub(crate) board: Board,
    /// Revealed cells, mines included.
    pub(crate) revealed_count: usize,
    pub(crate) revealed_mine_count: usize,
    pub(crate) flagged_count: usize,
    pub(crate) error_count: u32,
    pub(crate) max_errors: u32,
    pub(crate) status: GameStatus,
    pub(crate) hints: HintAllowance,
    /// One-shot redirect for the next reveal.
    pub(crate) hint_armed: bool,
    /// Whether a win here would be the sub-level's first completion.
    pub(crate) first_completion: bool,
}

impl MinesweeperGame {
    /// Creates a session with an empty board. Mines are placed on the first reveal.
    pub fn new(params: GameParams, first_completion: bool) -> Result<Self> {
        if params.max_errors == 0 {
            return Err(EngineError::config("error tolerance must be positive"));
        }
        let board = super::generation::create_board(params.grid_size, params.mine_target)?;
        Ok(Self::with_board(
            board,
            params.max_errors,
            params.hint_allowance,
            first_completion,
        ))
    }

    /// Creates a session over a board whose mines are already laid out.
    pub fn from_layout(
        size: usize,
        mines: &[(usize, usize)],
        max_errors: u32,
        hint_allowance: u32,
    ) -> Result<Self> {
        if max_errors == 0 {
            return Err(EngineError::config("error tolerance must be positive"));
        }
        let board = super::generation::board_from_layout(size, mines)?;
        let mut game = Self::with_board(board, max_errors, hint_allowance, true);
        game.status = GameStatus::InProgress;
        Ok(game)
    }

    fn with_board(board: Board, max_errors: u32, hint_allowance: u32, first_completion: bool) -> Self {
        Self {
            board,
            revealed_count: 0,
            revealed_mine_count: 0,
            flagged_count: 0,
            error_count: 0,
            max_errors,
            status: GameStatus::Unstarted,
            hints: HintAllowance::new(hint_allowance),
            hint_armed: false,
            first_completion,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.board.cell(row, col)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Won | GameStatus::Lost)
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn revealed_mine_count(&self) -> usize {
        self.revealed_mine_count
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_count
    }

    pub fn errors_made(&self) -> u32 {
        self.error_count
    }

    pub fn errors_allowed(&self) -> u32 {
        self.max_errors
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints.remaining()
    }

    pub fn hints_used(&self) -> u32 {
        self.hints.used()
    }

    pub fn hint_armed(&self) -> bool {
        self.hint_armed
    }

    pub fn first_completion(&self) -> bool {
        self.first_completion
    }

    /// Mines minus flags. Negative when the player over-flags.
    pub fn mines_remaining(&self) -> i64 {
        self.board.mine_actual as i64 - self.flagged_count as i64
    }

    /// Safe cells still to open before the board is cleared.
    pub fn safe_cells_remaining(&self) -> usize {
        let safe_total = self.board.total_cells() - self.board.mine_actual;
        safe_total.saturating_sub(self.revealed_count - self.revealed_mine_count)
    }
}

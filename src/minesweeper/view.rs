//! Player-facing board snapshot.
//!
//! Hides mine positions until the game reveals them, so a snapshot can be
//! serialized and handed to any front end.

use serde::{Deserialize, Serialize};

use super::types::{Cell, GameStatus, MinesweeperGame};

/// What the player can see of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CellView {
    Hidden,
    Flagged,
    /// Flag left on a safe cell, shown after a loss.
    WrongFlag,
    Revealed { adjacent: u8 },
    Mine,
    /// Mine that carries a flag once revealed.
    FlaggedMine,
}

impl From<&Cell> for CellView {
    fn from(value: &Cell) -> Self {
        match (value.revealed, value.flagged, value.is_mine) {
            (false, true, _) => Self::Flagged,
            (false, false, _) => Self::Hidden,
            (true, _, _) if value.wrong_flag => Self::WrongFlag,
            (true, true, true) => Self::FlaggedMine,
            (true, _, true) => Self::Mine,
            (true, _, false) => Self::Revealed {
                adjacent: value.adjacent_mines,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub size: usize,
    pub status: GameStatus,
    pub mines_remaining: i64,
    pub errors_made: u32,
    pub errors_allowed: u32,
    pub hints_remaining: u32,
    pub hint_armed: bool,
    /// Rows of cells, top to bottom.
    pub cells: Vec<Vec<CellView>>,
}

impl From<&MinesweeperGame> for GameSnapshot {
    fn from(game: &MinesweeperGame) -> Self {
        let size = game.size();
        let cells = game
            .board
            .cells
            .chunks(size)
            .map(|row| row.iter().map(CellView::from).collect())
            .collect();

        Self {
            size,
            status: game.status(),
            mines_remaining: game.mines_remaining(),
            errors_made: game.errors_made(),
            errors_allowed: game.errors_allowed(),
            hints_remaining: game.hints_remaining(),
            hint_armed: game.hint_armed(),
            cells,
        }
    }
}

impl GameSnapshot {
    /// Plain-text grid, one row per line.
    ///
    /// `#` hidden, `F` flag, `x` wrong flag, `*` mine, `.` empty, digits for counts.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for row in &self.cells {
            for cell in row {
                let ch = match cell {
                    CellView::Hidden => '#',
                    CellView::Flagged | CellView::FlaggedMine => 'F',
                    CellView::WrongFlag => 'x',
                    CellView::Mine => '*',
                    CellView::Revealed { adjacent: 0 } => '.',
                    CellView::Revealed { adjacent } => (b'0' + adjacent) as char,
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

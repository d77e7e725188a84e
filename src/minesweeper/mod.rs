//! Minesweeper sub-game engine.
//!
//! A session owns one board. The first reveal places the mines outside a 3x3
//! safety zone, a few revealed mines are tolerated before the game is lost,
//! and a limited number of hints can redirect a reveal into a safe action.

pub mod generation;
pub mod hints;
pub mod logic;
mod types;
pub mod view;

pub use logic::{check_win_condition, reveal, reveal_all, toggle_flag, use_hint};
pub use types::{
    Board, Cell, GameEvent, GameParams, GameStatus, HintOutcome, MinesweeperGame, RevealOutcome,
};
pub use view::{CellView, GameSnapshot};

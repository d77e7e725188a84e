//! Jigsweeper - minesweeper sub-levels that earn jigsaw pieces.
//!
//! The library holds the engine, the tier table, player progression and the
//! session manager tying them together. The binary is a thin terminal driver.

pub mod core;
pub mod minesweeper;
pub mod progression;
pub mod session;
pub mod tiers;
pub mod utils;

pub use crate::core::{EngineError, Result};
pub use session::{ActiveSession, SessionEvent, SessionManager};

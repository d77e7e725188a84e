//! Engine-wide constants and the error taxonomy.

pub mod constants;
pub mod error;

pub use error::{EngineError, Result};

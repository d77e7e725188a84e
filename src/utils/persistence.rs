//! JSON persistence helpers for the ~/.jigsweeper/ data directory.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::constants::{DATA_DIR_NAME, ENV_DATA_DIR};
use crate::core::Result;

/// Get the data directory, creating it if needed.
///
/// `JIGSWEEPER_DATA_DIR` overrides the default of `~/.jigsweeper/`.
pub fn data_dir() -> io::Result<PathBuf> {
    let dir = match env::var_os(ENV_DATA_DIR) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home_dir = dirs::home_dir().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not determine home directory",
                )
            })?;
            home_dir.join(DATA_DIR_NAME)
        }
    };
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load a JSON document, returning `None` if the file does not exist.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

/// Save a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

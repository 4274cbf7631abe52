//! Storage layer for tesla-dash.
//!
//! This module handles persistence of the dashboard session (mode flag and
//! API key) and locates the data directory shared with `config.kdl` and the
//! action log.
//!
//! ## Store Backends
//!
//! - **File backend** (default): `state.kdl` under the data directory,
//!   rewritten atomically and kept at 0600 because it holds the API key
//! - **Memory backend**: an in-process map used by tests and `--ephemeral`
//!
//! ## Data Directory
//!
//! `--data-dir` flag > `TDASH_DATA_DIR` env var > `~/.local/share/tesla-dash/`

pub mod backend;
pub mod kdl_file;
pub mod memory;

pub use backend::{BackendType, KeyValueStore, StoreOp};
pub use kdl_file::KdlFileStore;
pub use memory::MemoryStore;

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TDASH_DATA_DIR";

/// Session state file name inside the data directory.
pub const STATE_FILE: &str = "state.kdl";

/// Preferences file name inside the data directory.
pub const CONFIG_FILE: &str = "config.kdl";

/// Action log file name inside the data directory.
pub const ACTION_LOG_FILE: &str = "action.log";

/// Resolve the data directory.
///
/// An explicit path (from `--data-dir` or `TDASH_DATA_DIR`, which clap folds
/// into the same flag) is used literally. Otherwise the platform data
/// directory is used.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("tesla-dash"))
}

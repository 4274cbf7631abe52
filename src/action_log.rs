//! Action logging for tdash commands.
//!
//! Every invocation is appended to `<data-dir>/action.log` as one JSON line.
//! Arguments are sanitized first so API keys never reach the log.

use crate::storage::ACTION_LOG_FILE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Represents a single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// ISO 8601 timestamp when the action occurred
    pub timestamp: DateTime<Utc>,

    /// Command name (e.g., "toggle", "key set", "lock")
    pub command: String,

    /// Command arguments as JSON
    pub args: serde_json::Value,

    /// Session mode the command ended in, when a session was loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Whether the command succeeded
    pub success: bool,

    /// Error message if the command failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Command execution duration in milliseconds
    pub duration_ms: u64,

    /// User who executed the command
    pub user: String,
}

impl ActionLog {
    /// Build an entry stamped now, with sanitized arguments.
    pub fn new(command: &str, args: &serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.to_string(),
            args: sanitize_args(args),
            mode: None,
            success: true,
            error: None,
            duration_ms: 0,
            user: get_current_user(),
        }
    }
}

/// Append an entry to the action log in `data_dir`.
///
/// This function never fails the command: problems are logged as warnings.
pub fn log_action(data_dir: &Path, entry: &ActionLog) {
    let path = data_dir.join(ACTION_LOG_FILE);
    if let Err(e) = write_log_entry(&path, entry) {
        tracing::warn!(path = %path.display(), error = %e, "failed to write action log");
    }
}

/// Write a log entry to the log file.
fn write_log_entry(path: &Path, entry: &ActionLog) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Sanitize arguments to remove sensitive data.
pub fn sanitize_args(args: &serde_json::Value) -> serde_json::Value {
    match args {
        serde_json::Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, value) in map {
                let key_lower = key.to_lowercase();
                if key_lower.contains("password")
                    || key_lower.contains("token")
                    || key_lower.contains("key")
                    || key_lower.contains("secret")
                {
                    sanitized.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    sanitized.insert(key.clone(), sanitize_args(value));
                }
            }
            serde_json::Value::Object(sanitized)
        }
        serde_json::Value::Array(arr) => {
            if arr.len() > 10 {
                serde_json::Value::String(format!("[Array with {} items]", arr.len()))
            } else {
                serde_json::Value::Array(arr.iter().map(sanitize_args).collect())
            }
        }
        serde_json::Value::String(s) if s.chars().count() > 100 => {
            let head: String = s.chars().take(97).collect();
            serde_json::Value::String(format!("{}... ({} chars)", head, s.chars().count()))
        }
        _ => args.clone(),
    }
}

/// Get the current user's username.
fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

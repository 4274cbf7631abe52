//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Per-key get/set with validation (for `tdash config`)

use crate::{Error, Result};
use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Required permissions for config.kdl (Unix: 0644, readable by all).
#[cfg(unix)]
pub const CONFIG_FILE_MODE: u32 = 0o644;

/// Keys accepted by `tdash config get/set`.
pub const CONFIG_KEYS: &[&str] = &["base-url", "timeout-secs", "output-format", "action-log"];

/// Allowed range for `timeout-secs`.
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=300;

/// User preferences stored in config.kdl.
///
/// Holds no secrets; the API key lives in state.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// base-url "http://localhost:8080/api"
/// timeout-secs 10
/// output-format "human"  // or "json"
/// action-log #true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashConfig {
    /// Backend base URL, including the `/api` prefix
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Whether invocations are appended to action.log
    pub action_log: Option<bool>,
}

impl DashConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(timeout) = self.timeout_secs {
            if !TIMEOUT_RANGE.contains(&timeout) {
                return Err(format!("timeout-secs must be 1-300, got {}", timeout));
            }
        }
        if let Some(ref url) = self.base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!(
                    "base-url must start with http:// or https://, got {}",
                    url
                ));
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Invalid values are dropped.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(value) = first_value(doc, "base-url") {
            if let Some(s) = value.as_string() {
                config.base_url = Some(s.to_string());
            }
        }

        if let Some(value) = first_value(doc, "timeout-secs") {
            if let Some(i) = value.as_integer() {
                if let Ok(secs) = u64::try_from(i) {
                    if TIMEOUT_RANGE.contains(&secs) {
                        config.timeout_secs = Some(secs);
                    }
                }
            }
        }

        if let Some(value) = first_value(doc, "output-format") {
            if let Some(s) = value.as_string() {
                config.output_format = OutputFormat::parse(s);
            }
        }

        if let Some(value) = first_value(doc, "action-log") {
            config.action_log = match value {
                KdlValue::Bool(b) => Some(*b),
                KdlValue::String(s) => parse_bool(s),
                _ => None,
            };
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref url) = self.base_url {
            push_node(&mut doc, "base-url", KdlValue::String(url.clone()));
        }
        if let Some(secs) = self.timeout_secs {
            push_node(&mut doc, "timeout-secs", KdlValue::Integer(secs as i128));
        }
        if let Some(ref format) = self.output_format {
            push_node(
                &mut doc,
                "output-format",
                KdlValue::String(format.as_str().to_string()),
            );
        }
        if let Some(enabled) = self.action_log {
            push_node(&mut doc, "action-log", KdlValue::Bool(enabled));
        }

        doc.autoformat();
        doc
    }

    /// Load from `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        let doc: KdlDocument = content.parse()?;
        Ok(Self::from_kdl(&doc))
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_kdl().to_string())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(CONFIG_FILE_MODE))?;
        }
        Ok(())
    }

    /// Read one key as a display string.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(match key {
            "base-url" => self.base_url.clone(),
            "timeout-secs" => self.timeout_secs.map(|s| s.to_string()),
            "output-format" => self.output_format.as_ref().map(|f| f.to_string()),
            "action-log" => self.action_log.map(|b| b.to_string()),
            _ => return Err(unknown_key(key)),
        })
    }

    /// Set one key from its string form, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "base-url" => updated.base_url = Some(value.trim_end_matches('/').to_string()),
            "timeout-secs" => {
                let secs = value.parse::<u64>().map_err(|_| {
                    Error::InvalidInput(format!("timeout-secs must be a number, got {}", value))
                })?;
                updated.timeout_secs = Some(secs);
            }
            "output-format" => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    Error::InvalidInput(format!(
                        "output-format must be json or human, got {}",
                        value
                    ))
                })?;
                updated.output_format = Some(format);
            }
            "action-log" => {
                let enabled = parse_bool(value).ok_or_else(|| {
                    Error::InvalidInput(format!("action-log must be true or false, got {}", value))
                })?;
                updated.action_log = Some(enabled);
            }
            _ => return Err(unknown_key(key)),
        }
        updated.validate().map_err(Error::InvalidInput)?;
        *self = updated;
        Ok(())
    }
}

fn unknown_key(key: &str) -> Error {
    Error::InvalidInput(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn first_value<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a KdlValue> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .map(|entry| entry.value())
}

fn push_node(doc: &mut KdlDocument, name: &str, value: KdlValue) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}

/// Parse a boolean the way config values are written by hand.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment (`TDASH_BASE_URL`, base URL only)
//! 3. config.kdl in the data directory
//! 4. Built-in defaults

use crate::Result;
use crate::api::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::config::{DashConfig, OutputFormat};
use crate::storage::CONFIG_FILE;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_ENV: &str = "TDASH_BASE_URL";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: Resolved<String>,
    pub timeout: Resolved<Duration>,
    pub output_format: Resolved<OutputFormat>,
    pub action_log: Resolved<bool>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            base_url: Resolved::new(DEFAULT_BASE_URL.to_string(), ValueSource::Default),
            timeout: Resolved::new(DEFAULT_TIMEOUT, ValueSource::Default),
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            action_log: Resolved::new(true, ValueSource::Default),
        }
    }
}

impl ResolvedConfig {
    pub fn base_url(&self) -> &str {
        &self.base_url.value
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.value
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn human(&self) -> bool {
        self.output_format.value == OutputFormat::Human
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Base URL override from `--base-url`
    pub base_url: Option<String>,
    /// Output format override from `-H`
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base URL override.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set output format override.
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Resolve configuration from `<data_dir>/config.kdl`, the environment and `overrides`.
pub fn resolve_config(data_dir: &Path, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let file_config = DashConfig::load(&data_dir.join(CONFIG_FILE))?;
    let env_base_url = std::env::var(BASE_URL_ENV).ok();
    Ok(resolve_from(&file_config, env_base_url, overrides))
}

/// Resolve from already-loaded inputs.
pub fn resolve_from(
    file_config: &DashConfig,
    env_base_url: Option<String>,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    // Resolve base_url
    if let Some(ref url) = overrides.base_url {
        result.base_url = Resolved::new(url.clone(), ValueSource::CliFlag);
    } else if let Some(url) = env_base_url.filter(|u| !u.trim().is_empty()) {
        result.base_url = Resolved::new(url, ValueSource::EnvVar(BASE_URL_ENV.to_string()));
    } else if let Some(ref url) = file_config.base_url {
        result.base_url = Resolved::new(url.clone(), ValueSource::ConfigFile);
    }

    // Resolve timeout
    if let Some(secs) = file_config.timeout_secs {
        result.timeout = Resolved::new(Duration::from_secs(secs), ValueSource::ConfigFile);
    }

    // Resolve output_format
    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = file_config.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::ConfigFile);
    }

    // Resolve action_log
    if let Some(enabled) = file_config.action_log {
        result.action_log = Resolved::new(enabled, ValueSource::ConfigFile);
    }

    result
}

//! Configuration for tesla-dash.
//!
//! ## config.kdl - User preferences (no secrets)
//!
//! Located at `<data-dir>/config.kdl`. Contains:
//! - `base-url` - Backend base URL, including the `/api` prefix
//! - `timeout-secs` - HTTP request timeout (1-300)
//! - `output-format` - "json" or "human"
//! - `action-log` - Whether invocations are recorded in action.log
//!
//! The session itself (mode flag and API key) is not configuration: it
//! lives in state.kdl and is owned by [`crate::session`].
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    BASE_URL_ENV, ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config,
    resolve_from,
};
#[cfg(unix)]
pub use schema::CONFIG_FILE_MODE;
pub use schema::{CONFIG_KEYS, DashConfig, OutputFormat};

//! tesla-dash - A vehicle dashboard library for the `tdash` CLI.
//!
//! This library provides the session state controller that decides between
//! Developer Mode (mocked backend) and Real-API Mode (API-key protected
//! backend), the persistent store it writes through, and the HTTP
//! collaborators that fetch telemetry and send lock/unlock commands.

pub mod action_log;
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod session;
pub mod storage;


/// Library-level error type for tesla-dash operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("KDL error: {0}")]
    Kdl(#[from] kdl::KdlError),

    /// The durable session store could not be read or written.
    #[error("Persistent store unavailable: {0}")]
    PersistStoreUnavailable(String),

    #[error("API key must not be empty")]
    EmptyCredential,

    #[error("API Key required for this operation.")]
    CredentialRequired,

    /// The session changed while a request was in flight.
    #[error("Session changed while the request was in flight; result discarded")]
    StaleSession,

    #[error(transparent)]
    Api(#[from] api::ApiError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for tesla-dash operations.
pub type Result<T> = std::result::Result<T, Error>;

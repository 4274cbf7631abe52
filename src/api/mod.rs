//! HTTP collaborators for the dashboard backend.
//!
//! This module provides the telemetry source and the command sink. Both
//! take a [`SessionSnapshot`] and derive everything session-specific from
//! it:
//!
//! | Operation       | Developer       | Real        |
//! |-----------------|-----------------|-------------|
//! | fetch telemetry | `GET /dev/stats`  | `GET /stats`  |
//! | fetch camera    | `GET /dev/camera` | `GET /camera` |
//! | lock            | `POST /dev/lock`  | `POST /lock`  |
//! | unlock          | `POST /dev/unlock`| `POST /unlock`|
//!
//! In Real mode with an API key the request carries `X-API-KEY`.

pub mod models;

pub use models::{CameraFeed, CommandAck, VehicleStats};

use crate::session::{Mode, SessionSnapshot};
use models::ErrorBody;
use std::time::Duration;
use thiserror::Error;

/// Default backend base URL: the backend's listen address plus its `/api` prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key in Real mode.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// User-Agent header sent with every request
const USER_AGENT: &str = concat!("tesla-dash/", env!("CARGO_PKG_VERSION"));

/// Message used when an error response has no parseable body.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Errors that can occur talking to the dashboard backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response; `message` comes from the response body when possible
    #[error("{message}")]
    Status { code: u16, message: String },

    /// Network or other transport error
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Failed to parse a successful response
    #[error("Failed to parse backend response: {0}")]
    Parse(String),
}

/// Backend endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Stats,
    Camera,
    Lock,
    Unlock,
}

impl Endpoint {
    /// Path relative to the base URL for the given mode.
    pub fn path(&self, mode: Mode) -> &'static str {
        match (self, mode) {
            (Endpoint::Stats, Mode::Developer) => "/dev/stats",
            (Endpoint::Stats, Mode::Real) => "/stats",
            (Endpoint::Camera, Mode::Developer) => "/dev/camera",
            (Endpoint::Camera, Mode::Real) => "/camera",
            (Endpoint::Lock, Mode::Developer) => "/dev/lock",
            (Endpoint::Lock, Mode::Real) => "/lock",
            (Endpoint::Unlock, Mode::Developer) => "/dev/unlock",
            (Endpoint::Unlock, Mode::Real) => "/unlock",
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &'static str {
        match self {
            Endpoint::Stats | Endpoint::Camera => "GET",
            Endpoint::Lock | Endpoint::Unlock => "POST",
        }
    }
}

/// Actuation commands accepted by the command sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleCommand {
    Lock,
    Unlock,
}

impl VehicleCommand {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            VehicleCommand::Lock => Endpoint::Lock,
            VehicleCommand::Unlock => Endpoint::Unlock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCommand::Lock => "lock",
            VehicleCommand::Unlock => "unlock",
        }
    }

    /// User-facing result text for an acknowledgement.
    ///
    /// The backend's `message` wins; otherwise `success` selects between the
    /// confirmed and the merely-sent wording.
    pub fn describe(&self, ack: Option<&CommandAck>) -> String {
        if let Some(message) = ack.and_then(|a| a.message.as_deref()).filter(|m| !m.is_empty())
        {
            return message.to_string();
        }
        let success = ack.and_then(|a| a.success).unwrap_or(false);
        match (self, success) {
            (VehicleCommand::Lock, true) => "Vehicle locked successfully.",
            (VehicleCommand::Lock, false) => "Lock command sent.",
            (VehicleCommand::Unlock, true) => "Vehicle unlocked successfully.",
            (VehicleCommand::Unlock, false) => "Unlock command sent.",
        }
        .to_string()
    }
}

impl std::fmt::Display for VehicleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source of telemetry snapshots and camera frames.
pub trait TelemetrySource {
    /// Fetch the raw telemetry body. `None` means the backend answered with no content.
    fn fetch_stats(&self, session: &SessionSnapshot)
    -> Result<Option<serde_json::Value>, ApiError>;

    /// Fetch the camera feed location.
    fn fetch_camera(&self, session: &SessionSnapshot) -> Result<Option<CameraFeed>, ApiError>;
}

/// Sink for lock/unlock commands.
pub trait CommandSink {
    fn send(
        &self,
        command: VehicleCommand,
        session: &SessionSnapshot,
    ) -> Result<Option<CommandAck>, ApiError>;
}

/// Blocking HTTP client for the dashboard backend.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of `endpoint` in `mode`.
    pub fn url(&self, endpoint: Endpoint, mode: Mode) -> String {
        format!("{}{}", self.base_url, endpoint.path(mode))
    }

    /// Issue a request for `endpoint` under `session`.
    ///
    /// Returns `Ok(None)` for 204 responses and empty bodies.
    pub fn request(
        &self,
        endpoint: Endpoint,
        session: &SessionSnapshot,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let url = self.url(endpoint, session.mode);
        let mut request = self
            .agent
            .request(endpoint.method(), &url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json");
        if let Some(key) = session.api_key_header() {
            request = request.set(API_KEY_HEADER, key);
        }

        tracing::debug!(method = endpoint.method(), %url, mode = %session.mode, "backend request");

        match request.call() {
            Ok(resp) => {
                if resp.status() == 204 || resp.header("content-length") == Some("0") {
                    return Ok(None);
                }
                let body = resp
                    .into_string()
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                if body.trim().is_empty() {
                    return Ok(None);
                }
                serde_json::from_str(&body)
                    .map(Some)
                    .map_err(|e| ApiError::Parse(e.to_string()))
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let message = error_message(code, &body);
                tracing::warn!(%url, code, %message, "backend returned an error");
                Err(ApiError::Status { code, message })
            }
            Err(e) => Err(ApiError::Transport(e.to_string())),
        }
    }
}

impl TelemetrySource for ApiClient {
    fn fetch_stats(
        &self,
        session: &SessionSnapshot,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        self.request(Endpoint::Stats, session)
    }

    fn fetch_camera(&self, session: &SessionSnapshot) -> Result<Option<CameraFeed>, ApiError> {
        self.request(Endpoint::Camera, session)?
            .map(|body| serde_json::from_value(body).map_err(|e| ApiError::Parse(e.to_string())))
            .transpose()
    }
}

impl CommandSink for ApiClient {
    fn send(
        &self,
        command: VehicleCommand,
        session: &SessionSnapshot,
    ) -> Result<Option<CommandAck>, ApiError> {
        // A body that is not an acknowledgement still means the command went through.
        Ok(self
            .request(command.endpoint(), session)?
            .map(|body| serde_json::from_value(body).unwrap_or_default()))
    }
}

/// Extract the user-facing message from a non-2xx body.
///
/// `{"message": ...}` is preferred, then the backend's `{"error": ...}`;
/// a JSON body with neither falls back to the status code, and a body that
/// is not JSON at all to [`UNKNOWN_ERROR_MESSAGE`].
pub fn error_message(code: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .filter(|m| !m.is_empty())
            .or(parsed.error.filter(|e| !e.is_empty()))
            .unwrap_or_else(|| format!("HTTP error! status: {}", code)),
        Err(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
    }
}

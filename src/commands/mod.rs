//! Command implementations for the tdash CLI.
//!
//! Each command takes the session controller (and, for backend commands,
//! the collaborator it talks to) and returns a result that can be printed
//! as JSON or as text:
//! - `status`, `toggle`, `key_set` - session state
//! - `stats`, `camera`, `vehicle_command` - backend calls, guarded by
//!   [`SessionController::can_operate`]
//! - `config_get`, `config_set`, `config_list` - config.kdl

use crate::api::{CommandSink, TelemetrySource, VehicleCommand, VehicleStats};
use crate::config::{CONFIG_KEYS, DashConfig, Resolved, ResolvedConfig};
use crate::render;
use crate::session::{Mode, SessionController, SessionSnapshot};
use crate::storage::{CONFIG_FILE, KeyValueStore};
use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

fn warning_strings(warnings: &[Error]) -> Vec<String> {
    warnings.iter().map(|w| w.to_string()).collect()
}

fn push_warnings(out: &mut Vec<String>, warnings: &[String]) {
    for warning in warnings {
        out.push(format!("Warning: {}", warning));
    }
}

/// Results that report store warnings next to their output.
pub trait CarriesWarnings: Sized {
    fn warnings_mut(&mut self) -> &mut Vec<String>;

    /// Put the warnings hit while loading the session ahead of the command's own.
    fn with_load_warnings(mut self, warnings: &[Error]) -> Self {
        let own = std::mem::take(self.warnings_mut());
        let mut all = warning_strings(warnings);
        all.extend(own);
        *self.warnings_mut() = all;
        self
    }
}

// ==================== Session ====================

/// Result of `tdash status`.
#[derive(Debug, Serialize)]
pub struct StatusResult {
    pub mode: Mode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub credential_confirmed: bool,
    pub can_operate: bool,
    pub prompt_for_key: bool,
    pub message: String,
    pub backend: String,
    pub store: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for StatusResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![
            self.message.clone(),
            format!("  Mode: {}", self.mode),
            format!(
                "  API Key: {}",
                self.api_key.as_deref().unwrap_or("(none)")
            ),
            format!(
                "  Backend access: {}",
                if self.can_operate { "yes" } else { "no" }
            ),
            format!("  Store: {} ({})", self.store, self.backend),
        ];
        if self.prompt_for_key {
            lines.push("Run `tdash key set <KEY>` to enter your API key.".to_string());
        }
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }
}

/// Report the current session. `warnings` are those collected while loading it.
pub fn status<S: KeyValueStore>(
    session: &SessionController<S>,
    warnings: &[Error],
) -> StatusResult {
    let state = session.state();
    StatusResult {
        mode: state.mode(),
        api_key: state.masked_credential(),
        credential_confirmed: state.credential_confirmed(),
        can_operate: state.can_operate(),
        prompt_for_key: state.should_prompt_for_credential(),
        message: state.status_message().to_string(),
        backend: session.store().backend_type().to_string(),
        store: session.store().location(),
        warnings: warning_strings(warnings),
    }
}

/// Result of `tdash toggle`.
#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub previous_mode: Mode,
    pub mode: Mode,
    pub credential_confirmed: bool,
    pub prompt_for_key: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for ToggleResult {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Switched from {} to {} mode.", self.previous_mode, self.mode),
            self.message.clone(),
        ];
        if self.prompt_for_key {
            lines.push("Run `tdash key set <KEY>` to enter your API key.".to_string());
        }
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }

    fn to_json(&self) -> String {
        json_string(self)
    }
}

impl CarriesWarnings for ToggleResult {
    fn warnings_mut(&mut self) -> &mut Vec<String> {
        &mut self.warnings
    }
}

/// Flip the session mode.
pub fn toggle<S: KeyValueStore>(session: &mut SessionController<S>) -> ToggleResult {
    let previous_mode = session.state().mode();
    let transition = session.toggle_mode();
    let state = &transition.state;
    ToggleResult {
        previous_mode,
        mode: state.mode(),
        credential_confirmed: state.credential_confirmed(),
        prompt_for_key: state.should_prompt_for_credential(),
        message: state.status_message().to_string(),
        warnings: warning_strings(&transition.warnings),
    }
}

/// Result of `tdash key set`.
#[derive(Debug, Serialize)]
pub struct KeySetResult {
    pub mode: Mode,
    pub api_key: Option<String>,
    pub switched_to_real: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for KeySetResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.switched_to_real {
            lines.push("Switched to real mode.".to_string());
        }
        lines.push(format!(
            "API key saved: {}",
            self.api_key.as_deref().unwrap_or("(none)")
        ));
        lines.push(self.message.clone());
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }
}

impl CarriesWarnings for KeySetResult {
    fn warnings_mut(&mut self) -> &mut Vec<String> {
        &mut self.warnings
    }
}

/// Submit an API key.
pub fn key_set<S: KeyValueStore>(
    session: &mut SessionController<S>,
    key: &str,
) -> Result<KeySetResult> {
    let was_developer = session.state().mode().is_developer();
    let transition = session.submit_credential(key.trim())?;
    let state = &transition.state;
    Ok(KeySetResult {
        mode: state.mode(),
        api_key: state.masked_credential(),
        switched_to_real: was_developer,
        message: state.status_message().to_string(),
        warnings: warning_strings(&transition.warnings),
    })
}

// ==================== Backend ====================

/// Snapshot the session for a backend call, refusing when no call is allowed.
fn begin_request<S: KeyValueStore>(session: &SessionController<S>) -> Result<SessionSnapshot> {
    if !session.can_operate() {
        return Err(Error::CredentialRequired);
    }
    Ok(session.snapshot())
}

/// Drop a result produced under a snapshot the session has since moved past.
fn discard_if_stale<S: KeyValueStore>(
    session: &SessionController<S>,
    snapshot: &SessionSnapshot,
) -> Result<()> {
    if session.is_current(snapshot) {
        Ok(())
    } else {
        tracing::debug!(generation = snapshot.generation, "discarding stale backend result");
        Err(Error::StaleSession)
    }
}

/// Result of `tdash stats`.
#[derive(Debug, Serialize)]
pub struct StatsResult {
    pub mode: Mode,
    pub stats: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for StatsResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![match &self.stats {
            Some(body) => render::dashboard(&VehicleStats::from_value(body)),
            None => "No telemetry data available.".to_string(),
        }];
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }
}

impl CarriesWarnings for StatsResult {
    fn warnings_mut(&mut self) -> &mut Vec<String> {
        &mut self.warnings
    }
}

/// Fetch a telemetry snapshot.
pub fn stats<S: KeyValueStore, T: TelemetrySource>(
    session: &SessionController<S>,
    source: &T,
) -> Result<StatsResult> {
    let snapshot = begin_request(session)?;
    let body = source.fetch_stats(&snapshot)?;
    discard_if_stale(session, &snapshot)?;
    Ok(StatsResult {
        mode: snapshot.mode,
        stats: body,
        warnings: Vec::new(),
    })
}

/// Result of `tdash camera`.
#[derive(Debug, Serialize)]
pub struct CameraResult {
    pub mode: Mode,
    pub camera_feed_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for CameraResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![match &self.camera_feed_url {
            Some(url) => format!("Camera feed: {}", url),
            None => "Camera feed not available.".to_string(),
        }];
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }
}

impl CarriesWarnings for CameraResult {
    fn warnings_mut(&mut self) -> &mut Vec<String> {
        &mut self.warnings
    }
}

/// Fetch the camera feed location.
pub fn camera<S: KeyValueStore, T: TelemetrySource>(
    session: &SessionController<S>,
    source: &T,
) -> Result<CameraResult> {
    let snapshot = begin_request(session)?;
    let feed = source.fetch_camera(&snapshot)?;
    discard_if_stale(session, &snapshot)?;
    Ok(CameraResult {
        mode: snapshot.mode,
        camera_feed_url: feed
            .and_then(|f| f.camera_feed_url)
            .filter(|url| !url.is_empty()),
        warnings: Vec::new(),
    })
}

/// Result of `tdash lock` / `tdash unlock`.
#[derive(Debug, Serialize)]
pub struct CommandResult {
    pub command: String,
    pub mode: Mode,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Output for CommandResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        push_warnings(&mut lines, &self.warnings);
        lines.join("\n")
    }
}

impl CarriesWarnings for CommandResult {
    fn warnings_mut(&mut self) -> &mut Vec<String> {
        &mut self.warnings
    }
}

/// Send a lock or unlock command.
pub fn vehicle_command<S: KeyValueStore, C: CommandSink>(
    session: &SessionController<S>,
    sink: &C,
    command: VehicleCommand,
) -> Result<CommandResult> {
    let snapshot = begin_request(session)?;
    let ack = sink.send(command, &snapshot)?;
    discard_if_stale(session, &snapshot)?;
    tracing::info!(%command, mode = %snapshot.mode, "vehicle command sent");
    Ok(CommandResult {
        command: command.as_str().to_string(),
        mode: snapshot.mode,
        success: ack.as_ref().and_then(|a| a.success).unwrap_or(false),
        message: command.describe(ack.as_ref()),
        warnings: Vec::new(),
    })
}

// ==================== Config ====================

/// One effective configuration value.
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: String,
}

fn entry<T: ToString>(key: &str, resolved: &Resolved<T>) -> ConfigEntry {
    ConfigEntry {
        key: key.to_string(),
        value: resolved.value.to_string(),
        source: resolved.source.to_string(),
    }
}

fn effective_entries(config: &ResolvedConfig) -> Vec<ConfigEntry> {
    vec![
        entry("base-url", &config.base_url),
        ConfigEntry {
            key: "timeout-secs".to_string(),
            value: config.timeout().as_secs().to_string(),
            source: config.timeout.source.to_string(),
        },
        entry("output-format", &config.output_format),
        entry("action-log", &config.action_log),
    ]
}

/// Result of `tdash config get`.
#[derive(Debug, Serialize)]
pub struct ConfigGetResult {
    #[serde(flatten)]
    pub entry: ConfigEntry,
}

impl Output for ConfigGetResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("{} = {} ({})", self.entry.key, self.entry.value, self.entry.source)
    }
}

/// Look up the effective value of one key.
pub fn config_get(config: &ResolvedConfig, key: &str) -> Result<ConfigGetResult> {
    effective_entries(config)
        .into_iter()
        .find(|e| e.key == key)
        .map(|entry| ConfigGetResult { entry })
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Unknown config key: {} (expected one of: {})",
                key,
                CONFIG_KEYS.join(", ")
            ))
        })
}

/// Result of `tdash config set`.
#[derive(Debug, Serialize)]
pub struct ConfigSetResult {
    pub key: String,
    pub value: String,
    pub path: String,
}

impl Output for ConfigSetResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path)
    }
}

/// Validate and write one key to `<data_dir>/config.kdl`.
pub fn config_set(data_dir: &Path, key: &str, value: &str) -> Result<ConfigSetResult> {
    let path = data_dir.join(CONFIG_FILE);
    let mut file_config = DashConfig::load(&path)?;
    file_config.set(key, value)?;
    file_config.save(&path)?;

    Ok(ConfigSetResult {
        key: key.to_string(),
        value: file_config.get(key)?.unwrap_or_default(),
        path: path.display().to_string(),
    })
}

/// Result of `tdash config list`.
#[derive(Debug, Serialize)]
pub struct ConfigListResult {
    pub entries: Vec<ConfigEntry>,
}

impl Output for ConfigListResult {
    fn to_json(&self) -> String {
        json_string(self)
    }

    fn to_human(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} = {} ({})", e.key, e.value, e.source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// List every effective configuration value.
pub fn config_list(config: &ResolvedConfig) -> ConfigListResult {
    ConfigListResult {
        entries: effective_entries(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, CameraFeed, CommandAck};
    use crate::config::{ConfigOverrides, ValueSource, resolve_from};
    use crate::session::CREDENTIAL_KEY;
    use crate::storage::MemoryStore;
    use crate::test_utils::TestEnv;
    use std::cell::RefCell;

    /// Records every call and answers with canned data.
    #[derive(Default)]
    struct FakeBackend {
        stats: Option<serde_json::Value>,
        camera: Option<CameraFeed>,
        ack: Option<CommandAck>,
        fail_with: Option<u16>,
        calls: RefCell<Vec<(String, Mode, Option<String>)>>,
    }

    impl FakeBackend {
        fn record(&self, what: &str, session: &SessionSnapshot) -> std::result::Result<(), ApiError> {
            self.calls.borrow_mut().push((
                what.to_string(),
                session.mode,
                session.api_key_header().map(str::to_string),
            ));
            match self.fail_with {
                Some(code) => Err(ApiError::Status {
                    code,
                    message: "Unauthorized".to_string(),
                }),
                None => Ok(()),
            }
        }
    }

    impl TelemetrySource for FakeBackend {
        fn fetch_stats(
            &self,
            session: &SessionSnapshot,
        ) -> std::result::Result<Option<serde_json::Value>, ApiError> {
            self.record("stats", session)?;
            Ok(self.stats.clone())
        }

        fn fetch_camera(
            &self,
            session: &SessionSnapshot,
        ) -> std::result::Result<Option<CameraFeed>, ApiError> {
            self.record("camera", session)?;
            Ok(self.camera.clone())
        }
    }

    impl CommandSink for FakeBackend {
        fn send(
            &self,
            command: VehicleCommand,
            session: &SessionSnapshot,
        ) -> std::result::Result<Option<CommandAck>, ApiError> {
            self.record(command.as_str(), session)?;
            Ok(self.ack.clone())
        }
    }

    fn developer_session() -> SessionController<MemoryStore> {
        let (session, warnings) = SessionController::initialize(MemoryStore::new());
        assert!(warnings.is_empty());
        session
    }

    fn real_session(key: &str) -> SessionController<MemoryStore> {
        let mut session = developer_session();
        let _ = session.submit_credential(key).unwrap();
        session
    }

    // ==================== Session ====================

    #[test]
    fn test_status_fresh_session() {
        let session = developer_session();
        let result = status(&session, &[]);

        assert_eq!(result.mode, Mode::Developer);
        assert!(result.can_operate);
        assert!(!result.prompt_for_key);
        assert_eq!(result.message, "Developer Mode Active (Using Mock Data)");

        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["mode"], "developer");
        assert!(json.get("api_key").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_status_masks_key() {
        let session = real_session("sk-live-1234567890abcdef");
        let result = status(&session, &[]);
        let json = result.to_json();

        assert!(!json.contains("sk-live-1234567890abcdef"));
        assert_eq!(result.api_key.as_deref(), Some("sk-l...cdef"));
        assert!(result.to_human().contains("Real API Mode Active"));
    }

    #[test]
    fn test_status_reports_load_warnings() {
        let session = developer_session();
        let warnings = vec![Error::PersistStoreUnavailable("disk gone".to_string())];
        let result = status(&session, &warnings);

        assert_eq!(result.warnings.len(), 1);
        assert!(result.to_human().contains("Warning: Persistent store unavailable"));
    }

    #[test]
    fn test_toggle_to_real_prompts_for_key() {
        let mut session = developer_session();
        let result = toggle(&mut session);

        assert_eq!(result.previous_mode, Mode::Developer);
        assert_eq!(result.mode, Mode::Real);
        assert!(result.prompt_for_key);
        assert_eq!(result.message, "Real API Mode: API Key Required");
        assert!(result.to_human().contains("tdash key set"));
    }

    #[test]
    fn test_toggle_to_developer_forgets_key() {
        let mut session = real_session("abc123");
        let result = toggle(&mut session);

        assert_eq!(result.mode, Mode::Developer);
        assert!(!result.credential_confirmed);
        assert!(!session.store().contains(CREDENTIAL_KEY));
    }

    #[test]
    fn test_toggle_reports_store_failure() {
        let mut store = MemoryStore::new();
        store.set_failing(false, true);
        let (mut session, _) = SessionController::initialize(store);

        let result = toggle(&mut session);
        assert_eq!(result.mode, Mode::Real);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_key_set_from_developer() {
        let mut session = developer_session();
        let result = key_set(&mut session, "  xyz-key  ").unwrap();

        assert!(result.switched_to_real);
        assert_eq!(result.mode, Mode::Real);
        assert_eq!(session.state().credential(), Some("xyz-key"));
        assert!(result.to_human().starts_with("Switched to real mode."));
    }

    #[test]
    fn test_key_set_rejects_blank() {
        let mut session = developer_session();
        let err = key_set(&mut session, "   ").unwrap_err();
        assert!(matches!(err, Error::EmptyCredential));
        assert_eq!(session.state().mode(), Mode::Developer);
    }

    #[test]
    fn test_load_warnings_come_first() {
        let mut store = MemoryStore::new();
        store.set_failing(false, true);
        let (mut session, load_warnings) = SessionController::initialize(store);
        assert_eq!(load_warnings.len(), 1);

        let result = toggle(&mut session).with_load_warnings(&load_warnings);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("Persistent store unavailable"));

        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["warnings"].as_array().unwrap().len(), 2);

        let dev = developer_session();
        let clean = stats(&dev, &FakeBackend::default())
            .unwrap()
            .with_load_warnings(&[]);
        assert!(clean.warnings.is_empty());
        assert!(!clean.to_json().contains("warnings"));

        let warned = vehicle_command(&dev, &FakeBackend::default(), VehicleCommand::Lock)
            .unwrap()
            .with_load_warnings(&load_warnings);
        assert!(warned.to_human().contains("Warning: Persistent store unavailable"));
    }

    // ==================== Backend ====================

    #[test]
    fn test_stats_in_developer_mode() {
        let session = developer_session();
        let backend = FakeBackend {
            stats: Some(serde_json::json!({ "battery_level": 80, "vehicle_name": "DevTesla" })),
            ..Default::default()
        };

        let result = stats(&session, &backend).unwrap();
        assert_eq!(result.mode, Mode::Developer);
        assert!(result.to_human().contains("Level: 80%"));

        let calls = backend.calls.borrow();
        assert_eq!(calls.as_slice(), &[("stats".to_string(), Mode::Developer, None)]);
    }

    #[test]
    fn test_stats_refused_without_key() {
        let mut session = developer_session();
        let _ = session.toggle_mode();
        let backend = FakeBackend::default();

        let err = stats(&session, &backend).unwrap_err();
        assert!(matches!(err, Error::CredentialRequired));
        assert_eq!(err.to_string(), "API Key required for this operation.");
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn test_real_mode_sends_key() {
        let session = real_session("abc123");
        let backend = FakeBackend::default();

        let result = stats(&session, &backend).unwrap();
        assert!(result.stats.is_none());
        assert_eq!(result.to_human(), "No telemetry data available.");

        let calls = backend.calls.borrow();
        assert_eq!(calls[0].1, Mode::Real);
        assert_eq!(calls[0].2.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_backend_error_is_propagated() {
        let session = real_session("bad");
        let backend = FakeBackend {
            fail_with: Some(401),
            ..Default::default()
        };

        let err = camera(&session, &backend).unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(session.state().credential(), Some("bad"));
    }

    #[test]
    fn test_camera_url() {
        let session = developer_session();
        let backend = FakeBackend {
            camera: Some(CameraFeed {
                camera_feed_url: Some("http://cam/feed.jpg".to_string()),
            }),
            ..Default::default()
        };

        let result = camera(&session, &backend).unwrap();
        assert_eq!(result.to_human(), "Camera feed: http://cam/feed.jpg");

        let empty = camera(&session, &FakeBackend::default()).unwrap();
        assert_eq!(empty.to_human(), "Camera feed not available.");
    }

    #[test]
    fn test_lock_messages() {
        let session = developer_session();

        let confirmed = FakeBackend {
            ack: Some(CommandAck {
                success: Some(true),
                message: None,
            }),
            ..Default::default()
        };
        let result = vehicle_command(&session, &confirmed, VehicleCommand::Lock).unwrap();
        assert!(result.success);
        assert_eq!(result.message, "Vehicle locked successfully.");

        let silent = FakeBackend::default();
        let result = vehicle_command(&session, &silent, VehicleCommand::Unlock).unwrap();
        assert!(!result.success);
        assert_eq!(result.message, "Unlock command sent.");
        assert_eq!(silent.calls.borrow()[0].0, "unlock");
    }

    #[test]
    fn test_stale_snapshot_is_discarded() {
        let mut session = real_session("abc123");
        let snapshot = begin_request(&session).unwrap();
        assert!(discard_if_stale(&session, &snapshot).is_ok());

        let _ = session.toggle_mode();
        let err = discard_if_stale(&session, &snapshot).unwrap_err();
        assert!(matches!(err, Error::StaleSession));
    }

    // ==================== Config ====================

    #[test]
    fn test_config_list_defaults() {
        let config = resolve_from(&DashConfig::default(), None, &ConfigOverrides::new());
        let result = config_list(&config);

        let keys: Vec<&str> = result.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, CONFIG_KEYS);
        assert!(result.entries.iter().all(|e| e.source == "default"));
        assert!(result.to_human().contains("timeout-secs = 10 (default)"));
    }

    #[test]
    fn test_config_get_reports_source() {
        let config = resolve_from(
            &DashConfig::default(),
            Some("http://env/api".to_string()),
            &ConfigOverrides::new(),
        );
        let result = config_get(&config, "base-url").unwrap();
        assert_eq!(result.entry.value, "http://env/api");
        assert_eq!(
            result.entry.source,
            ValueSource::EnvVar("TDASH_BASE_URL".to_string()).to_string()
        );

        let json: serde_json::Value = serde_json::from_str(&result.to_json()).unwrap();
        assert_eq!(json["key"], "base-url");

        assert!(config_get(&config, "nope").is_err());
    }

    #[test]
    fn test_config_set_persists() {
        let env = TestEnv::new();
        let result = config_set(env.data_path(), "base-url", "http://car.local/api/").unwrap();
        assert_eq!(result.value, "http://car.local/api");

        let loaded = DashConfig::load(&env.data_path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded.base_url.as_deref(), Some("http://car.local/api"));
    }

    #[test]
    fn test_config_set_rejects_invalid() {
        let env = TestEnv::new();
        assert!(config_set(env.data_path(), "timeout-secs", "0").is_err());
        assert!(config_set(env.data_path(), "output-format", "xml").is_err());
        assert!(!env.data_path().join(CONFIG_FILE).exists());
    }
}

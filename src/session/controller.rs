//! The session state controller.
//!
//! Owns the [`SessionState`] and the store it is persisted in. Every
//! mutation updates memory first and then writes one store batch; a failing
//! store never rolls the in-memory state back, it is reported as a warning
//! on the returned [`Transition`].

use super::state::{Mode, SessionSnapshot, SessionState};
use crate::storage::{KeyValueStore, StoreOp};
use crate::{Error, Result};

/// Store key holding the serialized mode flag (`true` = Developer Mode).
pub const DEV_MODE_KEY: &str = "isDevMode";

/// Store key holding the API key.
pub const CREDENTIAL_KEY: &str = "apiKey";

/// Outcome of a controller mutation.
#[derive(Debug)]
#[must_use]
pub struct Transition {
    /// State after the mutation.
    pub state: SessionState,
    /// Non-fatal store failures hit while applying it.
    pub warnings: Vec<Error>,
}

impl Transition {
    /// True when the store accepted every read and write.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Controller for the dashboard session.
pub struct SessionController<S: KeyValueStore> {
    store: S,
    state: SessionState,
    generation: u64,
}

impl<S: KeyValueStore> SessionController<S> {
    /// Load the session from `store`.
    ///
    /// A missing mode flag means Developer Mode, and the resolved flag is
    /// written back so the store always holds an explicit record. In Real
    /// mode a stored API key is picked up. In Developer mode a leftover API
    /// key is left alone: only an explicit switch to Developer Mode
    /// deletes it.
    pub fn initialize(store: S) -> (Self, Vec<Error>) {
        let mut warnings = Vec::new();

        // A failed read leaves the stored flag alone.
        let (mode, write_back) = match read_mode(&store) {
            Ok(Some(mode)) => (mode, true),
            Ok(None) => (Mode::Developer, true),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored mode, defaulting to developer");
                warnings.push(e);
                (Mode::Developer, false)
            }
        };

        let state = match mode {
            Mode::Developer => SessionState::developer(),
            Mode::Real => match read_credential(&store) {
                Ok(credential) => SessionState::real(credential),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read stored API key");
                    warnings.push(e);
                    SessionState::real(None)
                }
            },
        };

        let mut controller = Self {
            store,
            state,
            generation: 0,
        };
        if write_back {
            controller.persist(&[mode_op(mode)], &mut warnings);
        }

        tracing::debug!(state = ?controller.state, "session initialized");
        (controller, warnings)
    }

    /// Switch between Developer and Real mode.
    ///
    /// Into Real mode: a previously stored API key is reused, otherwise the
    /// caller has to prompt for one. Into Developer mode: the API key is
    /// forgotten, both in memory and in the store.
    pub fn toggle_mode(&mut self) -> Transition {
        let next = self.state.mode().toggled();
        let mut warnings = Vec::new();
        let mut ops = vec![mode_op(next)];

        self.state = match next {
            Mode::Developer => {
                ops.push(StoreOp::remove(CREDENTIAL_KEY));
                SessionState::developer()
            }
            Mode::Real => match read_credential(&self.store) {
                Ok(credential) => SessionState::real(credential),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read stored API key");
                    warnings.push(e);
                    SessionState::real(None)
                }
            },
        };
        self.generation += 1;
        self.persist(&ops, &mut warnings);

        tracing::info!(mode = %next, prompt = self.state.should_prompt_for_credential(), "mode toggled");
        Transition {
            state: self.state.clone(),
            warnings,
        }
    }

    /// Accept an API key.
    ///
    /// Submitting a key while in Developer Mode switches to Real mode, and
    /// the mode flag is persisted in the same batch as the key. Empty or
    /// whitespace-only keys are rejected and leave the session untouched.
    pub fn submit_credential(&mut self, value: impl Into<String>) -> Result<Transition> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(Error::EmptyCredential);
        }

        let mut ops = vec![StoreOp::set(CREDENTIAL_KEY, value.clone())];
        if self.state.mode() == Mode::Developer {
            ops.push(mode_op(Mode::Real));
        }

        self.state = SessionState::real(Some(value));
        self.generation += 1;

        let mut warnings = Vec::new();
        self.persist(&ops, &mut warnings);

        tracing::info!("API key accepted");
        Ok(Transition {
            state: self.state.clone(),
            warnings,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn can_operate(&self) -> bool {
        self.state.can_operate()
    }

    pub fn should_prompt_for_credential(&self) -> bool {
        self.state.should_prompt_for_credential()
    }

    /// Copy of the current (mode, credential) pair for a collaborator.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.state.mode(),
            credential: self.state.credential().map(str::to_string),
            generation: self.generation,
        }
    }

    /// Whether a result obtained under `snapshot` still matches the session.
    pub fn is_current(&self, snapshot: &SessionSnapshot) -> bool {
        snapshot.generation == self.generation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self, ops: &[StoreOp], warnings: &mut Vec<Error>) {
        if let Err(e) = self.store.apply(ops) {
            tracing::warn!(
                error = %e,
                location = %self.store.location(),
                "session change kept in memory only"
            );
            warnings.push(e);
        }
    }
}

fn mode_op(mode: Mode) -> StoreOp {
    StoreOp::set(DEV_MODE_KEY, mode.is_developer().to_string())
}

/// Read the stored mode flag. An unparseable flag is treated as absent.
fn read_mode<S: KeyValueStore>(store: &S) -> Result<Option<Mode>> {
    let Some(raw) = store.get(DEV_MODE_KEY)? else {
        return Ok(None);
    };

    match serde_json::from_str::<bool>(raw.trim()) {
        Ok(is_dev_mode) => Ok(Some(Mode::from_dev_flag(is_dev_mode))),
        Err(_) => {
            tracing::warn!(value = %raw, "ignoring unreadable {} value", DEV_MODE_KEY);
            Ok(None)
        }
    }
}

fn read_credential<S: KeyValueStore>(store: &S) -> Result<Option<String>> {
    Ok(store.get(CREDENTIAL_KEY)?.filter(|k| !k.trim().is_empty()))
}

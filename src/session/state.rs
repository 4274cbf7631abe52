//! Session state: operating mode plus the API key that goes with it.

use serde::{Deserialize, Serialize};

/// Which backend the dashboard talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Mocked backend endpoints, no credential needed
    #[default]
    Developer,
    /// Live vehicle backend, authenticated with an API key
    Real,
}

impl Mode {
    /// Build from the persisted `isDevMode` flag.
    pub fn from_dev_flag(is_dev_mode: bool) -> Self {
        if is_dev_mode {
            Mode::Developer
        } else {
            Mode::Real
        }
    }

    /// Value of the persisted `isDevMode` flag for this mode.
    pub fn is_developer(&self) -> bool {
        matches!(self, Mode::Developer)
    }

    /// The other mode.
    pub fn toggled(&self) -> Self {
        match self {
            Mode::Developer => Mode::Real,
            Mode::Real => Mode::Developer,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Developer => "developer",
            Mode::Real => "real",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The process-wide session.
///
/// A credential can only exist in [`Mode::Real`], and holding one is what
/// "confirmed" means, so the confirmation flag is computed rather than
/// stored. The constructors are crate-private: only the controller moves
/// the session between states.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    mode: Mode,
    credential: Option<String>,
}

impl SessionState {
    /// Developer mode; never carries a credential.
    pub(crate) fn developer() -> Self {
        Self {
            mode: Mode::Developer,
            credential: None,
        }
    }

    /// Real mode with an optional accepted credential. Empty strings count as absent.
    pub(crate) fn real(credential: Option<String>) -> Self {
        Self {
            mode: Mode::Real,
            credential: credential.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The accepted API key, if any.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }

    /// True when in Real mode with an accepted API key.
    pub fn credential_confirmed(&self) -> bool {
        self.mode == Mode::Real && self.credential.is_some()
    }

    /// Whether backend calls (stats, camera, lock, unlock) may be issued.
    pub fn can_operate(&self) -> bool {
        match self.mode {
            Mode::Developer => true,
            Mode::Real => self.credential.as_deref().is_some_and(|c| !c.is_empty()),
        }
    }

    /// Whether the user must be asked for an API key.
    pub fn should_prompt_for_credential(&self) -> bool {
        self.mode == Mode::Real && !self.credential_confirmed()
    }

    /// Banner shown above the dashboard.
    pub fn status_message(&self) -> &'static str {
        match (self.mode, self.credential_confirmed()) {
            (Mode::Developer, _) => "Developer Mode Active (Using Mock Data)",
            (Mode::Real, false) => "Real API Mode: API Key Required",
            (Mode::Real, true) => "Real API Mode Active (Using Your API Key)",
        }
    }

    /// The API key with its middle hidden, for display.
    pub fn masked_credential(&self) -> Option<String> {
        self.credential.as_deref().map(mask_secret)
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("mode", &self.mode)
            .field("credential", &self.masked_credential())
            .field("credential_confirmed", &self.credential_confirmed())
            .finish()
    }
}

/// Point-in-time copy of the session handed to collaborators.
///
/// `generation` identifies the controller mutation the snapshot was taken
/// after; see [`super::SessionController::is_current`].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub credential: Option<String>,
    pub generation: u64,
}

impl SessionSnapshot {
    /// The value for the `X-API-KEY` header: only sent in Real mode.
    pub fn api_key_header(&self) -> Option<&str> {
        match self.mode {
            Mode::Developer => None,
            Mode::Real => self.credential.as_deref().filter(|c| !c.is_empty()),
        }
    }
}

impl std::fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("mode", &self.mode)
            .field("credential", &self.credential.as_deref().map(mask_secret))
            .field("generation", &self.generation)
            .finish()
    }
}

/// Show the first and last four characters of a secret.
///
/// Secrets of twelve characters or fewer show at most a third of their
/// characters, all from the front.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        let head: String = chars.iter().take(chars.len() / 3).collect();
        format!("{}...", head)
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

//! Dashboard session: Developer vs Real-API mode and the API key.
//!
//! [`SessionController`] is the only writer of [`SessionState`]. Consumers
//! (the telemetry and command collaborators in [`crate::api`]) receive a
//! [`SessionSnapshot`] by value and pick their endpoint and headers from it.
//!
//! ## Persisted keys
//!
//! - `isDevMode` - `true`/`false`, always present after initialization
//! - `apiKey` - the API key; deleted when switching to Developer Mode

pub mod controller;
pub mod state;

pub use controller::{CREDENTIAL_KEY, DEV_MODE_KEY, SessionController, Transition};
pub use state::{Mode, SessionSnapshot, SessionState, mask_secret};

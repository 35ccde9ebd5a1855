//! Session configuration and the observable session state.

use std::path::PathBuf;

use riftpulse_protocol::{ProtocolError, User};
use url::Url;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Where the backend lives and where the session is persisted.
///
/// Create one with `SessionConfig::default()` and override the fields you
/// care about.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Root address of the REST backend, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// File holding the tokens and preferences between runs. `None`
    /// keeps everything in memory.
    pub store_path: Option<PathBuf>,
}

impl SessionConfig {
    /// The default location of the session file: `<data dir>/riftpulse/session.json`.
    pub fn default_store_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("riftpulse").join("session.json"))
    }

    /// Parses `base_url`.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidUrl` if it is not an absolute URL.
    pub fn parsed_base_url(&self) -> Result<Url, ProtocolError> {
        Url::parse(&self.base_url)
            .map_err(|e| ProtocolError::InvalidUrl(format!("{}: {e}", self.base_url)))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_owned(),
            store_path: Self::default_store_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// What front-ends observe about the session.
///
/// Published through a `tokio::sync::watch` channel by the
/// [`SessionManager`](crate::SessionManager) after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// The signed-in user, `None` when logged out.
    pub current_user: Option<User>,

    /// `true` only while the startup restore is running.
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

impl Default for SessionSnapshot {
    /// A session that hasn't been restored yet.
    fn default() -> Self {
        Self {
            current_user: None,
            loading: true,
        }
    }
}

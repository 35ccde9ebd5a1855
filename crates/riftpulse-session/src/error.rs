//! Error types for the session layer.

use riftpulse_protocol::ProtocolError;
use riftpulse_transport::TransportError;

/// Errors that can occur while talking to the backend on behalf of a
/// session.
///
/// The public operations that have an expected failure mode (login,
/// register, delete account) don't return this type; they return an
/// [`AuthFailure`] instead. Everything else, favorite toggles included,
/// propagates a `SessionError` to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No HTTP response was obtained at all.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body could not be encoded, or the server's answer could not be
    /// decoded into the expected type.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with a non-2xx status.
    ///
    /// `detail` is the `detail` field of the body when it has one; `body`
    /// is kept verbatim so field-level validation errors can be shown.
    #[error(
        "server answered {status}: {}",
        .detail.as_deref().unwrap_or("no detail")
    )]
    Status {
        status: u16,
        detail: Option<String>,
        body: Vec<u8>,
    },

    /// The durable session store could not be read or written.
    #[error("session store failed: {0}")]
    Store(#[source] std::io::Error),
}

impl SessionError {
    /// The HTTP status, if this error came from a server answer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for a 401 answer.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The human-readable `detail` message the server attached, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Why a login, registration, or account deletion did not succeed.
///
/// This is a value for display, not something to match on for control
/// flow: the session state is already settled when it is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AuthFailure {
    /// A single message, taken from the server's `detail` field or a
    /// generic fallback.
    #[error("{0}")]
    Message(String),

    /// The server's full error body, typically per-field validation
    /// errors such as `{"password": ["This password is too short."]}`.
    #[error("{0}")]
    Fields(serde_json::Value),
}

impl AuthFailure {
    /// The `detail` of a server error, or `fallback` when there is none.
    pub(crate) fn from_detail(err: &SessionError, fallback: &str) -> Self {
        Self::Message(err.detail().unwrap_or(fallback).to_owned())
    }

    /// The whole body of a server error, or `fallback` when there is
    /// no body to show.
    pub(crate) fn from_body(err: &SessionError, fallback: &str) -> Self {
        let SessionError::Status { body, .. } = err else {
            return Self::Message(fallback.to_owned());
        };
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            if !value.is_null() {
                return Self::Fields(value);
            }
        }
        match std::str::from_utf8(body).map(str::trim) {
            Ok(text) if !text.is_empty() => Self::Message(text.to_owned()),
            _ => Self::Message(fallback.to_owned()),
        }
    }

    /// The field errors, if the server sent them.
    pub fn fields(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Fields(value) => Some(value),
            Self::Message(_) => None,
        }
    }
}

//! Error types for the catalog layer.

use riftpulse_protocol::ProtocolError;
use riftpulse_session::SessionError;
use riftpulse_transport::TransportError;

/// Errors that can occur while browsing the catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A REST call failed: network, non-2xx status, or undecodable body.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A live-feed message or endpoint URL was malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The live feed connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// A sort order name was not recognized.
    #[error("unknown sort order: {0}")]
    UnknownSort(String),

    /// The search debouncer task has stopped.
    #[error("search debouncer is unavailable")]
    Unavailable,
}

impl CatalogError {
    /// The HTTP status behind this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Session(e) => e.status(),
            _ => None,
        }
    }
}

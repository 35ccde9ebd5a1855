//! Unified error type for the Rift Pulse client.

use riftpulse_catalog::CatalogError;
use riftpulse_protocol::ProtocolError;
use riftpulse_session::{AuthFailure, SessionError};
use riftpulse_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RiftPulseError {
    /// Building the HTTP client or a websocket connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body, URL or feed message was malformed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A REST call or the session store failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Login, registration or account deletion was refused.
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    /// A catalog operation failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: RiftPulseError = TransportError::ConnectionClosed("gone".into()).into();
        assert!(matches!(err, RiftPulseError::Transport(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err: RiftPulseError = ProtocolError::InvalidUrl("nope".into()).into();
        assert!(matches!(err, RiftPulseError::Protocol(_)));
    }

    #[test]
    fn test_from_auth_failure_keeps_message() {
        let err: RiftPulseError = AuthFailure::Message("Login failed".into()).into();
        assert!(matches!(err, RiftPulseError::Auth(_)));
        assert_eq!(err.to_string(), "Login failed");
    }

    #[test]
    fn test_from_catalog_error() {
        let err: RiftPulseError = CatalogError::NotSignedIn.into();
        assert!(matches!(err, RiftPulseError::Catalog(_)));
    }
}

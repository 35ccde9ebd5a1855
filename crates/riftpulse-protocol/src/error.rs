//! Error types for the protocol layer.
//!
//! When you see a `ProtocolError`, the problem is in turning bodies into
//! bytes or back, not in networking or in session state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: the server answered with HTML instead of JSON, a
    /// required field is missing, or a value has the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A base URL or endpoint path could not be turned into a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

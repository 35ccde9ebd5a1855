//! Codec trait and the JSON implementation used for request/response bodies.
//!
//! The session layer never calls `serde_json` directly. It asks a
//! [`Codec`] to encode outgoing bodies and decode incoming ones, so the
//! body format is decided in exactly one place.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to body bytes and decodes body bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → the codec is shared by every task that sends
///   requests through the same session.
/// - `'static` → it owns everything it needs.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`), the only format the
/// REST backend speaks.
///
/// ```rust
/// use riftpulse_protocol::{Codec, JsonCodec, LoginRequest};
///
/// let codec = JsonCodec;
/// let bytes = codec
///     .encode(&LoginRequest { username: "faker".into(), password: "t1".into() })
///     .unwrap();
/// assert_eq!(bytes, br#"{"username":"faker","password":"t1"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        // Endpoints like logout answer 204 with no body; treat that as
        // JSON `null` so callers decoding into `()` or `Option<_>` work.
        if data.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null").map_err(ProtocolError::Decode);
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenPair, User};

    #[test]
    fn test_decode_token_pair() {
        let pair: TokenPair = JsonCodec
            .decode(br#"{"access":"A","refresh":"R"}"#)
            .unwrap();
        assert_eq!(pair.access, "A");
        assert_eq!(pair.refresh, "R");
    }

    #[test]
    fn test_decode_empty_body_as_unit() {
        JsonCodec
            .decode::<()>(b"")
            .expect("empty body should decode as unit");
    }

    #[test]
    fn test_decode_empty_body_as_option_is_none() {
        let value: Option<User> = JsonCodec.decode(b"  ").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_decode_html_returns_decode_error() {
        let result: Result<TokenPair, _> =
            JsonCodec.decode(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_missing_field_returns_decode_error() {
        let result: Result<TokenPair, _> = JsonCodec.decode(br#"{"access":"A"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}

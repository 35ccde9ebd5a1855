/// Errors that can occur in the transport layer.
///
/// None of these carry an HTTP status: a server that answered, even with
/// a 500, produced a response, not a transport error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The underlying client could not be constructed.
    #[error("transport setup failed: {0}")]
    Setup(#[source] std::io::Error),

    /// The request could not be delivered or no response arrived.
    #[error("request failed: {0}")]
    RequestFailed(#[source] std::io::Error),

    /// A response arrived but its body could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Opening a websocket connection failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// The websocket connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),
}

//! Websocket client for the backend's live match-update feed.

use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;

use crate::TransportError;

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A client-side websocket connection that yields raw message payloads.
///
/// Decoding the payloads is left to the caller; this type only knows
/// about frames.
pub struct WebSocketFeed {
    url: String,
    ws: Mutex<WsStream>,
}

impl WebSocketFeed {
    /// Opens a websocket connection to `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _) =
            tokio_tungstenite::connect_async(url).await.map_err(|e| {
                TransportError::ConnectFailed(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    e,
                ))
            })?;
        tracing::info!(url, "live feed connected");
        Ok(Self {
            url: url.to_string(),
            ws: Mutex::new(ws),
        })
    }

    /// Returns the URL this feed is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Receives the next text or binary payload.
    ///
    /// Returns `Ok(None)` when the server closes the connection cleanly.
    pub async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        use futures_util::StreamExt;
        loop {
            let msg = self.ws.lock().await.next().await;
            match msg {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_bytes().to_vec()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return Ok(Some(data.into()));
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::debug!(url = %self.url, "live feed closed");
                    return Ok(None);
                }
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::ReceiveFailed(
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionReset,
                            e,
                        ),
                    ));
                }
            }
        }
    }

    /// Closes the connection.
    pub async fn close(&self) -> Result<(), TransportError> {
        self.ws.lock().await.close(None).await.map_err(|e| {
            TransportError::ConnectionClosed(e.to_string())
        })
    }
}

//! Live match updates pushed over the backend's websocket.

use riftpulse_protocol::{Codec, JsonCodec, MatchUpdate, live_feed_url};
use riftpulse_transport::WebSocketFeed;
use url::Url;

use crate::CatalogError;

/// A connection to the live match feed that yields decoded updates.
pub struct MatchFeed {
    feed: WebSocketFeed,
    codec: JsonCodec,
}

impl MatchFeed {
    /// Connects to the feed of the backend at `base_url`
    /// (`http` becomes `ws`, `https` becomes `wss`).
    ///
    /// # Errors
    /// `CatalogError::Protocol` if no feed URL can be derived,
    /// `CatalogError::Transport` if the connection fails.
    pub async fn connect(base_url: &Url) -> Result<Self, CatalogError> {
        let url = live_feed_url(base_url)?;
        Self::connect_to(url.as_str()).await
    }

    /// Connects to a feed at an explicit websocket URL.
    ///
    /// # Errors
    /// `CatalogError::Transport` if the connection fails.
    pub async fn connect_to(url: &str) -> Result<Self, CatalogError> {
        let feed = WebSocketFeed::connect(url).await?;
        Ok(Self {
            feed,
            codec: JsonCodec,
        })
    }

    pub fn url(&self) -> &str {
        self.feed.url()
    }

    /// Waits for the next update. `Ok(None)` once the server closes the
    /// feed.
    ///
    /// # Errors
    /// `CatalogError::Protocol` for a message that is not a match update;
    /// the feed stays usable. `CatalogError::Transport` if the
    /// connection breaks.
    pub async fn next(&self) -> Result<Option<MatchUpdate>, CatalogError> {
        let Some(payload) = self.feed.recv().await? else {
            return Ok(None);
        };
        let update: MatchUpdate = self.codec.decode(&payload)?;
        tracing::debug!(match_id = %update.match_id, state = %update.state, score = %update.score, "match update");
        Ok(Some(update))
    }

    /// # Errors
    /// `CatalogError::Transport` if the close handshake fails.
    pub async fn close(&self) -> Result<(), CatalogError> {
        self.feed.close().await?;
        Ok(())
    }
}

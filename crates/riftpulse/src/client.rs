//! `RiftPulseClient` builder and the assembled client.
//!
//! This is the entry point for talking to a Rift Pulse backend. It ties
//! together all the layers: transport → session → catalog.

use std::path::PathBuf;
use std::sync::Arc;

use riftpulse_catalog::{CatalogApi, MatchFeed, Preferences, SearchConfig, SearchDebouncer};
use riftpulse_session::{
    FileStore, HttpClient, MemoryStore, SessionConfig, SessionManager, SessionStore,
};
use riftpulse_transport::{HttpConfig, ReqwestTransport};
use url::Url;

use crate::RiftPulseError;

/// The session manager as assembled by the builder.
pub type Session = SessionManager<ReqwestTransport>;

/// Builder for configuring and connecting a Rift Pulse client.
///
/// # Example
///
/// ```rust,no_run
/// # async fn run() -> Result<(), riftpulse::RiftPulseError> {
/// use riftpulse::prelude::*;
///
/// let client = RiftPulseClient::builder()
///     .base_url("http://localhost:8000")
///     .in_memory()
///     .build()
///     .await?;
/// client.session().login("faker", "t1").await?;
/// # Ok(())
/// # }
/// ```
pub struct RiftPulseClientBuilder {
    session_config: SessionConfig,
    http_config: HttpConfig,
}

impl RiftPulseClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            http_config: HttpConfig::default(),
        }
    }

    /// Sets the backend's root address.
    pub fn base_url(mut self, url: &str) -> Self {
        self.session_config.base_url = url.to_string();
        self
    }

    /// Persists tokens and preferences in this file.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_config.store_path = Some(path.into());
        self
    }

    /// Keeps tokens and preferences in memory only.
    pub fn in_memory(mut self) -> Self {
        self.session_config.store_path = None;
        self
    }

    /// Replaces the whole session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets timeouts and user agent of the HTTP client.
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Builds the client and restores the previous session, if the store
    /// holds one.
    ///
    /// # Errors
    /// - `RiftPulseError::Protocol` for an unusable base URL
    /// - `RiftPulseError::Transport` if the HTTP client cannot be built
    /// - `RiftPulseError::Session` if the store file cannot be opened
    pub async fn build(self) -> Result<RiftPulseClient, RiftPulseError> {
        let base_url = self.session_config.parsed_base_url()?;
        let transport = ReqwestTransport::new(&self.http_config)?;

        let store: Arc<dyn SessionStore> = match &self.session_config.store_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };

        let session = Arc::new(SessionManager::new(
            HttpClient::new(transport, base_url.clone()),
            Arc::clone(&store),
        ));
        session.bootstrap().await;

        tracing::info!(
            %base_url,
            authenticated = session.is_authenticated(),
            "client ready"
        );

        Ok(RiftPulseClient {
            catalog: CatalogApi::new(Arc::clone(&session)),
            preferences: Preferences::new(store),
            session,
            base_url,
        })
    }
}

impl Default for RiftPulseClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A connected Rift Pulse client.
pub struct RiftPulseClient {
    session: Arc<Session>,
    catalog: CatalogApi<ReqwestTransport>,
    preferences: Preferences,
    base_url: Url,
}

impl RiftPulseClient {
    /// Creates a new builder.
    pub fn builder() -> RiftPulseClientBuilder {
        RiftPulseClientBuilder::new()
    }

    /// Login, logout, favorites and the current user.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogApi<ReqwestTransport> {
        &self.catalog
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Starts a debounced search task bound to this client.
    pub fn search(&self, config: SearchConfig) -> SearchDebouncer {
        SearchDebouncer::spawn(self.catalog.clone(), config)
    }

    /// Connects to the backend's live match feed.
    ///
    /// # Errors
    /// `RiftPulseError::Catalog` if the feed cannot be reached.
    pub async fn live_feed(&self) -> Result<MatchFeed, RiftPulseError> {
        Ok(MatchFeed::connect(&self.base_url).await?)
    }
}

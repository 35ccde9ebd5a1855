//! Debounced search-as-you-type.
//!
//! A [`SearchDebouncer`] is a handle to a background task that owns the
//! search state. Each keystroke is sent to it as the new query; the task
//! waits for a quiet period before calling the search endpoint, and a newer
//! query always replaces a pending one. Results are published on a watch
//! channel.
//!
//! ```text
//!   query("fa") ─┐
//!   query("fak") ┼─ each restarts the 300 ms timer
//!   query("faker")┘
//!                 └── 300 ms quiet ──→ GET /api/search/?q=faker ──→ state
//! ```

use std::time::Duration;

use riftpulse_protocol::SearchResults;
use riftpulse_transport::HttpTransport;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};

use crate::{CatalogApi, CatalogError, MIN_QUERY_LEN};

const COMMAND_BUFFER: usize = 32;

/// Tuning for [`SearchDebouncer`].
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching.
    pub debounce: Duration,
    /// Shorter queries clear the results without a request.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: MIN_QUERY_LEN,
        }
    }
}

/// What a search box shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// The latest query typed.
    pub query: String,
    /// Results for `query`, empty until they arrive.
    pub results: SearchResults,
    /// A search for `query` is pending or in flight.
    pub loading: bool,
    /// Why the last search failed, if it did.
    pub error: Option<String>,
}

enum SearchCommand {
    Query(String),
    Shutdown,
}

/// Handle to a running search task. Cheap to clone.
#[derive(Clone)]
pub struct SearchDebouncer {
    sender: mpsc::Sender<SearchCommand>,
    state: watch::Receiver<SearchState>,
}

impl SearchDebouncer {
    /// Spawns the search task on the current Tokio runtime.
    pub fn spawn<T: HttpTransport>(api: CatalogApi<T>, config: SearchConfig) -> Self {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state) = watch::channel(SearchState::default());

        let actor = SearchActor {
            api,
            config,
            receiver,
            state: state_tx,
        };
        tokio::spawn(actor.run());

        Self { sender, state }
    }

    /// Replaces the query.
    ///
    /// # Errors
    /// Returns `CatalogError::Unavailable` if the task has stopped.
    pub async fn query(&self, query: impl Into<String>) -> Result<(), CatalogError> {
        self.sender
            .send(SearchCommand::Query(query.into()))
            .await
            .map_err(|_| CatalogError::Unavailable)
    }

    /// The current search state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Returns a receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }

    /// Stops the task. A pending search is dropped.
    ///
    /// # Errors
    /// Returns `CatalogError::Unavailable` if the task has already stopped.
    pub async fn shutdown(&self) -> Result<(), CatalogError> {
        self.sender
            .send(SearchCommand::Shutdown)
            .await
            .map_err(|_| CatalogError::Unavailable)
    }
}

struct SearchActor<T: HttpTransport> {
    api: CatalogApi<T>,
    config: SearchConfig,
    receiver: mpsc::Receiver<SearchCommand>,
    state: watch::Sender<SearchState>,
}

impl<T: HttpTransport> SearchActor<T> {
    async fn run(mut self) {
        tracing::debug!("search task started");
        let mut pending: Option<(String, Instant)> = None;

        loop {
            let deadline = pending.as_ref().map(|(_, at)| *at);

            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(SearchCommand::Query(query)) => {
                        pending = self.handle_query(query);
                    }
                    Some(SearchCommand::Shutdown) | None => break,
                },
                () = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some((query, _)) = pending.take() {
                        self.search(query).await;
                    }
                }
            }
        }

        tracing::debug!("search task stopped");
    }

    /// Records the query and returns the search to schedule, if any.
    fn handle_query(&self, query: String) -> Option<(String, Instant)> {
        if query.chars().count() < self.config.min_query_len {
            self.state.send_replace(SearchState {
                query,
                ..SearchState::default()
            });
            return None;
        }

        self.state.send_modify(|s| {
            s.query = query.clone();
            s.loading = true;
        });
        Some((query, Instant::now() + self.config.debounce))
    }

    async fn search(&self, query: String) {
        let result = self.api.search(&query).await;

        // A query typed while the request was in flight supersedes it.
        if !self.receiver.is_empty() {
            tracing::debug!(%query, "search result superseded");
            return;
        }

        match result {
            Ok(results) => {
                tracing::debug!(%query, "search completed");
                self.state.send_replace(SearchState {
                    query,
                    results,
                    loading: false,
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(%query, error = %e, "search failed");
                self.state.send_replace(SearchState {
                    query,
                    results: SearchResults::default(),
                    loading: false,
                    error: Some(e.to_string()),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use riftpulse_session::{HttpClient, MemoryStore, SessionManager};
    use riftpulse_transport::{HttpRequest, HttpResponse, TransportError};
    use url::Url;

    use super::*;

    /// Answers every search with one team named after the query.
    #[derive(Default)]
    struct EchoSearch {
        queries: Mutex<Vec<String>>,
    }

    impl HttpTransport for EchoSearch {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = Url::parse(&request.url).unwrap();
            let q = url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            self.queries.lock().unwrap().push(q.clone());
            let body = format!(r#"{{"teams":[{{"id":1,"name":"{q}"}}],"players":[],"tournaments":[]}}"#);
            Ok(HttpResponse::new(200, body.into_bytes()))
        }
    }

    fn debouncer() -> (SearchDebouncer, Arc<EchoSearch>) {
        let transport = Arc::new(EchoSearch::default());
        let client = HttpClient::new(
            Arc::clone(&transport),
            Url::parse("http://localhost:8000").unwrap(),
        );
        let session = Arc::new(SessionManager::new(client, Arc::new(MemoryStore::new())));
        let search = SearchDebouncer::spawn(CatalogApi::new(session), SearchConfig::default());
        (search, transport)
    }

    fn sent(transport: &EchoSearch) -> Vec<String> {
        transport.queries.lock().unwrap().clone()
    }

    async fn settled(search: &SearchDebouncer, query: &str) -> SearchState {
        let mut rx = search.subscribe();
        let state = rx
            .wait_for(|s| s.query == query && !s.loading)
            .await
            .unwrap();
        state.clone()
    }

    // =====================================================================
    // Debounce
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_query_burst_sends_only_last_query() {
        let (search, transport) = debouncer();

        search.query("fa").await.unwrap();
        search.query("fak").await.unwrap();
        search.query("faker").await.unwrap();

        let state = settled(&search, "faker").await;
        assert_eq!(state.results.teams[0].name, "faker");
        assert_eq!(sent(&transport), ["faker"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_waits_for_quiet_period() {
        let (search, transport) = debouncer();

        search.query("t1").await.unwrap();
        time::sleep(Duration::from_millis(299)).await;
        assert!(sent(&transport).is_empty(), "no request before 300 ms");
        assert!(search.state().loading);

        let state = settled(&search, "t1").await;
        assert_eq!(sent(&transport), ["t1"]);
        assert!(state.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_new_keystroke_restarts_timer() {
        let (search, transport) = debouncer();

        search.query("ge").await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
        search.query("gen").await.unwrap();
        time::sleep(Duration::from_millis(200)).await;
        assert!(sent(&transport).is_empty());

        settled(&search, "gen").await;
        assert_eq!(sent(&transport), ["gen"]);
    }

    // =====================================================================
    // Short queries
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_query_short_clears_results_without_request() {
        let (search, transport) = debouncer();

        search.query("faker").await.unwrap();
        settled(&search, "faker").await;

        search.query("f").await.unwrap();
        let state = settled(&search, "f").await;

        assert!(state.results.is_empty());
        assert_eq!(sent(&transport), ["faker"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_short_cancels_pending_search() {
        let (search, transport) = debouncer();

        search.query("faker").await.unwrap();
        search.query("").await.unwrap();
        settled(&search, "").await;
        time::sleep(Duration::from_secs(1)).await;

        assert!(sent(&transport).is_empty());
    }

    // =====================================================================
    // Shutdown
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_then_query_returns_unavailable() {
        let (search, _) = debouncer();

        search.shutdown().await.unwrap();
        time::sleep(Duration::from_millis(1)).await;

        assert!(matches!(
            search.query("faker").await,
            Err(CatalogError::Unavailable)
        ));
    }
}

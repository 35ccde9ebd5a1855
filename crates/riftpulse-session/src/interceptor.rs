//! The token-refresh interceptor.
//!
//! [`RefreshInterceptor`] decorates [`HttpClient::send`]: when the server
//! answers 401, it asks a [`Refresh`] implementation for a new access
//! token and re-issues the request once.
//!
//! ```text
//!   send ──→ 2xx ───────────────────────────────→ Ok(response)
//!     │
//!     ├──→ other error ─────────────────────────→ Err(status)
//!     │
//!     └──→ 401 ──(retried?)── yes ──────────────→ Err(401)
//!                    │
//!                    no → retried = true → refresh_access() ── false ──→ Err(401)
//!                                                     │
//!                                                    true → send again
//! ```
//!
//! Because `retried` is set before the second send and checked on every
//! 401, one logical request reaches the transport at most twice.

use std::future::Future;

use riftpulse_transport::{HttpResponse, HttpTransport};

use crate::client::{bearer_of, error_for_status};
use crate::{ApiRequest, HttpClient, SessionError};

const UNAUTHORIZED: u16 = 401;

/// Obtains a new access token after a 401.
///
/// ## Trait bounds
///
/// - `Send + Sync` → shared by every task sending through the session.
pub trait Refresh: Send + Sync {
    /// Makes a fresh access token the client's bearer default.
    ///
    /// `rejected` is the access token the 401'd request carried. An
    /// implementation may skip the network call if the stored token has
    /// already moved past it.
    ///
    /// Returns `true` if the request is worth re-issuing.
    fn refresh_access(&self, rejected: Option<&str>) -> impl Future<Output = bool> + Send;
}

/// Wraps an [`HttpClient`] with at-most-once refresh-and-retry on 401.
pub struct RefreshInterceptor<'a, T: HttpTransport, R: Refresh> {
    client: &'a HttpClient<T>,
    refresher: &'a R,
}

impl<'a, T: HttpTransport, R: Refresh> RefreshInterceptor<'a, T, R> {
    pub fn new(client: &'a HttpClient<T>, refresher: &'a R) -> Self {
        Self { client, refresher }
    }

    /// Sends `request`, refreshing and retrying once if it is rejected
    /// with 401.
    ///
    /// # Errors
    /// - `SessionError::Status` with the original 401 if the request was
    ///   already retried or the refresh failed
    /// - `SessionError::Status` for any other non-2xx answer
    /// - `SessionError::Transport` / `SessionError::Protocol` as raised
    ///   by the client
    pub async fn send(&self, mut request: ApiRequest) -> Result<HttpResponse, SessionError> {
        loop {
            let outgoing = self.client.prepare(&request)?;
            let sent_with = bearer_of(&outgoing);
            let response = self.client.dispatch(outgoing).await?;

            if response.status != UNAUTHORIZED {
                return error_for_status(response);
            }

            let id = request.id;
            if request.retried {
                tracing::debug!(%id, "unauthorized after retry, giving up");
                return error_for_status(response);
            }

            request.retried = true;
            tracing::debug!(%id, "unauthorized, refreshing access token");
            if !self.refresher.refresh_access(sent_with.as_deref()).await {
                return error_for_status(response);
            }
        }
    }
}

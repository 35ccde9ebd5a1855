//! The session manager: the single owner of authentication state.
//!
//! It is responsible for:
//! - Restoring a previous login at startup ([`bootstrap`](SessionManager::bootstrap))
//! - Logging in, registering, logging out, deleting the account
//! - Keeping the stored token pair, the client's bearer header, and the
//!   current user consistent with each other
//! - Refreshing the access token when the interceptor reports a 401
//!
//! # Concurrency note
//!
//! `SessionManager` is `Send + Sync` and meant to be shared behind an
//! `Arc`. State changes are published on a `tokio::sync::watch` channel,
//! so front-ends can react to login/logout without polling.
//!
//! Refreshes are serialized by an async mutex. A task that saw a 401 for
//! token *T* first waits for the mutex, then checks whether the stored
//! access token is still *T*. If another task already replaced it, the
//! request is simply retried with the new token.

use std::sync::Arc;

use riftpulse_protocol::{
    Codec, Endpoint, FavoriteToggle, LoginRequest, MatchId, RefreshRequest,
    RefreshResponse, RegisterRequest, RegisterResponse, TeamId, TokenPair, User,
};
use riftpulse_transport::{HttpResponse, HttpTransport};
use serde::de::DeserializeOwned;
use tokio::sync::{Mutex, watch};

use crate::{
    ACCESS_TOKEN_KEY, ApiRequest, AuthFailure, HttpClient, REFRESH_TOKEN_KEY,
    Refresh, RefreshInterceptor, SessionError, SessionSnapshot, SessionStore,
};

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const DELETE_FAILED: &str = "Failed to delete account";

/// Owns the session: current user, loading flag, stored tokens, and the
/// client's bearer header.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ bootstrap() ──→ login() / register() ──→ logout()
///                │                    │                  ▲
///                │                    ▼                  │
///                │        send() ── 401 ──→ refresh ─────┤ (refresh failed)
///                │                                       │
///                └──────────────→ delete_account() ──────┘
/// ```
pub struct SessionManager<T: HttpTransport> {
    client: HttpClient<T>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionSnapshot>,
    refresh_lock: Mutex<()>,
}

/// The stored token pair at a point in time, for rolling back a login
/// that failed halfway.
struct SavedTokens {
    access: Option<String>,
    refresh: Option<String>,
}

impl<T: HttpTransport> SessionManager<T> {
    /// Creates a manager in the not-yet-restored state (`loading` is
    /// `true` until [`bootstrap`](Self::bootstrap) finishes).
    pub fn new(client: HttpClient<T>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            client,
            store,
            state,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn client(&self) -> &HttpClient<T> {
        &self.client
    }

    /// The durable store the tokens live in.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Returns a receiver that sees every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().current_user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().current_user.is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    // -----------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------

    /// Restores the previous login, if any. Run once at startup.
    ///
    /// With a stored access token, the token is attached and the profile
    /// fetched directly (not through the interceptor). If that fails the
    /// manager runs one refresh and stops there; `current_user` stays
    /// unset until the next profile fetch.
    pub async fn bootstrap(&self) {
        if let Some(token) = self.store.get(ACCESS_TOKEN_KEY) {
            self.client.set_bearer(&token);

            match self.fetch_me_direct().await {
                Ok(user) => {
                    tracing::info!(user_id = %user.id, username = %user.username, "session restored");
                    self.set_user(Some(user));
                }
                Err(e) => {
                    tracing::debug!(error = %e, "stored access token rejected, refreshing");
                    self.refresh().await;
                }
            }
        } else {
            tracing::debug!("no stored session");
            self.set_user(None);
        }

        self.state.send_modify(|s| s.loading = false);
    }

    // -----------------------------------------------------------------
    // Login / register
    // -----------------------------------------------------------------

    /// Logs in and loads the user's profile.
    ///
    /// On failure the session is left as it was, including a previous
    /// login, and the returned [`AuthFailure`] carries the server's
    /// `detail` message, or `"Login failed"` when there is none.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthFailure> {
        let saved = self.save_tokens();

        match self.try_login(username, password).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "logged in");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "login failed");
                self.restore_tokens(saved);
                Err(AuthFailure::from_detail(&e, LOGIN_FAILED))
            }
        }
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        let request = ApiRequest::json(
            Endpoint::Login,
            &LoginRequest {
                username: username.to_owned(),
                password: password.to_owned(),
            },
        )?;
        let response = self.client.send(&request).await?;
        let pair: TokenPair = self.client.codec().decode(&response.body)?;

        self.store_tokens(&pair.access, Some(&pair.refresh))?;
        self.client.set_bearer(&pair.access);

        // Not through the interceptor: a 401 here must fail the login, not
        // refresh and log out the session being replaced.
        let user = self.fetch_me_direct().await?;
        self.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Creates an account and signs in as it.
    ///
    /// The server returns the new user with the tokens, so no profile
    /// fetch follows. On failure the returned [`AuthFailure`] carries the
    /// server's whole error body (field-level validation errors), or
    /// `"Registration failed"` when there is none.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password2: &str,
    ) -> Result<User, AuthFailure> {
        let body = RegisterRequest {
            username: username.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            password2: password2.to_owned(),
        };

        match self.try_register(&body).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "registered");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(%username, error = %e, "registration failed");
                Err(AuthFailure::from_body(&e, REGISTRATION_FAILED))
            }
        }
    }

    async fn try_register(&self, body: &RegisterRequest) -> Result<User, SessionError> {
        let request = ApiRequest::json(Endpoint::Register, body)?;
        let response = self.client.send(&request).await?;
        let registered: RegisterResponse = self.client.codec().decode(&response.body)?;

        self.store_tokens(&registered.access, Some(&registered.refresh))?;
        self.client.set_bearer(&registered.access);
        self.set_user(Some(registered.user.clone()));
        Ok(registered.user)
    }

    // -----------------------------------------------------------------
    // Logout / delete
    // -----------------------------------------------------------------

    /// Logs out. Always succeeds locally.
    ///
    /// The server is told to invalidate the refresh token if there is
    /// one; if that call fails it is logged and ignored.
    pub async fn logout(&self) {
        if let Some(refresh) = self.store.get(REFRESH_TOKEN_KEY) {
            if let Err(e) = self.notify_logout(refresh).await {
                tracing::warn!(error = %e, "logout notification failed, logging out locally");
            }
        }

        self.clear_session();
        tracing::info!("logged out");
    }

    async fn notify_logout(&self, refresh: String) -> Result<(), SessionError> {
        let request = ApiRequest::json(Endpoint::Logout, &RefreshRequest { refresh })?;
        self.client.send(&request).await?;
        Ok(())
    }

    /// Deletes the signed-in account and clears the session.
    ///
    /// On failure the session is left as it was and the returned
    /// [`AuthFailure`] carries the server's `detail` message, or
    /// `"Failed to delete account"`.
    pub async fn delete_account(&self) -> Result<(), AuthFailure> {
        match self.send(ApiRequest::new(Endpoint::DeleteAccount)).await {
            Ok(_) => {
                self.clear_session();
                tracing::info!("account deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "account deletion failed");
                Err(AuthFailure::from_detail(&e, DELETE_FAILED))
            }
        }
    }

    // -----------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------

    /// Exchanges the stored refresh token for a new access token.
    ///
    /// Returns `false`, after logging out, if there is no refresh token
    /// or the server rejects it.
    pub async fn refresh(&self) -> bool {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> bool {
        let Some(refresh) = self.store.get(REFRESH_TOKEN_KEY) else {
            tracing::debug!("no refresh token, logging out");
            self.logout().await;
            return false;
        };

        match self.try_refresh(refresh).await {
            Ok(()) => {
                tracing::info!("access token refreshed");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, logging out");
                self.logout().await;
                false
            }
        }
    }

    async fn try_refresh(&self, refresh: String) -> Result<(), SessionError> {
        let request = ApiRequest::json(Endpoint::RefreshToken, &RefreshRequest { refresh })?;
        let response = self.client.send(&request).await?;
        let tokens: RefreshResponse = self.client.codec().decode(&response.body)?;

        // A rotated refresh token replaces the stored one; otherwise the
        // stored one stays valid.
        self.store_tokens(&tokens.access, tokens.refresh.as_deref())?;
        self.client.set_bearer(&tokens.access);
        Ok(())
    }

    // -----------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------

    /// Adds the team to the user's favorites, or removes it if present,
    /// then reloads the user so `favorite_teams` reflects the change.
    ///
    /// # Errors
    /// Any failure of the toggle or the reload is returned as is.
    pub async fn toggle_favorite_team(&self, team: TeamId) -> Result<FavoriteToggle, SessionError> {
        self.toggle_favorite(Endpoint::ToggleFavoriteTeam(team)).await
    }

    /// Match counterpart of [`toggle_favorite_team`](Self::toggle_favorite_team).
    ///
    /// # Errors
    /// Any failure of the toggle or the reload is returned as is.
    pub async fn toggle_favorite_match(
        &self,
        id: MatchId,
    ) -> Result<FavoriteToggle, SessionError> {
        self.toggle_favorite(Endpoint::ToggleFavoriteMatch(id)).await
    }

    async fn toggle_favorite(&self, endpoint: Endpoint) -> Result<FavoriteToggle, SessionError> {
        let result = self.try_toggle_favorite(endpoint.clone()).await;
        match &result {
            Ok(toggle) => {
                tracing::info!(?endpoint, is_favorite = toggle.is_favorite, "favorite toggled");
            }
            Err(e) => tracing::warn!(?endpoint, error = %e, "favorite toggle failed"),
        }
        result
    }

    async fn try_toggle_favorite(&self, endpoint: Endpoint) -> Result<FavoriteToggle, SessionError> {
        let toggle: FavoriteToggle = self.fetch(endpoint).await?;
        let user: User = self.fetch(Endpoint::Me).await?;
        self.set_user(Some(user));
        Ok(toggle)
    }

    // -----------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------

    /// Sends a request through the refresh interceptor.
    ///
    /// # Errors
    /// See [`RefreshInterceptor::send`].
    pub async fn send(&self, request: ApiRequest) -> Result<HttpResponse, SessionError> {
        RefreshInterceptor::new(&self.client, self).send(request).await
    }

    /// Sends a bodiless request through the interceptor and decodes the
    /// JSON answer.
    ///
    /// # Errors
    /// As [`send`](Self::send), plus `SessionError::Protocol` when the
    /// answer does not decode into `R`.
    pub async fn fetch<R: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<R, SessionError> {
        let response = self.send(ApiRequest::new(endpoint)).await?;
        Ok(self.client.codec().decode(&response.body)?)
    }

    async fn fetch_me_direct(&self) -> Result<User, SessionError> {
        let response = self.client.send(&ApiRequest::new(Endpoint::Me)).await?;
        Ok(self.client.codec().decode(&response.body)?)
    }

    // -----------------------------------------------------------------
    // State helpers
    // -----------------------------------------------------------------

    fn set_user(&self, user: Option<User>) {
        self.state.send_modify(|s| s.current_user = user);
    }

    fn store_tokens(&self, access: &str, refresh: Option<&str>) -> Result<(), SessionError> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        if let Some(refresh) = refresh {
            self.store.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        Ok(())
    }

    fn save_tokens(&self) -> SavedTokens {
        SavedTokens {
            access: self.store.get(ACCESS_TOKEN_KEY),
            refresh: self.store.get(REFRESH_TOKEN_KEY),
        }
    }

    fn restore_tokens(&self, saved: SavedTokens) {
        for (key, value) in [
            (ACCESS_TOKEN_KEY, saved.access.as_deref()),
            (REFRESH_TOKEN_KEY, saved.refresh.as_deref()),
        ] {
            let result = match value {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = result {
                tracing::warn!(key, error = %e, "failed to restore stored token");
            }
        }
        match saved.access {
            Some(token) => self.client.set_bearer(&token),
            None => self.client.clear_bearer(),
        }
    }

    /// Drops tokens, bearer header, and user. Store failures are logged;
    /// the in-memory session is cleared regardless.
    fn clear_session(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "failed to clear stored token");
            }
        }
        self.client.clear_bearer();
        self.set_user(None);
    }
}

impl<T: HttpTransport> Refresh for SessionManager<T> {
    async fn refresh_access(&self, rejected: Option<&str>) -> bool {
        let _guard = self.refresh_lock.lock().await;

        let current = self.store.get(ACCESS_TOKEN_KEY);
        if current.is_some() && current.as_deref() != rejected {
            tracing::debug!("access token already replaced, skipping refresh");
            return true;
        }
        self.refresh_locked().await
    }
}

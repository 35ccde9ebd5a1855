//! Authenticated session management for Rift Pulse.
//!
//! This crate owns everything about "who is signed in":
//!
//! 1. **HTTP client**: base address and default headers ([`HttpClient`])
//! 2. **Durable storage**: the token pair survives restarts ([`SessionStore`])
//! 3. **Session state**: current user and loading flag, published on a
//!    watch channel ([`SessionManager`], [`SessionSnapshot`])
//! 4. **Token refresh**: a 401 is answered with one silent refresh and
//!    one retry ([`RefreshInterceptor`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Catalog Layer (above)  ← browses teams, matches, ... through the session
//!     ↕
//! Session Layer (this crate)  ← tokens, current user, refresh-and-retry
//!     ↕
//! Protocol Layer (below)  ← provides Endpoint, User, TokenPair, JsonCodec
//! ```

mod client;
mod error;
mod interceptor;
mod manager;
mod session;
mod store;

pub use client::{ApiRequest, HttpClient};
pub use error::{AuthFailure, SessionError};
pub use interceptor::{Refresh, RefreshInterceptor};
pub use manager::SessionManager;
pub use session::{SessionConfig, SessionSnapshot};
pub use store::{
    ACCESS_TOKEN_KEY, FileStore, MemoryStore, REFRESH_TOKEN_KEY, SessionStore,
};

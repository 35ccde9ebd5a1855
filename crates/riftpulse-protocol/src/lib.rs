//! Wire protocol for Rift Pulse.
//!
//! This crate defines what the client and the REST backend exchange:
//!
//! - **Auth types** ([`User`], [`TokenPair`], [`LoginRequest`], etc.):
//!   request and response bodies of the `/api/auth/` endpoints.
//! - **Catalog types** ([`Team`], [`Player`], [`Tournament`], [`Match`],
//!   etc.): the esports records the browsing pages display.
//! - **Endpoints** ([`Endpoint`]): the method and path of every call.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how bodies are turned
//!   into bytes and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! ```text
//! Transport (HTTP bytes) → Protocol (typed bodies) → Session (auth state)
//! ```

mod auth;
mod catalog;
mod codec;
mod endpoint;
mod error;

pub use auth::{
    FavoriteToggle, LoginRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, RegisterResponse, TokenPair, User, UserId, error_detail,
};
pub use catalog::{
    Match, MatchId, MatchUpdate, Player, PlayerId, SearchResults, Standing,
    Team, TeamDetail, TeamId, TeamTournamentResult, Tournament,
    TournamentDetail, TournamentId,
};
pub use codec::{Codec, JsonCodec};
pub use endpoint::{Endpoint, live_feed_url};
pub use error::ProtocolError;

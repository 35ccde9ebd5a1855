//! Bodies of the `/api/auth/` endpoints and the favorite toggles.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MatchId, TeamId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A unique identifier for a site account.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The signed-in user as returned by `GET /api/auth/me/`.
///
/// The client only interprets the identity and favorites fields. Anything
/// else the server sends (`email`, future profile fields) is kept in
/// `extra` and written back out unchanged, so the record survives a
/// round trip through this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub favorite_teams: BTreeSet<TeamId>,
    #[serde(default)]
    pub favorite_matches: BTreeSet<MatchId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Returns `true` if the team is in this user's favorites.
    pub fn is_favorite_team(&self, id: TeamId) -> bool {
        self.favorite_teams.contains(&id)
    }

    /// Returns `true` if the match is in this user's favorites.
    pub fn is_favorite_match(&self, id: MatchId) -> bool {
        self.favorite_matches.contains(&id)
    }

    /// The account email, when the server includes it.
    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(serde_json::Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/auth/register/`.
///
/// `password2` is the confirmation field; the server, not the client,
/// checks that it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Body of `POST /api/auth/token/refresh/` and `POST /api/auth/logout/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Access/refresh pair returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Registration answers with a token pair and the created user, so no
/// follow-up `me` call is needed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisterResponse {
    pub access: String,
    pub refresh: String,
    pub user: User,
}

/// Answer of the token-refresh endpoint.
///
/// `refresh` is only present when the server rotates refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Answer of the favorite-toggle endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggle {
    #[serde(default)]
    pub detail: Option<String>,
    pub is_favorite: bool,
}

/// Extracts the `detail` message from an error body, if there is one.
///
/// The backend reports most failures as `{"detail": "..."}`. Validation
/// failures use per-field keys instead and have no `detail`.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}

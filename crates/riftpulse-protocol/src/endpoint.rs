//! Every REST call the client makes, as a value.
//!
//! An [`Endpoint`] knows its HTTP method and how to build its URL against
//! a base address. Callers never format paths by hand.

use riftpulse_transport::Method;
use url::Url;

use crate::{MatchId, PlayerId, ProtocolError, TeamId, TournamentId};

/// A backend call, with the path parameters and query it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    // -- auth -------------------------------------------------------------
    Me,
    Login,
    Register,
    RefreshToken,
    Logout,
    DeleteAccount,
    ToggleFavoriteTeam(TeamId),
    ToggleFavoriteMatch(MatchId),

    // -- catalog ----------------------------------------------------------
    /// `region` is a region code; `None` lists every region.
    Teams { region: Option<String> },
    Team(TeamId),
    TeamTournamentResults(TeamId),
    Players { region: Option<String> },
    Player(PlayerId),
    Tournaments { region: Option<String> },
    Tournament(TournamentId),
    TournamentStandings(TournamentId),
    /// Without a tournament the server returns matches up to two weeks
    /// ahead, across all tournaments.
    Matches { tournament: Option<TournamentId> },
    Match(MatchId),
    Search { query: String },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::Login
            | Self::Register
            | Self::RefreshToken
            | Self::Logout
            | Self::ToggleFavoriteTeam(_)
            | Self::ToggleFavoriteMatch(_) => Method::Post,
            Self::DeleteAccount => Method::Delete,
            _ => Method::Get,
        }
    }

    /// The path relative to the API root, always with a trailing slash
    /// (the backend redirects slashless paths).
    pub fn path(&self) -> String {
        match self {
            Self::Me => "api/auth/me/".into(),
            Self::Login => "api/auth/login/".into(),
            Self::Register => "api/auth/register/".into(),
            Self::RefreshToken => "api/auth/token/refresh/".into(),
            Self::Logout => "api/auth/logout/".into(),
            Self::DeleteAccount => "api/auth/delete-account/".into(),
            Self::ToggleFavoriteTeam(id) => format!("api/teams/{id}/favorite/"),
            Self::ToggleFavoriteMatch(id) => format!("api/matches/{id}/favorite/"),
            Self::Teams { .. } => "api/teams/".into(),
            Self::Team(id) => format!("api/teams/{id}/"),
            Self::TeamTournamentResults(id) => {
                format!("api/teams/{id}/tournament_results/")
            }
            Self::Players { .. } => "api/players/".into(),
            Self::Player(id) => format!("api/players/{id}/"),
            Self::Tournaments { .. } => "api/tournaments/".into(),
            Self::Tournament(id) => format!("api/tournaments/{id}/"),
            Self::TournamentStandings(id) => format!("api/tournaments/{id}/standings/"),
            Self::Matches { .. } => "api/matches/".into(),
            Self::Match(id) => format!("api/matches/{id}/"),
            Self::Search { .. } => "api/search/".into(),
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Teams { region: Some(r) }
            | Self::Players { region: Some(r) }
            | Self::Tournaments { region: Some(r) } => vec![("region", r.clone())],
            Self::Matches { tournament: Some(id) } => vec![("tournament", id.to_string())],
            Self::Search { query } => vec![("q", query.clone())],
            _ => Vec::new(),
        }
    }

    /// Resolves this endpoint against `base`, encoding query parameters.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidUrl` if the joined URL is invalid.
    pub fn url(&self, base: &Url) -> Result<Url, ProtocolError> {
        let mut url = api_root(base)
            .join(&self.path())
            .map_err(|e| ProtocolError::InvalidUrl(format!("{}: {e}", self.path())))?;

        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

/// The websocket URL of the live match feed for a REST base address:
/// `http` becomes `ws`, `https` becomes `wss`.
///
/// # Errors
/// Returns `ProtocolError::InvalidUrl` if `base` uses another scheme.
pub fn live_feed_url(base: &Url) -> Result<Url, ProtocolError> {
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => {
            return Err(ProtocolError::InvalidUrl(format!(
                "unsupported scheme for live feed: {other}"
            )));
        }
    };
    let mut url = api_root(base)
        .join("ws/matches/")
        .map_err(|e| ProtocolError::InvalidUrl(e.to_string()))?;
    url.set_scheme(scheme)
        .map_err(|()| ProtocolError::InvalidUrl(format!("cannot use scheme {scheme}")))?;
    Ok(url)
}

/// `base` with a trailing slash, so relative joins keep any path prefix.
fn api_root(base: &Url) -> Url {
    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.set_query(None);
    root
}

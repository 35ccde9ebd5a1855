//! Typed access to the esports catalog endpoints.
//!
//! Every call goes through [`SessionManager::fetch`], so a signed-in user
//! browsing the catalog gets the same silent refresh-and-retry on 401 as
//! the profile calls.

use std::sync::Arc;

use futures_util::future::try_join_all;
use riftpulse_protocol::{
    Endpoint, Match, MatchId, Player, PlayerId, SearchResults, Standing, Team,
    TeamDetail, TeamId, TeamTournamentResult, Tournament, TournamentDetail,
    TournamentId,
};
use riftpulse_session::SessionManager;
use riftpulse_transport::HttpTransport;

use crate::{CatalogError, Region};

/// Queries shorter than this (in characters) are never sent to the
/// search endpoint.
pub const MIN_QUERY_LEN: usize = 2;

/// Read-only view of teams, players, tournaments and matches.
///
/// Cheap to clone: it only holds the shared session.
pub struct CatalogApi<T: HttpTransport> {
    session: Arc<SessionManager<T>>,
}

impl<T: HttpTransport> Clone for CatalogApi<T> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<T: HttpTransport> CatalogApi<T> {
    pub fn new(session: Arc<SessionManager<T>>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SessionManager<T>> {
        &self.session
    }

    // -----------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------

    /// Lists teams, narrowed to `region` unless it is [`Region::All`].
    pub async fn teams(&self, region: Region) -> Result<Vec<Team>, CatalogError> {
        self.get(Endpoint::Teams { region: region_param(region) }).await
    }

    /// One team with its current roster.
    pub async fn team(&self, id: TeamId) -> Result<TeamDetail, CatalogError> {
        self.get(Endpoint::Team(id)).await
    }

    /// Per-tournament win/loss records of a team.
    pub async fn team_tournament_results(
        &self,
        id: TeamId,
    ) -> Result<Vec<TeamTournamentResult>, CatalogError> {
        self.get(Endpoint::TeamTournamentResults(id)).await
    }

    // -----------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------

    /// Lists players, narrowed to their team's `region` unless it is
    /// [`Region::All`].
    pub async fn players(&self, region: Region) -> Result<Vec<Player>, CatalogError> {
        self.get(Endpoint::Players { region: region_param(region) }).await
    }

    pub async fn player(&self, id: PlayerId) -> Result<Player, CatalogError> {
        self.get(Endpoint::Player(id)).await
    }

    // -----------------------------------------------------------------
    // Tournaments
    // -----------------------------------------------------------------

    pub async fn tournaments(&self, region: Region) -> Result<Vec<Tournament>, CatalogError> {
        self.get(Endpoint::Tournaments { region: region_param(region) }).await
    }

    /// One tournament with its participating teams.
    pub async fn tournament(&self, id: TournamentId) -> Result<TournamentDetail, CatalogError> {
        self.get(Endpoint::Tournament(id)).await
    }

    pub async fn standings(&self, id: TournamentId) -> Result<Vec<Standing>, CatalogError> {
        self.get(Endpoint::TournamentStandings(id)).await
    }

    // -----------------------------------------------------------------
    // Matches
    // -----------------------------------------------------------------

    /// Lists matches, all of them or those of one tournament.
    pub async fn matches(
        &self,
        tournament: Option<TournamentId>,
    ) -> Result<Vec<Match>, CatalogError> {
        self.get(Endpoint::Matches { tournament }).await
    }

    pub async fn get_match(&self, id: MatchId) -> Result<Match, CatalogError> {
        self.get(Endpoint::Match(id)).await
    }

    // -----------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------

    /// Searches teams, players and tournaments by name.
    ///
    /// A query shorter than [`MIN_QUERY_LEN`] characters returns empty
    /// results without a request.
    pub async fn search(&self, query: &str) -> Result<SearchResults, CatalogError> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(SearchResults::default());
        }
        self.get(Endpoint::Search { query: query.to_owned() }).await
    }

    // -----------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------

    /// Loads every team the signed-in user has marked as favorite.
    ///
    /// # Errors
    /// `CatalogError::NotSignedIn` without a current user; otherwise the
    /// first failed fetch.
    pub async fn favorite_teams(&self) -> Result<Vec<TeamDetail>, CatalogError> {
        let user = self.session.current_user().ok_or(CatalogError::NotSignedIn)?;
        try_join_all(user.favorite_teams.iter().map(|&id| self.team(id))).await
    }

    /// Loads every match the signed-in user has marked as favorite.
    ///
    /// # Errors
    /// `CatalogError::NotSignedIn` without a current user; otherwise the
    /// first failed fetch.
    pub async fn favorite_matches(&self) -> Result<Vec<Match>, CatalogError> {
        let user = self.session.current_user().ok_or(CatalogError::NotSignedIn)?;
        try_join_all(user.favorite_matches.iter().map(|&id| self.get_match(id))).await
    }

    async fn get<R: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Result<R, CatalogError> {
        match self.session.fetch(endpoint.clone()).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::debug!(?endpoint, error = %e, "catalog fetch failed");
                Err(e.into())
            }
        }
    }
}

fn region_param(region: Region) -> Option<String> {
    region.code().map(str::to_owned)
}

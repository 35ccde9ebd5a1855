//! Esports records served by the public catalog endpoints.
//!
//! Every record is decoded leniently: missing fields take their default
//! and unknown fields are ignored, since the backend grows fields faster
//! than clients update.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Primary key of a team.
    TeamId
);
record_id!(
    /// Primary key of a player.
    PlayerId
);
record_id!(
    /// Primary key of a tournament.
    TournamentId
);
record_id!(
    /// Primary key of a match.
    MatchId
);

// ---------------------------------------------------------------------------
// Teams and players
// ---------------------------------------------------------------------------

/// A team as listed by `GET /api/teams/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub logo: Option<String>,
    pub founded_date: Option<NaiveDate>,
    pub country: String,
    /// Region code, e.g. `"europe"`.
    pub region: Option<String>,
    /// Human-readable region, e.g. `"Europe"`.
    pub region_display: Option<String>,
    pub game: Option<u64>,
    pub description: String,
    pub social_media: serde_json::Value,
}

impl Team {
    /// The region label shown to users: the display name when the server
    /// sent one, otherwise the raw code.
    pub fn region_label(&self) -> &str {
        self.region_display
            .as_deref()
            .or(self.region.as_deref())
            .unwrap_or_default()
    }
}

/// `GET /api/teams/{id}/`: a team plus its current roster.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: Team,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub current_players: Vec<Player>,
}

/// A team's record in one tournament, from
/// `GET /api/teams/{id}/tournament_results/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamTournamentResult {
    pub tournament_id: TournamentId,
    pub tournament_name: String,
    pub tournament_status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub wins: u32,
    pub losses: u32,
    pub total_matches: u32,
}

/// A professional player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    pub real_name: String,
    pub country: String,
    pub birth_date: Option<NaiveDate>,
    /// `None` for free agents.
    pub team: Option<TeamId>,
    pub team_name: Option<String>,
    pub role: String,
    pub social_media: serde_json::Value,
    pub stats: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// A tournament as listed by `GET /api/tournaments/`.
///
/// The list form carries participant IDs only; see [`TournamentDetail`]
/// for the expanded teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub game: Option<u64>,
    pub game_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Decimal amount, sent as a string to keep its precision.
    pub prize_pool: Option<String>,
    pub location: String,
    pub format: String,
    pub region: Option<String>,
    pub region_display: Option<String>,
    pub participants: Vec<TeamId>,
    /// One of `upcoming`, `ongoing`, `completed`.
    pub status: String,
}

/// `GET /api/tournaments/{id}/`: a tournament with its participants
/// expanded into full team records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TournamentDetail {
    #[serde(flatten)]
    pub tournament: Tournament,
    #[serde(default)]
    pub participants: Vec<Team>,
}

/// One row of `GET /api/tournaments/{id}/standings/`.
///
/// Group-stage tournaments also fill `group` and `rank`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub wins: u32,
    pub losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub game_differential: i32,
    pub group: Option<String>,
    pub rank: Option<u32>,
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// A match between two teams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Match {
    pub id: MatchId,
    pub tournament: Option<TournamentId>,
    pub tournament_name: Option<String>,
    /// Display name of the tournament's region.
    pub tournament_region: Option<String>,
    pub team1: Option<TeamId>,
    pub team2: Option<TeamId>,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub result: String,
    /// `"2-1"` style series score; empty before the match is played.
    pub score: String,
    pub vod_link: String,
    pub stats: serde_json::Value,
    pub external_id: Option<String>,
}

impl Match {
    /// The upstream match state (`unstarted`, `inProgress`, `completed`),
    /// or `""` when unknown.
    pub fn state(&self) -> &str {
        self.stats
            .get("state")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }
}

/// A push message from the live match websocket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchUpdate {
    pub match_id: MatchId,
    pub external_id: Option<String>,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub score: String,
    pub state: String,
    pub date_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Answer of `GET /api/search/?q=`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub tournaments: Vec<Tournament>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.players.is_empty() && self.tournaments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // Teams
    // =====================================================================

    #[test]
    fn test_team_decodes_server_record() {
        let team: Team = serde_json::from_str(
            r#"{
                "id": 7, "name": "G2 Esports", "logo": null,
                "founded_date": "2014-02-24", "country": "Germany",
                "region": "europe", "region_display": "Europe",
                "game": 1, "description": "", "social_media": {},
                "some_new_field": 42
            }"#,
        )
        .unwrap();

        assert_eq!(team.id, TeamId(7));
        assert_eq!(team.founded_date, NaiveDate::from_ymd_opt(2014, 2, 24));
        assert_eq!(team.region_label(), "Europe");
    }

    #[test]
    fn test_team_region_label_falls_back_to_code() {
        let team = Team {
            region: Some("china".into()),
            ..Team::default()
        };
        assert_eq!(team.region_label(), "china");
    }

    #[test]
    fn test_team_detail_flattens_team_fields() {
        let detail: TeamDetail = serde_json::from_str(
            r#"{
                "id": 1, "name": "T1", "game_name": "League of Legends",
                "current_players": [{"id": 5, "nickname": "Faker", "team": 1}]
            }"#,
        )
        .unwrap();

        assert_eq!(detail.team.name, "T1");
        assert_eq!(detail.current_players.len(), 1);
        assert_eq!(detail.current_players[0].team, Some(TeamId(1)));
    }

    // =====================================================================
    // Tournaments
    // =====================================================================

    #[test]
    fn test_tournament_detail_expands_participants() {
        let detail: TournamentDetail = serde_json::from_str(
            r#"{
                "id": 3, "name": "Worlds", "start_date": "2024-09-25T00:00:00Z",
                "prize_pool": "2225000.00", "status": "completed",
                "participants": [{"id": 1, "name": "T1"}, {"id": 2, "name": "BLG"}]
            }"#,
        )
        .unwrap();

        assert_eq!(detail.tournament.name, "Worlds");
        assert_eq!(detail.tournament.prize_pool.as_deref(), Some("2225000.00"));
        assert_eq!(detail.participants.len(), 2);
        assert_eq!(detail.participants[1].name, "BLG");
    }

    #[test]
    fn test_tournament_list_participants_are_ids() {
        let t: Tournament =
            serde_json::from_str(r#"{"id": 3, "participants": [1, 2]}"#).unwrap();
        assert_eq!(t.participants, vec![TeamId(1), TeamId(2)]);
    }

    #[test]
    fn test_standing_group_fields_optional() {
        let s: Standing = serde_json::from_str(
            r#"{"team_id": 1, "team_name": "T1", "wins": 3, "losses": 1,
                "games_won": 7, "games_lost": 4, "game_differential": 3}"#,
        )
        .unwrap();
        assert_eq!(s.game_differential, 3);
        assert!(s.group.is_none());
    }

    // =====================================================================
    // Matches
    // =====================================================================

    #[test]
    fn test_match_state_reads_stats() {
        let m: Match = serde_json::from_str(
            r#"{"id": 9, "stats": {"state": "completed"}, "score": "3-1",
                "date_time": "2024-11-02T08:00:00+00:00"}"#,
        )
        .unwrap();
        assert_eq!(m.state(), "completed");
        assert!(m.date_time.is_some());
    }

    #[test]
    fn test_match_state_missing_is_empty() {
        assert_eq!(Match::default().state(), "");
    }

    #[test]
    fn test_match_update_decodes_null_teams() {
        let update: MatchUpdate = serde_json::from_str(
            r#"{"match_id": 9, "external_id": null, "team1": "T1", "team2": null,
                "score": "", "state": "unstarted", "date_time": null}"#,
        )
        .unwrap();
        assert_eq!(update.match_id, MatchId(9));
        assert!(update.team2.is_none());
    }

    #[test]
    fn test_search_results_empty_body_fields() {
        let results: SearchResults =
            serde_json::from_str(r#"{"teams": [], "players": [], "tournaments": []}"#)
                .unwrap();
        assert!(results.is_empty());
    }
}

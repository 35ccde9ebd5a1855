//! Client-side filtering and sorting of catalog listings.
//!
//! The list endpoints only filter by region; everything else a browsing
//! page offers (country, role, team, sort order) is derived here from the
//! records already fetched. All functions are pure.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use riftpulse_protocol::{Match, Player, Team, Tournament};

use crate::CatalogError;

/// The option value meaning "no filter".
pub const ALL: &str = "all";

/// How many matches [`upcoming_matches`] returns at most.
pub const UPCOMING_LIMIT: usize = 8;

/// Turns a selected option into a filter value: [`ALL`] means none.
pub fn choice(value: &str) -> Option<String> {
    (value != ALL).then(|| value.to_owned())
}

/// Case-insensitive text order, ties broken by exact comparison.
fn text_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// [`ALL`] followed by the distinct values in sorted order.
fn options<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.collect();
    std::iter::once(ALL)
        .chain(distinct)
        .map(str::to_owned)
        .collect()
}

fn selected(filter: Option<&str>, value: &str) -> bool {
    filter.is_none_or(|f| f == value)
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFilter {
    pub country: Option<String>,
    /// Compared against [`Team::region_label`].
    pub region: Option<String>,
}

impl TeamFilter {
    pub fn matches(&self, team: &Team) -> bool {
        selected(self.country.as_deref(), &team.country)
            && selected(self.region.as_deref(), team.region_label())
    }
}

/// Teams passing `filter`, sorted by name.
pub fn filter_teams(teams: &[Team], filter: &TeamFilter) -> Vec<Team> {
    let mut out: Vec<Team> = teams.iter().filter(|t| filter.matches(t)).cloned().collect();
    out.sort_by(|a, b| text_cmp(&a.name, &b.name));
    out
}

pub fn team_country_options(teams: &[Team]) -> Vec<String> {
    options(teams.iter().map(|t| t.country.as_str()))
}

pub fn team_region_options(teams: &[Team]) -> Vec<String> {
    options(teams.iter().map(Team::region_label))
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub team: Option<String>,
    pub country: Option<String>,
    pub role: Option<String>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        let team_ok = self
            .team
            .as_deref()
            .is_none_or(|team| player.team_name.as_deref() == Some(team));
        team_ok
            && selected(self.country.as_deref(), &player.country)
            && selected(self.role.as_deref(), &player.role)
    }
}

/// Players passing `filter`, sorted by nickname.
pub fn filter_players(players: &[Player], filter: &PlayerFilter) -> Vec<Player> {
    let mut out: Vec<Player> = players.iter().filter(|p| filter.matches(p)).cloned().collect();
    out.sort_by(|a, b| text_cmp(&a.nickname, &b.nickname));
    out
}

pub fn player_team_options(players: &[Player]) -> Vec<String> {
    options(
        players
            .iter()
            .filter_map(|p| p.team_name.as_deref())
            .filter(|s| !s.is_empty()),
    )
}

pub fn player_country_options(players: &[Player]) -> Vec<String> {
    options(players.iter().map(|p| p.country.as_str()).filter(|s| !s.is_empty()))
}

pub fn player_role_options(players: &[Player]) -> Vec<String> {
    options(players.iter().map(|p| p.role.as_str()).filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// Sort order of the match list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchSort {
    /// Newest first.
    #[default]
    DateDesc,
    DateAsc,
}

impl FromStr for MatchSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(Self::DateDesc),
            "date-asc" => Ok(Self::DateAsc),
            other => Err(CatalogError::UnknownSort(other.to_owned())),
        }
    }
}

/// Matches of tournaments in `region` (all when `None`), in `sort` order.
/// Matches without a date sort as the oldest.
pub fn filter_matches(matches: &[Match], region: Option<&str>, sort: MatchSort) -> Vec<Match> {
    let mut out: Vec<Match> = matches
        .iter()
        .filter(|m| region.is_none_or(|r| m.tournament_region.as_deref() == Some(r)))
        .cloned()
        .collect();
    match sort {
        MatchSort::DateAsc => out.sort_by_key(|m| m.date_time),
        MatchSort::DateDesc => out.sort_by(|a, b| b.date_time.cmp(&a.date_time)),
    }
    out
}

pub fn match_region_options(matches: &[Match]) -> Vec<String> {
    options(
        matches
            .iter()
            .filter_map(|m| m.tournament_region.as_deref())
            .filter(|s| !s.is_empty()),
    )
}

/// The next [`UPCOMING_LIMIT`] matches scheduled after `now`, soonest
/// first.
pub fn upcoming_matches(matches: &[Match], now: DateTime<Utc>) -> Vec<Match> {
    let mut out: Vec<Match> = matches
        .iter()
        .filter(|m| m.date_time.is_some_and(|at| at > now))
        .cloned()
        .collect();
    out.sort_by_key(|m| m.date_time);
    out.truncate(UPCOMING_LIMIT);
    out
}

// ---------------------------------------------------------------------------
// Tournaments
// ---------------------------------------------------------------------------

/// Sort order of the tournament list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TournamentSort {
    /// Latest start first, then game name.
    #[default]
    YearDesc,
    /// Earliest start first, then game name.
    YearAsc,
    /// Game name A→Z, then latest start first.
    GameAsc,
    /// Game name Z→A, then latest start first.
    GameDesc,
}

impl FromStr for TournamentSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year-desc" => Ok(Self::YearDesc),
            "year-asc" => Ok(Self::YearAsc),
            "game-asc" => Ok(Self::GameAsc),
            "game-desc" => Ok(Self::GameDesc),
            other => Err(CatalogError::UnknownSort(other.to_owned())),
        }
    }
}

pub fn sort_tournaments(tournaments: &[Tournament], sort: TournamentSort) -> Vec<Tournament> {
    fn game(t: &Tournament) -> &str {
        t.game_name.as_deref().unwrap_or_default()
    }

    let mut out = tournaments.to_vec();
    out.sort_by(|a, b| match sort {
        TournamentSort::YearDesc => b
            .start_date
            .cmp(&a.start_date)
            .then_with(|| text_cmp(game(a), game(b))),
        TournamentSort::YearAsc => a
            .start_date
            .cmp(&b.start_date)
            .then_with(|| text_cmp(game(a), game(b))),
        TournamentSort::GameAsc => text_cmp(game(a), game(b))
            .then_with(|| b.start_date.cmp(&a.start_date)),
        TournamentSort::GameDesc => text_cmp(game(b), game(a))
            .then_with(|| b.start_date.cmp(&a.start_date)),
    });
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use riftpulse_protocol::{MatchId, TournamentId};

    use super::*;

    fn team(name: &str, country: &str, region: Option<&str>, display: Option<&str>) -> Team {
        Team {
            name: name.into(),
            country: country.into(),
            region: region.map(Into::into),
            region_display: display.map(Into::into),
            ..Team::default()
        }
    }

    fn player(nickname: &str, team: Option<&str>, country: &str, role: &str) -> Player {
        Player {
            nickname: nickname.into(),
            team_name: team.map(Into::into),
            country: country.into(),
            role: role.into(),
            ..Player::default()
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 12, 0, 0).unwrap()
    }

    fn game(id: u64, day: Option<u32>, region: Option<&str>) -> Match {
        Match {
            id: MatchId(id),
            date_time: day.map(at),
            tournament_region: region.map(Into::into),
            ..Match::default()
        }
    }

    fn tournament(id: u64, game_name: &str, day: u32) -> Tournament {
        Tournament {
            id: TournamentId(id),
            game_name: Some(game_name.into()),
            start_date: Some(at(day)),
            ..Tournament::default()
        }
    }

    fn ids<T>(items: &[T], id: impl Fn(&T) -> u64) -> Vec<u64> {
        items.iter().map(id).collect()
    }

    // =====================================================================
    // choice()
    // =====================================================================

    #[test]
    fn test_choice_all_is_no_filter() {
        assert_eq!(choice("all"), None);
        assert_eq!(choice("KR"), Some("KR".to_owned()));
    }

    // =====================================================================
    // Teams
    // =====================================================================

    #[test]
    fn test_filter_teams_default_sorts_by_name() {
        let teams = [
            team("T1", "KR", None, None),
            team("Fnatic", "UK", None, None),
            team("g2 Esports", "DE", None, None),
        ];
        let names: Vec<_> = filter_teams(&teams, &TeamFilter::default())
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Fnatic", "g2 Esports", "T1"]);
    }

    #[test]
    fn test_filter_teams_region_matches_display_then_code() {
        let teams = [
            team("T1", "KR", Some("south_korea"), Some("South Korea")),
            team("Loud", "BR", Some("brazil"), None),
        ];

        let korea = TeamFilter { region: Some("South Korea".into()), ..TeamFilter::default() };
        assert_eq!(filter_teams(&teams, &korea).len(), 1);

        let brazil = TeamFilter { region: Some("brazil".into()), ..TeamFilter::default() };
        assert_eq!(filter_teams(&teams, &brazil)[0].name, "Loud");
    }

    #[test]
    fn test_team_country_options_distinct_with_all_first() {
        let teams = [
            team("A", "KR", None, None),
            team("B", "CN", None, None),
            team("C", "KR", None, None),
        ];
        assert_eq!(team_country_options(&teams), ["all", "CN", "KR"]);
    }

    // =====================================================================
    // Players
    // =====================================================================

    #[test]
    fn test_filter_players_combines_all_filters() {
        let players = [
            player("Faker", Some("T1"), "KR", "Mid"),
            player("Keria", Some("T1"), "KR", "Support"),
            player("Caps", Some("G2"), "DK", "Mid"),
        ];
        let filter = PlayerFilter {
            team: Some("T1".into()),
            role: Some("Mid".into()),
            ..PlayerFilter::default()
        };

        let found = filter_players(&players, &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].nickname, "Faker");
    }

    #[test]
    fn test_filter_players_team_filter_excludes_free_agents() {
        let players = [player("Solo", None, "KR", "Top")];
        let filter = PlayerFilter { team: Some("T1".into()), ..PlayerFilter::default() };
        assert!(filter_players(&players, &filter).is_empty());
    }

    #[test]
    fn test_player_options_skip_empty_values() {
        let players = [
            player("A", Some("T1"), "", "Mid"),
            player("B", None, "KR", ""),
        ];
        assert_eq!(player_team_options(&players), ["all", "T1"]);
        assert_eq!(player_country_options(&players), ["all", "KR"]);
        assert_eq!(player_role_options(&players), ["all", "Mid"]);
    }

    // =====================================================================
    // Matches
    // =====================================================================

    #[test]
    fn test_filter_matches_default_is_newest_first() {
        let matches = [game(1, Some(3), None), game(2, Some(9), None), game(3, None, None)];
        let sorted = filter_matches(&matches, None, MatchSort::default());
        assert_eq!(ids(&sorted, |m| m.id.0), [2, 1, 3]);
    }

    #[test]
    fn test_filter_matches_region_and_ascending() {
        let matches = [
            game(1, Some(9), Some("LCK")),
            game(2, Some(3), Some("LEC")),
            game(3, Some(5), Some("LCK")),
        ];
        let sorted = filter_matches(&matches, Some("LCK"), MatchSort::DateAsc);
        assert_eq!(ids(&sorted, |m| m.id.0), [3, 1]);
    }

    #[test]
    fn test_match_sort_from_str_unknown_returns_error() {
        assert_eq!("date-asc".parse::<MatchSort>().unwrap(), MatchSort::DateAsc);
        assert!(matches!(
            "newest".parse::<MatchSort>(),
            Err(CatalogError::UnknownSort(s)) if s == "newest"
        ));
    }

    #[test]
    fn test_upcoming_matches_future_only_soonest_first() {
        let matches = [
            game(1, Some(1), None),
            game(2, Some(20), None),
            game(3, Some(15), None),
            game(4, None, None),
        ];
        let upcoming = upcoming_matches(&matches, at(10));
        assert_eq!(ids(&upcoming, |m| m.id.0), [3, 2]);
    }

    #[test]
    fn test_upcoming_matches_caps_at_limit() {
        let matches: Vec<Match> = (1..=12).map(|d| game(u64::from(d), Some(d + 10), None)).collect();
        let upcoming = upcoming_matches(&matches, at(1));
        assert_eq!(upcoming.len(), UPCOMING_LIMIT);
        assert_eq!(upcoming[0].id, MatchId(1));
    }

    // =====================================================================
    // Tournaments
    // =====================================================================

    #[test]
    fn test_sort_tournaments_year_desc_ties_by_game() {
        let list = [
            tournament(1, "LoL", 1),
            tournament(2, "Valorant", 9),
            tournament(3, "CS2", 9),
        ];
        let sorted = sort_tournaments(&list, TournamentSort::YearDesc);
        assert_eq!(ids(&sorted, |t| t.id.0), [3, 2, 1]);
    }

    #[test]
    fn test_sort_tournaments_game_desc_ties_by_latest() {
        let list = [
            tournament(1, "LoL", 1),
            tournament(2, "LoL", 9),
            tournament(3, "CS2", 5),
        ];
        let sorted = sort_tournaments(&list, TournamentSort::GameDesc);
        assert_eq!(ids(&sorted, |t| t.id.0), [2, 1, 3]);
    }

    #[test]
    fn test_sort_tournaments_year_asc_oldest_first() {
        let list = [tournament(1, "LoL", 9), tournament(2, "LoL", 1)];
        let sorted = sort_tournaments(&list, TournamentSort::YearAsc);
        assert_eq!(ids(&sorted, |t| t.id.0), [2, 1]);
    }
}

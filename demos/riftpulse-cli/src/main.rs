use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use riftpulse::catalog::views::{
    self, MatchSort, PlayerFilter, TeamFilter, TournamentSort, choice,
};
use riftpulse::prelude::*;

#[derive(Parser)]
#[command(name = "riftpulse", about = "Browse League of Legends esports from the terminal", version)]
struct Cli {
    /// Root address of the backend.
    #[arg(long, env = "RIFTPULSE_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Session file. Defaults to the platform data directory.
    #[arg(long, env = "RIFTPULSE_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in.
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "RIFTPULSE_PASSWORD")]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        /// Password confirmation.
        #[arg(long)]
        confirm: String,
    },
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Permanently delete the signed-in account.
    DeleteAccount {
        /// Required to actually delete.
        #[arg(long)]
        yes: bool,
    },
    /// List teams.
    Teams {
        /// Server-side region; defaults to the saved preference.
        #[arg(long, value_parser = parse_region)]
        region: Option<Region>,
        #[arg(long, default_value = views::ALL)]
        country: String,
    },
    /// List players.
    Players {
        #[arg(long, value_parser = parse_region)]
        region: Option<Region>,
        #[arg(long, default_value = views::ALL)]
        team: String,
        #[arg(long, default_value = views::ALL)]
        country: String,
        #[arg(long, default_value = views::ALL)]
        role: String,
    },
    /// List matches.
    Matches {
        #[arg(long)]
        tournament: Option<u64>,
        /// Tournament region label, as shown in the list.
        #[arg(long, default_value = views::ALL)]
        league: String,
        /// `date-desc` or `date-asc`.
        #[arg(long, default_value = "date-desc")]
        sort: MatchSort,
        /// Only the next few scheduled matches.
        #[arg(long)]
        upcoming: bool,
    },
    /// List tournaments.
    Tournaments {
        #[arg(long, value_parser = parse_region)]
        region: Option<Region>,
        /// `year-desc`, `year-asc`, `game-asc` or `game-desc`.
        #[arg(long, default_value = "year-desc")]
        sort: TournamentSort,
    },
    /// Search teams, players and tournaments.
    Search { query: String },
    /// Show the signed-in user's favorite teams and matches.
    Favorites,
    /// Add or remove a favorite team.
    FavoriteTeam { id: u64 },
    /// Add or remove a favorite match.
    FavoriteMatch { id: u64 },
    /// Show or set the preferred region.
    Region {
        #[arg(value_parser = parse_region)]
        region: Option<Region>,
    },
    /// Show the theme, or `toggle` it.
    Theme { action: Option<String> },
    /// Follow live match updates until the server closes the feed.
    Live,
}

fn parse_region(s: &str) -> Result<Region, String> {
    Region::parse(s).ok_or_else(|| {
        let ids: Vec<_> = Region::ALL_REGIONS.iter().map(|r| r.id()).collect();
        format!("unknown region `{s}`, expected one of: {}", ids.join(", "))
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    riftpulse::init_tracing_with("warn");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), RiftPulseError> {
    let config = SessionConfig {
        base_url: cli.base_url,
        store_path: cli.store.or_else(SessionConfig::default_store_path),
    };
    let client = RiftPulseClient::builder().session_config(config).build().await?;
    let session = client.session();
    let catalog = client.catalog();
    let prefs = client.preferences();

    match cli.command {
        Command::Login { username, password } => {
            let user = session.login(&username, &password).await?;
            println!("signed in as {}", user.username);
        }
        Command::Register { username, email, password, confirm } => {
            let user = session.register(&username, &email, &password, &confirm).await?;
            println!("welcome, {}", user.username);
        }
        Command::Logout => {
            session.logout().await;
            println!("signed out");
        }
        Command::Whoami => match session.current_user() {
            Some(user) => {
                println!("{} (#{})", user.username, user.id);
                if let Some(email) = user.email() {
                    println!("email: {email}");
                }
                println!(
                    "favorites: {} teams, {} matches",
                    user.favorite_teams.len(),
                    user.favorite_matches.len()
                );
            }
            None => println!("not signed in"),
        },
        Command::DeleteAccount { yes } => {
            if !yes {
                println!("pass --yes to delete the account");
                return Ok(());
            }
            session.delete_account().await?;
            println!("account deleted");
        }
        Command::Teams { region, country } => {
            let teams = catalog.teams(region.unwrap_or_else(|| prefs.region())).await?;
            let filter = TeamFilter { country: choice(&country), region: None };
            for team in views::filter_teams(&teams, &filter) {
                println!("{:>5}  {:<28} {:<16} {}", team.id, team.name, team.country, team.region_label());
            }
        }
        Command::Players { region, team, country, role } => {
            let players = catalog.players(region.unwrap_or_else(|| prefs.region())).await?;
            let filter = PlayerFilter {
                team: choice(&team),
                country: choice(&country),
                role: choice(&role),
            };
            for p in views::filter_players(&players, &filter) {
                println!(
                    "{:>5}  {:<16} {:<10} {}",
                    p.id,
                    p.nickname,
                    p.role,
                    p.team_name.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Matches { tournament, league, sort, upcoming } => {
            let matches = catalog.matches(tournament.map(TournamentId)).await?;
            let shown = if upcoming {
                views::upcoming_matches(&matches, Utc::now())
            } else {
                views::filter_matches(&matches, choice(&league).as_deref(), sort)
            };
            for m in shown {
                println!(
                    "{:>6}  {}  {} vs {}  {}",
                    m.id,
                    when(m.date_time),
                    m.team1_name.as_deref().unwrap_or("TBD"),
                    m.team2_name.as_deref().unwrap_or("TBD"),
                    m.score
                );
            }
        }
        Command::Tournaments { region, sort } => {
            let list = catalog.tournaments(region.unwrap_or_else(|| prefs.region())).await?;
            for t in views::sort_tournaments(&list, sort) {
                println!("{:>5}  {}  {:<32} {}", t.id, when(t.start_date), t.name, t.status);
            }
        }
        Command::Search { query } => {
            let results = catalog.search(&query).await?;
            if results.is_empty() {
                println!("no results");
            }
            for team in &results.teams {
                println!("team        {:>5}  {}", team.id, team.name);
            }
            for player in &results.players {
                println!("player      {:>5}  {}", player.id, player.nickname);
            }
            for t in &results.tournaments {
                println!("tournament  {:>5}  {}", t.id, t.name);
            }
        }
        Command::Favorites => {
            for team in catalog.favorite_teams().await? {
                println!("team   {:>5}  {}", team.team.id, team.team.name);
            }
            for m in catalog.favorite_matches().await? {
                println!(
                    "match  {:>5}  {} vs {}",
                    m.id,
                    m.team1_name.as_deref().unwrap_or("TBD"),
                    m.team2_name.as_deref().unwrap_or("TBD")
                );
            }
        }
        Command::FavoriteTeam { id } => {
            let toggle = session.toggle_favorite_team(TeamId(id)).await?;
            println!("team {id}: {}", if toggle.is_favorite { "added" } else { "removed" });
        }
        Command::FavoriteMatch { id } => {
            let toggle = session.toggle_favorite_match(MatchId(id)).await?;
            println!("match {id}: {}", if toggle.is_favorite { "added" } else { "removed" });
        }
        Command::Region { region } => {
            if let Some(region) = region {
                prefs.set_region(region)?;
            }
            println!("{}", prefs.region());
        }
        Command::Theme { action } => {
            let theme = match action.as_deref() {
                Some("toggle") => prefs.toggle_theme()?,
                Some(other) => {
                    prefs.set_theme(Theme::from_stored(other))?;
                    prefs.theme()
                }
                None => prefs.theme(),
            };
            println!("{theme}");
        }
        Command::Live => {
            let feed = client.live_feed().await?;
            println!("following {}", feed.url());
            loop {
                match feed.next().await {
                    Ok(Some(update)) => println!(
                        "{:>6}  {} vs {}  {}  {}",
                        update.match_id,
                        update.team1.as_deref().unwrap_or("TBD"),
                        update.team2.as_deref().unwrap_or("TBD"),
                        update.score,
                        update.state
                    ),
                    Ok(None) => break,
                    Err(riftpulse::catalog::CatalogError::Protocol(e)) => {
                        tracing::warn!(error = %e, "skipping malformed update");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Ok(())
}

fn when(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "TBD".to_owned())
}

//! # Rift Pulse
//!
//! Client for the Rift Pulse esports backend.
//!
//! One [`RiftPulseClient`] holds the signed-in session, keeps its tokens
//! on disk, refreshes an expired access token behind the caller's back,
//! and exposes the team, player, tournament and match catalog.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use riftpulse::prelude::*;
//!
//! # async fn run() -> Result<(), RiftPulseError> {
//! let client = RiftPulseClient::builder()
//!     .base_url("http://localhost:8000")
//!     .build()
//!     .await?;
//!
//! let region = client.preferences().region();
//! for team in client.catalog().teams(region).await? {
//!     println!("{}", team.name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod logging;

pub use client::{RiftPulseClient, RiftPulseClientBuilder, Session};
pub use error::RiftPulseError;
pub use logging::{DEFAULT_FILTER, init_tracing, init_tracing_with};

pub use riftpulse_catalog as catalog;
pub use riftpulse_protocol as protocol;
pub use riftpulse_session as session;
pub use riftpulse_transport as transport;

pub mod prelude {
    pub use crate::{RiftPulseClient, RiftPulseClientBuilder, RiftPulseError};
    pub use riftpulse_catalog::views::{MatchSort, PlayerFilter, TeamFilter, TournamentSort};
    pub use riftpulse_catalog::{
        CatalogApi, MatchFeed, Preferences, Region, SearchConfig, SearchDebouncer, Theme,
    };
    pub use riftpulse_protocol::{
        Match, MatchId, MatchUpdate, Player, PlayerId, SearchResults, Team, TeamId, Tournament,
        TournamentId, User,
    };
    pub use riftpulse_session::{AuthFailure, SessionConfig, SessionSnapshot};
    pub use riftpulse_transport::HttpConfig;
}

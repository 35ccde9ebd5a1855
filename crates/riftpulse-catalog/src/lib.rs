//! Esports catalog browsing for Rift Pulse.
//!
//! Everything a signed-out or signed-in visitor can look at:
//!
//! 1. **Catalog API**: teams, players, tournaments, matches, search
//!    ([`CatalogApi`])
//! 2. **Views**: client-side filters and sort orders ([`views`])
//! 3. **Preferences**: selected region and theme ([`Preferences`])
//! 4. **Search**: debounced search-as-you-type ([`SearchDebouncer`])
//! 5. **Live feed**: pushed match updates ([`MatchFeed`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Application (above)  ← CLI, UI
//!     ↕
//! Catalog Layer (this crate)  ← typed fetches, filters, debounce
//!     ↕
//! Session Layer (below)  ← every REST call goes through SessionManager
//! ```

mod api;
mod error;
mod live;
mod prefs;
mod region;
mod search;
pub mod views;

pub use api::{CatalogApi, MIN_QUERY_LEN};
pub use error::CatalogError;
pub use live::MatchFeed;
pub use prefs::{Preferences, REGION_KEY, THEME_KEY, Theme};
pub use region::Region;
pub use search::{SearchConfig, SearchDebouncer, SearchState};

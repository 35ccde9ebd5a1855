//! The fixed set of competitive regions the catalog can be narrowed to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A competitive region.
///
/// [`Region::All`] means "no region filter" and has no server-side code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    All,
    Europe,
    NorthAmerica,
    China,
    SouthKorea,
    Apac,
}

impl Region {
    /// Every region, in display order.
    pub const ALL_REGIONS: [Region; 6] = [
        Self::All,
        Self::Europe,
        Self::NorthAmerica,
        Self::China,
        Self::SouthKorea,
        Self::Apac,
    ];

    /// Stable identifier, as persisted in preferences.
    pub fn id(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Europe => "europe",
            Self::NorthAmerica => "north_america",
            Self::China => "china",
            Self::SouthKorea => "south_korea",
            Self::Apac => "apac",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "All Regions",
            Self::Europe => "Europe",
            Self::NorthAmerica => "North America",
            Self::China => "China",
            Self::SouthKorea => "South Korea",
            Self::Apac => "APAC",
        }
    }

    /// The value sent as the `region` query parameter, `None` for
    /// [`Region::All`].
    pub fn code(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.id()),
        }
    }

    /// Looks up a region by its identifier.
    pub fn parse(id: &str) -> Option<Region> {
        Self::ALL_REGIONS.into_iter().find(|r| r.id() == id)
    }

    /// Like [`parse`](Self::parse), but unknown identifiers mean
    /// [`Region::All`].
    pub fn from_id(id: &str) -> Region {
        Self::parse(id).unwrap_or_default()
    }

    pub fn is_all(self) -> bool {
        self == Self::All
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

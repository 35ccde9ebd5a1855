//! Persisted browsing preferences: the selected region and the theme.
//!
//! Preferences share the durable [`SessionStore`] with the session
//! tokens, under their own keys. They are not cleared on logout.

use std::fmt;
use std::sync::Arc;

use riftpulse_session::SessionStore;
use serde::{Deserialize, Serialize};

use crate::{CatalogError, Region};

pub const REGION_KEY: &str = "leaguehub-region";
pub const THEME_KEY: &str = "leaguehub-theme";

/// Color theme of the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Anything other than `"light"` is the default dark theme.
    pub fn from_stored(value: &str) -> Theme {
        match value {
            "light" => Self::Light,
            _ => Self::Dark,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and writes preferences in a [`SessionStore`].
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn SessionStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The selected region, [`Region::All`] when unset or unknown.
    pub fn region(&self) -> Region {
        self.store
            .get(REGION_KEY)
            .map(|id| Region::from_id(&id))
            .unwrap_or_default()
    }

    /// # Errors
    /// Returns `CatalogError::Session` if the store cannot be written.
    pub fn set_region(&self, region: Region) -> Result<(), CatalogError> {
        self.store.set(REGION_KEY, region.id())?;
        tracing::debug!(region = region.id(), "region selected");
        Ok(())
    }

    /// Resets the region to [`Region::All`].
    ///
    /// # Errors
    /// Returns `CatalogError::Session` if the store cannot be written.
    pub fn clear_region(&self) -> Result<(), CatalogError> {
        self.set_region(Region::All)
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .map(|value| Theme::from_stored(&value))
            .unwrap_or_default()
    }

    /// # Errors
    /// Returns `CatalogError::Session` if the store cannot be written.
    pub fn set_theme(&self, theme: Theme) -> Result<(), CatalogError> {
        self.store.set(THEME_KEY, theme.as_str())?;
        Ok(())
    }

    /// Flips dark and light, returning the new theme.
    ///
    /// # Errors
    /// Returns `CatalogError::Session` if the store cannot be written.
    pub fn toggle_theme(&self) -> Result<Theme, CatalogError> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        tracing::debug!(%theme, "theme toggled");
        Ok(theme)
    }
}

#[cfg(test)]
mod tests {
    use riftpulse_session::MemoryStore;

    use super::*;

    fn prefs() -> (Preferences, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Preferences::new(store.clone()), store)
    }

    // =====================================================================
    // Region
    // =====================================================================

    #[test]
    fn test_region_unset_defaults_to_all() {
        let (prefs, _) = prefs();
        assert_eq!(prefs.region(), Region::All);
    }

    #[test]
    fn test_set_region_persists_id() {
        let (prefs, store) = prefs();
        prefs.set_region(Region::China).unwrap();

        assert_eq!(store.get(REGION_KEY).as_deref(), Some("china"));
        assert_eq!(prefs.region(), Region::China);
    }

    #[test]
    fn test_region_unknown_stored_value_falls_back_to_all() {
        let (prefs, store) = prefs();
        store.set(REGION_KEY, "mars").unwrap();
        assert_eq!(prefs.region(), Region::All);
    }

    #[test]
    fn test_clear_region_resets_to_all() {
        let (prefs, _) = prefs();
        prefs.set_region(Region::Europe).unwrap();
        prefs.clear_region().unwrap();
        assert_eq!(prefs.region(), Region::All);
    }

    // =====================================================================
    // Theme
    // =====================================================================

    #[test]
    fn test_theme_unset_defaults_to_dark() {
        let (prefs, _) = prefs();
        assert_eq!(prefs.theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_theme_flips_and_persists() {
        let (prefs, store) = prefs();

        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }
}

//! Light/dark theme preference

use crate::host::KeyValueStore;

/// Storage key in the durable store
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Saved preference first, system preference otherwise
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved {
            Some("dark") => Theme::Dark,
            Some("light") => Theme::Light,
            _ if prefers_dark => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn load(store: &dyn KeyValueStore, prefers_dark: bool) -> Self {
        Self::resolve(store.get(THEME_KEY).as_deref(), prefers_dark)
    }

    /// Flip, persist and return the new theme
    pub fn toggle(self, store: &dyn KeyValueStore) -> Self {
        let next = match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
        store.set(THEME_KEY, next.as_str());
        next
    }

    /// Value for the `data-bs-theme` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// Chart legend and tooltip text color
    pub fn chart_text_color(&self) -> &'static str {
        if self.is_dark() {
            "#fff"
        } else {
            "#666"
        }
    }

    /// Doughnut segment border, matching the card background
    pub fn chart_border_color(&self) -> &'static str {
        if self.is_dark() {
            "#4a5568"
        } else {
            "#fff"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn test_saved_preference_beats_system() {
        assert_eq!(Theme::resolve(Some("light"), true), Theme::Light);
        assert_eq!(Theme::resolve(Some("dark"), false), Theme::Dark);
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(Some("sepia"), false), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = MemoryStore::new();
        let theme = Theme::load(&store, false);
        assert_eq!(theme, Theme::Light);

        let theme = theme.toggle(&store);
        assert_eq!(theme, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store, false), Theme::Dark);
    }
}

//! Light/dark display mode: a persisted preference, falling back to the terminal's own
//! colour scheme.

use std::{
    collections::{BTreeMap, HashMap},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::{error::PreferenceError, style::Palette};

/// The key the preference is stored under.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the exact stored spellings are recognized.
    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A best-effort string key/value store.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Stands in when there is nowhere to persist to.
#[derive(Debug, Default)]
pub struct NullPreferenceStore;
impl PreferenceStore for NullPreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
        Err(PreferenceError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
        Err(PreferenceError::Unavailable)
    }
}

/// Keeps preferences for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}
impl MemoryPreferenceStore {
    pub fn with(key: &str, value: &str) -> Self {
        Self {
            values: HashMap::from([(key.to_string(), value.to_string())]),
        }
    }
}
impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences in a TOML file, under a `[preferences]` table.
#[derive(Debug, Clone)]
pub struct TomlPreferenceStore {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    preferences: BTreeMap<String, String>,
}

impl TomlPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<StateFile, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.read()?.preferences.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut state = self.read()?;
        state
            .preferences
            .insert(key.to_string(), value.to_string());
        std::fs::write(&self.path, toml::to_string(&state)?)?;
        tracing::debug!("saved {key}={value} to {}", self.path.display());
        Ok(())
    }
}

/// Reports whether the environment prefers a dark appearance.
pub trait ColorSchemeProbe: Send {
    fn prefers_dark(&self) -> bool;
}

/// Reads the `COLORFGBG` convention (`"fg;bg"`, set by rxvt, Konsole and others).
#[derive(Debug, Clone, Default)]
pub struct EnvColorScheme {
    colorfgbg: Option<String>,
}
impl EnvColorScheme {
    pub const VAR: &str = "COLORFGBG";

    pub fn from_env() -> Self {
        Self {
            colorfgbg: std::env::var(Self::VAR).ok(),
        }
    }

    /// Background indices 0-6 and 8 are the dark half of the 16-colour palette.
    pub fn is_dark_background(colorfgbg: &str) -> bool {
        colorfgbg
            .rsplit(';')
            .next()
            .and_then(|bg| bg.trim().parse::<u8>().ok())
            .is_some_and(|bg| bg <= 6 || bg == 8)
    }
}
impl ColorSchemeProbe for EnvColorScheme {
    fn prefers_dark(&self) -> bool {
        self.colorfgbg
            .as_deref()
            .is_some_and(Self::is_dark_background)
    }
}

/// Applies and persists the display mode.
///
/// The applied mode lives only in the marker: `Some(Dark)` when dark is applied,
/// `None` for the default light appearance.
pub struct ThemeManager {
    store: Box<dyn PreferenceStore>,
    probe: Box<dyn ColorSchemeProbe>,
    marker: Option<Theme>,
}

impl ThemeManager {
    pub fn new(store: Box<dyn PreferenceStore>, probe: Box<dyn ColorSchemeProbe>) -> Self {
        Self {
            store,
            probe,
            marker: None,
        }
    }

    /// Applies the stored preference if it is valid, else dark if the environment
    /// prefers it. Otherwise the default appearance is left alone. Nothing is persisted.
    pub fn init_theme(&mut self) {
        let stored = match self.store.get(THEME_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("could not read theme preference: {e}");
                None
            }
        };

        if let Some(theme) = stored.as_deref().and_then(Theme::parse) {
            tracing::info!("applying stored {theme} theme");
            self.apply(theme);
            return;
        }
        if let Some(value) = stored {
            tracing::debug!("ignoring unrecognized stored theme {value:?}");
        }

        if self.probe.prefers_dark() {
            tracing::info!("environment prefers dark, applying dark theme");
            self.apply(Theme::Dark);
        }
    }

    /// Flips whatever the marker currently says and persists the result.
    pub fn toggle_theme(&mut self) {
        let is_dark = self.marker == Some(Theme::Dark);
        let next = if is_dark { Theme::Light } else { Theme::Dark };
        self.apply(next);
        if let Err(e) = self.store.set(THEME_KEY, next.as_str()) {
            tracing::warn!("could not persist theme preference: {e}");
        }
    }

    pub fn apply(&mut self, theme: Theme) {
        self.marker = match theme {
            Theme::Dark => Some(Theme::Dark),
            Theme::Light => None,
        };
    }

    pub fn marker(&self) -> Option<Theme> {
        self.marker
    }

    pub fn current(&self) -> Theme {
        self.marker.unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.current())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct FixedScheme(bool);
    impl ColorSchemeProbe for FixedScheme {
        fn prefers_dark(&self) -> bool {
            self.0
        }
    }

    /// A memory store whose contents stay observable after it is boxed.
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryPreferenceStore>>);
    impl PreferenceStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            self.0.lock().unwrap().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.lock().unwrap().set(key, value)
        }
    }

    fn manager(store: impl PreferenceStore + 'static, prefers_dark: bool) -> ThemeManager {
        let mut manager = ThemeManager::new(Box::new(store), Box::new(FixedScheme(prefers_dark)));
        manager.init_theme();
        manager
    }

    #[test]
    fn test_stored_preference_wins_over_environment() {
        let light = manager(MemoryPreferenceStore::with(THEME_KEY, "light"), true);
        assert_eq!(light.marker(), None);
        assert_eq!(light.current(), Theme::Light);

        let dark = manager(MemoryPreferenceStore::with(THEME_KEY, "dark"), false);
        assert_eq!(dark.marker(), Some(Theme::Dark));
    }

    #[test]
    fn test_unset_falls_back_to_environment() {
        assert_eq!(manager(MemoryPreferenceStore::default(), true).current(), Theme::Dark);
        assert_eq!(manager(MemoryPreferenceStore::default(), false).marker(), None);
    }

    #[test]
    fn test_unrecognized_value_is_treated_as_unset() {
        let store = SharedStore::default();
        store.0.lock().unwrap().set(THEME_KEY, "Dark ").unwrap();

        let theme = manager(store.clone(), true);
        assert_eq!(theme.current(), Theme::Dark);
        // Falling back never rewrites what is stored.
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("Dark "));

        assert_eq!(
            manager(MemoryPreferenceStore::with(THEME_KEY, "solarized"), false).current(),
            Theme::Light
        );
    }

    #[test]
    fn test_detected_preference_is_not_persisted() {
        let store = SharedStore::default();
        manager(store.clone(), true);
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let store = SharedStore::default();
        let mut theme = manager(store.clone(), false);

        theme.toggle_theme();
        assert_eq!(theme.marker(), Some(Theme::Dark));
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        theme.toggle_theme();
        assert_eq!(theme.marker(), None);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_unavailable_storage_still_works_for_the_session() {
        let mut theme = manager(NullPreferenceStore, true);
        assert_eq!(theme.current(), Theme::Dark);

        theme.toggle_theme();
        assert_eq!(theme.current(), Theme::Light);
        theme.toggle_theme();
        assert_eq!(theme.current(), Theme::Dark);
    }

    #[test]
    fn test_toml_store_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf-state.toml");

        let mut store = TomlPreferenceStore::new(&path);
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "dark").unwrap();
        store.set("other", "kept").unwrap();

        let reopened = TomlPreferenceStore::new(&path);
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("kept"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[preferences]"));
    }

    #[test]
    fn test_toml_store_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf-state.toml");
        std::fs::write(&path, "preferences = [").unwrap();

        let store = TomlPreferenceStore::new(&path);
        assert!(matches!(store.get(THEME_KEY), Err(PreferenceError::Parse(_))));

        // A broken file degrades to the environment preference.
        assert_eq!(manager(store, true).current(), Theme::Dark);
    }

    #[test]
    fn test_colorfgbg_parsing() {
        assert!(EnvColorScheme::is_dark_background("15;0"));
        assert!(EnvColorScheme::is_dark_background("15;default;8"));
        assert!(!EnvColorScheme::is_dark_background("0;15"));
        assert!(!EnvColorScheme::is_dark_background("0;7"));
        assert!(!EnvColorScheme::is_dark_background("garbage"));
        assert!(!EnvColorScheme::default().prefers_dark());
    }
}

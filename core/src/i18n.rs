use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::errors::{ChatbotError, ChatbotResult};

/// Key under which the language preference is persisted
pub const PREFERRED_LANGUAGE_KEY: &str = "preferredLanguage";

pub const NAMESPACES: [&str; 7] = [
    "common",
    "auth",
    "dashboard",
    "engineers",
    "assignments",
    "projects",
    "reports",
];
pub const DEFAULT_NAMESPACE: &str = "common";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ja];

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
        }
    }

    /// Short label for a switcher button
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "EN",
            Language::Ja => "JA",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = ChatbotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            other => Err(ChatbotError::ConfigError(format!(
                "Unsupported language '{}', expected one of: en, ja",
                other
            ))),
        }
    }
}

/// Persistence for small user preferences
pub trait PreferenceStore: Send + Sync + Debug {
    fn load(&self, key: &str) -> ChatbotResult<Option<String>>;

    fn save(&self, key: &str, value: &str) -> ChatbotResult<()>;
}

pub type PreferenceStoreRef = Arc<dyn PreferenceStore>;

/// In-memory implementation of PreferenceStore
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load(&self, key: &str) -> ChatbotResult<Option<String>> {
        let values = self.values.read().map_err(|e| {
            ChatbotError::StorageError(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> ChatbotResult<()> {
        let mut values = self.values.write().map_err(|e| {
            ChatbotError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat TOML table in a file
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ChatbotResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            ChatbotError::StorageError(format!(
                "Failed to parse preferences at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> ChatbotResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn save(&self, key: &str, value: &str) -> ChatbotResult<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        let content = toml::to_string(&values).map_err(|e| {
            ChatbotError::StorageError(format!("Failed to serialize preferences: {}", e))
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        debug!(key, value, path = %self.path.display(), "Saved preference");
        Ok(())
    }
}

/// Tracks the active UI language and persists changes through a store
#[derive(Debug, Clone)]
pub struct LanguageSwitcher {
    current: Language,
    store: PreferenceStoreRef,
}

impl LanguageSwitcher {
    /// Picks the explicitly configured language, then the stored one, then English
    pub fn resolve(explicit: Option<&str>, store: PreferenceStoreRef) -> Self {
        let configured = explicit.and_then(|code| match code.parse::<Language>() {
            Ok(language) => Some(language),
            Err(e) => {
                warn!(error = %e, "Ignoring configured language");
                None
            }
        });

        let current = configured
            .or_else(|| Self::stored(&*store))
            .unwrap_or_default();

        Self { current, store }
    }

    fn stored(store: &dyn PreferenceStore) -> Option<Language> {
        match store.load(PREFERRED_LANGUAGE_KEY) {
            Ok(Some(code)) => match code.parse() {
                Ok(language) => Some(language),
                Err(_) => {
                    warn!(code = %code, "Stored language is not supported, falling back to en");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Could not read stored language");
                None
            }
        }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Persists the new language and makes it current
    pub fn switch(&mut self, language: Language) -> ChatbotResult<()> {
        self.store.save(PREFERRED_LANGUAGE_KEY, language.code())?;
        self.current = language;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_to_english() {
        let switcher = LanguageSwitcher::resolve(None, Arc::new(InMemoryPreferenceStore::new()));
        assert_eq!(switcher.current(), Language::En);
    }

    #[test]
    fn test_explicit_language_wins_over_stored() {
        let store = Arc::new(InMemoryPreferenceStore::new());
        store.save(PREFERRED_LANGUAGE_KEY, "en").unwrap();

        let switcher = LanguageSwitcher::resolve(Some("ja"), store);
        assert_eq!(switcher.current(), Language::Ja);
    }

    #[test]
    fn test_unknown_stored_language_falls_back() {
        let store = Arc::new(InMemoryPreferenceStore::new());
        store.save(PREFERRED_LANGUAGE_KEY, "fr").unwrap();

        let switcher = LanguageSwitcher::resolve(Some("xx"), store);
        assert_eq!(switcher.current(), Language::En);
    }

    #[test]
    fn test_switch_persists_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.toml");
        let store: PreferenceStoreRef = Arc::new(FilePreferenceStore::new(&path));

        let mut switcher = LanguageSwitcher::resolve(None, store.clone());
        switcher.switch(Language::Ja).unwrap();
        assert_eq!(switcher.current(), Language::Ja);

        let reopened = LanguageSwitcher::resolve(None, Arc::new(FilePreferenceStore::new(&path)));
        assert_eq!(reopened.current(), Language::Ja);
        assert_eq!(
            store.load(PREFERRED_LANGUAGE_KEY).unwrap().as_deref(),
            Some("ja")
        );
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("JA".parse::<Language>().unwrap(), Language::Ja);
        assert!("de".parse::<Language>().is_err());
        assert_eq!(Language::Ja.label(), "JA");
    }
}

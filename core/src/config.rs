use crate::errors::{ChatbotError, ChatbotResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "attendance-assistant";
const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the chatbot client and its front ends
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ChatbotConfig {
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub language: Option<String>,
    pub user_name: Option<String>,
    pub strict_validation: Option<bool>,
}

impl ChatbotConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> ChatbotResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ChatbotError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                ChatbotError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> ChatbotResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            ChatbotError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ChatbotError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            ChatbotError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            auth_token: other.auth_token.clone().or_else(|| self.auth_token.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            language: other.language.clone().or_else(|| self.language.clone()),
            user_name: other.user_name.clone().or_else(|| self.user_name.clone()),
            strict_validation: other.strict_validation.or(self.strict_validation),
        }
    }

    /// Overlays values from `ATTENDANCE_*` environment variables
    pub fn with_env_overrides(&self) -> Self {
        let from_env = Self {
            base_url: env_value("ATTENDANCE_API_URL"),
            auth_token: env_value("ATTENDANCE_API_TOKEN"),
            timeout_secs: env_value("ATTENDANCE_TIMEOUT_SECS").and_then(|v| v.parse().ok()),
            log_level: env_value("ATTENDANCE_LOG_LEVEL"),
            language: env_value("ATTENDANCE_LANGUAGE"),
            user_name: env_value("ATTENDANCE_USER_NAME"),
            strict_validation: env_value("ATTENDANCE_STRICT_VALIDATION")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false")),
        };
        self.merge(&from_env)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    pub fn strict_validation(&self) -> bool {
        self.strict_validation.unwrap_or(false)
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> ChatbotResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        ChatbotError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> ChatbotResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let config = ChatbotConfig::load_from_file(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, ChatbotConfig::default());
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.strict_validation());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = ChatbotConfig {
            base_url: Some("https://hr.example.com/api".to_string()),
            timeout_secs: Some(5),
            language: Some("ja".to_string()),
            ..Default::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = ChatbotConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = ChatbotConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ChatbotError::ConfigError(_)));
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = ChatbotConfig {
            base_url: Some("http://a".to_string()),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        let other = ChatbotConfig {
            base_url: Some("http://b".to_string()),
            ..Default::default()
        };

        let merged = base.merge(&other);
        assert_eq!(merged.base_url(), "http://b");
        assert_eq!(merged.log_level(), "debug");
    }
}

//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result, bail};
use moviedeck_api::links::DEFAULT_POSTER_SIZE;
use moviedeck_api::tmdb::Credential;
use serde::{Deserialize, Serialize};

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default search debounce in milliseconds.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Search box settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// TMDB configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TmdbConfig {
    /// v3 API key (environment variables take precedence).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Response language (e.g. `en-US`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Poster size segment (e.g. `w500`).
    #[serde(default = "default_image_size")]
    pub image_size: String,
    /// Whether searches include adult titles.
    #[serde(default)]
    pub include_adult: bool,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            language: default_language(),
            image_size: default_image_size(),
            include_adult: false,
        }
    }
}

/// Search box configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before searching.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

fn default_image_size() -> String {
    String::from(DEFAULT_POSTER_SIZE)
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Treats blank strings as unset.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Picks the TMDB credential.
    ///
    /// Precedence: `env_token` (bearer) > `env_key` > `tmdb.api_key`.
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is available.
    pub fn resolve_credential(
        &self,
        env_token: Option<String>,
        env_key: Option<String>,
    ) -> Result<Credential> {
        if let Some(token) = non_blank(env_token) {
            return Ok(Credential::Bearer(token));
        }
        if let Some(key) = non_blank(env_key).or_else(|| non_blank(self.tmdb.api_key.clone())) {
            return Ok(Credential::ApiKey(key));
        }
        bail!(
            "TMDB API key is required (set TMDB_API_KEY or TMDB_API_TOKEN, \
             or api_key under [tmdb] in config.toml)"
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.tmdb.api_key.is_none());
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.tmdb.image_size, "w500");
        assert!(!config.tmdb.include_adult);
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            tmdb: TmdbConfig {
                api_key: Some(String::from("abc123")),
                language: String::from("ja-JP"),
                image_size: String::from("w342"),
                include_adult: true,
            },
            search: SearchConfig { debounce_ms: 250 },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb]\napi_key = \"k\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.tmdb.api_key.as_deref(), Some("k"));
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_is_an_error() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[tmdb\n").unwrap();

        // Act
        let err = AppConfig::load(&path).unwrap_err();

        // Assert
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_credential_precedence() {
        // Arrange
        let mut config = AppConfig::default();
        config.tmdb.api_key = Some(String::from("from-config"));

        // Act & Assert
        assert_eq!(
            config
                .resolve_credential(Some(String::from("tok")), Some(String::from("env")))
                .unwrap(),
            Credential::Bearer(String::from("tok"))
        );
        assert_eq!(
            config
                .resolve_credential(None, Some(String::from("env")))
                .unwrap(),
            Credential::ApiKey(String::from("env"))
        );
        assert_eq!(
            config
                .resolve_credential(Some(String::from("  ")), None)
                .unwrap(),
            Credential::ApiKey(String::from("from-config"))
        );
    }

    #[test]
    fn test_missing_credential_is_an_error() {
        // Arrange
        let config = AppConfig::default();

        // Act
        let err = config
            .resolve_credential(None, Some(String::new()))
            .unwrap_err();

        // Assert
        assert!(err.to_string().starts_with("TMDB API key is required"));
    }
}

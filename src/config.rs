//! Runtime configuration
//!
//! Resolution order: built-in defaults, then `config/stepwise.toml` (or the
//! file named by `--config` / `STEPWISE_CONFIG`), then environment overrides.
//! A missing default config file is not an error; a missing explicit one is.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/stepwise.toml";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Answer provider settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Credential for the live backend; absent means offline mock mode
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
        }
    }
}

/// Session log settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub log_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub session: SessionConfig,
}

impl Config {
    /// Load from an explicit path, or the default path when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides through `lookup` so tests need not touch
    /// the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(model) = non_empty("STEPWISE_MODEL") {
            self.provider.model = model;
        }
        if let Some(dir) = non_empty("STEPWISE_LOG_DIR") {
            self.session.log_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::Invalid(format!(
                "provider.temperature must be within 0.0..=2.0, got {}",
                self.provider.temperature
            )));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "provider.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_offline() {
        let config = Config::default();
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.session.log_dir, PathBuf::from("logs"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [provider]
            model = "gpt-4.1-mini"
            "#,
        )
        .unwrap();
        assert_eq!(config.provider.model, "gpt-4.1-mini");
        assert_eq!(config.provider.temperature, 0.2);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("STEPWISE_LOG_DIR", "/tmp/stepwise"),
            ("STEPWISE_MODEL", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.session.log_dir, PathBuf::from("/tmp/stepwise"));
        assert_eq!(config.provider.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = Config::from_toml("[provider]\ntemperature = 5.0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(Config::from_toml("provider = 3").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stepwise.toml");
        std::fs::write(&path, "[session]\nlog_dir = \"custom\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.session.log_dir, PathBuf::from("custom"));
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ArchitectError;

/// Providers the auto-fill client knows how to talk to.
pub const PROVIDERS: &[&str] = &[
    "gemini",
    "openai",
    "anthropic",
    "openrouter",
    "lmstudio",
    "custom",
];

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

impl LlmConfig {
    /// Get the model, using provider-specific defaults if not set
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| match self.provider.as_str() {
                "gemini" => "gemini-2.5-flash",
                "anthropic" => "claude-sonnet-4-20250514",
                "openai" => "gpt-4o",
                "openrouter" => "google/gemini-2.5-flash",
                "lmstudio" => "",
                _ => "gpt-4o",
            })
    }

    /// Get the base URL, using provider-specific defaults if not set
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| match self.provider.as_str() {
                "gemini" => "https://generativelanguage.googleapis.com/v1beta",
                "anthropic" => "https://api.anthropic.com/v1",
                "openai" => "https://api.openai.com/v1",
                "openrouter" => "https://openrouter.ai/api/v1",
                "lmstudio" => "http://localhost:1234/v1",
                _ => "https://api.openai.com/v1",
            })
    }

    /// Check if this provider requires an API key
    pub fn requires_api_key(&self) -> bool {
        self.provider != "lmstudio"
    }

    /// Environment variable consulted when no key is configured
    pub fn env_var(&self) -> &'static str {
        match self.provider.as_str() {
            "gemini" => "GEMINI_API_KEY",
            "anthropic" => "ANTHROPIC_API_KEY",
            "openai" => "OPENAI_API_KEY",
            "openrouter" => "OPENROUTER_API_KEY",
            _ => "API_KEY",
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from file or default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::default_path()
        };

        let config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config from {:?}", config_path))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {:?}", config_path))?
        } else {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            Config::default()
        };

        Ok(config)
    }

    /// Default config path: ~/.config/prompt-architect/config.toml
    pub fn default_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("prompt-architect")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("prompt-architect")
            .join("config.toml")
    }

    /// Directory holding the local key-value store
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("prompt-architect")
        })
    }

    /// Get the API key from the config file, then the provider's environment
    /// variable.
    ///
    /// The local store's saved credential is consulted by the caller when this
    /// returns an error.
    pub fn api_key(&self) -> Result<String, ArchitectError> {
        if !self.llm.requires_api_key() {
            return Ok(self
                .llm
                .api_key
                .clone()
                .unwrap_or_else(|| "dummy".to_string()));
        }

        self.llm
            .api_key
            .clone()
            .or_else(|| std::env::var(self.llm.env_var()).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ArchitectError::MissingApiKey {
                provider: self.llm.provider.clone(),
            })
    }

    /// Set the provider and reset model/base_url to use defaults
    pub fn set_provider(&mut self, provider: &str) -> Result<(), ArchitectError> {
        if !PROVIDERS.contains(&provider) {
            return Err(ArchitectError::ConfigError(format!(
                "Unknown provider: {} (expected one of {})",
                provider,
                PROVIDERS.join(", ")
            )));
        }
        self.llm.provider = provider.to_string();
        self.llm.base_url = None;
        self.llm.model = None;
        Ok(())
    }

    /// Write config to the given path
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_gemini() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model(), "gemini-2.5-flash");
        assert!(config.llm.base_url().contains("generativelanguage"));
    }

    #[test]
    fn lmstudio_needs_no_key() {
        let mut config = Config::default();
        config.set_provider("lmstudio").unwrap();
        assert!(!config.llm.requires_api_key());
        assert_eq!(config.api_key().unwrap(), "dummy");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut config = Config::default();
        config.set_provider("custom").unwrap();
        config.llm.api_key = Some("   ".to_string());
        assert!(matches!(
            config.api_key(),
            Err(ArchitectError::MissingApiKey { .. })
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut config = Config::default();
        assert!(config.set_provider("bard").is_err());
        assert_eq!(config.llm.provider, "gemini");
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_provider("openai").unwrap();
        config.llm.model = Some("gpt-4o-mini".to_string());
        config.storage.data_dir = Some(dir.path().join("data"));
        config.write_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.llm.provider, "openai");
        assert_eq!(loaded.llm.model(), "gpt-4o-mini");
        assert_eq!(loaded.data_dir(), dir.path().join("data"));
    }
}

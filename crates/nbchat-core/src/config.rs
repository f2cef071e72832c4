//! Configuration management for nbchat
//!
//! Handles loading, saving, and managing application configuration
//! including the API key, model choice and approval settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::provider::{DEFAULT_BASE_URL, ModelCatalog, ModelPricing};

/// Default values shared by config and the CLI
pub mod defaults {
    pub const MODEL: &str = "openai/gpt-4.1-mini";
    pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
    /// Maximum model rounds in one turn
    pub const MAX_ROUNDS: usize = 25;
    /// Default tracing filter when neither RUST_LOG nor --verbose is given
    pub const LOG_LEVEL: &str = "warn";
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model identifier sent with every request
    pub model: String,
    /// API key (takes precedence over the environment)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable name for API key
    pub api_key_env: String,
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Upper bound on model rounds per turn
    pub max_rounds: usize,
    /// Approval settings
    pub approval: ApprovalConfig,
    /// Extra or replacement price entries for the model catalog
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelPricing>,
    /// General application settings
    pub general: GeneralConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: defaults::MODEL.to_string(),
            api_key: None,
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_rounds: defaults::MAX_ROUNDS,
            approval: ApprovalConfig::default(),
            models: Vec::new(),
            general: GeneralConfig::default(),
        }
    }
}

impl Config {
    /// Get the API key, checking the environment variable if not set directly
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }

    /// Reject values no turn could run with
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(Error::Config("max_rounds must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Built-in model catalog with configured overrides applied
    pub fn catalog(&self) -> ModelCatalog {
        ModelCatalog::builtin().with_overrides(self.models.iter().cloned())
    }
}

/// Approval policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    /// Tools that run without asking
    pub auto_approve: Vec<String>,
    /// Approve every tool call without asking
    pub approve_all: bool,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tracing filter directive, e.g. `warn` or `info,nbchat_core=debug`
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

/// Configuration manager for loading and saving config
pub struct ConfigManager {
    config_path: PathBuf,
    config: Config,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::with_path(config_path)
    }

    /// Create a config manager with a specific path
    pub fn with_path(config_path: PathBuf) -> Result<Self> {
        let config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            Config::default()
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Get the default config path
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("nbchat").join("config.toml"))
    }

    /// Load configuration from a file
    fn load_from_path(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(&self.config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&self.config_path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Set the API key stored in the config file
    pub fn set_api_key(&mut self, key: String) {
        self.config.api_key = Some(key);
    }

    /// Get the configured API key
    pub fn get_api_key(&self) -> Option<String> {
        self.config.get_api_key()
    }

    pub fn has_api_key(&self) -> bool {
        self.get_api_key().is_some()
    }
}

//! Configuration settings for the Krishi advisory server.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("config.toml"),
            PathBuf::from("krishi.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("krishi/config.toml"))
                .unwrap_or_default(),
            // Home directory
            dirs::home_dir()
                .map(|p| p.join(".krishi/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.ai.base_url.is_empty() {
            return Err(ConfigError::MissingField("ai.base_url".to_string()).into());
        }
        if self.ai.model.is_empty() {
            return Err(ConfigError::MissingField("ai.model".to_string()).into());
        }
        if self.ai.timeout_secs == 0 {
            return Err(ConfigError::Invalid("ai.timeout_secs must be > 0".to_string()).into());
        }
        if self.ai.max_concurrent_requests == 0 {
            return Err(
                ConfigError::Invalid("ai.max_concurrent_requests must be > 0".to_string()).into(),
            );
        }
        if !(0.0..=2.0).contains(&self.ai.temperature) {
            return Err(
                ConfigError::Invalid("ai.temperature must be within 0.0..=2.0".to_string()).into(),
            );
        }

        Ok(())
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Enable permissive CORS for browser clients.
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
        }
    }
}

/// AI gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Completion API base URL.
    pub base_url: String,
    /// Completion model identifier.
    pub model: String,
    /// API key. Falls back to the PERPLEXITY_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling parameter.
    pub top_p: f32,
    /// Search recency window for online models.
    pub search_recency_filter: String,
    /// Outbound request timeout.
    pub timeout_secs: u64,
    /// Bound on simultaneous outbound gateway calls.
    pub max_concurrent_requests: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.perplexity.ai".to_string(),
            model: "llama-3.1-sonar-small-128k-online".to_string(),
            api_key: None,
            temperature: 0.2,
            top_p: 0.9,
            search_recency_filter: "month".to_string(),
            timeout_secs: 30,
            max_concurrent_requests: 4,
        }
    }
}

/// Session authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session token lifetime in seconds. 0 disables expiry.
    pub session_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // One week
            session_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

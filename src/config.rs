//! Configuration management for Reelscript
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::catalog;
use crate::duration::{MAX_CUSTOM_MINUTES, MIN_CUSTOM_MINUTES};
use crate::error::{Result, ReelscriptError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted `generation.timeout_seconds`
///
/// Provider HTTP clients use this as their own request timeout so the
/// generation timeout is always the one that fires.
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Main configuration structure for Reelscript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Gemini, Ollama)
    pub provider: ProviderConfig,
    /// Generation defaults and limits
    #[serde(default)]
    pub generation: GenerationConfig,
    /// History storage settings
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Provider configuration
///
/// Specifies which generation backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// Google Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// Google Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use for Gemini
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Optional API base URL (useful for tests and local mocks)
    #[serde(default)]
    pub api_base: Option<String>,

    /// API key; when unset, `GEMINI_API_KEY` or the system keyring is used
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: None,
            api_key: None,
            temperature: default_temperature(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// Generation defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on a single backend call (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Template used when `--template` is omitted
    #[serde(default = "default_template")]
    pub default_template: String,

    /// Language used when `--language` is omitted
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Duration bucket used when `--duration` is omitted
    #[serde(default = "default_duration")]
    pub default_duration: String,

    /// Minutes used for the custom bucket when `--minutes` is omitted
    #[serde(default = "default_custom_minutes")]
    pub default_custom_minutes: u32,
}

fn default_timeout() -> u64 {
    120
}

fn default_template() -> String {
    "storytelling".to_string()
}

fn default_language() -> String {
    "vi".to_string()
}

fn default_duration() -> String {
    "short".to_string()
}

fn default_custom_minutes() -> u32 {
    5
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            default_template: default_template(),
            default_language: default_language(),
            default_duration: default_duration(),
            default_custom_minutes: default_custom_minutes(),
        }
    }
}

/// History storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Location of the history database; defaults to the user data directory
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "gemini".to_string(),
                gemini: GeminiConfig::default(),
                ollama: OllamaConfig::default(),
            },
            generation: GenerationConfig::default(),
            history: HistoryConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReelscriptError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ReelscriptError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("REELSCRIPT_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("REELSCRIPT_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("REELSCRIPT_GEMINI_API_BASE") {
            self.provider.gemini.api_base = Some(api_base);
        }

        if let Ok(host) = std::env::var("REELSCRIPT_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }

        if let Ok(model) = std::env::var("REELSCRIPT_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }

        if let Ok(timeout) = std::env::var("REELSCRIPT_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.generation.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid REELSCRIPT_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(language) = std::env::var("REELSCRIPT_LANGUAGE") {
            tracing::debug!(language = %language, "Env override: REELSCRIPT_LANGUAGE");
            self.generation.default_language = language;
        }

        if let Ok(db_path) = std::env::var("REELSCRIPT_HISTORY_DB") {
            tracing::debug!(db_path = %db_path, "Env override: REELSCRIPT_HISTORY_DB");
            self.history.db_path = Some(PathBuf::from(db_path));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            tracing::info!("Using history DB override from CLI: {}", path.display());
            self.history.db_path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// Ensures all configuration values are within acceptable ranges and that
    /// default selections exist in the catalog.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(ReelscriptError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["gemini", "ollama"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(ReelscriptError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        let timeout = self.generation.timeout_seconds;
        if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
            return Err(ReelscriptError::Config(format!(
                "generation.timeout_seconds must be between 1 and {}",
                MAX_TIMEOUT_SECONDS
            ))
            .into());
        }

        let temperature = self.provider.gemini.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ReelscriptError::Config(
                "provider.gemini.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        let minutes = self.generation.default_custom_minutes;
        if !(MIN_CUSTOM_MINUTES..=MAX_CUSTOM_MINUTES).contains(&minutes) {
            return Err(ReelscriptError::Config(format!(
                "generation.default_custom_minutes must be between {} and {}",
                MIN_CUSTOM_MINUTES, MAX_CUSTOM_MINUTES
            ))
            .into());
        }

        catalog::find_template(&self.generation.default_template)?;
        catalog::find_language(&self.generation.default_language)?;
        catalog::find_duration(&self.generation.default_duration)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

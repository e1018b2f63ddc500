//! Provider module for Reelscript
//!
//! This module contains the generation backend abstraction and
//! implementations for Google Gemini and Ollama.

pub mod base;
pub mod gemini;
pub mod ollama;

pub use base::{CompletionOptions, CompletionResponse, Message, Provider, TokenUsage};
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, ReelscriptError};

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `provider_override` - Optional provider type overriding `config.provider_type`
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
///
/// # Examples
///
/// ```
/// use reelscript::config::ProviderConfig;
/// use reelscript::providers::create_provider;
///
/// let config = ProviderConfig {
///     provider_type: "gemini".to_string(),
///     gemini: Default::default(),
///     ollama: Default::default(),
/// };
/// let provider = create_provider(&config, Some("ollama")).unwrap();
/// assert_eq!(provider.name(), "ollama");
/// ```
pub fn create_provider(
    config: &ProviderConfig,
    provider_override: Option<&str>,
) -> Result<Box<dyn Provider>> {
    let provider_type = provider_override.unwrap_or(&config.provider_type);

    match provider_type {
        "gemini" => Ok(Box::new(GeminiProvider::new(config.gemini.clone())?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config.ollama.clone())?)),
        _ => Err(ReelscriptError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, OllamaConfig};

    fn config(provider_type: &str) -> ProviderConfig {
        ProviderConfig {
            provider_type: provider_type.to_string(),
            gemini: GeminiConfig {
                api_key: Some("test-key".to_string()),
                ..Default::default()
            },
            ollama: OllamaConfig::default(),
        }
    }

    #[test]
    fn test_create_provider_invalid_type() {
        assert!(create_provider(&config("invalid"), None).is_err());
    }

    #[test]
    fn test_create_provider_from_config() {
        let provider = create_provider(&config("gemini"), None).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_create_provider_with_override() {
        let provider = create_provider(&config("gemini"), Some("ollama")).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_create_provider_with_invalid_override() {
        assert!(create_provider(&config("gemini"), Some("copilot")).is_err());
    }
}

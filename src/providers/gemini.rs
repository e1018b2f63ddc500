//! Google Gemini provider implementation for Reelscript
//!
//! Talks to the `generateContent` REST endpoint. System messages become the
//! request's `systemInstruction`; link resolution is delegated to the
//! backend's `url_context` tool.

use crate::config::{GeminiConfig, MAX_TIMEOUT_SECONDS};
use crate::error::{Result, ReelscriptError};
use crate::providers::{CompletionOptions, CompletionResponse, Message, Provider, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public Gemini API endpoint
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Keyring service name under which the API key is stored
pub const KEYRING_SERVICE: &str = "reelscript";

/// Keyring user name for the Gemini API key
pub const KEYRING_USER: &str = "gemini_api_key";

/// Google Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use reelscript::config::GeminiConfig;
/// use reelscript::providers::{CompletionOptions, GeminiProvider, Message, Provider};
///
/// # async fn example() -> reelscript::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("test-key".to_string()),
///     ..Default::default()
/// };
/// let provider = GeminiProvider::new(config)?;
/// let response = provider
///     .complete(&[Message::user("Hello!")], &CompletionOptions::default())
///     .await?;
/// println!("{}", response.text());
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// The API key is taken from the config, then `GEMINI_API_KEY`, then the
    /// system keyring.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if no API key can be found, or a provider
    /// error if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = resolve_api_key(&config)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(MAX_TIMEOUT_SECONDS))
            .user_agent(concat!("reelscript/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ReelscriptError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_API_BASE)
            .trim_end_matches('/');
        format!("{}/v1beta/models/{}:generateContent", base, self.config.model)
    }

    fn build_request(&self, messages: &[Message], options: &CompletionOptions) -> GeminiRequest {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.is_system())
            .map(|m| m.content.as_str())
            .collect();

        let system_instruction = if system_text.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(system_text.join("\n\n")),
                }],
            })
        };

        let contents = messages
            .iter()
            .filter(|m| !m.is_system())
            .map(|m| GeminiContent {
                // Gemini calls the assistant role "model"
                role: Some(if m.role == "assistant" { "model" } else { "user" }.to_string()),
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        let tools = if options.resolve_links {
            vec![serde_json::json!({ "url_context": {} })]
        } else {
            Vec::new()
        };

        GeminiRequest {
            system_instruction,
            contents,
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
            },
            tools,
        }
    }
}

/// Find the Gemini API key: config, then environment, then keyring
fn resolve_api_key(config: &GeminiConfig) -> Result<String> {
    if let Some(key) = config.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Ok(key.clone());
    }

    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            tracing::debug!("Using Gemini API key from GEMINI_API_KEY");
            return Ok(key);
        }
    }

    match keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).and_then(|e| e.get_password()) {
        Ok(key) if !key.is_empty() => {
            tracing::debug!("Using Gemini API key from system keyring");
            Ok(key)
        }
        Ok(_) | Err(keyring::Error::NoEntry) => {
            Err(ReelscriptError::MissingCredentials("gemini".to_string()).into())
        }
        Err(e) => {
            tracing::warn!("Keyring not available while looking up Gemini API key: {}", e);
            Err(ReelscriptError::MissingCredentials("gemini".to_string()).into())
        }
    }
}

/// Store a Gemini API key in the system keyring
pub fn store_api_key(api_key: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
    entry.set_password(api_key)?;
    Ok(())
}

/// Join the text parts of the first candidate
fn extract_text(response: &GeminiResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");
    Some(text)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse> {
        let request = self.build_request(messages, options);

        tracing::debug!(
            "Sending Gemini request: model={}, {} contents, url_context={}",
            self.config.model,
            request.contents.len(),
            options.resolve_links
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                ReelscriptError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(ReelscriptError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            ReelscriptError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(reason) = gemini_response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(
                ReelscriptError::Provider(format!("Gemini blocked the prompt: {}", reason)).into(),
            );
        }

        let text = extract_text(&gemini_response).ok_or_else(|| {
            ReelscriptError::Provider("Gemini response contained no candidates".to_string())
        })?;

        tracing::debug!(
            "Gemini response: finish_reason={:?}, chars={}",
            gemini_response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.as_deref()),
            text.chars().count()
        );

        let message = Message::assistant(text);
        Ok(match gemini_response.usage_metadata {
            Some(usage) => CompletionResponse::with_usage(
                message,
                TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count),
            ),
            None => CompletionResponse::new(message),
        })
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> GeminiProvider {
        GeminiProvider::new(GeminiConfig {
            api_key: Some("test-key".to_string()),
            api_base: Some("http://localhost:9".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_gemini_provider_creation_with_config_key() {
        let provider = test_provider();
        assert_eq!(provider.model(), "gemini-2.5-flash");
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.get_current_model().unwrap(), "gemini-2.5-flash");
    }

    #[test]
    fn test_endpoint_uses_api_base_and_model() {
        let provider = test_provider();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_splits_system_instruction() {
        let provider = test_provider();
        let messages = vec![
            Message::system("You write scripts."),
            Message::user("Topic: rain"),
        ];
        let request = provider.build_request(&messages, &CompletionOptions::default());
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json["systemInstruction"]["parts"][0]["text"],
            "You write scripts."
        );
        assert_eq!(json["contents"].as_array().unwrap().len(), 1);
        assert_eq!(json["contents"][0]["role"], "user");
        assert!(json.get("tools").is_none());
        assert!(json["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_build_request_enables_url_context_for_links() {
        let provider = test_provider();
        let options = CompletionOptions {
            resolve_links: true,
        };
        let request = provider.build_request(&[Message::user("https://example.com")], &options);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json["tools"][0].get("url_context").is_some());
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "world" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(extract_text(&response).is_none());
    }
}

//! Script generation
//!
//! Turns a [`GenerationRequest`] into narration text with exactly one call to
//! the configured [`Provider`]. The call is bounded by a timeout and can be
//! cancelled; any failure is reported as `ReelscriptError::Generation`.

use crate::catalog::{
    find_duration, find_language, find_template, DurationOption, InputMode, Language, Template,
};
use crate::duration::{calculate_target_length, TargetStats};
use crate::error::{Result, ReelscriptError};
use crate::prompts::build_messages;
use crate::providers::{CompletionOptions, Provider};

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Leading marker a backend uses to signal it could not write the script
pub const ERROR_MARKER: char = '⚠';

/// Everything needed to generate one script
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Idea, source text or link as entered by the user
    pub raw_input: String,
    /// How `raw_input` should be interpreted
    pub input_mode: InputMode,
    /// Structural template
    pub template: &'static Template,
    /// Output language
    pub language: &'static Language,
    /// Target duration bucket
    pub duration: &'static DurationOption,
    /// Minutes used when `duration` is the custom bucket
    pub custom_minutes: u32,
}

impl GenerationRequest {
    /// Build a request from catalog ids
    ///
    /// # Errors
    ///
    /// Returns `ReelscriptError::Config` if any id is not in the catalog
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::catalog::InputMode;
    /// use reelscript::generation::GenerationRequest;
    ///
    /// let request = GenerationRequest::from_ids(
    ///     "office workers sitting too long",
    ///     InputMode::Idea,
    ///     "storytelling",
    ///     "vi",
    ///     "custom",
    ///     5,
    /// )
    /// .unwrap();
    /// assert_eq!(request.stats().unwrap().target_chars, 4000);
    /// ```
    pub fn from_ids(
        raw_input: impl Into<String>,
        input_mode: InputMode,
        template_id: &str,
        language_id: &str,
        duration_id: &str,
        custom_minutes: u32,
    ) -> Result<Self> {
        Ok(Self {
            raw_input: raw_input.into(),
            input_mode,
            template: find_template(template_id)?,
            language: find_language(language_id)?,
            duration: find_duration(duration_id)?,
            custom_minutes,
        })
    }

    /// Whether the raw input is empty after trimming
    pub fn is_blank(&self) -> bool {
        self.raw_input.trim().is_empty()
    }

    /// Character budget for this request
    pub fn stats(&self) -> Result<TargetStats> {
        calculate_target_length(self.language.id, self.duration.id, self.custom_minutes)
    }
}

/// Check that a link-mode input is an absolute http(s) URL
fn validate_link(raw_input: &str) -> Result<Url> {
    let url = Url::parse(raw_input.trim())
        .map_err(|e| ReelscriptError::Config(format!("Invalid link '{}': {}", raw_input, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ReelscriptError::Config(format!(
            "Unsupported link scheme '{}': only http and https are allowed",
            other
        ))
        .into()),
    }
}

/// Reject backend output that is empty or shaped like an error
fn check_output(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ReelscriptError::Generation("Backend returned an empty script".to_string()).into());
    }
    if trimmed.starts_with(ERROR_MARKER) {
        return Err(ReelscriptError::Generation(format!(
            "Backend reported a failure: {}",
            trimmed
        ))
        .into());
    }
    Ok(trimmed.to_string())
}

/// Generate a narration script for `request`
///
/// Issues exactly one provider call; there are no retries. The call is
/// abandoned when `timeout` elapses or `cancel` fires.
///
/// # Errors
///
/// - `ReelscriptError::Config` for unknown catalog ids or an invalid link
/// - `ReelscriptError::Generation` for provider failure, timeout,
///   cancellation, empty output or output starting with the error marker
pub async fn generate_script(
    provider: &dyn Provider,
    request: &GenerationRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String> {
    let resolve_links = match request.input_mode {
        InputMode::Link => {
            let url = validate_link(&request.raw_input)?;
            tracing::debug!(host = ?url.host_str(), "Link input validated");
            true
        }
        InputMode::Idea | InputMode::Text => false,
    };

    let stats = request.stats()?;
    let messages = build_messages(
        request.template,
        request.language,
        &stats,
        request.input_mode,
        &request.raw_input,
    );
    let options = CompletionOptions { resolve_links };

    tracing::info!(
        provider = provider.name(),
        template = request.template.id,
        language = request.language.id,
        target_chars = stats.target_chars,
        mode = %request.input_mode,
        "Generating script"
    );

    let completion = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::warn!("Generation cancelled");
            return Err(ReelscriptError::Generation("Generation was cancelled".to_string()).into());
        }
        result = tokio::time::timeout(timeout, provider.complete(&messages, &options)) => {
            match result {
                Ok(Ok(completion)) => completion,
                Ok(Err(e)) => {
                    tracing::error!("Provider call failed: {:#}", e);
                    return Err(ReelscriptError::Generation(format!("Provider call failed: {}", e)).into());
                }
                Err(_) => {
                    tracing::error!("Provider call timed out after {:?}", timeout);
                    return Err(ReelscriptError::Generation(format!(
                        "Provider call timed out after {} seconds",
                        timeout.as_secs()
                    ))
                    .into());
                }
            }
        }
    };

    if let Some(usage) = completion.usage {
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Token usage"
        );
    }

    check_output(completion.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedProvider;

    fn request(mode: InputMode, input: &str) -> GenerationRequest {
        GenerationRequest::from_ids(input, mode, "storytelling", "vi", "custom", 5).unwrap()
    }

    fn generous() -> Duration {
        Duration::from_secs(5)
    }

    #[tokio::test]
    async fn test_generate_script_returns_trimmed_text() {
        let provider = ScriptedProvider::reply("\n  Ngày xửa ngày xưa...  \n");
        let text = generate_script(
            &provider,
            &request(InputMode::Idea, "a story"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(text, "Ngày xửa ngày xưa...");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_carries_band_and_input() {
        let provider = ScriptedProvider::reply("script");
        generate_script(
            &provider,
            &request(InputMode::Idea, "office workers"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let messages = provider.last_messages();
        assert!(messages[0].content.contains("3600"));
        assert!(messages[0].content.contains("4400"));
        assert!(messages[1].content.contains("office workers"));
        assert!(!provider.last_options().resolve_links);
    }

    #[tokio::test]
    async fn test_empty_output_is_generation_error() {
        let provider = ScriptedProvider::reply("   ");
        let err = generate_script(
            &provider,
            &request(InputMode::Idea, "x"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReelscriptError>(),
            Some(ReelscriptError::Generation(_))
        ));
    }

    #[tokio::test]
    async fn test_error_marker_output_is_generation_error() {
        let provider = ScriptedProvider::reply("⚠️ Could not read the link");
        let err = generate_script(
            &provider,
            &request(InputMode::Idea, "x"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Generation error"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_generation_error() {
        let provider = ScriptedProvider::fail("quota exceeded");
        let err = generate_script(
            &provider,
            &request(InputMode::Text, "some text"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReelscriptError>(),
            Some(ReelscriptError::Generation(_))
        ));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_link_mode_requests_link_resolution() {
        let provider = ScriptedProvider::reply("script");
        generate_script(
            &provider,
            &request(InputMode::Link, "https://example.com/article"),
            generous(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert!(provider.last_options().resolve_links);
    }

    #[tokio::test]
    async fn test_invalid_link_is_config_error_without_call() {
        let provider = ScriptedProvider::reply("script");
        for bad in ["not a url", "ftp://example.com/file"] {
            let err = generate_script(
                &provider,
                &request(InputMode::Link, bad),
                generous(),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ReelscriptError>(),
                Some(ReelscriptError::Config(_))
            ));
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_timeout_is_generation_error() {
        let provider = ScriptedProvider::reply("late").with_delay(Duration::from_secs(5));
        let err = generate_script(
            &provider,
            &request(InputMode::Idea, "x"),
            Duration::from_millis(20),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_cancellation_is_generation_error() {
        let provider = ScriptedProvider::reply("late").with_delay(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = generate_script(&provider, &request(InputMode::Idea, "x"), generous(), &cancel)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }

    #[test]
    fn test_from_ids_rejects_unknown_template() {
        let result = GenerationRequest::from_ids("x", InputMode::Idea, "vlog", "vi", "short", 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_is_blank() {
        assert!(request(InputMode::Idea, "  \n\t").is_blank());
        assert!(!request(InputMode::Idea, " a ").is_blank());
    }
}

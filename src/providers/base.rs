//! Base provider trait and common types for Reelscript
//!
//! This module defines the Provider trait that all generation backends must
//! implement, along with the message, option and response types that cross
//! the backend boundary.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::providers::Message;
    ///
    /// let msg = Message::user("Write about rainy seasons");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::providers::Message;
    ///
    /// let msg = Message::system("You are a scriptwriter");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Whether this is a system message
    pub fn is_system(&self) -> bool {
        self.role == "system"
    }
}

/// Per-call options for a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Ask the backend to fetch and read URLs found in the prompt
    pub resolve_links: bool,
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the backend
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }

    /// The generated text
    pub fn text(&self) -> &str {
        &self.message.content
    }
}

/// Provider trait for generation backends
///
/// All backends (Gemini, Ollama) implement this trait. A call is a single
/// request/response exchange; retries and streaming are not part of the
/// contract.
///
/// # Examples
///
/// ```no_run
/// use reelscript::providers::{CompletionOptions, CompletionResponse, Message, Provider};
/// use reelscript::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn complete(
///         &self,
///         messages: &[Message],
///         _options: &CompletionOptions,
///     ) -> Result<CompletionResponse> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(Message::assistant(last)))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in logs ("gemini", "ollama")
    fn name(&self) -> &str;

    /// Completes a request made of the given messages
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse>;

    /// Get the name of the currently configured model
    ///
    /// # Default Implementation
    ///
    /// Returns an error indicating the information is unavailable.
    fn get_current_model(&self) -> Result<String> {
        Err(crate::error::ReelscriptError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("a").role, "user");
        assert_eq!(Message::assistant("b").role, "assistant");
        let sys = Message::system("c");
        assert!(sys.is_system());
        assert_eq!(sys.content, "c");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 880);
        assert_eq!(usage.total_tokens, 1000);
    }

    #[test]
    fn test_completion_response_text() {
        let response = CompletionResponse::with_usage(
            Message::assistant("Xin chào"),
            TokenUsage::new(1, 2),
        );
        assert_eq!(response.text(), "Xin chào");
        assert!(response.usage.is_some());
    }

    #[test]
    fn test_default_get_current_model_error() {
        struct MockProvider;

        #[async_trait]
        impl Provider for MockProvider {
            fn name(&self) -> &str {
                "mock"
            }

            async fn complete(
                &self,
                _messages: &[Message],
                _options: &CompletionOptions,
            ) -> Result<CompletionResponse> {
                Ok(CompletionResponse::new(Message::assistant("test")))
            }
        }

        let provider = MockProvider;
        assert!(provider.get_current_model().is_err());

        let response = tokio_test::block_on(
            provider.complete(&[Message::user("hi")], &CompletionOptions::default()),
        )
        .unwrap();
        assert_eq!(response.text(), "test");
    }
}

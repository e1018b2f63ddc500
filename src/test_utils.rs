//! Test utilities for Reelscript
//!
//! Provides a scripted provider that records what it was asked and answers
//! with a fixed reply or failure.

use crate::error::{Result, ReelscriptError};
use crate::providers::{CompletionOptions, CompletionResponse, Message, Provider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Outcome {
    Reply(String),
    Fail(String),
}

/// Provider double with a canned outcome
pub struct ScriptedProvider {
    outcome: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last: Mutex<Option<(Vec<Message>, CompletionOptions)>>,
}

impl ScriptedProvider {
    /// Provider that always answers with `text`
    pub fn reply(text: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Reply(text.into()))
    }

    /// Provider whose every call fails with a provider error
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Fail(reason.into()))
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Messages of the most recent call
    pub fn last_messages(&self) -> Vec<Message> {
        self.last
            .lock()
            .unwrap()
            .as_ref()
            .map(|(m, _)| m.clone())
            .unwrap_or_default()
    }

    /// Options of the most recent call
    pub fn last_options(&self) -> CompletionOptions {
        self.last
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, o)| *o)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((messages.to_vec(), *options));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            Outcome::Reply(text) => Ok(CompletionResponse::new(Message::assistant(text.clone()))),
            Outcome::Fail(reason) => Err(ReelscriptError::Provider(reason.clone()).into()),
        }
    }
}

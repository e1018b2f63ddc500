//! Generation session
//!
//! Ties one provider to one history store and enforces a single generation
//! in flight at a time. Successful scripts are recorded; failures never are.

use crate::duration::TargetStats;
use crate::error::{Result, ReelscriptError};
use crate::generation::{generate_script, GenerationRequest};
use crate::history::HistoryStore;
use crate::providers::Provider;
use crate::storage::{BlobStore, HistoryItem};

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    /// Generated script
    pub content: String,
    /// Character budget the script was written against
    pub stats: TargetStats,
    /// Id of the history item the script was recorded under
    pub item_id: String,
}

/// Clears the busy flag when dropped
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ReelscriptError::Busy)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A provider plus the history it records into
pub struct ScriptSession<S: BlobStore> {
    provider: Box<dyn Provider>,
    history: Mutex<HistoryStore<S>>,
    timeout: Duration,
    busy: AtomicBool,
}

impl<S: BlobStore> ScriptSession<S> {
    /// Create a session
    pub fn new(provider: Box<dyn Provider>, history: HistoryStore<S>, timeout: Duration) -> Self {
        Self {
            provider,
            history: Mutex::new(history),
            timeout,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a generation is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Generate a script for `request` and record it on success
    ///
    /// Takes `&self` so one session can be shared between tasks; overlapping
    /// calls are rejected while the first is in flight.
    ///
    /// # Errors
    ///
    /// - `ReelscriptError::EmptyInput` for blank input
    /// - `ReelscriptError::Config` for bad selections
    /// - `ReelscriptError::Busy` if another generation is in flight
    /// - `ReelscriptError::Generation` if the backend fails
    /// - `ReelscriptError::Storage` if the result cannot be recorded
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutcome> {
        if request.is_blank() {
            return Err(ReelscriptError::EmptyInput.into());
        }

        let _guard = BusyGuard::acquire(&self.busy)?;

        let stats = request.stats()?;
        let content =
            generate_script(self.provider.as_ref(), request, self.timeout, cancel).await?;

        let item = HistoryItem::new(request.template.title, &request.raw_input, content.clone());
        let item_id = item.id.clone();
        self.history.lock().await.append(item)?;

        tracing::info!(
            id = %item_id,
            chars = crate::duration::count_chars(&content),
            target = stats.target_chars,
            "Script generated"
        );

        Ok(GenerationOutcome {
            content,
            stats,
            item_id,
        })
    }

    /// Recorded history
    ///
    /// Holds the history lock until the guard is dropped.
    pub async fn history(&self) -> MutexGuard<'_, HistoryStore<S>> {
        self.history.lock().await
    }

    /// Give back the history store
    pub fn into_history(self) -> HistoryStore<S> {
        self.history.into_inner()
    }

    /// Name of the backing provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

//! Reelscript - narration script generator library
//!
//! This library turns an idea, a source text or a link into a video
//! narration script sized to a target speaking duration, and keeps a local
//! history of generated scripts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `catalog`: Templates, languages, duration buckets and input modes
//! - `duration`: Character budget calculation
//! - `prompts`: Instruction rendering for the backend
//! - `providers`: Generation backend abstraction (Gemini, Ollama)
//! - `generation`: One-call script generation with timeout and cancellation
//! - `storage`: Key-value backends (sled, in-memory)
//! - `history`: Newest-first script history
//! - `session`: Generation orchestration and busy tracking
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli` / `commands`: Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use reelscript::catalog::InputMode;
//! use reelscript::generation::GenerationRequest;
//! use reelscript::history::HistoryStore;
//! use reelscript::providers::create_provider;
//! use reelscript::session::ScriptSession;
//! use reelscript::storage::SledBlobStore;
//! use reelscript::Config;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider, None)?;
//!     let history = HistoryStore::open(SledBlobStore::open_or_default(None)?)?;
//!     let session = ScriptSession::new(provider, history, Duration::from_secs(120));
//!
//!     let request = GenerationRequest::from_ids(
//!         "office workers sitting too long",
//!         InputMode::Idea,
//!         "storytelling",
//!         "vi",
//!         "custom",
//!         5,
//!     )?;
//!     let outcome = session.generate(&request, &CancellationToken::new()).await?;
//!     println!("{}", outcome.content);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod duration;
pub mod error;
pub mod generation;
pub mod history;
pub mod prompts;
pub mod providers;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use catalog::InputMode;
pub use config::Config;
pub use duration::{calculate_target_length, TargetStats};
pub use error::{Result, ReelscriptError};
pub use generation::{generate_script, GenerationRequest};
pub use history::HistoryStore;
pub use session::{GenerationOutcome, ScriptSession};
pub use storage::HistoryItem;

#[cfg(test)]
pub mod test_utils;

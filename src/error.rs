//! Error types for Reelscript
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Reelscript operations
///
/// Covers catalog lookups, script generation, history persistence,
/// provider interactions, and credential handling.
#[derive(Error, Debug)]
pub enum ReelscriptError {
    /// Configuration-related errors, including unknown catalog ids
    #[error("Configuration error: {0}")]
    Config(String),

    /// Script generation failed (provider failure, timeout, empty or error-shaped output)
    #[error("Generation error: {0}")]
    Generation(String),

    /// Stored history could not be decoded
    ///
    /// The history store recovers from this locally; it is never shown to the user.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The generation input was blank
    #[error("Please enter an idea or some content.")]
    EmptyInput,

    /// Input could not be read from a file or stdin
    #[error("Input error: {0}")]
    Input(String),

    /// History lookup failed (unknown id, ambiguous prefix)
    #[error("History error: {0}")]
    History(String),

    /// Provider-related errors (API calls, response parsing, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// A generation is already in flight for this session
    #[error("A script is already being generated")]
    Busy,

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// History storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl ReelscriptError {
    /// Whether this error should be reported to the user with the generic
    /// "something went wrong, try again" message rather than its detail.
    pub fn is_user_facing_failure(&self) -> bool {
        matches!(self, Self::Generation(_))
    }
}

/// Result type alias for Reelscript operations
///
/// Uses `anyhow::Error` as the error type so callers can attach context;
/// domain errors are recovered with `downcast_ref::<ReelscriptError>()`.
pub type Result<T> = anyhow::Result<T>;

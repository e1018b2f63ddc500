/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `generate`: produce a script and record it in history
- `catalog`: list selections and show length budgets
- `history`: list, show, delete and clear stored scripts
- `auth`: store provider credentials
*/

use crate::error::ReelscriptError;

pub mod catalog;
pub mod history;

/// Message shown for any failure the user can only retry
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while generating the script. Please try again.";

/// Map an error to what the CLI should print
///
/// Generation failures collapse to [`GENERIC_FAILURE_MESSAGE`]; their detail
/// is only logged at debug level. Anything else is shown as is.
pub fn user_facing_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ReelscriptError>() {
        Some(e) if e.is_user_facing_failure() => {
            tracing::debug!("Failure detail: {:#}", err);
            GENERIC_FAILURE_MESSAGE.to_string()
        }
        _ => format!("{:#}", err),
    }
}

/// Generate command
pub mod generate {
    use crate::catalog::InputMode;
    use crate::config::Config;
    use crate::duration::count_chars;
    use crate::error::{Result, ReelscriptError};
    use crate::generation::GenerationRequest;
    use crate::history::HistoryStore;
    use crate::providers::create_provider;
    use crate::session::ScriptSession;
    use crate::storage::SledBlobStore;

    use colored::Colorize;
    use std::io::{IsTerminal, Read};
    use std::path::PathBuf;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Arguments of `reelscript generate`
    #[derive(Debug, Clone, Default)]
    pub struct GenerateArgs {
        pub input: Option<String>,
        pub file: Option<PathBuf>,
        pub mode: String,
        pub template: Option<String>,
        pub language: Option<String>,
        pub duration: Option<String>,
        pub minutes: Option<u32>,
        pub provider: Option<String>,
        pub output: Option<PathBuf>,
        pub json: bool,
    }

    /// Resolve the raw input from the argument, a file, or piped stdin
    pub fn read_input(input: Option<String>, file: Option<&PathBuf>) -> Result<String> {
        if let Some(input) = input {
            return Ok(input);
        }
        if let Some(path) = file {
            return std::fs::read_to_string(path).map_err(|e| {
                ReelscriptError::Input(format!("Failed to read {}: {}", path.display(), e)).into()
            });
        }

        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(ReelscriptError::Input(
                "No input given: pass it as an argument, with --file, or on stdin".to_string(),
            )
            .into());
        }
        let mut buffer = String::new();
        stdin.lock().read_to_string(&mut buffer)?;
        Ok(buffer)
    }

    /// Build the generation request, filling unset selections from config
    pub fn build_request(config: &Config, args: &GenerateArgs, raw_input: String) -> Result<GenerationRequest> {
        let input_mode = InputMode::parse_str(&args.mode).map_err(ReelscriptError::Config)?;
        let defaults = &config.generation;
        GenerationRequest::from_ids(
            raw_input,
            input_mode,
            args.template.as_deref().unwrap_or(&defaults.default_template),
            args.language.as_deref().unwrap_or(&defaults.default_language),
            args.duration.as_deref().unwrap_or(&defaults.default_duration),
            args.minutes.unwrap_or(defaults.default_custom_minutes),
        )
    }

    /// Run `reelscript generate`
    pub async fn run_generate(
        config: &Config,
        args: GenerateArgs,
        cancel: CancellationToken,
    ) -> Result<()> {
        let raw_input = read_input(args.input.clone(), args.file.as_ref())?;
        let request = build_request(config, &args, raw_input)?;

        let provider = create_provider(&config.provider, args.provider.as_deref())?;
        let backend = SledBlobStore::open_or_default(config.history.db_path.as_deref())?;
        let history = HistoryStore::open(backend)?;
        let timeout = Duration::from_secs(config.generation.timeout_seconds);
        let session = ScriptSession::new(provider, history, timeout);

        if !args.json {
            eprintln!(
                "{} {} {} ({})",
                "Generating".bold(),
                request.template.icon,
                request.template.title,
                session.provider_name().cyan()
            );
        }

        let outcome = session.generate(&request, &cancel).await?;
        let chars = count_chars(&outcome.content);
        let within_band = outcome.stats.contains(chars);

        if let Some(path) = &args.output {
            std::fs::write(path, &outcome.content)?;
            tracing::info!("Wrote script to {}", path.display());
        }

        if args.json {
            let value = serde_json::json!({
                "id": outcome.item_id,
                "content": outcome.content,
                "stats": outcome.stats,
                "chars": chars,
                "withinBand": within_band,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("{}", outcome.content);
        let summary = format!(
            "{} chars (target {}, range {}-{})",
            chars, outcome.stats.target_chars, outcome.stats.min_chars, outcome.stats.max_chars
        );
        if within_band {
            eprintln!("\n{} {}", "✓".green(), summary);
        } else {
            eprintln!("\n{} {}", "!".yellow(), summary.yellow());
        }
        eprintln!("Saved as {}", outcome.item_id.cyan());

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_read_input_prefers_argument() {
            let input = read_input(Some("idea".into()), None).unwrap();
            assert_eq!(input, "idea");
        }

        #[test]
        fn test_read_input_from_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("in.txt");
            std::fs::write(&path, "from file").unwrap();
            assert_eq!(read_input(None, Some(&path)).unwrap(), "from file");
        }

        #[test]
        fn test_read_input_missing_file_is_input_error() {
            let path = PathBuf::from("/nonexistent/reelscript/input.txt");
            let err = read_input(None, Some(&path)).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ReelscriptError>(),
                Some(ReelscriptError::Input(_))
            ));
            let message = crate::commands::user_facing_message(&err);
            assert!(message.contains("Failed to read /nonexistent/reelscript/input.txt"));
        }

        #[test]
        fn test_build_request_uses_config_defaults() {
            let config = Config::default();
            let args = GenerateArgs {
                mode: "idea".into(),
                ..Default::default()
            };
            let request = build_request(&config, &args, "x".into()).unwrap();
            assert_eq!(request.template.id, "storytelling");
            assert_eq!(request.language.id, "vi");
            assert_eq!(request.duration.id, "short");
        }

        #[test]
        fn test_build_request_rejects_bad_mode() {
            let config = Config::default();
            let args = GenerateArgs {
                mode: "video".into(),
                ..Default::default()
            };
            assert!(build_request(&config, &args, "x".into()).is_err());
        }
    }
}

/// Auth command
///
/// Stores the Gemini API key in the system keyring. Ollama needs no
/// credentials.
pub mod auth {
    use crate::config::Config;
    use crate::error::{Result, ReelscriptError};
    use crate::providers::gemini::store_api_key;
    use std::io::{BufRead, Write};

    /// Run `reelscript auth`
    pub fn authenticate(config: &Config, provider: Option<String>) -> Result<()> {
        let provider = provider.unwrap_or_else(|| config.provider.provider_type.clone());
        tracing::info!("Starting authentication for provider: {}", provider);

        match provider.as_str() {
            "gemini" => {
                print!("Gemini API key: ");
                std::io::stdout().flush()?;
                let mut key = String::new();
                std::io::stdin().lock().read_line(&mut key)?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(
                        ReelscriptError::MissingCredentials("no API key entered".to_string()).into(),
                    );
                }
                store_api_key(key)?;
                println!("Gemini: API key stored in the system keyring.");
                Ok(())
            }
            "ollama" => {
                println!("Ollama: no credentials needed; set `provider.ollama.host` in config.");
                Ok(())
            }
            other => {
                Err(ReelscriptError::Provider(format!("Unsupported provider: {}", other)).into())
            }
        }
    }

}

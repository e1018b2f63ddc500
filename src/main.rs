//! Reelscript - narration script generator CLI
//!
//! Main entry point for the reelscript application.

use colored::Colorize;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reelscript::cli::{Cli, Commands};
use reelscript::commands;
use reelscript::config::Config;
use reelscript::error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {:#}", e);
            eprintln!("{} {}", "Error:".red().bold(), commands::user_facing_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    match cli.command {
        Commands::Generate {
            input,
            file,
            mode,
            template,
            language,
            duration,
            minutes,
            provider,
            output,
            json,
        } => {
            tracing::info!("Starting script generation");
            if let Some(p) = &provider {
                tracing::debug!("Using provider override: {}", p);
            }

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling generation");
                    ctrl_c.cancel();
                }
            });

            let args = commands::generate::GenerateArgs {
                input,
                file,
                mode,
                template,
                language,
                duration,
                minutes,
                provider,
                output,
                json,
            };
            commands::generate::run_generate(&config, args, cancel).await
        }
        Commands::Stats {
            language,
            duration,
            minutes,
            json,
        } => {
            commands::catalog::show_stats(&config, language, duration, minutes, json)?;
            Ok(())
        }
        Commands::Catalog { json } => commands::catalog::show_catalog(json),
        Commands::History { command } => {
            tracing::debug!("Starting history command");
            commands::history::handle_history(&config, command)
        }
        Commands::Auth { provider } => commands::auth::authenticate(&config, provider),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so stdout carries only script output.
fn init_tracing(verbose: bool, json_logs: bool) {
    let default_directive = if verbose {
        "reelscript=debug"
    } else {
        "reelscript=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

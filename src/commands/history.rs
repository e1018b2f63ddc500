use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::{Result, ReelscriptError};
use crate::history::HistoryStore;
use crate::storage::{HistoryItem, SledBlobStore};
use colored::Colorize;
use prettytable::{format, Table};
use std::io::{BufRead, Write};

/// Handle history commands
pub fn handle_history(config: &Config, command: HistoryCommand) -> Result<()> {
    let backend = SledBlobStore::open_or_default(config.history.db_path.as_deref())?;
    let mut history = HistoryStore::open(backend)?;

    match command {
        HistoryCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(history.items())?);
                return Ok(());
            }

            if history.is_empty() {
                println!("{}", "No scripts in history.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Template".bold(),
                "Input".bold(),
                "Chars".bold(),
                "Created".bold()
            ]);

            for item in history.items() {
                table.add_row(prettytable::row![
                    item.short_id().cyan(),
                    item.template_title,
                    item.input_preview,
                    crate::duration::count_chars(&item.content),
                    created(item)
                ]);
            }

            println!("\nScript History:");
            table.printstd();
            println!();
            println!("Use {} to print a script.", "reelscript history show <ID>".cyan());
            println!();
        }
        HistoryCommand::Show { id } => {
            let item = history
                .get(&id)?
                .ok_or_else(|| ReelscriptError::History(format!("No script with id {}", id)))?;
            eprintln!(
                "{} {} {}",
                item.template_title.bold(),
                created(item).dimmed(),
                item.id.cyan()
            );
            println!("{}", item.content);
        }
        HistoryCommand::Delete { id } => {
            let full_id = match history.get(&id)? {
                Some(item) => item.id.clone(),
                None => id.clone(),
            };
            if history.delete(&full_id)? {
                println!("{}", format!("Deleted script {}", full_id).green());
            } else {
                println!("{}", format!("No script with id {}", id).yellow());
            }
        }
        HistoryCommand::Clear { yes } => {
            if history.is_empty() {
                println!("{}", "History is already empty.".yellow());
                return Ok(());
            }
            if !yes && !confirm(&format!("Delete all {} scripts?", history.len()))? {
                println!("Aborted.");
                return Ok(());
            }
            history.clear()?;
            println!("{}", "History cleared.".green());
        }
    }

    Ok(())
}

fn created(item: &HistoryItem) -> String {
    item.created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

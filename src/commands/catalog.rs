//! Catalog and length budget listings

use crate::catalog::{DURATIONS, LANGUAGES, TEMPLATES};
use crate::config::Config;
use crate::duration::{calculate_target_length, TargetStats};
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};
use serde::Serialize;

#[derive(Serialize)]
struct CatalogJson {
    templates: &'static [crate::catalog::Template],
    languages: &'static [crate::catalog::Language],
    durations: &'static [crate::catalog::DurationOption],
}

/// Print templates, languages and duration buckets
pub fn show_catalog(json: bool) -> Result<()> {
    if json {
        let catalog = CatalogJson {
            templates: TEMPLATES,
            languages: LANGUAGES,
            durations: DURATIONS,
        };
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let mut templates = Table::new();
    templates.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    templates.add_row(prettytable::row!["ID".bold(), "Template".bold(), "Description".bold()]);
    for t in TEMPLATES {
        templates.add_row(prettytable::row![
            t.id.cyan(),
            format!("{} {}", t.icon, t.title),
            t.description
        ]);
    }

    let mut languages = Table::new();
    languages.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    languages.add_row(prettytable::row!["ID".bold(), "Language".bold(), "Chars/min".bold()]);
    for l in LANGUAGES {
        languages.add_row(prettytable::row![l.id.cyan(), l.label, l.chars_per_minute]);
    }

    let mut durations = Table::new();
    durations.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    durations.add_row(prettytable::row!["ID".bold(), "Duration".bold(), "Minutes".bold()]);
    for d in DURATIONS {
        let minutes = d
            .minutes
            .map(|m| m.to_string())
            .unwrap_or_else(|| "--minutes".to_string());
        durations.add_row(prettytable::row![d.id.cyan(), d.label, minutes]);
    }

    println!("\nTemplates:");
    templates.printstd();
    println!("\nLanguages:");
    languages.printstd();
    println!("\nDurations:");
    durations.printstd();
    println!();

    Ok(())
}

/// Print the character budget for a language and duration
///
/// Missing selections fall back to the configured defaults.
pub fn show_stats(
    config: &Config,
    language: Option<String>,
    duration: Option<String>,
    minutes: Option<u32>,
    json: bool,
) -> Result<TargetStats> {
    let language = language.unwrap_or_else(|| config.generation.default_language.clone());
    let duration = duration.unwrap_or_else(|| config.generation.default_duration.clone());
    let minutes = minutes.unwrap_or(config.generation.default_custom_minutes);

    let stats = calculate_target_length(&language, &duration, minutes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!(
            "{} {} / {}",
            "Budget for".bold(),
            language.cyan(),
            duration.cyan()
        );
        println!("  target: {} chars", stats.target_chars.to_string().green());
        println!("  range:  {} - {} chars", stats.min_chars, stats.max_chars);
    }

    Ok(stats)
}

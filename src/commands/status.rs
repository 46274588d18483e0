//! @acp:module "Status Command"
//! @acp:summary "Show the current streak record"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::config::Config;
use crate::content::language::{display_name, emoji_for};
use crate::streak::StreakLedger;

/// Options for the status command
#[derive(Debug, Clone)]
pub struct StatusOptions {
    pub config: PathBuf,
    /// Output as JSON
    pub json: bool,
}

/// Execute the status command
pub fn execute_status(options: StatusOptions) -> Result<()> {
    let config = Config::load(&options.config)
        .with_context(|| format!("Failed to load config from {}", options.config.display()))?;
    let ledger = StreakLedger::new(config.streak_file());
    let record = ledger.load();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{}", style("Streak Status:").bold());
    println!("  Current streak: {} days", style(record.current_streak).cyan());
    println!("  Total projects: {}", style(record.total_projects).cyan());
    match record.last_date {
        Some(date) => println!("  Last run:       {}", date.format("%Y-%m-%d")),
        None => println!("  Last run:       {}", style("never").dim()),
    }

    if !record.languages_used.is_empty() {
        println!("\n{}", style("Languages:").bold());
        for (lang, count) in record.languages_by_count() {
            println!("  {} {:<12} {}", emoji_for(lang), display_name(lang), count);
        }
    }

    if !record.is_consistent() {
        println!(
            "\n{} total_projects does not match the per-language counts in {}",
            style("⚠").yellow(),
            ledger.path().display()
        );
    }

    Ok(())
}

//! @acp:module "Run Command"
//! @acp:summary "Generate today's project and publish it"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `daily` / `daily run`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use console::style;

use crate::config::Config;
use crate::error::DailyError;
use crate::run::{RunOptions, RunOrchestrator, RunReport};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunCommandOptions {
    /// Config file path
    pub config: PathBuf,
    /// Skip commit and push
    pub dry_run: bool,
    /// Use templates only
    pub no_ai: bool,
    /// Force a language for this run
    pub language: Option<String>,
    /// Count the run for this date instead of today
    pub date: Option<NaiveDate>,
}

/// Execute the run command
pub fn execute_run(options: RunCommandOptions) -> Result<RunReport> {
    let config = Config::load(&options.config)
        .with_context(|| format!("Failed to load config from {}", options.config.display()))?
        .with_overrides(options.no_ai, options.language.as_deref());

    let date = options.date.unwrap_or_else(|| Local::now().date_naive());
    let run_options = RunOptions {
        date,
        dry_run: options.dry_run,
    };

    print_banner(&config, date);
    if config.use_ai {
        println!("{} Attempting AI-powered code generation...", style("→").cyan());
    }

    let mut orchestrator = RunOrchestrator::from_config(config);
    let report = match orchestrator.execute(&run_options) {
        Ok(report) => report,
        Err(DailyError::Publish(reason)) => {
            eprintln!(
                "{} Project created but push failed. Check git configuration.",
                style("⚠").yellow()
            );
            return Err(DailyError::Publish(reason).into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Run stopped at stage {}", orchestrator.stage()));
        }
    };

    print_report(&report, options.dry_run);
    Ok(report)
}

fn print_banner(config: &Config, date: NaiveDate) {
    let rule = "=".repeat(60);
    println!("\n{}", style(&rule).dim());
    println!("  {}", style("Daily Project Generator").bold());
    println!("{}", style(&rule).dim());
    println!("  Date:      {}", date.format("%Y-%m-%d"));
    println!("  Languages: {}", config.languages.join(", "));
    println!("  AI:        {}", if config.use_ai { "enabled" } else { "disabled" });
    println!("{}\n", style(&rule).dim());
}

fn print_report(report: &RunReport, dry_run: bool) {
    println!(
        "{} {} / {} ({})",
        style("✓").green(),
        style(&report.identity.language).cyan(),
        style(&report.identity.project_type).cyan(),
        report.content_source
    );
    println!("  Path: {}", report.project_path.display());
    for file in &report.files {
        println!("  {} Created: {}", style("+").green(), file);
    }

    println!(
        "\n{} Streak: {} days | Total: {} projects",
        style("🔥").red(),
        report.streak.current_streak,
        report.streak.total_projects
    );

    match report.publish {
        Some(outcome) => println!(
            "\n{} Project '{}' created and {}",
            style("✓").green(),
            report.project_name(),
            outcome
        ),
        None if dry_run => println!(
            "\n{} Dry run complete! Project created at: {}",
            style("✓").green(),
            report.project_path.display()
        ),
        None => {}
    }
}

//! @acp:module "Init Command"
//! @acp:summary "Write a starter config.json"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `daily init` for first-time setup.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect};

use crate::config::Config;
use crate::content::LANGUAGES;

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Config file to create
    pub config: PathBuf,
    /// Force overwrite existing config
    pub force: bool,
    /// Skip interactive prompts (use defaults)
    pub yes: bool,
}

/// Execute the init command
pub fn execute_init(options: InitOptions) -> Result<()> {
    if options.config.exists() && !options.force {
        bail!(
            "Config file {} already exists. Use --force to overwrite.",
            options.config.display()
        );
    }

    let mut config = Config::default();
    if !options.yes {
        run_interactive_init(&mut config)?;
    }

    if let Some(parent) = options.config.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
        config.root = parent.to_path_buf();
    }

    config.save(&options.config)?;
    println!("{} Created {}", style("✓").green(), options.config.display());

    for dir in [config.projects_dir(), config.templates_dir()] {
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
            println!("{} Created {}/", style("✓").green(), dir.display());
        }
    }

    println!("\n{}", style("Next steps:").bold());
    println!(
        "  1. Run {} to try a run without publishing",
        style("daily --dry-run").cyan()
    );
    println!(
        "  2. Export {} to enable AI generation",
        style(&config.ai.api_key_env).cyan()
    );
    println!("  3. Schedule {} once a day", style("daily").cyan());

    Ok(())
}

fn run_interactive_init(config: &mut Config) -> Result<()> {
    println!("{} Daily Project Setup\n", style("→").cyan());

    let labels: Vec<String> = LANGUAGES
        .iter()
        .map(|info| format!("{} {}", info.emoji, info.display))
        .collect();
    let defaults = vec![true; labels.len()];

    let selected = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Languages to rotate through")
        .items(&labels)
        .defaults(&defaults)
        .interact()?;

    if selected.is_empty() {
        bail!("At least one language must be selected");
    }

    config.languages = selected
        .into_iter()
        .map(|i| LANGUAGES[i].name.to_string())
        .collect();
    let chosen = config.languages.clone();
    config.project_types.retain(|lang, _| chosen.contains(lang));

    config.use_ai = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "Use AI generation? (requires ${})",
            config.ai.api_key_env
        ))
        .default(false)
        .interact()?;

    config.commit_message_prefix = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Commit message prefix")
        .default(config.commit_message_prefix.clone())
        .interact_text()?;

    Ok(())
}

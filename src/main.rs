#![forbid(unsafe_code)]
//! Daily Projects Command Line Interface

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use daily::commands::{
    execute_init, execute_run, execute_status, InitOptions, RunCommandOptions, StatusOptions,
};

#[derive(Parser)]
#[command(name = "daily")]
#[command(about = "Generate, record and publish one coding project per day")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Run options (used when no subcommand is given)
    #[command(flatten)]
    run: RunArgs,

    /// Config file path
    #[arg(short, long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    /// Generate the project without git operations
    #[arg(long)]
    dry_run: bool,

    /// Skip AI generation, use templates only
    #[arg(long)]
    no_ai: bool,

    /// Force a specific language
    #[arg(long)]
    language: Option<String>,

    /// Count the run for this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate today's project (default)
    Run(RunArgs),

    /// Show the current streak
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a starter config.json
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,

        /// Skip interactive prompts (use defaults)
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let needs_config = !matches!(cli.command, Some(Commands::Init { .. }));
    if needs_config && !cli.config.exists() {
        eprintln!(
            "{} No config file found at {}",
            style("✗").red(),
            cli.config.display()
        );
        eprintln!("  Run 'daily init' to create one");
        std::process::exit(1);
    }

    match cli.command {
        None => run(cli.config, cli.run),
        Some(Commands::Run(args)) => run(cli.config, args),
        Some(Commands::Status { json }) => execute_status(StatusOptions {
            config: cli.config,
            json,
        }),
        Some(Commands::Init { force, yes }) => execute_init(InitOptions {
            config: cli.config,
            force,
            yes,
        }),
    }
}

fn run(config: PathBuf, args: RunArgs) -> anyhow::Result<()> {
    let options = RunCommandOptions {
        config,
        dry_run: args.dry_run,
        no_ai: args.no_ai,
        language: args.language,
        date: args.date,
    };
    execute_run(options)?;
    Ok(())
}

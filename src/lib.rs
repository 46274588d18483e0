#![forbid(unsafe_code)]

//! @acp:module "Daily Projects Library"
//! @acp:summary "Generate, record and publish one small coding project per day"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # Daily Projects
//!
//! Each run picks a language and project type, produces source files from a
//! generation service or a template, writes them with a README, advances the
//! streak ledger and publishes the result with git.
//!
//! ## Components
//!
//! - **Config**: immutable run configuration (`config.json`)
//! - **StreakLedger**: persisted totals and consecutive-day streak
//! - **ProjectNameResolver**: collision-aware directory naming
//! - **ContentProvider**: AI generator with template fallback
//! - **RunOrchestrator**: the linear daily pipeline
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use daily::{Config, RunOptions, RunOrchestrator};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json")?;
//!     let mut orchestrator = RunOrchestrator::from_config(config);
//!
//!     let report = orchestrator.execute(&RunOptions {
//!         date: Local::now().date_naive(),
//!         dry_run: true,
//!     })?;
//!     println!("created {}", report.project_name());
//!
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod naming;
pub mod publish;
pub mod readme;
pub mod run;
pub mod streak;

// Re-exports
pub use config::Config;
pub use content::{
    AiGenerator, ContentProvider, ContentSource, GeminiClient, ProjectFiles, TemplateLoader,
    TextGenerator,
};
pub use error::{DailyError, Result};
pub use naming::{ProjectIdentity, ProjectNameResolver};
pub use publish::{GitPublisher, PublishOutcome, Publisher};
pub use readme::ReadmeRenderer;
pub use run::{RunOptions, RunOrchestrator, RunReport, RunStage};
pub use streak::{record_completion, StreakLedger, StreakRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! @acp:module "Run Orchestrator"
//! @acp:summary "One daily run: pick, generate, write, record, publish"
//! @acp:domain cli
//! @acp:layer service
//!
//! # Stages
//!
//! A run moves forward through [`RunStage`] without back-edges:
//!
//! ```text
//! Init → ConfigLoaded → NameResolved → ContentProduced → FilesWritten
//!      → ReadmeWritten → StreakUpdated → Published | DryRunStopped
//! ```
//!
//! Any error aborts the run where it happened. Files already written stay on
//! disk for manual recovery.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::config::Config;
use crate::content::{AiGenerator, ContentProvider, ContentSource, ProjectFiles, TemplateLoader};
use crate::error::{DailyError, Result};
use crate::naming::{ProjectIdentity, ProjectNameResolver};
use crate::publish::{GitPublisher, PublishOutcome, Publisher};
use crate::readme::{recent_projects, ReadmeRenderer, RECENT_PROJECTS};
use crate::streak::{record_completion, StreakLedger, StreakRecord};

/// @acp:summary "Progress marker of a run"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Init,
    ConfigLoaded,
    NameResolved,
    ContentProduced,
    FilesWritten,
    ReadmeWritten,
    StreakUpdated,
    Published,
    DryRunStopped,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Init => "init",
            RunStage::ConfigLoaded => "config-loaded",
            RunStage::NameResolved => "name-resolved",
            RunStage::ContentProduced => "content-produced",
            RunStage::FilesWritten => "files-written",
            RunStage::ReadmeWritten => "readme-written",
            RunStage::StreakUpdated => "streak-updated",
            RunStage::Published => "published",
            RunStage::DryRunStopped => "dry-run-stopped",
        };
        f.write_str(name)
    }
}

/// Per-invocation options
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Calendar date the run counts for
    pub date: NaiveDate,
    /// Stop before publishing
    pub dry_run: bool,
}

/// @acp:summary "Everything a finished run produced"
#[derive(Debug, Clone)]
pub struct RunReport {
    pub identity: ProjectIdentity,
    pub project_path: PathBuf,
    pub content_source: ContentSource,
    /// File names written into the project directory, README included
    pub files: Vec<String>,
    /// Ledger state after this run
    pub streak: StreakRecord,
    /// `None` for dry runs
    pub publish: Option<PublishOutcome>,
    pub final_stage: RunStage,
}

impl RunReport {
    pub fn project_name(&self) -> String {
        self.identity.dir_name()
    }
}

/// @acp:summary "Composes the components of a daily run"
pub struct RunOrchestrator<R> {
    config: Config,
    ai: Option<Box<dyn ContentProvider>>,
    publisher: Box<dyn Publisher>,
    rng: R,
    stage: RunStage,
}

impl RunOrchestrator<ThreadRng> {
    /// Orchestrator wired to Gemini and the system git
    pub fn from_config(config: Config) -> Self {
        let ai: Option<Box<dyn ContentProvider>> = if config.use_ai {
            Some(Box::new(AiGenerator::gemini(&config.ai)))
        } else {
            None
        };
        let publisher = Box::new(GitPublisher::system(config.root.clone(), config.git.clone()));

        let mut orchestrator = Self::new(config, publisher, rand::rng());
        orchestrator.ai = ai;
        orchestrator
    }
}

impl<R: Rng> RunOrchestrator<R> {
    /// Orchestrator without a generation service
    pub fn new(config: Config, publisher: Box<dyn Publisher>, rng: R) -> Self {
        let mut orchestrator = Self {
            config,
            ai: None,
            publisher,
            rng,
            stage: RunStage::Init,
        };
        orchestrator.advance(RunStage::ConfigLoaded);
        orchestrator
    }

    /// Use `provider` before templates whenever `use_ai` is enabled
    pub fn with_ai(mut self, provider: Box<dyn ContentProvider>) -> Self {
        self.ai = Some(provider);
        self
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn advance(&mut self, stage: RunStage) {
        tracing::debug!("run stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// @acp:summary "Execute one run"
    pub fn execute(&mut self, options: &RunOptions) -> Result<RunReport> {
        let (language, project_type) = self.pick_project()?;
        tracing::info!("Selected {} / {}", language, project_type);

        let projects_dir = self.config.projects_dir();
        std::fs::create_dir_all(&projects_dir)?;

        let identity = ProjectNameResolver::new(&mut self.rng).resolve(
            &projects_dir,
            options.date,
            &language,
            &project_type,
            |path| path.exists(),
        );
        let project_path = projects_dir.join(identity.dir_name());
        self.advance(RunStage::NameResolved);

        std::fs::create_dir_all(&project_path)?;

        let (content_source, files) = self.produce_content(&language, &project_type, options.date);
        self.advance(RunStage::ContentProduced);

        let mut written = write_files(&project_path, &files)?;
        self.advance(RunStage::FilesWritten);

        let ledger = StreakLedger::new(self.config.streak_file());
        let previous = ledger.load();

        let renderer = ReadmeRenderer::new()?;
        let readme = renderer.project_readme(&language, &project_type, options.date, &previous)?;
        std::fs::write(project_path.join("README.md"), readme)?;
        written.push("README.md".to_string());
        self.advance(RunStage::ReadmeWritten);

        let streak = record_completion(&previous, &language, options.date);
        ledger.save(&streak)?;
        self.write_root_readme(&renderer, &streak, options.date)?;
        self.advance(RunStage::StreakUpdated);

        let publish = if options.dry_run {
            tracing::info!("Dry run, skipping publish");
            self.advance(RunStage::DryRunStopped);
            None
        } else {
            let message = format!(
                "{}: {} ({})",
                self.config.commit_message_prefix,
                identity.dir_name(),
                options.date.format("%Y-%m-%d")
            );
            let outcome = self.publisher.publish(&message)?;
            self.advance(RunStage::Published);
            Some(outcome)
        };

        Ok(RunReport {
            identity,
            project_path,
            content_source,
            files: written,
            streak,
            publish,
            final_stage: self.stage,
        })
    }

    /// Random language, then a random project type for it
    fn pick_project(&mut self) -> Result<(String, String)> {
        let language = self
            .config
            .languages
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| DailyError::Config("no languages configured".to_string()))?;

        let types = self.config.project_types_for(&language);
        let project_type = types
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| DailyError::Config(format!("no project types for {}", language)))?;

        ensure_path_component("language", &language)?;
        ensure_path_component("project type", &project_type)?;
        Ok((language, project_type))
    }

    /// AI first when enabled, templates otherwise or on fallback
    fn produce_content(
        &self,
        language: &str,
        project_type: &str,
        date: NaiveDate,
    ) -> (ContentSource, ProjectFiles) {
        if self.config.use_ai {
            if let Some(ai) = &self.ai {
                if let Some(files) = ai.provide(language, project_type) {
                    return (ai.source(), files);
                }
                tracing::info!("Falling back to templates");
            }
        }

        let templates = TemplateLoader::new(self.config.templates_dir(), date);
        (ContentSource::Template, templates.load(language, project_type))
    }

    fn write_root_readme(
        &self,
        renderer: &ReadmeRenderer,
        streak: &StreakRecord,
        today: NaiveDate,
    ) -> Result<()> {
        let projects_dir = self.config.projects_dir();
        let readme_path = self.config.readme_path();
        let recent = recent_projects(&projects_dir, RECENT_PROJECTS);
        let link = projects_link(&projects_dir, &readme_path);

        let readme = renderer.root_readme(streak, today, recent, &link)?;
        if let Some(parent) = readme_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&readme_path, readme)?;
        tracing::debug!("Updated {:?}", readme_path);
        Ok(())
    }
}

/// Write every file into `dir`, returning the names in write order
fn write_files(dir: &Path, files: &ProjectFiles) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(files.len() + 1);
    for (name, content) in files {
        ensure_path_component("file name", name)?;
        std::fs::write(dir.join(name), content)?;
        tracing::debug!("Created {}", name);
        written.push(name.clone());
    }
    Ok(written)
}

/// Names end up as path components and must not escape their parent
fn ensure_path_component(what: &str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\'])
        || value.chars().any(char::is_control);
    if invalid {
        return Err(DailyError::Config(format!("invalid {}: {:?}", what, value)));
    }
    Ok(())
}

/// Link from the root README to the projects directory
///
/// Relative to the README's directory (`./projects`, `../projects`) when both
/// paths share a base; the plain projects path otherwise.
fn projects_link(projects_dir: &Path, readme_path: &Path) -> String {
    let base = readme_path.parent().unwrap_or_else(|| Path::new(""));
    let from = link_components(base);
    let to = link_components(projects_dir);

    let shared = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let climbs = &from[shared..];
    if base.is_absolute() != projects_dir.is_absolute()
        || climbs.iter().any(|c| *c == Component::ParentDir)
    {
        return to_link(projects_dir.components());
    }

    let mut parts: Vec<String> = if climbs.is_empty() {
        vec![".".to_string()]
    } else {
        vec!["..".to_string(); climbs.len()]
    };
    parts.extend(
        to[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

fn link_components(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| *c != Component::CurDir)
        .collect()
}

fn to_link<'a>(components: impl Iterator<Item = Component<'a>>) -> String {
    let mut link = String::new();
    for component in components {
        match component {
            Component::RootDir => link.push('/'),
            Component::CurDir => {}
            other => {
                if !link.is_empty() && !link.ends_with('/') {
                    link.push('/');
                }
                link.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    link
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_components() {
        assert!(ensure_path_component("language", "python").is_ok());
        assert!(ensure_path_component("language", "c++").is_ok());
        assert!(ensure_path_component("language", "..").is_err());
        assert!(ensure_path_component("language", "a/b").is_err());
        assert!(ensure_path_component("language", "").is_err());
    }

    #[test]
    fn test_projects_link() {
        assert_eq!(
            projects_link(Path::new("/repo/projects"), Path::new("/repo/README.md")),
            "./projects"
        );
        assert_eq!(
            projects_link(Path::new("./out/daily"), Path::new("./README.md")),
            "./out/daily"
        );
        assert_eq!(
            projects_link(Path::new("projects"), Path::new("README.md")),
            "./projects"
        );
    }

    #[test]
    fn test_projects_link_from_nested_readme() {
        assert_eq!(
            projects_link(Path::new("/repo/projects"), Path::new("/repo/docs/README.md")),
            "../projects"
        );
        assert_eq!(
            projects_link(Path::new("/repo/out/daily"), Path::new("/repo/a/b/README.md")),
            "../../out/daily"
        );
        assert_eq!(
            projects_link(Path::new("/srv/projects"), Path::new("docs/README.md")),
            "/srv/projects"
        );
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(RunStage::Init < RunStage::ConfigLoaded);
        assert!(RunStage::StreakUpdated < RunStage::Published);
        assert_eq!(RunStage::DryRunStopped.to_string(), "dry-run-stopped");
    }
}

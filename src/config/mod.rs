//! @acp:module "Configuration"
//! @acp:summary "Run configuration loading, defaults and path resolution"
//! @acp:domain cli
//! @acp:layer config
//!
//! The configuration is read once per run and passed explicitly to every
//! component. Relative paths inside it resolve against the directory that
//! holds the config file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{DailyError, Result};

/// Project type used when a language has no entry in `project_types`
pub const FALLBACK_PROJECT_TYPE: &str = "mini-project";

fn default_commit_prefix() -> String {
    "🚀 Daily Project".to_string()
}

/// @acp:summary "Main run configuration (config.json)"
/// @acp:lock normal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Languages a run may pick from
    pub languages: Vec<String>,

    /// Project type identifiers per language
    #[serde(default)]
    pub project_types: BTreeMap<String, Vec<String>>,

    /// Try the generation service before falling back to templates
    #[serde(default)]
    pub use_ai: bool,

    /// Prefix of every commit message
    #[serde(default = "default_commit_prefix")]
    pub commit_message_prefix: String,

    /// Output and state file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Generation service settings
    #[serde(default)]
    pub ai: AiConfig,

    /// Publishing settings
    #[serde(default)]
    pub git: GitConfig,

    /// Directory the config was loaded from (internal)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let mut project_types = BTreeMap::new();
        project_types.insert(
            "python".to_string(),
            strings(&[
                "cli-calculator",
                "password-generator",
                "sorting-visualizer",
                "todo-manager",
                "text-adventure",
            ]),
        );
        project_types.insert(
            "javascript".to_string(),
            strings(&["event-emitter", "markdown-parser", "quiz-game", "todo-manager"]),
        );
        project_types.insert(
            "java".to_string(),
            strings(&["binary-search-tree", "bank-account", "library-system"]),
        );
        project_types.insert(
            "c".to_string(),
            strings(&["matrix-operations", "stack-array", "linked-list"]),
        );
        project_types.insert(
            "go".to_string(),
            strings(&["http-server", "word-counter", "key-value-store"]),
        );

        Self {
            languages: strings(&["python", "javascript", "java", "c", "go"]),
            project_types,
            use_ai: false,
            commit_message_prefix: default_commit_prefix(),
            paths: PathsConfig::default(),
            ai: AiConfig::default(),
            git: GitConfig::default(),
            root: PathBuf::from("."),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// @acp:summary "Load config from a config.json file"
    ///
    /// A missing or malformed file is an error: a run cannot proceed without
    /// knowing what it may generate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DailyError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&content)?;
        config.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.validate()?;
        Ok(config)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations a run cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(DailyError::Config("`languages` must not be empty".to_string()));
        }
        if let Some(lang) = self.languages.iter().find(|l| l.trim().is_empty()) {
            return Err(DailyError::Config(format!("invalid language name {:?}", lang)));
        }
        if self.ai.min_length == 0 {
            return Err(DailyError::Config("`ai.min_length` must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Apply per-run CLI overrides (`--no-ai`, `--language`)
    pub fn with_overrides(mut self, no_ai: bool, language: Option<&str>) -> Self {
        if no_ai {
            self.use_ai = false;
        }
        if let Some(lang) = language {
            self.languages = vec![lang.to_string()];
        }
        self
    }

    /// Project types configured for a language, or the fallback type
    pub fn project_types_for(&self, language: &str) -> Vec<String> {
        match self.project_types.get(language) {
            Some(types) if !types.is_empty() => types.clone(),
            _ => vec![FALLBACK_PROJECT_TYPE.to_string()],
        }
    }

    /// Directory receiving one sub-directory per run
    pub fn projects_dir(&self) -> PathBuf {
        self.resolve(&self.paths.projects_dir)
    }

    /// Directory holding `<language>/<project_type>.<ext>` templates
    pub fn templates_dir(&self) -> PathBuf {
        self.resolve(&self.paths.templates_dir)
    }

    /// Persisted streak ledger
    pub fn streak_file(&self) -> PathBuf {
        self.resolve(&self.paths.streak_file)
    }

    /// Aggregate README rewritten every run
    pub fn readme_path(&self) -> PathBuf {
        self.resolve(&self.paths.readme)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// @acp:summary "Filesystem layout, relative to the config directory"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    #[serde(default = "default_streak_file")]
    pub streak_file: PathBuf,

    #[serde(default = "default_readme")]
    pub readme: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
            templates_dir: default_templates_dir(),
            streak_file: default_streak_file(),
            readme: default_readme(),
        }
    }
}

fn default_projects_dir() -> PathBuf {
    PathBuf::from("projects")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_streak_file() -> PathBuf {
    PathBuf::from("streak.json")
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

/// @acp:summary "Generation service configuration"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Model identifier passed to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the generateContent API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Outputs shorter than this (in characters) are rejected
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: default_endpoint(),
            min_length: default_min_length(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_min_length() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    60
}

/// @acp:summary "Commit identity and push target"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// `user.name` set before committing (left untouched when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// `user.email` set before committing (left untouched when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    /// Remote used by the upstream-tracking fallback push
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch used by the upstream-tracking fallback push
    #[serde(default = "default_branch")]
    pub branch: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            user_name: None,
            user_email: None,
            remote: default_remote(),
            branch: default_branch(),
        }
    }
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

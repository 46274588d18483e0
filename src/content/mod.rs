//! @acp:module "Content Providers"
//! @acp:summary "Sources of project source files: generation service and templates"
//! @acp:domain cli
//! @acp:layer service
//!
//! A provider turns `(language, project_type)` into a map of file name to
//! file content. Returning `None` means "nothing produced"; the caller moves on
//! to the next provider instead of failing the run.

pub mod ai;
pub mod generic;
pub mod language;
pub mod template;

use std::collections::BTreeMap;
use std::fmt;

pub use ai::{AiGenerator, GeminiClient, GenerationError, TextGenerator};
pub use language::{LanguageInfo, LANGUAGES};
pub use template::TemplateLoader;

/// File name → content for one project
pub type ProjectFiles = BTreeMap<String, String>;

/// @acp:summary "Where a project's source files came from"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource {
    Ai,
    Template,
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Ai => write!(f, "ai"),
            ContentSource::Template => write!(f, "template"),
        }
    }
}

/// Provider trait - one implementation per content source
pub trait ContentProvider {
    /// Which source this provider represents
    fn source(&self) -> ContentSource;

    /// Produce project files, or `None` when this provider has nothing
    fn provide(&self, language: &str, project_type: &str) -> Option<ProjectFiles>;
}

/// "cli-calculator" -> "Cli Calculator"
pub fn title_case(project_type: &str) -> String {
    project_type
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cli-calculator"), "Cli Calculator");
        assert_eq!(title_case("HTTP-server"), "Http Server");
        assert_eq!(title_case("stack_array"), "Stack Array");
        assert_eq!(title_case("mini-project"), "Mini Project");
    }
}

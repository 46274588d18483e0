//! @acp:module "Template Loader"
//! @acp:summary "Static project templates with built-in fallbacks"
//! @acp:domain cli
//! @acp:layer io
//!
//! Lookup order:
//! 1. `templates/<language>/<project_type with '-' → '_'>.<ext>`, extensions
//!    tried in [`TEMPLATE_EXTENSIONS`] order
//! 2. the built-in generic template for the language
//! 3. the built-in Python template

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::language::{main_file_for_extension, TEMPLATE_EXTENSIONS};
use super::{generic, title_case, ContentProvider, ContentSource, ProjectFiles};

/// @acp:summary "Loads project files from the templates directory"
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    templates_dir: PathBuf,
    date: NaiveDate,
}

impl TemplateLoader {
    /// `date` is stamped into generic templates
    pub fn new(templates_dir: impl Into<PathBuf>, date: NaiveDate) -> Self {
        Self {
            templates_dir: templates_dir.into(),
            date,
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// @acp:summary "Load files for a project; always produces content"
    pub fn load(&self, language: &str, project_type: &str) -> ProjectFiles {
        if let Some(files) = self.load_static(language, project_type) {
            return files;
        }

        tracing::debug!(
            "No template for {}/{}, using generic template",
            language,
            project_type
        );
        generic::render(
            language,
            &title_case(project_type),
            &self.date.format("%Y-%m-%d").to_string(),
        )
    }

    /// Static template file, if one exists and is readable
    fn load_static(&self, language: &str, project_type: &str) -> Option<ProjectFiles> {
        let path = self.find_template(language, project_type)?;
        let extension = path.extension()?.to_str()?;

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loaded template {:?}", path);
                let mut files = ProjectFiles::new();
                files.insert(main_file_for_extension(extension).to_string(), content);
                Some(files)
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable template {:?}: {}", path, e);
                None
            }
        }
    }

    /// Best matching template path by extension priority
    fn find_template(&self, language: &str, project_type: &str) -> Option<PathBuf> {
        let template_name = project_type.replace('-', "_");
        let dir = self.templates_dir.join(language);
        let pattern = format!(
            "{}/{}.*",
            glob::Pattern::escape(&dir.to_string_lossy()),
            glob::Pattern::escape(&template_name)
        );

        let candidates = match glob::glob(&pattern) {
            Ok(paths) => paths.filter_map(|entry| entry.ok()),
            Err(e) => {
                tracing::warn!("Invalid template pattern {}: {}", pattern, e);
                return None;
            }
        };

        candidates
            .filter(|path| path.is_file())
            .filter(|path| path.file_stem().and_then(|s| s.to_str()) == Some(template_name.as_str()))
            .filter_map(|path| {
                let ext = path.extension()?.to_str()?;
                let rank = TEMPLATE_EXTENSIONS.iter().position(|e| *e == ext)?;
                Some((rank, path))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, path)| path)
    }
}

impl ContentProvider for TemplateLoader {
    fn source(&self) -> ContentSource {
        ContentSource::Template
    }

    fn provide(&self, language: &str, project_type: &str) -> Option<ProjectFiles> {
        Some(self.load(language, project_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn loader(temp: &TempDir) -> TemplateLoader {
        TemplateLoader::new(
            temp.path().join("templates"),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
    }

    fn write_template(temp: &TempDir, rel: &str, content: &str) {
        let path = temp.path().join("templates").join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_static_template_by_normalized_name() {
        let temp = TempDir::new().unwrap();
        write_template(&temp, "python/sorting_visualizer.py", "print('bars')\n");

        let files = loader(&temp).load("python", "sorting-visualizer");
        assert_eq!(files.len(), 1);
        assert_eq!(files["main.py"], "print('bars')\n");
    }

    #[test]
    fn test_extension_priority() {
        let temp = TempDir::new().unwrap();
        write_template(&temp, "go/http_server.txt", "notes");
        write_template(&temp, "go/http_server.go", "package main");

        let files = loader(&temp).load("go", "http-server");
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["main.go"]);
    }

    #[test]
    fn test_txt_template_writes_main_txt() {
        let temp = TempDir::new().unwrap();
        write_template(&temp, "rust/mini_project.txt", "fn main() {}");

        let files = loader(&temp).load("rust", "mini-project");
        assert_eq!(files["main.txt"], "fn main() {}");
    }

    #[test]
    fn test_unlisted_extension_is_ignored() {
        let temp = TempDir::new().unwrap();
        write_template(&temp, "java/binary_search_tree.kt", "fun main() {}");

        let files = loader(&temp).load("java", "binary-search-tree");
        assert!(files["Main.java"].contains("Binary Search Tree"));
    }

    #[test]
    fn test_missing_template_uses_generic() {
        let temp = TempDir::new().unwrap();
        let files = loader(&temp).load("c", "linked-list");

        let main = &files["main.c"];
        assert!(main.contains("Linked List"));
        assert!(main.contains("Generated on 2024-01-10"));
    }

    #[test]
    fn test_unknown_language_uses_python_generic() {
        let temp = TempDir::new().unwrap();
        let files = loader(&temp).provide("haskell", "mini-project").unwrap();

        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["main.py"]);
        assert!(files["main.py"].contains("Mini Project"));
    }
}

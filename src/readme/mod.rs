//! @acp:module "README Rendering"
//! @acp:summary "Per-project and aggregate README generation"
//! @acp:domain cli
//! @acp:layer renderer

use std::path::Path;

use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;
use walkdir::WalkDir;

use crate::content::language::{display_name, emoji_for, run_command_for};
use crate::content::title_case;
use crate::error::Result;
use crate::streak::StreakRecord;

/// Number of projects listed in the root README
pub const RECENT_PROJECTS: usize = 10;

/// Widest language bar in the root README
const MAX_BAR_WIDTH: u64 = 30;

const PROJECT_TEMPLATE: &str = r#"# {{emoji}} {{title}}

> **Daily Auto Project** | Generated on {{date}}
> Language: **{{language}}** | Project #{{project_number}}

## 📖 About

This is an automatically generated mini-project, part of a daily practice
streak across several programming languages.

## 🚀 How to Run

```bash
{{run_command}}
```

## 📊 Streak Info

- 🔥 Current Streak: **{{current_streak}} days**
- 📁 Total Projects: **{{total_projects}}**
"#;

const ROOT_TEMPLATE: &str = r#"# 🚀 Daily Auto Projects

> Automatically generated coding projects, one every day!

## 📊 Stats

| Metric | Value |
|--------|-------|
| 🔥 Current Streak | **{{current_streak}} days** |
| 📁 Total Projects | **{{total_projects}}** |
| 📅 Last Updated | **{{today}}** |

## 🗂️ Languages Used

{{#each languages}}
| {{emoji}} {{name}} | {{bar}} **{{count}}** |
{{/each}}

## 📂 Recent Projects

{{#each recent}}
- [`{{this}}`]({{../projects_link}}/{{this}}/)
{{/each}}

## ⚙️ How It Works

1. ⏰ A scheduler triggers one run per day
2. 🤖 A generation service writes a unique mini-project
3. 📁 Static templates take over when the service is unavailable
4. 📦 The result is committed and pushed to this repository
"#;

#[derive(Serialize)]
struct ProjectContext<'a> {
    emoji: &'a str,
    title: String,
    date: String,
    language: String,
    project_number: u64,
    run_command: &'a str,
    current_streak: u64,
    total_projects: u64,
}

#[derive(Serialize)]
struct LanguageRow<'a> {
    emoji: &'a str,
    name: String,
    bar: String,
    count: u64,
}

#[derive(Serialize)]
struct RootContext<'a> {
    current_streak: u64,
    total_projects: u64,
    today: String,
    languages: Vec<LanguageRow<'a>>,
    recent: Vec<String>,
    projects_link: String,
}

/// @acp:summary "Renders README files from registered templates"
pub struct ReadmeRenderer {
    registry: Handlebars<'static>,
}

impl ReadmeRenderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        registry.register_template_string("project", PROJECT_TEMPLATE)?;
        registry.register_template_string("root", ROOT_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// @acp:summary "README for one project directory"
    ///
    /// `streak` is the record as it stood before this run was counted, so the
    /// project number is `total_projects + 1`.
    pub fn project_readme(
        &self,
        language: &str,
        project_type: &str,
        date: NaiveDate,
        streak: &StreakRecord,
    ) -> Result<String> {
        let context = ProjectContext {
            emoji: emoji_for(language),
            title: title_case(project_type),
            date: date.format("%Y-%m-%d").to_string(),
            language: display_name(language),
            project_number: streak.total_projects + 1,
            run_command: run_command_for(language),
            current_streak: streak.current_streak,
            total_projects: streak.total_projects,
        };
        Ok(self.registry.render("project", &context)?)
    }

    /// @acp:summary "Aggregate README summarizing the streak and recent projects"
    pub fn root_readme(
        &self,
        streak: &StreakRecord,
        today: NaiveDate,
        recent: Vec<String>,
        projects_link: &str,
    ) -> Result<String> {
        let languages = streak
            .languages_by_count()
            .into_iter()
            .map(|(lang, count)| LanguageRow {
                emoji: emoji_for(lang),
                name: display_name(lang),
                bar: "█".repeat(count.saturating_mul(2).min(MAX_BAR_WIDTH) as usize),
                count,
            })
            .collect();

        let context = RootContext {
            current_streak: streak.current_streak,
            total_projects: streak.total_projects,
            today: today.format("%Y-%m-%d").to_string(),
            languages,
            recent,
            projects_link: projects_link.trim_end_matches('/').to_string(),
        };
        Ok(self.registry.render("root", &context)?)
    }
}

/// @acp:summary "Newest project directory names, newest first"
///
/// Names start with the ISO date, so a reverse name sort is a reverse
/// chronological sort. A missing directory yields an empty list.
pub fn recent_projects(projects_dir: &Path, limit: usize) -> Vec<String> {
    if !projects_dir.is_dir() {
        return Vec::new();
    }

    let mut names: Vec<String> = WalkDir::new(projects_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();

    names.sort_unstable_by(|a, b| b.cmp(a));
    names.truncate(limit);
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn streak() -> StreakRecord {
        StreakRecord {
            total_projects: 5,
            current_streak: 3,
            last_date: Some(date("2024-01-09")),
            languages_used: [("python".to_string(), 4), ("go".to_string(), 1)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_project_readme() {
        let renderer = ReadmeRenderer::new().unwrap();
        let readme = renderer
            .project_readme("go", "http-server", date("2024-01-10"), &streak())
            .unwrap();

        assert!(readme.starts_with("# 🐹 Http Server\n"));
        assert!(readme.contains("Language: **Go** | Project #6"));
        assert!(readme.contains("```bash\ngo run main.go\n```"));
        assert!(readme.contains("Current Streak: **3 days**"));
        assert!(readme.contains("Total Projects: **5**"));
    }

    #[test]
    fn test_project_readme_unknown_language() {
        let renderer = ReadmeRenderer::new().unwrap();
        let readme = renderer
            .project_readme("zig", "mini-project", date("2024-01-10"), &StreakRecord::default())
            .unwrap();

        assert!(readme.starts_with("# 💻 Mini Project\n"));
        assert!(readme.contains("Language: **Zig** | Project #1"));
        assert!(readme.contains("# Run the main file"));
    }

    #[test]
    fn test_root_readme_orders_languages_and_caps_bars() {
        let mut record = streak();
        record.languages_used.insert("c".to_string(), 20);
        let renderer = ReadmeRenderer::new().unwrap();
        let readme = renderer
            .root_readme(
                &record,
                date("2024-01-10"),
                vec!["2024-01-10-go-http-server".to_string()],
                "./projects",
            )
            .unwrap();

        let c_label = format!("| {} C |", emoji_for("c"));
        let c_row = readme.find(&c_label).unwrap();
        let py_row = readme.find("| 🐍 Python |").unwrap();
        let go_row = readme.find("| 🐹 Go |").unwrap();
        assert!(c_row < py_row && py_row < go_row);
        assert!(readme.contains(&format!("{} {} **20** |", c_label, "█".repeat(30))));
        assert!(readme.contains(&format!("| 🐹 Go | {} **1** |", "█".repeat(2))));
        assert!(readme.contains(
            "- [`2024-01-10-go-http-server`](./projects/2024-01-10-go-http-server/)"
        ));
        assert!(readme.contains("| 📅 Last Updated | **2024-01-10** |"));
    }

    #[test]
    fn test_recent_projects_sorted_and_limited() {
        let temp = TempDir::new().unwrap();
        for day in 1..=12 {
            std::fs::create_dir(temp.path().join(format!("2024-01-{:02}-c-stack-array", day)))
                .unwrap();
        }
        std::fs::write(temp.path().join("stray.txt"), "").unwrap();

        let recent = recent_projects(temp.path(), RECENT_PROJECTS);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], "2024-01-12-c-stack-array");
        assert_eq!(recent[9], "2024-01-03-c-stack-array");
    }

    #[test]
    fn test_recent_projects_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(recent_projects(&temp.path().join("nope"), 10).is_empty());
    }
}

//! @acp:module "Language Metadata"
//! @acp:summary "Per-language file names, emoji and run instructions"
//! @acp:domain cli
//! @acp:layer model

/// Static facts about a supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    /// Identifier used in config and directory names
    pub name: &'static str,
    /// Human-readable name
    pub display: &'static str,
    /// Template file extension (without dot)
    pub extension: &'static str,
    /// Entry point file written into the project
    pub main_file: &'static str,
    pub emoji: &'static str,
    /// Shell command that runs the project
    pub run_command: &'static str,
}

pub const LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        name: "python",
        display: "Python",
        extension: "py",
        main_file: "main.py",
        emoji: "🐍",
        run_command: "python3 main.py",
    },
    LanguageInfo {
        name: "javascript",
        display: "JavaScript",
        extension: "js",
        main_file: "index.js",
        emoji: "🟨",
        run_command: "node index.js",
    },
    LanguageInfo {
        name: "java",
        display: "Java",
        extension: "java",
        main_file: "Main.java",
        emoji: "☕",
        run_command: "javac Main.java && java Main",
    },
    LanguageInfo {
        name: "c",
        display: "C",
        extension: "c",
        main_file: "main.c",
        emoji: "⚙️",
        run_command: "gcc -o main main.c && ./main",
    },
    LanguageInfo {
        name: "go",
        display: "Go",
        extension: "go",
        main_file: "main.go",
        emoji: "🐹",
        run_command: "go run main.go",
    },
];

/// Template extensions in lookup order
pub const TEMPLATE_EXTENSIONS: &[&str] = &["py", "js", "java", "c", "go", "txt"];

pub const DEFAULT_MAIN_FILE: &str = "main.txt";
pub const DEFAULT_EMOJI: &str = "💻";
pub const DEFAULT_RUN_COMMAND: &str = "# Run the main file";

/// Look up a language by its exact identifier
pub fn lookup(language: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|info| info.name == language)
}

/// Entry point file name for a language
pub fn main_file_for(language: &str) -> &'static str {
    lookup(language).map_or(DEFAULT_MAIN_FILE, |info| info.main_file)
}

/// Output file name for a template with the given extension
pub fn main_file_for_extension(extension: &str) -> &'static str {
    LANGUAGES
        .iter()
        .find(|info| info.extension == extension)
        .map_or(DEFAULT_MAIN_FILE, |info| info.main_file)
}

pub fn emoji_for(language: &str) -> &'static str {
    lookup(language).map_or(DEFAULT_EMOJI, |info| info.emoji)
}

pub fn run_command_for(language: &str) -> &'static str {
    lookup(language).map_or(DEFAULT_RUN_COMMAND, |info| info.run_command)
}

/// Display name; unknown languages get their first letter capitalized
pub fn display_name(language: &str) -> String {
    match lookup(language) {
        Some(info) => info.display.to_string(),
        None => {
            let mut chars = language.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

//! @acp:module "AI Generator"
//! @acp:summary "Project source generation through a text-generation service"
//! @acp:domain cli
//! @acp:layer service
//!
//! Uses blocking HTTP via `ureq`; the CLI has no async runtime. Every failure
//! on this path (missing key, transport error, unusable output) degrades to
//! `None` so the run falls back to templates.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::{json, Value};

use super::language::main_file_for;
use super::{ContentProvider, ContentSource, ProjectFiles};
use crate::config::AiConfig;

static CLOSING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*```\s*$").unwrap());

/// Errors from a generation service call
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("response parse error: {0}")]
    Parse(String),
    #[error("empty response from service")]
    EmptyResponse,
}

/// Abstraction over the remote text-generation service
pub trait TextGenerator {
    /// Send a prompt and return the raw response text
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model name (for logging)
    fn model_name(&self) -> &str;
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    model: String,
    endpoint: String,
    api_key_env: String,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
            agent: ureq::AgentBuilder::new()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build(),
        }
    }

    /// Key is read per call so a missing variable only disables this path
    fn api_key(&self) -> Result<String, GenerationError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(GenerationError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [
                {"role": "user", "parts": [{"text": prompt}]}
            ]
        });

        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &api_key)
            .set("content-type", "application/json")
            .send_json(body)
            .map_err(|e| match e {
                ureq::Error::Status(status, response) => GenerationError::Api {
                    status,
                    message: response
                        .into_string()
                        .unwrap_or_else(|_| "unreadable error body".to_string()),
                },
                ureq::Error::Transport(t) => GenerationError::Http(t.to_string()),
            })?;

        let json: Value = response
            .into_json()
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        extract_text(&json).ok_or(GenerationError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(json: &Value) -> Option<String> {
    let parts = json
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// @acp:summary "Build the generation prompt for a language and project type"
pub fn build_prompt(language: &str, project_type: &str) -> String {
    format!(
        "Generate a complete, working {language} mini-project: {project_type}.

Requirements:
- Write ONLY the code, no explanations or markdown formatting
- The code must be complete, compilable/runnable, and well-commented
- Include meaningful logic (not just hello world)
- Add proper error handling
- Make it educational and demonstrate good coding practices
- The code should be between 40-120 lines
- Include a header comment with project name and brief description

The project type is: {project_type}
Language: {language}
"
    )
}

/// @acp:summary "Remove a markdown code fence wrapped around the whole text"
///
/// The opening line (```` ```lang ````) is dropped whenever the text starts
/// with a fence; the last line is dropped only if it is a bare closing fence.
pub fn strip_code_fence(text: &str) -> String {
    let code = text.trim();
    if !code.starts_with("```") {
        return code.to_string();
    }

    let mut lines: Vec<&str> = code.lines().skip(1).collect();
    if lines.last().is_some_and(|line| CLOSING_FENCE.is_match(line)) {
        lines.pop();
    }
    lines.join("\n")
}

/// @acp:summary "Content provider backed by a text generator"
pub struct AiGenerator<G> {
    generator: G,
    min_length: usize,
}

impl<G: TextGenerator> AiGenerator<G> {
    pub fn new(generator: G, min_length: usize) -> Self {
        Self {
            generator,
            min_length,
        }
    }
}

impl AiGenerator<GeminiClient> {
    /// Generator talking to the configured Gemini endpoint
    pub fn gemini(config: &AiConfig) -> Self {
        Self::new(GeminiClient::new(config), config.min_length)
    }
}

impl<G: TextGenerator> ContentProvider for AiGenerator<G> {
    fn source(&self) -> ContentSource {
        ContentSource::Ai
    }

    fn provide(&self, language: &str, project_type: &str) -> Option<ProjectFiles> {
        tracing::debug!(
            "Requesting {} {} from {}",
            language,
            project_type,
            self.generator.model_name()
        );

        let raw = match self.generator.generate(&build_prompt(language, project_type)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("AI generation unavailable: {}", e);
                return None;
            }
        };

        let code = strip_code_fence(&raw);
        if code.chars().count() < self.min_length {
            tracing::warn!(
                "AI returned too little code ({} chars, need {})",
                code.chars().count(),
                self.min_length
            );
            return None;
        }

        let mut files = ProjectFiles::new();
        files.insert(main_file_for(language).to_string(), code);
        Some(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedGenerator(Result<String, String>);

    impl TextGenerator for FixedGenerator {
        fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            self.0.clone().map_err(GenerationError::Http)
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    fn generator(output: &str) -> AiGenerator<FixedGenerator> {
        AiGenerator::new(FixedGenerator(Ok(output.to_string())), 20)
    }

    #[test]
    fn test_strip_fence_with_language() {
        let raw = "```python\nprint('hello')\nprint('world')\n```";
        assert_eq!(strip_code_fence(raw), "print('hello')\nprint('world')");
    }

    #[test]
    fn test_strip_fence_without_closing() {
        let raw = "```go\npackage main\nfunc main() {}";
        assert_eq!(strip_code_fence(raw), "package main\nfunc main() {}");
    }

    #[test]
    fn test_unfenced_text_is_trimmed_only() {
        assert_eq!(strip_code_fence("\n  int x = 1;  \n"), "int x = 1;");
    }

    #[test]
    fn test_inner_fences_are_kept() {
        let raw = "```md\nExample:\n```\ncode\n```\nend\n```";
        assert_eq!(strip_code_fence(raw), "Example:\n```\ncode\n```\nend");
    }

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_prompt("go", "http-server");
        assert!(prompt.starts_with("Generate a complete, working go mini-project: http-server."));
        assert!(prompt.contains("Language: go"));
    }

    #[test]
    fn test_provide_maps_to_main_file() {
        let code = "package main\n\nimport \"fmt\"\n\nfunc main() { fmt.Println(\"hi\") }";
        let files = generator(&format!("```go\n{}\n```", code))
            .provide("go", "http-server")
            .unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files["main.go"], code);
    }

    #[test]
    fn test_short_output_is_rejected() {
        assert_eq!(generator("0123456789").provide("python", "cli-calculator"), None);
    }

    #[test]
    fn test_short_after_fence_strip_is_rejected() {
        let raw = "```python\nx = 1\n```";
        assert_eq!(generator(raw).provide("python", "cli-calculator"), None);
    }

    #[test]
    fn test_service_error_degrades_to_none() {
        let ai = AiGenerator::new(FixedGenerator(Err("connection refused".into())), 20);
        assert_eq!(ai.provide("c", "stack-array"), None);
    }

    #[test]
    fn test_missing_api_key_degrades_to_none() {
        let config = AiConfig {
            api_key_env: "DAILY_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AiConfig::default()
        };
        let ai = AiGenerator::gemini(&config);
        assert_eq!(ai.provide("python", "todo-manager"), None);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let json = json!({
            "candidates": [
                {"content": {"parts": [{"text": "fn main() {"}, {"text": "}"}]}}
            ]
        });
        assert_eq!(extract_text(&json).as_deref(), Some("fn main() {}"));
        assert_eq!(extract_text(&json!({"candidates": []})), None);
    }
}

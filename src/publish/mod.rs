//! @acp:module "Publisher"
//! @acp:summary "Commit and push the run's output with git"
//! @acp:domain cli
//! @acp:layer integration
//!
//! git is driven as a subprocess from the repository root. The steps are
//! `add -A`, `commit -m`, `push`, and on push failure a single
//! `push -u <remote> <branch>` retry.

use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use crate::config::GitConfig;
use crate::error::{DailyError, Result};

/// Marker git prints when the index has no changes
const NOTHING_TO_COMMIT: &str = "nothing to commit";

/// @acp:summary "How a publish attempt ended"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Committed and pushed
    Pushed,
    /// Committed; the plain push failed and the upstream-tracking push succeeded
    PushedWithUpstream,
    /// The working tree was already clean
    NothingToCommit,
}

impl fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishOutcome::Pushed => write!(f, "pushed"),
            PublishOutcome::PushedWithUpstream => write!(f, "pushed (set upstream)"),
            PublishOutcome::NothingToCommit => write!(f, "nothing to commit"),
        }
    }
}

/// Publishing seam used by the run orchestrator
pub trait Publisher {
    fn publish(&self, message: &str) -> Result<PublishOutcome>;
}

/// Captured result of one git invocation
#[derive(Debug, Clone, Default)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    fn mentions(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }
}

/// Runs git with the given arguments
pub trait GitRunner {
    fn git(&self, args: &[&str]) -> Result<GitOutput>;
}

/// @acp:summary "Runs the system git binary inside a repository"
#[derive(Debug, Clone)]
pub struct SystemGit {
    repo_root: PathBuf,
}

impl SystemGit {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

impl GitRunner for SystemGit {
    fn git(&self, args: &[&str]) -> Result<GitOutput> {
        tracing::debug!("git {}", args.join(" "));
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()?;

        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// @acp:summary "Publisher that commits everything and pushes"
pub struct GitPublisher<R> {
    runner: R,
    config: GitConfig,
}

impl GitPublisher<SystemGit> {
    /// Publisher for the repository at `repo_root`
    pub fn system(repo_root: impl Into<PathBuf>, config: GitConfig) -> Self {
        Self::new(SystemGit::new(repo_root), config)
    }
}

impl<R: GitRunner> GitPublisher<R> {
    pub fn new(runner: R, config: GitConfig) -> Self {
        Self { runner, config }
    }

    /// Run a step that must succeed
    fn required(&self, args: &[&str]) -> Result<GitOutput> {
        let output = self.runner.git(args)?;
        if output.success {
            Ok(output)
        } else {
            Err(DailyError::Git {
                command: args.join(" "),
                stderr: output.stderr.trim().to_string(),
            })
        }
    }

    fn configure_identity(&self) -> Result<()> {
        if let Some(name) = &self.config.user_name {
            self.required(&["config", "user.name", name.as_str()])?;
        }
        if let Some(email) = &self.config.user_email {
            self.required(&["config", "user.email", email.as_str()])?;
        }
        Ok(())
    }
}

impl<R: GitRunner> Publisher for GitPublisher<R> {
    fn publish(&self, message: &str) -> Result<PublishOutcome> {
        self.configure_identity()?;
        self.required(&["add", "-A"])?;

        let commit = self.runner.git(&["commit", "-m", message])?;
        if !commit.success {
            if commit.mentions(NOTHING_TO_COMMIT) {
                tracing::info!("Nothing to commit, working tree clean");
                return Ok(PublishOutcome::NothingToCommit);
            }
            return Err(DailyError::Git {
                command: "commit".to_string(),
                stderr: commit.stderr.trim().to_string(),
            });
        }
        tracing::info!("Committed: {}", message);

        let push = self.runner.git(&["push"])?;
        if push.success {
            return Ok(PublishOutcome::Pushed);
        }
        tracing::warn!("Push failed: {}", push.stderr.trim());

        let retry = self
            .runner
            .git(&["push", "-u", self.config.remote.as_str(), self.config.branch.as_str()])?;
        if retry.success {
            Ok(PublishOutcome::PushedWithUpstream)
        } else {
            Err(DailyError::Publish(format!(
                "push to {}/{} failed: {}",
                self.config.remote,
                self.config.branch,
                retry.stderr.trim()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned outputs and records every invocation
    struct ScriptedGit {
        responses: RefCell<VecDeque<GitOutput>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedGit {
        fn new(responses: Vec<GitOutput>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GitRunner for &ScriptedGit {
        fn git(&self, args: &[&str]) -> Result<GitOutput> {
            self.calls.borrow_mut().push(args.join(" "));
            Ok(self.responses.borrow_mut().pop_front().unwrap_or_else(ok))
        }
    }

    fn ok() -> GitOutput {
        GitOutput {
            success: true,
            ..GitOutput::default()
        }
    }

    fn fail(stdout: &str, stderr: &str) -> GitOutput {
        GitOutput {
            success: false,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_happy_path() {
        let git = ScriptedGit::new(vec![]);
        let outcome = GitPublisher::new(&git, GitConfig::default())
            .publish("🚀 Daily Project: x (2024-01-10)")
            .unwrap();

        assert_eq!(outcome, PublishOutcome::Pushed);
        assert_eq!(
            git.calls.into_inner(),
            vec!["add -A", "commit -m 🚀 Daily Project: x (2024-01-10)", "push"]
        );
    }

    #[test]
    fn test_identity_configured_when_set() {
        let git = ScriptedGit::new(vec![]);
        let config = GitConfig {
            user_name: Some("Daily Bot".to_string()),
            user_email: Some("bot@example.com".to_string()),
            ..GitConfig::default()
        };
        GitPublisher::new(&git, config).publish("msg").unwrap();

        let calls = git.calls.into_inner();
        assert_eq!(calls[0], "config user.name Daily Bot");
        assert_eq!(calls[1], "config user.email bot@example.com");
    }

    #[test]
    fn test_nothing_to_commit_is_success() {
        let git = ScriptedGit::new(vec![
            ok(),
            fail("On branch main\nnothing to commit, working tree clean\n", ""),
        ]);
        let outcome = GitPublisher::new(&git, GitConfig::default())
            .publish("msg")
            .unwrap();

        assert_eq!(outcome, PublishOutcome::NothingToCommit);
        assert_eq!(git.calls.into_inner().len(), 2);
    }

    #[test]
    fn test_commit_failure_is_error() {
        let git = ScriptedGit::new(vec![ok(), fail("", "fatal: unable to auto-detect email")]);
        let err = GitPublisher::new(&git, GitConfig::default())
            .publish("msg")
            .unwrap_err();

        assert!(matches!(err, DailyError::Git { ref command, .. } if command == "commit"));
    }

    #[test]
    fn test_push_falls_back_to_upstream() {
        let git = ScriptedGit::new(vec![
            ok(),
            ok(),
            fail("", "fatal: The current branch has no upstream branch."),
        ]);
        let config = GitConfig {
            branch: "trunk".to_string(),
            ..GitConfig::default()
        };
        let outcome = GitPublisher::new(&git, config).publish("msg").unwrap();

        assert_eq!(outcome, PublishOutcome::PushedWithUpstream);
        assert_eq!(git.calls.into_inner().last().unwrap(), "push -u origin trunk");
    }

    #[test]
    fn test_second_push_failure_is_publish_error() {
        let git = ScriptedGit::new(vec![
            ok(),
            ok(),
            fail("", "rejected"),
            fail("", "still rejected"),
        ]);
        let err = GitPublisher::new(&git, GitConfig::default())
            .publish("msg")
            .unwrap_err();

        assert!(matches!(err, DailyError::Publish(ref msg) if msg.contains("still rejected")));
    }

    #[test]
    fn test_add_failure_stops_before_commit() {
        let git = ScriptedGit::new(vec![fail("", "fatal: not a git repository")]);
        let result = GitPublisher::new(&git, GitConfig::default()).publish("msg");

        assert!(result.is_err());
        assert_eq!(git.calls.into_inner(), vec!["add -A"]);
    }
}

//! @acp:module "Streak Ledger"
//! @acp:summary "Persistent project counter and consecutive-day streak"
//! @acp:domain cli
//! @acp:layer persistence
//!
//! # Streak rules
//!
//! Every successful run calls [`record_completion`] once with the run date:
//!
//! 1. `total_projects` and the language's counter grow by one
//! 2. a run on the day after `last_date` extends the streak
//! 3. a run on the same day as `last_date` leaves the streak alone
//! 4. anything else restarts the streak at 1
//!
//! Same-day reruns still bump the totals, so two runs on one day count as two
//! projects but one streak day.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// @acp:summary "Persisted streak state (streak.json)"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub total_projects: u64,

    #[serde(default)]
    pub current_streak: u64,

    #[serde(default)]
    pub last_date: Option<NaiveDate>,

    #[serde(default)]
    pub languages_used: BTreeMap<String, u64>,
}

impl StreakRecord {
    /// Languages ordered by project count, most used first
    pub fn languages_by_count(&self) -> Vec<(&str, u64)> {
        let mut langs: Vec<(&str, u64)> = self
            .languages_used
            .iter()
            .map(|(lang, count)| (lang.as_str(), *count))
            .collect();
        langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        langs
    }

    /// Whether `total_projects` agrees with the per-language counters
    pub fn is_consistent(&self) -> bool {
        self.total_projects == self.languages_used.values().sum::<u64>()
    }
}

/// @acp:summary "Compute the record that follows a completed run"
pub fn record_completion(record: &StreakRecord, language: &str, today: NaiveDate) -> StreakRecord {
    let mut next = record.clone();
    next.total_projects += 1;
    *next.languages_used.entry(language.to_string()).or_insert(0) += 1;

    let yesterday = today - Duration::days(1);
    match record.last_date {
        Some(last) if last == yesterday => next.current_streak += 1,
        Some(last) if last == today => {}
        _ => next.current_streak = 1,
    }

    next.last_date = Some(today);
    next
}

/// @acp:summary "File-backed store for the streak record"
#[derive(Debug, Clone)]
pub struct StreakLedger {
    path: PathBuf,
}

impl StreakLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// @acp:summary "Read the record, falling back to the zero record"
    ///
    /// Never fails: a missing file is a fresh ledger and an unreadable one is
    /// logged and treated the same way.
    pub fn load(&self) -> StreakRecord {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No streak file at {:?}, starting fresh", self.path);
                return StreakRecord::default();
            }
            Err(e) => {
                tracing::warn!("Could not read streak file {:?}: {}", self.path, e);
                return StreakRecord::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Ignoring malformed streak file {:?}: {}", self.path, e);
                StreakRecord::default()
            }
        }
    }

    /// @acp:summary "Overwrite the backing file with the full record"
    pub fn save(&self, record: &StreakRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

//! @acp:module "Project Naming"
//! @acp:summary "Derive the directory name of today's project"
//! @acp:domain cli
//! @acp:layer service
//!
//! Names have the form `{date}-{language}-{project_type}`. When that directory
//! already exists a 4-hex-digit suffix is appended once; the suffixed name is
//! not checked again.

use chrono::NaiveDate;
use rand::Rng;
use std::fmt;
use std::path::Path;

/// Length of the collision suffix in hex digits
pub const DISAMBIGUATOR_LEN: usize = 4;

/// @acp:summary "Identity of one generated project"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub date: NaiveDate,
    pub language: String,
    pub project_type: String,
    pub disambiguator: Option<String>,
}

impl ProjectIdentity {
    pub fn new(date: NaiveDate, language: &str, project_type: &str) -> Self {
        Self {
            date,
            language: language.to_string(),
            project_type: project_type.to_string(),
            disambiguator: None,
        }
    }

    /// Directory name for this identity
    pub fn dir_name(&self) -> String {
        let base = format!(
            "{}-{}-{}",
            self.date.format("%Y-%m-%d"),
            self.language,
            self.project_type
        );
        match &self.disambiguator {
            Some(suffix) => format!("{}-{}", base, suffix),
            None => base,
        }
    }
}

impl fmt::Display for ProjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

/// @acp:summary "Resolves collision-free project names"
pub struct ProjectNameResolver<R> {
    rng: R,
}

impl<R: Rng> ProjectNameResolver<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// @acp:summary "Pick the directory name for a run"
    ///
    /// `exists` is asked about `base_dir/<candidate>`; it is the only source of
    /// truth for collisions.
    pub fn resolve<F>(
        &mut self,
        base_dir: &Path,
        date: NaiveDate,
        language: &str,
        project_type: &str,
        exists: F,
    ) -> ProjectIdentity
    where
        F: Fn(&Path) -> bool,
    {
        let mut identity = ProjectIdentity::new(date, language, project_type);
        if exists(&base_dir.join(identity.dir_name())) {
            let suffix = disambiguator(&mut self.rng);
            tracing::debug!(
                "Project {} already exists, using suffix {}",
                identity.dir_name(),
                suffix
            );
            identity.disambiguator = Some(suffix);
        }
        identity
    }
}

/// Short hex suffix: MD5 of a random number's text, truncated
pub fn disambiguator<R: Rng + ?Sized>(rng: &mut R) -> String {
    let seed: f64 = rng.random();
    let digest = md5::compute(seed.to_string().as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(DISAMBIGUATOR_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn resolver(seed: u64) -> ProjectNameResolver<StdRng> {
        ProjectNameResolver::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_no_collision_is_deterministic() {
        let base = PathBuf::from("projects");
        let a = resolver(1).resolve(&base, date("2024-01-10"), "go", "http-server", |_| false);
        let b = resolver(2).resolve(&base, date("2024-01-10"), "go", "http-server", |_| false);

        assert_eq!(a.dir_name(), "2024-01-10-go-http-server");
        assert_eq!(a, b);
        assert_eq!(a.disambiguator, None);
    }

    #[test]
    fn test_collision_appends_hex_suffix() {
        let base = PathBuf::from("projects");
        let taken = base.join("2024-01-10-c-stack-array");
        let id = resolver(7).resolve(&base, date("2024-01-10"), "c", "stack-array", |p| p == taken);

        let suffix = id.disambiguator.clone().expect("suffix on collision");
        assert_eq!(suffix.len(), DISAMBIGUATOR_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id.to_string(), format!("2024-01-10-c-stack-array-{}", suffix));
    }

    #[test]
    fn test_exists_receives_joined_path() {
        let base = PathBuf::from("/tmp/out");
        let seen = std::cell::RefCell::new(Vec::new());
        resolver(3).resolve(&base, date("2024-02-29"), "java", "bank-account", |p| {
            seen.borrow_mut().push(p.to_path_buf());
            false
        });
        assert_eq!(
            seen.into_inner(),
            vec![PathBuf::from("/tmp/out/2024-02-29-java-bank-account")]
        );
    }

    #[test]
    fn test_collision_checked_only_once() {
        let calls = std::cell::Cell::new(0);
        let id = resolver(9).resolve(
            Path::new("p"),
            date("2024-01-10"),
            "python",
            "todo-manager",
            |_| {
                calls.set(calls.get() + 1);
                true
            },
        );
        assert_eq!(calls.get(), 1);
        assert!(id.disambiguator.is_some());
    }

    #[test]
    fn test_seeded_suffix_is_reproducible() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(disambiguator(&mut a), disambiguator(&mut b));
    }
}

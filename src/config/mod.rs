//! Run configuration for Workflow Guardian
//!
//! Architecture: Anti-Corruption Layer - Ambient inputs are captured once and injected
//! - GuardianConfig carries the fixed policy (workflow root and allowlist)
//! - RunEnvironment captures the CI environment variables so business logic never reads them
//! - Defaults are embedded in the domain, not read from files

use std::collections::BTreeSet;
use std::env;
use std::path::{Path, PathBuf};

/// Workflow directory relative to the repository root
pub const WORKFLOW_DIR: &str = ".github/workflows";

/// Branch whose workflows are being protected
pub const MAIN_BRANCH: &str = "main";

/// Staging branch that must not be referenced
pub const CANDIDATE_BRANCH: &str = "candidate";

/// Environment variable set to `true` inside GitHub Actions
pub const CI_FLAG_VAR: &str = "GITHUB_ACTIONS";

/// Environment variable naming the step summary file
pub const SUMMARY_PATH_VAR: &str = "GITHUB_STEP_SUMMARY";

/// Basenames exempt from the candidate reference check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allowlist {
    names: BTreeSet<String>,
}

impl Allowlist {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { names: names.into_iter().map(Into::into).collect() }
    }

    /// Exact, case-sensitive basename match
    pub fn contains(&self, basename: &str) -> bool {
        self.names.contains(basename)
    }

    /// Whether the file at `path` is exempt
    pub fn allows_path(&self, path: &Path) -> bool {
        path.file_name().and_then(|name| name.to_str()).is_some_and(|name| self.contains(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        Self::new(["pr-validation.yml", "pr-validation.yaml"])
    }
}

/// Fixed policy for one validation run
#[derive(Debug, Clone)]
pub struct GuardianConfig {
    /// Repository root that printed paths are relative to
    pub repo_root: PathBuf,
    /// Directory walked for workflow files
    pub workflow_dir: PathBuf,
    /// Files that are never scanned
    pub allowlist: Allowlist,
}

impl GuardianConfig {
    /// Production configuration rooted at `repo_root`
    pub fn for_repo<P: AsRef<Path>>(repo_root: P) -> Self {
        let repo_root = repo_root.as_ref().to_path_buf();
        Self {
            workflow_dir: repo_root.join(WORKFLOW_DIR),
            repo_root,
            allowlist: Allowlist::default(),
        }
    }

    /// Replace the allowlist
    pub fn with_allowlist(mut self, allowlist: Allowlist) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Path as it should be shown to users, relative to the repository root
    pub fn display_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.repo_root).unwrap_or(path)
    }
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self::for_repo(".")
    }
}

/// CI context captured from the process environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunEnvironment {
    /// Running inside a CI runner
    pub in_ci: bool,
    /// Where to append the step summary, if configured
    pub summary_path: Option<PathBuf>,
}

impl RunEnvironment {
    /// Capture from the real process environment
    pub fn from_env() -> Self {
        Self::from_vars(env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Build from explicit key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut environment = Self::default();

        for (key, value) in vars {
            match key.as_ref() {
                CI_FLAG_VAR => environment.in_ci = value.into() == "true",
                SUMMARY_PATH_VAR => {
                    let value = value.into();
                    if !value.is_empty() {
                        environment.summary_path = Some(PathBuf::from(value));
                    }
                }
                _ => {}
            }
        }

        environment
    }

    /// Step summary destination, only when running in CI
    pub fn summary_target(&self) -> Option<&Path> {
        if self.in_ci {
            self.summary_path.as_deref()
        } else {
            None
        }
    }
}

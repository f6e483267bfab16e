//! Core domain models for candidate branch references and validation results
//!
//! Architecture: Rich Domain Models - Violations carry their own locations and rendering
//! - A MatchedLine remembers the exact text it was found on and which rules fired
//! - ValidationReport acts as the aggregate root for a single run over the workflow tree

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The four categories of disallowed candidate branch references
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// `SDLC_BRANCH: candidate` environment assignment
    SdlcBranchAssignment,
    /// A `branches:` trigger line that names the candidate branch
    BranchTrigger,
    /// A YAML sequence item naming the candidate branch
    SequenceItem,
    /// A `uses:` action reference pinned to `@candidate`
    PinnedAction,
}

impl RuleKind {
    /// All rule kinds in declaration order
    pub const ALL: [RuleKind; 4] = [
        RuleKind::SdlcBranchAssignment,
        RuleKind::BranchTrigger,
        RuleKind::SequenceItem,
        RuleKind::PinnedAction,
    ];

    /// Stable identifier used in annotations and JSON output
    pub fn id(self) -> &'static str {
        match self {
            Self::SdlcBranchAssignment => "sdlc_branch_assignment",
            Self::BranchTrigger => "branch_trigger",
            Self::SequenceItem => "sequence_item",
            Self::PinnedAction => "pinned_action",
        }
    }

    /// Example of the offending construct, rendered as it would appear in a workflow
    pub fn example(self) -> &'static str {
        match self {
            Self::SdlcBranchAssignment => "SDLC_BRANCH: candidate",
            Self::BranchTrigger => "branches: [..., candidate]",
            Self::SequenceItem => "- candidate",
            Self::PinnedAction => "uses: j708-zp9u/...@candidate",
        }
    }

    /// Human-readable description of the rule
    pub fn description(self) -> &'static str {
        match self {
            Self::SdlcBranchAssignment => "environment variable assignments",
            Self::BranchTrigger => "branch triggers naming the candidate branch",
            Self::SequenceItem => "YAML list items naming the candidate branch",
            Self::PinnedAction => "actions pinned to the candidate branch",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single line that matched one or more disallowed patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedLine {
    /// Line number (1-indexed)
    pub line_number: u32,
    /// Exact original line text, whitespace included
    pub text: String,
    /// Rules that matched this line, in declaration order
    pub rules: Vec<RuleKind>,
}

impl MatchedLine {
    pub fn new(line_number: u32, text: impl Into<String>, rules: Vec<RuleKind>) -> Self {
        Self { line_number, text: text.into(), rules }
    }

    /// Format as `<line>:<text>` for console output
    pub fn format_display(&self) -> String {
        format!("{}:{}", self.line_number, self.text)
    }
}

/// A workflow file together with every line that references the candidate branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending workflow file
    pub file_path: PathBuf,
    /// Matched lines in ascending line order
    pub lines: Vec<MatchedLine>,
}

impl Violation {
    pub fn new(file_path: PathBuf, lines: Vec<MatchedLine>) -> Self {
        Self { file_path, lines }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Number of offending lines in this file
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Result of checking a single workflow file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Basename is on the allowlist; content was never read
    Skipped,
    /// Scanned with no matches
    Clean,
    /// Scanned and at least one line matched
    Violating(Vec<MatchedLine>),
}

/// Aggregate result of one validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Files that were scanned (not allowlisted)
    pub files_checked: usize,
    /// Files skipped through the allowlist
    pub files_skipped: usize,
    /// Violations in collection order
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of checking one file
    pub fn record(&mut self, file_path: &Path, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Skipped => self.files_skipped += 1,
            FileOutcome::Clean => self.files_checked += 1,
            FileOutcome::Violating(lines) => {
                self.files_checked += 1;
                self.violations.push(Violation::new(file_path.to_path_buf(), lines));
            }
        }
    }

    /// Whether any file contained a candidate reference
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Files that were scanned and came back clean
    pub fn clean_files(&self) -> usize {
        self.files_checked.saturating_sub(self.violations.len())
    }

    /// Total matched lines across all files
    pub fn total_lines(&self) -> usize {
        self.violations.iter().map(Violation::line_count).sum()
    }

    /// Total files seen by the collector
    pub fn total_files(&self) -> usize {
        self.files_checked + self.files_skipped
    }
}

/// Error types that can occur during validation
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    /// Generic I/O failure
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Workflow directory could not be traversed
    #[error("Failed to collect workflow files under {path}: {message}")]
    Collection { path: String, message: String },

    /// Workflow file could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Pattern compilation failed
    #[error("Pattern error: {message}")]
    Pattern { message: String },

    /// Report could not be rendered or written
    #[error("Report error: {message}")]
    Report { message: String },
}

impl GuardianError {
    /// Create a collection error
    pub fn collection(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Collection { path: path.as_ref().display().to_string(), message: message.into() }
    }

    /// Create a read error
    pub fn read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Read { path: path.as_ref().display().to_string(), source }
    }

    /// Create a pattern error
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern { message: message.into() }
    }

    /// Create a report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report { message: message.into() }
    }
}

/// Result type for Guardian operations
pub type GuardianResult<T> = Result<T, GuardianError>;

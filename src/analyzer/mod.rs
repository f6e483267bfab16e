//! Per-file analysis for Workflow Guardian
//!
//! Architectural Principle: Service Layer - Analyzer turns one workflow path into one outcome
//! - Applies the allowlist before any I/O happens
//! - Reads the file and hands its text to the pattern set
//! - Read failures are surfaced to the caller, never swallowed

use crate::config::Allowlist;
use crate::domain::violations::{FileOutcome, GuardianError, GuardianResult};
use crate::patterns::PatternSet;
use std::fs;
use std::path::Path;

/// Checks individual workflow files against the candidate reference rules
#[derive(Debug, Clone)]
pub struct Analyzer {
    patterns: PatternSet,
    allowlist: Allowlist,
}

impl Analyzer {
    pub fn new(patterns: PatternSet, allowlist: Allowlist) -> Self {
        Self { patterns, allowlist }
    }

    /// Analyzer with the built-in rules and allowlist
    pub fn with_defaults() -> GuardianResult<Self> {
        Ok(Self::new(PatternSet::with_defaults()?, Allowlist::default()))
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    pub fn allowlist(&self) -> &Allowlist {
        &self.allowlist
    }

    /// Whether the file would be skipped without being read
    pub fn is_allowlisted(&self, file_path: &Path) -> bool {
        self.allowlist.allows_path(file_path)
    }

    /// Check file content that has already been read
    pub fn check_content(&self, basename: &str, content: &str) -> FileOutcome {
        if self.allowlist.contains(basename) {
            return FileOutcome::Skipped;
        }

        self.scan(content)
    }

    fn scan(&self, content: &str) -> FileOutcome {
        let matches = self.patterns.find_candidate_references(content);
        if matches.is_empty() {
            FileOutcome::Clean
        } else {
            FileOutcome::Violating(matches)
        }
    }

    /// Read a workflow file from disk and check it
    pub fn check_file<P: AsRef<Path>>(&self, file_path: P) -> GuardianResult<FileOutcome> {
        let file_path = file_path.as_ref();

        if self.is_allowlisted(file_path) {
            tracing::debug!("Skipping allowlisted workflow {}", file_path.display());
            return Ok(FileOutcome::Skipped);
        }

        let bytes = fs::read(file_path).map_err(|e| GuardianError::read(file_path, e))?;
        let outcome = self.scan(&String::from_utf8_lossy(&bytes));

        if let FileOutcome::Violating(lines) = &outcome {
            tracing::debug!("{} candidate references in {}", lines.len(), file_path.display());
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EVERY_RULE: &str = "env:\n  SDLC_BRANCH: candidate\non:\n  push:\n    branches: [candidate]\n    tags:\n      - candidate\njobs:\n  build:\n    steps:\n      - uses: j708-zp9u/actions/build@candidate\n";

    #[test]
    fn test_allowlisted_content_is_skipped_regardless_of_matches() {
        let analyzer = Analyzer::with_defaults().unwrap();

        assert_eq!(analyzer.check_content("pr-validation.yml", EVERY_RULE), FileOutcome::Skipped);
        assert_eq!(analyzer.check_content("pr-validation.yaml", EVERY_RULE), FileOutcome::Skipped);
    }

    #[test]
    fn test_every_rule_is_reported() {
        let analyzer = Analyzer::with_defaults().unwrap();

        match analyzer.check_content("release.yml", EVERY_RULE) {
            FileOutcome::Violating(lines) => {
                let numbers: Vec<u32> = lines.iter().map(|l| l.line_number).collect();
                assert_eq!(numbers, vec![2, 5, 7, 11]);
            }
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_content() {
        let analyzer = Analyzer::with_defaults().unwrap();
        let outcome = analyzer.check_content("ci.yml", "on:\n  push:\n    branches: [main]\n");
        assert_eq!(outcome, FileOutcome::Clean);
    }

    #[test]
    fn test_check_file_skips_without_reading() {
        let temp_dir = TempDir::new().unwrap();
        let analyzer = Analyzer::with_defaults().unwrap();

        // Never created, so reading it would fail
        let outcome = analyzer.check_file(temp_dir.path().join("pr-validation.yml")).unwrap();
        assert_eq!(outcome, FileOutcome::Skipped);
    }

    #[test]
    fn test_check_file_reads_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("release.yml");
        fs::write(&path, EVERY_RULE).unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        assert!(matches!(analyzer.check_file(&path).unwrap(), FileOutcome::Violating(_)));
    }

    #[test]
    fn test_check_file_tolerates_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ci.yml");
        fs::write(&path, b"name: \xff\xfe\n  - candidate\n").unwrap();

        let analyzer = Analyzer::with_defaults().unwrap();
        match analyzer.check_file(&path).unwrap() {
            FileOutcome::Violating(lines) => assert_eq!(lines[0].line_number, 2),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let analyzer = Analyzer::with_defaults().unwrap();

        let result = analyzer.check_file(temp_dir.path().join("gone.yml"));
        assert!(matches!(result, Err(GuardianError::Read { .. })));
    }

    #[test]
    fn test_custom_allowlist() {
        let analyzer =
            Analyzer::new(PatternSet::with_defaults().unwrap(), Allowlist::new(["candidate.yml"]));

        assert_eq!(analyzer.check_content("candidate.yml", EVERY_RULE), FileOutcome::Skipped);
        assert!(matches!(
            analyzer.check_content("pr-validation.yml", EVERY_RULE),
            FileOutcome::Violating(_)
        ));
    }
}

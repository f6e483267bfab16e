//! Report generation for the console and CI side channels
//!
//! CDD Principle: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - Progress lines are produced one event at a time so they can stream while files are checked
//! - GitHub workflow commands and JSON are rendered from the finished ValidationReport
//! - The step summary lives in its own module because it writes to a file

pub mod summary;

use crate::config::{CANDIDATE_BRANCH, MAIN_BRANCH};
use crate::domain::violations::{GuardianError, GuardianResult, MatchedLine, ValidationReport};
use serde::Serialize;
use std::path::Path;

pub use summary::StepSummary;

/// Supported output formats for the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Progress log with pass/fail banner
    #[default]
    Human,
    /// Single JSON document, no progress lines
    Json,
    /// Progress log plus GitHub Actions `::error` workflow commands
    GitHub,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "github" => Some(Self::GitHub),
            _ => None,
        }
    }

    /// Get all available format names
    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json", "github"]
    }

    /// Whether per-file progress is written while the run is in flight
    pub fn streams_progress(self) -> bool {
        !matches!(self, Self::Json)
    }
}

/// Final state of a run as reported to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Passed,
    Failed,
    NoWorkflowDirectory,
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to colour the pass/fail banners
    pub use_colors: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Renders console lines for each step of a run
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    /// Create a new report formatter with options
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn format_header(&self) -> String {
        format!("Checking workflow files that target the '{MAIN_BRANCH}' branch...\n\n")
    }

    pub fn format_no_workflow_directory(&self) -> String {
        "No workflow directory found; skipping validation.\n".to_string()
    }

    pub fn format_skipping(&self, path: &Path) -> String {
        format!("Skipping: {}\n", path.display())
    }

    pub fn format_checking(&self, path: &Path) -> String {
        format!("Checking: {}\n", path.display())
    }

    pub fn format_clean(&self) -> String {
        format!("  -> No '{CANDIDATE_BRANCH}' reference found\n")
    }

    pub fn format_violations(&self, path: &Path, lines: &[MatchedLine]) -> String {
        let mut output = format!(
            "ERROR: Found '{CANDIDATE_BRANCH}' reference in {} (which targets the {MAIN_BRANCH} branch)\n",
            path.display()
        );
        for line in lines {
            output.push_str(&line.format_display());
            output.push('\n');
        }
        output
    }

    /// Blank separator, file counts and the final banner
    pub fn format_verdict(&self, report: &ValidationReport) -> String {
        let mut output = String::from("\n");

        output.push_str(&format!(
            "Checked {} workflow file{}, skipped {}.\n",
            report.files_checked,
            plural(report.files_checked),
            report.files_skipped
        ));

        let banner = if report.has_violations() {
            format!(
                "❌ VALIDATION FAILED: Workflow files targeting the '{MAIN_BRANCH}' branch must not contain '{CANDIDATE_BRANCH}' branch references"
            )
        } else {
            format!(
                "✅ VALIDATION PASSED: No '{CANDIDATE_BRANCH}' branch references found in {MAIN_BRANCH} branch workflow files"
            )
        };

        output.push_str(&self.paint(&banner, report.has_violations()));
        output.push('\n');
        output
    }

    /// One GitHub Actions `::error` command per matched line
    pub fn format_github(&self, report: &ValidationReport) -> String {
        let mut output = String::new();

        for violation in &report.violations {
            for line in &violation.lines {
                let title = line.rules.iter().map(|r| r.id()).collect::<Vec<_>>().join(" ");
                let message = escape_workflow_data(&format!(
                    "'{CANDIDATE_BRANCH}' branch reference in a {MAIN_BRANCH} branch workflow: {}",
                    line.text.trim()
                ));

                output.push_str(&format!(
                    "::error file={},line={},title={}::{}\n",
                    escape_workflow_property(&violation.file_path.display().to_string()),
                    line.line_number,
                    escape_workflow_property(&title),
                    message
                ));
            }
        }

        output
    }

    /// Pretty-printed JSON document describing the run
    pub fn format_json(&self, status: RunStatus, report: &ValidationReport) -> GuardianResult<String> {
        #[derive(Serialize)]
        struct JsonReport<'a> {
            status: RunStatus,
            main_branch: &'static str,
            candidate_branch: &'static str,
            #[serde(flatten)]
            report: &'a ValidationReport,
        }

        let document = JsonReport {
            status,
            main_branch: MAIN_BRANCH,
            candidate_branch: CANDIDATE_BRANCH,
            report,
        };

        let mut json = serde_json::to_string_pretty(&document)
            .map_err(|e| GuardianError::report(format!("Failed to serialize report: {e}")))?;
        json.push('\n');
        Ok(json)
    }

    #[cfg(feature = "colors")]
    fn paint(&self, banner: &str, failed: bool) -> String {
        use colored::Colorize;

        if !self.options.use_colors {
            return banner.to_string();
        }
        if failed {
            banner.red().bold().to_string()
        } else {
            banner.green().bold().to_string()
        }
    }

    #[cfg(not(feature = "colors"))]
    fn paint(&self, banner: &str, _failed: bool) -> String {
        banner.to_string()
    }
}

pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

fn escape_workflow_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Property values additionally reserve `:` and `,`
fn escape_workflow_property(value: &str) -> String {
    escape_workflow_data(value).replace(':', "%3A").replace(',', "%2C")
}

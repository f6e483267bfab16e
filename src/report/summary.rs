//! Markdown step summary for CI runners
//!
//! Appended to the file named by `GITHUB_STEP_SUMMARY`. Each run adds one block.

use super::plural;
use crate::config::{CANDIDATE_BRANCH, MAIN_BRANCH};
use crate::domain::violations::{GuardianResult, RuleKind, ValidationReport};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Renders and appends the markdown summary of a run
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSummary;

impl StepSummary {
    pub fn new() -> Self {
        Self
    }

    /// Render the markdown block for a finished run
    pub fn render(&self, report: &ValidationReport) -> String {
        if report.has_violations() {
            self.render_failure(report)
        } else {
            self.render_success(report)
        }
    }

    fn render_success(&self, report: &ValidationReport) -> String {
        format!(
            "## ✅ Workflow validation passed\n\nChecked {} workflow file{}; no '{CANDIDATE_BRANCH}' branch references found.\n",
            report.files_checked,
            plural(report.files_checked)
        )
    }

    fn render_failure(&self, report: &ValidationReport) -> String {
        let mut output = String::from("## ❌ Workflow validation failed\n\n");
        output.push_str(&format!(
            "Workflow files targeting the `{MAIN_BRANCH}` branch must not reference the `{CANDIDATE_BRANCH}` branch.\n\n"
        ));

        for violation in &report.violations {
            output.push_str(&format!(
                "### {}\n\n",
                inline_code(&violation.file_path.display().to_string())
            ));
            for line in &violation.lines {
                output.push_str(&format!(
                    "- Line {}: {}\n",
                    line.line_number,
                    inline_code(line.text.trim())
                ));
            }
            output.push('\n');
        }

        output.push_str("### Disallowed patterns\n\n");
        for rule in RuleKind::ALL {
            output.push_str(&format!("- `{}`: {}\n", rule.example(), rule.description()));
        }

        output
    }

    /// Append the rendered summary to `path`, creating the file if needed
    pub fn append_to(&self, path: &Path, report: &ValidationReport) -> GuardianResult<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render(report).as_bytes())?;
        tracing::debug!("Appended step summary to {}", path.display());
        Ok(())
    }
}

/// Markdown code span whose fence is longer than any backtick run inside `text`
fn inline_code(text: &str) -> String {
    let longest_run = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);

    if longest_run > 0 {
        format!("{fence} {text} {fence}")
    } else {
        format!("{fence}{text}{fence}")
    }
}

//! Workflow Guardian - keeps candidate branch references out of main branch workflows
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Collector, analyzer and pattern set are pure services with injected configuration
//! - GuardianValidator drives a single synchronous run and owns the exit code decision
//! - CI integration arrives through RunEnvironment, never through direct env reads

pub mod analyzer;
pub mod config;
pub mod domain;
pub mod patterns;
pub mod report;

// Re-export main types for convenient access
pub use domain::violations::{
    FileOutcome, GuardianError, GuardianResult, MatchedLine, RuleKind, ValidationReport, Violation,
};

pub use config::{Allowlist, GuardianConfig, RunEnvironment};

pub use analyzer::Analyzer;

pub use patterns::{find_workflow_files, PatternSet};

pub use report::{OutputFormat, ReportFormatter, ReportOptions, RunStatus, StepSummary};

use std::io::Write;

/// Terminal state of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The workflow directory does not exist; nothing to validate
    NoWorkflowDirectory,
    /// Every scanned file was clean
    Passed(ValidationReport),
    /// At least one file references the candidate branch
    Failed(ValidationReport),
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed(_) => 1,
            Self::Passed(_) | Self::NoWorkflowDirectory => 0,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            Self::NoWorkflowDirectory => RunStatus::NoWorkflowDirectory,
            Self::Passed(_) => RunStatus::Passed,
            Self::Failed(_) => RunStatus::Failed,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Passed(report) | Self::Failed(report) => Some(report),
            Self::NoWorkflowDirectory => None,
        }
    }
}

/// Main validator running the candidate reference check over a workflow tree
pub struct GuardianValidator {
    config: GuardianConfig,
    analyzer: Analyzer,
    report_formatter: ReportFormatter,
    format: OutputFormat,
    environment: RunEnvironment,
}

impl GuardianValidator {
    /// Create a validator with the built-in rules
    pub fn new(config: GuardianConfig) -> GuardianResult<Self> {
        let analyzer = Analyzer::new(PatternSet::with_defaults()?, config.allowlist.clone());

        Ok(Self {
            config,
            analyzer,
            report_formatter: ReportFormatter::default(),
            format: OutputFormat::Human,
            environment: RunEnvironment::default(),
        })
    }

    /// Set the console output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable coloured banners
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.report_formatter = ReportFormatter::new(ReportOptions { use_colors });
        self
    }

    /// Inject the CI environment
    pub fn with_environment(mut self, environment: RunEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Run the check, streaming console output to `console`
    pub fn run<W: Write>(&self, console: &mut W) -> GuardianResult<Outcome> {
        let streaming = self.format.streams_progress();
        let workflow_dir = &self.config.workflow_dir;

        if streaming {
            console.write_all(self.report_formatter.format_header().as_bytes())?;
        }

        if !workflow_dir.exists() {
            tracing::info!("No workflow directory at {}", workflow_dir.display());
            let outcome = Outcome::NoWorkflowDirectory;
            if streaming {
                console.write_all(self.report_formatter.format_no_workflow_directory().as_bytes())?;
            } else {
                let json = self.report_formatter.format_json(outcome.status(), &ValidationReport::new())?;
                console.write_all(json.as_bytes())?;
            }
            return Ok(outcome);
        }

        let files = find_workflow_files(workflow_dir)?;
        tracing::info!("Found {} workflow files in {}", files.len(), workflow_dir.display());

        let mut report = ValidationReport::new();

        for file in &files {
            let display = self.config.display_path(file);
            let outcome = self.analyzer.check_file(file)?;

            if streaming {
                let lines = match &outcome {
                    FileOutcome::Skipped => self.report_formatter.format_skipping(display),
                    FileOutcome::Clean => {
                        self.report_formatter.format_checking(display)
                            + &self.report_formatter.format_clean()
                    }
                    FileOutcome::Violating(matched) => {
                        self.report_formatter.format_checking(display)
                            + &self.report_formatter.format_violations(display, matched)
                    }
                };
                console.write_all(lines.as_bytes())?;
            }

            report.record(display, outcome);
        }

        let outcome = if report.has_violations() {
            Outcome::Failed(report)
        } else {
            Outcome::Passed(report)
        };

        self.write_verdict(console, &outcome)?;
        self.write_step_summary(&outcome);

        Ok(outcome)
    }

    fn write_verdict<W: Write>(&self, console: &mut W, outcome: &Outcome) -> GuardianResult<()> {
        let Some(report) = outcome.report() else {
            return Ok(());
        };

        match self.format {
            OutputFormat::Human => {
                console.write_all(self.report_formatter.format_verdict(report).as_bytes())?;
            }
            OutputFormat::GitHub => {
                console.write_all(self.report_formatter.format_github(report).as_bytes())?;
                console.write_all(self.report_formatter.format_verdict(report).as_bytes())?;
            }
            OutputFormat::Json => {
                let json = self.report_formatter.format_json(outcome.status(), report)?;
                console.write_all(json.as_bytes())?;
            }
        }

        Ok(())
    }

    /// Append the CI step summary; failures here never change the verdict
    fn write_step_summary(&self, outcome: &Outcome) {
        let (Some(path), Some(report)) = (self.environment.summary_target(), outcome.report()) else {
            return;
        };

        if let Err(e) = StepSummary::new().append_to(path, report) {
            tracing::warn!("Failed to write step summary to {}: {}", path.display(), e);
        }
    }
}

/// Convenience function to validate a repository checkout with default settings
pub fn validate_repository<P: AsRef<std::path::Path>>(repo_root: P) -> GuardianResult<Outcome> {
    let validator = GuardianValidator::new(GuardianConfig::for_repo(repo_root))?;
    validator.run(&mut std::io::sink())
}

//! Workflow Guardian CLI - blocks candidate branch references in main branch workflows
//!
//! CDD Principle: Application Layer - CLI coordinates user interactions with domain services
//! - Captures the process environment once and injects it into the validator
//! - Handles external concerns like process exit codes and terminal output

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use workflow_guardian::{
    patterns::ACTION_ORG_PREFIX, Analyzer, GuardianConfig, GuardianValidator, OutputFormat,
    RunEnvironment,
};

/// Workflow Guardian - keep candidate branch references out of main branch workflows
#[derive(Parser)]
#[command(name = "workflow-guardian")]
#[command(version)]
#[command(about = "Fails when workflows targeting main reference the candidate branch")]
#[command(long_about = "Scans .github/workflows for candidate branch references (SDLC_BRANCH assignments, branch triggers, YAML list items and actions pinned to @candidate). Exits 1 when any are found outside the allowlist.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Repository root containing .github/workflows
    #[arg(long, global = true, default_value = ".")]
    repo_root: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "human")]
    format: OutputFormatArg,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check workflow files for candidate branch references (default)
    Check,

    /// List the disallowed patterns and the allowlist
    Rules,
}

#[derive(Copy, Clone, ValueEnum, PartialEq)]
enum OutputFormatArg {
    Human,
    Json,
    Github,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Github => OutputFormat::GitHub,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run_command(cli: Cli) -> anyhow::Result<i32> {
    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => run_check(
            cli.repo_root,
            cli.format.into(),
            use_colors(cli.no_color),
            RunEnvironment::from_env(),
        ),
        Commands::Rules => run_list_rules(&mut io::stdout().lock()),
    }
}

fn run_check(
    repo_root: PathBuf,
    format: OutputFormat,
    use_colors: bool,
    environment: RunEnvironment,
) -> anyhow::Result<i32> {
    tracing::debug!("Running check in {} (ci: {})", repo_root.display(), environment.in_ci);

    let validator = GuardianValidator::new(GuardianConfig::for_repo(&repo_root))
        .context("failed to build validator")?
        .with_format(format)
        .with_colors(use_colors)
        .with_environment(environment);

    let mut stdout = io::stdout().lock();
    let outcome = validator
        .run(&mut stdout)
        .with_context(|| format!("validation of {} aborted", repo_root.display()))?;
    stdout.flush()?;

    Ok(outcome.exit_code())
}

fn run_list_rules<W: Write>(out: &mut W) -> anyhow::Result<i32> {
    let analyzer = Analyzer::with_defaults()?;

    writeln!(out, "📋 Disallowed candidate branch references\n")?;
    for (rule, pattern) in analyzer.patterns().rules() {
        writeln!(out, "  🔍 {} - {}", rule.id(), rule.description())?;
        writeln!(out, "     e.g. {}", rule.example())?;
        writeln!(out, "     /{pattern}/")?;
    }

    writeln!(out, "\n🏢 Pinned action organization: {ACTION_ORG_PREFIX}")?;
    writeln!(out, "\n🚫 Allowlisted files:")?;
    for name in analyzer.allowlist().iter() {
        writeln!(out, "  - {name}")?;
    }

    Ok(0)
}

fn use_colors(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none()
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

//! Pattern engine for detecting candidate branch references
//!
//! Architectural Principle: Service Layer - PatternSet owns the compiled rule set
//! - Rules are plain regexes matched against one physical line at a time
//! - Multi-line YAML constructs are out of reach by construction
//! - Matches are reported with the exact original line text

pub mod collector;

use crate::domain::violations::{GuardianError, GuardianResult, MatchedLine, RuleKind};
use regex::RegexSet;

pub use collector::{find_workflow_files, is_workflow_file};

/// Organization whose actions must never be pinned to the candidate branch
pub const ACTION_ORG_PREFIX: &str = "j708-zp9u";

/// Built-in regex for each rule kind
pub fn default_pattern(kind: RuleKind) -> &'static str {
    match kind {
        RuleKind::SdlcBranchAssignment => r"SDLC_BRANCH\s*:\s*candidate",
        RuleKind::BranchTrigger => r"branches:.*candidate",
        RuleKind::SequenceItem => r"-\s*candidate",
        RuleKind::PinnedAction => r"uses:\s*j708-zp9u/\S+@candidate",
    }
}

/// Immutable compiled set of disallowed reference patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    kinds: Vec<RuleKind>,
    set: RegexSet,
}

impl PatternSet {
    /// Compile an explicit list of rules
    pub fn new<'a, I>(rules: I) -> GuardianResult<Self>
    where
        I: IntoIterator<Item = (RuleKind, &'a str)>,
    {
        let (kinds, patterns): (Vec<RuleKind>, Vec<&str>) = rules.into_iter().unzip();

        tracing::debug!("Compiling {} candidate reference patterns", patterns.len());

        let set = RegexSet::new(&patterns)
            .map_err(|e| GuardianError::pattern(format!("Invalid pattern set: {e}")))?;

        Ok(Self { kinds, set })
    }

    /// The four built-in rules
    pub fn with_defaults() -> GuardianResult<Self> {
        Self::new(RuleKind::ALL.iter().map(|&kind| (kind, default_pattern(kind))))
    }

    /// Rules and their source regexes, in declaration order
    pub fn rules(&self) -> impl Iterator<Item = (RuleKind, &str)> + '_ {
        self.kinds.iter().copied().zip(self.set.patterns().iter().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Rules matching a single line, in declaration order
    pub fn match_line(&self, line: &str) -> Vec<RuleKind> {
        self.set.matches(line).into_iter().map(|index| self.kinds[index]).collect()
    }

    /// Scan file content line by line and report every line that matches any rule
    pub fn find_candidate_references(&self, content: &str) -> Vec<MatchedLine> {
        content
            .split('\n')
            .zip(1u32..)
            .filter_map(|(line, line_number)| {
                let rules = self.match_line(line);
                if rules.is_empty() {
                    None
                } else {
                    Some(MatchedLine::new(line_number, line, rules))
                }
            })
            .collect()
    }
}

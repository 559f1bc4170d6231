//! Keyword matching over the free-text project spec.

use crate::project::ProjectInputs;
use crate::recommendation::{Candidate, Priority};

use super::{contains_any, Evaluator};

/// A keyword rule: fires when the lower-cased text contains any keyword
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub name: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
}

impl KeywordRule {
    /// Candidate for `text` if any keyword occurs in it. Matching is plain
    /// substring search, so "postgres" also fires inside "postgresql-ha".
    pub fn check(&self, lowered: &str) -> Option<Candidate> {
        contains_any(lowered, self.keywords)
            .then(|| Candidate::new(self.name, self.priority, self.reason))
    }
}

pub const SPEC_TEXT_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["github", "pull request", "ci/cd"],
        name: "github",
        priority: Priority::High,
        reason: "Project spec mentions GitHub workflows",
    },
    KeywordRule {
        keywords: &["payment", "stripe", "subscription"],
        name: "stripe",
        priority: Priority::High,
        reason: "Project spec mentions payment processing",
    },
    KeywordRule {
        keywords: &["postgresql", "postgres"],
        name: "postgres",
        priority: Priority::High,
        reason: "Project spec mentions PostgreSQL",
    },
    KeywordRule {
        keywords: &["slack", "notification", "messaging"],
        name: "slack",
        priority: Priority::Medium,
        reason: "Project spec mentions team messaging",
    },
];

pub struct SpecTextEvaluator {
    rules: &'static [KeywordRule],
}

impl SpecTextEvaluator {
    pub fn new() -> Self {
        Self::with_rules(SPEC_TEXT_RULES)
    }

    pub fn with_rules(rules: &'static [KeywordRule]) -> Self {
        Self { rules }
    }

    pub fn evaluate_text(&self, text: &str) -> Vec<Candidate> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .filter_map(|rule| rule.check(&lowered))
            .collect()
    }
}

impl Default for SpecTextEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for SpecTextEvaluator {
    fn name(&self) -> &'static str {
        "spec_text"
    }

    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate> {
        match &inputs.spec_text {
            Some(text) => self.evaluate_text(text),
            None => Vec::new(),
        }
    }
}

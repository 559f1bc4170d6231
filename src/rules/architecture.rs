//! Detection from the persisted architecture state.

use crate::project::{ArchitectureState, ProjectInputs};
use crate::recommendation::{Candidate, Priority, ServerTemplate};

use super::{contains_any, Evaluator};

/// Fires when a component's `type` equals `value`
#[derive(Debug, Clone, Copy)]
pub struct ComponentRule {
    pub value: &'static str,
    pub name: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
    pub server: Option<ServerTemplate>,
}

pub const DATABASE_RULES: &[ComponentRule] = &[ComponentRule {
    value: "postgresql",
    name: "postgres",
    priority: Priority::High,
    reason: "Architecture uses a PostgreSQL database",
    server: None,
}];

pub const CACHE_RULES: &[ComponentRule] = &[ComponentRule {
    value: "redis",
    name: "redis",
    priority: Priority::Medium,
    reason: "Architecture uses a Redis cache",
    server: Some(ServerTemplate {
        command: "npx",
        args: &["-y", "@modelcontextprotocol/server-redis", "${REDIS_URL}"],
        env: &[],
    }),
}];

/// Fires when a planned feature name contains any keyword
#[derive(Debug, Clone, Copy)]
pub struct FeatureRule {
    pub keywords: &'static [&'static str],
    pub name: &'static str,
    pub priority: Priority,
    /// Need named in the reason after the feature name
    pub need: &'static str,
    pub server: Option<ServerTemplate>,
}

pub const FEATURE_RULES: &[FeatureRule] = &[
    FeatureRule {
        keywords: &["payment", "stripe"],
        name: "stripe",
        priority: Priority::Medium,
        need: "payment processing",
        server: None,
    },
    FeatureRule {
        keywords: &["email", "sendgrid"],
        name: "sendgrid",
        priority: Priority::Medium,
        need: "email delivery",
        server: Some(ServerTemplate {
            command: "npx",
            args: &["-y", "sendgrid-mcp"],
            env: &[("SENDGRID_API_KEY", "${SENDGRID_API_KEY}")],
        }),
    },
];

fn candidate(
    name: &str,
    priority: Priority,
    reason: impl Into<String>,
    server: Option<&ServerTemplate>,
) -> Candidate {
    let candidate = Candidate::new(name, priority, reason);
    match server {
        Some(server) => candidate.with_config(server.to_config()),
        None => candidate,
    }
}

fn match_component(rules: &[ComponentRule], kind: Option<&str>) -> Vec<Candidate> {
    let Some(kind) = kind else {
        return Vec::new();
    };
    rules
        .iter()
        .filter(|rule| rule.value == kind)
        .map(|rule| candidate(rule.name, rule.priority, rule.reason, rule.server.as_ref()))
        .collect()
}

#[derive(Debug, Default)]
pub struct ArchitectureEvaluator;

impl ArchitectureEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate_state(&self, state: &ArchitectureState) -> Vec<Candidate> {
        let mut candidates = match_component(DATABASE_RULES, state.database_type());
        candidates.extend(match_component(CACHE_RULES, state.cache_type()));

        for feature in state.planned_feature_names() {
            let lowered = feature.to_lowercase();
            for rule in FEATURE_RULES {
                if contains_any(&lowered, rule.keywords) {
                    candidates.push(candidate(
                        rule.name,
                        rule.priority,
                        format!("Planned feature '{}' needs {}", feature, rule.need),
                        rule.server.as_ref(),
                    ));
                }
            }
        }

        candidates
    }
}

impl Evaluator for ArchitectureEvaluator {
    fn name(&self) -> &'static str {
        "architecture"
    }

    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate> {
        match &inputs.state {
            Some(state) => self.evaluate_state(state),
            None => Vec::new(),
        }
    }
}

//! Dependency-based detection over manifests and requirements.txt.

use regex::Regex;

use crate::error::Result;
use crate::project::{Manifest, ProjectInputs, REQUIREMENTS_FILE};
use crate::recommendation::{Candidate, Priority};

use super::Evaluator;

/// Fires when a manifest declares any of `aliases` exactly
#[derive(Debug, Clone, Copy)]
pub struct DependencyRule {
    pub aliases: &'static [&'static str],
    pub name: &'static str,
    pub priority: Priority,
    /// Reason prefix; the manifest file name is appended
    pub reason: &'static str,
}

pub const DEPENDENCY_RULES: &[DependencyRule] = &[
    DependencyRule {
        aliases: &[
            "stripe",
            "@stripe/stripe-js",
            "@stripe/react-stripe-js",
            "async-stripe",
            "stripe-rust",
        ],
        name: "stripe",
        priority: Priority::High,
        reason: "Stripe SDK declared in",
    },
    DependencyRule {
        aliases: &["@octokit/rest", "@octokit/core", "octokit", "octocrab"],
        name: "github",
        priority: Priority::High,
        reason: "GitHub API client declared in",
    },
];

/// Fires when requirements.txt matches `pattern`
#[derive(Debug, Clone, Copy)]
pub struct RequirementRule {
    pub pattern: &'static str,
    pub name: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
}

pub const REQUIREMENT_RULES: &[RequirementRule] = &[
    RequirementRule {
        pattern: r"(?i)stripe",
        name: "stripe",
        priority: Priority::High,
        reason: "Stripe SDK listed in requirements.txt",
    },
    RequirementRule {
        pattern: r"(?i)\b(psycopg2|asyncpg)",
        name: "postgres",
        priority: Priority::High,
        reason: "PostgreSQL driver listed in requirements.txt",
    },
];

pub struct ManifestEvaluator {
    dependency_rules: &'static [DependencyRule],
    requirement_rules: Vec<(Regex, &'static RequirementRule)>,
}

impl ManifestEvaluator {
    pub fn new() -> Result<Self> {
        Self::with_rules(DEPENDENCY_RULES, REQUIREMENT_RULES)
    }

    pub fn with_rules(
        dependency_rules: &'static [DependencyRule],
        requirement_rules: &'static [RequirementRule],
    ) -> Result<Self> {
        let mut compiled = Vec::with_capacity(requirement_rules.len());
        for rule in requirement_rules {
            compiled.push((Regex::new(rule.pattern)?, rule));
        }

        Ok(Self {
            dependency_rules,
            requirement_rules: compiled,
        })
    }

    pub fn evaluate_manifest(&self, manifest: &Manifest) -> Vec<Candidate> {
        self.dependency_rules
            .iter()
            .filter(|rule| rule.aliases.iter().any(|alias| manifest.declares(alias)))
            .map(|rule| {
                Candidate::new(
                    rule.name,
                    rule.priority,
                    format!("{} {}", rule.reason, manifest.file_name()),
                )
            })
            .collect()
    }

    pub fn evaluate_requirements(&self, text: &str) -> Vec<Candidate> {
        self.requirement_rules
            .iter()
            .filter(|(regex, _)| regex.is_match(text))
            .map(|(_, rule)| Candidate::new(rule.name, rule.priority, rule.reason))
            .collect()
    }
}

impl Evaluator for ManifestEvaluator {
    fn name(&self) -> &'static str {
        "manifest"
    }

    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = inputs
            .manifests
            .iter()
            .flat_map(|manifest| self.evaluate_manifest(manifest))
            .collect();

        match &inputs.requirements {
            Some(text) => candidates.extend(self.evaluate_requirements(text)),
            None => tracing::debug!("No {}, skipping requirement rules", REQUIREMENTS_FILE),
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ManifestKind;

    fn package_json(deps: &[&str]) -> Manifest {
        let mut manifest = Manifest::new(ManifestKind::PackageJson);
        manifest.dependencies.extend(deps.iter().map(|d| d.to_string()));
        manifest
    }

    #[test]
    fn test_stripe_and_express() {
        let evaluator = ManifestEvaluator::new().unwrap();
        let candidates = evaluator.evaluate_manifest(&package_json(&["stripe", "express"]));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "stripe");
        assert_eq!(candidates[0].priority, Priority::High);
        assert_eq!(candidates[0].reason, "Stripe SDK declared in package.json");
    }

    #[test]
    fn test_github_client_aliases() {
        let evaluator = ManifestEvaluator::new().unwrap();
        for alias in ["@octokit/rest", "@octokit/core", "octokit"] {
            let candidates = evaluator.evaluate_manifest(&package_json(&[alias]));
            assert_eq!(candidates.len(), 1, "{}", alias);
            assert_eq!(candidates[0].name, "github");
        }
    }

    #[test]
    fn test_alias_match_is_exact() {
        let evaluator = ManifestEvaluator::new().unwrap();
        assert!(evaluator
            .evaluate_manifest(&package_json(&["stripe-mock", "octokit-plugin"]))
            .is_empty());
    }

    #[test]
    fn test_cargo_manifest_names_itself() {
        let evaluator = ManifestEvaluator::new().unwrap();
        let mut manifest = Manifest::new(ManifestKind::CargoToml);
        manifest.dependencies.insert("octocrab".to_string());

        let candidates = evaluator.evaluate_manifest(&manifest);
        assert_eq!(candidates[0].reason, "GitHub API client declared in Cargo.toml");
    }

    #[test]
    fn test_requirements_rules() {
        let evaluator = ManifestEvaluator::new().unwrap();

        let candidates = evaluator.evaluate_requirements("Stripe==7.0\npsycopg2-binary==2.9\n");
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["stripe", "postgres"]);

        let candidates = evaluator.evaluate_requirements("asyncpg>=0.29");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "postgres");

        assert!(evaluator.evaluate_requirements("flask\nrequests\n").is_empty());
    }

    #[test]
    fn test_missing_inputs_skip_rules() {
        let evaluator = ManifestEvaluator::new().unwrap();
        assert!(evaluator.evaluate(&ProjectInputs::empty(".")).is_empty());
    }

    #[test]
    fn test_evaluate_combines_sources() {
        let evaluator = ManifestEvaluator::new().unwrap();
        let inputs = ProjectInputs::empty(".")
            .with_manifest(package_json(&["stripe"]))
            .with_requirements("stripe\n");

        let candidates = evaluator.evaluate(&inputs);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.name == "stripe"));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        const BAD: &[RequirementRule] = &[RequirementRule {
            pattern: "(unclosed",
            name: "x",
            priority: Priority::Low,
            reason: "x",
        }];
        assert!(ManifestEvaluator::with_rules(DEPENDENCY_RULES, BAD).is_err());
    }
}

//! Detection run: load inputs, run every evaluator, merge candidates.

use std::path::Path;

use crate::error::Result;
use crate::git::VersionControlProbe;
use crate::project::{DetectorConfig, ProjectInputs};
use crate::recommendation::RecommendationSet;
use crate::rules::RuleSet;

pub struct Detector {
    rules: RuleSet,
    config: DetectorConfig,
}

impl Detector {
    /// Detector with the built-in rules
    pub fn new(config: DetectorConfig, probe: Box<dyn VersionControlProbe>) -> Result<Self> {
        Ok(Self::with_rules(RuleSet::with_defaults(probe)?, config))
    }

    pub fn with_rules(rules: RuleSet, config: DetectorConfig) -> Self {
        Self { rules, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Loads the project at `root` and evaluates it. Fails only if an input
    /// that exists cannot be read or parsed.
    pub fn detect(&self, root: &Path) -> Result<RecommendationSet> {
        let inputs = ProjectInputs::load(root, &self.config)?;
        Ok(self.evaluate(&inputs))
    }

    /// Runs every evaluator in order, merging each candidate as it arrives
    pub fn evaluate(&self, inputs: &ProjectInputs) -> RecommendationSet {
        let mut set = RecommendationSet::new();
        for evaluator in self.rules.evaluators() {
            let candidates = evaluator.evaluate(inputs);
            if !candidates.is_empty() {
                tracing::info!(
                    "{} pass: {}",
                    evaluator.name(),
                    candidates
                        .iter()
                        .map(|c| c.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            set.extend(candidates);
        }
        set
    }
}

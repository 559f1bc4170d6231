//! Detection passes.
//!
//! Each evaluator inspects one class of input and emits candidates:
//! - `SpecTextEvaluator`: free-text project spec
//! - `ManifestEvaluator`: declared dependencies and requirements.txt
//! - `MarkerEvaluator`: well-known files and directories in the project root
//! - `RemoteEvaluator`: hosting service of the `origin` remote
//! - `ArchitectureEvaluator`: persisted architecture state
//!
//! Match rules are immutable tables owned by each module.

pub mod architecture;
pub mod manifest;
pub mod markers;
pub mod remote;
pub mod spec_text;

use crate::error::Result;
use crate::git::VersionControlProbe;
use crate::project::ProjectInputs;
use crate::recommendation::Candidate;

pub use architecture::ArchitectureEvaluator;
pub use manifest::ManifestEvaluator;
pub use markers::MarkerEvaluator;
pub use remote::RemoteEvaluator;
pub use spec_text::SpecTextEvaluator;

/// A single detection pass.
pub trait Evaluator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Candidates for the given inputs. Missing inputs yield no candidates.
    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate>;
}

/// Ordered collection of evaluators.
pub struct RuleSet {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl RuleSet {
    /// Creates a new empty rule set.
    pub fn new() -> Self {
        Self {
            evaluators: Vec::new(),
        }
    }

    /// Creates a rule set with all built-in evaluators, using `probe` for
    /// remote lookups.
    pub fn with_defaults(probe: Box<dyn VersionControlProbe>) -> Result<Self> {
        let mut rules = Self::new();
        rules.register(Box::new(SpecTextEvaluator::new()));
        rules.register(Box::new(ManifestEvaluator::new()?));
        rules.register(Box::new(MarkerEvaluator::new()));
        rules.register(Box::new(RemoteEvaluator::new(probe)));
        rules.register(Box::new(ArchitectureEvaluator::new()));
        Ok(rules)
    }

    /// Appends an evaluator; evaluators run in registration order.
    pub fn register(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    pub fn evaluators(&self) -> impl Iterator<Item = &dyn Evaluator> {
        self.evaluators.iter().map(|e| e.as_ref())
    }

    /// Names of registered evaluators, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.evaluators.iter().map(|e| e.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

/// True if `haystack` contains any of `needles`. Both sides are compared as
/// given; callers lower-case first.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

pub mod apply;
pub mod detector;
pub mod error;
pub mod git;
pub mod project;
pub mod recommendation;
pub mod report;
pub mod rules;

pub use apply::{apply_all, ApplyOptions, ApplyReport, CommandApplier, ConfigApplier, DryRunApplier};
pub use detector::Detector;
pub use error::{DetectorError, Result};
pub use git::{GitProbe, StaticProbe, VersionControlProbe};
pub use project::{
    ArchitectureState, ConfiguredServer, DetectorConfig, Manifest, ManifestKind, ProjectInputs,
};
pub use recommendation::{
    Candidate, McpServerConfig, Priority, Recommendation, RecommendationSet, ServerTemplate,
    Transport,
};
pub use report::OutputFormat;
pub use rules::{Evaluator, RuleSet};

//! Detection from well-known files and directories in the project root.

use std::path::Path;

use crate::project::ProjectInputs;
use crate::recommendation::{Candidate, Priority, ServerTemplate};

use super::Evaluator;

/// What kind of filesystem entry a marker must be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    File,
    Dir,
}

impl MarkerKind {
    fn matches(&self, path: &Path) -> bool {
        match self {
            MarkerKind::File => path.is_file(),
            MarkerKind::Dir => path.is_dir(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MarkerRule {
    /// Entry names checked directly under the root, first hit wins
    pub markers: &'static [&'static str],
    pub kind: MarkerKind,
    pub name: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
    pub server: ServerTemplate,
}

pub const MARKER_RULES: &[MarkerRule] = &[
    MarkerRule {
        markers: &["Dockerfile", "docker-compose.yml"],
        kind: MarkerKind::File,
        name: "docker",
        priority: Priority::Medium,
        reason: "Container configuration found",
        server: ServerTemplate {
            command: "uvx",
            args: &["mcp-server-docker"],
            env: &[],
        },
    },
    MarkerRule {
        markers: &["k8s", "kubernetes"],
        kind: MarkerKind::Dir,
        name: "kubernetes",
        priority: Priority::Medium,
        reason: "Kubernetes manifests found",
        server: ServerTemplate {
            command: "npx",
            args: &["-y", "mcp-server-kubernetes"],
            env: &[("KUBECONFIG", "${KUBECONFIG}")],
        },
    },
];

pub struct MarkerEvaluator {
    rules: &'static [MarkerRule],
}

impl MarkerEvaluator {
    pub fn new() -> Self {
        Self { rules: MARKER_RULES }
    }

    pub fn evaluate_root(&self, root: &Path) -> Vec<Candidate> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let marker = rule
                    .markers
                    .iter()
                    .find(|marker| rule.kind.matches(&root.join(marker)))?;
                Some(
                    Candidate::new(rule.name, rule.priority, format!("{} ({})", rule.reason, marker))
                        .with_config(rule.server.to_config()),
                )
            })
            .collect()
    }
}

impl Default for MarkerEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator for MarkerEvaluator {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate> {
        self.evaluate_root(&inputs.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        assert!(MarkerEvaluator::new().evaluate_root(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_dockerfile() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Dockerfile"), "FROM alpine").unwrap();

        let candidates = MarkerEvaluator::new().evaluate_root(temp_dir.path());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "docker");
        assert_eq!(candidates[0].priority, Priority::Medium);
        assert_eq!(candidates[0].reason, "Container configuration found (Dockerfile)");
        assert_eq!(candidates[0].config.as_ref().unwrap().command, "uvx");
    }

    #[test]
    fn test_compose_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("docker-compose.yml"), "services: {}").unwrap();

        let candidates = MarkerEvaluator::new().evaluate_root(temp_dir.path());
        assert_eq!(candidates[0].reason, "Container configuration found (docker-compose.yml)");
    }

    #[test]
    fn test_kubernetes_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("k8s")).unwrap();

        let candidates = MarkerEvaluator::new().evaluate_root(temp_dir.path());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "kubernetes");
        let config = candidates[0].config.as_ref().unwrap();
        assert_eq!(config.env.get("KUBECONFIG").map(String::as_str), Some("${KUBECONFIG}"));
    }

    #[test]
    fn test_marker_kind_must_match() {
        let temp_dir = TempDir::new().unwrap();
        // a file named like the orchestration directory does not count
        fs::write(temp_dir.path().join("kubernetes"), "").unwrap();
        fs::create_dir(temp_dir.path().join("Dockerfile")).unwrap();

        assert!(MarkerEvaluator::new().evaluate_root(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_both_markers_fire_once_each() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("Dockerfile"), "").unwrap();
        fs::write(temp_dir.path().join("docker-compose.yml"), "").unwrap();
        fs::create_dir(temp_dir.path().join("kubernetes")).unwrap();

        let candidates = MarkerEvaluator::new().evaluate_root(temp_dir.path());
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["docker", "kubernetes"]);
    }
}

//! Detection from the hosting service of the `origin` remote.

use crate::git::VersionControlProbe;
use crate::project::ProjectInputs;
use crate::recommendation::{Candidate, Priority, ServerTemplate};

use super::Evaluator;

#[derive(Debug, Clone, Copy)]
pub struct HostRule {
    /// Substring of the remote URL identifying the host
    pub domain: &'static str,
    pub name: &'static str,
    pub priority: Priority,
    pub reason: &'static str,
    /// `None` leaves the config to the default table
    pub server: Option<ServerTemplate>,
}

pub const HOST_RULES: &[HostRule] = &[
    HostRule {
        domain: "github.com",
        name: "github",
        priority: Priority::High,
        reason: "Repository is hosted on GitHub",
        server: None,
    },
    HostRule {
        domain: "gitlab.com",
        name: "gitlab",
        priority: Priority::High,
        reason: "Repository is hosted on GitLab",
        server: Some(ServerTemplate {
            command: "npx",
            args: &["-y", "@modelcontextprotocol/server-gitlab"],
            env: &[
                ("GITLAB_PERSONAL_ACCESS_TOKEN", "${GITLAB_TOKEN}"),
                ("GITLAB_API_URL", "https://gitlab.com/api/v4"),
            ],
        }),
    },
];

pub struct RemoteEvaluator {
    probe: Box<dyn VersionControlProbe>,
    rules: &'static [HostRule],
}

impl RemoteEvaluator {
    pub fn new(probe: Box<dyn VersionControlProbe>) -> Self {
        Self {
            probe,
            rules: HOST_RULES,
        }
    }

    /// Candidate for the first host rule whose domain occurs in `url`
    pub fn evaluate_url(&self, url: &str) -> Option<Candidate> {
        let rule = self.rules.iter().find(|rule| url.contains(rule.domain))?;
        let candidate = Candidate::new(rule.name, rule.priority, rule.reason);
        Some(match &rule.server {
            Some(server) => candidate.with_config(server.to_config()),
            None => candidate,
        })
    }
}

impl Evaluator for RemoteEvaluator {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn evaluate(&self, inputs: &ProjectInputs) -> Vec<Candidate> {
        let Some(url) = self.probe.remote_url(&inputs.root) else {
            tracing::debug!("No origin remote for {}", inputs.root.display());
            return Vec::new();
        };
        self.evaluate_url(&url).into_iter().collect()
    }
}

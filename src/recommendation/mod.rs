//! Recommendation model.
//!
//! This module provides the types shared by every detection pass:
//! - `Priority` ordering of recommendations
//! - `McpServerConfig` launch descriptors and their `const` templates
//! - `Candidate` values emitted by evaluators and merged `Recommendation`s

pub mod defaults;
pub mod set;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use defaults::default_config;
pub use set::RecommendationSet;

/// Priority of a recommendation, ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Marker shown next to the recommendation in text reports
    pub fn marker(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport used to talk to an MCP server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
}

/// Launch descriptor for an MCP server.
///
/// Environment values are templates (`${GITHUB_TOKEN}`) and are passed through
/// untouched; resolving them is the job of the host running the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    #[serde(rename = "type", default)]
    pub transport: Transport,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl McpServerConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            transport: Transport::Stdio,
            command: command.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Generic config for an integration with no known launch command
    pub fn fallback(name: &str) -> Self {
        Self::new("npx").with_args(["-y".to_string(), format!("@modelcontextprotocol/server-{}", name)])
    }

    /// `KEY=VALUE` pairs in key order
    pub fn env_pairs(&self) -> Vec<String> {
        self.env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect()
    }
}

/// Static description of a server config, usable in `const` rule tables
#[derive(Debug, Clone, Copy)]
pub struct ServerTemplate {
    pub command: &'static str,
    pub args: &'static [&'static str],
    pub env: &'static [(&'static str, &'static str)],
}

impl ServerTemplate {
    pub fn to_config(&self) -> McpServerConfig {
        let mut config = McpServerConfig::new(self.command).with_args(self.args.iter().copied());
        for (key, value) in self.env {
            config = config.with_env(*key, *value);
        }
        config
    }
}

impl From<&ServerTemplate> for McpServerConfig {
    fn from(template: &ServerTemplate) -> Self {
        template.to_config()
    }
}

/// A recommendation as emitted by a single evaluator, before merging
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub priority: Priority,
    pub reason: String,
    pub config: Option<McpServerConfig>,
}

impl Candidate {
    pub fn new(name: impl Into<String>, priority: Priority, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority,
            reason: reason.into(),
            config: None,
        }
    }

    pub fn with_config(mut self, config: McpServerConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// A merged recommendation; unique by `name` within a `RecommendationSet`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub priority: Priority,
    pub reason: String,
    pub config: McpServerConfig,
}

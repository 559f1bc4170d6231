//! Default launch configs for integrations introduced without one.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{McpServerConfig, ServerTemplate};

/// Known integrations and their default launch configs
pub const DEFAULT_SERVERS: &[(&str, ServerTemplate)] = &[
    (
        "github",
        ServerTemplate {
            command: "npx",
            args: &["-y", "@modelcontextprotocol/server-github"],
            env: &[("GITHUB_PERSONAL_ACCESS_TOKEN", "${GITHUB_TOKEN}")],
        },
    ),
    (
        "postgres",
        ServerTemplate {
            command: "npx",
            args: &["-y", "@modelcontextprotocol/server-postgres", "${DATABASE_URL}"],
            env: &[],
        },
    ),
    (
        "stripe",
        ServerTemplate {
            command: "npx",
            args: &["-y", "@stripe/mcp", "--tools=all"],
            env: &[("STRIPE_SECRET_KEY", "${STRIPE_SECRET_KEY}")],
        },
    ),
    (
        "slack",
        ServerTemplate {
            command: "npx",
            args: &["-y", "@modelcontextprotocol/server-slack"],
            env: &[
                ("SLACK_BOT_TOKEN", "${SLACK_BOT_TOKEN}"),
                ("SLACK_TEAM_ID", "${SLACK_TEAM_ID}"),
            ],
        },
    ),
];

static DEFAULTS_BY_NAME: Lazy<HashMap<&'static str, &'static ServerTemplate>> = Lazy::new(|| {
    DEFAULT_SERVERS
        .iter()
        .map(|(name, template)| (*name, template))
        .collect()
});

/// Config from the default table, or the generic fallback for unknown names
pub fn default_config(name: &str) -> McpServerConfig {
    match DEFAULTS_BY_NAME.get(name) {
        Some(template) => template.to_config(),
        None => McpServerConfig::fallback(name),
    }
}

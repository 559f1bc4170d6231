//! Rendering of recommendation reports.

use std::str::FromStr;

use crate::error::Result;
use crate::recommendation::{Recommendation, RecommendationSet};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

pub const EMPTY_REPORT: &str = "No integrations recommended.";

/// One line per recommendation, highest priority first
pub fn render_text(recommendations: &[&Recommendation]) -> String {
    if recommendations.is_empty() {
        return format!("{}\n", EMPTY_REPORT);
    }

    let mut out = format!("Recommended integrations ({}):\n", recommendations.len());
    for rec in recommendations {
        out.push_str(&format!(
            "  {} {} ({}): {}\n",
            rec.priority.marker(),
            rec.name,
            rec.priority,
            rec.reason
        ));
    }
    out
}

pub fn render_json(recommendations: &[&Recommendation]) -> Result<String> {
    Ok(serde_json::to_string_pretty(recommendations)?)
}

/// Renders the sorted view of `set` in the given format
pub fn render(set: &RecommendationSet, format: OutputFormat) -> Result<String> {
    let sorted = set.sorted();
    match format {
        OutputFormat::Text => Ok(render_text(&sorted)),
        OutputFormat::Json => render_json(&sorted),
    }
}

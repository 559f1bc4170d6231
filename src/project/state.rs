//! Persisted architecture state document.
//!
//! Every level of the document is optional. Keys this crate does not know about
//! are kept in `extra` maps so that rewriting the file after an apply does not
//! drop them. A nested section with an unexpected shape is kept verbatim as a
//! [`Section::Untyped`] value and reads as absent.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DetectorError, Result};
use crate::recommendation::{Priority, Recommendation};

/// Status written for every integration the applier attempted
pub const STATUS_CONNECTED: &str = "connected";

/// A nested part of the state document
///
/// Deserialization tries the typed shape first and falls back to the raw
/// value, so a wrongly typed section never fails the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section<T> {
    Typed(T),
    Untyped(Value),
}

impl<T> Section<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            Section::Typed(inner) => Some(inner),
            Section::Untyped(_) => None,
        }
    }
}

impl<T: Default> Section<T> {
    /// Typed contents, replacing an untyped value with `T::default()`
    pub fn make_typed(&mut self) -> &mut T {
        if let Section::Untyped(value) = self {
            tracing::warn!("Replacing malformed state section: {}", value);
            *self = Section::Typed(T::default());
        }
        match self {
            Section::Typed(inner) => inner,
            Section::Untyped(_) => unreachable!("section was reset above"),
        }
    }
}

/// Typed view of an optional section
fn typed<T>(section: &Option<Section<T>>) -> Option<&T> {
    section.as_ref().and_then(Section::typed)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Section<Architecture>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development: Option<Section<Development>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<Section<McpServers>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<Section<Component>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<Section<Component>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An architecture component such as the database or the cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Section<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Development {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Section<Features>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned: Option<Section<Vec<Section<PlannedFeature>>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Section<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpServers {
    /// Entries written by earlier runs or by hand; kept as raw values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configured: Option<Section<Vec<Value>>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record appended under `mcp_servers.configured` after an apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredServer {
    pub name: String,
    pub status: String,
    pub auto_detected: bool,
    pub reason: String,
    pub priority: Priority,
}

impl From<&Recommendation> for ConfiguredServer {
    fn from(rec: &Recommendation) -> Self {
        Self {
            name: rec.name.clone(),
            status: STATUS_CONNECTED.to_string(),
            auto_detected: true,
            reason: rec.reason.clone(),
            priority: rec.priority,
        }
    }
}

impl ArchitectureState {
    /// Reads the state document, `Ok(None)` if it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            tracing::debug!("No architecture state at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content).map(Some)
    }

    /// Parses a state document. Only malformed JSON or a top level that is not
    /// an object is an error; nested sections of the wrong shape read as absent.
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| DetectorError::State(e.to_string()))?;
        if !value.is_object() {
            return Err(DetectorError::State(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        serde_json::from_value(value).map_err(|e| DetectorError::State(e.to_string()))
    }

    /// Writes the document as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }

    /// `architecture.database.type`
    pub fn database_type(&self) -> Option<&str> {
        let database = typed(&typed(&self.architecture)?.database)?;
        typed(&database.kind).map(String::as_str)
    }

    /// `architecture.cache.type`
    pub fn cache_type(&self) -> Option<&str> {
        let cache = typed(&typed(&self.architecture)?.cache)?;
        typed(&cache.kind).map(String::as_str)
    }

    /// Names of `development.features.planned`, in document order; entries
    /// without a string name are skipped
    pub fn planned_feature_names(&self) -> Vec<&str> {
        typed(&self.development)
            .and_then(|d| typed(&d.features))
            .and_then(|f| typed(&f.planned))
            .map(|planned| {
                planned
                    .iter()
                    .filter_map(Section::typed)
                    .filter_map(|f| typed(&f.name))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn record_configured(&mut self, server: ConfiguredServer) -> Result<()> {
        let value = serde_json::to_value(server)?;
        self.mcp_servers
            .get_or_insert_with(|| Section::Typed(McpServers::default()))
            .make_typed()
            .configured
            .get_or_insert_with(|| Section::Typed(Vec::new()))
            .make_typed()
            .push(value);
        Ok(())
    }

    /// Raw `mcp_servers.configured` entries; empty when absent or not a list
    pub fn configured_entries(&self) -> &[Value] {
        typed(&self.mcp_servers)
            .and_then(|servers| typed(&servers.configured))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Configured entries that have the shape written by `record_configured`
    pub fn configured_servers(&self) -> Vec<ConfiguredServer> {
        self.configured_entries()
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect()
    }
}

//! Dependency manifest parsing (package.json, Cargo.toml).

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DetectorError, Result};

/// Kind of structured manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    PackageJson,
    CargoToml,
}

impl ManifestKind {
    pub const ALL: [ManifestKind; 2] = [ManifestKind::PackageJson, ManifestKind::CargoToml];

    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::PackageJson => "package.json",
            ManifestKind::CargoToml => "Cargo.toml",
        }
    }
}

/// Declared dependency names of one manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub dependencies: BTreeSet<String>,
}

impl Manifest {
    pub fn new(kind: ManifestKind) -> Self {
        Self {
            kind,
            dependencies: BTreeSet::new(),
        }
    }

    pub fn file_name(&self) -> &'static str {
        self.kind.file_name()
    }

    pub fn declares(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    /// Reads the manifest of the given kind under `root`.
    ///
    /// Returns `Ok(None)` when the file does not exist. A file that exists but
    /// does not parse is an error.
    pub fn load(root: &Path, kind: ManifestKind) -> Result<Option<Self>> {
        let path = root.join(kind.file_name());
        if !path.is_file() {
            tracing::debug!("No {} in {}", kind.file_name(), root.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let manifest = match kind {
            ManifestKind::PackageJson => Self::parse_package_json(&content)?,
            ManifestKind::CargoToml => Self::parse_cargo_toml(&content)?,
        };
        tracing::debug!(
            "Read {} dependencies from {}",
            manifest.dependencies.len(),
            path.display()
        );
        Ok(Some(manifest))
    }

    /// Parses package.json content.
    pub fn parse_package_json(content: &str) -> Result<Self> {
        let pkg: PackageJson = serde_json::from_str(content)
            .map_err(|e| DetectorError::Manifest(format!("Invalid package.json: {}", e)))?;

        let mut manifest = Self::new(ManifestKind::PackageJson);
        for section in [
            pkg.dependencies,
            pkg.dev_dependencies,
            pkg.peer_dependencies,
            pkg.optional_dependencies,
        ]
        .into_iter()
        .flatten()
        {
            manifest.dependencies.extend(section.into_keys());
        }

        Ok(manifest)
    }

    /// Parses Cargo.toml content.
    pub fn parse_cargo_toml(content: &str) -> Result<Self> {
        let toml_value: toml::Value = content
            .parse()
            .map_err(|e: toml::de::Error| DetectorError::Manifest(format!("Invalid Cargo.toml: {}", e)))?;

        let mut manifest = Self::new(ManifestKind::CargoToml);
        for key in ["dependencies", "dev-dependencies", "build-dependencies"] {
            if let Some(table) = toml_value.get(key).and_then(|v| v.as_table()) {
                manifest.dependencies.extend(table.keys().cloned());
            }
        }

        if let Some(table) = toml_value
            .get("workspace")
            .and_then(|w| w.get("dependencies"))
            .and_then(|v| v.as_table())
        {
            manifest.dependencies.extend(table.keys().cloned());
        }

        Ok(manifest)
    }
}

/// Minimal representation of package.json
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    dev_dependencies: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    peer_dependencies: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    optional_dependencies: Option<HashMap<String, serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_package_json_sections() {
        let content = r#"
{
    "name": "web",
    "dependencies": {
        "stripe": "^14.0.0",
        "express": "4.18.0"
    },
    "devDependencies": {
        "@octokit/rest": "^20.0.0"
    }
}
"#;
        let manifest = Manifest::parse_package_json(content).unwrap();

        assert_eq!(manifest.kind, ManifestKind::PackageJson);
        assert_eq!(manifest.dependencies.len(), 3);
        assert!(manifest.declares("stripe"));
        assert!(manifest.declares("@octokit/rest"));
        assert!(!manifest.declares("react"));
    }

    #[test]
    fn test_parse_minimal_package_json() {
        let manifest = Manifest::parse_package_json(r#"{"name": "minimal"}"#).unwrap();
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_parse_invalid_package_json() {
        let err = Manifest::parse_package_json("{ not json").unwrap_err();
        assert!(matches!(err, DetectorError::Manifest(_)));
    }

    #[test]
    fn test_parse_cargo_toml_tables() {
        let content = r#"
[package]
name = "svc"
version = "0.1.0"

[dependencies]
octocrab = "0.38"
serde = { version = "1.0", features = ["derive"] }

[dev-dependencies]
tempfile = "3"

[workspace.dependencies]
async-stripe = "0.37"
"#;
        let manifest = Manifest::parse_cargo_toml(content).unwrap();

        assert_eq!(manifest.kind, ManifestKind::CargoToml);
        assert!(manifest.declares("octocrab"));
        assert!(manifest.declares("serde"));
        assert!(manifest.declares("tempfile"));
        assert!(manifest.declares("async-stripe"));
    }

    #[test]
    fn test_parse_invalid_cargo_toml() {
        let err = Manifest::parse_cargo_toml("[package\nname = ").unwrap_err();
        assert!(matches!(err, DetectorError::Manifest(_)));
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Manifest::load(temp_dir.path(), ManifestKind::PackageJson)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_load_malformed_is_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{\"dependencies\": [").unwrap();

        assert!(Manifest::load(temp_dir.path(), ManifestKind::PackageJson).is_err());
    }
}

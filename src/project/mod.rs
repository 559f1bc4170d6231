//! Project inputs.
//!
//! This module loads the artifacts detection runs over:
//! - the free-text project spec
//! - structured dependency manifests (package.json, Cargo.toml)
//! - the plain requirements list
//! - the persisted architecture state document
//!
//! Every artifact is optional. Missing files are not errors; files that exist
//! but fail to parse abort loading.

pub mod manifest;
pub mod state;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use manifest::{Manifest, ManifestKind};
pub use state::{ArchitectureState, ConfiguredServer, Section};

/// Default location of the project spec, relative to the project root
pub const DEFAULT_SPEC_PATH: &str = "docs/SPEC.md";
/// Default location of the architecture state, relative to the project root
pub const DEFAULT_STATE_PATH: &str = ".claude/architecture/state.json";
/// Plain dependency list
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// Where detection looks for its inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Spec document, relative to the root unless absolute
    pub spec_path: PathBuf,
    /// Architecture state document, relative to the root unless absolute
    pub state_path: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_PATH),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}

impl DetectorConfig {
    pub fn with_spec_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.spec_path = path.into();
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    pub fn spec_file(&self, root: &Path) -> PathBuf {
        root.join(&self.spec_path)
    }

    pub fn state_file(&self, root: &Path) -> PathBuf {
        root.join(&self.state_path)
    }
}

/// Everything the evaluators inspect
#[derive(Debug, Clone, Default)]
pub struct ProjectInputs {
    pub root: PathBuf,
    pub spec_text: Option<String>,
    pub manifests: Vec<Manifest>,
    pub requirements: Option<String>,
    pub state: Option<ArchitectureState>,
}

impl ProjectInputs {
    /// Inputs with nothing loaded, rooted at `root`
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Loads every artifact found under `root`
    pub fn load(root: &Path, config: &DetectorConfig) -> Result<Self> {
        let spec_text = read_optional(&config.spec_file(root))?;

        let mut manifests = Vec::new();
        for kind in ManifestKind::ALL {
            if let Some(manifest) = Manifest::load(root, kind)? {
                manifests.push(manifest);
            }
        }

        let requirements = read_optional(&root.join(REQUIREMENTS_FILE))?;
        let state = ArchitectureState::load(&config.state_file(root))?;

        Ok(Self {
            root: root.to_path_buf(),
            spec_text,
            manifests,
            requirements,
            state,
        })
    }

    pub fn with_spec_text(mut self, text: impl Into<String>) -> Self {
        self.spec_text = Some(text.into());
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifests.push(manifest);
        self
    }

    pub fn with_requirements(mut self, text: impl Into<String>) -> Self {
        self.requirements = Some(text.into());
        self
    }

    pub fn with_state(mut self, state: ArchitectureState) -> Self {
        self.state = Some(state);
        self
    }
}

/// Reads a text file, `Ok(None)` if it does not exist
fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        tracing::debug!("Skipping missing {}", path.display());
        return Ok(None);
    }
    Ok(Some(fs::read_to_string(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_empty_project() {
        let temp_dir = TempDir::new().unwrap();
        let inputs = ProjectInputs::load(temp_dir.path(), &DetectorConfig::default()).unwrap();

        assert!(inputs.spec_text.is_none());
        assert!(inputs.manifests.is_empty());
        assert!(inputs.requirements.is_none());
        assert!(inputs.state.is_none());
        assert_eq!(inputs.root, temp_dir.path());
    }

    #[test]
    fn test_load_all_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("docs/SPEC.md"), "Uses Postgres").unwrap();
        fs::write(root.join("package.json"), r#"{"dependencies": {"stripe": "1"}}"#).unwrap();
        fs::write(root.join("Cargo.toml"), "[dependencies]\noctocrab = \"0.38\"\n").unwrap();
        fs::write(root.join("requirements.txt"), "asyncpg==0.29\n").unwrap();
        fs::create_dir_all(root.join(".claude/architecture")).unwrap();
        fs::write(root.join(".claude/architecture/state.json"), "{}").unwrap();

        let inputs = ProjectInputs::load(root, &DetectorConfig::default()).unwrap();

        assert_eq!(inputs.spec_text.as_deref(), Some("Uses Postgres"));
        assert_eq!(inputs.manifests.len(), 2);
        assert_eq!(inputs.manifests[0].kind, ManifestKind::PackageJson);
        assert_eq!(inputs.manifests[1].kind, ManifestKind::CargoToml);
        assert!(inputs.requirements.is_some());
        assert!(inputs.state.is_some());
    }

    #[test]
    fn test_custom_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("NOTES.md"), "slack").unwrap();

        let config = DetectorConfig::default().with_spec_path("NOTES.md");
        let inputs = ProjectInputs::load(root, &config).unwrap();

        assert_eq!(inputs.spec_text.as_deref(), Some("slack"));
    }

    #[test]
    fn test_malformed_state_fails() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".claude/architecture")).unwrap();
        fs::write(root.join(".claude/architecture/state.json"), "not json").unwrap();

        assert!(ProjectInputs::load(root, &DetectorConfig::default()).is_err());
    }
}

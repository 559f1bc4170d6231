//! Applying recommendations through an external configuration command.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{DetectorError, Result};
use crate::project::{ArchitectureState, ConfiguredServer};
use crate::recommendation::{McpServerConfig, Recommendation};

/// Default configuration program
pub const DEFAULT_PROGRAM: &str = "claude";
/// Default scope passed to the configuration program
pub const DEFAULT_SCOPE: &str = "project";

/// Registers one integration with the host
pub trait ConfigApplier {
    fn apply(&self, name: &str, config: &McpServerConfig) -> Result<()>;

    /// Whether applied items are recorded in the architecture state
    fn records_state(&self) -> bool {
        true
    }
}

/// How the configuration command is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOptions {
    pub program: String,
    pub scope: String,
    /// Directory the command runs in
    pub working_dir: PathBuf,
}

impl ApplyOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            working_dir: working_dir.into(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Arguments after the program name:
    /// `mcp add-json <name> <config-json> --scope <scope> [-e KEY=VALUE]...`
    pub fn command_args(&self, name: &str, config: &McpServerConfig) -> Result<Vec<String>> {
        let mut args = vec![
            "mcp".to_string(),
            "add-json".to_string(),
            name.to_string(),
            serde_json::to_string(config)?,
            "--scope".to_string(),
            self.scope.clone(),
        ];
        for pair in config.env_pairs() {
            args.push("-e".to_string());
            args.push(pair);
        }
        Ok(args)
    }
}

/// Runs the configuration program for each integration
#[derive(Debug, Clone)]
pub struct CommandApplier {
    options: ApplyOptions,
}

impl CommandApplier {
    pub fn new(options: ApplyOptions) -> Self {
        Self { options }
    }
}

impl ConfigApplier for CommandApplier {
    fn apply(&self, name: &str, config: &McpServerConfig) -> Result<()> {
        let args = self.options.command_args(name, config)?;
        let output = Command::new(&self.options.program)
            .args(&args)
            .current_dir(&self.options.working_dir)
            .output()
            .map_err(|e| {
                DetectorError::Apply(format!("Failed to run {}: {}", self.options.program, e))
            })?;

        if !output.status.success() {
            return Err(DetectorError::Apply(format!(
                "{} exited with {}: {}",
                self.options.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}

/// Prints the command that would run instead of running it
#[derive(Debug, Clone)]
pub struct DryRunApplier {
    options: ApplyOptions,
}

impl DryRunApplier {
    pub fn new(options: ApplyOptions) -> Self {
        Self { options }
    }

    pub fn command_line(&self, name: &str, config: &McpServerConfig) -> Result<String> {
        let args = self.options.command_args(name, config)?;
        let quoted: Vec<String> = args.iter().map(|a| shell_quote(a)).collect();
        Ok(format!("{} {}", self.options.program, quoted.join(" ")))
    }
}

impl ConfigApplier for DryRunApplier {
    fn apply(&self, name: &str, config: &McpServerConfig) -> Result<()> {
        println!("{}", self.command_line(name, config)?);
        Ok(())
    }

    fn records_state(&self) -> bool {
        false
    }
}

/// Single-quotes an argument when it contains anything but plain characters
fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@,+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Outcome of an apply run
#[derive(Debug, Default, Clone)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl ApplyReport {
    pub fn attempted(&self) -> usize {
        self.applied.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Applies each recommendation in order, then records all of them in the
/// architecture state at `state_path`.
///
/// A failing item is logged and reported but does not stop the run. Every
/// attempted item is recorded with status `connected`, including failed ones.
/// Appliers that do not record state (dry runs) leave the document untouched.
pub fn apply_all(
    recommendations: &[&Recommendation],
    applier: &dyn ConfigApplier,
    state_path: &Path,
) -> Result<ApplyReport> {
    let mut report = ApplyReport::default();

    for rec in recommendations {
        match applier.apply(&rec.name, &rec.config) {
            Ok(()) => {
                tracing::info!("Configured {}", rec.name);
                report.applied.push(rec.name.clone());
            }
            Err(e) => {
                tracing::warn!("Failed to configure {}: {}", rec.name, e);
                report.failed.push((rec.name.clone(), e.to_string()));
            }
        }
    }

    if recommendations.is_empty() {
        return Ok(report);
    }
    if !applier.records_state() {
        tracing::debug!("Dry run, not updating {}", state_path.display());
        return Ok(report);
    }

    let mut state = ArchitectureState::load(state_path)?.unwrap_or_default();
    for rec in recommendations {
        state.record_configured(ConfiguredServer::from(*rec))?;
    }
    state.save(state_path)?;
    tracing::debug!("Updated {}", state_path.display());

    Ok(report)
}

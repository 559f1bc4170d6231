use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use mcp_detect::apply::{apply_all, ApplyOptions, CommandApplier, ConfigApplier, DryRunApplier};
use mcp_detect::git::GitProbe;
use mcp_detect::report::{self, OutputFormat};
use mcp_detect::{Detector, DetectorConfig, RecommendationSet, Result};

#[derive(Parser)]
#[command(name = "mcp-detect")]
#[command(about = "Detect which MCP server integrations a project needs")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Show recommendations for the current directory
    mcp-detect detect

    # Machine-readable output
    mcp-detect detect --format json

    # Review recommendations and apply them after confirmation
    mcp-detect apply

    # Print the configuration commands without running them
    mcp-detect apply --dry-run --yes

    # Inspect another project with a custom spec location
    mcp-detect --root ../shop --spec NOTES.md detect
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root to inspect
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Project spec document, relative to the root
    #[arg(long, global = true)]
    pub spec: Option<PathBuf>,

    /// Architecture state document, relative to the root
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,
}

impl Cli {
    pub fn detector_config(&self) -> DetectorConfig {
        let mut config = DetectorConfig::default();
        if let Some(spec) = &self.spec {
            config = config.with_spec_path(spec);
        }
        if let Some(state) = &self.state {
            config = config.with_state_path(state);
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print recommended integrations
    Detect {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Print recommendations and configure them
    Apply {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,

        /// Print configuration commands instead of running them
        #[arg(long)]
        dry_run: bool,

        /// Configuration program to invoke
        #[arg(long, default_value = mcp_detect::apply::DEFAULT_PROGRAM)]
        program: String,

        /// Scope passed to the configuration program
        #[arg(long, default_value = mcp_detect::apply::DEFAULT_SCOPE)]
        scope: String,
    },
}

fn run_detection(root: &Path, config: DetectorConfig) -> Result<RecommendationSet> {
    let detector = Detector::new(config, Box::new(GitProbe::new()))?;
    detector.detect(root)
}

pub fn detect(root: &Path, config: DetectorConfig, format: &str) -> Result<()> {
    let set = run_detection(root, config)?;
    let format: OutputFormat = format.parse().unwrap_or_default();
    write_report(&set, format, &mut io::stdout().lock())
}

fn write_report(set: &RecommendationSet, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    write!(out, "{}", report::render(set, format)?)?;
    if format == OutputFormat::Json {
        writeln!(out)?;
    }
    Ok(())
}

pub fn apply(
    root: &Path,
    config: DetectorConfig,
    yes: bool,
    dry_run: bool,
    program: &str,
    scope: &str,
) -> Result<()> {
    let state_path = config.state_file(root);
    let set = run_detection(root, config)?;

    let options = ApplyOptions::new(root)
        .with_program(program)
        .with_scope(scope);
    let applier = build_applier(options, dry_run);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_apply(
        &set,
        applier.as_ref(),
        &state_path,
        yes,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
}

fn build_applier(options: ApplyOptions, dry_run: bool) -> Box<dyn ConfigApplier> {
    if dry_run {
        Box::new(DryRunApplier::new(options))
    } else {
        Box::new(CommandApplier::new(options))
    }
}

/// Prints the report, asks for confirmation unless `yes`, then applies
fn run_apply(
    set: &RecommendationSet,
    applier: &dyn ConfigApplier,
    state_path: &Path,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    write_report(set, OutputFormat::Text, out)?;

    if set.is_empty() {
        return Ok(());
    }

    let question = format!("Apply {} integration(s)?", set.len());
    if !yes && !confirm(&question, input, out)? {
        writeln!(out, "Nothing applied")?;
        return Ok(());
    }

    // dry-run command lines go to stdout directly
    out.flush()?;
    let sorted = set.sorted();
    let outcome = apply_all(&sorted, applier, state_path)?;

    for name in &outcome.applied {
        writeln!(out, "  ✓ {}", name)?;
    }
    for (name, error) in &outcome.failed {
        writeln!(out, "  ✗ {}: {}", name, error)?;
    }
    if applier.records_state() {
        writeln!(
            out,
            "Configured {} of {} integration(s); state written to {}",
            outcome.applied.len(),
            outcome.attempted(),
            state_path.display()
        )?;
    } else {
        writeln!(
            out,
            "Dry run: {} integration(s) not configured; {} left unchanged",
            outcome.attempted(),
            state_path.display()
        )?;
    }

    Ok(())
}

/// Asks a yes/no question, defaulting to no
fn confirm(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
    write!(out, "{} [y/N] ", question)?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    use mcp_detect::report::EMPTY_REPORT;
    use mcp_detect::{Candidate, McpServerConfig, Priority, StaticProbe};
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<String>>,
    }

    impl ConfigApplier for Recording {
        fn apply(&self, name: &str, _config: &McpServerConfig) -> Result<()> {
            self.calls.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    fn two_integrations() -> RecommendationSet {
        let mut set = RecommendationSet::new();
        set.add(Candidate::new("docker", Priority::Medium, "Container configuration found (Dockerfile)"));
        set.add(Candidate::new("github", Priority::High, "Repository is hosted on GitHub"));
        set
    }

    fn run(
        set: &RecommendationSet,
        applier: &dyn ConfigApplier,
        state_path: &Path,
        yes: bool,
        answer: &str,
    ) -> String {
        let mut input = answer.as_bytes();
        let mut out = Vec::new();
        run_apply(set, applier, state_path, yes, &mut input, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_declined_prompt_applies_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let original = r#"{"architecture": {}}"#;
        fs::write(&state_path, original).unwrap();
        let applier = Recording::default();

        let output = run(&two_integrations(), &applier, &state_path, false, "n\n");

        assert!(output.contains("Apply 2 integration(s)? [y/N] "));
        assert!(output.ends_with("Nothing applied\n"));
        assert!(applier.calls.borrow().is_empty());
        assert_eq!(fs::read_to_string(&state_path).unwrap(), original);
    }

    #[test]
    fn test_empty_answer_defaults_to_no() {
        let temp_dir = TempDir::new().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let applier = Recording::default();

        run(&two_integrations(), &applier, &state_path, false, "");

        assert!(applier.calls.borrow().is_empty());
        assert!(!state_path.exists());
    }

    #[test]
    fn test_confirmed_prompt_applies_in_priority_order() {
        let temp_dir = TempDir::new().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let applier = Recording::default();

        let output = run(&two_integrations(), &applier, &state_path, false, "Yes\n");

        assert_eq!(*applier.calls.borrow(), vec!["github", "docker"]);
        assert!(output.contains("  ✓ github\n"));
        assert!(output.contains("Configured 2 of 2 integration(s)"));
        assert!(state_path.exists());
    }

    #[test]
    fn test_yes_skips_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let applier = Recording::default();

        let output = run(&two_integrations(), &applier, &state_path, true, "");

        assert!(!output.contains("[y/N]"));
        assert_eq!(applier.calls.borrow().len(), 2);
    }

    #[test]
    fn test_empty_project_prints_only_empty_report() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let config = DetectorConfig::default();
        let state_path = config.state_file(root);
        let detector = Detector::new(config, Box::new(StaticProbe::none())).unwrap();
        let set = detector.detect(root).unwrap();
        let applier = Recording::default();

        let output = run(&set, &applier, &state_path, false, "y\n");

        assert_eq!(output, format!("{}\n", EMPTY_REPORT));
        assert!(applier.calls.borrow().is_empty());
        assert!(!state_path.exists());
    }

    #[test]
    fn test_dry_run_flag_does_not_persist() {
        let temp_dir = TempDir::new().unwrap();
        let state_path = temp_dir.path().join("state.json");
        let applier = build_applier(ApplyOptions::new(temp_dir.path()), true);
        assert!(!applier.records_state());
        assert!(build_applier(ApplyOptions::new(temp_dir.path()), false).records_state());

        let output = run(&two_integrations(), applier.as_ref(), &state_path, true, "");

        assert!(output.contains("Dry run: 2 integration(s) not configured"));
        assert!(!state_path.exists());
    }

    #[test]
    fn test_write_report_json_ends_with_newline() {
        let mut out = Vec::new();
        write_report(&two_integrations(), OutputFormat::Json, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with('['));
        assert!(text.ends_with("]\n"));
    }
}

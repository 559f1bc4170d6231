use std::path::Path;
use std::process::Command;

/// Name of the remote whose URL is inspected
pub const ORIGIN: &str = "origin";

/// Looks up the hosting remote of a project.
///
/// Implementations never fail: anything that prevents reading the remote
/// (no VCS tool, not a checkout, no remote) is reported as `None`.
pub trait VersionControlProbe {
    fn remote_url(&self, root: &Path) -> Option<String>;
}

/// Probe backed by the `git` command line
#[derive(Debug, Clone, Default)]
pub struct GitProbe;

impl GitProbe {
    pub fn new() -> Self {
        Self
    }

    /// Runs git in `root` and returns trimmed stdout of a successful call
    fn run(root: &Path, args: &[&str]) -> Option<String> {
        let output = match Command::new("git").args(args).current_dir(root).output() {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("Failed to run git {}: {}", args.join(" "), e);
                return None;
            }
        };

        if !output.status.success() {
            tracing::debug!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            None
        } else {
            Some(stdout)
        }
    }
}

impl VersionControlProbe for GitProbe {
    fn remote_url(&self, root: &Path) -> Option<String> {
        let inside = Self::run(root, &["rev-parse", "--is-inside-work-tree"])?;
        if inside != "true" {
            return None;
        }
        Self::run(root, &["remote", "get-url", ORIGIN])
    }
}

/// Probe returning a fixed answer, for callers that already know the remote
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    url: Option<String>,
}

impl StaticProbe {
    pub fn new(url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
        }
    }

    pub fn none() -> Self {
        Self { url: None }
    }
}

impl VersionControlProbe for StaticProbe {
    fn remote_url(&self, _root: &Path) -> Option<String> {
        self.url.clone()
    }
}

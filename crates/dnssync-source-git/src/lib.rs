// # Git Change Source
//
// This crate provides the `ChangeSource` implementation backed by a local
// git repository. It shells out to the `git` binary; no libgit bindings.
//
// ## Commands
//
// - Change report: `git -c core.quotePath=false diff --name-status <base> <head>`
// - Baseline content: `git show <base>:<path>`
// - Current content: `git show <head>:<path>`
//
// Both sides are read from commits, never from the working tree, so the
// content synced is the content the change report describes.
//
// A baseline that does not resolve to a commit (first commit of a
// repository, shallow clone) is replaced by the empty tree, so every file
// in the current revision reports as added.

use async_trait::async_trait;
use dnssync_core::config::ChangeSourceConfig;
use dnssync_core::traits::ChangeSource;
use dnssync_core::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tokio::process::Command;
use tokio::sync::OnceCell;

/// Hash of git's empty tree object
pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Change source reading a local git repository
#[derive(Debug)]
pub struct GitChangeSource {
    /// Repository working tree
    repo_path: PathBuf,

    /// Baseline revision as configured
    base_rev: String,

    /// Current revision
    head_rev: String,

    /// Baseline after resolution (the configured revision or the empty tree)
    resolved_base: OnceCell<String>,
}

impl GitChangeSource {
    /// Create a change source comparing `base_rev` against `head_rev`
    pub fn new(
        repo_path: impl Into<PathBuf>,
        base_rev: impl Into<String>,
        head_rev: impl Into<String>,
    ) -> Self {
        Self {
            repo_path: repo_path.into(),
            base_rev: base_rev.into(),
            head_rev: head_rev.into(),
            resolved_base: OnceCell::new(),
        }
    }

    /// Build a change source from its configuration
    pub fn from_config(config: &ChangeSourceConfig) -> Result<Self> {
        config.validate()?;

        match config {
            ChangeSourceConfig::Git {
                repo_path,
                base_rev,
                head_rev,
            } => Ok(Self::new(repo_path, base_rev.clone(), head_rev.clone())),
        }
    }

    /// Run git with `args` in the repository and return its stdout
    async fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::change_source(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            return Err(git_failure(args, &output.status, &output.stderr));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| Error::change_source(format!("git output is not UTF-8: {}", e)))
    }

    /// The baseline revision to diff against, resolved once
    async fn base(&self) -> Result<&str> {
        let base = self
            .resolved_base
            .get_or_try_init(|| self.resolve_base())
            .await?;
        Ok(base.as_str())
    }

    async fn resolve_base(&self) -> Result<String> {
        let spec = format!("{}^{{commit}}", self.base_rev);
        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(["rev-parse", "--verify", "--quiet", &spec])
            .output()
            .await
            .map_err(|e| Error::change_source(format!("Failed to run git: {}", e)))?;

        if output.status.success() {
            return Ok(self.base_rev.clone());
        }

        tracing::warn!(
            "Baseline revision {} does not resolve to a commit, diffing against the empty tree",
            self.base_rev
        );
        Ok(EMPTY_TREE.to_string())
    }
}

/// Describe a failed git invocation
fn git_failure(args: &[&str], status: &std::process::ExitStatus, stderr: &[u8]) -> Error {
    let subcommand = args
        .iter()
        .find(|arg| !arg.starts_with('-') && !arg.contains('='))
        .copied()
        .unwrap_or("git");
    let stderr = String::from_utf8_lossy(stderr);

    Error::change_source(format!(
        "git {} exited with {}: {}",
        subcommand,
        status,
        stderr.trim()
    ))
}

/// Reject paths that would leave the repository
fn check_relative(path: &str) -> Result<()> {
    let escapes = Path::new(path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if path.is_empty() || escapes {
        return Err(Error::change_source(format!(
            "Refusing path outside the repository: '{}'",
            path
        )));
    }
    Ok(())
}

#[async_trait]
impl ChangeSource for GitChangeSource {
    async fn change_report(&self) -> Result<String> {
        let base = self.base().await?;
        tracing::debug!("Diffing {}..{}", base, self.head_rev);

        self.git(&[
            "-c",
            "core.quotePath=false",
            "diff",
            "--name-status",
            base,
            &self.head_rev,
        ])
        .await
    }

    async fn previous_content(&self, path: &str) -> Result<String> {
        check_relative(path)?;
        let base = self.base().await?;
        let object = format!("{}:{}", base, path);

        self.git(&["show", &object]).await
    }

    async fn current_content(&self, path: &str) -> Result<String> {
        check_relative(path)?;
        let object = format!("{}:{}", self.head_rev, path);

        self.git(&["show", &object]).await
    }

    fn source_name(&self) -> &'static str {
        "git"
    }
}

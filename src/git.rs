use std::io;
use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use crate::error::StageError;

/// Returned by the fixed-window policy when the range contains no matching
/// file changes. The generator recognizes it and skips the model call.
pub const NO_CHANGES_SENTINEL: &str = "No significant changes detected in matching files.";

/// Run a git command with an explicit working directory and capture stdout.
///
/// The working directory is passed per call so path matching is unambiguous
/// no matter where the tool was invoked from; the process-wide cwd is never
/// touched.
fn git_output(workdir: Option<&Path>, args: &[&str]) -> Result<String, StageError> {
    let mut cmd = GitCommand::new("git");
    cmd.args(args);
    if let Some(dir) = workdir {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            StageError::ToolUnavailable
        } else {
            StageError::Subprocess(format!("failed to run git {args:?}: {e}"))
        }
    })?;

    if !output.status.success() {
        return Err(StageError::Subprocess(format!(
            "git {:?} exited with status {:?}: {}",
            args,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Resolve the repository root for the current directory.
pub fn repo_root() -> Result<PathBuf, StageError> {
    let out = git_output(None, &["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(out.trim()))
}

/// How the commit range for the diff is chosen.
pub trait RangePolicy {
    /// Produce the diff for files of `suffix` within this policy's range.
    ///
    /// Returns the sentinel or an empty string when nothing matched; errors
    /// propagate to the caller untouched.
    fn collect_diff(&self, root: &Path, suffix: &str) -> Result<String, StageError>;
}

/// Diff everything that changed between N commits ago and the working tree.
pub struct FixedWindow {
    pub commits: usize,
}

impl RangePolicy for FixedWindow {
    fn collect_diff(&self, root: &Path, suffix: &str) -> Result<String, StageError> {
        let base = format!("HEAD~{}", self.commits);
        let pathspec = suffix_pathspec(suffix);

        let listing = git_output(
            Some(root),
            &["diff", "--name-only", &base, "--", &pathspec],
        )?;
        let files = non_empty_lines(&listing);
        if files.is_empty() {
            return Ok(NO_CHANGES_SENTINEL.to_string());
        }

        let mut args: Vec<&str> = vec!["diff", "-p", &base, "--"];
        args.extend(files.iter().map(String::as_str));
        let diff = git_output(Some(root), &args)?;

        let diff = diff.trim();
        if diff.is_empty() {
            Ok(NO_CHANGES_SENTINEL.to_string())
        } else {
            Ok(diff.to_string())
        }
    }
}

/// Diff the most recent commit that touched a matching file against its
/// parent. Returns an empty string when no such commit exists; a root commit
/// has no parent and surfaces as a subprocess failure.
pub struct LatestCommit;

impl RangePolicy for LatestCommit {
    fn collect_diff(&self, root: &Path, suffix: &str) -> Result<String, StageError> {
        let pathspec = suffix_pathspec(suffix);

        let commit = git_output(Some(root), &["log", "-1", "--format=%H", "--", &pathspec])?;
        let commit = commit.trim().to_string();
        if commit.is_empty() {
            return Ok(String::new());
        }

        let parent_ref = format!("{commit}^");
        let parent = git_output(Some(root), &["rev-parse", "--verify", &parent_ref])?;
        let parent = parent.trim().to_string();

        let diff = git_output(
            Some(root),
            &["diff", "-p", &parent, &commit, "--", &pathspec],
        )?;
        Ok(diff.trim().to_string())
    }
}

/// Pathspec matching `suffix` files anywhere in the tree, e.g. "*.cs".
fn suffix_pathspec(suffix: &str) -> String {
    format!("*.{}", suffix.trim_start_matches('.'))
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

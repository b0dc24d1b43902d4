use crate::error::{GitImportError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// [super::GitBackend] that shells out to the `git` executable.
///
/// Useful where libgit2 lacks a transport or credential helper that the
/// installed git supports.
#[derive(Debug, Clone)]
pub struct GitCliBackend {
    program: String,
}

impl GitCliBackend {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable instead of the one on `PATH`
    pub fn with_program(program: impl Into<String>) -> Self {
        GitCliBackend {
            program: program.into(),
        }
    }

    /// Run git and return its trimmed stdout, or its trimmed stderr on failure
    fn git<I, S>(&self, dir: Option<&Path>, args: I) -> std::result::Result<String, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).env("GIT_TERMINAL_PROMPT", "0");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }

        debug!(command = ?cmd, "running git");
        let output = cmd
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

impl Default for GitCliBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl super::GitBackend for GitCliBackend {
    fn clone_shallow(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        let mut args = vec![
            OsStr::new("clone"),
            OsStr::new(url),
            dest.as_os_str(),
            OsStr::new("--depth"),
            OsStr::new("1"),
            OsStr::new("--no-checkout"),
        ];
        if let Some(branch) = branch {
            args.push(OsStr::new("--branch"));
            args.push(OsStr::new(branch));
        }

        self.git(None, args)
            .map_err(|stderr| GitImportError::clone_failed(url, stderr))?;
        Ok(())
    }

    fn list_tags(&self, repo_dir: &Path) -> Result<Vec<String>> {
        self.git(
            Some(repo_dir),
            ["fetch", "--tags", "--depth", "1", "--quiet", "origin"],
        )
        .map_err(|stderr| {
            GitImportError::clone_failed(
                repo_dir.display().to_string(),
                format!("failed to fetch tags: {}", stderr),
            )
        })?;

        let listing = self
            .git(Some(repo_dir), ["tag", "--list"])
            .map_err(|stderr| GitImportError::clone_failed(repo_dir.display().to_string(), stderr))?;

        Ok(listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    fn checkout_paths(&self, repo_dir: &Path, reference: &str, paths: &[String]) -> Result<()> {
        let mut args = vec!["checkout", reference, "--"];
        args.extend(paths.iter().map(String::as_str));

        self.git(Some(repo_dir), args)
            .map_err(|stderr| GitImportError::checkout_failed(reference, stderr))?;
        Ok(())
    }
}

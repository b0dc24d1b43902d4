use crate::error::{GitImportError, Result};
use crate::git::GitBackend;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A call received by [MockBackend]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Clone {
        url: String,
        branch: Option<String>,
        dest: PathBuf,
    },
    ListTags,
    Checkout {
        reference: String,
        paths: Vec<String>,
    },
}

/// Mock backend for testing without network or git operations.
///
/// Refs map to a flat list of `(relative path, contents)` files. A checkout
/// writes the files matching its pathspecs into the clone directory and
/// fails like git when a pathspec matches nothing. Every call is recorded.
pub struct MockBackend {
    refs: HashMap<String, Vec<(String, String)>>,
    tags: Vec<String>,
    clone_failure: Option<String>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    /// Create a new empty mock backend
    pub fn new() -> Self {
        MockBackend {
            refs: HashMap::new(),
            tags: Vec::new(),
            clone_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Add a file to a ref (branch name, tag name or `HEAD`)
    pub fn add_file(&mut self, reference: &str, path: &str, contents: &str) {
        self.refs
            .entry(reference.to_string())
            .or_default()
            .push((path.to_string(), contents.to_string()));
    }

    /// Add a tag with the given files. Tags are listed in insertion order.
    pub fn add_tag(&mut self, name: &str, files: &[&str]) {
        self.tags.push(name.to_string());
        self.refs.entry(name.to_string()).or_default();
        for path in files {
            self.add_file(name, path, &format!("# {} at {}", path, name));
        }
    }

    /// Make every clone fail with the given reason
    pub fn fail_clone(&mut self, reason: &str) {
        self.clone_failure = Some(reason.to_string());
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn clone_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::Clone { .. }))
            .count()
    }

    pub fn checkout_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::Checkout { .. }))
            .count()
    }

    /// Clone destinations, in call order
    pub fn cloned_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Clone { dest, .. } => Some(dest),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal pathspec matching with git's default semantics: `*` also matches `/`,
/// so `*.ext` matches at any depth. Anything else is a directory prefix.
fn pathspec_matches(spec: &str, path: &str) -> bool {
    match spec.strip_prefix('*') {
        Some(suffix) => path.ends_with(suffix),
        None => path.starts_with(&format!("{}/", spec.trim_end_matches('/'))),
    }
}

impl GitBackend for MockBackend {
    fn clone_shallow(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        self.record(BackendCall::Clone {
            url: url.to_string(),
            branch: branch.map(String::from),
            dest: dest.to_path_buf(),
        });

        if let Some(reason) = &self.clone_failure {
            return Err(GitImportError::clone_failed(url, reason.clone()));
        }

        fs::create_dir_all(dest.join(".git"))?;
        Ok(())
    }

    fn list_tags(&self, _repo_dir: &Path) -> Result<Vec<String>> {
        self.record(BackendCall::ListTags);
        Ok(self.tags.clone())
    }

    fn checkout_paths(&self, repo_dir: &Path, reference: &str, paths: &[String]) -> Result<()> {
        self.record(BackendCall::Checkout {
            reference: reference.to_string(),
            paths: paths.to_vec(),
        });

        let files = self.refs.get(reference).ok_or_else(|| {
            GitImportError::checkout_failed(reference, "reference is not a tree")
        })?;

        for spec in paths {
            let matching: Vec<_> = files
                .iter()
                .filter(|(path, _)| pathspec_matches(spec, path))
                .collect();

            if matching.is_empty() {
                return Err(GitImportError::checkout_failed(
                    reference,
                    format!("pathspec '{}' did not match any file(s) known to git", spec),
                ));
            }

            for (path, contents) in matching {
                let target = repo_dir.join(path);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(target, contents)?;
            }
        }

        Ok(())
    }
}

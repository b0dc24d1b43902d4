//! Import pipeline: clone, resolve, check out, enumerate, hand files to a consumer.

use crate::domain::{VersionConstraint, DEFAULT_BRANCH};
use crate::error::{GitImportError, Result};
use crate::git::GitBackend;
use crate::ui::Reporter;
use crate::workspace::{ImportLayout, Workspace, DEFAULT_WORKSPACE_PREFIX};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Remote repository url
    pub url: String,
    /// Branch or ref to check out when no version is given
    pub branch: String,
    /// Version requirement selecting a tag, e.g. `"~> 1.0.0"`
    pub version: Option<String>,
}

impl ImportRequest {
    pub fn new(url: impl Into<String>) -> Self {
        ImportRequest {
            url: url.into(),
            branch: DEFAULT_BRANCH.to_string(),
            version: None,
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Runs imports against one repository backend.
///
/// Each [ImportPipeline::run] owns a fresh [Workspace]; nothing is shared
/// between runs, so independent runs may use independent pipelines freely.
pub struct ImportPipeline<'a> {
    backend: &'a dyn GitBackend,
    reporter: &'a dyn Reporter,
    layout: ImportLayout,
    workspace_prefix: String,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(backend: &'a dyn GitBackend, reporter: &'a dyn Reporter) -> Self {
        ImportPipeline {
            backend,
            reporter,
            layout: ImportLayout::default(),
            workspace_prefix: DEFAULT_WORKSPACE_PREFIX.to_string(),
        }
    }

    pub fn with_layout(mut self, layout: ImportLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_workspace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.workspace_prefix = prefix.into();
        self
    }

    pub fn layout(&self) -> &ImportLayout {
        &self.layout
    }

    /// Import the source files of `request` through `consumer`.
    ///
    /// The consumer is called once per file: first the top-level source files,
    /// then those of each import directory (`helper` by default), each group in
    /// file name order. Its return values come back in the same order.
    ///
    /// # Arguments
    /// * `request` - Repository url, branch and optional version requirement
    /// * `consumer` - Called with the path of every imported file
    ///
    /// # Returns
    /// * `Ok(Vec<T>)` - Consumer results, in call order
    /// * `Err(MissingUrl | MissingConsumer | InvalidConstraint)` - Before any git operation
    /// * `Err(Clone)` - The repository could not be cloned or its tags fetched
    /// * `Err(NoMatchingTag)` - No tag satisfies the version requirement
    /// * `Err(Checkout)` - The resolved ref has no source files
    ///
    /// The transient workspace is removed on every one of these paths.
    pub fn run<T, F>(&self, request: &ImportRequest, consumer: Option<F>) -> Result<Vec<T>>
    where
        F: FnMut(&Path) -> T,
    {
        let mut consumer = consumer;
        self.run_with_relative_paths(
            request,
            consumer
                .as_mut()
                .map(|consumer| move |path: &Path, _relative: &Path| consumer(path)),
        )
    }

    /// Same as [ImportPipeline::run], but the consumer also receives the
    /// file's path relative to the repository root (`helper/util.rb`).
    pub fn run_with_relative_paths<T, F>(
        &self,
        request: &ImportRequest,
        consumer: Option<F>,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Path, &Path) -> T,
    {
        if request.url.trim().is_empty() {
            return Err(GitImportError::MissingUrl);
        }
        let mut consumer = consumer.ok_or(GitImportError::MissingConsumer)?;
        let constraint = request
            .version
            .as_deref()
            .map(VersionConstraint::parse)
            .transpose()?;

        let workspace = Workspace::clone_repository(
            self.backend,
            self.reporter,
            &request.url,
            &request.branch,
            &self.workspace_prefix,
        )?;
        let reference = workspace.resolve_ref(&request.branch, constraint.as_ref())?;
        workspace.checkout(&reference, &self.layout)?;

        let root = workspace.root();
        let mut consume = |path: &Path| consumer(path, path.strip_prefix(root).unwrap_or(path));

        let mut results = Vec::new();
        for path in self.source_files(root)? {
            results.push(consume(&path));
        }

        for folder in &self.layout.import_dirs {
            match self.source_files(&root.join(folder)) {
                Ok(paths) => {
                    for path in paths {
                        results.push(consume(&path));
                    }
                }
                Err(e) => debug!(%folder, error = %e, "skipping import folder"),
            }
        }

        info!(count = results.len(), reference = %reference, "import finished");
        self.reporter.success(&format!(
            "Imported {} file(s) from '{}'",
            results.len(),
            reference
        ));

        if let Err(e) = workspace.close() {
            warn!(error = %e, "failed to remove workspace");
        }

        Ok(results)
    }

    /// Source files directly inside `dir`, sorted by file name
    fn source_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            // Follows symlinks; git can check out a linked source file
            if path.is_file() && self.layout.is_source_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

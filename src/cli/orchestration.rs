//! Main workflow orchestration logic
//!
//! Keeps the import workflow separate from CLI argument parsing so it can be
//! called programmatically without depending on clap.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;
use crate::git::GitBackend;
use crate::pipeline::{ImportPipeline, ImportRequest};
use crate::ui::Reporter;

/// Arguments for the import workflow
///
/// Mirrors the CLI Args in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportWorkflowArgs {
    /// Remote repository url
    pub url: String,

    /// Branch or ref to import from, `HEAD` when not given
    pub branch: Option<String>,

    /// Version requirement selecting a tag
    pub version: Option<String>,

    /// Directory the imported files are copied into; listing only when `None`
    pub dest: Option<PathBuf>,
}

/// One file handed to the consumer
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    /// Path inside the repository (`Fastfile.rb`, `helper/util.rb`)
    pub name: String,

    /// Where the file was copied to, if it was
    pub destination: Option<PathBuf>,
}

impl fmt::Display for ImportedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Some(destination) => write!(f, "{} -> {}", self.name, destination.display()),
            None => f.write_str(&self.name),
        }
    }
}

/// Result of a successful import workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Imported files, in import order
    pub files: Vec<ImportedFile>,
}

impl WorkflowResult {
    /// Display names for the imported files
    pub fn entries(&self) -> Vec<String> {
        self.files.iter().map(ImportedFile::to_string).collect()
    }
}

/// Copy one imported file to `dest/<relative>`, keeping the repository layout
fn copy_into(path: &Path, relative: &Path, dest: Option<&Path>) -> Result<ImportedFile> {
    if relative.file_name().is_none() {
        bail!("imported path {} has no file name", path.display());
    }
    let name = relative.to_string_lossy().into_owned();

    let destination = match dest {
        Some(dest) => {
            let target = dest.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            if target.exists() {
                warn!(target = %target.display(), "overwriting existing file");
            }
            fs::copy(path, &target)
                .with_context(|| format!("failed to copy {} to {}", name, target.display()))?;
            Some(target)
        }
        None => None,
    };

    Ok(ImportedFile { name, destination })
}

/// Main import workflow
///
/// Runs the import pipeline with a consumer that copies every imported file
/// out of the transient workspace before it is removed:
/// 1. Create the destination directory when one is given
/// 2. Clone, resolve and check out through [ImportPipeline]
/// 3. Copy (or just record) each imported file in import order, keeping
///    its path relative to the repository root, and report it
///
/// # Arguments
///
/// * `args` - Workflow arguments (url, branch, version, dest)
/// * `config` - git-import configuration
/// * `backend` - Repository access implementation
/// * `reporter` - Receives progress messages
///
/// # Returns
///
/// Result containing the imported files or error
pub fn run_import_workflow(
    args: ImportWorkflowArgs,
    config: &Config,
    backend: &dyn GitBackend,
    reporter: &dyn Reporter,
) -> Result<WorkflowResult> {
    config.validate()?;

    if let Some(dest) = &args.dest {
        fs::create_dir_all(dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;
    }

    let mut request = ImportRequest::new(args.url);
    if let Some(branch) = args.branch {
        request = request.with_branch(branch);
    }
    if let Some(version) = args.version {
        request = request.with_version(version);
    }

    let pipeline = ImportPipeline::new(backend, reporter)
        .with_layout(config.layout())
        .with_workspace_prefix(config.git.workspace_prefix.clone());

    let dest = args.dest.as_deref();
    let consumer = |path: &Path, relative: &Path| -> Result<ImportedFile> {
        let file = copy_into(path, relative, dest)?;
        reporter.imported(&file.to_string());
        Ok(file)
    };
    let files = pipeline
        .run_with_relative_paths(&request, Some(consumer))?
        .into_iter()
        .collect::<Result<Vec<_>>>()?;

    Ok(WorkflowResult { files })
}

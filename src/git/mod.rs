//! Repository access abstraction layer
//!
//! This module defines the small set of remote-repository operations the
//! import pipeline relies on, behind the [GitBackend] trait:
//!
//! - [repository::Git2Backend]: libgit2 through the `git2` crate
//! - [cli::GitCliBackend]: the `git` executable run as a subprocess
//! - [mock::MockBackend]: an in-memory fake for testing
//!
//! Pipeline code depends on the trait only; the concrete backend is picked
//! from configuration with [create_backend].
//!
//! ```rust
//! # use git_import::git::GitBackend;
//! # use std::path::Path;
//! # fn example(backend: &dyn GitBackend, dest: &Path) -> git_import::Result<()> {
//! backend.clone_shallow("https://example.com/team/lanes.git", None, dest)?;
//! let tags = backend.list_tags(dest)?;
//! backend.checkout_paths(dest, "HEAD", &["*.rb".to_string()])?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod mock;
pub mod repository;

pub use cli::GitCliBackend;
pub use mock::{BackendCall, MockBackend};
pub use repository::Git2Backend;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remote repository operations used by the import pipeline
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync`. A single backend value may serve
/// several independent pipeline runs, each with its own clone directory.
///
/// ## Error Handling
///
/// Clone and tag-fetch failures map to [crate::error::GitImportError::Clone];
/// a checkout whose paths match nothing at the ref maps to
/// [crate::error::GitImportError::Checkout]. A failed checkout leaves the
/// clone directory usable for further checkouts.
pub trait GitBackend: Send + Sync {
    /// Clone `url` into `dest` with a history depth of 1 and no working tree checkout
    ///
    /// # Arguments
    /// * `url` - Remote repository url
    /// * `branch` - Branch to restrict the clone to, `None` for the remote default
    /// * `dest` - Directory to clone into (must not exist yet)
    ///
    /// Never prompts for credentials on a terminal; an unauthenticated or
    /// missing repository is reported as an error.
    fn clone_shallow(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()>;

    /// Fetch the remote's tags and return their names in the order the backend reports them
    fn list_tags(&self, repo_dir: &Path) -> Result<Vec<String>>;

    /// Materialize the given pathspecs from `reference` into the working tree
    ///
    /// # Arguments
    /// * `repo_dir` - Directory of a clone made by [GitBackend::clone_shallow]
    /// * `reference` - Branch, tag or `HEAD`
    /// * `paths` - Git pathspecs (e.g. `*.rb`, `helper`)
    ///
    /// # Returns
    /// * `Ok(())` - Matching paths were written
    /// * `Err` - If the ref is unknown or a pathspec matches nothing
    fn checkout_paths(&self, repo_dir: &Path, reference: &str, paths: &[String]) -> Result<()>;
}

/// Which [GitBackend] implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// libgit2 via the `git2` crate
    #[default]
    Git2,
    /// The `git` executable found on `PATH`
    Cli,
}

/// Build the backend selected by `kind`
pub fn create_backend(kind: BackendKind) -> Box<dyn GitBackend> {
    match kind {
        BackendKind::Git2 => Box::new(Git2Backend::new()),
        BackendKind::Cli => Box::new(GitCliBackend::new()),
    }
}

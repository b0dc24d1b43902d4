//! Transient clone of a remote repository for a single import run.

use crate::domain::{ResolvedRef, TagSelector, VersionConstraint, DEFAULT_BRANCH};
use crate::error::Result;
use crate::git::GitBackend;
use crate::ui::Reporter;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// Default prefix of the transient directory name
pub const DEFAULT_WORKSPACE_PREFIX: &str = "git_import";

/// Which files of the repository get checked out and imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportLayout {
    /// Extension of importable source files, without the dot
    pub source_suffix: String,
    /// Subdirectories checked out when present at the ref
    pub optional_dirs: Vec<String>,
    /// Subdirectories whose source files are imported after the top-level ones
    pub import_dirs: Vec<String>,
}

impl Default for ImportLayout {
    fn default() -> Self {
        ImportLayout {
            source_suffix: "rb".to_string(),
            optional_dirs: vec!["actions".to_string(), "helper".to_string()],
            import_dirs: vec!["helper".to_string()],
        }
    }
}

impl ImportLayout {
    /// Pathspec selecting the source files (`*.rb`, matching at any depth)
    pub fn source_pattern(&self) -> String {
        format!("*.{}", self.source_suffix)
    }

    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|extension| extension == self.source_suffix.as_str())
    }
}

/// Directory name for the clone, taken from the last component of the url
pub fn repository_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit(['/', ':', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("repository")
        .to_string()
}

/// A shallow clone living in its own temporary directory.
///
/// The directory and everything in it is removed when the workspace is
/// dropped, whichever way the owning run ends.
pub struct Workspace<'a> {
    backend: &'a dyn GitBackend,
    reporter: &'a dyn Reporter,
    dir: TempDir,
    repo_dir: PathBuf,
}

impl<'a> Workspace<'a> {
    /// Create the temporary directory and shallow-clone `url` into it.
    ///
    /// # Arguments
    /// * `backend` - Repository access implementation
    /// * `reporter` - Receives progress messages
    /// * `url` - Remote repository url
    /// * `branch` - Branch to clone; `HEAD` clones the remote's default branch
    /// * `prefix` - Prefix of the temporary directory name
    ///
    /// # Returns
    /// * `Ok(Workspace)` - Cloned, nothing checked out yet
    /// * `Err(Clone)` - If the repository cannot be reached or read; the directory is already gone
    pub fn clone_repository(
        backend: &'a dyn GitBackend,
        reporter: &'a dyn Reporter,
        url: &str,
        branch: &str,
        prefix: &str,
    ) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix(prefix).tempdir()?;
        let repo_dir = dir.path().join(repository_name(url));

        reporter.status("Cloning remote git repo...");
        let branch_option = (branch != DEFAULT_BRANCH).then_some(branch);
        backend.clone_shallow(url, branch_option, &repo_dir)?;
        debug!(path = %repo_dir.display(), "clone ready");

        Ok(Workspace {
            backend,
            reporter,
            dir,
            repo_dir,
        })
    }

    /// Directory holding the clone's working tree
    pub fn root(&self) -> &Path {
        &self.repo_dir
    }

    /// The temporary directory removed on drop
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Decide which ref to check out.
    ///
    /// Without a constraint this is the branch as given. With one, the remote
    /// tags are fetched and [TagSelector] picks the last matching tag.
    pub fn resolve_ref(
        &self,
        branch: &str,
        constraint: Option<&VersionConstraint>,
    ) -> Result<ResolvedRef> {
        let Some(constraint) = constraint else {
            return Ok(ResolvedRef::Branch(branch.to_string()));
        };

        self.reporter.status("Fetching remote git tags...");
        let tags = self.backend.list_tags(&self.repo_dir)?;
        debug!(count = tags.len(), "remote tags listed");

        let resolved = TagSelector::new(constraint).select(&tags)?;
        info!(tag = %resolved, constraint = %constraint.expression(), "resolved tag");
        Ok(resolved)
    }

    /// Check out the source files at `reference`, then each optional directory.
    ///
    /// The source file checkout must succeed. Optional directories that do not
    /// exist at the ref are skipped.
    pub fn checkout(&self, reference: &ResolvedRef, layout: &ImportLayout) -> Result<()> {
        self.reporter
            .status(&format!("Checking out {} at '{}'", layout.source_pattern(), reference));
        self.backend
            .checkout_paths(&self.repo_dir, reference.as_str(), &[layout.source_pattern()])?;

        for folder in &layout.optional_dirs {
            let result = self.backend.checkout_paths(
                &self.repo_dir,
                reference.as_str(),
                std::slice::from_ref(folder),
            );
            if let Err(e) = result {
                info!(%folder, error = %e, "optional folder not checked out");
            }
        }

        Ok(())
    }

    /// Remove the workspace now, reporting removal failures
    pub fn close(self) -> Result<()> {
        debug!(path = %self.dir.path().display(), "removing workspace");
        self.dir.close()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitImportError;
    use crate::git::{BackendCall, MockBackend};
    use crate::ui::{RecordingReporter, SilentReporter};

    #[test]
    fn test_repository_name() {
        assert_eq!(repository_name("https://github.com/team/lanes.git"), "lanes.git");
        assert_eq!(repository_name("git@github.com:team/lanes"), "lanes");
        assert_eq!(repository_name("git@host:lanes.git"), "lanes.git");
        assert_eq!(repository_name("https://example.com/team/lanes/"), "lanes");
        assert_eq!(repository_name("/srv/git/shared"), "shared");
        assert_eq!(repository_name(".."), "repository");
    }

    #[test]
    fn test_layout_defaults() {
        let layout = ImportLayout::default();
        assert_eq!(layout.source_pattern(), "*.rb");
        assert!(layout.is_source_file(Path::new("/tmp/x/Fastfile.rb")));
        assert!(!layout.is_source_file(Path::new("/tmp/x/README.md")));
        assert!(!layout.is_source_file(Path::new("/tmp/x/rb")));
    }

    #[test]
    fn test_clone_head_passes_no_branch() {
        let backend = MockBackend::new();
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        assert!(workspace.root().ends_with("lanes.git"));
        match &backend.calls()[0] {
            BackendCall::Clone { branch, .. } => assert_eq!(branch, &None),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_clone_named_branch() {
        let backend = MockBackend::new();
        let _workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "develop",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        match &backend.calls()[0] {
            BackendCall::Clone { branch, .. } => assert_eq!(branch.as_deref(), Some("develop")),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn test_drop_removes_directory() {
        let backend = MockBackend::new();
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        let path = workspace.path().to_path_buf();
        assert!(path.exists());
        drop(workspace);
        assert!(!path.exists());
    }

    #[test]
    fn test_failed_clone_leaves_nothing_behind() {
        let mut backend = MockBackend::new();
        backend.fail_clone("Repository not found");

        let result = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/missing.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        );
        assert!(matches!(result, Err(GitImportError::Clone { .. })));

        let dest = &backend.cloned_paths()[0];
        assert!(!dest.parent().unwrap().exists());
    }

    #[test]
    fn test_resolve_without_constraint_uses_branch() {
        let backend = MockBackend::new();
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "release",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        let resolved = workspace.resolve_ref("release", None).unwrap();
        assert_eq!(resolved, ResolvedRef::Branch("release".to_string()));
        assert!(!backend.calls().contains(&BackendCall::ListTags));
    }

    #[test]
    fn test_resolve_with_constraint_lists_tags() {
        let mut backend = MockBackend::new();
        backend.add_tag("v1.0.0", &["a.rb"]);
        backend.add_tag("v2.0.0", &["a.rb"]);
        let reporter = RecordingReporter::new();
        let workspace = Workspace::clone_repository(
            &backend,
            &reporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        let constraint = VersionConstraint::parse("< 2.0").unwrap();
        let resolved = workspace.resolve_ref("HEAD", Some(&constraint)).unwrap();

        assert_eq!(resolved, ResolvedRef::Tag("v1.0.0".to_string()));
        assert!(reporter
            .messages()
            .contains(&"Fetching remote git tags...".to_string()));
    }

    #[test]
    fn test_checkout_skips_missing_optional_folders() {
        let mut backend = MockBackend::new();
        backend.add_file("HEAD", "a.rb", "a");
        backend.add_file("HEAD", "helper/h.rb", "h");
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        workspace
            .checkout(&ResolvedRef::Branch("HEAD".to_string()), &ImportLayout::default())
            .unwrap();

        assert!(workspace.root().join("a.rb").exists());
        assert!(workspace.root().join("helper/h.rb").exists());
        assert!(!workspace.root().join("actions").exists());
        assert_eq!(backend.checkout_count(), 3);
    }

    #[test]
    fn test_checkout_helper_only_ref_succeeds() {
        let mut backend = MockBackend::new();
        backend.add_file("HEAD", "helper/h.rb", "h");
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        workspace
            .checkout(&ResolvedRef::Branch("HEAD".to_string()), &ImportLayout::default())
            .unwrap();
        assert!(workspace.root().join("helper/h.rb").exists());
    }

    #[test]
    fn test_checkout_without_source_files_fails() {
        let mut backend = MockBackend::new();
        backend.add_file("HEAD", "README.md", "docs");
        backend.add_file("HEAD", "helper/notes.txt", "n");
        let workspace = Workspace::clone_repository(
            &backend,
            &SilentReporter,
            "https://example.com/lanes.git",
            "HEAD",
            DEFAULT_WORKSPACE_PREFIX,
        )
        .unwrap();

        let result =
            workspace.checkout(&ResolvedRef::Branch("HEAD".to_string()), &ImportLayout::default());
        assert!(matches!(result, Err(GitImportError::Checkout { .. })));
        assert_eq!(backend.checkout_count(), 1);
    }
}

use crate::error::{GitImportError, Result};
use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{
    AutotagOption, Cred, CredentialType, FetchOptions, Pathspec, PathspecFlags, RemoteCallbacks,
    Repository,
};
use std::path::{Path, PathBuf};
use tracing::debug;

const MAX_CREDENTIAL_ATTEMPTS: usize = 4;

/// [super::GitBackend] implemented with libgit2
#[derive(Debug, Default, Clone)]
pub struct Git2Backend;

impl Git2Backend {
    pub fn new() -> Self {
        Git2Backend
    }

    /// Fetch options for `url`; depth 1 unless the remote is local
    fn fetch_options<'cb>(url: &str) -> FetchOptions<'cb> {
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());
        if !is_local_url(url) {
            fetch_options.depth(1);
        }
        fetch_options
    }
}

/// libgit2's local transport cannot do shallow fetches
fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || (!url.contains("://") && Path::new(url).exists())
}

/// Credentials callback that never prompts.
///
/// Tries SSH keys from `~/.ssh/`, then the SSH agent, then libgit2's default
/// credentials. Gives up after a few rounds so a rejected key cannot loop forever.
fn credential_callbacks<'cb>() -> RemoteCallbacks<'cb> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            for key_path in ssh_key_paths() {
                if key_path.exists() {
                    if let Ok(cred) = Cred::ssh_key(username, None, &key_path, None) {
                        return Ok(cred);
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });

    callbacks
}

fn ssh_key_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    ["id_ed25519", "id_rsa", "id_ecdsa"]
        .iter()
        .map(|name| home.join(".ssh").join(name))
        .collect()
}

impl super::GitBackend for Git2Backend {
    fn clone_shallow(&self, url: &str, branch: Option<&str>, dest: &Path) -> Result<()> {
        // Dry-run checkout: HEAD is set up but no file is written.
        let mut checkout = CheckoutBuilder::new();
        checkout.dry_run();

        let mut builder = RepoBuilder::new();
        builder
            .fetch_options(Self::fetch_options(url))
            .with_checkout(checkout);
        if let Some(branch) = branch {
            builder.branch(branch);
        }

        debug!(url, ?branch, dest = %dest.display(), "cloning with libgit2");
        builder
            .clone(url, dest)
            .map_err(|e| GitImportError::clone_failed(url, e.message()))?;

        Ok(())
    }

    fn list_tags(&self, repo_dir: &Path) -> Result<Vec<String>> {
        let repo = Repository::open(repo_dir)?;
        let mut remote = repo.find_remote("origin")?;
        let url = remote.url().unwrap_or("origin").to_string();

        let mut fetch_options = Self::fetch_options(&url);
        fetch_options.download_tags(AutotagOption::All);

        remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| {
                GitImportError::clone_failed(url, format!("failed to fetch tags: {}", e.message()))
            })?;

        let tags = repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn checkout_paths(&self, repo_dir: &Path, reference: &str, paths: &[String]) -> Result<()> {
        let repo = Repository::open(repo_dir)?;

        let tree = repo
            .revparse_single(reference)
            .and_then(|object| object.peel_to_tree())
            .map_err(|e| GitImportError::checkout_failed(reference, e.message()))?;

        // libgit2 silently checks out nothing for unmatched paths; git reports an error.
        let pathspec = Pathspec::new(paths.iter().map(String::as_str))?;
        pathspec
            .match_tree(&tree, PathspecFlags::NO_MATCH_ERROR)
            .map_err(|_| {
                GitImportError::checkout_failed(
                    reference,
                    format!("pathspec '{}' did not match any file", paths.join(" ")),
                )
            })?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        for path in paths {
            checkout.path(path.as_str());
        }

        repo.checkout_tree(tree.as_object(), Some(&mut checkout))
            .map_err(|e| GitImportError::checkout_failed(reference, e.message()))?;

        Ok(())
    }
}

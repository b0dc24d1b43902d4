use thiserror::Error;

/// Unified error type for git-import operations
#[derive(Error, Debug)]
pub enum GitImportError {
    #[error("Please pass a url to git-import")]
    MissingUrl,

    #[error("Please pass an import callback to git-import")]
    MissingConsumer,

    #[error("Invalid version constraint: {0}")]
    InvalidConstraint(String),

    #[error("No tag found matching \"{constraint}\"")]
    NoMatchingTag { constraint: String },

    #[error("Could not clone repository '{url}': {reason}")]
    Clone { url: String, reason: String },

    #[error("Ref '{reference}' has no importable files: {reason}")]
    Checkout { reference: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-import
pub type Result<T> = std::result::Result<T, GitImportError>;

/// Broad classes of failure, as seen by the caller of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, detected before any I/O happens
    Usage,
    /// No ref satisfies the requested version constraint
    Resolution,
    /// The repository could not be cloned or the ref could not be checked out
    Transport,
    /// Configuration, filesystem or library failures
    Internal,
}

impl GitImportError {
    /// Create an invalid constraint error with context
    pub fn constraint(msg: impl Into<String>) -> Self {
        GitImportError::InvalidConstraint(msg.into())
    }

    /// Create a clone error for the given url
    pub fn clone_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        GitImportError::Clone {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a checkout error for the given ref
    pub fn checkout_failed(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        GitImportError::Checkout {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitImportError::Config(msg.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GitImportError::MissingUrl
            | GitImportError::MissingConsumer
            | GitImportError::InvalidConstraint(_) => ErrorKind::Usage,
            GitImportError::NoMatchingTag { .. } => ErrorKind::Resolution,
            GitImportError::Clone { .. } | GitImportError::Checkout { .. } => ErrorKind::Transport,
            GitImportError::Config(_) | GitImportError::Git(_) | GitImportError::Io(_) => {
                ErrorKind::Internal
            }
        }
    }
}

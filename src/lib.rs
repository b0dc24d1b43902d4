pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod pipeline;
pub mod ui;
pub mod workspace;

pub use domain::{ResolvedRef, TagSelector, Version, VersionConstraint};
pub use error::{ErrorKind, GitImportError, Result};
pub use pipeline::{ImportPipeline, ImportRequest};
pub use workspace::{ImportLayout, Workspace};

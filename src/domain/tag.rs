use crate::domain::constraint::VersionConstraint;
use crate::domain::version::Version;
use crate::error::{GitImportError, Result};
use std::fmt;

/// Default ref used when no branch is given
pub const DEFAULT_BRANCH: &str = "HEAD";

/// A ref name as reported by the repository, with its version when parseable
#[derive(Debug, Clone, PartialEq)]
pub struct RefCandidate {
    pub name: String,
    pub version: Option<Version>,
}

impl RefCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = Version::from_tag(&name);
        RefCandidate { name, version }
    }
}

/// The single ref a pipeline run checks out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    /// The branch (or literal ref) the caller asked for
    Branch(String),
    /// A tag picked by [TagSelector]
    Tag(String),
}

impl ResolvedRef {
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedRef::Branch(name) | ResolvedRef::Tag(name) => name,
        }
    }
}

impl fmt::Display for ResolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks one tag out of a repository's tag list.
///
/// Selection keeps the input order: of all tags whose version satisfies the
/// constraint, the one listed *last* wins, even when an earlier one carries a
/// higher version. No sorting happens here.
pub struct TagSelector<'a> {
    constraint: &'a VersionConstraint,
}

impl<'a> TagSelector<'a> {
    pub fn new(constraint: &'a VersionConstraint) -> Self {
        TagSelector { constraint }
    }

    /// Tags that parse as versions and satisfy the constraint, in input order
    pub fn candidates<S: AsRef<str>>(&self, refs: &[S]) -> Vec<RefCandidate> {
        refs.iter()
            .map(|name| RefCandidate::new(name.as_ref()))
            .filter(|candidate| {
                candidate
                    .version
                    .as_ref()
                    .is_some_and(|version| self.constraint.matches(version))
            })
            .collect()
    }

    /// Select the last matching tag in input order.
    ///
    /// # Returns
    /// * `Ok(ResolvedRef::Tag)` - The selected tag name, unchanged
    /// * `Err(NoMatchingTag)` - If no tag satisfies the constraint
    pub fn select<S: AsRef<str>>(&self, refs: &[S]) -> Result<ResolvedRef> {
        self.candidates(refs)
            .pop()
            .map(|candidate| ResolvedRef::Tag(candidate.name))
            .ok_or_else(|| GitImportError::NoMatchingTag {
                constraint: self.constraint.expression().to_string(),
            })
    }
}

//! Domain logic - version parsing, constraints and tag selection, independent of git operations

pub mod constraint;
pub mod tag;
pub mod version;

pub use constraint::{Clause, Operator, VersionConstraint};
pub use tag::{RefCandidate, ResolvedRef, TagSelector, DEFAULT_BRANCH};
pub use version::Version;

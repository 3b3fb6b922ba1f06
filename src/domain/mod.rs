//! Domain types - pure values independent of git operations

pub mod tag;
pub mod version;

pub use tag::TagParameters;
pub use version::{BumpKind, SemanticVersion, VersionString, UNKNOWN_VERSION};

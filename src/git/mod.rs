//! Git operations abstraction layer
//!
//! The sync workflow only talks to the [VersionControl] trait, so it can run
//! against a real repository or a recording mock.
//!
//! - [repository::GitRepository]: read-only queries through `git2`, mutations
//!   through the system `git` executable
//! - [mock::MockRepository]: in-memory implementation for testing
//! - [tools]: display helpers (tag list, pretty logs, skip-worktree)

pub mod mock;
pub mod repository;
pub mod tools;

pub use mock::MockRepository;
pub use repository::GitRepository;

use std::fmt;
use std::path::Path;

use crate::error::Result;

/// A repository operation, as recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    RemoteUpdate,
    Stash,
    PullRebase,
    StashPop,
    Commit { message: Option<String> },
    Tag { name: String, message: Option<String> },
    Push,
}

impl GitOp {
    /// Whether the operation changes local or remote repository state.
    ///
    /// Refreshing remote metadata is the only non-mutating operation.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, GitOp::RemoteUpdate)
    }
}

impl fmt::Display for GitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitOp::RemoteUpdate => f.write_str("remote update"),
            GitOp::Stash => f.write_str("stash"),
            GitOp::PullRebase => f.write_str("pull --rebase"),
            GitOp::StashPop => f.write_str("stash pop"),
            GitOp::Commit { .. } => f.write_str("commit -a"),
            GitOp::Tag { name, .. } => write!(f, "tag -a {}", name),
            GitOp::Push => f.write_str("push --follow-tags"),
        }
    }
}

/// Version-control capabilities consumed by the sync workflow
///
/// Every query re-reads repository state; implementations must not cache
/// answers between calls.
///
/// ## Error Handling
///
/// - [refresh_remote](VersionControl::refresh_remote) reports failures as
///   [crate::error::GitSemverError::Connectivity]
/// - [stash_pop](VersionControl::stash_pop) and
///   [pull_rebase](VersionControl::pull_rebase) report failures as
///   [crate::error::GitSemverError::Conflict]
pub trait VersionControl: Send + Sync {
    /// The repository location every operation runs in
    fn location(&self) -> &Path;

    /// Whether tracked files have uncommitted changes (untracked files excluded)
    fn has_local_changes(&self) -> Result<bool>;

    /// Refresh remote metadata without touching the working tree
    fn refresh_remote(&self) -> Result<()>;

    /// Whether the upstream has commits that are not in local history
    fn has_remote_changes(&self) -> Result<bool>;

    /// `describe --tags --always` output, or `None` when there is no HEAD
    fn describe(&self) -> Result<Option<String>>;

    /// Create an annotated tag at HEAD
    ///
    /// With no message, git asks for one interactively.
    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()>;

    /// Set aside uncommitted changes
    fn stash(&self) -> Result<()>;

    /// Restore the most recently stashed changes
    fn stash_pop(&self) -> Result<()>;

    /// Replay local commits on top of the upstream
    fn pull_rebase(&self) -> Result<()>;

    /// Commit all tracked changes
    fn commit_all(&self, message: Option<&str>) -> Result<()>;

    /// Push commits together with any annotated tags that point at them
    fn push_follow_tags(&self) -> Result<()>;
}

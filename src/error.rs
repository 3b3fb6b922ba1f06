use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-semver operations
#[derive(Error, Debug)]
pub enum GitSemverError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Manifest error in {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("Could not reach remote for {}: {reason}", .location.display())]
    Connectivity { location: PathBuf, reason: String },

    #[error("Conflict during {operation} in {}", .location.display())]
    Conflict { location: PathBuf, operation: String },

    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },

    #[error("Hook error: {0}")]
    Hook(String),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, GitSemverError>;

impl GitSemverError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitSemverError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitSemverError::Version(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        GitSemverError::Hook(msg.into())
    }

    pub fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        GitSemverError::Manifest {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn command(command: impl Into<String>, reason: impl Into<String>) -> Self {
        GitSemverError::Command {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// True for stash-restore and rebase conflicts, which leave the
    /// repository mid-operation for manual resolution.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GitSemverError::Conflict { .. })
    }
}

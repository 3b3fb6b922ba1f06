use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{GitSemverError, Result};
use crate::git::{GitOp, VersionControl};

#[derive(Debug, Default)]
struct MockState {
    local_changes: bool,
    remote_changes: bool,
    description: Option<String>,
    /// Description HEAD will have once remote history is integrated
    remote_description: Option<String>,
    fail_refresh: bool,
    missing_upstream: bool,
    conflict_on_pop: bool,
    conflict_on_rebase: bool,
    stashes: Vec<String>,
    tags: Vec<String>,
    ops: Vec<GitOp>,
}

/// Mock repository for testing without actual git operations
///
/// Tracks just enough state to play the sync workflow forward: local and
/// remote change flags, the stash list, tags and the `describe` output. Every
/// operation is recorded in order.
pub struct MockRepository {
    location: PathBuf,
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a clean, up-to-date mock repository
    pub fn new() -> Self {
        MockRepository {
            location: PathBuf::from("mock-repo"),
            state: Mutex::new(MockState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only happens after a panicking test thread.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: GitOp) {
        self.state().ops.push(op);
    }

    pub fn set_location(&mut self, location: impl Into<PathBuf>) {
        self.location = location.into();
    }

    pub fn set_local_changes(&mut self, changed: bool) {
        self.state().local_changes = changed;
    }

    pub fn set_remote_changes(&mut self, changed: bool) {
        self.state().remote_changes = changed;
    }

    /// Set the current `describe` output
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.state().description = Some(description.into());
    }

    /// Set the `describe` output that appears after pulling remote history
    pub fn set_remote_description(&mut self, description: impl Into<String>) {
        self.state().remote_description = Some(description.into());
    }

    pub fn fail_refresh(&mut self) {
        self.state().fail_refresh = true;
    }

    pub fn remove_upstream(&mut self) {
        self.state().missing_upstream = true;
    }

    pub fn conflict_on_pop(&mut self) {
        self.state().conflict_on_pop = true;
    }

    pub fn conflict_on_rebase(&mut self) {
        self.state().conflict_on_rebase = true;
    }

    /// All recorded operations, oldest first
    pub fn operations(&self) -> Vec<GitOp> {
        self.state().ops.clone()
    }

    /// Recorded operations that change repository state
    pub fn mutations(&self) -> Vec<GitOp> {
        self.state()
            .ops
            .iter()
            .filter(|op| op.is_mutation())
            .cloned()
            .collect()
    }

    pub fn stash_list(&self) -> Vec<String> {
        self.state().stashes.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.state().tags.clone()
    }

    pub fn local_changes(&self) -> bool {
        self.state().local_changes
    }

    pub fn clear_operations(&self) {
        self.state().ops.clear();
    }

    fn conflict(&self, operation: &str) -> GitSemverError {
        GitSemverError::Conflict {
            location: self.location.clone(),
            operation: operation.to_string(),
        }
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockRepository {
    fn location(&self) -> &Path {
        &self.location
    }

    fn has_local_changes(&self) -> Result<bool> {
        Ok(self.state().local_changes)
    }

    fn refresh_remote(&self) -> Result<()> {
        self.record(GitOp::RemoteUpdate);
        if self.state().fail_refresh {
            return Err(GitSemverError::Connectivity {
                location: self.location.clone(),
                reason: "Could not resolve host: example.invalid".to_string(),
            });
        }
        Ok(())
    }

    fn has_remote_changes(&self) -> Result<bool> {
        let state = self.state();
        if state.missing_upstream {
            return Err(GitSemverError::command(
                "git log HEAD..HEAD@{u}",
                "no upstream configured for the current branch",
            ));
        }
        Ok(state.remote_changes)
    }

    fn describe(&self) -> Result<Option<String>> {
        Ok(self.state().description.clone())
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        self.record(GitOp::Tag {
            name: name.to_string(),
            message: message.map(str::to_string),
        });
        let mut state = self.state();
        state.tags.push(name.to_string());
        state.description = Some(name.to_string());
        Ok(())
    }

    fn stash(&self) -> Result<()> {
        self.record(GitOp::Stash);
        let mut state = self.state();
        if state.local_changes {
            let entry = format!("stash@{{{}}}: WIP on main", state.stashes.len());
            state.stashes.push(entry);
            state.local_changes = false;
        }
        Ok(())
    }

    fn stash_pop(&self) -> Result<()> {
        self.record(GitOp::StashPop);
        let mut state = self.state();
        if state.stashes.is_empty() {
            return Err(GitSemverError::command("git stash pop", "No stash entries found."));
        }
        // git keeps the entry when the pop conflicts
        state.local_changes = true;
        if state.conflict_on_pop {
            drop(state);
            return Err(self.conflict("stash pop"));
        }
        state.stashes.pop();
        Ok(())
    }

    fn pull_rebase(&self) -> Result<()> {
        self.record(GitOp::PullRebase);
        let mut state = self.state();
        if state.conflict_on_rebase {
            drop(state);
            return Err(self.conflict("pull --rebase"));
        }
        state.remote_changes = false;
        if let Some(description) = state.remote_description.take() {
            state.description = Some(description);
        }
        Ok(())
    }

    fn commit_all(&self, message: Option<&str>) -> Result<()> {
        self.record(GitOp::Commit {
            message: message.map(str::to_string),
        });
        self.state().local_changes = false;
        Ok(())
    }

    fn push_follow_tags(&self) -> Result<()> {
        self.record(GitOp::Push);
        Ok(())
    }
}

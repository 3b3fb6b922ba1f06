use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use git2::{Branch, DescribeFormatOptions, DescribeOptions, Repository as Git2Repo, StatusOptions};
use tracing::debug;

use crate::error::{GitSemverError, Result};

/// A git working tree at an explicit location
///
/// Queries open the repository through `git2` on every call so answers always
/// reflect the current state. Mutations run the system `git` executable with
/// `-C <location>` and inherited stdio, which lets credential helpers and the
/// commit editor work as they do on the command line.
pub struct GitRepository {
    location: PathBuf,
}

impl GitRepository {
    /// Bind to the repository containing `location`
    pub fn open<P: AsRef<Path>>(location: P) -> Result<Self> {
        let location = location.as_ref().to_path_buf();
        Git2Repo::discover(&location)?;

        Ok(GitRepository { location })
    }

    fn repo(&self) -> Result<Git2Repo> {
        Ok(Git2Repo::discover(&self.location)?)
    }

    /// A `git` command rooted at the repository location
    pub(crate) fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.location);
        cmd
    }

    /// Run a git command with its output streamed to the console.
    pub(crate) fn run_to_console(&self, args: &[&str]) -> Result<()> {
        let command = describe_command(args);
        debug!(location = %self.location.display(), %command, "running");

        let status = self
            .git()
            .args(args)
            .status()
            .map_err(|e| GitSemverError::command(&command, e.to_string()))?;

        if !status.success() {
            return Err(GitSemverError::command(command, status.to_string()));
        }
        Ok(())
    }

    /// Run a git command and capture its output.
    pub(crate) fn run_captured(&self, args: &[&str]) -> Result<Output> {
        let command = describe_command(args);
        debug!(location = %self.location.display(), %command, "running quietly");

        let output = self
            .git()
            .args(args)
            .output()
            .map_err(|e| GitSemverError::command(&command, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitSemverError::command(command, stderr.trim().to_string()));
        }
        Ok(output)
    }

    fn conflict(&self, operation: &str, source: GitSemverError) -> GitSemverError {
        debug!(error = %source, operation, "treating failure as a conflict");
        GitSemverError::Conflict {
            location: self.location.clone(),
            operation: operation.to_string(),
        }
    }
}

fn describe_command(args: &[&str]) -> String {
    format!("git {}", args.join(" "))
}

fn with_message<'a>(mut args: Vec<&'a str>, message: Option<&'a str>) -> Vec<&'a str> {
    if let Some(message) = message {
        args.push("-m");
        args.push(message);
    }
    args
}

impl super::VersionControl for GitRepository {
    fn location(&self) -> &Path {
        &self.location
    }

    fn has_local_changes(&self) -> Result<bool> {
        let repo = self.repo()?;
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = repo.statuses(Some(&mut options))?;
        Ok(!statuses.is_empty())
    }

    fn refresh_remote(&self) -> Result<()> {
        self.run_captured(&["remote", "update"])
            .map(|_| ())
            .map_err(|e| GitSemverError::Connectivity {
                location: self.location.clone(),
                reason: match e {
                    GitSemverError::Command { reason, .. } => reason,
                    other => other.to_string(),
                },
            })
    }

    fn has_remote_changes(&self) -> Result<bool> {
        let repo = self.repo()?;
        let head = repo.head()?;
        let local = head
            .target()
            .ok_or_else(|| GitSemverError::command("git log HEAD..HEAD@{u}", "HEAD has no target"))?;

        let branch = Branch::wrap(head);
        let upstream = branch.upstream()?;
        let remote = upstream.get().target().ok_or_else(|| {
            GitSemverError::command("git log HEAD..HEAD@{u}", "upstream has no target")
        })?;

        let (_ahead, behind) = repo.graph_ahead_behind(local, remote)?;
        Ok(behind > 0)
    }

    fn describe(&self) -> Result<Option<String>> {
        let repo = self.repo()?;
        let mut options = DescribeOptions::new();
        options.describe_tags().show_commit_oid_as_fallback(true);

        let description = match repo.describe(&options) {
            Ok(description) => description,
            Err(e) => {
                debug!(error = %e, "describe failed");
                return Ok(None);
            }
        };
        let formatted = description.format(Some(&DescribeFormatOptions::new()))?;
        Ok(Some(formatted.trim().to_string()))
    }

    fn create_tag(&self, name: &str, message: Option<&str>) -> Result<()> {
        let mut args = with_message(vec!["tag", "-a"], message);
        args.push(name);
        self.run_to_console(&args)
    }

    fn stash(&self) -> Result<()> {
        self.run_to_console(&["stash"])
    }

    fn stash_pop(&self) -> Result<()> {
        self.run_to_console(&["stash", "pop"])
            .map_err(|e| self.conflict("stash pop", e))
    }

    fn pull_rebase(&self) -> Result<()> {
        self.run_to_console(&["pull", "--rebase"])
            .map_err(|e| self.conflict("pull --rebase", e))
    }

    fn commit_all(&self, message: Option<&str>) -> Result<()> {
        self.run_to_console(&with_message(vec!["commit", "-a"], message))
    }

    fn push_follow_tags(&self) -> Result<()> {
        self.run_to_console(&["push", "--follow-tags"])
    }
}

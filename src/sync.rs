//! The sync workflow: integrate remote history, then version, commit, tag and push
//!
//! A sync inspects the repository, decides what needs to happen, and runs the
//! repository operations in a fixed order:
//!
//! 1. probe local changes, refresh the remote, probe remote changes
//! 2. nothing to do: stop
//! 3. both sides changed: stash, pull --rebase, stash pop
//! 4. only the remote changed: pull --rebase
//! 5. pull-only: stop
//! 6. local changes: compute the next version, stamp it, commit, tag
//! 7. push with tags
//!
//! The next version is only computed after step 3/4, since the pull may bring
//! in newer version tags. Failures are not rolled back; the repository is left
//! as is for manual resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::boundary::BoundaryWarning;
use crate::domain::{TagParameters, VersionString};
use crate::error::{GitSemverError, Result};
use crate::git::{GitRepository, VersionControl};
use crate::stamp::StampCallback;
use crate::version;

/// Snapshot of what changed on each side, recomputed for every sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryState {
    pub has_local_changes: bool,
    pub has_remote_changes: bool,
}

impl RepositoryState {
    pub fn is_clean(&self) -> bool {
        !self.has_local_changes && !self.has_remote_changes
    }

    pub fn direction(&self, pull_only: bool) -> SyncDirection {
        let outgoing = self.has_local_changes && !pull_only;
        match (outgoing, self.has_remote_changes) {
            (true, true) => SyncDirection::Both,
            (true, false) => SyncDirection::Outgoing,
            (false, true) => SyncDirection::Incoming,
            (false, false) => SyncDirection::Idle,
        }
    }
}

/// Which way changes flow during a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    Both,
    Outgoing,
    Incoming,
    /// Local changes held back by a pull-only sync
    Idle,
}

impl SyncDirection {
    pub fn symbol(&self) -> &'static str {
        match self {
            SyncDirection::Both => "<=>",
            SyncDirection::Outgoing => ">>>",
            SyncDirection::Incoming => "<<<",
            SyncDirection::Idle => "---",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The tag created when a repository has no version tag yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitialTag {
    pub name: String,
    pub message: String,
}

impl Default for InitialTag {
    fn default() -> Self {
        InitialTag {
            name: "0.0.0".to_string(),
            message: "git-semver auto-created initial tag".to_string(),
        }
    }
}

/// Describe the repository, creating the initial tag if nothing describes as a version
///
/// Returns `None` when no version can be described even after tagging,
/// typically because the repository has no commits yet.
pub fn describe_or_initialize<V: VersionControl + ?Sized>(
    vc: &V,
    initial: &InitialTag,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<Option<String>> {
    let description = vc.describe()?;
    if version::is_valid(description.as_deref()) {
        return Ok(description);
    }

    warn!(
        location = %vc.location().display(),
        ?description,
        tag = %initial.name,
        "no version tag found"
    );
    warnings.push(BoundaryWarning::NoVersionTag {
        description,
        initial_tag: initial.name.clone(),
    });

    if let Err(e) = vc.create_tag(&initial.name, Some(&initial.message)) {
        warn!(error = %e, "initial tag could not be created");
        warnings.push(BoundaryWarning::InitialTagFailed {
            initial_tag: initial.name.clone(),
            reason: e.to_string(),
        });
        return Ok(None);
    }

    let description = vc.describe()?;
    Ok(description.filter(|d| version::is_valid(Some(d))))
}

/// Why a sync stopped
#[derive(Debug)]
pub enum SyncFailure {
    /// The repository state could not be probed
    Unreachable {
        location: PathBuf,
        source: GitSemverError,
    },
    /// The sync started changing the repository and then failed
    Incomplete {
        location: PathBuf,
        source: GitSemverError,
    },
}

impl SyncFailure {
    pub fn source(&self) -> &GitSemverError {
        match self {
            SyncFailure::Unreachable { source, .. } | SyncFailure::Incomplete { source, .. } => {
                source
            }
        }
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncFailure::Unreachable { location, .. } => write!(
                f,
                "[{}] WARNING: git-semver could not connect to this repo...",
                location.display()
            ),
            SyncFailure::Incomplete { location, .. } => write!(
                f,
                "[{}] WARNING: git-semver did not complete, check repo for conflicts...",
                location.display()
            ),
        }
    }
}

/// How a sync ended
#[derive(Debug)]
pub enum SyncOutcome {
    /// Nothing changed on either side; no operations were run
    UpToDate,
    /// A pull-only sync finished integrating remote changes
    Pulled,
    /// Everything was pushed
    Pushed {
        committed: bool,
        tagged: Option<String>,
    },
    Failed(SyncFailure),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SyncOutcome::Failed(_))
    }
}

/// The result of one sync, with everything worth showing the user
#[derive(Debug)]
pub struct SyncReport {
    pub location: PathBuf,
    /// Set once the probe completed and there was something to do
    pub direction: Option<SyncDirection>,
    pub outcome: SyncOutcome,
    pub warnings: Vec<BoundaryWarning>,
}

impl SyncReport {
    /// A sync that never got to talk to the repository
    pub fn unreachable(location: &Path, source: GitSemverError) -> Self {
        SyncReport {
            location: location.to_path_buf(),
            direction: None,
            outcome: SyncOutcome::Failed(SyncFailure::Unreachable {
                location: location.to_path_buf(),
                source,
            }),
            warnings: Vec::new(),
        }
    }

    /// `0` on success, `-1` on failure
    pub fn exit_code(&self) -> i32 {
        if self.outcome.is_success() {
            0
        } else {
            -1
        }
    }

    /// Whether local changes were committed and pushed
    pub fn published(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Pushed { committed: true, .. })
    }

    /// The version tag created by this sync, if any
    pub fn tag(&self) -> Option<&str> {
        match &self.outcome {
            SyncOutcome::Pushed { tagged, .. } => tagged.as_deref(),
            _ => None,
        }
    }
}

/// Drives one sync against a version-control backend
pub struct SyncOrchestrator<'a, V: VersionControl + ?Sized> {
    vc: &'a V,
    initial_tag: InitialTag,
    on_direction: Option<fn(SyncDirection, &Path)>,
}

impl<'a, V: VersionControl + ?Sized> SyncOrchestrator<'a, V> {
    pub fn new(vc: &'a V) -> Self {
        SyncOrchestrator {
            vc,
            initial_tag: InitialTag::default(),
            on_direction: None,
        }
    }

    pub fn with_initial_tag(mut self, initial_tag: InitialTag) -> Self {
        self.initial_tag = initial_tag;
        self
    }

    /// Called once the probe found something to do, before any mutation
    pub fn on_direction(mut self, notify: fn(SyncDirection, &Path)) -> Self {
        self.on_direction = Some(notify);
        self
    }

    /// Run the sync; errors are reported in the returned [SyncReport], never raised
    pub fn run(
        &self,
        params: &TagParameters,
        stamp: Option<&mut dyn StampCallback>,
    ) -> SyncReport {
        let location = self.vc.location().to_path_buf();
        let mut report = SyncReport {
            location: location.clone(),
            direction: None,
            outcome: SyncOutcome::UpToDate,
            warnings: Vec::new(),
        };

        match self.execute(params, stamp, &mut report) {
            Ok(outcome) => report.outcome = outcome,
            Err(source) => {
                error!(location = %location.display(), error = %source, "sync failed");
                let failure = if report.direction.is_none() {
                    SyncFailure::Unreachable { location, source }
                } else {
                    SyncFailure::Incomplete { location, source }
                };
                report.outcome = SyncOutcome::Failed(failure);
            }
        }
        report
    }

    fn probe(&self) -> Result<RepositoryState> {
        let has_local_changes = self.vc.has_local_changes()?;
        self.vc.refresh_remote()?;
        let has_remote_changes = self.vc.has_remote_changes()?;
        Ok(RepositoryState {
            has_local_changes,
            has_remote_changes,
        })
    }

    fn execute(
        &self,
        params: &TagParameters,
        stamp: Option<&mut dyn StampCallback>,
        report: &mut SyncReport,
    ) -> Result<SyncOutcome> {
        let state = self.probe()?;
        if state.is_clean() {
            info!(location = %report.location.display(), "up to date");
            return Ok(SyncOutcome::UpToDate);
        }

        let direction = state.direction(params.pull_only);
        report.direction = Some(direction);
        if let Some(notify) = self.on_direction {
            notify(direction, &report.location);
        }
        info!(
            location = %report.location.display(),
            %direction,
            bump = %params.bump,
            "syncing"
        );

        let both = state.has_local_changes && state.has_remote_changes;
        if both {
            self.vc.stash()?;
        }
        if state.has_remote_changes {
            self.vc.pull_rebase()?;
        }
        if both {
            self.vc.stash_pop()?;
        }

        if params.pull_only {
            return Ok(SyncOutcome::Pulled);
        }

        let mut tagged = None;
        if state.has_local_changes {
            let message = params.message();
            if params.notag {
                self.vc.commit_all(message)?;
            } else {
                let next = self.next_version(params, &mut report.warnings)?;
                let authoritative = match stamp {
                    Some(callback) => callback.stamp(None, &next)?,
                    None => next,
                };
                info!(version = %authoritative, "tagging");

                self.vc.commit_all(message)?;
                self.vc.create_tag(&authoritative, message)?;
                tagged = Some(authoritative);
            }
        }

        self.vc.push_follow_tags()?;
        Ok(SyncOutcome::Pushed {
            committed: state.has_local_changes,
            tagged,
        })
    }

    fn next_version(
        &self,
        params: &TagParameters,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<String> {
        let description = describe_or_initialize(self.vc, &self.initial_tag, warnings)?;
        let next = description
            .map(|d| version::compute_next_version(params.bump, &d))
            .unwrap_or(VersionString::Unknown);

        match next {
            VersionString::Valid(v) => Ok(v.to_string()),
            VersionString::Unknown => Err(GitSemverError::version(
                "Can't determine 'next' version of current tag",
            )),
        }
    }
}

/// Sync the repository at `location`
pub fn sync_location(
    location: &Path,
    params: &TagParameters,
    stamp: Option<&mut dyn StampCallback>,
    initial_tag: InitialTag,
) -> SyncReport {
    match GitRepository::open(location) {
        Ok(repo) => SyncOrchestrator::new(&repo)
            .with_initial_tag(initial_tag)
            .run(params, stamp),
        Err(source) => {
            error!(location = %location.display(), error = %source, "not a repository");
            SyncReport::unreachable(location, source)
        }
    }
}

/// Sync `location` and return `0` on success or `-1` on failure
pub fn run_sync(
    location: &Path,
    params: TagParameters,
    stamp: Option<&mut dyn StampCallback>,
) -> i32 {
    sync_location(location, &params, stamp, InitialTag::default()).exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BumpKind;
    use crate::git::{GitOp, MockRepository};

    #[test]
    fn test_direction_symbols() {
        let both = RepositoryState {
            has_local_changes: true,
            has_remote_changes: true,
        };
        assert_eq!(both.direction(false).symbol(), "<=>");
        assert_eq!(both.direction(true).symbol(), "<<<");

        let local = RepositoryState {
            has_local_changes: true,
            has_remote_changes: false,
        };
        assert_eq!(local.direction(false), SyncDirection::Outgoing);
        assert_eq!(local.direction(true), SyncDirection::Idle);
        assert!(!local.is_clean());
    }

    #[test]
    fn test_describe_or_initialize_keeps_valid_description() {
        let mut repo = MockRepository::new();
        repo.set_description("1.4.2-3-gabc1234");
        let mut warnings = Vec::new();

        let description =
            describe_or_initialize(&repo, &InitialTag::default(), &mut warnings).unwrap();
        assert_eq!(description.as_deref(), Some("1.4.2-3-gabc1234"));
        assert!(warnings.is_empty());
        assert!(repo.tags().is_empty());
    }

    #[test]
    fn test_describe_or_initialize_creates_initial_tag() {
        let mut repo = MockRepository::new();
        repo.set_description("abc1234");
        let mut warnings = Vec::new();

        let description =
            describe_or_initialize(&repo, &InitialTag::default(), &mut warnings).unwrap();
        assert_eq!(description.as_deref(), Some("0.0.0"));
        assert_eq!(repo.tags(), vec!["0.0.0".to_string()]);
        assert!(matches!(
            warnings.as_slice(),
            [BoundaryWarning::NoVersionTag { .. }]
        ));
    }

    #[test]
    fn test_probe_failure_is_unreachable() {
        let mut repo = MockRepository::new();
        repo.set_local_changes(true);
        repo.fail_refresh();

        let report = SyncOrchestrator::new(&repo).run(&TagParameters::default(), None);
        assert!(matches!(
            report.outcome,
            SyncOutcome::Failed(SyncFailure::Unreachable { .. })
        ));
        assert_eq!(report.exit_code(), -1);
        assert!(report.direction.is_none());
        assert!(repo.mutations().is_empty());
    }

    #[test]
    fn test_local_only_without_callback_tags_next_patch() {
        let mut repo = MockRepository::new();
        repo.set_local_changes(true);
        repo.set_description("0.3.9");

        let params = TagParameters::new(BumpKind::Patch, ["tweak"]);
        let report = SyncOrchestrator::new(&repo).run(&params, None);

        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.direction, Some(SyncDirection::Outgoing));
        assert_eq!(report.tag(), Some("0.3.10"));
        assert!(report.published());
        assert_eq!(
            repo.mutations(),
            vec![
                GitOp::Commit {
                    message: Some("tweak".to_string())
                },
                GitOp::Tag {
                    name: "0.3.10".to_string(),
                    message: Some("tweak".to_string())
                },
                GitOp::Push,
            ]
        );
    }

    #[test]
    fn test_failure_after_probe_is_incomplete() {
        let mut repo = MockRepository::new();
        repo.set_local_changes(true);
        repo.set_remote_changes(true);
        repo.conflict_on_rebase();

        let report = SyncOrchestrator::new(&repo).run(&TagParameters::default(), None);
        match &report.outcome {
            SyncOutcome::Failed(failure @ SyncFailure::Incomplete { .. }) => {
                assert!(failure.source().is_conflict());
                assert!(failure.to_string().contains("did not complete"));
            }
            other => panic!("expected incomplete sync, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_messages_name_location() {
        let failure = SyncFailure::Unreachable {
            location: PathBuf::from("../app"),
            source: GitSemverError::command("git remote update", "exit status: 1"),
        };
        assert_eq!(
            failure.to_string(),
            "[../app] WARNING: git-semver could not connect to this repo..."
        );
    }

    #[test]
    fn test_run_sync_outside_repository_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        if git2::Repository::discover(dir.path()).is_ok() {
            return;
        }
        let code = run_sync(dir.path(), TagParameters::default(), None);
        assert_eq!(code, -1);
    }
}

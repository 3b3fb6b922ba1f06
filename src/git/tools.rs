//! Everyday git views that sit next to the sync workflow: version-sorted tag
//! listing, a width-aware one-line log, branch topology, and skip-worktree
//! toggles.

use std::cmp::Reverse;

use crate::domain::SemanticVersion;
use crate::error::{GitSemverError, Result};
use crate::git::GitRepository;

/// Annotated tags with the first line of their message, newest version first.
pub fn tag_list(repo: &GitRepository, count: usize) -> Result<Vec<String>> {
    let output = repo.run_captured(&["tag", "-n"])?;
    Ok(sort_tag_lines(&String::from_utf8_lossy(&output.stdout), count))
}

/// Sort `git tag -n` lines by version, descending, keeping at most `count`.
///
/// Tags that are not versions sort after every version tag.
pub fn sort_tag_lines(raw: &str, count: usize) -> Vec<String> {
    let mut lines: Vec<&str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
    lines.sort_by_key(|line| {
        let name = line.split_whitespace().next().unwrap_or("");
        let version = SemanticVersion::parse(name).map(|v| v.precedence());
        Reverse((version, name.to_string()))
    });
    lines.into_iter().take(count).map(str::to_string).collect()
}

/// Column widths for the one-line log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLayout {
    pub hash: usize,
    pub time: usize,
    pub tag: usize,
    pub who: usize,
    pub message: usize,
}

impl LogLayout {
    /// Abbreviated hashes grow with history size; 9 leaves some headroom.
    pub const HASH_WIDTH: usize = 9;
    const NARROW_BELOW: usize = 70;

    /// Fit the columns into a terminal `width` characters wide.
    pub fn for_width(width: usize) -> Result<Self> {
        let columns = width.saturating_sub(2);
        let (time, tag, who) = if columns < Self::NARROW_BELOW {
            (6, 6, 6)
        } else {
            (12, 13, 28)
        };

        let message = columns
            .checked_sub(Self::HASH_WIDTH + time + tag + who + 3)
            .filter(|m| *m >= 1)
            .ok_or_else(|| {
                GitSemverError::config(format!("Can't fit log into {} columns", width))
            })?;

        Ok(LogLayout {
            hash: Self::HASH_WIDTH,
            time,
            tag,
            who,
            message,
        })
    }

    /// `--pretty` format string for `git log`
    pub fn pretty_format(&self) -> String {
        format!(
            "%>({},trunc)%h %C(auto,blue)%>({},trunc)%ad %C(auto,reset)%<({},trunc)%s \
             %C(auto,red)%>({},trunc)%D %C(auto,white)%>({},trunc)%an",
            self.hash, self.time, self.message, self.tag, self.who
        )
    }
}

/// Arguments for the pretty one-line log.
pub fn log_args(layout: &LogLayout, branch: Option<&str>, count: usize) -> Vec<String> {
    let mut args = vec!["log".to_string()];
    if let Some(branch) = branch.filter(|b| !b.is_empty()) {
        args.push(branch.to_string());
    }
    args.push(format!("--pretty={}", layout.pretty_format()));
    args.push("--date=relative".to_string());
    args.push(format!("-{}", count));
    args
}

pub fn log(repo: &GitRepository, layout: &LogLayout, branch: Option<&str>, count: usize) -> Result<()> {
    let args = log_args(layout, branch, count);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    repo.run_to_console(&refs)
}

/// Which history the branch log shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchLogOptions {
    pub branch: Option<String>,
    pub all: bool,
    /// Show every commit instead of only decorated ones
    pub with_commits: bool,
}

pub fn branchlog_args(options: &BranchLogOptions) -> Vec<String> {
    let mut args: Vec<String> = ["log", "--graph", "--oneline"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    if !options.with_commits {
        args.push("--simplify-by-decoration".to_string());
    }

    if options.all {
        args.push("--all".to_string());
    } else if let Some(branch) = options.branch.as_deref().filter(|b| !b.is_empty()) {
        args.push(branch.to_string());
    }
    args
}

pub fn branchlog(repo: &GitRepository, options: &BranchLogOptions) -> Result<()> {
    let args = branchlog_args(options);
    let refs: Vec<&str> = args.iter().map(String::as_str).collect();
    repo.run_to_console(&refs)
}

/// Start ignoring upstream and local changes to `file`.
pub fn skip(repo: &GitRepository, file: &str) -> Result<()> {
    repo.run_to_console(&["update-index", "--skip-worktree", file])
}

/// Stop ignoring upstream and local changes to `file`.
pub fn noskip(repo: &GitRepository, file: &str) -> Result<()> {
    repo.run_to_console(&["update-index", "--no-skip-worktree", file])
}

/// Files currently marked skip-worktree.
pub fn skiplist(repo: &GitRepository) -> Result<Vec<String>> {
    let output = repo.run_captured(&["ls-files", "-v", "."])?;
    Ok(skipped_files(&String::from_utf8_lossy(&output.stdout)))
}

/// Pick the skip-worktree entries (tag `S`) out of `git ls-files -v` output.
pub fn skipped_files(ls_files: &str) -> Vec<String> {
    ls_files
        .lines()
        .filter_map(|line| line.strip_prefix("S "))
        .map(str::to_string)
        .collect()
}

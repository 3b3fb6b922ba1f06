//! Command-line surface
//!
//! The clap grammar lives here; [orchestration] maps each command onto the
//! library and decides the process exit code.

pub mod orchestration;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{BumpKind, TagParameters};

#[derive(Parser, Debug)]
#[command(
    name = "git-semver",
    version,
    about = "Tag every push with the next semantic version"
)]
pub struct Cli {
    #[arg(
        short = 'C',
        long,
        default_value = ".",
        help = "Repository location to operate on"
    )]
    pub location: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Log every git command")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull, then commit, tag with the next version, and push
    Sync(SyncArgs),

    /// Print the current version description
    Version {
        #[arg(long, help = "Print only MAJOR.MINOR.PATCH")]
        clean: bool,
    },

    /// Print the next version of the given kind
    Next {
        #[arg(value_enum)]
        kind: NextKind,
    },

    /// Print the version that is safe to publish given the manifest
    AdjustedVersion {
        version: String,

        #[arg(long, help = "Manifest to reconcile against")]
        manifest: Option<PathBuf>,
    },

    /// Write a version into the manifest
    Stamp {
        version: String,

        #[arg(long, help = "Manifest to write")]
        manifest: Option<PathBuf>,
    },

    /// List version tags, newest first
    Tags { count: Option<usize> },

    /// One-line log sized to the terminal
    Log {
        #[arg(short, long, help = "Branch to show")]
        branch: Option<String>,

        count: Option<usize>,
    },

    /// Branch topology
    Branchlog {
        #[arg(short, long, conflicts_with = "all", help = "Branch to show")]
        branch: Option<String>,

        #[arg(short, long, help = "Show every branch")]
        all: bool,

        #[arg(short = 'c', long, help = "Show every commit, not just decorated ones")]
        with_commits: bool,
    },

    /// Ignore local and upstream changes to a tracked file
    Skip { file: String },

    /// Stop ignoring changes to a tracked file
    Noskip { file: String },

    /// List files marked skip-worktree
    Skiplist,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct SyncArgs {
    #[arg(short = 'j', long, help = "Bump the major version")]
    pub major: bool,

    #[arg(short = 'n', long, conflicts_with = "major", help = "Bump the minor version")]
    pub minor: bool,

    #[arg(long, conflicts_with_all = ["major", "minor"], help = "Bump the patch version (default)")]
    pub patch: bool,

    #[arg(short, long, help = "Only integrate remote changes")]
    pub pull_only: bool,

    #[arg(long, help = "Commit and push without tagging")]
    pub notag: bool,

    #[arg(short, long)]
    pub branch: Option<String>,

    #[arg(long, help = "Manifest to stamp with the new version")]
    pub manifest: Option<PathBuf>,

    /// Commit and tag message; git opens an editor when empty
    pub message: Vec<String>,
}

impl From<SyncArgs> for TagParameters {
    fn from(args: SyncArgs) -> Self {
        // An explicit --patch wins over the other bump flags.
        let bump = if args.patch {
            BumpKind::Patch
        } else {
            BumpKind::from_flags(args.major, args.minor)
        };
        let params = TagParameters::new(bump, args.message)
            .with_branch(args.branch)
            .pull_only(args.pull_only);
        if args.notag {
            params.without_tag()
        } else {
            params
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextKind {
    Major,
    Minor,
    Patch,
    Build,
}

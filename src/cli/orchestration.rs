//! Command dispatch
//!
//! Each command loads the configuration for its location, calls into the
//! library, prints the result, and returns the process exit code. Library
//! errors propagate as `anyhow` errors and are printed by `main`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::{Cli, Command, NextKind, SyncArgs};
use crate::config::{self, Config};
use crate::domain::{TagParameters, VersionString, UNKNOWN_VERSION};
use crate::git::tools::{self, BranchLogOptions, LogLayout};
use crate::git::GitRepository;
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::manifest;
use crate::stamp::{self, ManifestStamper, StampCallback};
use crate::sync::{describe_or_initialize, InitialTag, SyncOrchestrator, SyncOutcome, SyncReport};
use crate::ui;
use crate::version;

/// Manifest used when neither the command line nor the configuration names one
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Run the parsed command line and return the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    let config = config::load_config(cli.config.as_deref(), &cli.location)?;
    let location = cli.location.as_path();
    debug!(location = %location.display(), "loaded configuration");

    match cli.command {
        Command::Sync(args) => Ok(run_sync_command(location, &config, args)),
        Command::Version { clean } => show_version(location, &config, clean),
        Command::Next { kind } => show_next(location, &config, kind),
        Command::AdjustedVersion { version, manifest } => {
            let path = resolve_manifest(location, &config, manifest.as_deref());
            let adjusted = manifest::adjusted_version(&version, &path)?;
            println!("{}", adjusted);
            Ok(0)
        }
        Command::Stamp { version, manifest } => {
            let path = resolve_manifest(location, &config, manifest.as_deref());
            ui::display_status(&format!("Stamping {} into {}", version, path.display()));
            stamp::stamp_version(&path, &version, location, &config.hooks.post_stamp)?;
            ui::display_success(&format!("Stamped {} into {}", version, path.display()));
            Ok(0)
        }
        Command::Tags { count } => {
            let repo = GitRepository::open(location)?;
            let count = count.unwrap_or(config.display.tag_count);
            ui::display_lines(tools::tag_list(&repo, count)?);
            Ok(0)
        }
        Command::Log { branch, count } => {
            let repo = GitRepository::open(location)?;
            let (rows, columns) = ui::terminal_size();
            let layout = LogLayout::for_width(columns)?;
            let count = count
                .or(config.display.log_count)
                .unwrap_or_else(|| rows.saturating_sub(2).max(1));
            tools::log(&repo, &layout, branch.as_deref(), count)?;
            Ok(0)
        }
        Command::Branchlog {
            branch,
            all,
            with_commits,
        } => {
            let repo = GitRepository::open(location)?;
            let options = BranchLogOptions {
                branch,
                all,
                with_commits,
            };
            tools::branchlog(&repo, &options)?;
            Ok(0)
        }
        Command::Skip { file } => {
            let repo = GitRepository::open(location)?;
            tools::skip(&repo, &file)?;
            Ok(0)
        }
        Command::Noskip { file } => {
            let repo = GitRepository::open(location)?;
            tools::noskip(&repo, &file)?;
            Ok(0)
        }
        Command::Skiplist => {
            let repo = GitRepository::open(location)?;
            ui::display_lines(tools::skiplist(&repo)?);
            Ok(0)
        }
    }
}

/// The manifest a command works on: explicit path, configured path, then
/// `package.json` in the location.
pub fn resolve_manifest(location: &Path, config: &Config, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.manifest_path(location))
        .unwrap_or_else(|| location.join(DEFAULT_MANIFEST))
}

fn initial_tag(config: &Config) -> InitialTag {
    InitialTag {
        name: config.initial_tag.clone(),
        message: config.initial_tag_message.clone(),
    }
}

fn banner(direction: crate::sync::SyncDirection, location: &Path) {
    ui::display_sync_banner(direction, &location.display().to_string());
}

fn run_sync_command(location: &Path, config: &Config, args: SyncArgs) -> i32 {
    // The sync stamps a manifest only when one is asked for.
    let manifest = args
        .manifest
        .clone()
        .or_else(|| config.manifest_path(location));
    let mut stamper = manifest.map(|path| {
        ManifestStamper::new(path, location).with_post_stamp(config.hooks.post_stamp.clone())
    });

    let params = TagParameters::from(args);
    let report = match GitRepository::open(location) {
        Ok(repo) => SyncOrchestrator::new(&repo)
            .with_initial_tag(initial_tag(config))
            .on_direction(banner)
            .run(
                &params,
                stamper.as_mut().map(|s| s as &mut dyn StampCallback),
            ),
        Err(source) => SyncReport::unreachable(location, source),
    };

    for warning in report
        .warnings
        .iter()
        .chain(stamper.iter().flat_map(|s| s.warnings()))
    {
        ui::display_boundary_warning(warning);
    }

    match &report.outcome {
        SyncOutcome::Failed(failure) => {
            ui::display_sync_failure(failure);
            return 1;
        }
        SyncOutcome::UpToDate => {}
        SyncOutcome::Pulled => ui::display_success("Pulled remote changes"),
        SyncOutcome::Pushed { tagged, .. } => match tagged {
            Some(tag) => ui::display_success(&format!("Tagged and pushed {}", tag)),
            None => ui::display_success("Pushed"),
        },
    }

    if report.published() && !config.hooks.post_sync.is_empty() {
        let context = HookContext::new(
            HookType::PostSync,
            location,
            report.tag().map(str::to_string),
        );
        for warning in HookExecutor::execute_permissive(&config.hooks.post_sync, &context) {
            ui::display_boundary_warning(&warning);
        }
    }
    0
}

fn current_description(location: &Path, config: &Config) -> Result<Option<String>> {
    let repo = GitRepository::open(location)
        .with_context(|| format!("{} is not a git repository", location.display()))?;
    let mut warnings = Vec::new();
    let description = describe_or_initialize(&repo, &initial_tag(config), &mut warnings)?;
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
    Ok(description)
}

fn show_version(location: &Path, config: &Config, clean: bool) -> Result<i32> {
    match current_description(location, config)? {
        Some(description) if clean => println!("{}", version::clean(&description)),
        Some(description) => println!("{}", description),
        None => {
            println!("{}", UNKNOWN_VERSION);
            return Ok(1);
        }
    }
    Ok(0)
}

fn show_next(location: &Path, config: &Config, kind: NextKind) -> Result<i32> {
    let next = match current_description(location, config)? {
        Some(description) => next_of_kind(kind, &description),
        None => VersionString::Unknown,
    };
    println!("{}", next);
    Ok(if next.is_unknown() { 1 } else { 0 })
}

/// The next version of `kind` after `description`
pub fn next_of_kind(kind: NextKind, description: &str) -> VersionString {
    match kind {
        NextKind::Major => version::next_major(description),
        NextKind::Minor => version::next_minor(description),
        NextKind::Patch => version::next_patch(description),
        NextKind::Build => version::next_build(description),
    }
}

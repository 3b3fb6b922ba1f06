use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use git_semver::cli::{orchestration, Cli};
use git_semver::ui;

/// Environment variable holding a `tracing` filter, e.g. `GIT_SEMVER_LOG=debug`
const LOG_ENV: &str = "GIT_SEMVER_LOG";

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match orchestration::run(cli) {
        Ok(code) => code,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            1
        }
    };
    std::process::exit(code);
}

pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hooks;
pub mod manifest;
pub mod reconcile;
pub mod stamp;
pub mod sync;
pub mod ui;
pub mod version;

pub use error::{GitSemverError, Result};
pub use reconcile::reconcile as reconcile_version;
pub use stamp::StampCallback;
pub use sync::run_sync;
pub use version::compute_next_version;

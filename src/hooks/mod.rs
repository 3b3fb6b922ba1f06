//! Hooks for project-specific steps around a sync
//!
//! Configured shell commands run at two points:
//! - post-stamp: after the version is written into the manifest
//! - post-sync: after local changes were committed, tagged and pushed

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};

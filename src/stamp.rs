//! Stamping the next version into the project before it is committed.

use std::path::{Path, PathBuf};

use crate::boundary::BoundaryWarning;
use crate::error::{GitSemverError, Result};
use crate::hooks::{HookContext, HookExecutor, HookType};
use crate::manifest::Manifest;
use crate::reconcile;

/// The single app-specific extension point of a sync
///
/// Called once, synchronously, with the proposed next version after remote
/// history has been integrated and before anything is committed. The returned
/// string is the version that gets tagged. An `Err` aborts the sync before
/// the commit.
pub trait StampCallback {
    fn stamp(&mut self, error: Option<&GitSemverError>, proposed: &str) -> Result<String>;
}

impl<F> StampCallback for F
where
    F: FnMut(Option<&GitSemverError>, &str) -> Result<String>,
{
    fn stamp(&mut self, error: Option<&GitSemverError>, proposed: &str) -> Result<String> {
        self(error, proposed)
    }
}

/// Stamps a reconciled version into a package manifest
///
/// The proposed version is reconciled against the manifest so a hand-bumped
/// manifest never goes backwards, the result is written to the manifest, and
/// the `post_stamp` commands run. The reconciled version is authoritative.
pub struct ManifestStamper {
    manifest: PathBuf,
    location: PathBuf,
    post_stamp: Vec<String>,
    warnings: Vec<BoundaryWarning>,
}

impl ManifestStamper {
    pub fn new(manifest: impl Into<PathBuf>, location: impl Into<PathBuf>) -> Self {
        ManifestStamper {
            manifest: manifest.into(),
            location: location.into(),
            post_stamp: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_post_stamp(mut self, commands: Vec<String>) -> Self {
        self.post_stamp = commands;
        self
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Warnings collected while stamping
    pub fn warnings(&self) -> &[BoundaryWarning] {
        &self.warnings
    }
}

impl StampCallback for ManifestStamper {
    fn stamp(&mut self, error: Option<&GitSemverError>, proposed: &str) -> Result<String> {
        if let Some(error) = error {
            return Err(GitSemverError::version(format!("Cannot stamp version: {}", error)));
        }

        let mut manifest = Manifest::load(&self.manifest)?;
        let declared = manifest.version()?;
        let adjusted = reconcile::reconcile(proposed, &declared)?;
        if adjusted != proposed {
            self.warnings.push(BoundaryWarning::ManifestAhead {
                proposed: proposed.to_string(),
                declared,
                adjusted: adjusted.clone(),
            });
        }

        tracing::info!(
            manifest = %self.manifest.display(),
            version = %adjusted,
            "stamping version"
        );
        manifest.set_version(&adjusted)?;
        manifest.save()?;

        run_post_stamp(&self.post_stamp, &self.location, &adjusted)?;
        Ok(adjusted)
    }
}

/// Write `version` into the manifest as given and run the `post_stamp` commands.
pub fn stamp_version(
    manifest: &Path,
    version: &str,
    location: &Path,
    post_stamp: &[String],
) -> Result<()> {
    crate::manifest::update_version(manifest, version)?;
    run_post_stamp(post_stamp, location, version)
}

fn run_post_stamp(commands: &[String], location: &Path, version: &str) -> Result<()> {
    let context = HookContext::new(HookType::PostStamp, location, Some(version.to_string()));
    HookExecutor::execute_all(commands, &context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn package(dir: &TempDir, version: &str) -> PathBuf {
        let path = dir.path().join("package.json");
        fs::write(
            &path,
            format!("{{\n  \"name\": \"app\",\n  \"version\": \"{}\"\n}}\n", version),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_closure_is_a_callback() {
        let mut seen = Vec::new();
        let mut callback = |_: Option<&GitSemverError>, proposed: &str| -> Result<String> {
            seen.push(proposed.to_string());
            Ok(format!("{}-custom", proposed))
        };
        let result = callback.stamp(None, "1.0.0").unwrap();
        assert_eq!(result, "1.0.0-custom");
        assert_eq!(seen, vec!["1.0.0".to_string()]);
    }

    #[test]
    fn test_stamper_writes_proposed_version_when_ahead() {
        let dir = TempDir::new().unwrap();
        let path = package(&dir, "2.1.0");

        let mut stamper = ManifestStamper::new(&path, dir.path());
        assert_eq!(stamper.stamp(None, "2.1.1").unwrap(), "2.1.1");
        assert!(stamper.warnings().is_empty());
        assert_eq!(Manifest::load(&path).unwrap().version().unwrap(), "2.1.1");
    }

    #[test]
    fn test_stamper_never_regresses_manifest() {
        let dir = TempDir::new().unwrap();
        let path = package(&dir, "5.0.0");

        let mut stamper = ManifestStamper::new(&path, dir.path());
        assert_eq!(stamper.stamp(None, "2.1.1").unwrap(), "5.0.1");
        assert_eq!(Manifest::load(&path).unwrap().version().unwrap(), "5.0.1");
        assert!(matches!(
            stamper.warnings(),
            [BoundaryWarning::ManifestAhead { .. }]
        ));
    }

    #[test]
    fn test_stamper_propagates_incoming_error() {
        let dir = TempDir::new().unwrap();
        let path = package(&dir, "1.0.0");

        let mut stamper = ManifestStamper::new(&path, dir.path());
        let upstream = GitSemverError::version("boom");
        assert!(stamper.stamp(Some(&upstream), "1.0.1").is_err());
        assert_eq!(Manifest::load(&path).unwrap().version().unwrap(), "1.0.0");
    }

    #[test]
    fn test_stamper_missing_manifest_fails() {
        let dir = TempDir::new().unwrap();
        let mut stamper = ManifestStamper::new(dir.path().join("package.json"), dir.path());
        let err = stamper.stamp(None, "1.0.1").unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_post_stamp_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let path = package(&dir, "1.0.0");

        let mut stamper =
            ManifestStamper::new(&path, dir.path()).with_post_stamp(vec!["exit 1".to_string()]);
        assert!(stamper.stamp(None, "1.0.1").is_err());
    }

    #[test]
    fn test_stamp_version_writes_exact_value() {
        let dir = TempDir::new().unwrap();
        let path = package(&dir, "3.0.0");
        stamp_version(&path, "1.0.0", dir.path(), &[]).unwrap();
        assert_eq!(Manifest::load(&path).unwrap().version().unwrap(), "1.0.0");
    }
}

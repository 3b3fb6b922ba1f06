//! Keeps a stamped version from regressing below a hand-edited manifest.

use semver::Version;

use crate::error::{GitSemverError, Result};

/// Parse the leading `MAJOR.MINOR.PATCH` of `version`, ignoring any trailing
/// non-digit suffix on each component (`1.2.3-beta` -> 1.2.3).
pub fn parse_triple(version: &str) -> Option<Version> {
    let mut parts = version.trim().splitn(3, '.');
    let major = leading_number(parts.next()?)?;
    let minor = leading_number(parts.next()?)?;
    let patch = leading_number(parts.next()?)?;
    Some(Version::new(major, minor, patch))
}

fn leading_number(part: &str) -> Option<u64> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

/// The version that is safe to publish.
///
/// If the manifest already declares `candidate` or something newer, the
/// manifest's patch is bumped instead; otherwise `candidate` is returned
/// unchanged.
pub fn reconcile(candidate: &str, manifest_version: &str) -> Result<String> {
    let proposed = parse_triple(candidate).ok_or_else(|| {
        GitSemverError::version(format!("Cannot parse candidate version '{}'", candidate))
    })?;
    let declared = parse_triple(manifest_version).ok_or_else(|| {
        GitSemverError::version(format!(
            "Cannot parse manifest version '{}'",
            manifest_version
        ))
    })?;

    if declared < proposed {
        return Ok(candidate.to_string());
    }

    let patch = declared.patch.checked_add(1).ok_or_else(|| {
        GitSemverError::version(format!(
            "Manifest patch version overflows: '{}'",
            manifest_version
        ))
    })?;
    tracing::debug!(
        candidate,
        manifest = manifest_version,
        "manifest version is not behind the candidate, bumping its patch"
    );
    Ok(Version::new(declared.major, declared.minor, patch).to_string())
}

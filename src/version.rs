//! Derives the "next" version from a `git describe` style description.
//!
//! All functions are total: malformed input yields `false` or
//! [`VersionString::Unknown`] rather than an error. Component separators must
//! be a literal dot, so `"1x2x3"` is not read as `1.2.3`.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{BumpKind, SemanticVersion, VersionString};

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("version pattern is valid"))
}

fn leading_major() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d+)\.")
}

fn leading_minor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d+)\.(\d+)")
}

fn leading_patch() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d+)\.(\d+)\.(\d+)")
}

fn exact_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d+)\.(\d+)\.(\d+)$")
}

fn tag_with_distance() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    pattern(&RE, r"^(\d+)\.(\d+)\.(\d+)-(\d+)")
}

/// Group `index` of `caps` as a number; `None` on absence or overflow.
fn group(caps: &regex::Captures<'_>, index: usize) -> Option<u64> {
    caps.get(index)?.as_str().parse().ok()
}

/// Whether `desc` looks like a version: a leading integer and a literal dot.
///
/// Deliberately permissive; it only separates "looks like a version" from
/// "the tool produced no tag at all".
pub fn is_valid(desc: Option<&str>) -> bool {
    desc.is_some_and(|d| leading_major().is_match(d))
}

/// `1.2.3-4-gabc` -> `2.0.0`
pub fn next_major(desc: &str) -> VersionString {
    leading_major()
        .captures(desc)
        .and_then(|caps| {
            let major = group(&caps, 1)?.checked_add(1)?;
            Some(SemanticVersion::new(major, 0, 0))
        })
        .into()
}

/// `1.2.3-4-gabc` -> `1.3.0`
pub fn next_minor(desc: &str) -> VersionString {
    leading_minor()
        .captures(desc)
        .and_then(|caps| {
            let major = group(&caps, 1)?;
            let minor = group(&caps, 2)?.checked_add(1)?;
            Some(SemanticVersion::new(major, minor, 0))
        })
        .into()
}

/// `1.2.3-4-gabc` -> `1.2.4`
pub fn next_patch(desc: &str) -> VersionString {
    leading_patch()
        .captures(desc)
        .and_then(|caps| {
            let major = group(&caps, 1)?;
            let minor = group(&caps, 2)?;
            let patch = group(&caps, 3)?.checked_add(1)?;
            Some(SemanticVersion::new(major, minor, patch))
        })
        .into()
}

/// Next build number: `1.2.3` -> `1.2.3-1`, `1.2.3-4-gabc` -> `1.2.3-5`.
pub fn next_build(desc: &str) -> VersionString {
    if let Some(caps) = exact_tag().captures(desc) {
        return triple(&caps)
            .map(|v| v.with_distance(1))
            .into();
    }

    tag_with_distance()
        .captures(desc)
        .and_then(|caps| {
            let distance = group(&caps, 4)?.checked_add(1)?;
            Some(triple(&caps)?.with_distance(distance))
        })
        .into()
}

fn triple(caps: &regex::Captures<'_>) -> Option<SemanticVersion> {
    Some(SemanticVersion::new(
        group(caps, 1)?,
        group(caps, 2)?,
        group(caps, 3)?,
    ))
}

/// Strip everything after the leading `MAJOR.MINOR.PATCH`; unchanged if absent.
pub fn clean(desc: &str) -> &str {
    leading_patch()
        .find(desc)
        .map_or(desc, |m| &desc[..m.end()])
}

/// The next version for `bump`, derived from the current description.
pub fn compute_next_version(bump: BumpKind, desc: &str) -> VersionString {
    match bump {
        BumpKind::Major => next_major(desc),
        BumpKind::Minor => next_minor(desc),
        BumpKind::Patch => next_patch(desc),
    }
}

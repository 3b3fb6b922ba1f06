use std::cmp::Ordering;
use std::fmt;

/// Sentinel text printed wherever a version could not be determined.
pub const UNKNOWN_VERSION: &str = "unknown version";

/// Semantic version representation
///
/// `distance` (commits since the tag) and `hash` are advisory only and do
/// not take part in precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub distance: Option<u64>,
    pub hash: Option<String>,
}

impl SemanticVersion {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            distance: None,
            hash: None,
        }
    }

    pub fn with_distance(mut self, distance: u64) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Parse a `git describe` style description (`1.2.3`, `1.2.3-4-gabc1234`).
    ///
    /// Only the leading `MAJOR.MINOR.PATCH` is required; anything that does not
    /// fit the distance/hash shape after it is ignored.
    pub fn parse(desc: &str) -> Option<Self> {
        let mut rest = desc;
        let major = take_number(&mut rest)?;
        rest = rest.strip_prefix('.')?;
        let minor = take_number(&mut rest)?;
        rest = rest.strip_prefix('.')?;
        let patch = take_number(&mut rest)?;

        let mut version = SemanticVersion::new(major, minor, patch);
        if let Some(after) = rest.strip_prefix('-') {
            let mut tail = after;
            if let Some(distance) = take_number(&mut tail) {
                version.distance = Some(distance);
                if let Some(hash) = tail.strip_prefix('-').filter(|h| !h.is_empty()) {
                    version.hash = Some(hash.to_string());
                }
            }
        }
        Some(version)
    }

    /// The (major, minor, patch) triple used for ordering.
    pub fn precedence(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    pub fn cmp_precedence(&self, other: &SemanticVersion) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }
}

fn take_number(input: &mut &str) -> Option<u64> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let value = input[..end].parse::<u64>().ok()?;
    *input = &input[end..];
    Some(value)
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(distance) = self.distance {
            write!(f, "-{}", distance)?;
            if let Some(hash) = &self.hash {
                write!(f, "-{}", hash)?;
            }
        }
        Ok(())
    }
}

/// Result of deriving a version from a description.
///
/// `Unknown` is an ordinary value that callers must check before use; it is
/// never a real version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionString {
    Valid(SemanticVersion),
    Unknown,
}

impl VersionString {
    pub fn is_unknown(&self) -> bool {
        matches!(self, VersionString::Unknown)
    }

    pub fn as_version(&self) -> Option<&SemanticVersion> {
        match self {
            VersionString::Valid(version) => Some(version),
            VersionString::Unknown => None,
        }
    }

    pub fn into_version(self) -> Option<SemanticVersion> {
        match self {
            VersionString::Valid(version) => Some(version),
            VersionString::Unknown => None,
        }
    }
}

impl From<Option<SemanticVersion>> for VersionString {
    fn from(version: Option<SemanticVersion>) -> Self {
        version.map_or(VersionString::Unknown, VersionString::Valid)
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionString::Valid(version) => version.fmt(f),
            VersionString::Unknown => f.write_str(UNKNOWN_VERSION),
        }
    }
}

/// Which version component the next release increments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpKind {
    Major,
    Minor,
    #[default]
    Patch,
}

impl BumpKind {
    /// Resolve the caller's flags; patch unless major or minor was requested.
    pub fn from_flags(major: bool, minor: bool) -> Self {
        if major {
            BumpKind::Major
        } else if minor {
            BumpKind::Minor
        } else {
            BumpKind::Patch
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_tag() {
        let v = SemanticVersion::parse("1.2.3").unwrap();
        assert_eq!(v, SemanticVersion::new(1, 2, 3));
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_parse_describe_output() {
        let v = SemanticVersion::parse("1.2.3-4-gabcdef1").unwrap();
        assert_eq!(v.precedence(), (1, 2, 3));
        assert_eq!(v.distance, Some(4));
        assert_eq!(v.hash.as_deref(), Some("gabcdef1"));
        assert_eq!(v.to_string(), "1.2.3-4-gabcdef1");
    }

    #[test]
    fn test_parse_rejects_prefix_and_short_forms() {
        assert!(SemanticVersion::parse("v1.2.3").is_none());
        assert!(SemanticVersion::parse("1.2").is_none());
        assert!(SemanticVersion::parse("").is_none());
        assert!(SemanticVersion::parse("1x2x3").is_none());
    }

    #[test]
    fn test_parse_ignores_non_numeric_suffix() {
        let v = SemanticVersion::parse("1.2.3-rc1").unwrap();
        assert_eq!(v, SemanticVersion::new(1, 2, 3));
    }

    #[test]
    fn test_precedence_ignores_distance_and_hash() {
        let tagged = SemanticVersion::new(1, 2, 3);
        let described = SemanticVersion::parse("1.2.3-9-gffffff").unwrap();
        assert_eq!(tagged.cmp_precedence(&described), Ordering::Equal);
        assert_ne!(tagged, described);

        let newer = SemanticVersion::new(1, 10, 0);
        assert_eq!(tagged.cmp_precedence(&newer), Ordering::Less);
    }

    #[test]
    fn test_version_string_unknown() {
        let unknown = VersionString::Unknown;
        assert!(unknown.is_unknown());
        assert!(unknown.as_version().is_none());
        assert_eq!(unknown.to_string(), UNKNOWN_VERSION);
    }

    #[test]
    fn test_bump_kind_defaults_to_patch() {
        assert_eq!(BumpKind::default(), BumpKind::Patch);
        assert_eq!(BumpKind::from_flags(false, false), BumpKind::Patch);
        assert_eq!(BumpKind::from_flags(false, true), BumpKind::Minor);
        assert_eq!(BumpKind::from_flags(true, true), BumpKind::Major);
    }
}

use std::fmt;

/// Non-fatal conditions met while syncing that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// `describe` found no semantic version tag; an initial tag is created
    NoVersionTag {
        description: Option<String>,
        initial_tag: String,
    },
    /// The initial tag could not be created, usually because there is no HEAD yet
    InitialTagFailed { initial_tag: String, reason: String },
    /// The manifest already declared the proposed version or a newer one
    ManifestAhead {
        proposed: String,
        declared: String,
        adjusted: String,
    },
    /// A post-sync hook failed after the push had succeeded
    HookFailed { command: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag {
                description,
                initial_tag,
            } => match description {
                Some(desc) => write!(
                    f,
                    "No semantic version tag found (describe gave '{}'), creating {}",
                    desc, initial_tag
                ),
                None => write!(f, "No semantic version tag found, creating {}", initial_tag),
            },
            BoundaryWarning::InitialTagFailed {
                initial_tag,
                reason,
            } => write!(
                f,
                "Unable to create tag {} - perhaps you need to make an initial commit first: {}",
                initial_tag, reason
            ),
            BoundaryWarning::ManifestAhead {
                proposed,
                declared,
                adjusted,
            } => write!(
                f,
                "Manifest declares {} which is not behind {}; using {}",
                declared, proposed, adjusted
            ),
            BoundaryWarning::HookFailed { command, reason } => {
                write!(f, "Hook '{}' failed after push: {}", command, reason)
            }
        }
    }
}

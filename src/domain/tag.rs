use crate::domain::version::BumpKind;

/// Caller intent for one sync operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagParameters {
    pub bump: BumpKind,
    /// Commit and tag message, joined from the residual words
    pub comment: String,
    pub branch: Option<String>,
    /// Stop after integrating remote changes
    pub pull_only: bool,
    /// Commit and push without creating a version tag
    pub notag: bool,
}

impl TagParameters {
    /// Build parameters from flags and message words, preserving word order.
    pub fn new<I, S>(bump: BumpKind, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let comment = words
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");

        TagParameters {
            bump,
            comment,
            ..Default::default()
        }
    }

    pub fn with_branch(mut self, branch: Option<String>) -> Self {
        self.branch = branch.filter(|b| !b.is_empty());
        self
    }

    pub fn pull_only(mut self, pull_only: bool) -> Self {
        self.pull_only = pull_only;
        self
    }

    /// Request a tagless sync.
    pub fn without_tag(mut self) -> Self {
        self.notag = true;
        self
    }

    /// The message to pass to commit/tag, or `None` to let git prompt for one.
    pub fn message(&self) -> Option<&str> {
        let trimmed = self.comment.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

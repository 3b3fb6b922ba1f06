use std::collections::HashMap;
use std::path::PathBuf;

/// Points in the sync workflow where configured commands run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    /// After the version has been written into the manifest
    PostStamp,
    /// After a sync that published local changes
    PostSync,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PostStamp => "post-stamp",
            HookType::PostSync => "post-sync",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext {
    pub hook_type: HookType,
    /// Repository location; hooks run with this as their working directory
    pub location: PathBuf,
    /// Version that was stamped or tagged, if any
    pub version: Option<String>,
}

impl HookContext {
    pub fn new(hook_type: HookType, location: impl Into<PathBuf>, version: Option<String>) -> Self {
        HookContext {
            hook_type,
            location: location.into(),
            version,
        }
    }

    /// Convert context to environment variables for the hook command
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("GITSEMVER_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert(
            "GITSEMVER_LOCATION".to_string(),
            self.location.display().to_string(),
        );

        if let Some(ref version) = self.version {
            env.insert("GITSEMVER_VERSION".to_string(), version.clone());
        }

        env
    }
}

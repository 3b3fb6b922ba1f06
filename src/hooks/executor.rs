use std::process::Command;

use tracing::{info, warn};

use crate::boundary::BoundaryWarning;
use crate::error::{GitSemverError, Result};
use crate::hooks::HookContext;

/// Executes configured hook commands through the platform shell
pub struct HookExecutor;

impl HookExecutor {
    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }

    /// Execute a hook command with the given context
    ///
    /// The command runs in the repository location with `GITSEMVER_*`
    /// variables set, and its output goes straight to the console. Any
    /// non-zero exit code is a failure.
    pub fn execute(command: &str, context: &HookContext) -> Result<()> {
        if command.trim().is_empty() {
            return Err(GitSemverError::hook("Hook command is empty"));
        }

        let mut cmd = Self::shell(command);
        cmd.current_dir(&context.location);
        cmd.envs(context.to_env_vars());

        info!(hook = context.hook_type.name(), command, "running hook");
        let status = cmd.status().map_err(|e| {
            GitSemverError::hook(format!("Failed to execute hook `{}`: {}", command, e))
        })?;

        if !status.success() {
            return Err(GitSemverError::hook(format!(
                "Hook `{}` failed with exit code {}",
                command,
                status.code().unwrap_or(-1)
            )));
        }

        Ok(())
    }

    /// Run every command in order, stopping at the first failure.
    pub fn execute_all(commands: &[String], context: &HookContext) -> Result<()> {
        for command in commands {
            Self::execute(command, context)?;
        }
        Ok(())
    }

    /// Try to execute hooks, logging errors but not failing
    ///
    /// Used after a push has already succeeded; a hook failure must not
    /// retroactively fail the sync. Returns the failures for display.
    pub fn execute_permissive(commands: &[String], context: &HookContext) -> Vec<BoundaryWarning> {
        let mut failures = Vec::new();
        for command in commands {
            if let Err(e) = Self::execute(command, context) {
                warn!(error = %e, "hook failed");
                failures.push(BoundaryWarning::HookFailed {
                    command: command.clone(),
                    reason: e.to_string(),
                });
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookType;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> HookContext {
        HookContext::new(HookType::PostStamp, dir.path(), Some("2.0.1".to_string()))
    }

    #[test]
    fn test_empty_command_fails() {
        let dir = TempDir::new().unwrap();
        let result = HookExecutor::execute("   ", &context(&dir));
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_sees_version_and_runs_in_location() {
        let dir = TempDir::new().unwrap();
        HookExecutor::execute("echo \"$GITSEMVER_VERSION\" > stamped.txt", &context(&dir)).unwrap();

        let written = std::fs::read_to_string(dir.path().join("stamped.txt")).unwrap();
        assert_eq!(written.trim(), "2.0.1");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_fails() {
        let dir = TempDir::new().unwrap();
        let err = HookExecutor::execute("exit 3", &context(&dir)).unwrap_err();
        assert!(err.to_string().contains("exit code 3"));
    }

    #[cfg(unix)]
    #[test]
    fn test_execute_all_stops_at_first_failure() {
        let dir = TempDir::new().unwrap();
        let commands = vec![
            "false".to_string(),
            "touch should-not-exist".to_string(),
        ];
        assert!(HookExecutor::execute_all(&commands, &context(&dir)).is_err());
        assert!(!dir.path().join("should-not-exist").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_permissive_runs_everything() {
        let dir = TempDir::new().unwrap();
        let commands = vec!["false".to_string(), "touch ran".to_string()];
        let failures = HookExecutor::execute_permissive(&commands, &context(&dir));
        assert_eq!(failures.len(), 1);
        assert!(failures[0].to_string().contains("'false'"));
        assert!(dir.path().join("ran").exists());
    }
}

//! Command execution module.
//!
//! Spawns a shell process for a fully substituted command string.

use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};

/// Result of executing a command.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command
    pub status: ExitStatus,

    /// Standard output (if captured)
    pub stdout: Option<String>,
}

impl ExecutionResult {
    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code.
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Command executor.
#[derive(Debug, Default)]
pub struct Executor {
    /// Whether to capture output (vs pass through to the terminal)
    pub capture_output: bool,
}

impl Executor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to capture output.
    #[must_use]
    pub fn capture(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }

    /// Execute a command string through the platform shell.
    ///
    /// By default stdin/stdout/stderr are inherited so interactive
    /// commands behave normally. Use `capture(true)` to collect stdout
    /// instead (used by tests).
    pub fn execute(
        &self,
        command: &str,
        working_dir: Option<&Path>,
    ) -> std::io::Result<ExecutionResult> {
        let (shell, shell_arg) = get_shell();

        let mut cmd = ProcessCommand::new(shell);
        cmd.arg(shell_arg);
        cmd.arg(command);

        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output = cmd.output()?;

        let stdout = self
            .capture_output
            .then(|| String::from_utf8_lossy(&output.stdout).to_string());

        Ok(ExecutionResult { status: output.status, stdout })
    }
}

/// Get the shell and argument for the current platform.
fn get_shell() -> (&'static str, &'static str) {
    if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_simple_command() {
        let executor = Executor::new().capture(true);

        let result = executor.execute("echo hello", None).unwrap();
        assert!(result.success());
        assert!(result.stdout.unwrap().contains("hello"));
    }

    #[test]
    fn test_execute_reports_failure() {
        let executor = Executor::new().capture(true);

        let result = executor.execute("exit 3", None).unwrap();
        assert!(!result.success());
        assert_eq!(result.code(), Some(3));
    }

    #[test]
    fn test_execute_with_working_dir() {
        let executor = Executor::new().capture(true);

        let result = executor.execute("pwd", Some(Path::new("/tmp"))).unwrap();
        assert!(result.success());
        // On macOS, /tmp is a symlink to /private/tmp
        assert!(result.stdout.unwrap().contains("tmp"));
    }
}

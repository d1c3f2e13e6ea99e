//! Async execution of external tool commands.
//!
//! [`ToolCommand`] is a small builder over [`tokio::process::Command`] that
//! captures stdout/stderr and enforces a wall-clock timeout. Every ffmpeg
//! and ffprobe invocation in the pipeline goes through it, so a hung tool
//! turns into an ordinary [`Error::Tool`] instead of a stuck run.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use loopsmith_core::{Error, Result};

/// Default per-invocation timeout when the caller does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Builder for one external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

/// Captured output of a completed invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8.
    pub stderr: String,
}

impl ToolCommand {
    /// Create a command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the wall-clock timeout for this invocation.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Run the command to completion and capture its output.
    ///
    /// # Errors
    /// Returns [`Error::Tool`] when the program cannot be spawned, exits
    /// non-zero, or exceeds the timeout.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let tool = self.tool_name();
        tracing::debug!("running {} {}", self.program.display(), self.args.join(" "));

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Reap the child if the timeout drops the wait future.
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::tool(&tool, format!("failed to spawn: {e}")))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::tool(&tool, format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| Error::tool(&tool, format!("failed to complete: {e}")))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::tool(
                &tool,
                format!("exited with status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(ToolOutput { stdout, stderr })
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

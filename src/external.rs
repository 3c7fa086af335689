//! Wrapper for invoking external tools (samtools, prodigal, diamond, ...).

use std::process::Command;

use crate::error::{Error, Result};

/// A program invocation whose failure is reported as [`Error::ExternalTool`].
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program and arguments joined by single spaces, as shown in error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command to completion and returns its stdout.
    ///
    /// A non-zero exit status or a failure to spawn the program becomes
    /// [`Error::ExternalTool`] carrying the command line and the captured
    /// error stream.
    pub fn run(&self) -> Result<String> {
        let command = self.command_line();
        tracing::debug!(%command, "running external tool");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| Error::external_tool(&command, format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(%command, status = %output.status, "external tool failed");
            return Err(Error::ExternalTool { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

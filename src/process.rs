use std::{ffi::OsStr, process::Stdio};

use camino::Utf8Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Runs the version-control executable as a child process. Every stream is piped, so the child
/// never inherits the terminal. There is no timeout: a hanging child hangs the caller.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
        }
    }
}

impl GitRunner {
    /// Use a different executable, e.g. an absolute path to git.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run the executable with `args` inside `cwd` and return its trimmed stdout.
    pub async fn run<I, S>(&self, args: I, cwd: &Utf8Path) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .collect::<Vec<_>>();
        debug!(program = %self.program, ?args, %cwd, "spawning");

        let child = Command::new(&self.program)
            .args(&args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::SpawnFailed {
                program: self.program.clone(),
                source,
            })?;

        let output = child.wait_with_output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!(status = ?output.status, stdout_len = stdout.len(), "process exited");

        if output.status.success() {
            Ok(stdout.trim().to_string())
        } else if stderr.is_empty() {
            Err(Error::CommandFailed(stdout.into_owned()))
        } else {
            Err(Error::CommandFailed(stderr.into_owned()))
        }
    }
}

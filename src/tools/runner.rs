// std imports
use std::io;
use std::process::Stdio;

// 3rd party imports
use futures::Future;
use metrics::counter;
use tracing::{debug, error};

// local imports
use super::command::ToolCommand;
use crate::pipeline::errors::tool_error::ToolError;

/// Counter for started tool processes
///
pub const INVOCATION_COUNTER: &str = "proteotools_tool_invocations";

/// Counter for tool processes exiting unsuccessfully
///
pub const FAILURE_COUNTER: &str = "proteotools_tool_failures";

/// Trait defining how tool processes are executed.
///
pub trait ProcessRunner {
    /// Runs the command to completion and returns whether it exited successfully.
    /// Standard output is discarded for `quiet` runs, otherwise all
    /// streams are inherited.
    ///
    /// # Arguments
    /// * `command` - Command to run
    /// * `quiet` - Discard standard output
    ///
    fn execute(&self, command: &ToolCommand, quiet: bool)
        -> impl Future<Output = io::Result<bool>>;

    /// Runs the command, a non-zero exit status is an error
    ///
    /// # Arguments
    /// * `command` - Command to run
    ///
    fn run(&self, command: &ToolCommand) -> impl Future<Output = Result<(), ToolError>> {
        async move {
            debug!("Running `{}`", command);
            counter!(INVOCATION_COUNTER, "tool" => command.name().to_string()).increment(1);
            let success = self
                .execute(command, false)
                .await
                .map_err(|err| spawn_error(command, err))?;
            if !success {
                counter!(FAILURE_COUNTER, "tool" => command.name().to_string()).increment(1);
                error!("{} exited unsuccessfully", command.name());
                return Err(ToolError::ToolFailed(command.name().to_string()));
            }
            Ok(())
        }
    }

    /// Runs the command quietly, e.g. `<tool> --version`, and returns whether it succeeded.
    /// A command which can not be started counts as unsuccessful.
    ///
    /// # Arguments
    /// * `command` - Command to run
    ///
    fn probe(&self, command: &ToolCommand) -> impl Future<Output = bool> {
        async move {
            debug!("Probing `{}`", command);
            self.execute(command, true).await.unwrap_or(false)
        }
    }
}

/// Converts errors when spawning a process.
/// A missing program is a missing dependency.
///
fn spawn_error(command: &ToolCommand, err: io::Error) -> ToolError {
    if err.kind() == io::ErrorKind::NotFound {
        ToolError::DependencyMissing(
            command.program().to_string_lossy().to_string(),
            format!(
                "It is required for running {}, make sure it is installed and on your PATH.",
                command.name()
            ),
        )
    } else {
        ToolError::SpawnError(command.name().to_string(), err)
    }
}

/// Runs tools as child processes on the local machine
///
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProcessRunner;

impl LocalProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for LocalProcessRunner {
    async fn execute(&self, command: &ToolCommand, quiet: bool) -> io::Result<bool> {
        let mut process = command.to_command();
        if quiet {
            process.stdout(Stdio::null());
        }
        Ok(process.status().await?.success())
    }
}

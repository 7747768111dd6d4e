use std::path::{Path, PathBuf};

use crate::pipeline::{configuration::ToolConfiguration, errors::tool_error::ToolError};

use super::{
    availability::AvailabilityChecker,
    command::ToolCommand,
    container::Container,
    locator::ToolLocator,
    runner::{LocalProcessRunner, ProcessRunner},
    tool::Tool,
};

/// Everything a task needs to run the external tools:
/// where they are installed and how processes are executed.
///
pub struct Toolbox<R: ProcessRunner> {
    locator: ToolLocator,
    runner: R,
}

impl Toolbox<LocalProcessRunner> {
    /// Toolbox running the tools as local processes
    ///
    /// # Arguments
    /// * `config` - Tool configuration
    ///
    pub fn local(config: ToolConfiguration) -> Self {
        Self::new(ToolLocator::new(config), LocalProcessRunner::new())
    }
}

impl<R: ProcessRunner> Toolbox<R> {
    /// Creates a new toolbox
    ///
    /// # Arguments
    /// * `locator` - Tool locator
    /// * `runner` - Process runner
    ///
    pub fn new(locator: ToolLocator, runner: R) -> Self {
        Self { locator, runner }
    }

    pub fn locator(&self) -> &ToolLocator {
        &self.locator
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Install path of the tool
    ///
    pub fn path(&self, tool: Tool) -> PathBuf {
        self.locator.path(tool)
    }

    /// Checks if the tool is available
    ///
    /// # Arguments
    /// * `tool` - Tool to check
    ///
    pub async fn check(&self, tool: Tool) -> Result<(), ToolError> {
        AvailabilityChecker::new(&self.locator, &self.runner)
            .check(tool)
            .await
    }

    /// Runs the command
    ///
    /// # Arguments
    /// * `command` - Command to run
    ///
    pub async fn run(&self, command: &ToolCommand) -> Result<(), ToolError> {
        self.runner.run(command).await
    }

    /// Container of the given image tool
    ///
    /// # Arguments
    /// * `tool` - `Tool::Tpp` or `Tool::ProteoWizard`
    ///
    pub fn container(&self, tool: Tool) -> Container {
        match tool {
            Tool::ProteoWizard => Container::proteowizard(
                self.locator.path(tool),
                self.locator.config().proteowizard_writable_tmpfs,
            ),
            _ => Container::tpp(self.locator.path(Tool::Tpp)),
        }
    }

    /// Runs a tool inside the TPP image after checking Singularity is available
    ///
    /// # Arguments
    /// * `tool` - TPP tool command
    /// * `binds` - Directories to bind into the container
    ///
    pub async fn run_tpp(&self, tool: ToolCommand, binds: &[&Path]) -> Result<(), ToolError> {
        self.check(Tool::Tpp).await?;
        self.run(&self.container(Tool::Tpp).exec(tool, binds))
            .await
    }

    /// Runs a tool inside the ProteoWizard image after checking Singularity is available
    ///
    /// # Arguments
    /// * `tool` - ProteoWizard tool command
    /// * `binds` - Directories to bind into the container
    ///
    pub async fn run_proteowizard(
        &self,
        tool: ToolCommand,
        binds: &[&Path],
    ) -> Result<(), ToolError> {
        self.check(Tool::ProteoWizard).await?;
        self.run(&self.container(Tool::ProteoWizard).exec(tool, binds))
            .await
    }

    /// Runs the tool inside the image without arguments so it prints its usage.
    /// The exit status is ignored as most tools exit unsuccessfully without arguments.
    ///
    /// # Arguments
    /// * `image` - `Tool::Tpp` or `Tool::ProteoWizard`
    /// * `tool_name` - Name of the tool inside the image
    ///
    pub async fn tool_help(&self, image: Tool, tool_name: &str) -> Result<(), ToolError> {
        self.check(image).await?;
        let command = self
            .container(image)
            .exec(ToolCommand::new(tool_name, tool_name), &[]);
        self.runner
            .execute(&command, false)
            .await
            .map_err(|err| ToolError::SpawnError(tool_name.to_string(), err))?;
        Ok(())
    }
}

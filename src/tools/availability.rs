use tracing::debug;

use crate::{
    constants::{MONO_EXECUTABLE, SINGULARITY_EXECUTABLE},
    pipeline::errors::tool_error::ToolError,
};

use super::{command::ToolCommand, locator::ToolLocator, runner::ProcessRunner, tool::Tool};

/// Checks if the tools are installed before they are used.
/// Nothing is cached, every call checks again.
///
pub struct AvailabilityChecker<'a, R: ProcessRunner> {
    locator: &'a ToolLocator,
    runner: &'a R,
}

impl<'a, R: ProcessRunner> AvailabilityChecker<'a, R> {
    /// Creates a new checker
    ///
    /// # Arguments
    /// * `locator` - Locator for the tool paths
    /// * `runner` - Runner for probing runtimes
    ///
    pub fn new(locator: &'a ToolLocator, runner: &'a R) -> Self {
        Self { locator, runner }
    }

    /// Checks the given tool
    ///
    /// # Arguments
    /// * `tool` - Tool to check
    ///
    pub async fn check(&self, tool: Tool) -> Result<(), ToolError> {
        debug!("Checking for {}", tool);
        match tool {
            Tool::Comet | Tool::MsgfPlus | Tool::Tandem => self.check_installed_file(tool),
            Tool::ThermoRawFileParser => self.check_for_thermorawfileparser().await,
            Tool::Tpp | Tool::ProteoWizard => self.check_for_singularity().await,
        }
    }

    /// The installed file must exist
    ///
    fn check_installed_file(&self, tool: Tool) -> Result<(), ToolError> {
        let path = self.locator.path(tool);
        if path.exists() {
            return Ok(());
        }
        Err(ToolError::DependencyMissing(
            tool.display_name().to_string(),
            format!(
                "Install it at `{}` or point the `{}` entry of the tool configuration to it.",
                path.display(),
                tool.key()
            ),
        ))
    }

    /// Mono must be installed and able to run ThermoRawFileParser
    ///
    async fn check_for_thermorawfileparser(&self) -> Result<(), ToolError> {
        let mono_version = ToolCommand::new("mono", MONO_EXECUTABLE).arg("--version");
        if !self.runner.probe(&mono_version).await {
            return Err(ToolError::DependencyMissing(
                "Mono".to_string(),
                "Mono is required for running ThermoRawFileParser.".to_string(),
            ));
        }

        let path = self.locator.path(Tool::ThermoRawFileParser);
        let parser_version = ToolCommand::new(Tool::ThermoRawFileParser.display_name(), MONO_EXECUTABLE)
            .arg(&path)
            .arg("--version");
        if !self.runner.probe(&parser_version).await {
            return Err(ToolError::DependencyMissing(
                Tool::ThermoRawFileParser.display_name().to_string(),
                format!(
                    "It is required to convert Thermo raw files, install it at `{}`.",
                    path.display()
                ),
            ));
        }
        Ok(())
    }

    /// Singularity must be installed for running the TPP and ProteoWizard images
    ///
    async fn check_for_singularity(&self) -> Result<(), ToolError> {
        let version = ToolCommand::new("Singularity", SINGULARITY_EXECUTABLE).arg("--version");
        if self.runner.probe(&version).await {
            return Ok(());
        }
        Err(ToolError::DependencyMissing(
            "Singularity".to_string(),
            "Singularity is required for running TPP and ProteoWizard tools.".to_string(),
        ))
    }
}

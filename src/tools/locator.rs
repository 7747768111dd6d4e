use std::path::{Path, PathBuf};

use crate::pipeline::configuration::ToolConfiguration;

use super::tool::Tool;

/// Default Comet parameter file, relative to the tool directory
///
pub const DEFAULT_COMET_PARAMETER_FILE: &str = "comet/comet.params";

/// Default MS-GF+ configuration file, relative to the tool directory
///
pub const DEFAULT_MSGF_PLUS_PARAMETER_FILE: &str = "msgfplus/MSGFPlus_Params.txt";

/// Default X! Tandem input file, relative to the tool directory
///
pub const DEFAULT_TANDEM_PARAMETER_FILE: &str = "tandem/bin/default_input.xml";

/// Resolves the install paths of the external tools.
/// Immutable once created.
///
#[derive(Debug, Clone)]
pub struct ToolLocator {
    config: ToolConfiguration,
}

impl ToolLocator {
    /// Creates a new locator
    ///
    /// # Arguments
    /// * `config` - Tool configuration
    ///
    pub fn new(config: ToolConfiguration) -> Self {
        Self { config }
    }

    /// Root directory of the tools
    ///
    pub fn tool_dir(&self) -> &Path {
        &self.config.tool_dir
    }

    /// Tool configuration
    ///
    pub fn config(&self) -> &ToolConfiguration {
        &self.config
    }

    /// Install path of the given tool
    ///
    /// # Arguments
    /// * `tool` - Tool to locate
    ///
    pub fn path(&self, tool: Tool) -> PathBuf {
        let relative = match tool {
            Tool::ThermoRawFileParser => &self.config.thermorawfileparser,
            Tool::Comet => &self.config.comet,
            Tool::MsgfPlus => &self.config.msgfplus,
            Tool::Tandem => &self.config.tandem,
            Tool::Tpp => &self.config.tpp,
            Tool::ProteoWizard => &self.config.proteowizard,
        };
        self.config.tool_dir.join(relative)
    }

    /// Default parameter file of a search engine, `None` for tools without one
    ///
    /// # Arguments
    /// * `tool` - Search engine
    ///
    pub fn default_parameter_file(&self, tool: Tool) -> Option<PathBuf> {
        let relative = match tool {
            Tool::Comet => DEFAULT_COMET_PARAMETER_FILE,
            Tool::MsgfPlus => DEFAULT_MSGF_PLUS_PARAMETER_FILE,
            Tool::Tandem => DEFAULT_TANDEM_PARAMETER_FILE,
            _ => return None,
        };
        Some(self.config.tool_dir.join(relative))
    }
}

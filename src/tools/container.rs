use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::constants::{SINGULARITY_EXECUTABLE, WINE_EXECUTABLE};

use super::command::ToolCommand;

/// Singularity image tools are executed in
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    image: PathBuf,
    writable_tmpfs: bool,
    wine: bool,
}

impl Container {
    /// Trans-Proteomic Pipeline image, tools run natively
    ///
    /// # Arguments
    /// * `image` - Path to the image
    ///
    pub fn tpp(image: PathBuf) -> Self {
        Self {
            image,
            writable_tmpfs: false,
            wine: false,
        }
    }

    /// ProteoWizard image, tools are Windows executables run with wine
    ///
    /// # Arguments
    /// * `image` - Path to the image
    /// * `writable_tmpfs` - Run with a writable overlay
    ///
    pub fn proteowizard(image: PathBuf, writable_tmpfs: bool) -> Self {
        Self {
            image,
            writable_tmpfs,
            wine: true,
        }
    }

    /// Wraps the tool command into `singularity exec`.
    ///
    /// # Arguments
    /// * `tool` - Command to run inside the container
    /// * `binds` - Host directories to bind into the container
    ///
    pub fn exec(&self, tool: ToolCommand, binds: &[&Path]) -> ToolCommand {
        let mut command = ToolCommand::new(tool.name(), SINGULARITY_EXECUTABLE)
            .arg("exec")
            .flag_if(self.writable_tmpfs, "--writable-tmpfs");
        if !binds.is_empty() {
            command = command.option("-B", join_binds(binds));
        }
        command = command.arg(&self.image);
        if self.wine {
            command = command.arg(WINE_EXECUTABLE);
        }
        command.wrap(tool)
    }
}

/// Singularity expects multiple bind points comma separated
///
fn join_binds(binds: &[&Path]) -> OsString {
    let mut joined = OsString::new();
    for (idx, bind) in binds.iter().enumerate() {
        if idx > 0 {
            joined.push(",");
        }
        joined.push(bind.as_os_str());
    }
    joined
}

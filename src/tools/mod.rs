/// Checks whether tools are installed
pub mod availability;
/// Typed command lines
pub mod command;
/// Singularity containers for the TPP and ProteoWizard
pub mod container;
/// Install paths of the tools
pub mod locator;
/// Execution of tool processes
pub mod runner;
/// Recording process runner for tests
#[cfg(test)]
pub mod testing;
/// External tools
pub mod tool;
/// Locator and runner bundled for the tasks
pub mod toolbox;

/// Functions to run the pipeline
#[allow(clippy::module_inception)]
pub mod pipeline;

/// Pipeline configuration
pub mod configuration;

/// Errors of the tasks and the pipeline
pub mod errors;

/// Result file naming
pub mod utils;

/// Separate tasks of the pipeline
pub mod tasks;

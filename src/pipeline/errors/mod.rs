/// Errors shared between tasks
pub mod pipeline_error;
/// Errors related to locating and running external tools
pub mod tool_error;

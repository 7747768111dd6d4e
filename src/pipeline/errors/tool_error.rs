use thiserror::Error;

/// Errors raised while locating or running an external tool.
/// The tool writes its own diagnostics to the inherited standard streams,
/// so the error itself only names the tool.
///
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool or runtime is not installed, including a hint how to resolve it
    #[error("{0} not found. {1}")]
    DependencyMissing(String, String),
    #[error("Something went wrong while running {0}. Inspect the above output.")]
    ToolFailed(String),
    #[error("Unable to start {0}:\n\t{1}")]
    SpawnError(String, std::io::Error),
}

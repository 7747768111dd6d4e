use std::path::PathBuf;

use thiserror::Error;

use super::tool_error::ToolError;

/// Merges all task errors into a single error type
/// including some shared errors
///
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    ToolError(#[from] ToolError),
    #[error("Unable to rename `{0}` to `{1}`:\n\t{2}")]
    RenameError(PathBuf, PathBuf, std::io::Error),
    #[error("Invalid glob pattern `{0}`:\n\t{1}")]
    GlobPatternError(String, glob::PatternError),
    #[error("Unable to list `{0}`:\n\t{1}")]
    GlobError(PathBuf, glob::GlobError),
    /// Task which received no input files
    #[error("No input files given for {0}")]
    NoInputFilesError(&'static str),
    #[error("No parameter file configured for {0}")]
    NoParameterFileError(&'static str),
    #[error("Unable to read file: `{0}`:\n\t{1}")]
    FileReadError(PathBuf, std::io::Error),
    #[error("Unable to deserialize configuration `{0}`:\n\t{1}")]
    ConfigDeserializationError(PathBuf, toml::de::Error),
}

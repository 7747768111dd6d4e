use crate::pipeline::errors::pipeline_error::PipelineError;

/// Shared behavior of the tasks
///
pub trait Task {
    /// Name of the task used in logs and errors
    fn get_name() -> &'static str;

    fn get_counter_prefix() -> &'static str;

    /// Name of the counter for the files the task produced
    ///
    fn get_counter_name() -> String {
        format!("{}_outputs", Self::get_counter_prefix())
    }

    /// Rejects empty inputs for tasks which derive paths from the first file
    ///
    /// # Arguments
    /// * `files` - Input files
    ///
    fn ensure_input<P>(files: &[P]) -> Result<(), PipelineError> {
        if files.is_empty() {
            return Err(PipelineError::NoInputFilesError(Self::get_name()));
        }
        Ok(())
    }
}

// std imports
use std::path::{Path, PathBuf};

// 3rd party imports
use tracing::info;

// local imports
use super::{
    configuration::PipelineConfiguration,
    errors::pipeline_error::PipelineError,
    tasks::{
        comet_task::CometTask, conversion_task::ConversionTask, msgfplus_task::MsgfPlusTask,
        post_processing_task::PostProcessingTask, tandem_task::TandemTask,
    },
};
use crate::tools::{
    locator::ToolLocator,
    runner::{LocalProcessRunner, ProcessRunner},
    tool::Tool,
    toolbox::Toolbox,
};

/// Chains conversion, the search engines and the TPP post processing.
/// Every stage runs after the previous one finished, the first error stops the pipeline.
///
pub struct Pipeline<R: ProcessRunner> {
    toolbox: Toolbox<R>,
    config: PipelineConfiguration,
}

impl Pipeline<LocalProcessRunner> {
    /// Pipeline running the tools as local processes
    ///
    /// # Arguments
    /// * `config` - Pipeline configuration
    ///
    pub fn local(config: PipelineConfiguration) -> Self {
        let toolbox = Toolbox::local(config.tools.clone());
        Self { toolbox, config }
    }
}

impl<R: ProcessRunner> Pipeline<R> {
    /// Creates a new pipeline
    ///
    /// # Arguments
    /// * `config` - Pipeline configuration
    /// * `runner` - Process runner
    ///
    pub fn new(config: PipelineConfiguration, runner: R) -> Self {
        let toolbox = Toolbox::new(ToolLocator::new(config.tools.clone()), runner);
        Self { toolbox, config }
    }

    pub fn toolbox(&self) -> &Toolbox<R> {
        &self.toolbox
    }

    pub fn config(&self) -> &PipelineConfiguration {
        &self.config
    }

    /// Configured parameter file of the search engine or its default
    ///
    /// # Arguments
    /// * `configured` - Parameter file from the configuration
    /// * `tool` - Search engine
    ///
    pub fn parameter_file(
        &self,
        configured: Option<&Path>,
        tool: Tool,
    ) -> Result<PathBuf, PipelineError> {
        match configured {
            Some(parameter_file) => Ok(parameter_file.to_path_buf()),
            None => self
                .toolbox
                .locator()
                .default_parameter_file(tool)
                .ok_or(PipelineError::NoParameterFileError(tool.display_name())),
        }
    }

    /// Searches the spectra with Comet, MS-GF+ and X! Tandem, in this order.
    /// Returns the pepXML files of all engines.
    ///
    /// # Arguments
    /// * `fasta` - Sequence database
    /// * `spectra_files` - Spectra files
    ///
    pub async fn run_searches<P: AsRef<Path>>(
        &self,
        fasta: &Path,
        spectra_files: &[P],
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let comet_params =
            self.parameter_file(self.config.comet.parameter_file.as_deref(), Tool::Comet)?;
        let msgf_plus_params =
            self.parameter_file(self.config.msgfplus.parameter_file.as_deref(), Tool::MsgfPlus)?;
        let tandem_params =
            self.parameter_file(self.config.tandem.parameter_file.as_deref(), Tool::Tandem)?;

        let mut pepxml_files =
            CometTask::run(&self.toolbox, &comet_params, fasta, spectra_files).await?;
        pepxml_files.extend(
            MsgfPlusTask::run(
                &self.toolbox,
                &msgf_plus_params,
                fasta,
                spectra_files,
                &self.config.msgfplus,
            )
            .await?,
        );
        pepxml_files.extend(
            TandemTask::run(
                &self.toolbox,
                &tandem_params,
                fasta,
                spectra_files,
                &self.config.tandem,
            )
            .await?,
        );
        info!("Search finished with {} pepXML files", pepxml_files.len());
        Ok(pepxml_files)
    }

    /// Converts the raw files, searches them and post processes the results.
    /// Returns the InterProphet result.
    ///
    /// # Arguments
    /// * `inputs` - Raw files or directories containing raw files
    /// * `fasta` - Sequence database
    ///
    pub async fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        fasta: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let spectra_files =
            ConversionTask::run(&self.toolbox, inputs, &self.config.conversion).await?;
        let pepxml_files = self.run_searches(fasta, &spectra_files).await?;
        let combined = PostProcessingTask::run_prophets(
            &self.toolbox,
            &pepxml_files,
            fasta,
            &self.config.prophets,
        )
        .await?;
        info!("Pipeline finished: {}", combined.display());
        Ok(combined)
    }
}

use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::{debug, info};

use crate::{
    pipeline::{
        configuration::ProphetConfiguration,
        errors::pipeline_error::PipelineError,
        utils::{directory_of, interact_path, is_interact_file},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, toolbox::Toolbox},
};

use super::task::Task;

/// Prefix for the post processing counter
///
pub const COUNTER_PREFIX: &str = "proteotools_post_processing";

/// Post processes search results with the TPP:
/// InteractParser, PeptideProphet and InterProphet
///
pub struct PostProcessingTask;

impl PostProcessingTask {
    /// Runs InteractParser for each pepXML file, writing `interact-<name>` next to it.
    /// The spectra are expected in the configured mzML directory or, if unset,
    /// next to the first pepXML file.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `pepxml_files` - Search results
    /// * `fasta` - Sequence database
    /// * `config` - Prophet configuration
    ///
    pub async fn interact_parser<R, P>(
        toolbox: &Toolbox<R>,
        pepxml_files: &[P],
        fasta: &Path,
        config: &ProphetConfiguration,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        Self::ensure_input(pepxml_files)?;
        let mzml_directory = Self::mzml_directory(pepxml_files[0].as_ref(), config);
        Self::interact_parser_with(toolbox, pepxml_files, fasta, &mzml_directory, config).await
    }

    async fn interact_parser_with<R, P>(
        toolbox: &Toolbox<R>,
        pepxml_files: &[P],
        fasta: &Path,
        mzml_directory: &Path,
        config: &ProphetConfiguration,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        let mut interact_files = Vec::with_capacity(pepxml_files.len());
        for pepxml_file in pepxml_files {
            let pepxml_file = pepxml_file.as_ref();
            info!("InteractParser: {}", pepxml_file.display());

            let pepxml_dir = directory_of(pepxml_file);
            let output = interact_path(pepxml_file);
            let command = ToolCommand::new("InteractParser", "InteractParser")
                .arg(&output)
                .arg(pepxml_file)
                .attached("-a", mzml_directory)
                .attached("-D", fasta)
                .attached("-E", &config.enzyme)
                .arg("-C")
                .arg("-S")
                .attached("-R", config.max_peptide_rank.to_string());

            let mut binds = vec![mzml_directory];
            if pepxml_dir.as_path() != mzml_directory {
                binds.push(pepxml_dir.as_path());
            }
            toolbox.run_tpp(command, &binds).await?;
            interact_files.push(output);
        }
        Ok(interact_files)
    }

    /// Runs PeptideProphet on each interact file. The files are rewritten in place.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `interact_files` - InteractParser results
    /// * `config` - Prophet configuration
    ///
    pub async fn peptide_prophet<R, P>(
        toolbox: &Toolbox<R>,
        interact_files: &[P],
        config: &ProphetConfiguration,
    ) -> Result<(), PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        for interact_file in interact_files {
            let interact_file = interact_file.as_ref();
            info!("PeptideProphet: {}", interact_file.display());

            let mut command = ToolCommand::new("PeptideProphetParser", "PeptideProphetParser")
                .arg(interact_file)
                .args(&config.peptide_prophet_flags);
            if !config.decoy_tag.is_empty() {
                command = command.assignment("DECOY", &config.decoy_tag);
            }
            toolbox
                .run_tpp(command, &[directory_of(interact_file).as_path()])
                .await?;
        }
        Ok(())
    }

    /// Combines the interact files with InterProphet. The result is written
    /// into the directory of the first file, which is returned.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `interact_files` - PeptideProphet results, all in the same directory
    /// * `config` - Prophet configuration
    ///
    pub async fn inter_prophet<R, P>(
        toolbox: &Toolbox<R>,
        interact_files: &[P],
        config: &ProphetConfiguration,
    ) -> Result<PathBuf, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        Self::ensure_input(interact_files)?;
        let output_dir = directory_of(interact_files[0].as_ref());
        let output = output_dir.join(&config.iprophet_output_filename);
        info!("InterProphet: {}", output.display());

        let mut command = ToolCommand::new("InterProphetParser", "InterProphetParser")
            .assignment("THREADS", config.threads);
        if !config.decoy_tag.is_empty() {
            command = command.assignment("DECOY", &config.decoy_tag);
        }
        let command = command
            .assignment("MINPROB", config.iprophet_minprob)
            .args(&config.iprophet_flags)
            .args(interact_files.iter().map(|file| file.as_ref()))
            .arg(&output);
        toolbox.run_tpp(command, &[output_dir.as_path()]).await?;

        counter!(Self::get_counter_name()).increment(1);
        Ok(output)
    }

    /// Runs InteractParser, PeptideProphet and InterProphet.
    /// With `skip_existing_interact_pepxmls` files named like InteractParser output
    /// are ignored, so a directory listing including earlier results can be passed again.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `pepxml_files` - Search results
    /// * `fasta` - Sequence database
    /// * `config` - Prophet configuration
    ///
    pub async fn run_prophets<R, P>(
        toolbox: &Toolbox<R>,
        pepxml_files: &[P],
        fasta: &Path,
        config: &ProphetConfiguration,
    ) -> Result<PathBuf, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        Self::ensure_input(pepxml_files)?;
        let mzml_directory = Self::mzml_directory(pepxml_files[0].as_ref(), config);

        let pepxml_files: Vec<&Path> = pepxml_files
            .iter()
            .map(|file| file.as_ref())
            .filter(|file| !(config.skip_existing_interact_pepxmls && is_interact_file(file)))
            .collect();
        debug!("Post processing {} pepXML files", pepxml_files.len());
        Self::ensure_input(&pepxml_files)?;

        let interact_files =
            Self::interact_parser_with(toolbox, &pepxml_files, fasta, &mzml_directory, config)
                .await?;
        Self::peptide_prophet(toolbox, &interact_files, config).await?;
        Self::inter_prophet(toolbox, &interact_files, config).await
    }

    /// Configured mzML directory, defaults to the directory of the first pepXML file
    ///
    fn mzml_directory(first_pepxml: &Path, config: &ProphetConfiguration) -> PathBuf {
        match &config.mzml_directory {
            Some(mzml_directory) => mzml_directory.clone(),
            None => directory_of(first_pepxml),
        }
    }
}

impl Task for PostProcessingTask {
    fn get_name() -> &'static str {
        "TPP post processing"
    }

    fn get_counter_prefix() -> &'static str {
        COUNTER_PREFIX
    }
}

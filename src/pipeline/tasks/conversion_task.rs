use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use metrics::counter;
use tracing::info;

use crate::{
    constants::{MONO_EXECUTABLE, RAW_EXTENSION},
    pipeline::{
        configuration::ConversionConfiguration, errors::pipeline_error::PipelineError,
        utils::{derive_path, directory_of},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, tool::Tool, toolbox::Toolbox},
};

use super::task::Task;

/// Prefix for the conversion counter
///
pub const COUNTER_PREFIX: &str = "proteotools_conversion";

/// Converts Thermo raw files with ThermoRawFileParser
///
pub struct ConversionTask;

impl ConversionTask {
    /// Converts the given raw files and all raw files in the given directories.
    /// Returns the converted files in input order. Files within a directory
    /// come in the order they are listed, callers should not rely on it.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `inputs` - Raw files or directories containing raw files
    /// * `config` - Conversion configuration
    ///
    pub async fn run<R, P>(
        toolbox: &Toolbox<R>,
        inputs: &[P],
        config: &ConversionConfiguration,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        toolbox.check(Tool::ThermoRawFileParser).await?;
        let parser_path = toolbox.path(Tool::ThermoRawFileParser);

        let mut converted_files = Vec::new();
        for input in inputs {
            for raw_file in Self::resolve_input(input.as_ref())? {
                let output_dir = match &config.output_directory {
                    Some(output_dir) => output_dir.clone(),
                    None => directory_of(&raw_file),
                };
                let output_file = Self::output_path(&output_dir, &raw_file, config);

                if !config.clobber && output_file.exists() {
                    info!(
                        "Skipping `{}`, `{}` already exists",
                        raw_file.display(),
                        output_file.display()
                    );
                    converted_files.push(output_file);
                    continue;
                }

                info!("ThermoRawFileParser: {}", raw_file.display());
                let command = Self::command(&parser_path, &raw_file, &output_dir, config);
                toolbox.run(&command).await?;
                counter!(Self::get_counter_name()).increment(1);
                converted_files.push(output_file);
            }
        }

        Ok(converted_files)
    }

    /// Lists the raw files of a directory (non-recursive) or returns the file itself
    ///
    /// # Arguments
    /// * `input` - File or directory
    ///
    fn resolve_input(input: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        if !input.is_dir() {
            return Ok(vec![input.to_path_buf()]);
        }
        let pattern = format!(
            "{}/*.{}",
            Pattern::escape(&input.to_string_lossy()),
            RAW_EXTENSION
        );
        glob(&pattern)
            .map_err(|err| PipelineError::GlobPatternError(pattern.clone(), err))?
            .map(|entry| entry.map_err(|err| PipelineError::GlobError(input.to_path_buf(), err)))
            .collect()
    }

    /// File ThermoRawFileParser writes for the raw file
    ///
    fn output_path(output_dir: &Path, raw_file: &Path, config: &ConversionConfiguration) -> PathBuf {
        let output_file = derive_path(output_dir, raw_file, "", config.format.extension());
        if config.gzip_output {
            let mut gzipped = output_file.into_os_string();
            gzipped.push(".gz");
            return PathBuf::from(gzipped);
        }
        output_file
    }

    /// `mono ThermoRawFileParser.exe -i <raw> -o <dir> -f <format> [-c <metadata>] [-g] [-p] [-z]`
    ///
    fn command(
        parser_path: &Path,
        raw_file: &Path,
        output_dir: &Path,
        config: &ConversionConfiguration,
    ) -> ToolCommand {
        let mut command = ToolCommand::new(Tool::ThermoRawFileParser.display_name(), MONO_EXECUTABLE)
            .arg(parser_path)
            .option("-i", raw_file)
            .option("-o", output_dir)
            .option("-f", config.format.index().to_string());
        if let Some(metadata_output_file) = &config.metadata_output_file {
            command = command.option("-c", metadata_output_file);
        }
        command
            .flag_if(config.gzip_output, "-g")
            .flag_if(config.no_peak_picking, "-p")
            .flag_if(config.no_zlib_compression, "-z")
    }
}

impl Task for ConversionTask {
    fn get_name() -> &'static str {
        "ThermoRawFileParser"
    }

    fn get_counter_prefix() -> &'static str {
        COUNTER_PREFIX
    }
}

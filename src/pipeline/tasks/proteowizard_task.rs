use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use tracing::info;

use crate::{
    constants::MGF_EXTENSION,
    pipeline::{
        errors::pipeline_error::PipelineError,
        utils::{derive_path, directory_of},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, toolbox::Toolbox},
};

/// Output formats of idconvert
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdConvertFormat {
    #[default]
    PepXml,
    MzIdentMl,
    Text,
}

impl IdConvertFormat {
    /// Flag selecting the format
    ///
    pub fn flag(&self) -> &'static str {
        match self {
            Self::PepXml => "--pepXML",
            Self::MzIdentMl => "--mzIdentML",
            Self::Text => "--text",
        }
    }
}

impl FromStr for IdConvertFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pepxml" => Ok(Self::PepXml),
            "mzidentml" => Ok(Self::MzIdentMl),
            "text" => Ok(Self::Text),
            _ => Err(format!(
                "Unknown idconvert format `{}`, expected pepXML, mzIdentML or text",
                s
            )),
        }
    }
}

/// Runs ProteoWizard tools from the ProteoWizard image
///
pub struct ProteoWizardTask;

impl ProteoWizardTask {
    /// Converts identification files with idconvert.
    /// Returns `<output_directory>/<input stem><output_extension>`.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `input_file` - Identification file
    /// * `output_directory` - Output directory
    /// * `output_extension` - Extension of the written file including the leading dot, e.g. `.pepXML`
    /// * `format` - Output format
    ///
    pub async fn idconvert<R: ProcessRunner>(
        toolbox: &Toolbox<R>,
        input_file: &Path,
        output_directory: &Path,
        output_extension: &str,
        format: IdConvertFormat,
    ) -> Result<PathBuf, PipelineError> {
        info!("idconvert: {}", input_file.display());
        let input_dir = directory_of(input_file);
        let command = ToolCommand::new("idconvert", "idconvert")
            .arg(input_file)
            .option("-o", output_directory)
            .option("-e", output_extension)
            .arg(format.flag());
        toolbox
            .run_proteowizard(command, &Self::binds(&input_dir, output_directory))
            .await?;
        Ok(derive_path(output_directory, input_file, output_extension, ""))
    }

    /// Converts spectra to MGF with msconvert, returns `<output_directory>/<stem>.mgf`
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `spectra_file` - Spectra file
    /// * `output_directory` - Output directory
    ///
    pub async fn msconvert_to_mgf<R: ProcessRunner>(
        toolbox: &Toolbox<R>,
        spectra_file: &Path,
        output_directory: &Path,
    ) -> Result<PathBuf, PipelineError> {
        info!("msconvert: {}", spectra_file.display());
        let input_dir = directory_of(spectra_file);
        let command = ToolCommand::new("msconvert", "msconvert")
            .arg(spectra_file)
            .arg("--mgf")
            .option("-o", output_directory);
        toolbox
            .run_proteowizard(command, &Self::binds(&input_dir, output_directory))
            .await?;
        Ok(derive_path(
            output_directory,
            spectra_file,
            "",
            MGF_EXTENSION,
        ))
    }

    /// Input directory and, if different, the output directory
    ///
    fn binds<'a>(input_dir: &'a Path, output_dir: &'a Path) -> Vec<&'a Path> {
        if input_dir == output_dir {
            vec![input_dir]
        } else {
            vec![input_dir, output_dir]
        }
    }
}

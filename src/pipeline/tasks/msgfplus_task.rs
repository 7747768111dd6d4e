use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::{info, warn};

use crate::{
    constants::{JAVA_EXECUTABLE, PEPXML_EXTENSION},
    pipeline::{
        configuration::MsgfPlusConfiguration,
        errors::pipeline_error::PipelineError,
        utils::{directory_of, msgf_plus_mzid_path, msgf_plus_result_path},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, tool::Tool, toolbox::Toolbox},
};

use super::task::Task;

/// Prefix for the MS-GF+ counter
///
pub const COUNTER_PREFIX: &str = "proteotools_msgfplus";

/// Searches spectra with MS-GF+
///
pub struct MsgfPlusTask;

impl MsgfPlusTask {
    /// Searches each spectra file without target-decoy analysis, writing `<stem>-msgf_plus.mzid`.
    /// The mzid is converted to `<stem>-msgf_plus.pepXML` with the TPP's idconvert if
    /// `convert_to_pepxml` is set. Only converted files are returned, so nothing is
    /// returned if the conversion is disabled.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `parameter_file` - MS-GF+ configuration file
    /// * `fasta` - Sequence database
    /// * `spectra_files` - Spectra files
    /// * `config` - MS-GF+ configuration
    ///
    pub async fn run<R, P>(
        toolbox: &Toolbox<R>,
        parameter_file: &Path,
        fasta: &Path,
        spectra_files: &[P],
        config: &MsgfPlusConfiguration,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        toolbox.check(Tool::MsgfPlus).await?;
        let msgf_plus_path = toolbox.path(Tool::MsgfPlus);

        if !config.convert_to_pepxml {
            warn!("MS-GF+ results are not converted to pepXML and will not be passed on");
        }

        let mut pepxml_files = Vec::new();
        for spectra_file in spectra_files {
            let spectra_file = spectra_file.as_ref();
            info!("MS-GF+: {}", spectra_file.display());

            let mzid = msgf_plus_mzid_path(spectra_file);
            let command = ToolCommand::new(Tool::MsgfPlus.display_name(), JAVA_EXECUTABLE)
                .arg(format!("-Xmx{}", config.memory))
                .option("-jar", &msgf_plus_path)
                .option("-conf", parameter_file)
                .option("-decoy", &config.decoy_prefix)
                .option("-tda", "0")
                .option("-d", fasta)
                .option("-o", &mzid)
                .option("-s", spectra_file);
            toolbox.run(&command).await?;

            if config.convert_to_pepxml {
                let pepxml = Self::convert_to_pepxml(toolbox, spectra_file, &mzid).await?;
                counter!(Self::get_counter_name()).increment(1);
                pepxml_files.push(pepxml);
            }
        }

        Ok(pepxml_files)
    }

    /// Converts the mzid with idconvert from the TPP image, returns the pepXML path
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `spectra_file` - Searched spectra file
    /// * `mzid` - MS-GF+ result
    ///
    async fn convert_to_pepxml<R: ProcessRunner>(
        toolbox: &Toolbox<R>,
        spectra_file: &Path,
        mzid: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let output_dir = directory_of(mzid);
        let idconvert = ToolCommand::new("idconvert", "idconvert")
            .arg(mzid)
            .arg("--pepXML")
            .option("-o", &output_dir)
            .option("-e", format!(".{}", PEPXML_EXTENSION));
        toolbox.run_tpp(idconvert, &[output_dir.as_path()]).await?;
        Ok(msgf_plus_result_path(spectra_file))
    }
}

impl Task for MsgfPlusTask {
    fn get_name() -> &'static str {
        "MS-GF+"
    }

    fn get_counter_prefix() -> &'static str {
        COUNTER_PREFIX
    }
}

use std::{
    ffi::OsString,
    fs::rename,
    path::{Path, PathBuf},
};

use metrics::counter;
use tracing::info;

use crate::{
    constants::COMET_PEPXML_EXTENSION,
    pipeline::{
        errors::pipeline_error::PipelineError,
        utils::{comet_base_name, comet_result_path},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, tool::Tool, toolbox::Toolbox},
};

use super::task::Task;

/// Prefix for the Comet counter
///
pub const COUNTER_PREFIX: &str = "proteotools_comet";

/// Searches spectra with Comet
///
pub struct CometTask;

impl CometTask {
    /// Searches each spectra file and returns `<stem>-comet.pepXML` next to it.
    /// If Comet fails, its native `.pep.xml` output is left as it is.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `parameter_file` - Comet params file
    /// * `fasta` - Sequence database
    /// * `spectra_files` - Spectra files
    ///
    pub async fn run<R, P>(
        toolbox: &Toolbox<R>,
        parameter_file: &Path,
        fasta: &Path,
        spectra_files: &[P],
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        toolbox.check(Tool::Comet).await?;
        let comet_path = toolbox.path(Tool::Comet);

        let mut pepxml_files = Vec::with_capacity(spectra_files.len());
        for spectra_file in spectra_files {
            let spectra_file = spectra_file.as_ref();
            info!("Comet: {}", spectra_file.display());

            let base_name = comet_base_name(spectra_file);
            let command = ToolCommand::new(Tool::Comet.display_name(), &comet_path)
                .attached("-D", fasta)
                .attached("-P", parameter_file)
                .attached("-N", &base_name)
                .arg(spectra_file);
            toolbox.run(&command).await?;

            let mut native_pepxml = OsString::from(base_name.as_os_str());
            native_pepxml.push(".");
            native_pepxml.push(COMET_PEPXML_EXTENSION);
            let native_pepxml = PathBuf::from(native_pepxml);
            let pepxml = comet_result_path(spectra_file);
            rename(&native_pepxml, &pepxml)
                .map_err(|err| PipelineError::RenameError(native_pepxml, pepxml.clone(), err))?;

            counter!(Self::get_counter_name()).increment(1);
            pepxml_files.push(pepxml);
        }

        Ok(pepxml_files)
    }
}

impl Task for CometTask {
    fn get_name() -> &'static str {
        "Comet"
    }

    fn get_counter_prefix() -> &'static str {
        COUNTER_PREFIX
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, read_dir, write};

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::{
        pipeline::{configuration::ToolConfiguration, errors::tool_error::ToolError},
        tools::{locator::ToolLocator, testing::RecordingRunner},
    };

    /// Tool directory with a Comet executable and two spectra files
    ///
    fn setup(install_comet: bool) -> (TempDir, ToolLocator, Vec<PathBuf>) {
        let dir = tempdir().unwrap();
        let locator = ToolLocator::new(ToolConfiguration::new(dir.path().join("tools")));
        if install_comet {
            let comet = locator.path(Tool::Comet);
            create_dir_all(comet.parent().unwrap()).unwrap();
            write(&comet, "").unwrap();
        }
        let data_dir = dir.path().join("data");
        create_dir_all(&data_dir).unwrap();
        let spectra_files = vec![data_dir.join("a.mzML"), data_dir.join("b.mzML")];
        for spectra_file in spectra_files.iter() {
            write(spectra_file, "").unwrap();
        }
        (dir, locator, spectra_files)
    }

    #[tokio::test]
    async fn test_one_pepxml_per_spectra_file() {
        let (dir, locator, spectra_files) = setup(true);
        let toolbox = Toolbox::new(locator, RecordingRunner::simulating_tools());
        let params = dir.path().join("comet.params");
        let fasta = dir.path().join("db.fasta");

        let pepxml_files = CometTask::run(&toolbox, &params, &fasta, &spectra_files)
            .await
            .unwrap();

        let data_dir = dir.path().join("data");
        assert_eq!(
            pepxml_files,
            vec![
                data_dir.join("a-comet.pepXML"),
                data_dir.join("b-comet.pepXML")
            ]
        );
        assert!(pepxml_files.iter().all(|file| file.exists()));
        assert!(!data_dir.join("a-comet.pep.xml").exists());

        let runs = toolbox.runner().runs();
        assert_eq!(
            runs[0].to_string(),
            format!(
                "{} -D{} -P{} -N{} {}",
                dir.path().join("tools/comet/comet.linux.exe").display(),
                fasta.display(),
                params.display(),
                data_dir.join("a-comet").display(),
                spectra_files[0].display()
            )
        );
    }

    #[tokio::test]
    async fn test_missing_comet_spawns_nothing() {
        let (dir, locator, spectra_files) = setup(false);
        let toolbox = Toolbox::new(locator, RecordingRunner::simulating_tools());

        let result = CometTask::run(
            &toolbox,
            &dir.path().join("comet.params"),
            &dir.path().join("db.fasta"),
            &spectra_files,
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::DependencyMissing(_, _)))
        ));
        assert!(toolbox.runner().commands().is_empty());
        assert_eq!(read_dir(dir.path().join("data")).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_results() {
        let (dir, locator, mut spectra_files) = setup(true);
        let data_dir = dir.path().join("data");
        spectra_files.push(data_dir.join("c.mzML"));
        let toolbox = Toolbox::new(
            locator,
            RecordingRunner::simulating_tools().with_failing_run(1),
        );

        let result = CometTask::run(
            &toolbox,
            &dir.path().join("comet.params"),
            &dir.path().join("db.fasta"),
            &spectra_files,
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::ToolFailed(name))) if name == "Comet"
        ));
        assert_eq!(toolbox.runner().runs().len(), 2);
        assert!(data_dir.join("a-comet.pepXML").exists());
        assert!(!data_dir.join("b-comet.pepXML").exists());
        assert!(!data_dir.join("c-comet.pep.xml").exists());
    }

    #[tokio::test]
    async fn test_failure_leaves_native_output_in_place() {
        let (dir, locator, spectra_files) = setup(true);
        let data_dir = dir.path().join("data");
        // partial output of the failing run
        let native_pepxml = data_dir.join("b-comet.pep.xml");
        write(&native_pepxml, "").unwrap();
        let toolbox = Toolbox::new(
            locator,
            RecordingRunner::simulating_tools().with_failing_run(1),
        );

        let result = CometTask::run(
            &toolbox,
            &dir.path().join("comet.params"),
            &dir.path().join("db.fasta"),
            &spectra_files,
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::ToolFailed(_)))
        ));
        assert!(native_pepxml.exists());
        assert!(!data_dir.join("b-comet.pepXML").exists());
        assert!(data_dir.join("a-comet.pepXML").exists());
    }

    #[tokio::test]
    async fn test_missing_native_output_is_rename_error() {
        let (dir, locator, spectra_files) = setup(true);
        let toolbox = Toolbox::new(locator, RecordingRunner::new());

        let result = CometTask::run(
            &toolbox,
            &dir.path().join("comet.params"),
            &dir.path().join("db.fasta"),
            &spectra_files[..1],
        )
        .await;

        assert!(matches!(result, Err(PipelineError::RenameError(_, _, _))));
    }
}

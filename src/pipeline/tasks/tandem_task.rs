use std::path::{Path, PathBuf};

use metrics::counter;
use tracing::info;

use crate::{
    constants::{MGF_EXTENSION, RUNTANDEM_EXECUTABLE},
    pipeline::{
        configuration::TandemConfiguration,
        errors::pipeline_error::PipelineError,
        utils::{derive_path, directory_of, tandem_result_path, tandem_xml_path},
    },
    tools::{command::ToolCommand, runner::ProcessRunner, tool::Tool, toolbox::Toolbox},
};

use super::{proteowizard_task::ProteoWizardTask, task::Task};

/// Prefix for the X! Tandem counter
///
pub const COUNTER_PREFIX: &str = "proteotools_tandem";

/// Searches spectra with X! Tandem through `runtandem`
///
pub struct TandemTask;

impl TandemTask {
    /// Searches all spectra files with a single `runtandem` call and converts
    /// each result with the TPP's Tandem2XML. Results are written to the directory
    /// of the first spectra file as `<stem>-tandem.pepXML`.
    ///
    /// # Arguments
    /// * `toolbox` - Toolbox
    /// * `parameter_file` - X! Tandem input XML
    /// * `fasta` - Sequence database
    /// * `spectra_files` - Spectra files
    /// * `config` - X! Tandem configuration
    ///
    pub async fn run<R, P>(
        toolbox: &Toolbox<R>,
        parameter_file: &Path,
        fasta: &Path,
        spectra_files: &[P],
        config: &TandemConfiguration,
    ) -> Result<Vec<PathBuf>, PipelineError>
    where
        R: ProcessRunner,
        P: AsRef<Path>,
    {
        Self::ensure_input(spectra_files)?;
        toolbox.check(Tool::Tandem).await?;

        let mut search_files: Vec<PathBuf> = Vec::with_capacity(spectra_files.len());
        for spectra_file in spectra_files {
            let spectra_file = spectra_file.as_ref();
            if !config.convert_to_mgf {
                search_files.push(spectra_file.to_path_buf());
                continue;
            }
            let spectra_dir = directory_of(spectra_file);
            let mgf = derive_path(&spectra_dir, spectra_file, "", MGF_EXTENSION);
            if mgf.exists() {
                info!("Skipping msconvert, `{}` already exists", mgf.display());
                search_files.push(mgf);
                continue;
            }
            let mgf = ProteoWizardTask::msconvert_to_mgf(toolbox, spectra_file, &spectra_dir).await?;
            search_files.push(mgf);
        }

        // ensured above
        let output_dir = directory_of(&search_files[0]);

        info!("X! Tandem: {} files", search_files.len());
        let command = ToolCommand::new(Tool::Tandem.display_name(), RUNTANDEM_EXECUTABLE)
            .option("-i", parameter_file)
            .option("-db", fasta)
            .arg("--noconvert")
            .arg("--overwrite")
            .option("-o", &output_dir)
            .option("--tandem.exe", toolbox.path(Tool::Tandem))
            .option("-v", "2")
            .args(&search_files);
        toolbox.run(&command).await?;

        let mut pepxml_files = Vec::with_capacity(search_files.len());
        for search_file in search_files.iter() {
            let tandem_xml = tandem_xml_path(&output_dir, search_file);
            let pepxml = tandem_result_path(&output_dir, search_file);
            info!("Tandem2XML: {}", tandem_xml.display());
            let tandem2xml = ToolCommand::new("Tandem2XML", "Tandem2XML")
                .arg(&tandem_xml)
                .arg(&pepxml);
            toolbox
                .run_tpp(tandem2xml, &[output_dir.as_path()])
                .await?;
            counter!(Self::get_counter_name()).increment(1);
            pepxml_files.push(pepxml);
        }

        Ok(pepxml_files)
    }
}

impl Task for TandemTask {
    fn get_name() -> &'static str {
        "X! Tandem"
    }

    fn get_counter_prefix() -> &'static str {
        COUNTER_PREFIX
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::{
        pipeline::{configuration::ToolConfiguration, errors::tool_error::ToolError},
        tools::{locator::ToolLocator, testing::RecordingRunner},
    };

    fn setup(runner: RecordingRunner) -> (TempDir, Toolbox<RecordingRunner>) {
        let dir = tempdir().unwrap();
        let locator = ToolLocator::new(ToolConfiguration::new(dir.path().join("tools")));
        let tandem = locator.path(Tool::Tandem);
        create_dir_all(tandem.parent().unwrap()).unwrap();
        write(&tandem, "").unwrap();
        (dir, Toolbox::new(locator, runner))
    }

    #[tokio::test]
    async fn test_one_search_for_all_files() {
        let (dir, toolbox) = setup(RecordingRunner::simulating_tools());
        let spectra_files = vec![dir.path().join("a.mzML"), dir.path().join("b.mzML")];

        let pepxml_files = TandemTask::run(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &spectra_files,
            &TandemConfiguration::default(),
        )
        .await
        .unwrap();

        assert_eq!(
            pepxml_files,
            vec![
                dir.path().join("a-tandem.pepXML"),
                dir.path().join("b-tandem.pepXML")
            ]
        );
        assert!(pepxml_files.iter().all(|file| file.exists()));
        assert_eq!(
            toolbox.runner().run_names(),
            vec!["X! Tandem", "Tandem2XML", "Tandem2XML"]
        );
        let search = toolbox.runner().runs()[0].to_string();
        assert!(search.starts_with("runtandem -i "));
        assert!(search.contains(" --noconvert --overwrite -o "));
        assert!(search.ends_with(&format!(
            " -v 2 {} {}",
            spectra_files[0].display(),
            spectra_files[1].display()
        )));
    }

    #[tokio::test]
    async fn test_mgf_conversion_skips_existing() {
        let (dir, toolbox) = setup(RecordingRunner::simulating_tools());
        write(dir.path().join("a.mgf"), "").unwrap();
        let spectra_files = vec![dir.path().join("a.mzML"), dir.path().join("b.mzML")];
        let config = TandemConfiguration {
            convert_to_mgf: true,
            ..Default::default()
        };

        let pepxml_files = TandemTask::run(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &spectra_files,
            &config,
        )
        .await
        .unwrap();

        assert_eq!(pepxml_files.len(), 2);
        assert_eq!(
            toolbox.runner().run_names(),
            vec!["msconvert", "X! Tandem", "Tandem2XML", "Tandem2XML"]
        );
        assert!(toolbox.runner().runs()[1].to_string().ends_with(&format!(
            "{} {}",
            dir.path().join("a.mgf").display(),
            dir.path().join("b.mgf").display()
        )));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let (dir, toolbox) = setup(RecordingRunner::new());

        let result = TandemTask::run::<_, PathBuf>(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &[],
            &TandemConfiguration::default(),
        )
        .await;

        assert!(matches!(result, Err(PipelineError::NoInputFilesError(_))));
        assert!(toolbox.runner().commands().is_empty());
    }

    #[tokio::test]
    async fn test_failing_tandem2xml_stops_remaining_files() {
        // 0: search, 1: Tandem2XML a, 2: Tandem2XML b
        let (dir, toolbox) = setup(RecordingRunner::simulating_tools().with_failing_run(2));
        let spectra_files: Vec<PathBuf> = ["a.mzML", "b.mzML", "c.mzML"]
            .iter()
            .map(|name| dir.path().join(name))
            .collect();

        let result = TandemTask::run(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &spectra_files,
            &TandemConfiguration::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::ToolFailed(name))) if name == "Tandem2XML"
        ));
        assert_eq!(
            toolbox.runner().run_names(),
            vec!["X! Tandem", "Tandem2XML", "Tandem2XML"]
        );
        assert!(dir.path().join("a-tandem.pepXML").exists());
        assert!(!dir.path().join("b-tandem.pepXML").exists());
        assert!(!dir.path().join("c-tandem.pepXML").exists());
    }

    #[tokio::test]
    async fn test_failing_msconvert_stops_before_search() {
        // 0: msconvert a, 1: msconvert b
        let (dir, toolbox) = setup(RecordingRunner::simulating_tools().with_failing_run(1));
        let spectra_files = vec![
            dir.path().join("a.mzML"),
            dir.path().join("b.mzML"),
            dir.path().join("c.mzML"),
        ];
        let config = TandemConfiguration {
            convert_to_mgf: true,
            ..Default::default()
        };

        let result = TandemTask::run(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &spectra_files,
            &config,
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::ToolFailed(name))) if name == "msconvert"
        ));
        assert_eq!(toolbox.runner().run_names(), vec!["msconvert", "msconvert"]);
        assert!(dir.path().join("a.mgf").exists());
        assert!(!dir.path().join("c.mgf").exists());
    }

    #[tokio::test]
    async fn test_failing_search_stops_conversion() {
        let (dir, toolbox) = setup(RecordingRunner::simulating_tools().with_failing_run(0));

        let result = TandemTask::run(
            &toolbox,
            &dir.path().join("input.xml"),
            &dir.path().join("db.fasta"),
            &[dir.path().join("a.mzML")],
            &TandemConfiguration::default(),
        )
        .await;

        assert!(matches!(
            result,
            Err(PipelineError::ToolError(ToolError::ToolFailed(name))) if name == "X! Tandem"
        ));
        assert_eq!(toolbox.runner().runs().len(), 1);
    }
}

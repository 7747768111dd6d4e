use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::{
    constants::{DEFAULT_DECOY_TAG, DEFAULT_IPROPHET_OUTPUT_FILENAME, DEFAULT_TOOL_DIR_NAME},
    pipeline::errors::pipeline_error::PipelineError,
};

/// Install locations of the external tools.
/// Each tool path is joined onto `tool_dir`, so an absolute tool path
/// takes precedence over the tool directory.
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ToolConfiguration {
    /// Root directory with one subdirectory per tool
    pub tool_dir: PathBuf,
    /// ThermoRawFileParser executable (run with mono)
    pub thermorawfileparser: PathBuf,
    /// Comet executable
    pub comet: PathBuf,
    /// MS-GF+ jar
    pub msgfplus: PathBuf,
    /// X! Tandem executable
    pub tandem: PathBuf,
    /// Singularity image of the Trans-Proteomic Pipeline
    pub tpp: PathBuf,
    /// Singularity image of ProteoWizard (tools run with wine)
    pub proteowizard: PathBuf,
    /// Run ProteoWizard containers with `--writable-tmpfs`, wine needs a writable prefix
    pub proteowizard_writable_tmpfs: bool,
}

impl ToolConfiguration {
    /// Create a new default configuration rooted at the given tool directory
    ///
    /// # Arguments
    /// * `tool_dir` - Root directory of the tools
    ///
    pub fn new(tool_dir: PathBuf) -> Self {
        Self {
            tool_dir,
            ..Self::default()
        }
    }

    /// Default tool directory `~/.proteotools_software`.
    /// Falls back to a relative directory if there is no home directory.
    ///
    pub fn default_tool_dir() -> PathBuf {
        match BaseDirs::new() {
            Some(base_dirs) => base_dirs.home_dir().join(DEFAULT_TOOL_DIR_NAME),
            None => PathBuf::from(DEFAULT_TOOL_DIR_NAME),
        }
    }
}

/// Replaces a leading `~` with the home directory.
/// Paths without it or without a known home directory are returned unchanged.
///
/// # Arguments
/// * `path` - Path as written in the configuration
///
pub fn expand_home(path: &Path) -> PathBuf {
    let relative = match path.strip_prefix("~") {
        Ok(relative) => relative,
        Err(_) => return path.to_path_buf(),
    };
    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(relative),
        None => path.to_path_buf(),
    }
}

fn expand_home_in_place(path: &mut PathBuf) {
    *path = expand_home(path);
}

impl Default for ToolConfiguration {
    fn default() -> Self {
        Self {
            tool_dir: Self::default_tool_dir(),
            thermorawfileparser: PathBuf::from("ThermoRawFileParser/ThermoRawFileParser.exe"),
            comet: PathBuf::from("comet/comet.linux.exe"),
            msgfplus: PathBuf::from("msgfplus/MSGFPlus.jar"),
            tandem: PathBuf::from("tandem/bin/static_link_ubuntu/tandem.exe"),
            tpp: PathBuf::from("tpp/tpp_6-0-0.sif"),
            proteowizard: PathBuf::from(
                "proteowizard/pwiz-skyline-i-agree-to-the-vendor-licenses_latest.sif",
            ),
            proteowizard_writable_tmpfs: true,
        }
    }
}

/// Output formats of ThermoRawFileParser.
/// The discriminant is the value of its `-f` option.
///
#[derive(
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Mgf = 0,
    Mzml = 1,
    #[default]
    IndexedMzml = 2,
    Parquet = 3,
}

impl OutputFormat {
    /// Value passed to `-f`
    ///
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Extension of the written file
    ///
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mgf => "mgf",
            Self::Mzml | Self::IndexedMzml => "mzML",
            Self::Parquet => "parquet",
        }
    }
}

/// Conversion of Thermo raw files
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ConversionConfiguration {
    /// Output directory, if not set each file is written next to its raw file
    pub output_directory: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Optional metadata output file
    pub metadata_output_file: Option<PathBuf>,
    /// Gzip the output
    pub gzip_output: bool,
    /// Disable the native peak picking
    pub no_peak_picking: bool,
    /// Disable zlib compression of the binary arrays
    pub no_zlib_compression: bool,
    /// Convert again even if the output file exists
    pub clobber: bool,
}

/// Comet search
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CometConfiguration {
    /// Comet params file, the one in the tool directory is used if not set
    pub parameter_file: Option<PathBuf>,
}

/// MS-GF+ search
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MsgfPlusConfiguration {
    /// MS-GF+ configuration file, the one in the tool directory is used if not set
    pub parameter_file: Option<PathBuf>,
    /// Prefix of decoy entries in the FASTA file
    pub decoy_prefix: String,
    /// Maximum heap of the JVM, e.g. `8000M`
    pub memory: String,
    /// Convert the mzid into pepXML. No result is returned for a file if this is disabled.
    pub convert_to_pepxml: bool,
}

impl Default for MsgfPlusConfiguration {
    fn default() -> Self {
        Self {
            parameter_file: None,
            decoy_prefix: DEFAULT_DECOY_TAG.to_string(),
            memory: "8000M".to_string(),
            convert_to_pepxml: true,
        }
    }
}

/// X! Tandem search
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TandemConfiguration {
    /// X! Tandem input file, the one in the tool directory is used if not set
    pub parameter_file: Option<PathBuf>,
    /// Convert the spectra to MGF before searching
    pub convert_to_mgf: bool,
}

/// InteractParser, PeptideProphet and InterProphet
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProphetConfiguration {
    /// Decoy tag, left out of the commands if empty
    pub decoy_tag: String,
    /// Enzyme passed to InteractParser
    pub enzyme: String,
    /// Flags for PeptideProphetParser
    pub peptide_prophet_flags: Vec<String>,
    /// Additional arguments for InterProphetParser
    pub iprophet_flags: Vec<String>,
    /// Name of the InterProphet output, written next to the interact files
    pub iprophet_output_filename: String,
    /// Threads used by InterProphet
    pub threads: usize,
    /// Minimum probability for InterProphet
    pub iprophet_minprob: f64,
    /// Directory with the spectra files, defaults to the directory of the first pepXML
    pub mzml_directory: Option<PathBuf>,
    /// Drop inputs which already are InteractParser output
    pub skip_existing_interact_pepxmls: bool,
    /// Maximum peptide rank InteractParser keeps
    pub max_peptide_rank: u32,
}

impl Default for ProphetConfiguration {
    fn default() -> Self {
        Self {
            decoy_tag: DEFAULT_DECOY_TAG.to_string(),
            enzyme: "nonspecific".to_string(),
            peptide_prophet_flags: vec![
                "ZERO".to_string(),
                "NONPARAM".to_string(),
                "DECOYPROBS".to_string(),
            ],
            iprophet_flags: Vec::new(),
            iprophet_output_filename: DEFAULT_IPROPHET_OUTPUT_FILENAME.to_string(),
            threads: 12,
            iprophet_minprob: 0.0,
            mzml_directory: None,
            skip_existing_interact_pepxmls: true,
            max_peptide_rank: 1,
        }
    }
}

/// Configuration for the pipeline
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfiguration {
    /// Tool locations
    pub tools: ToolConfiguration,
    /// Raw file conversion
    pub conversion: ConversionConfiguration,
    /// Comet search
    pub comet: CometConfiguration,
    /// MS-GF+ search
    pub msgfplus: MsgfPlusConfiguration,
    /// X! Tandem search
    pub tandem: TandemConfiguration,
    /// Post processing
    pub prophets: ProphetConfiguration,
}

impl PipelineConfiguration {
    /// Create a new default configuration
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from a TOML file.
    /// Missing sections and keys fall back to their defaults.
    ///
    /// # Arguments
    /// * `path` - Path to the TOML file
    ///
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let content =
            read_to_string(path).map_err(|e| PipelineError::FileReadError(path.to_path_buf(), e))?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|e| PipelineError::ConfigDeserializationError(path.to_path_buf(), e))?;
        config.expand_home_dirs();
        Ok(config)
    }

    /// Expands a leading `~` in all configured paths
    ///
    fn expand_home_dirs(&mut self) {
        let tools = &mut self.tools;
        for path in [
            &mut tools.tool_dir,
            &mut tools.thermorawfileparser,
            &mut tools.comet,
            &mut tools.msgfplus,
            &mut tools.tandem,
            &mut tools.tpp,
            &mut tools.proteowizard,
        ] {
            expand_home_in_place(path);
        }
        for path in [
            &mut self.conversion.output_directory,
            &mut self.conversion.metadata_output_file,
            &mut self.comet.parameter_file,
            &mut self.msgfplus.parameter_file,
            &mut self.tandem.parameter_file,
            &mut self.prophets.mzml_directory,
        ]
        .into_iter()
        .flatten()
        {
            expand_home_in_place(path);
        }
    }
}

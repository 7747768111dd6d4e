// std imports
use std::path::{Path, PathBuf};

// 3rd party imports
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// internal imports
use proteotools::pipeline::configuration::{OutputFormat, PipelineConfiguration};
use proteotools::pipeline::pipeline::Pipeline;
use proteotools::pipeline::tasks::comet_task::CometTask;
use proteotools::pipeline::tasks::conversion_task::ConversionTask;
use proteotools::pipeline::tasks::msgfplus_task::MsgfPlusTask;
use proteotools::pipeline::tasks::post_processing_task::PostProcessingTask;
use proteotools::pipeline::tasks::proteowizard_task::{IdConvertFormat, ProteoWizardTask};
use proteotools::pipeline::tasks::tandem_task::TandemTask;
use proteotools::pipeline::utils::directory_of;
use proteotools::tools::tool::Tool;

/// Target for tracing
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TracingTarget {
    File,
    Terminal,
    All,
}

/// Log rotation values for CLI
///
#[derive(clap::ValueEnum, Clone, Debug)]
enum TracingLogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl From<TracingLogRotation> for Rotation {
    fn from(rotation: TracingLogRotation) -> Self {
        match rotation {
            TracingLogRotation::Minutely => Rotation::MINUTELY,
            TracingLogRotation::Hourly => Rotation::HOURLY,
            TracingLogRotation::Daily => Rotation::DAILY,
            TracingLogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints the pipeline configuration to stdout, the default one if `--config` is not given
    Config {},
    /// Checks if the given tools are installed, all tools if none are given
    Check {
        /// Tools to check: thermorawfileparser, comet, msgfplus, tandem, tpp, proteowizard
        tools: Vec<Tool>,
    },
    /// Converts Thermo raw files with ThermoRawFileParser
    Convert {
        /// Output directory, default: next to each raw file
        #[arg(short, long)]
        output_directory: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
        /// Convert even if the output exists
        #[arg(long)]
        clobber: bool,
        /// Raw files or directories containing raw files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Searches spectra with Comet
    Comet {
        /// Comet params file, default: the one shipped with Comet
        #[arg(short, long)]
        parameter_file: Option<PathBuf>,
        /// Sequence database
        fasta: PathBuf,
        /// Spectra files
        #[arg(required = true)]
        spectra_files: Vec<PathBuf>,
    },
    /// Searches spectra with MS-GF+
    Msgfplus {
        /// MS-GF+ configuration file, default: the one shipped with MS-GF+
        #[arg(short, long)]
        parameter_file: Option<PathBuf>,
        /// Keep the mzid results without converting them to pepXML
        #[arg(long)]
        no_pepxml: bool,
        /// Sequence database
        fasta: PathBuf,
        /// Spectra files
        #[arg(required = true)]
        spectra_files: Vec<PathBuf>,
    },
    /// Searches spectra with X! Tandem
    Tandem {
        /// X! Tandem input XML, default: the one shipped with X! Tandem
        #[arg(short, long)]
        parameter_file: Option<PathBuf>,
        /// Convert the spectra to MGF with msconvert first
        #[arg(long)]
        convert_to_mgf: bool,
        /// Sequence database
        fasta: PathBuf,
        /// Spectra files
        #[arg(required = true)]
        spectra_files: Vec<PathBuf>,
    },
    /// Runs InteractParser, PeptideProphet and InterProphet on search results
    Prophets {
        /// Directory containing the spectra, default: directory of the first pepXML file
        #[arg(short, long)]
        mzml_directory: Option<PathBuf>,
        /// Sequence database
        fasta: PathBuf,
        /// pepXML files
        #[arg(required = true)]
        pepxml_files: Vec<PathBuf>,
    },
    /// Searches spectra with Comet, MS-GF+ and X! Tandem
    Search {
        /// Sequence database
        fasta: PathBuf,
        /// Spectra files
        #[arg(required = true)]
        spectra_files: Vec<PathBuf>,
    },
    /// Converts raw files, searches them with all engines and post processes the results
    Run {
        /// Sequence database
        fasta: PathBuf,
        /// Raw files or directories containing raw files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Converts identification files with ProteoWizard's idconvert
    Idconvert {
        /// Output directory, default: directory of the input file
        #[arg(short, long)]
        output_directory: Option<PathBuf>,
        /// Extension of the output file
        #[arg(short, long, default_value = ".pepXML")]
        extension: String,
        /// Output format: pepXML, mzIdentML or text
        #[arg(short, long, default_value = "pepXML")]
        format: IdConvertFormat,
        /// Identification file
        input: PathBuf,
    },
    /// Prints the usage of a tool inside the TPP or ProteoWizard image
    ToolHelp {
        /// Image containing the tool: tpp or proteowizard
        image: Tool,
        /// Tool name, e.g. InteractParser
        tool_name: String,
    },
}

#[derive(Debug, Parser)]
#[command(name = "proteotools")]
struct Cli {
    /// Verbosity level
    /// 0 - Error
    /// 1 - Warn
    /// 2 - Info
    /// 3 - Debug
    /// > 3 - Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// How to log tracing. Can be used multiple times, default: terminal
    #[arg(short, long, value_enum, action = clap::ArgAction::Append)]
    tracing_target: Vec<TracingTarget>,
    /// Tracing log file. Only used if `file` is set in `tracing_target`.
    #[arg(long, default_value = "./logs/proteotools.log")]
    log_file: PathBuf,
    /// Tracing log rotation. Only used if `file` is set in `tracing_target`.
    #[arg(short, long, value_enum, default_value = "never")]
    rotation: TracingLogRotation,
    /// Pipeline configuration (TOML), default: built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

fn load_config(config_path: Option<&Path>) -> Result<PipelineConfiguration> {
    match config_path {
        Some(config_path) => PipelineConfiguration::from_file(config_path)
            .with_context(|| format!("Loading configuration `{}`", config_path.display())),
        None => Ok(PipelineConfiguration::new()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();

    //// Set up tracing
    let verbosity = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(verbosity.into());

    let to_terminal = args.tracing_target.is_empty()
        || args.tracing_target.contains(&TracingTarget::Terminal)
        || args.tracing_target.contains(&TracingTarget::All);
    let to_file = args.tracing_target.contains(&TracingTarget::File)
        || args.tracing_target.contains(&TracingTarget::All);

    // Tracing layers
    let mut tracing_terminal_layer = None;
    let mut tracing_file_layer = None;

    // Tracing guards
    let mut _tracing_log_writer_guard = None;

    if to_terminal {
        tracing_terminal_layer = Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    }

    if to_file {
        let log_dir = directory_of(&args.log_file);
        let log_file_name = args
            .log_file
            .file_name()
            .context("Log file path has no file name")?;
        let file_appender = RollingFileAppender::new(args.rotation.into(), log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_file_layer = Some(tracing_subscriber::fmt::layer().with_writer(non_blocking));
        _tracing_log_writer_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(tracing_terminal_layer)
        .with(tracing_file_layer)
        .with(filter)
        .init();

    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        Commands::Config {} => {
            println!(
                "{}",
                toml::to_string_pretty(&config).context("Serializing configuration")?
            );
        }
        Commands::Check { tools } => {
            let tools = if tools.is_empty() {
                Tool::ALL.to_vec()
            } else {
                tools
            };
            let pipeline = Pipeline::local(config);
            println!(
                "Tool directory: {}",
                pipeline.toolbox().locator().tool_dir().display()
            );
            let mut missing = 0;
            for tool in tools {
                match pipeline.toolbox().check(tool).await {
                    Ok(_) => println!("{}: found", tool),
                    Err(err) => {
                        println!("{}: {}", tool, err);
                        missing += 1;
                    }
                }
            }
            if missing > 0 {
                bail!("{} tool(s) missing", missing);
            }
        }
        Commands::Convert {
            output_directory,
            format,
            clobber,
            inputs,
        } => {
            if output_directory.is_some() {
                config.conversion.output_directory = output_directory;
            }
            if let Some(format) = format {
                config.conversion.format = format;
            }
            config.conversion.clobber |= clobber;
            let pipeline = Pipeline::local(config);
            let converted =
                ConversionTask::run(pipeline.toolbox(), &inputs, &pipeline.config().conversion)
                    .await
                    .context("Converting raw files")?;
            print_paths(&converted);
        }
        Commands::Comet {
            parameter_file,
            fasta,
            spectra_files,
        } => {
            let pipeline = Pipeline::local(config);
            let parameter_file = pipeline.parameter_file(
                parameter_file
                    .as_deref()
                    .or(pipeline.config().comet.parameter_file.as_deref()),
                Tool::Comet,
            )?;
            let pepxml_files =
                CometTask::run(pipeline.toolbox(), &parameter_file, &fasta, &spectra_files)
                    .await
                    .context("Comet search")?;
            print_paths(&pepxml_files);
        }
        Commands::Msgfplus {
            parameter_file,
            no_pepxml,
            fasta,
            spectra_files,
        } => {
            config.msgfplus.convert_to_pepxml &= !no_pepxml;
            let pipeline = Pipeline::local(config);
            let parameter_file = pipeline.parameter_file(
                parameter_file
                    .as_deref()
                    .or(pipeline.config().msgfplus.parameter_file.as_deref()),
                Tool::MsgfPlus,
            )?;
            let pepxml_files = MsgfPlusTask::run(
                pipeline.toolbox(),
                &parameter_file,
                &fasta,
                &spectra_files,
                &pipeline.config().msgfplus,
            )
            .await
            .context("MS-GF+ search")?;
            print_paths(&pepxml_files);
        }
        Commands::Tandem {
            parameter_file,
            convert_to_mgf,
            fasta,
            spectra_files,
        } => {
            config.tandem.convert_to_mgf |= convert_to_mgf;
            let pipeline = Pipeline::local(config);
            let parameter_file = pipeline.parameter_file(
                parameter_file
                    .as_deref()
                    .or(pipeline.config().tandem.parameter_file.as_deref()),
                Tool::Tandem,
            )?;
            let pepxml_files = TandemTask::run(
                pipeline.toolbox(),
                &parameter_file,
                &fasta,
                &spectra_files,
                &pipeline.config().tandem,
            )
            .await
            .context("X! Tandem search")?;
            print_paths(&pepxml_files);
        }
        Commands::Prophets {
            mzml_directory,
            fasta,
            pepxml_files,
        } => {
            if mzml_directory.is_some() {
                config.prophets.mzml_directory = mzml_directory;
            }
            let pipeline = Pipeline::local(config);
            let combined = PostProcessingTask::run_prophets(
                pipeline.toolbox(),
                &pepxml_files,
                &fasta,
                &pipeline.config().prophets,
            )
            .await
            .context("Post processing")?;
            print_paths(&[combined]);
        }
        Commands::Search {
            fasta,
            spectra_files,
        } => {
            let pipeline = Pipeline::local(config);
            let pepxml_files = pipeline
                .run_searches(&fasta, &spectra_files)
                .await
                .context("Search")?;
            print_paths(&pepxml_files);
        }
        Commands::Run { fasta, inputs } => {
            let pipeline = Pipeline::local(config);
            match pipeline.run(&inputs, &fasta).await {
                Ok(combined) => print_paths(&[combined]),
                Err(err) => {
                    error!("Pipeline failed: {}", err);
                    return Err(err).context("Pipeline");
                }
            }
        }
        Commands::Idconvert {
            output_directory,
            extension,
            format,
            input,
        } => {
            let output_directory = output_directory.unwrap_or_else(|| directory_of(&input));
            let pipeline = Pipeline::local(config);
            let output = ProteoWizardTask::idconvert(
                pipeline.toolbox(),
                &input,
                &output_directory,
                &extension,
                format,
            )
            .await
            .context("idconvert")?;
            print_paths(&[output]);
        }
        Commands::ToolHelp { image, tool_name } => {
            if !matches!(image, Tool::Tpp | Tool::ProteoWizard) {
                bail!("`{}` is not an image, use tpp or proteowizard", image.key());
            }
            let pipeline = Pipeline::local(config);
            pipeline
                .toolbox()
                .tool_help(image, &tool_name)
                .await
                .with_context(|| format!("Running {} help", tool_name))?;
        }
    }

    info!("Done");
    Ok(())
}

/// Prints each result path on its own line
///
fn print_paths(paths: &[PathBuf]) {
    for path in paths {
        println!("{}", path.display());
    }
}

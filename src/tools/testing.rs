//! Process runner for tests which records commands instead of spawning them.
//! It can fail a specific run and simulate the files the real tools write.

use std::{
    ffi::OsString,
    fs::write,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use super::{
    command::{Argument, ToolCommand},
    runner::ProcessRunner,
};

type SideEffect = Box<dyn Fn(&ToolCommand)>;

pub struct RecordingRunner {
    records: Mutex<Vec<(ToolCommand, bool)>>,
    failing_run: Option<usize>,
    failing_probes: Vec<String>,
    side_effect: Option<SideEffect>,
}

impl RecordingRunner {
    /// Runner where every command succeeds without side effects
    ///
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            failing_run: None,
            failing_probes: Vec::new(),
            side_effect: None,
        }
    }

    /// Runner which writes the output files the real tools would write
    ///
    pub fn simulating_tools() -> Self {
        Self::new().with_side_effect(simulate_outputs)
    }

    /// Lets the run with the given zero based index exit unsuccessfully
    ///
    pub fn with_failing_run(mut self, index: usize) -> Self {
        self.failing_run = Some(index);
        self
    }

    /// Lets probes of the given program fail
    ///
    pub fn with_failing_probe(mut self, program: &str) -> Self {
        self.failing_probes.push(program.to_string());
        self
    }

    pub fn with_side_effect(mut self, side_effect: impl Fn(&ToolCommand) + 'static) -> Self {
        self.side_effect = Some(Box::new(side_effect));
        self
    }

    /// All executed commands
    ///
    pub fn commands(&self) -> Vec<ToolCommand> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    /// Commands executed with inherited output
    ///
    pub fn runs(&self) -> Vec<ToolCommand> {
        self.filtered(false)
    }

    /// Quiet commands, e.g. version checks
    ///
    pub fn probes(&self) -> Vec<ToolCommand> {
        self.filtered(true)
    }

    /// Names of the commands executed with inherited output
    ///
    pub fn run_names(&self) -> Vec<String> {
        self.runs()
            .iter()
            .map(|command| command.name().to_string())
            .collect()
    }

    fn filtered(&self, quiet: bool) -> Vec<ToolCommand> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, is_quiet)| *is_quiet == quiet)
            .map(|(command, _)| command.clone())
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    async fn execute(&self, command: &ToolCommand, quiet: bool) -> io::Result<bool> {
        let run_index = self.runs().len();
        self.records
            .lock()
            .unwrap()
            .push((command.clone(), quiet));

        if quiet {
            let program = command.program().to_string_lossy().to_string();
            return Ok(!self.failing_probes.contains(&program));
        }
        if self.failing_run == Some(run_index) {
            return Ok(false);
        }
        if let Some(side_effect) = &self.side_effect {
            side_effect(command);
        }
        Ok(true)
    }
}

/// Positional values of the command following the first value equal to `marker`,
/// all positional values if `marker` is `None`.
///
pub fn values_after(command: &ToolCommand, marker: Option<&str>) -> Vec<OsString> {
    let mut found = marker.is_none();
    let mut values = Vec::new();
    for argument in command.arguments() {
        if let Argument::Value(value) = argument {
            if found {
                values.push(value.clone());
            } else if value.to_str() == marker {
                found = true;
            }
        }
    }
    values
}

/// Value of an option, separate or attached
///
pub fn option_value(command: &ToolCommand, key: &str) -> Option<OsString> {
    command.arguments().iter().find_map(|argument| match argument {
        Argument::Option(k, value) | Argument::Attached(k, value) if k == key => {
            Some(value.clone())
        }
        _ => None,
    })
}

fn touch(path: &Path) {
    write(path, "").unwrap();
}

/// Writes the files the real tools would produce for the given command
///
pub fn simulate_outputs(command: &ToolCommand) {
    match command.name() {
        "Comet" => {
            let mut base_name = option_value(command, "-N").unwrap();
            base_name.push(".pep.xml");
            touch(Path::new(&base_name));
        }
        "MS-GF+" => touch(Path::new(&option_value(command, "-o").unwrap())),
        "idconvert" => {
            let input = PathBuf::from(&values_after(command, Some("idconvert"))[0]);
            let output_dir = PathBuf::from(option_value(command, "-o").unwrap());
            let mut file_name = input.file_stem().unwrap().to_os_string();
            file_name.push(option_value(command, "-e").unwrap());
            touch(&output_dir.join(file_name));
        }
        "msconvert" => {
            let input = PathBuf::from(&values_after(command, Some("msconvert"))[0]);
            let output_dir = PathBuf::from(option_value(command, "-o").unwrap());
            touch(&output_dir.join(input.with_extension("mgf").file_name().unwrap()));
        }
        "X! Tandem" => {
            let output_dir = PathBuf::from(option_value(command, "-o").unwrap());
            for value in values_after(command, None) {
                if value.to_string_lossy().starts_with("--") {
                    continue;
                }
                let stem = PathBuf::from(value).file_stem().unwrap().to_os_string();
                let mut file_name = stem;
                file_name.push(".t.xml");
                touch(&output_dir.join(file_name));
            }
        }
        "Tandem2XML" => {
            touch(Path::new(&values_after(command, Some("Tandem2XML"))[1]));
        }
        "InteractParser" => {
            touch(Path::new(&values_after(command, Some("InteractParser"))[0]));
        }
        "InterProphetParser" => {
            let values = values_after(command, Some("InterProphetParser"));
            touch(Path::new(values.last().unwrap()));
        }
        "ThermoRawFileParser" => {
            let raw_file = PathBuf::from(option_value(command, "-i").unwrap());
            let output_dir = PathBuf::from(option_value(command, "-o").unwrap());
            let extension = match option_value(command, "-f").unwrap().to_str().unwrap() {
                "0" => "mgf",
                "3" => "parquet",
                _ => "mzML",
            };
            touch(&output_dir.join(raw_file.with_extension(extension).file_name().unwrap()));
        }
        _ => (),
    }
}

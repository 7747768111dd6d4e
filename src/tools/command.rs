// std imports
use std::ffi::{OsStr, OsString};
use std::fmt;

// 3rd party imports
use tokio::process::Command;

/// Single argument of a tool command
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Positional value or standalone flag, e.g. `-C`
    Value(OsString),
    /// Option followed by its value as separate argument, e.g. `-o <dir>`
    Option(String, OsString),
    /// Option with its value attached, e.g. `-D<fasta>`
    Attached(String, OsString),
    /// Key-value assignment as used by the TPP, e.g. `DECOY=rev_`
    Assignment(String, String),
}

impl Argument {
    /// Appends the serialized argument to the given vector.
    ///
    fn serialize_into(&self, args: &mut Vec<OsString>) {
        match self {
            Self::Value(value) => args.push(value.clone()),
            Self::Option(key, value) => {
                args.push(OsString::from(key));
                args.push(value.clone());
            }
            Self::Attached(key, value) => {
                let mut arg = OsString::from(key);
                arg.push(value);
                args.push(arg);
            }
            Self::Assignment(key, value) => args.push(OsString::from(format!("{key}={value}"))),
        }
    }
}

/// Command line of an external tool.
/// Arguments are kept structured and only serialized when the process is spawned,
/// so paths with whitespace never get split.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Name used in logs and errors
    name: String,
    program: OsString,
    arguments: Vec<Argument>,
}

impl ToolCommand {
    /// Creates a new command without arguments
    ///
    /// # Arguments
    /// * `name` - Tool name used in logs and errors
    /// * `program` - Program to execute
    ///
    pub fn new(name: impl Into<String>, program: impl AsRef<OsStr>) -> Self {
        Self {
            name: name.into(),
            program: program.as_ref().to_os_string(),
            arguments: Vec::new(),
        }
    }

    /// Adds a positional argument
    ///
    pub fn arg(mut self, value: impl AsRef<OsStr>) -> Self {
        self.arguments
            .push(Argument::Value(value.as_ref().to_os_string()));
        self
    }

    /// Adds multiple positional arguments
    ///
    pub fn args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.arguments.extend(
            values
                .into_iter()
                .map(|value| Argument::Value(value.as_ref().to_os_string())),
        );
        self
    }

    /// Adds an option with its value as separate argument
    ///
    pub fn option(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.arguments.push(Argument::Option(
            key.to_string(),
            value.as_ref().to_os_string(),
        ));
        self
    }

    /// Adds an option with the value attached to it
    ///
    pub fn attached(mut self, key: &str, value: impl AsRef<OsStr>) -> Self {
        self.arguments.push(Argument::Attached(
            key.to_string(),
            value.as_ref().to_os_string(),
        ));
        self
    }

    /// Adds a `KEY=value` argument
    ///
    pub fn assignment(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.arguments
            .push(Argument::Assignment(key.to_string(), value.to_string()));
        self
    }

    /// Adds the flag only if `enabled` is true
    ///
    pub fn flag_if(self, enabled: bool, flag: &str) -> Self {
        if enabled {
            self.arg(flag)
        } else {
            self
        }
    }

    /// Appends the program and arguments of another command, e.g. to run it in a container.
    /// The name of the inner command is kept.
    ///
    /// # Arguments
    /// * `inner` - Command to append
    ///
    pub fn wrap(mut self, inner: ToolCommand) -> Self {
        self.name = inner.name;
        self.arguments.push(Argument::Value(inner.program));
        self.arguments.extend(inner.arguments);
        self
    }

    /// Tool name
    ///
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Program to execute
    ///
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Structured arguments
    ///
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Serialized arguments as passed to the process
    ///
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(self.arguments.len());
        for argument in self.arguments.iter() {
            argument.serialize_into(&mut args);
        }
        args
    }

    /// Creates the process command. Standard streams are inherited.
    ///
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.to_args());
        command
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in self.to_args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization() {
        let command = ToolCommand::new("Comet", "/opt/comet.exe")
            .attached("-D", "/data/human db.fasta")
            .option("-o", "/data/out")
            .assignment("DECOY", "rev_")
            .flag_if(true, "-g")
            .flag_if(false, "-p")
            .arg("/data/a.mzML");

        assert_eq!(
            command.to_args(),
            vec![
                OsString::from("-D/data/human db.fasta"),
                OsString::from("-o"),
                OsString::from("/data/out"),
                OsString::from("DECOY=rev_"),
                OsString::from("-g"),
                OsString::from("/data/a.mzML"),
            ]
        );
        assert_eq!(
            command.to_string(),
            "/opt/comet.exe -D/data/human db.fasta -o /data/out DECOY=rev_ -g /data/a.mzML"
        );
    }

    #[test]
    fn test_wrap_keeps_inner_name() {
        let inner = ToolCommand::new("InteractParser", "InteractParser").arg("out.pep.xml");
        let command = ToolCommand::new("singularity", "singularity")
            .arg("exec")
            .wrap(inner);

        assert_eq!(command.name(), "InteractParser");
        assert_eq!(command.program(), OsStr::new("singularity"));
        assert_eq!(
            command.to_args(),
            vec![
                OsString::from("exec"),
                OsString::from("InteractParser"),
                OsString::from("out.pep.xml"),
            ]
        );
    }
}

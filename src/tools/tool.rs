use std::{fmt, str::FromStr};

/// External tools the pipeline depends on
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    ThermoRawFileParser,
    Comet,
    MsgfPlus,
    Tandem,
    /// Trans-Proteomic Pipeline image
    Tpp,
    /// ProteoWizard image
    ProteoWizard,
}

impl Tool {
    /// All tools in pipeline order
    ///
    pub const ALL: [Tool; 6] = [
        Tool::ThermoRawFileParser,
        Tool::Comet,
        Tool::MsgfPlus,
        Tool::Tandem,
        Tool::Tpp,
        Tool::ProteoWizard,
    ];

    /// Logical name as used in configurations and on the command line
    ///
    pub fn key(&self) -> &'static str {
        match self {
            Self::ThermoRawFileParser => "thermorawfileparser",
            Self::Comet => "comet",
            Self::MsgfPlus => "msgfplus",
            Self::Tandem => "tandem",
            Self::Tpp => "tpp",
            Self::ProteoWizard => "proteowizard",
        }
    }

    /// Human readable name
    ///
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ThermoRawFileParser => "ThermoRawFileParser",
            Self::Comet => "Comet",
            Self::MsgfPlus => "MS-GF+",
            Self::Tandem => "X! Tandem",
            Self::Tpp => "TPP Singularity image",
            Self::ProteoWizard => "ProteoWizard Singularity image",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|tool| tool.key().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| {
                format!(
                    "Unknown tool `{}`, expected one of: {}",
                    s,
                    Self::ALL.map(|tool| tool.key()).join(", ")
                )
            })
    }
}

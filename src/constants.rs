/// Name of the default tool directory within the user's home
///
pub const DEFAULT_TOOL_DIR_NAME: &str = ".proteotools_software";

/// Suffix marking Comet results
///
pub const COMET_SUFFIX: &str = "-comet";

/// Suffix marking MS-GF+ results
///
pub const MSGF_PLUS_SUFFIX: &str = "-msgf_plus";

/// Suffix marking X! Tandem results
///
pub const TANDEM_SUFFIX: &str = "-tandem";

/// Extension of the normalized search results
///
pub const PEPXML_EXTENSION: &str = "pepXML";

/// Extension Comet writes its pepXML with
///
pub const COMET_PEPXML_EXTENSION: &str = "pep.xml";

/// Extension of MS-GF+ identification files
///
pub const MZID_EXTENSION: &str = "mzid";

/// Extension of native X! Tandem results
///
pub const TANDEM_XML_EXTENSION: &str = "t.xml";

/// Extension of MGF files
///
pub const MGF_EXTENSION: &str = "mgf";

/// Extension of Thermo raw files
///
pub const RAW_EXTENSION: &str = "raw";

/// Prefix InteractParser output is named with
///
pub const INTERACT_PREFIX: &str = "interact-";

/// Default decoy prefix/tag
///
pub const DEFAULT_DECOY_TAG: &str = "rev_";

/// Default InterProphet output file name
///
pub const DEFAULT_IPROPHET_OUTPUT_FILENAME: &str = "interact-iproph.pep.xml";

/// Container runtime used for TPP and ProteoWizard
///
pub const SINGULARITY_EXECUTABLE: &str = "singularity";

/// .NET runtime used for ThermoRawFileParser
///
pub const MONO_EXECUTABLE: &str = "mono";

/// Java runtime used for MS-GF+
///
pub const JAVA_EXECUTABLE: &str = "java";

/// Wrapper script driving X! Tandem
///
pub const RUNTANDEM_EXECUTABLE: &str = "runtandem";

/// Windows emulation used inside the ProteoWizard image
///
pub const WINE_EXECUTABLE: &str = "wine";

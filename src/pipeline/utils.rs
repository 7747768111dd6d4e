use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::constants::{
    COMET_SUFFIX, INTERACT_PREFIX, MSGF_PLUS_SUFFIX, MZID_EXTENSION, PEPXML_EXTENSION,
    TANDEM_SUFFIX, TANDEM_XML_EXTENSION,
};

/// Directory containing the file, `.` for bare file names
///
/// # Arguments
/// * `path` - File path
///
pub fn directory_of(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Path in `dir` named `<stem of path><suffix>[.<extension>]`
///
/// # Arguments
/// * `dir` - Target directory
/// * `path` - File whose stem is used
/// * `suffix` - Suffix appended to the stem
/// * `extension` - Extension, none is added if empty
///
pub fn derive_path(dir: &Path, path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let mut file_name: OsString = path.file_stem().unwrap_or_default().to_os_string();
    file_name.push(suffix);
    if !extension.is_empty() {
        file_name.push(".");
        file_name.push(extension);
    }
    dir.join(file_name)
}

/// Base name Comet writes its results to, e.g. `/data/sample-comet`
///
pub fn comet_base_name(spectra_file: &Path) -> PathBuf {
    derive_path(&directory_of(spectra_file), spectra_file, COMET_SUFFIX, "")
}

/// Normalized Comet result, e.g. `/data/sample-comet.pepXML`
///
pub fn comet_result_path(spectra_file: &Path) -> PathBuf {
    derive_path(
        &directory_of(spectra_file),
        spectra_file,
        COMET_SUFFIX,
        PEPXML_EXTENSION,
    )
}

/// MS-GF+ identification file, e.g. `/data/sample-msgf_plus.mzid`
///
pub fn msgf_plus_mzid_path(spectra_file: &Path) -> PathBuf {
    derive_path(
        &directory_of(spectra_file),
        spectra_file,
        MSGF_PLUS_SUFFIX,
        MZID_EXTENSION,
    )
}

/// Normalized MS-GF+ result, e.g. `/data/sample-msgf_plus.pepXML`
///
pub fn msgf_plus_result_path(spectra_file: &Path) -> PathBuf {
    derive_path(
        &directory_of(spectra_file),
        spectra_file,
        MSGF_PLUS_SUFFIX,
        PEPXML_EXTENSION,
    )
}

/// Native X! Tandem result in the output directory, e.g. `/out/sample.t.xml`
///
pub fn tandem_xml_path(output_dir: &Path, spectra_file: &Path) -> PathBuf {
    derive_path(output_dir, spectra_file, "", TANDEM_XML_EXTENSION)
}

/// Normalized X! Tandem result in the output directory, e.g. `/out/sample-tandem.pepXML`
///
pub fn tandem_result_path(output_dir: &Path, spectra_file: &Path) -> PathBuf {
    derive_path(output_dir, spectra_file, TANDEM_SUFFIX, PEPXML_EXTENSION)
}

/// InteractParser output next to the input, e.g. `/data/interact-sample-comet.pepXML`
///
pub fn interact_path(pepxml_file: &Path) -> PathBuf {
    let mut file_name = OsString::from(INTERACT_PREFIX);
    file_name.push(pepxml_file.file_name().unwrap_or_default());
    directory_of(pepxml_file).join(file_name)
}

/// True if the file is named like InteractParser output
///
pub fn is_interact_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(INTERACT_PREFIX))
        .unwrap_or(false)
}

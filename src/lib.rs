// Include readme in doc
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Readme.md"))]

/// Shared constants, e.g. result file suffixes and host executables
pub mod constants;
/// Conversion, search and post processing stages
pub mod pipeline;
/// Locating, checking and running the external tools
pub mod tools;

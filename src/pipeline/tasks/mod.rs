/// Task converting Thermo raw files
pub mod conversion_task;
/// Comet search
pub mod comet_task;
/// MS-GF+ search
pub mod msgfplus_task;
/// X! Tandem search
pub mod tandem_task;
/// InteractParser, PeptideProphet and InterProphet
pub mod post_processing_task;
/// idconvert and msconvert from the ProteoWizard image
pub mod proteowizard_task;
/// Trait for defining some shared behavior for the tasks
pub mod task;

//! Data structures of the cutlist pipeline

// Declare all submodules
mod cutlist;
mod options;
mod report;
mod size;

// Re-export all public types from the size module
pub use size::Size;

// Re-export all public types from the cutlist module
pub use cutlist::{Cutlist, GroupKey, GroupRecord, PartRecord, Status};

// Re-export all public types from the options module
pub use options::{CutlistOptions, CutlistParams, StandardThicknesses};

// Re-export all public types from the report module
pub use report::{Report, ReportGroup, ReportPart};

//! Final, ordered and numbered cutlist report

use super::cutlist::Status;
use crate::error::Result;
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};

/// Report handed to the presentation layer
///
/// Groups are ordered by material name ascending, then raw thickness
/// descending. Parts inside a group are ordered by thickness, length and
/// width, all descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Generation status
    pub status: Status,
    /// Advisory errors (e.g. nothing found)
    pub errors: Vec<String>,
    /// Advisory warnings
    pub warnings: Vec<String>,
    /// Scene display name or path
    pub filepath: String,
    /// Linear unit of every length in the report
    pub length_unit: LengthUnit,
    /// Ordered groups
    pub groups: Vec<ReportGroup>,
}

/// One material/thickness group of a [`Report`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportGroup {
    /// Stable group id
    pub id: String,
    /// Material name
    pub material_name: String,
    /// Number of instances in the group
    pub part_count: usize,
    /// Raw thickness in the report's length unit
    pub raw_thickness: f64,
    /// Whether the raw thickness is a catalog value
    pub raw_thickness_available: bool,
    /// Sum of the raw areas of the distinct parts, in m²
    pub raw_area_m2: f64,
    /// Sum of the raw volumes of the distinct parts, in m³
    pub raw_volume_m3: f64,
    /// Ordered, numbered parts
    pub parts: Vec<ReportPart>,
}

/// One numbered part line of a [`ReportGroup`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPart {
    /// Part name
    pub name: String,
    /// Nominal length
    pub length: f64,
    /// Nominal width
    pub width: f64,
    /// Nominal thickness
    pub thickness: f64,
    /// Number of instances
    pub count: usize,
    /// Length with margin
    pub raw_length: f64,
    /// Width with margin
    pub raw_width: f64,
    /// Part number (`"1"`, `"A"`, …)
    pub number: String,
    /// Unique identifiers of the source instances
    pub component_guids: Vec<String>,
}

impl Report {
    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report previously produced by [`Report::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether the report has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

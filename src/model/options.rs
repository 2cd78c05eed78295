//! Options controlling cutlist generation

use crate::error::{Error, Result};
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};

/// Ascending catalog of stocked raw thicknesses, in scene units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardThicknesses {
    values: Vec<f64>,
}

impl StandardThicknesses {
    /// Create a catalog from values already in scene units
    ///
    /// Values must be finite, positive and strictly ascending.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        let catalog = Self { values };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a `;`-separated list such as `"12;18;22"`
    ///
    /// Entries without a unit suffix are millimeters. Each entry is converted
    /// into `unit`; empty entries are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use cutlist::{LengthUnit, StandardThicknesses};
    ///
    /// let catalog = StandardThicknesses::parse("12; 18;;2.2cm", LengthUnit::Millimeter).unwrap();
    /// assert_eq!(catalog.as_slice(), &[12.0, 18.0, 22.0]);
    /// ```
    pub fn parse(text: &str, unit: LengthUnit) -> Result<Self> {
        let values = text
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| unit.parse_length(entry, LengthUnit::Millimeter))
            .collect::<Result<Vec<_>>>()?;
        Self::new(values)
    }

    /// Catalog values in ascending order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn validate(&self) -> Result<()> {
        for value in &self.values {
            if !value.is_finite() || *value <= 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "Standard thickness {} must be a positive length",
                    value
                )));
            }
        }
        if let Some(pair) = self.values.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidOptions(format!(
                "Standard thicknesses must be strictly ascending ({} is followed by {})",
                pair[0], pair[1]
            )));
        }
        Ok(())
    }
}

/// Typed options for [`generate_cutlist`](crate::generate_cutlist)
///
/// All lengths are in the scene's length unit.
///
/// # Example
///
/// ```
/// use cutlist::{CutlistOptions, StandardThicknesses};
///
/// let options = CutlistOptions::new()
///     .with_length_increase(50.0)
///     .with_width_increase(5.0)
///     .with_standard_thicknesses(StandardThicknesses::new(vec![18.0, 22.0]).unwrap())
///     .with_letter_numbering(true);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutlistOptions {
    /// Margin added to every part length
    pub length_increase: f64,
    /// Margin added to every part width
    pub width_increase: f64,
    /// Margin added to every part thickness before catalog resolution
    pub thickness_increase: f64,
    /// Stocked thicknesses raw thicknesses are rounded up to
    pub standard_thicknesses: StandardThicknesses,
    /// Number parts `A, B, …` instead of `1, 2, …`
    pub part_number_letter: bool,
    /// Restart numbering for every group
    pub part_number_sequence_by_group: bool,
}

impl CutlistOptions {
    /// Options with no margins, no catalog and numeric numbering across the report
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the length margin
    pub fn with_length_increase(mut self, value: f64) -> Self {
        self.length_increase = value;
        self
    }

    /// Set the width margin
    pub fn with_width_increase(mut self, value: f64) -> Self {
        self.width_increase = value;
        self
    }

    /// Set the thickness margin
    pub fn with_thickness_increase(mut self, value: f64) -> Self {
        self.thickness_increase = value;
        self
    }

    /// Set the standard thickness catalog
    pub fn with_standard_thicknesses(mut self, catalog: StandardThicknesses) -> Self {
        self.standard_thicknesses = catalog;
        self
    }

    /// Use letters (`A`, `B`, …) for part numbers
    pub fn with_letter_numbering(mut self, enabled: bool) -> Self {
        self.part_number_letter = enabled;
        self
    }

    /// Restart the part number sequence in every group
    pub fn with_sequence_by_group(mut self, enabled: bool) -> Self {
        self.part_number_sequence_by_group = enabled;
        self
    }

    /// Check margins and catalog before generation
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("length increase", self.length_increase),
            ("width increase", self.width_increase),
            ("thickness increase", self.thickness_increase),
        ] {
            if !value.is_finite() {
                return Err(Error::InvalidOptions(format!(
                    "{} must be a finite length, got {}",
                    name, value
                )));
            }
        }
        self.standard_thicknesses.validate()
    }
}

/// Parameters as sent by a UI, with lengths as text
///
/// ```
/// use cutlist::{CutlistParams, LengthUnit};
///
/// let params: CutlistParams = serde_json::from_str(r#"{
///     "length_increase": "50mm",
///     "width_increase": "5mm",
///     "thickness_increase": "0",
///     "std_thicknesses": "18;22",
///     "part_number_letter": true,
///     "part_number_sequence_by_group": false
/// }"#).unwrap();
///
/// let options = params.into_options(LengthUnit::Centimeter).unwrap();
/// assert_eq!(options.length_increase, 5.0);
/// assert_eq!(options.standard_thicknesses.as_slice(), &[1.8, 2.2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutlistParams {
    /// Length margin, e.g. `"50mm"`; unitless values are in scene units
    pub length_increase: String,
    /// Width margin
    pub width_increase: String,
    /// Thickness margin
    pub thickness_increase: String,
    /// `;`-separated catalog in millimeters
    pub std_thicknesses: String,
    /// Letter numbering
    pub part_number_letter: bool,
    /// Restart numbering per group
    pub part_number_sequence_by_group: bool,
}

impl CutlistParams {
    /// Parse every length into `unit` and build validated options
    ///
    /// Empty margins count as zero.
    pub fn into_options(self, unit: LengthUnit) -> Result<CutlistOptions> {
        let margin = |field: &str, text: &str| -> Result<f64> {
            if text.trim().is_empty() {
                return Ok(0.0);
            }
            unit.parse_length(text, unit)
                .map_err(|_| Error::parse_error_with_context(field, text, "a length"))
        };

        let options = CutlistOptions::new()
            .with_length_increase(margin("length_increase", &self.length_increase)?)
            .with_width_increase(margin("width_increase", &self.width_increase)?)
            .with_thickness_increase(margin("thickness_increase", &self.thickness_increase)?)
            .with_standard_thicknesses(StandardThicknesses::parse(&self.std_thicknesses, unit)?)
            .with_letter_numbering(self.part_number_letter)
            .with_sequence_by_group(self.part_number_sequence_by_group);
        options.validate()?;
        Ok(options)
    }
}

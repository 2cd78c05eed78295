//! Linear length units and length-string parsing
//!
//! Every length in a [`Scene`](crate::Scene) is expressed in the scene's
//! [`LengthUnit`]. User input (margins, standard thicknesses) arrives as text
//! such as `"10mm"`, `"1.5 cm"` or `"3/4\""`; [`LengthUnit::parse_length`]
//! converts it into the scene unit.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear length unit of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Inch (25.4 mm)
    Inch,
    /// Foot (12 inches)
    Foot,
    /// Millimeter
    Millimeter,
    /// Centimeter
    Centimeter,
    /// Meter
    Meter,
    /// Micron (0.001 mm)
    Micron,
}

impl LengthUnit {
    /// Number of micrometers in one unit
    ///
    /// Conversions go through this integral factor so that whole-number
    /// inputs convert exactly.
    pub fn micrometers(self) -> f64 {
        match self {
            LengthUnit::Inch => 25_400.0,
            LengthUnit::Foot => 304_800.0,
            LengthUnit::Millimeter => 1_000.0,
            LengthUnit::Centimeter => 10_000.0,
            LengthUnit::Meter => 1_000_000.0,
            LengthUnit::Micron => 1.0,
        }
    }

    /// Number of meters in one unit
    pub fn meters(self) -> f64 {
        self.micrometers() / 1_000_000.0
    }

    /// Convert a value expressed in `from` into this unit
    pub fn convert_from(self, value: f64, from: LengthUnit) -> f64 {
        if from == self {
            value
        } else {
            value * from.micrometers() / self.micrometers()
        }
    }

    /// Short suffix used when displaying lengths
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Inch => "\"",
            LengthUnit::Foot => "'",
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Micron => "µm",
        }
    }

    /// Parse a length string into this unit
    ///
    /// The text is a number, a fraction (`3/4`) or a mixed number (`1 1/2`),
    /// optionally followed by a unit suffix. Without a suffix the value is
    /// taken to be in `default_unit`.
    ///
    /// # Example
    ///
    /// ```
    /// use cutlist::LengthUnit;
    ///
    /// let mm = LengthUnit::Millimeter;
    /// assert_eq!(mm.parse_length("2cm", mm).unwrap(), 20.0);
    /// assert_eq!(mm.parse_length("18", mm).unwrap(), 18.0);
    /// assert!((mm.parse_length("1/2\"", mm).unwrap() - 12.7).abs() < 1e-9);
    /// ```
    pub fn parse_length(self, text: &str, default_unit: LengthUnit) -> Result<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(Error::parse_error_with_context("length", text, "a length"));
        }

        let (number, unit) = split_unit_suffix(trimmed)?;
        let value = parse_number(number.trim())
            .ok_or_else(|| Error::parse_error_with_context("length", text, "a length"))?;

        Ok(self.convert_from(value, unit.unwrap_or(default_unit)))
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LengthUnit::Inch => "inch",
            LengthUnit::Foot => "foot",
            LengthUnit::Millimeter => "millimeter",
            LengthUnit::Centimeter => "centimeter",
            LengthUnit::Meter => "meter",
            LengthUnit::Micron => "micron",
        };
        f.write_str(name)
    }
}

impl FromStr for LengthUnit {
    type Err = Error;

    /// Accepts the 3MF `unit` attribute values and the usual abbreviations
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inch" | "in" | "\"" => Ok(LengthUnit::Inch),
            "foot" | "ft" | "'" => Ok(LengthUnit::Foot),
            "millimeter" | "mm" => Ok(LengthUnit::Millimeter),
            "centimeter" | "cm" => Ok(LengthUnit::Centimeter),
            "meter" | "m" => Ok(LengthUnit::Meter),
            "micron" | "um" | "µm" => Ok(LengthUnit::Micron),
            _ => Err(Error::parse_error_with_context(
                "length unit",
                s,
                "one of: micron, millimeter, centimeter, meter, inch, foot",
            )),
        }
    }
}

/// Split a trailing unit suffix off a length string
fn split_unit_suffix(text: &str) -> Result<(&str, Option<LengthUnit>)> {
    let boundary = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| !(c.is_ascii_digit() || *c == '.' || c.is_whitespace()))
        .last()
        .map(|(i, _)| i);

    match boundary {
        None => Ok((text, None)),
        Some(i) => {
            let unit = text[i..].parse::<LengthUnit>()?;
            Ok((&text[..i], Some(unit)))
        }
    }
}

/// Parse a decimal, a fraction or a mixed number, with an optional sign
fn parse_number(text: &str) -> Option<f64> {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest.trim_start()),
        None => (1.0, text.strip_prefix('+').unwrap_or(text).trim_start()),
    };

    let value = match body.split_once(' ') {
        Some((whole, fraction)) => {
            let whole = whole.parse::<f64>().ok()?;
            whole + parse_fraction(fraction.trim())?
        }
        None => parse_fraction(body)?,
    };

    value.is_finite().then_some(sign * value)
}

fn parse_fraction(text: &str) -> Option<f64> {
    match text.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator = numerator.trim().parse::<f64>().ok()?;
            let denominator = denominator.trim().parse::<f64>().ok()?;
            (denominator != 0.0).then(|| numerator / denominator)
        }
        None => text.parse::<f64>().ok(),
    }
}

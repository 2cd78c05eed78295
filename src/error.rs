//! Error types for cutlist generation
//!
//! All errors carry an error code for categorization. Only input and scene
//! access failures are errors: an empty result or a non-standard thickness is
//! reported inside the [`Report`](crate::Report) instead.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: XML parsing and structure errors
//! - **E3xxx**: Scene, model and input validation errors
//! - **E5xxx**: Serialization errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading file
//! - `E1002`: ZIP archive format error
//! - `E1003`: Missing required file in archive
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E2004`: Invalid 3MF format
//! - `E3001`: Invalid 3MF model (dangling references, cycles)
//! - `E3002`: Numeric or length parse error
//! - `E3003`: Invalid scene snapshot
//! - `E3004`: Invalid cutlist options
//! - `E5001`: JSON error

use std::io;
use thiserror::Error;

/// Result type for cutlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a scene or generating a cutlist
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted ZIP file
    /// - Truncated archive
    #[cfg(feature = "threemf")]
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Missing required file in the 3MF archive
    ///
    /// **Error Code**: E1003
    #[error("[E1003] Missing required file: {0}")]
    MissingFile(String),

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    #[cfg(feature = "threemf")]
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Missing required attributes
    /// - DTD declarations
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// Invalid 3MF package format
    ///
    /// **Error Code**: E2004
    #[error("[E2004] Invalid 3MF format: {0}")]
    InvalidFormat(String),

    /// Invalid 3MF model structure
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Component or build item referencing a missing object
    /// - Circular component references
    /// - Material index out of range
    #[error("[E3001] Invalid model: {0}")]
    InvalidModel(String),

    /// Parse error for numeric values and lengths
    ///
    /// **Error Code**: E3002
    ///
    /// **Suggestions**:
    /// - Lengths accept an optional unit suffix: `mm`, `cm`, `m`, `"`, `in`, `'`, `ft`
    /// - Use `.` as decimal separator
    #[error("[E3002] Parse error: {0}")]
    ParseError(String),

    /// Scene snapshot is inconsistent
    ///
    /// **Error Code**: E3003
    ///
    /// **Common Causes**:
    /// - Instance referencing a definition that is not in the scene
    /// - Material or layer id out of range
    /// - Selection index outside the top-level entity list
    #[error("[E3003] Invalid scene: {0}")]
    InvalidScene(String),

    /// Cutlist options rejected before generation
    ///
    /// **Error Code**: E3004
    ///
    /// **Common Causes**:
    /// - Margin that is NaN or infinite
    /// - Standard thickness catalog not strictly ascending
    /// - Zero or negative standard thickness
    #[error("[E3004] Invalid options: {0}")]
    InvalidOptions(String),

    /// JSON (de)serialization error
    ///
    /// **Error Code**: E5001
    #[error("[E5001] JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::ParseError(format!("Failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::ParseError(format!("Failed to parse integer: {}", err))
    }
}

#[cfg(feature = "threemf")]
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create an InvalidXml error for a missing required attribute
    ///
    /// # Example
    /// ```ignore
    /// Error::missing_attribute("object", "id")
    /// ```
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::InvalidXml(format!(
            "Element '<{}>' is missing required attribute '{}'",
            element, attribute
        ))
    }

    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The name of the field being parsed (e.g., "length increase")
    /// * `value` - The value that failed to parse
    /// * `expected_type` - The expected type (e.g., "length")
    pub fn parse_error_with_context(field_name: &str, value: &str, expected_type: &str) -> Self {
        Error::ParseError(format!(
            "Failed to parse '{}': expected {}, got '{}'",
            field_name, expected_type, value
        ))
    }

    /// Create an InvalidScene error for a dangling arena reference
    pub fn dangling_reference(kind: &str, index: usize, len: usize) -> Self {
        Error::InvalidScene(format!(
            "{} #{} does not exist (scene has {})",
            kind, index, len
        ))
    }
}

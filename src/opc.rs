//! OPC (Open Packaging Conventions) handling for 3MF files
//!
//! 3MF files are ZIP archives following the OPC standard. The model part is
//! located through the package relationships in `_rels/.rels`.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Read, Seek};
use tracing::debug;
use zip::ZipArchive;

/// Conventional model part path, used when no relationship names one
pub const MODEL_PATH: &str = "3D/3dmodel.model";

/// Content types file path
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Relationships file path
pub const RELS_PATH: &str = "_rels/.rels";

/// 3D model relationship type
pub const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";

/// An opened 3MF package
pub struct Package<R: Read> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    /// Open a 3MF package from a reader
    ///
    /// The archive must contain `[Content_Types].xml` and `_rels/.rels`.
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        let mut package = Self { archive };

        for required in [CONTENT_TYPES_PATH, RELS_PATH] {
            if !package.has_file(required) {
                return Err(Error::InvalidFormat(format!(
                    "Missing required file: {}",
                    required
                )));
            }
        }

        debug!(files = package.archive.len(), "Opened 3MF package");
        Ok(package)
    }

    /// Get the main 3D model file content
    pub fn get_model(&mut self) -> Result<String> {
        let model_path = match self.discover_model_path() {
            Err(Error::MissingFile(_)) if self.has_file(MODEL_PATH) => MODEL_PATH.to_string(),
            other => other?,
        };
        debug!(path = %model_path, "Reading model part");
        self.get_file(&model_path)
    }

    /// Discover the model file path from the relationships file
    ///
    /// The target is percent-decoded and its leading `/` removed.
    pub fn discover_model_path(&mut self) -> Result<String> {
        let rels_content = self.get_file(RELS_PATH)?;

        let mut reader = Reader::from_str(&rels_content);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| Error::InvalidXml(e.to_string()))?;

                    if name_str.ends_with("Relationship") {
                        let mut target = None;
                        let mut rel_type = None;

                        for attr in e.attributes() {
                            let attr = attr?;
                            let value = std::str::from_utf8(&attr.value)
                                .map_err(|e| Error::InvalidXml(e.to_string()))?;
                            match attr.key.as_ref() {
                                b"Target" => target = Some(value.to_string()),
                                b"Type" => rel_type = Some(value.to_string()),
                                _ => {}
                            }
                        }

                        if let (Some(t), Some(MODEL_REL_TYPE)) = (target, rel_type.as_deref()) {
                            return normalize_part_name(&t);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Err(Error::MissingFile(
            "3D model relationship not found".to_string(),
        ))
    }

    /// Get a file by name from the archive
    pub fn get_file(&mut self, name: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(name)
            .map_err(|_| Error::MissingFile(name.to_string()))?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Ok(content)
    }

    /// Check if a file exists in the archive
    pub fn has_file(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }
}

/// Turn a relationship target into an archive entry name
fn normalize_part_name(target: &str) -> Result<String> {
    let decoded = urlencoding::decode(target).map_err(|e| {
        Error::InvalidFormat(format!("Relationship target '{}' is not valid UTF-8: {}", target, e))
    })?;
    let path = decoded.strip_prefix('/').unwrap_or(&decoded);
    if path.is_empty() || path.split('/').any(|s| s.is_empty() || s == "." || s == "..") {
        return Err(Error::InvalidFormat(format!(
            "Relationship target '{}' is not a valid part name",
            target
        )));
    }
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn package_with(files: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn rels(target: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="{}" Id="rel0" Type="{}"/>
</Relationships>"#,
            target, MODEL_REL_TYPE
        )
    }

    #[test]
    fn test_empty_zip_is_rejected() {
        let result = Package::open(package_with(&[]));
        assert!(matches!(result, Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_model_path_is_decoded() {
        let rels = rels("/3D/my%20model.model");
        let mut package = Package::open(package_with(&[
            (CONTENT_TYPES_PATH, "<Types/>"),
            (RELS_PATH, rels.as_str()),
            ("3D/my model.model", "<model/>"),
        ]))
        .unwrap();
        assert_eq!(package.discover_model_path().unwrap(), "3D/my model.model");
        assert_eq!(package.get_model().unwrap(), "<model/>");
    }

    #[test]
    fn test_missing_model_part() {
        let rels = rels("/3D/3dmodel.model");
        let mut package = Package::open(package_with(&[
            (CONTENT_TYPES_PATH, "<Types/>"),
            (RELS_PATH, rels.as_str()),
        ]))
        .unwrap();
        assert!(matches!(package.get_model(), Err(Error::MissingFile(_))));
    }

    #[test]
    fn test_conventional_model_path_fallback() {
        let rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;
        let mut package = Package::open(package_with(&[
            (CONTENT_TYPES_PATH, "<Types/>"),
            (RELS_PATH, rels),
            (MODEL_PATH, "<model/>"),
        ]))
        .unwrap();
        assert!(matches!(
            package.discover_model_path(),
            Err(Error::MissingFile(_))
        ));
        assert_eq!(package.get_model().unwrap(), "<model/>");
    }

    #[test]
    fn test_traversal_target_is_rejected() {
        assert!(normalize_part_name("/3D/../secret.model").is_err());
        assert!(normalize_part_name("/").is_err());
        assert_eq!(normalize_part_name(MODEL_PATH).unwrap(), MODEL_PATH);
    }
}

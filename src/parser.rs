//! 3MF model XML parsing
//!
//! Reads the subset of the 3MF core model a cutlist needs: the model
//! unit, mesh objects (vertices and triangles), component objects, base
//! material groups and build items, plus production-extension UUIDs.

use crate::error::{Error, Result};
use crate::units::LengthUnit;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, HashMap};

/// Number of values in a 3MF transform attribute
const TRANSFORM_MATRIX_SIZE: usize = 12;

/// Initial capacity of the XML event buffer
const XML_BUFFER_CAPACITY: usize = 4096;

/// Parsed model, before references are resolved
#[derive(Debug, Default)]
pub(crate) struct ParsedModel {
    /// `unit` attribute of `<model>`
    pub unit: Option<LengthUnit>,
    /// Objects by id
    pub objects: BTreeMap<usize, ParsedObject>,
    /// Base material names by group id
    pub base_materials: HashMap<usize, Vec<String>>,
    /// Build items, in document order
    pub items: Vec<ParsedReference>,
}

/// `<object>` resource
#[derive(Debug, Default)]
pub(crate) struct ParsedObject {
    pub id: usize,
    pub name: Option<String>,
    pub pid: Option<usize>,
    pub pindex: Option<usize>,
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[usize; 3]>,
    pub components: Vec<ParsedReference>,
}

/// `<component>` or build `<item>`: a placed reference to an object
#[derive(Debug, Clone)]
pub(crate) struct ParsedReference {
    pub objectid: usize,
    pub transform: Option<[f64; TRANSFORM_MATRIX_SIZE]>,
    pub uuid: Option<String>,
}

/// Extract local name from potentially namespaced XML element name
pub(crate) fn get_local_name(name_str: &str) -> &str {
    match name_str.rfind(':') {
        Some(pos) => &name_str[pos + 1..],
        None => name_str,
    }
}

/// Get an attribute value by its local name, regardless of namespace prefix
///
/// `p:UUID` and `prod:UUID` both have local name `"UUID"`.
fn get_attr_by_local_name(attrs: &HashMap<String, String>, local_name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|(key, _)| get_local_name(key) == local_name)
        .map(|(_, value)| value.clone())
}

/// Collect the attributes of an element
pub(crate) fn parse_attributes(e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::with_capacity(8);

    for attr in e.attributes() {
        let attr = attr?;
        let key =
            std::str::from_utf8(attr.key.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let raw =
            std::str::from_utf8(&attr.value).map_err(|e| Error::InvalidXml(e.to_string()))?;
        let value = quick_xml::escape::unescape(raw)
            .map_err(|e| Error::XmlAttr(format!("Attribute '{}' has a bad escape: {}", key, e)))?;

        attrs.insert(key.to_string(), value.into_owned());
    }

    Ok(attrs)
}

fn required<'a>(attrs: &'a HashMap<String, String>, element: &str, name: &str) -> Result<&'a str> {
    attrs
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| Error::missing_attribute(element, name))
}

fn parse_index(attrs: &HashMap<String, String>, element: &str, name: &str) -> Result<usize> {
    let value = required(attrs, element, name)?;
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::parse_error_with_context(name, value, "a non-negative integer"))
}

fn parse_coordinate(attrs: &HashMap<String, String>, name: &str) -> Result<f64> {
    let value = required(attrs, "vertex", name)?;
    let parsed = value.trim().parse::<f64>()?;
    if !parsed.is_finite() {
        return Err(Error::InvalidXml(format!(
            "Vertex coordinate {} must be finite (got {})",
            name, value
        )));
    }
    Ok(parsed)
}

/// Parse a `transform` attribute: 12 finite values
fn parse_transform(text: &str) -> Result<[f64; TRANSFORM_MATRIX_SIZE]> {
    let values = text
        .split_whitespace()
        .map(|s| s.parse::<f64>().map_err(Error::from))
        .collect::<Result<Vec<f64>>>()?;

    let values: [f64; TRANSFORM_MATRIX_SIZE] = values.as_slice().try_into().map_err(|_| {
        Error::InvalidXml(format!(
            "Transform matrix must have exactly {} values (got {})",
            TRANSFORM_MATRIX_SIZE,
            values.len()
        ))
    })?;

    if let Some((idx, val)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(Error::InvalidXml(format!(
            "Transform matrix value at index {} must be finite (got {})",
            idx, val
        )));
    }

    Ok(values)
}

fn parse_reference(attrs: &HashMap<String, String>, element: &str) -> Result<ParsedReference> {
    Ok(ParsedReference {
        objectid: parse_index(attrs, element, "objectid")?,
        transform: attrs.get("transform").map(|t| parse_transform(t)).transpose()?,
        uuid: get_attr_by_local_name(attrs, "UUID"),
    })
}

fn parse_object(attrs: &HashMap<String, String>) -> Result<ParsedObject> {
    let optional_index = |name: &str| -> Result<Option<usize>> {
        if attrs.contains_key(name) {
            parse_index(attrs, "object", name).map(Some)
        } else {
            Ok(None)
        }
    };

    Ok(ParsedObject {
        id: parse_index(attrs, "object", "id")?,
        name: attrs.get("name").cloned(),
        pid: optional_index("pid")?,
        pindex: optional_index("pindex")?,
        ..Default::default()
    })
}

/// Parse the 3D model XML content
pub(crate) fn parse_model_xml(xml: &str) -> Result<ParsedModel> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut model = ParsedModel::default();
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);
    let mut current_object: Option<ParsedObject> = None;
    let mut in_mesh = false;
    let mut current_basematerials: Option<(usize, Vec<String>)> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        let is_empty_element = matches!(event, Event::Empty(_));

        match event {
            Event::DocType(_) => {
                return Err(Error::InvalidXml(
                    "DTD declarations are not allowed in 3MF files for security reasons"
                        .to_string(),
                ));
            }
            Event::Start(ref e) | Event::Empty(ref e) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match get_local_name(name_str) {
                    "model" => {
                        let attrs = parse_attributes(e)?;
                        model.unit = attrs.get("unit").map(|u| u.parse()).transpose()?;
                    }
                    "object" => {
                        let object = parse_object(&parse_attributes(e)?)?;
                        if is_empty_element {
                            insert_object(&mut model, object)?;
                        } else {
                            current_object = Some(object);
                        }
                    }
                    "mesh" if current_object.is_some() => in_mesh = !is_empty_element,
                    "vertex" if in_mesh => {
                        if let Some(object) = current_object.as_mut() {
                            let attrs = parse_attributes(e)?;
                            object.vertices.push([
                                parse_coordinate(&attrs, "x")?,
                                parse_coordinate(&attrs, "y")?,
                                parse_coordinate(&attrs, "z")?,
                            ]);
                        }
                    }
                    "triangle" if in_mesh => {
                        if let Some(object) = current_object.as_mut() {
                            let attrs = parse_attributes(e)?;
                            object.triangles.push([
                                parse_index(&attrs, "triangle", "v1")?,
                                parse_index(&attrs, "triangle", "v2")?,
                                parse_index(&attrs, "triangle", "v3")?,
                            ]);
                        }
                    }
                    "component" => {
                        let component = parse_reference(&parse_attributes(e)?, "component")?;
                        match current_object.as_mut() {
                            Some(object) => object.components.push(component),
                            None => {
                                return Err(Error::InvalidXml(
                                    "Component element outside of an object".to_string(),
                                ));
                            }
                        }
                    }
                    "basematerials" => {
                        let id = parse_index(&parse_attributes(e)?, "basematerials", "id")?;
                        if is_empty_element {
                            model.base_materials.insert(id, Vec::new());
                        } else {
                            current_basematerials = Some((id, Vec::new()));
                        }
                    }
                    "base" => {
                        if let Some((_, names)) = current_basematerials.as_mut() {
                            let attrs = parse_attributes(e)?;
                            names.push(required(&attrs, "base", "name")?.to_string());
                        }
                    }
                    "item" => {
                        model.items.push(parse_reference(&parse_attributes(e)?, "item")?);
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;

                match get_local_name(name_str) {
                    "object" => {
                        if let Some(object) = current_object.take() {
                            insert_object(&mut model, object)?;
                        }
                    }
                    "mesh" => in_mesh = false,
                    "basematerials" => {
                        if let Some((id, names)) = current_basematerials.take() {
                            model.base_materials.insert(id, names);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(model)
}

fn insert_object(model: &mut ParsedModel, object: ParsedObject) -> Result<()> {
    if let Some(&[a, b, c]) = object
        .triangles
        .iter()
        .find(|t| t.iter().any(|&v| v >= object.vertices.len()))
    {
        return Err(Error::InvalidModel(format!(
            "Object {} has a triangle ({}, {}, {}) referencing a vertex beyond its {} vertices",
            object.id,
            a,
            b,
            c,
            object.vertices.len()
        )));
    }
    if model.objects.contains_key(&object.id) {
        return Err(Error::InvalidModel(format!(
            "Duplicate object id {}",
            object.id
        )));
    }
    model.objects.insert(object.id, object);
    Ok(())
}

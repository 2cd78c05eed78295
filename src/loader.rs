//! Building a [`Scene`] from a 3MF package
//!
//! Objects become definitions named after the object, mesh triangles become
//! faces, components become instances inside their parent definition and
//! build items become the top-level entities. Placement transforms are
//! applied to the referenced object's bounds so every instance carries its
//! bounds in parent space.

use crate::error::{Error, Result};
use crate::opc::Package;
use crate::parser::{ParsedModel, ParsedReference, parse_model_xml};
use crate::scene::{BoundingBox, Definition, DefinitionId, Entity, Instance, MaterialId, Scene};
use crate::units::LengthUnit;
use nalgebra::{Matrix4, Point3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;

impl Scene {
    /// Load a scene from a 3MF package
    ///
    /// `name` becomes the scene name reported in the cutlist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cutlist::Scene;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("cabinet.3mf")?;
    /// let scene = Scene::from_3mf_reader(file, "cabinet.3mf")?;
    /// println!("{} top-level entities", scene.entities.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_3mf_reader<R: Read + Seek>(reader: R, name: impl Into<String>) -> Result<Self> {
        let mut package = Package::open(reader)?;
        let xml = package.get_model()?;
        let model = parse_model_xml(&xml)?;
        SceneBuilder::new(&model, name.into()).build()
    }

    /// Load a scene from a 3MF file, named after the file
    pub fn from_3mf_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        Self::from_3mf_reader(BufReader::new(file), name)
    }
}

/// Column-vector matrix of a 3MF transform (`m00 m01 m02 m10 … m32`)
fn transform_matrix(transform: Option<&[f64; 12]>) -> Matrix4<f64> {
    match transform {
        None => Matrix4::identity(),
        Some(m) => Matrix4::new(
            m[0], m[3], m[6], m[9], //
            m[1], m[4], m[7], m[10], //
            m[2], m[5], m[8], m[11], //
            0.0, 0.0, 0.0, 1.0,
        ),
    }
}

/// Axis-aligned bounds of a transformed box
fn transform_bounds(bounds: &BoundingBox, matrix: &Matrix4<f64>) -> BoundingBox {
    let mut result = BoundingBox::empty();
    for [x, y, z] in bounds.corners() {
        let p = matrix.transform_point(&Point3::new(x, y, z));
        result.add_point([p.x, p.y, p.z]);
    }
    result
}

struct SceneBuilder<'m> {
    model: &'m ParsedModel,
    scene: Scene,
    definitions: HashMap<usize, DefinitionId>,
    materials: HashMap<(usize, usize), MaterialId>,
    object_bounds: HashMap<usize, BoundingBox>,
}

impl<'m> SceneBuilder<'m> {
    fn new(model: &'m ParsedModel, name: String) -> Self {
        let unit = model.unit.unwrap_or(LengthUnit::Millimeter);
        Self {
            model,
            scene: Scene::new(name, unit),
            definitions: HashMap::new(),
            materials: HashMap::new(),
            object_bounds: HashMap::new(),
        }
    }

    fn build(mut self) -> Result<Scene> {
        let model = self.model;
        for (offset, &id) in model.objects.keys().enumerate() {
            self.definitions.insert(id, DefinitionId(offset));
        }

        let mut path = Vec::new();
        for &id in model.objects.keys() {
            self.bounds_of(id, &mut path)?;
        }

        for object in model.objects.values() {
            let mut definition = Definition::new(
                object
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Object {}", object.id)),
            );
            for [a, b, c] in &object.triangles {
                let mut face = BoundingBox::empty();
                for &v in [a, b, c] {
                    face.add_point(object.vertices[v]);
                }
                definition.entities.push(Entity::face(face));
            }
            for (index, component) in object.components.iter().enumerate() {
                let guid = format!("object-{}/{}", object.id, index);
                let instance = self.instance(component, guid)?;
                definition.entities.push(instance.into());
            }
            self.scene.add_definition(definition);
        }

        for (index, item) in model.items.iter().enumerate() {
            let instance = self.instance(item, format!("item-{}", index))?;
            self.scene.add_entity(instance);
        }

        debug!(
            definitions = self.scene.definitions.len(),
            materials = self.scene.materials.len(),
            items = self.scene.entities.len(),
            unit = %self.scene.length_unit,
            "Built scene from 3MF model"
        );
        Ok(self.scene)
    }

    /// Bounds of an object in its own space, including its components
    fn bounds_of(&mut self, id: usize, path: &mut Vec<usize>) -> Result<BoundingBox> {
        if let Some(bounds) = self.object_bounds.get(&id) {
            return Ok(*bounds);
        }
        if path.contains(&id) {
            return Err(Error::InvalidModel(format!(
                "Object {} is part of a component cycle",
                id
            )));
        }
        let model = self.model;
        let object = model.objects.get(&id).ok_or_else(|| {
            Error::InvalidModel(format!("Reference to object {} which does not exist", id))
        })?;

        let mut bounds = BoundingBox::empty();
        for vertex in &object.vertices {
            bounds.add_point(*vertex);
        }

        path.push(id);
        for component in &object.components {
            let child = self.bounds_of(component.objectid, path)?;
            let matrix = transform_matrix(component.transform.as_ref());
            bounds.add(&transform_bounds(&child, &matrix));
        }
        path.pop();

        self.object_bounds.insert(id, bounds);
        Ok(bounds)
    }

    fn instance(&mut self, reference: &ParsedReference, fallback_guid: String) -> Result<Instance> {
        let definition = *self.definitions.get(&reference.objectid).ok_or_else(|| {
            Error::InvalidModel(format!(
                "Reference to object {} which does not exist",
                reference.objectid
            ))
        })?;
        let object_bounds = self
            .object_bounds
            .get(&reference.objectid)
            .copied()
            .unwrap_or_default();
        let matrix = transform_matrix(reference.transform.as_ref());
        let bounds = transform_bounds(&object_bounds, &matrix);

        let guid = reference.uuid.clone().unwrap_or(fallback_guid);
        let mut instance = Instance::new(guid, definition, bounds);
        instance.material = self.material_of(reference.objectid)?;
        Ok(instance)
    }

    /// Base material of an object, from its `pid`/`pindex`
    ///
    /// A `pid` naming some other property group (colors, textures) gives no
    /// material.
    fn material_of(&mut self, objectid: usize) -> Result<Option<MaterialId>> {
        let model = self.model;
        let Some(object) = model.objects.get(&objectid) else {
            return Ok(None);
        };
        let Some(pid) = object.pid else {
            return Ok(None);
        };
        let Some(names) = model.base_materials.get(&pid) else {
            return Ok(None);
        };

        let pindex = object.pindex.unwrap_or(0);
        let name = names.get(pindex).ok_or_else(|| {
            Error::InvalidModel(format!(
                "Object {} uses material index {} but base material group {} has {} entries",
                objectid,
                pindex,
                pid,
                names.len()
            ))
        })?;

        if let Some(id) = self.materials.get(&(pid, pindex)) {
            return Ok(Some(*id));
        }
        let id = self.scene.add_material(name.clone());
        self.materials.insert((pid, pindex), id);
        Ok(Some(id))
    }
}

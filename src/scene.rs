//! Immutable snapshot of a hierarchical 3D scene
//!
//! A [`Scene`] holds the top-level entities, the current selection and three
//! arenas: shared component definitions, materials and layers. Entities refer
//! into the arenas by id, so a definition used by many instances is stored
//! once. The cutlist pipeline only reads a scene; it never mutates it.

use crate::error::{Error, Result};
use crate::model::Size;
use crate::units::LengthUnit;

/// Index of a [`Definition`] in [`Scene::definitions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefinitionId(pub usize);

/// Index of a [`Material`] in [`Scene::materials`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub usize);

/// Index of a [`Layer`] in [`Scene::layers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub usize);

/// Axis-aligned bounding box
///
/// A box with no points added is empty and has zero extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: [f64; 3],
    max: [f64; 3],
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Empty box
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    /// Box spanning two corners, in any order
    pub fn new(a: [f64; 3], b: [f64; 3]) -> Self {
        let mut bounds = Self::empty();
        bounds.add_point(a);
        bounds.add_point(b);
        bounds
    }

    /// Box from the origin to `extents`
    pub fn from_extents(extents: [f64; 3]) -> Self {
        Self::new([0.0; 3], extents)
    }

    /// Whether no point has been added
    pub fn is_empty(&self) -> bool {
        (0..3).any(|axis| self.min[axis] > self.max[axis])
    }

    /// Grow the box to contain a point
    pub fn add_point(&mut self, point: [f64; 3]) {
        for (axis, value) in point.into_iter().enumerate() {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        }
    }

    /// Grow the box to contain another box
    pub fn add(&mut self, other: &BoundingBox) {
        if !other.is_empty() {
            self.add_point(other.min);
            self.add_point(other.max);
        }
    }

    /// The eight corners, empty when the box is empty
    pub fn corners(&self) -> Vec<[f64; 3]> {
        if self.is_empty() {
            return Vec::new();
        }
        let (lo, hi) = (self.min, self.max);
        (0..8)
            .map(|i| {
                [
                    if i & 1 == 0 { lo[0] } else { hi[0] },
                    if i & 2 == 0 { lo[1] } else { hi[1] },
                    if i & 4 == 0 { lo[2] } else { hi[2] },
                ]
            })
            .collect()
    }

    /// Width, height and depth; zero for an empty box
    pub fn extents(&self) -> [f64; 3] {
        if self.is_empty() {
            return [0.0; 3];
        }
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Whether every extent is strictly positive
    pub fn has_volume(&self) -> bool {
        self.extents().iter().all(|e| *e > 0.0)
    }
}

/// Size of a bounding box, dimensions sorted descending
pub fn size_from_bounds(bounds: &BoundingBox) -> Size {
    Size::from_extents(bounds.extents())
}

/// Named material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Display name
    pub name: String,
}

/// Visibility layer (tag)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    /// Display name
    pub name: String,
    /// Entities on a hidden layer are skipped
    pub visible: bool,
}

/// Shared component definition
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Name, which is also the part identity in a cutlist
    pub name: String,
    /// Child entities, in definition space
    pub entities: Vec<Entity>,
}

impl Definition {
    /// Create an empty definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
        }
    }

    /// Add a child entity
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Union of the bounds of the faces directly inside this definition
    ///
    /// Nested groups and instances are not included.
    pub fn face_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for entity in &self.entities {
            if let Entity::Face(face) = entity {
                bounds.add(&face.bounds);
            }
        }
        bounds
    }
}

/// Group of entities owned by its parent
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Hidden groups and their contents are skipped
    pub visible: bool,
    /// Layer, `None` for the default always-visible layer
    pub layer: Option<LayerId>,
    /// Child entities
    pub entities: Vec<Entity>,
}

impl Group {
    /// Visible group on the default layer
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            visible: true,
            layer: None,
            entities,
        }
    }
}

/// Placed occurrence of a shared definition
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Unique identifier of this occurrence
    pub guid: String,
    /// Referenced definition
    pub definition: DefinitionId,
    /// Material applied to the instance
    pub material: Option<MaterialId>,
    /// Bounds of the placed instance, in parent space
    pub bounds: BoundingBox,
    /// Hidden instances are skipped
    pub visible: bool,
    /// Layer, `None` for the default always-visible layer
    pub layer: Option<LayerId>,
}

impl Instance {
    /// Visible instance without material on the default layer
    pub fn new(guid: impl Into<String>, definition: DefinitionId, bounds: BoundingBox) -> Self {
        Self {
            guid: guid.into(),
            definition,
            material: None,
            bounds,
            visible: true,
            layer: None,
        }
    }

    /// Apply a material
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    /// Put the instance on a layer
    pub fn with_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Set visibility
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Face of a definition or group
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Bounds of the face
    pub bounds: BoundingBox,
}

/// Scene entity
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// Group owning its children
    Group(Group),
    /// Instance of a shared definition
    Instance(Instance),
    /// Face
    Face(Face),
    /// Anything else (edges, guides, text, …)
    Other,
}

impl From<Group> for Entity {
    fn from(group: Group) -> Self {
        Entity::Group(group)
    }
}

impl From<Instance> for Entity {
    fn from(instance: Instance) -> Self {
        Entity::Instance(instance)
    }
}

impl From<Face> for Entity {
    fn from(face: Face) -> Self {
        Entity::Face(face)
    }
}

impl Entity {
    /// Face entity spanning a box
    pub fn face(bounds: BoundingBox) -> Self {
        Entity::Face(Face { bounds })
    }
}

/// Immutable snapshot handed to the cutlist pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Display name or path
    pub name: String,
    /// Linear unit of every length in the scene
    pub length_unit: LengthUnit,
    /// Top-level entities
    pub entities: Vec<Entity>,
    /// Selected top-level entities, by index into `entities`
    pub selection: Vec<usize>,
    /// Definition arena
    pub definitions: Vec<Definition>,
    /// Material arena
    pub materials: Vec<Material>,
    /// Layer arena
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>, length_unit: LengthUnit) -> Self {
        Self {
            name: name.into(),
            length_unit,
            entities: Vec::new(),
            selection: Vec::new(),
            definitions: Vec::new(),
            materials: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Store a definition and return its id
    pub fn add_definition(&mut self, definition: Definition) -> DefinitionId {
        self.definitions.push(definition);
        DefinitionId(self.definitions.len() - 1)
    }

    /// Store a material and return its id
    pub fn add_material(&mut self, name: impl Into<String>) -> MaterialId {
        self.materials.push(Material { name: name.into() });
        MaterialId(self.materials.len() - 1)
    }

    /// Store a layer and return its id
    pub fn add_layer(&mut self, name: impl Into<String>, visible: bool) -> LayerId {
        self.layers.push(Layer {
            name: name.into(),
            visible,
        });
        LayerId(self.layers.len() - 1)
    }

    /// Append a top-level entity and return its index
    pub fn add_entity(&mut self, entity: impl Into<Entity>) -> usize {
        self.entities.push(entity.into());
        self.entities.len() - 1
    }

    /// Add a top-level entity to the selection
    pub fn select(&mut self, index: usize) {
        self.selection.push(index);
    }

    /// Look up a definition
    pub fn definition(&self, id: DefinitionId) -> Result<&Definition> {
        self.definitions
            .get(id.0)
            .ok_or_else(|| Error::dangling_reference("Definition", id.0, self.definitions.len()))
    }

    /// Look up a material
    pub fn material(&self, id: MaterialId) -> Result<&Material> {
        self.materials
            .get(id.0)
            .ok_or_else(|| Error::dangling_reference("Material", id.0, self.materials.len()))
    }

    /// Look up a layer
    pub fn layer(&self, id: LayerId) -> Result<&Layer> {
        self.layers
            .get(id.0)
            .ok_or_else(|| Error::dangling_reference("Layer", id.0, self.layers.len()))
    }

    fn layer_visible(&self, layer: Option<LayerId>) -> Result<bool> {
        match layer {
            Some(id) => Ok(self.layer(id)?.visible),
            None => Ok(true),
        }
    }

    /// Whether an entity is visible and on a visible layer
    ///
    /// Faces and other entities carry no visibility of their own.
    pub fn is_visible(&self, entity: &Entity) -> Result<bool> {
        match entity {
            Entity::Group(group) => Ok(group.visible && self.layer_visible(group.layer)?),
            Entity::Instance(instance) => {
                Ok(instance.visible && self.layer_visible(instance.layer)?)
            }
            Entity::Face(_) | Entity::Other => Ok(true),
        }
    }

    /// Entities a generation request starts from
    ///
    /// The selection when there is one, otherwise every top-level entity. The
    /// flag tells whether the selection was used.
    pub fn roots(&self) -> Result<(Vec<&Entity>, bool)> {
        if self.selection.is_empty() {
            return Ok((self.entities.iter().collect(), false));
        }
        let selected = self
            .selection
            .iter()
            .map(|&index| {
                self.entities.get(index).ok_or_else(|| {
                    Error::InvalidScene(format!(
                        "Selected entity #{} does not exist (scene has {} top-level entities)",
                        index,
                        self.entities.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((selected, true))
    }
}

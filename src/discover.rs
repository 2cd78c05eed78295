//! Leaf part discovery
//!
//! A leaf is a visible component instance whose subtree contains no other
//! leaf and whose bounds have volume. Groups and instances are descended
//! depth-first; a definition shared by several instances is explored once per
//! instance, so every occurrence is counted. An occurrence is identified by
//! the guids of the instances leading to it, joined with `/`.

use crate::error::{Error, Result};
use crate::scene::{Definition, Entity, Instance, Material, Scene};
use tracing::debug;

/// Leaf instance with its definition and material resolved
#[derive(Debug, Clone)]
pub struct Leaf<'a> {
    /// Path-qualified id of this occurrence, e.g. `item-1/object-2/0`
    pub guid: String,
    /// The instance itself
    pub instance: &'a Instance,
    /// Its definition
    pub definition: &'a Definition,
    /// Its material, if any
    pub material: Option<&'a Material>,
}

impl Leaf<'_> {
    /// Material name, if a material is applied
    pub fn material_name(&self) -> Option<&str> {
        self.material.map(|m| m.name.as_str())
    }
}

/// Collect the leaf parts reachable from `roots`, in depth-first order
pub fn discover_leaves<'a>(scene: &'a Scene, roots: &[&'a Entity]) -> Result<Vec<Leaf<'a>>> {
    let mut leaves = Vec::new();
    let mut path = Vec::new();
    for &root in roots {
        let (_, found) = fetch_leaves(scene, root, &mut path)?;
        leaves.extend(found);
    }
    Ok(leaves)
}

/// Returns the number of leaves in the subtree and the leaves themselves
///
/// `path` holds the instances currently being expanded; meeting one of
/// their definitions again means the scene is cyclic.
fn fetch_leaves<'a>(
    scene: &'a Scene,
    entity: &'a Entity,
    path: &mut Vec<&'a Instance>,
) -> Result<(usize, Vec<Leaf<'a>>)> {
    if !scene.is_visible(entity)? {
        return Ok((0, Vec::new()));
    }

    match entity {
        Entity::Group(group) => fetch_children(scene, &group.entities, path),
        Entity::Instance(instance) => {
            if path.iter().any(|p| p.definition == instance.definition) {
                return Err(Error::InvalidScene(format!(
                    "Definition #{} contains an instance of itself",
                    instance.definition.0
                )));
            }
            let definition = scene.definition(instance.definition)?;

            path.push(instance);
            let children = fetch_children(scene, &definition.entities, path);
            path.pop();
            let (count, leaves) = children?;

            if count == 0 && instance.bounds.has_volume() {
                let material = instance.material.map(|id| scene.material(id)).transpose()?;
                let guid = occurrence_guid(path, instance);
                debug!(guid = %guid, definition = %definition.name, "Discovered leaf");
                return Ok((
                    1,
                    vec![Leaf {
                        guid,
                        instance,
                        definition,
                        material,
                    }],
                ));
            }
            Ok((count, leaves))
        }
        Entity::Face(_) | Entity::Other => Ok((0, Vec::new())),
    }
}

fn fetch_children<'a>(
    scene: &'a Scene,
    entities: &'a [Entity],
    path: &mut Vec<&'a Instance>,
) -> Result<(usize, Vec<Leaf<'a>>)> {
    let mut count = 0;
    let mut leaves = Vec::new();
    for child in entities {
        let (child_count, child_leaves) = fetch_leaves(scene, child, path)?;
        count += child_count;
        leaves.extend(child_leaves);
    }
    Ok((count, leaves))
}

fn occurrence_guid(ancestors: &[&Instance], instance: &Instance) -> String {
    ancestors
        .iter()
        .chain(std::iter::once(&instance))
        .map(|i| i.guid.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BoundingBox, DefinitionId, Group};
    use crate::units::LengthUnit;

    fn board() -> BoundingBox {
        BoundingBox::from_extents([500.0, 50.0, 18.0])
    }

    fn guids(leaves: &[Leaf<'_>]) -> Vec<String> {
        leaves.iter().map(|l| l.guid.clone()).collect()
    }

    #[test]
    fn test_single_instance_is_a_leaf() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let def = scene.add_definition(Definition::new("Rail"));
        scene.add_entity(Instance::new("r1", def, board()));

        let (roots, _) = scene.roots().unwrap();
        let leaves = discover_leaves(&scene, &roots).unwrap();
        assert_eq!(guids(&leaves), vec!["r1"]);
        assert_eq!(leaves[0].definition.name, "Rail");
    }

    #[test]
    fn test_assembly_with_leaf_children_is_not_a_leaf() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let leg = scene.add_definition(Definition::new("Leg"));
        let frame = scene.add_definition(
            Definition::new("Frame")
                .with_entity(Instance::new("leg-a", leg, board()).into())
                .with_entity(Instance::new("leg-b", leg, board()).into()),
        );
        scene.add_entity(Instance::new("frame-1", frame, board()));
        scene.add_entity(Instance::new("frame-2", frame, board()));

        let (roots, _) = scene.roots().unwrap();
        let leaves = discover_leaves(&scene, &roots).unwrap();
        // shared definition content is explored once per instance
        assert_eq!(
            guids(&leaves),
            vec![
                "frame-1/leg-a",
                "frame-1/leg-b",
                "frame-2/leg-a",
                "frame-2/leg-b"
            ]
        );
        assert_eq!(leaves[2].instance.guid, "leg-a");
    }

    #[test]
    fn test_flat_instance_without_children_is_dropped() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let def = scene.add_definition(Definition::new("Sticker"));
        scene.add_entity(Instance::new("flat", def, BoundingBox::from_extents([10.0, 10.0, 0.0])));

        let (roots, _) = scene.roots().unwrap();
        assert!(discover_leaves(&scene, &roots).unwrap().is_empty());
    }

    #[test]
    fn test_hidden_entities_are_skipped() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let off = scene.add_layer("Off", false);
        let def = scene.add_definition(Definition::new("Shelf"));
        scene.add_entity(Instance::new("hidden", def, board()).with_visible(false));
        scene.add_entity(Instance::new("off", def, board()).with_layer(off));
        let mut group = Group::new(vec![Instance::new("in-hidden-group", def, board()).into()]);
        group.visible = false;
        scene.add_entity(group);
        scene.add_entity(Instance::new("shown", def, board()));

        let (roots, _) = scene.roots().unwrap();
        let leaves = discover_leaves(&scene, &roots).unwrap();
        assert_eq!(guids(&leaves), vec!["shown"]);
    }

    #[test]
    fn test_groups_are_transparent() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let def = scene.add_definition(Definition::new("Slat"));
        let inner = Group::new(vec![Instance::new("b", def, board()).into(), Entity::Other]);
        scene.add_entity(Group::new(vec![
            Instance::new("a", def, board()).into(),
            inner.into(),
        ]));

        let (roots, _) = scene.roots().unwrap();
        let leaves = discover_leaves(&scene, &roots).unwrap();
        assert_eq!(guids(&leaves), vec!["a", "b"]);
    }

    #[test]
    fn test_self_referencing_definition_is_an_error() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let def = DefinitionId(0);
        scene.add_definition(
            Definition::new("Loop").with_entity(Instance::new("inner", def, board()).into()),
        );
        scene.add_entity(Instance::new("outer", def, board()));

        let (roots, _) = scene.roots().unwrap();
        assert!(matches!(
            discover_leaves(&scene, &roots),
            Err(Error::InvalidScene(_))
        ));
    }

    #[test]
    fn test_dangling_material_is_an_error() {
        let mut scene = Scene::new("s", LengthUnit::Millimeter);
        let def = scene.add_definition(Definition::new("Rail"));
        scene.add_entity(
            Instance::new("r1", def, board()).with_material(crate::scene::MaterialId(3)),
        );

        let (roots, _) = scene.roots().unwrap();
        assert!(matches!(
            discover_leaves(&scene, &roots),
            Err(Error::InvalidScene(_))
        ));
    }
}

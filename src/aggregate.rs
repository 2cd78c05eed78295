//! Folding leaf parts into material/thickness groups

use crate::discover::Leaf;
use crate::model::{Cutlist, CutlistOptions, GroupKey};
use crate::scene::size_from_bounds;
use crate::thickness::resolve_standard_thickness;
use std::collections::BTreeSet;
use tracing::warn;

/// Material name used for parts without a material
pub const UNDEFINED_MATERIAL: &str = "[Undefined material]";

/// Fold leaves into the cutlist, in the given order
///
/// Nominal sizes come from the faces directly inside each leaf's definition.
/// Groups and parts are created on first use and keep the attributes of that
/// first occurrence.
pub fn aggregate(cutlist: &mut Cutlist, leaves: &[Leaf<'_>], options: &CutlistOptions) {
    let catalog = options.standard_thicknesses.as_slice();
    let mut faceless = BTreeSet::new();

    for leaf in leaves {
        let material_name = leaf.material_name().unwrap_or(UNDEFINED_MATERIAL);
        let definition_name = leaf.definition.name.as_str();

        let face_bounds = leaf.definition.face_bounds();
        if face_bounds.is_empty() && faceless.insert(definition_name) {
            warn!(part = definition_name, "Part has no faces of its own");
            cutlist.warnings.push(format!(
                "Part '{}' has no faces of its own; its size is reported as zero",
                definition_name
            ));
        }

        let size = size_from_bounds(&face_bounds);
        let standard =
            resolve_standard_thickness(size.thickness() + options.thickness_increase, catalog);
        let raw_size = size.raw(options.length_increase, options.width_increase, standard.value);

        let group = cutlist.group_entry(
            GroupKey::new(material_name, standard.value),
            standard.value,
            standard.available,
        );
        group
            .part_entry(definition_name, size, raw_size)
            .add_instance(&leaf.guid);
        group.part_count += 1;
    }
}

/// Record that nothing was found
pub(crate) fn record_no_parts(cutlist: &mut Cutlist, use_selection: bool) {
    let message = if use_selection {
        "No component instance was detected in your selection"
    } else {
        "No component instance was detected in your scene"
    };
    warn!(use_selection, "{}", message);
    cutlist.errors.push(message.to_string());
}

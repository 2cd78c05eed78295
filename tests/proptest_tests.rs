//! Property-based tests for cutlist
//!
//! These tests use proptest to generate random parts, catalogs and scenes
//! and verify invariants hold across a wide range of inputs.

use cutlist::numbering::successor;
use cutlist::{
    BoundingBox, CutlistOptions, Definition, Entity, Instance, LengthUnit, Scene, Size,
    StandardThicknesses, generate_cutlist, resolve_standard_thickness,
};
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

/// Positive, finite box extents in a plausible furniture range
fn extents_strategy() -> impl Strategy<Value = [f64; 3]> {
    [1.0f64..3000.0, 1.0f64..3000.0, 1.0f64..3000.0]
}

/// Strictly ascending thickness catalog
fn catalog_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(1u32..100, 0..8)
        .prop_map(|set| set.into_iter().map(f64::from).collect())
}

/// Scene description: (definition extents, material index, instance count)
fn parts_strategy() -> impl Strategy<Value = Vec<([f64; 3], usize, usize)>> {
    prop::collection::vec((extents_strategy(), 0usize..3, 1usize..4), 1..8)
}

fn build_scene(parts: &[([f64; 3], usize, usize)], reversed: bool) -> Scene {
    let mut scene = Scene::new("generated", LengthUnit::Millimeter);
    let materials = [
        scene.add_material("Oak"),
        scene.add_material("Birch plywood"),
        scene.add_material("MDF"),
    ];

    let mut instances = Vec::new();
    for (i, (extents, material, count)) in parts.iter().enumerate() {
        let bounds = BoundingBox::from_extents(*extents);
        let definition = scene.add_definition(
            Definition::new(format!("Part {}", i)).with_entity(Entity::face(bounds)),
        );
        for copy in 0..*count {
            instances.push(
                Instance::new(format!("{}-{}", i, copy), definition, bounds)
                    .with_material(materials[*material]),
            );
        }
    }

    if reversed {
        instances.reverse();
    }
    for instance in instances {
        scene.add_entity(instance);
    }
    scene
}

// ============================================================================
// Property-based tests
// ============================================================================

proptest! {
    /// Part size does not depend on how the part is oriented
    #[test]
    fn test_size_is_orientation_independent(extents in extents_strategy()) {
        let [a, b, c] = extents;
        let size = Size::from_extents(extents);
        prop_assert!(size.length() >= size.width());
        prop_assert!(size.width() >= size.thickness());
        for permuted in [[a, c, b], [b, a, c], [b, c, a], [c, a, b], [c, b, a]] {
            prop_assert_eq!(Size::from_extents(permuted), size);
        }
        prop_assert!((size.volume() - a * b * c).abs() <= 1e-6 * a * b * c);
    }

    /// Resolution never shrinks a board, and picks the tightest catalog entry
    #[test]
    fn test_resolved_thickness_is_tightest_fit(
        actual in 0.5f64..120.0,
        catalog in catalog_strategy(),
    ) {
        let resolved = resolve_standard_thickness(actual, &catalog);
        prop_assert!(resolved.value >= actual);
        if resolved.available {
            prop_assert!(catalog.contains(&resolved.value));
            prop_assert!(catalog.iter().all(|&t| t < actual || t >= resolved.value));
        } else {
            prop_assert_eq!(resolved.value, actual);
            prop_assert!(catalog.iter().all(|&t| t < actual));
        }
    }

    /// A thicker board never resolves to a thinner standard
    #[test]
    fn test_resolved_thickness_is_monotonic(
        a in 0.5f64..120.0,
        b in 0.5f64..120.0,
        catalog in catalog_strategy(),
    ) {
        let (thin, thick) = if a <= b { (a, b) } else { (b, a) };
        let thin_resolved = resolve_standard_thickness(thin, &catalog);
        let thick_resolved = resolve_standard_thickness(thick, &catalog);
        prop_assert!(thin_resolved.value <= thick_resolved.value);
    }

    /// Every instance ends up in exactly one part line
    #[test]
    fn test_every_instance_is_counted(parts in parts_strategy(), catalog in catalog_strategy()) {
        let scene = build_scene(&parts, false);
        let options = CutlistOptions::new()
            .with_standard_thicknesses(StandardThicknesses::new(catalog).unwrap());
        let report = generate_cutlist(&scene, &options).unwrap();

        let expected: usize = parts.iter().map(|(_, _, count)| count).sum();
        let part_count: usize = report.groups.iter().map(|g| g.part_count).sum();
        let line_count: usize = report
            .groups
            .iter()
            .flat_map(|g| g.parts.iter())
            .map(|p| p.count)
            .sum();
        prop_assert_eq!(part_count, expected);
        prop_assert_eq!(line_count, expected);
        prop_assert!(report.errors.is_empty());
    }

    /// Part numbers are unique across the report when numbering runs through
    #[test]
    fn test_part_numbers_are_unique(parts in parts_strategy(), letters in any::<bool>()) {
        let scene = build_scene(&parts, false);
        let options = CutlistOptions::new().with_letter_numbering(letters);
        let report = generate_cutlist(&scene, &options).unwrap();

        let mut numbers: Vec<&str> = report
            .groups
            .iter()
            .flat_map(|g| g.parts.iter())
            .map(|p| p.number.as_str())
            .collect();
        let total = numbers.len();
        numbers.sort_unstable();
        numbers.dedup();
        prop_assert_eq!(numbers.len(), total);
    }

    /// Groups and their totals do not depend on scene entity order
    #[test]
    fn test_groups_independent_of_entity_order(parts in parts_strategy()) {
        let forward = generate_cutlist(&build_scene(&parts, false), &CutlistOptions::new()).unwrap();
        let backward = generate_cutlist(&build_scene(&parts, true), &CutlistOptions::new()).unwrap();

        prop_assert_eq!(forward.groups.len(), backward.groups.len());
        for (a, b) in forward.groups.iter().zip(&backward.groups) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(a.part_count, b.part_count);
            prop_assert!((a.raw_area_m2 - b.raw_area_m2).abs() < 1e-9);
            prop_assert!((a.raw_volume_m3 - b.raw_volume_m3).abs() < 1e-9);
        }
    }

    /// Digit numbering follows integer increment
    #[test]
    fn test_successor_of_digits(n in 0u64..1_000_000) {
        prop_assert_eq!(successor(&n.to_string()), (n + 1).to_string());
    }
}

#[test]
fn test_successor_of_letters_runs_past_z() {
    let mut current = "A".to_string();
    for _ in 0..26 {
        current = successor(&current);
    }
    assert_eq!(current, "AA");
}

//! # cutlist
//!
//! Cutlist (bill of materials) extraction from hierarchical 3D scenes.
//!
//! A scene is a tree of groups and component instances. This crate finds
//! every leaf part in it, measures each part from its bounding box, adds
//! stock margins, rounds thicknesses up to a catalog of standard boards, and
//! aggregates identical parts into material/thickness groups. The result is
//! an ordered, numbered [`Report`] with per-group totals.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Orientation-independent part sizes (`length ≥ width ≥ thickness`)
//! - Standard thickness catalog with round-up resolution
//! - Digit or letter part numbering, across the report or per group
//! - JSON report and JSON parameters via `serde`
//! - 3MF scene loading (`threemf` feature, enabled by default)
//!
//! ## Example
//!
//! ```
//! use cutlist::{
//!     generate_cutlist, BoundingBox, CutlistOptions, Definition, Entity, Instance, LengthUnit,
//!     Scene, StandardThicknesses,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut scene = Scene::new("shelf", LengthUnit::Millimeter);
//! let oak = scene.add_material("Oak");
//! let board = BoundingBox::from_extents([800.0, 250.0, 17.0]);
//! let shelf = scene.add_definition(Definition::new("Shelf").with_entity(Entity::face(board)));
//! scene.add_entity(Instance::new("s1", shelf, board).with_material(oak));
//! scene.add_entity(Instance::new("s2", shelf, board).with_material(oak));
//!
//! let options = CutlistOptions::new()
//!     .with_length_increase(10.0)
//!     .with_standard_thicknesses(StandardThicknesses::new(vec![18.0, 22.0])?);
//! let report = generate_cutlist(&scene, &options)?;
//!
//! let group = &report.groups[0];
//! assert_eq!(group.raw_thickness, 18.0);
//! assert_eq!(group.parts[0].count, 2);
//! assert_eq!(group.parts[0].raw_length, 810.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod discover;
pub mod error;
pub mod model;
pub mod numbering;
pub mod report;
pub mod scene;
pub mod thickness;
pub mod units;

#[cfg(feature = "threemf")]
mod loader;
#[cfg(feature = "threemf")]
pub mod opc;
#[cfg(feature = "threemf")]
mod parser;

pub use aggregate::UNDEFINED_MATERIAL;
pub use discover::{Leaf, discover_leaves};
pub use error::{Error, Result};
pub use model::{
    Cutlist, CutlistOptions, CutlistParams, GroupKey, GroupRecord, PartRecord, Report,
    ReportGroup, ReportPart, Size, StandardThicknesses, Status,
};
pub use report::build_report;
pub use scene::{
    BoundingBox, Definition, DefinitionId, Entity, Face, Group, Instance, Layer, LayerId,
    Material, MaterialId, Scene, size_from_bounds,
};
pub use thickness::{StandardThickness, resolve_standard_thickness};
pub use units::LengthUnit;

use tracing::info;

/// Generate the cutlist report of a scene
///
/// Starts from the selection when there is one, otherwise from every
/// top-level entity. Finding no part is not an error: the report then has no
/// groups and one entry in `errors`.
///
/// # Errors
///
/// [`Error::InvalidOptions`] when a margin is not finite or the catalog is
/// not ascending, and [`Error::InvalidScene`] when the scene refers to a
/// definition, material, layer or selected entity it does not contain.
pub fn generate_cutlist(scene: &Scene, options: &CutlistOptions) -> Result<Report> {
    options.validate()?;

    let (roots, use_selection) = scene.roots()?;
    let leaves = discover_leaves(scene, &roots)?;

    let mut cutlist = Cutlist::new(scene.name.clone(), scene.length_unit);
    if leaves.is_empty() {
        aggregate::record_no_parts(&mut cutlist, use_selection);
    }
    aggregate::aggregate(&mut cutlist, &leaves, options);

    info!(
        scene = %scene.name,
        use_selection,
        leaves = leaves.len(),
        groups = cutlist.groups.len(),
        "Generated cutlist"
    );
    Ok(build_report(&cutlist, options))
}

/// Generate a cutlist from UI parameters, parsing lengths in the scene unit
pub fn generate_cutlist_with_params(scene: &Scene, params: CutlistParams) -> Result<Report> {
    let options = params.into_options(scene.length_unit)?;
    generate_cutlist(scene, &options)
}

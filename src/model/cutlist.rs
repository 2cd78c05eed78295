//! Aggregation data model built during a single traversal

use super::size::Size;
use crate::units::LengthUnit;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

/// Thicknesses closer than this (in scene units) share a group
const THICKNESS_QUANTUM: f64 = 1e-6;

/// Outcome of a generation request
///
/// Failures that prevent a report are returned as [`Error`](crate::Error);
/// a produced report is therefore always successful, with advisory problems
/// listed in its `errors` and `warnings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Report produced
    Success,
}

/// Identity of a group: material name and resolved raw thickness
///
/// Ordered material first, then thickness. The thickness is quantized so
/// floating-point noise in otherwise equal boards cannot split a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    material_name: String,
    thickness: i64,
}

impl GroupKey {
    /// Create a key from a material name and a raw thickness in scene units
    pub fn new(material_name: impl Into<String>, raw_thickness: f64) -> Self {
        Self {
            material_name: material_name.into(),
            thickness: (raw_thickness / THICKNESS_QUANTUM).round() as i64,
        }
    }

    /// Material name component
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Stable identifier derived from the key
    ///
    /// The first 16 hex digits of a SHA-256 digest, so the id is the same for
    /// the same material and thickness no matter in which order parts were
    /// discovered.
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.material_name.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.thickness.to_le_bytes());
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }
}

/// Aggregate of identical parts within a group
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    /// Display name (the definition name)
    pub name: String,
    /// Nominal size of the first occurrence
    pub size: Size,
    /// Raw size of the first occurrence
    pub raw_size: Size,
    /// Number of instances folded into this record
    pub count: usize,
    /// Unique identifiers of the source instances, in discovery order
    pub component_guids: Vec<String>,
}

impl PartRecord {
    fn new(name: &str, size: Size, raw_size: Size) -> Self {
        Self {
            name: name.to_string(),
            size,
            raw_size,
            count: 0,
            component_guids: Vec::new(),
        }
    }

    /// Fold one more source instance into the record
    pub(crate) fn add_instance(&mut self, guid: &str) {
        self.count += 1;
        self.component_guids.push(guid.to_string());
    }
}

/// Parts sharing a material and raw thickness
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    /// Stable group id, see [`GroupKey::id`]
    pub id: String,
    /// Material name, or the undefined-material sentinel
    pub material_name: String,
    /// Resolved raw thickness in scene units
    pub raw_thickness: f64,
    /// Whether the raw thickness is a catalog value
    ///
    /// Fixed when the group is created.
    pub raw_thickness_available: bool,
    /// Number of instances in the group (not distinct parts)
    pub part_count: usize,
    /// Distinct parts keyed by definition name
    pub parts: BTreeMap<String, PartRecord>,
}

impl GroupRecord {
    fn new(key: &GroupKey, raw_thickness: f64, raw_thickness_available: bool) -> Self {
        Self {
            id: key.id(),
            material_name: key.material_name().to_string(),
            raw_thickness,
            raw_thickness_available,
            part_count: 0,
            parts: BTreeMap::new(),
        }
    }

    /// Look up a part by name, creating it with the given sizes on first use
    ///
    /// Sizes of later occurrences are ignored.
    pub(crate) fn part_entry(&mut self, name: &str, size: Size, raw_size: Size) -> &mut PartRecord {
        let material = &self.material_name;
        self.parts.entry(name.to_string()).or_insert_with(|| {
            debug!(part = name, material = %material, "Created part record");
            PartRecord::new(name, size, raw_size)
        })
    }
}

/// Aggregate root of one generation request
#[derive(Debug, Clone, PartialEq)]
pub struct Cutlist {
    /// Always [`Status::Success`] once built
    pub status: Status,
    /// Scene display name or path
    pub filepath: String,
    /// Linear unit of every length in the cutlist
    pub length_unit: LengthUnit,
    /// Advisory warnings, in the order they were raised
    pub warnings: Vec<String>,
    /// Advisory errors, in the order they were raised
    pub errors: Vec<String>,
    /// Groups keyed by material and raw thickness
    pub groups: BTreeMap<GroupKey, GroupRecord>,
}

impl Cutlist {
    /// Create an empty cutlist for a scene
    pub fn new(filepath: impl Into<String>, length_unit: LengthUnit) -> Self {
        Self {
            status: Status::Success,
            filepath: filepath.into(),
            length_unit,
            warnings: Vec::new(),
            errors: Vec::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Look up a group, creating it on first use
    ///
    /// `raw_thickness_available` is only recorded when the group is created.
    pub(crate) fn group_entry(
        &mut self,
        key: GroupKey,
        raw_thickness: f64,
        raw_thickness_available: bool,
    ) -> &mut GroupRecord {
        self.groups.entry(key).or_insert_with_key(|key| {
            debug!(
                material = key.material_name(),
                raw_thickness, raw_thickness_available, "Created group"
            );
            GroupRecord::new(key, raw_thickness, raw_thickness_available)
        })
    }
}

//! Report building: ordering, numbering and totals

use crate::model::{
    Cutlist, CutlistOptions, GroupRecord, PartRecord, Report, ReportGroup, ReportPart,
};
use crate::numbering::PartNumberSequence;
use crate::units::LengthUnit;
use std::cmp::Ordering;

/// Turn an aggregated cutlist into an ordered, numbered report
///
/// Groups are numbered thickest first, then listed by material name and
/// decreasing thickness without renumbering. Inside a group, parts are
/// numbered by decreasing thickness, length and width.
pub fn build_report(cutlist: &Cutlist, options: &CutlistOptions) -> Report {
    let mut numbering = PartNumberSequence::new(options.part_number_letter);

    let mut groups: Vec<&GroupRecord> = cutlist.groups.values().collect();
    groups.sort_by(|a, b| b.raw_thickness.total_cmp(&a.raw_thickness));

    let mut report_groups: Vec<ReportGroup> = groups
        .into_iter()
        .map(|group| {
            if options.part_number_sequence_by_group {
                numbering.reset();
            }
            build_group(group, cutlist.length_unit, &mut numbering)
        })
        .collect();

    report_groups.sort_by(|a, b| {
        a.material_name
            .cmp(&b.material_name)
            .then_with(|| b.raw_thickness.total_cmp(&a.raw_thickness))
    });

    Report {
        status: cutlist.status,
        errors: cutlist.errors.clone(),
        warnings: cutlist.warnings.clone(),
        filepath: cutlist.filepath.clone(),
        length_unit: cutlist.length_unit,
        groups: report_groups,
    }
}

fn by_size_descending(a: &PartRecord, b: &PartRecord) -> Ordering {
    b.size
        .thickness()
        .total_cmp(&a.size.thickness())
        .then_with(|| b.size.length().total_cmp(&a.size.length()))
        .then_with(|| b.size.width().total_cmp(&a.size.width()))
}

fn build_group(
    group: &GroupRecord,
    unit: LengthUnit,
    numbering: &mut PartNumberSequence,
) -> ReportGroup {
    let mut parts: Vec<&PartRecord> = group.parts.values().collect();
    parts.sort_by(|a, b| by_size_descending(a, b));

    let mut raw_area_m2 = 0.0;
    let mut raw_volume_m3 = 0.0;
    let mut report_parts = Vec::with_capacity(parts.len());
    for (part, number) in parts.into_iter().zip(numbering.by_ref()) {
        raw_area_m2 += part.raw_size.area_m2(unit);
        raw_volume_m3 += part.raw_size.volume_m3(unit);
        report_parts.push(ReportPart {
            name: part.name.clone(),
            length: part.size.length(),
            width: part.size.width(),
            thickness: part.size.thickness(),
            count: part.count,
            raw_length: part.raw_size.length(),
            raw_width: part.raw_size.width(),
            number,
            component_guids: part.component_guids.clone(),
        });
    }

    ReportGroup {
        id: group.id.clone(),
        material_name: group.material_name.clone(),
        part_count: group.part_count,
        raw_thickness: group.raw_thickness,
        raw_thickness_available: group.raw_thickness_available,
        raw_area_m2,
        raw_volume_m3,
        parts: report_parts,
    }
}

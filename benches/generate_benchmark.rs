use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use cutlist::{
    BoundingBox, CutlistOptions, Definition, Entity, Instance, LengthUnit, Scene,
    StandardThicknesses, generate_cutlist,
};
use std::hint::black_box;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const PANELS: [(&str, [f64; 3]); 5] = [
    ("Side", [720.0, 560.0, 18.0]),
    ("Bottom", [564.0, 560.0, 18.0]),
    ("Shelf", [562.0, 540.0, 18.0]),
    ("Back", [716.0, 596.0, 3.0]),
    ("Door", [716.0, 596.0, 22.0]),
];

/// Kitchen run of `cabinets` identical cabinets, each a nested assembly
fn kitchen(cabinets: usize) -> Scene {
    let mut scene = Scene::new("kitchen", LengthUnit::Millimeter);
    let materials = [scene.add_material("Birch plywood"), scene.add_material("MDF")];

    let mut carcass = Definition::new("Cabinet");
    for (i, (name, extents)) in PANELS.iter().enumerate() {
        let bounds = BoundingBox::from_extents(*extents);
        let panel =
            scene.add_definition(Definition::new(*name).with_entity(Entity::face(bounds)));
        for copy in 0..2 {
            carcass.entities.push(
                Instance::new(format!("{}-{}", name, copy), panel, bounds)
                    .with_material(materials[i % 2])
                    .into(),
            );
        }
    }
    let carcass = scene.add_definition(carcass);

    for i in 0..cabinets {
        let offset = 600.0 * i as f64;
        let bounds = BoundingBox::new([offset, 0.0, 0.0], [offset + 600.0, 560.0, 720.0]);
        scene.add_entity(Instance::new(format!("cabinet-{}", i), carcass, bounds));
    }
    scene
}

/// 3MF package holding `items` copies of a single board
fn boards_3mf(items: usize) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#,
    )
    .unwrap();
    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rel0" Target="/3D/3dmodel.model" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#,
    )
    .unwrap();

    let mut model_xml = String::from(
        r#"<model unit="millimeter" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
    <resources>
        <object id="1" type="model" name="Board">
            <mesh>
                <vertices>
"#,
    );
    for i in 0..8 {
        let x = if i & 1 == 0 { 0.0 } else { 800.0 };
        let y = if i & 2 == 0 { 0.0 } else { 300.0 };
        let z = if i & 4 == 0 { 0.0 } else { 18.0 };
        model_xml.push_str(&format!(
            "                    <vertex x=\"{}\" y=\"{}\" z=\"{}\"/>\n",
            x, y, z
        ));
    }
    model_xml.push_str("                </vertices>\n                <triangles>\n");
    for [a, b, c] in [[0, 2, 1], [1, 2, 3], [4, 5, 6], [5, 7, 6]] {
        model_xml.push_str(&format!(
            "                    <triangle v1=\"{}\" v2=\"{}\" v3=\"{}\"/>\n",
            a, b, c
        ));
    }
    model_xml.push_str("                </triangles>\n            </mesh>\n        </object>\n    </resources>\n    <build>\n");
    for i in 0..items {
        model_xml.push_str(&format!(
            "        <item objectid=\"1\" transform=\"1 0 0 0 1 0 0 0 1 0 0 {}\"/>\n",
            i * 20
        ));
    }
    model_xml.push_str("    </build>\n</model>\n");

    zip.start_file("3D/3dmodel.model", options).unwrap();
    zip.write_all(model_xml.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let options = CutlistOptions::new()
        .with_length_increase(10.0)
        .with_width_increase(5.0)
        .with_standard_thicknesses(StandardThicknesses::new(vec![3.0, 12.0, 18.0, 22.0]).unwrap());

    for &cabinets in &[10, 100, 1000] {
        let scene = kitchen(cabinets);
        group.bench_with_input(
            BenchmarkId::new("cabinets", cabinets),
            &scene,
            |b, scene| b.iter(|| black_box(generate_cutlist(scene, &options).unwrap())),
        );
    }

    group.finish();
}

fn bench_load_3mf(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_3mf");

    for &items in &[100, 1000] {
        let bytes = boards_3mf(items);
        group.bench_with_input(BenchmarkId::new("items", items), &bytes, |b, bytes| {
            b.iter(|| {
                let scene = Scene::from_3mf_reader(Cursor::new(bytes.as_slice()), "boards").unwrap();
                black_box(generate_cutlist(&scene, &CutlistOptions::new()).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_generate, bench_load_3mf);
criterion_main!(benches);

//! Cutlist generator for 3MF files
//!
//! Loads a 3MF file, extracts its parts and prints the cutlist as a table or
//! as JSON. Log output goes to stderr and is controlled by `RUST_LOG`.

#![forbid(unsafe_code)]

use clap::Parser;
use cutlist::{CutlistParams, Report, ReportGroup, Scene, generate_cutlist_with_params};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the cutlist generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the 3MF file
    #[arg(value_name = "FILE")]
    file_path: PathBuf,

    /// Margin added to every part length (e.g. "50mm"; unitless values are in the model unit)
    #[arg(long, value_name = "LENGTH", default_value = "0", allow_hyphen_values = true)]
    length_increase: String,

    /// Margin added to every part width
    #[arg(long, value_name = "LENGTH", default_value = "0", allow_hyphen_values = true)]
    width_increase: String,

    /// Margin added to every part thickness before catalog rounding
    #[arg(long, value_name = "LENGTH", default_value = "0", allow_hyphen_values = true)]
    thickness_increase: String,

    /// Standard thicknesses in millimeters, separated by ';' (e.g. "12;18;22")
    #[arg(long, value_name = "LIST", default_value = "")]
    std_thicknesses: String,

    /// Number parts with letters (A, B, …) instead of digits
    #[arg(short, long)]
    letters: bool,

    /// Restart part numbers in every group
    #[arg(short, long)]
    reset_per_group: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scene = Scene::from_3mf_file(&args.file_path)?;
    let params = CutlistParams {
        length_increase: args.length_increase,
        width_increase: args.width_increase,
        thickness_increase: args.thickness_increase,
        std_thicknesses: args.std_thicknesses,
        part_number_letter: args.letters,
        part_number_sequence_by_group: args.reset_per_group,
    };
    let report = generate_cutlist_with_params(&scene, params)?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Print the report as plain-text tables, one per group
fn print_report(report: &Report) {
    let unit = report.length_unit.suffix();

    println!("Cutlist: {} (lengths in {})", report.filepath, report.length_unit);
    for error in &report.errors {
        println!("error: {}", error);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }

    for group in &report.groups {
        println!();
        print_group(group, unit);
    }
}

fn print_group(group: &ReportGroup, unit: &str) {
    let availability = if group.raw_thickness_available {
        ""
    } else {
        " (non-standard)"
    };
    println!(
        "{} / {}{}{}: {} part(s), {:.3} m², {:.4} m³",
        group.material_name,
        group.raw_thickness,
        unit,
        availability,
        group.part_count,
        group.raw_area_m2,
        group.raw_volume_m3
    );
    println!(
        "  {:<6} {:<24} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "#", "name", "qty", "length", "width", "thickness", "raw len", "raw width"
    );
    for part in &group.parts {
        println!(
            "  {:<6} {:<24} {:>5} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
            part.number,
            part.name,
            part.count,
            part.length,
            part.width,
            part.thickness,
            part.raw_length,
            part.raw_width
        );
    }
}

//! mpr-convert - CLI tool to convert toolpath job descriptions to WoodWOP
//! MPR files.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mpr_core::{
    compile_job, generate_mpr, parse_job_file, resolve_clearance, write_mpr_file,
    CoordinateSystem, ExportConfig,
};

/// Convert toolpath job descriptions to WoodWOP MPR format for HOMAG CNC
/// woodworking machines.
#[derive(Parser, Debug)]
#[command(name = "mpr-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input job description (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output MPR file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Coordinate precision in decimal places (1-6)
    #[arg(short, long, default_value = "3")]
    precision: u8,

    /// Suppress comment output
    #[arg(long)]
    no_comments: bool,

    /// Keep every rapid move as a contour line instead of skipping
    /// approach/retract chains
    #[arg(long)]
    use_rapids: bool,

    /// Offset output coordinates so the part minimum becomes the origin
    #[arg(long)]
    g54: bool,

    /// Use Z values from the job without applying the coordinate offset
    #[arg(long)]
    use_part_z: bool,

    /// Disable the 20mm minimum clearance height
    #[arg(long)]
    no_min_clearance: bool,

    /// Workpiece length in mm (overrides the job description)
    #[arg(long)]
    workpiece_length: Option<f64>,

    /// Workpiece width in mm (overrides the job description)
    #[arg(long)]
    workpiece_width: Option<f64>,

    /// Workpiece thickness in mm (overrides the job description)
    #[arg(long)]
    workpiece_thickness: Option<f64>,

    /// Output compiled contours and operations as JSON instead of MPR
    #[arg(long)]
    debug: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Processing: {}", args.input.display());

    let mut job = parse_job_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    // Flag overrides
    if let Some(length) = args.workpiece_length {
        job.workpiece.length = length;
    }
    if let Some(width) = args.workpiece_width {
        job.workpiece.width = width;
    }
    if let Some(thickness) = args.workpiece_thickness {
        job.workpiece.thickness = thickness;
    }

    let cfg = ExportConfig {
        precision: args.precision,
        output_comments: !args.no_comments,
        include_rapids: args.use_rapids,
        coordinate_system: args.g54.then_some(CoordinateSystem::G54),
        use_part_z: args.use_part_z,
        enforce_min_clearance: !args.no_min_clearance,
        ..Default::default()
    };

    info!("Compiling {} path object(s)", job.objects.len());
    let output = compile_job(&job.objects, &job.workpiece, &cfg);

    if output.is_empty() {
        warn!("No contours or operations compiled from the job");
    } else {
        info!(
            "Compiled {} contour(s), {} operation(s), {} tool(s)",
            output.contours.len(),
            output.operations.len(),
            output.tools_used.len()
        );
    }

    // Debug output
    if args.debug {
        let json = serde_json::to_string_pretty(&output)?;
        println!("{}", json);
        return Ok(());
    }

    let z_safe = resolve_clearance(job.clearance, cfg.enforce_min_clearance);
    let mpr = generate_mpr(&output, &job.workpiece, &cfg, z_safe);

    // Write output
    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("mpr");
        path
    });

    write_mpr_file(&output_path, &mpr)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    info!("Generated: {}", output_path.display());

    Ok(())
}

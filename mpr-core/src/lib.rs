//! mpr-core - Core library for compiling toolpaths to WoodWOP MPR format.
//!
//! This library compiles an ordered motion-command stream (rapid, linear,
//! and circular moves plus drilling cycles) into contour and operation
//! records, and serializes them into the MPR 4.0 text format consumed by
//! HOMAG CNC woodworking controllers. Output uses CRLF line endings and the
//! Windows-1252 codepage throughout.
//!
//! # Example
//!
//! ```no_run
//! use mpr_core::{export_mpr, parse_job_file, ExportConfig};
//! use std::path::Path;
//!
//! let job = parse_job_file(Path::new("cabinet_side.json")).unwrap();
//! let mpr = export_mpr(&job.objects, &job.workpiece, &ExportConfig::default(), job.clearance);
//! println!("{}", mpr);
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod job;
pub mod model;

// Re-exports for convenience
pub use config::{CoordinateSystem, ExportConfig, Workpiece};
pub use error::{ExportError, Result};
pub use generator::{generate_mpr, normalize_content, write_mpr_file};
pub use geometry::{part_bounds, part_minimum, tool_compensation, Bounds, CoordinateOffset};
pub use job::{
    compile_job, parse_job_file, resolve_clearance, JobDescription, OperationKind, PathObject,
};
pub use model::{
    Compensation, CompiledOutput, Contour, ContourElement, MotionCommand, MotionKind, Operation,
};

/// Compile a job and serialize it to MPR text.
///
/// This is the main high-level function covering the full pipeline:
/// 1. Compile contours and operations from the path objects
/// 2. Resolve the clearance height against the minimum policy
/// 3. Serialize and normalize the MPR document
///
/// The result is never empty: an empty compilation still yields the header,
/// variable block, and workpiece footer.
pub fn export_mpr(
    objects: &[PathObject],
    workpiece: &Workpiece,
    cfg: &ExportConfig,
    clearance_hint: Option<f64>,
) -> String {
    let output = compile_job(objects, workpiece, cfg);
    let z_safe = resolve_clearance(clearance_hint, cfg.enforce_min_clearance);
    generate_mpr(&output, workpiece, cfg, z_safe)
}

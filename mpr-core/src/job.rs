//! Job processing: classify path objects, compile contours and operations
//! into the output aggregate.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compiler::{extract_contour, extract_drill_points};
use crate::config::{ExportConfig, Workpiece, DEFAULT_CLEARANCE, DEFAULT_TOOL, MIN_CLEARANCE};
use crate::error::{ExportError, Result};
use crate::geometry::tool_compensation;
use crate::model::{CompiledOutput, Contour, MotionCommand, Operation};

/// Operation classification, normally supplied by the host metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Profile,
    Contour,
    Drilling,
    Pocket,
}

/// One path-bearing object from the host: a command stream plus metadata.
///
/// Every host capability is an explicit optional field; resolution and
/// defaulting happen here, never by probing host internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathObject {
    #[serde(default)]
    pub label: String,
    /// Operation classification hint. Falls back to command analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<OperationKind>,
    /// Tool number reference. Falls back to tool 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<u32>,
    pub commands: Vec<MotionCommand>,
}

/// Full job description: the CLI input document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDescription {
    pub workpiece: Workpiece,
    /// Clearance height hint from the host setup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clearance: Option<f64>,
    pub objects: Vec<PathObject>,
}

/// Parse a JSON job description from a path.
pub fn parse_job_file(path: &Path) -> Result<JobDescription> {
    if !path.exists() {
        return Err(ExportError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path)?;
    let job = serde_json::from_str(&content)?;
    Ok(job)
}

/// Classify a path object, preferring the host hint.
///
/// Fallback heuristic: drilling cycles dominate, then arcs make it a
/// profile, anything else is a plain contour.
pub fn classify(obj: &PathObject) -> OperationKind {
    if let Some(kind) = obj.kind {
        return kind;
    }

    let has_drilling = obj.commands.iter().any(|c| c.kind.is_drill());
    if has_drilling {
        return OperationKind::Drilling;
    }
    let has_arcs = obj.commands.iter().any(|c| c.kind.is_arc());
    if has_arcs {
        return OperationKind::Profile;
    }
    OperationKind::Contour
}

/// Process one path object into the output aggregate.
pub fn process_object(
    output: &mut CompiledOutput,
    obj: &PathObject,
    workpiece: &Workpiece,
    cfg: &ExportConfig,
) {
    match classify(obj) {
        OperationKind::Profile | OperationKind::Contour => {
            let (elements, start) = extract_contour(&obj.commands, cfg.include_rapids);
            if elements.is_empty() {
                debug!("skipping '{}': no contour elements", obj.label);
                return;
            }

            let id = output.allocate_contour_id();
            let mut contour = Contour::new(id, label_or(obj, "Contour", id), start);
            contour.elements = elements;
            let last_element = contour.elements.len() - 1;
            output.contours.push(contour);

            let tool = obj.tool.unwrap_or(DEFAULT_TOOL);
            output.tools_used.insert(tool);

            let compensation = tool_compensation(output, id, workpiece);
            output.operations.push(Operation::ContourMill {
                contour_id: id,
                tool,
                compensation,
                last_element,
            });
        }
        OperationKind::Drilling => {
            let tool = obj.tool.unwrap_or(DEFAULT_TOOL);
            let points = extract_drill_points(&obj.commands);
            if !points.is_empty() {
                output.tools_used.insert(tool);
            }
            for point in points {
                output.operations.push(Operation::Drill {
                    x: point.x,
                    y: point.y,
                    depth: point.depth,
                    tool,
                });
            }
        }
        OperationKind::Pocket => {
            let (elements, start) = extract_contour(&obj.commands, cfg.include_rapids);
            if elements.is_empty() {
                debug!("skipping '{}': no contour elements", obj.label);
                return;
            }

            let id = output.allocate_contour_id();
            let mut contour = Contour::new(id, label_or(obj, "Pocket", id), start);
            contour.elements = elements;
            output.contours.push(contour);

            let tool = obj.tool.unwrap_or(DEFAULT_TOOL);
            output.tools_used.insert(tool);
            output.operations.push(Operation::Pocket {
                contour_id: id,
                tool,
            });
        }
    }
}

/// Compile a full object list into a fresh output aggregate.
pub fn compile_job(
    objects: &[PathObject],
    workpiece: &Workpiece,
    cfg: &ExportConfig,
) -> CompiledOutput {
    let mut output = CompiledOutput::new();
    for obj in objects {
        process_object(&mut output, obj, workpiece, cfg);
    }
    output
}

/// Resolve the clearance height from the host hint, enforcing the 20mm
/// minimum unless disabled.
pub fn resolve_clearance(hint: Option<f64>, enforce_min: bool) -> f64 {
    let z_safe = hint.unwrap_or(DEFAULT_CLEARANCE);
    if enforce_min && z_safe < MIN_CLEARANCE {
        warn!(
            "clearance height {:.3} mm below the {:.0} mm minimum, raising",
            z_safe, MIN_CLEARANCE
        );
        return MIN_CLEARANCE;
    }
    z_safe
}

fn label_or(obj: &PathObject, prefix: &str, id: u32) -> String {
    if obj.label.is_empty() {
        format!("{}{}", prefix, id)
    } else {
        obj.label.clone()
    }
}

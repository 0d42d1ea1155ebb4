//! Drill point extraction from drilling-cycle commands.

use serde::{Deserialize, Serialize};

use crate::model::{MotionCommand, MotionKind};

/// A single drilling position with its depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Extract one drill point per drilling-cycle command.
///
/// Position is tracked through rapid and linear moves so drilling cycles
/// with omitted X/Y land at the current position. Depth is measured from
/// the retract height R when one is given, otherwise from Z=0.
pub fn extract_drill_points(commands: &[MotionCommand]) -> Vec<DrillPoint> {
    let mut points = Vec::new();
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    let mut cz = 0.0_f64;

    for cmd in commands {
        match cmd.kind {
            MotionKind::Drill | MotionKind::DrillDwell | MotionKind::DrillPeck => {
                let x = cmd.x.unwrap_or(cx);
                let y = cmd.y.unwrap_or(cy);
                let z = cmd.z.unwrap_or(cz);
                let r = cmd.r.unwrap_or(0.0);

                let depth = if r != 0.0 { (z - r).abs() } else { z.abs() };

                points.push(DrillPoint { x, y, depth });
                cx = x;
                cy = y;
            }
            MotionKind::Rapid | MotionKind::Linear => {
                cx = cmd.x.unwrap_or(cx);
                cy = cmd.y.unwrap_or(cy);
                cz = cmd.z.unwrap_or(cz);
            }
            MotionKind::ArcCw | MotionKind::ArcCcw => {}
        }
    }

    points
}

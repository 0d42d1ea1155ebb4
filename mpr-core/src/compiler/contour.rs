//! Contour extraction from an ordered motion-command stream.

use std::f64::consts::PI;

use crate::config::float_cmp::approx_eq;
use crate::model::{
    ArcDirection, ContourElement, MotionCommand, MotionKind, MoveClass, StartPoint,
};

/// Extract contour elements and the start position from a command stream.
///
/// Position is modal: omitted axes carry the running value forward. The
/// start position is the running position before the first rapid, linear,
/// or arc command.
///
/// Rapid policy: with `include_rapids` every non-degenerate rapid becomes a
/// line element. Without it, rapid chains before the first and after the
/// last working command (linear/arc) are position-only updates, because the
/// downstream machine generates its own approach and retract moves; rapids
/// between working commands stay part of the cut path. When the stream has
/// no working command at all, every rapid is kept.
pub fn extract_contour(
    commands: &[MotionCommand],
    include_rapids: bool,
) -> (Vec<ContourElement>, StartPoint) {
    let mut elements = Vec::new();
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    let mut cz = 0.0_f64;
    let mut start: Option<StartPoint> = None;

    // First pass: bound the working region when rapids are excluded.
    let (first_working, last_working) = if include_rapids {
        (None, None)
    } else {
        working_range(commands)
    };
    let has_working = first_working.is_some();

    for (idx, cmd) in commands.iter().enumerate() {
        let x = cmd.x.unwrap_or(cx);
        let y = cmd.y.unwrap_or(cy);
        let z = cmd.z.unwrap_or(cz);

        if start.is_none() && cmd.kind.is_motion() {
            start = Some(StartPoint::new(cx, cy, cz));
        }

        match cmd.kind {
            MotionKind::Rapid => {
                let degenerate = approx_eq(x, cx) && approx_eq(y, cy) && approx_eq(z, cz);
                let skip_chain = !include_rapids
                    && has_working
                    && (first_working.is_some_and(|first| idx < first)
                        || last_working.is_some_and(|last| idx > last));

                if !degenerate && !skip_chain {
                    elements.push(ContourElement::Line {
                        x,
                        y,
                        z,
                        source: MoveClass::Rapid,
                    });
                }
            }
            MotionKind::Linear => {
                let degenerate = approx_eq(x, cx) && approx_eq(y, cy) && approx_eq(z, cz);
                if !degenerate {
                    elements.push(ContourElement::Line {
                        x,
                        y,
                        z,
                        source: MoveClass::Feed,
                    });
                }
            }
            MotionKind::ArcCw | MotionKind::ArcCcw => {
                let direction = if cmd.kind == MotionKind::ArcCw {
                    ArcDirection::Cw
                } else {
                    ArcDirection::Ccw
                };
                emit_arc(&mut elements, cx, cy, cz, x, y, z, cmd, direction);
            }
            MotionKind::Drill | MotionKind::DrillDwell | MotionKind::DrillPeck => {
                // Drilling cycles carry no contour geometry; position still
                // advances below.
            }
        }

        cx = x;
        cy = y;
        cz = z;
    }

    (elements, start.unwrap_or_default())
}

/// Indices of the first and last working (linear/arc) command.
fn working_range(commands: &[MotionCommand]) -> (Option<usize>, Option<usize>) {
    let mut first = None;
    let mut last = None;
    for (idx, cmd) in commands.iter().enumerate() {
        if cmd.kind.is_working() {
            if first.is_none() {
                first = Some(idx);
            }
            last = Some(idx);
        }
    }
    (first, last)
}

/// Emit an arc command as either a single planar arc element or, when the
/// endpoints differ in Z, a sequence of line segments approximating the
/// helical sweep. The target format has no 3D arcs.
#[allow(clippy::too_many_arguments)]
fn emit_arc(
    elements: &mut Vec<ContourElement>,
    cx: f64,
    cy: f64,
    cz: f64,
    x: f64,
    y: f64,
    z: f64,
    cmd: &MotionCommand,
    direction: ArcDirection,
) {
    let i = cmd.i.unwrap_or(0.0);
    let j = cmd.j.unwrap_or(0.0);
    let center_x = cx + i;
    let center_y = cy + j;
    let radius = (i * i + j * j).sqrt();

    let start_angle = (cy - center_y).atan2(cx - center_x);
    let end_angle = normalize_end_angle(
        start_angle,
        (y - center_y).atan2(x - center_x),
        direction,
    );

    if !approx_eq(z, cz) {
        // Helical arc: discretize at roughly 5 degrees per segment.
        let sweep = (end_angle - start_angle).abs();
        let segments = ((sweep.to_degrees() / 5.0).round() as usize).max(8);

        for seg in 1..=segments {
            let t = seg as f64 / segments as f64;
            let angle = start_angle + (end_angle - start_angle) * t;
            elements.push(ContourElement::Line {
                x: center_x + radius * angle.cos(),
                y: center_y + radius * angle.sin(),
                z: cz + (z - cz) * t,
                source: MoveClass::Feed,
            });
        }
    } else {
        let mid_angle = (start_angle + end_angle) / 2.0;
        elements.push(ContourElement::Arc {
            x,
            y,
            z,
            i,
            j,
            r: radius,
            direction,
            mid_x: center_x + radius * mid_angle.cos(),
            mid_y: center_y + radius * mid_angle.sin(),
        });
    }
}

/// Normalize the end angle so the sweep has the correct sign for the
/// direction: CCW forces end >= start, CW forces end <= start.
pub(crate) fn normalize_end_angle(
    start_angle: f64,
    end_angle: f64,
    direction: ArcDirection,
) -> f64 {
    match direction {
        ArcDirection::Ccw if end_angle < start_angle => end_angle + 2.0 * PI,
        ArcDirection::Cw if end_angle > start_angle => end_angle - 2.0 * PI,
        _ => end_angle,
    }
}

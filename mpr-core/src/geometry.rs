//! Geometric analysis over compiled output: part bounds and tool
//! compensation classification.

use crate::config::{Workpiece, MOTION_EPS};
use crate::model::{Compensation, CompiledOutput, ContourElement, Operation};

/// Axis-aligned bounds of the compiled part.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub min_z: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub max_z: f64,
}

/// Running fold over sample points. Arcs contribute their center (anchored
/// to the previous emitted point) and, when the radius is significant, the
/// conservative center +/- radius extents in X and Y.
#[derive(Default)]
struct Fold {
    min_x: Option<f64>,
    min_y: Option<f64>,
    min_z: Option<f64>,
    max_x: Option<f64>,
    max_y: Option<f64>,
    max_z: Option<f64>,
}

impl Fold {
    fn point(&mut self, x: f64, y: f64, z: Option<f64>) {
        self.x(x);
        self.y(y);
        if let Some(z) = z {
            self.z(z);
        }
    }

    fn x(&mut self, v: f64) {
        self.min_x = Some(self.min_x.map_or(v, |m| m.min(v)));
        self.max_x = Some(self.max_x.map_or(v, |m| m.max(v)));
    }

    fn y(&mut self, v: f64) {
        self.min_y = Some(self.min_y.map_or(v, |m| m.min(v)));
        self.max_y = Some(self.max_y.map_or(v, |m| m.max(v)));
    }

    fn z(&mut self, v: f64) {
        self.min_z = Some(self.min_z.map_or(v, |m| m.min(v)));
        self.max_z = Some(self.max_z.map_or(v, |m| m.max(v)));
    }

    fn finish(self) -> Bounds {
        Bounds {
            min_x: self.min_x.unwrap_or(0.0),
            min_y: self.min_y.unwrap_or(0.0),
            min_z: self.min_z.unwrap_or(0.0),
            max_x: self.max_x.unwrap_or(0.0),
            max_y: self.max_y.unwrap_or(0.0),
            max_z: self.max_z.unwrap_or(0.0),
        }
    }
}

fn fold_output(output: &CompiledOutput) -> Fold {
    let mut fold = Fold::default();

    for contour in &output.contours {
        // A symbolic start Z is a controller-side expression; it contributes
        // no Z sample.
        fold.point(contour.start.x, contour.start.y, contour.start.z.as_numeric());

        let mut prev_x = contour.start.x;
        let mut prev_y = contour.start.y;
        let mut prev_z = contour.start.z.numeric_or(0.0);

        for elem in &contour.elements {
            let (x, y, z) = (elem.end_x(), elem.end_y(), elem.end_z());
            fold.point(x, y, Some(z));

            if let ContourElement::Arc { i, j, r, .. } = elem {
                let center_x = prev_x + i;
                let center_y = prev_y + j;
                fold.point(center_x, center_y, Some(prev_z));

                if *r > MOTION_EPS {
                    fold.x(center_x - r);
                    fold.x(center_x + r);
                    fold.y(center_y - r);
                    fold.y(center_y + r);
                }
            }

            prev_x = x;
            prev_y = y;
            prev_z = z;
        }
    }

    for op in &output.operations {
        if let Operation::Drill { x, y, depth, .. } = op {
            fold.point(*x, *y, Some(-depth));
        }
    }

    fold
}

/// Minimum X/Y/Z over all contours and drill operations. Returns zeros for
/// an empty output; never fails.
pub fn part_minimum(output: &CompiledOutput) -> (f64, f64, f64) {
    let bounds = fold_output(output).finish();
    (bounds.min_x, bounds.min_y, bounds.min_z)
}

/// Full bounds over all contours and drill operations.
pub fn part_bounds(output: &CompiledOutput) -> Bounds {
    fold_output(output).finish()
}

/// Translation applied uniformly to output coordinates when a work
/// coordinate system is active. Computed once per export from the part
/// minimum so the chosen reference point becomes the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordinateOffset {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CoordinateOffset {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Offset that moves the part minimum to the origin.
    pub fn from_minimum(output: &CompiledOutput) -> Self {
        let (min_x, min_y, min_z) = part_minimum(output);
        Self {
            x: -min_x,
            y: -min_y,
            z: -min_z,
        }
    }
}

/// Classify a contour's horizontal position relative to the workpiece.
///
/// Uses the arithmetic mean of the element endpoint X values against the
/// workpiece bounds, with a band of 10% of the workpiece length before a
/// side reference is chosen. Missing or empty contours classify as NoWRK.
pub fn tool_compensation(
    output: &CompiledOutput,
    contour_id: u32,
    workpiece: &Workpiece,
) -> Compensation {
    let contour = match output.contour(contour_id) {
        Some(c) if !c.elements.is_empty() => c,
        _ => return Compensation::NoWrk,
    };

    let sum: f64 = contour.elements.iter().map(|e| e.end_x()).sum();
    let avg_x = sum / contour.elements.len() as f64;

    let threshold = workpiece.length * 0.1;
    if avg_x < workpiece.left_bound() - threshold {
        Compensation::WrkL
    } else if avg_x > workpiece.right_bound() + threshold {
        Compensation::WrkR
    } else {
        Compensation::NoWrk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArcDirection, Contour, MoveClass, StartPoint};

    fn line(x: f64, y: f64, z: f64) -> ContourElement {
        ContourElement::Line {
            x,
            y,
            z,
            source: MoveClass::Feed,
        }
    }

    fn contour_with(id: u32, start: StartPoint, elements: Vec<ContourElement>) -> Contour {
        let mut c = Contour::new(id, "test", start);
        c.elements = elements;
        c
    }

    #[test]
    fn test_empty_output_yields_zeros() {
        let output = CompiledOutput::new();
        assert_eq!(part_minimum(&output), (0.0, 0.0, 0.0));
        assert_eq!(part_bounds(&output), Bounds::default());
    }

    #[test]
    fn test_minimum_over_lines_and_start() {
        let mut output = CompiledOutput::new();
        output.contours.push(contour_with(
            1,
            StartPoint::new(5.0, 5.0, 10.0),
            vec![line(30.0, 40.0, -2.0), line(-3.0, 8.0, 0.0)],
        ));
        assert_eq!(part_minimum(&output), (-3.0, 5.0, -2.0));
    }

    #[test]
    fn test_arc_extent_widens_bounds() {
        // Semicircle from (0,0) to (20,0), center (10,0), r=10: the sweep
        // bound comes from center +/- radius, not the endpoints.
        let mut output = CompiledOutput::new();
        output.contours.push(contour_with(
            1,
            StartPoint::new(0.0, 0.0, 0.0),
            vec![ContourElement::Arc {
                x: 20.0,
                y: 0.0,
                z: 0.0,
                i: 10.0,
                j: 0.0,
                r: 10.0,
                direction: ArcDirection::Ccw,
                mid_x: 10.0,
                mid_y: 10.0,
            }],
        ));
        let bounds = part_bounds(&output);
        assert_eq!(bounds.min_y, -10.0);
        assert_eq!(bounds.max_y, 10.0);
        assert_eq!(bounds.max_x, 20.0);
    }

    #[test]
    fn test_drill_contributes_negative_depth() {
        let mut output = CompiledOutput::new();
        output.operations.push(Operation::Drill {
            x: 50.0,
            y: 60.0,
            depth: 12.0,
            tool: 1,
        });
        assert_eq!(part_minimum(&output), (50.0, 60.0, -12.0));
    }

    #[test]
    fn test_compensation_inside_workpiece() {
        let mut output = CompiledOutput::new();
        output.contours.push(contour_with(
            1,
            StartPoint::default(),
            vec![line(100.0, 0.0, 0.0), line(300.0, 100.0, 0.0)],
        ));
        let wp = Workpiece {
            length: 800.0,
            ..Default::default()
        };
        assert_eq!(tool_compensation(&output, 1, &wp), Compensation::NoWrk);
    }

    #[test]
    fn test_compensation_left_of_workpiece() {
        let mut output = CompiledOutput::new();
        output.contours.push(contour_with(
            1,
            StartPoint::default(),
            vec![line(-200.0, 0.0, 0.0), line(-180.0, 10.0, 0.0)],
        ));
        let wp = Workpiece {
            length: 800.0,
            ..Default::default()
        };
        assert_eq!(tool_compensation(&output, 1, &wp), Compensation::WrkL);
    }

    #[test]
    fn test_compensation_right_of_workpiece() {
        let mut output = CompiledOutput::new();
        output.contours.push(contour_with(
            1,
            StartPoint::default(),
            vec![line(950.0, 0.0, 0.0), line(990.0, 10.0, 0.0)],
        ));
        let wp = Workpiece {
            length: 800.0,
            ..Default::default()
        };
        assert_eq!(tool_compensation(&output, 1, &wp), Compensation::WrkR);
    }

    #[test]
    fn test_compensation_missing_contour_defaults() {
        let output = CompiledOutput::new();
        let wp = Workpiece::default();
        assert_eq!(tool_compensation(&output, 7, &wp), Compensation::NoWrk);
    }
}

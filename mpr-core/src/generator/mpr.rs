//! MPR 4.0 document serializer.
//!
//! Renders the compiled output into the WoodWOP textual grammar: header
//! block, variable block, per-contour element blocks, workpiece footer,
//! optional comment block, and operation blocks, terminated by `!`.

use std::f64::consts::PI;

use tracing::warn;

use crate::compiler::normalize_end_angle;
use crate::config::{ExportConfig, Workpiece, CHORD_EPS, MAX_RADIUS_ITERATIONS, MOTION_EPS};
use crate::geometry::CoordinateOffset;
use crate::model::{ArcDirection, CompiledOutput, Contour, ContourElement, Operation, ZValue};

use super::format::{clamp_precision, fmt, fmt6};
use super::normalize::normalize_content;

/// Line-oriented writer for the MPR grammar.
struct MprWriter {
    lines: Vec<String>,
}

impl MprWriter {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Quoted key="value" field.
    fn field(&mut self, key: &str, value: impl std::fmt::Display) {
        self.lines.push(format!("{}=\"{}\"", key, value));
    }

    /// Unquoted key=value assignment.
    fn assign(&mut self, key: &str, value: impl std::fmt::Display) {
        self.lines.push(format!("{}={}", key, value));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn into_content(self) -> String {
        self.lines.join("\r\n")
    }
}

/// The guaranteed fallback: header, one variable, terminator. Returned
/// whenever the normal pipeline would hand the consumer empty text.
pub fn minimal_document() -> String {
    normalize_content("[H\r\nVERSION=\"4.0 Alpha\"\r\n]H\r\n[001\r\nz_safe=20.0\r\n]001\r\n!")
}

/// Serialize the compiled output into normalized MPR text.
pub fn generate_mpr(
    output: &CompiledOutput,
    workpiece: &Workpiece,
    cfg: &ExportConfig,
    z_safe: f64,
) -> String {
    let precision = clamp_precision(cfg.precision);
    let offset = if cfg.coordinate_system.is_some() {
        CoordinateOffset::from_minimum(output)
    } else {
        CoordinateOffset::zero()
    };

    let mut w = MprWriter::new();

    write_header(&mut w, workpiece);
    write_variables(&mut w, workpiece, cfg, z_safe, precision);

    for contour in &output.contours {
        write_contour(&mut w, contour, &offset, cfg, precision);
    }

    write_workpiece_footer(&mut w);

    // The ordinal counter orders comment and operation blocks; the leading
    // comment block consumes ordinal 1.
    let mut ordinal = 1u32;
    if cfg.output_comments {
        write_comment_block(&mut w, cfg, &offset, ordinal);
    }

    write_operations(&mut w, output, &offset, precision, &mut ordinal);

    if !output.operations.is_empty() {
        w.blank();
    }
    w.push("!");

    let result = normalize_content(&w.into_content());
    if result.is_empty() {
        warn!("serialization produced empty output, using minimal document");
        return minimal_document();
    }
    result
}

/// `[H` header block: fixed literal fields plus derived geometry at 6
/// decimals. UF and ZS reference the z_safe variable symbolically.
fn write_header(w: &mut MprWriter, workpiece: &Workpiece) {
    w.push("[H");
    w.field("VERSION", "4.0 Alpha");
    w.field("WW", "9.0.152");
    w.field("OP", "1");
    w.field("WRK2", "0");
    w.field("SCHN", "0");
    w.field("CVR", "0");
    w.field("POI", "0");
    w.field("HSP", "0");
    w.field("O2", "0");
    w.field("O4", "0");
    w.field("O3", "0");
    w.field("O5", "0");
    w.field("SR", "0");
    w.field("FM", "1");
    w.field("ML", "2000");
    w.field("UF", "z_safe");
    w.field("ZS", "z_safe");
    w.field("DN", "STANDARD");
    w.field("DST", "0");
    w.field("GP", "0");
    w.field("GY", "0");
    w.field("GXY", "0");
    w.field("NP", "1");
    w.field("NE", "0");
    w.field("NA", "0");
    w.field("BFS", "0");
    w.field("US", "0");
    w.field("CB", "0");
    w.field("UP", "0");
    w.field("DW", "0");
    w.field("MAT", "HOMAG");
    w.field("HP_A_O", "STANDARD");
    w.field("OVD_U", "1");
    w.field("OVD", "0");
    w.field("OHD_U", "0");
    w.field("OHD", "2");
    w.field("OOMD_U", "0");
    w.field("EWL", "1");
    w.field("INCH", "0");
    w.field("VIEW", "NOMIRROR");
    w.field("ANZ", "1");
    w.field("BES", "0");
    w.field("ENT", "0");
    w.field("MATERIAL", "");
    w.field("CUSTOMER", "");
    w.field("ORDER", "");
    w.field("ARTICLE", "");
    w.field("PARTID", "");
    w.field("PARTTYPE", "");
    w.field("MPRCOUNT", "1");
    w.field("MPRNUMBER", "1");
    w.field("INFO1", "");
    w.field("INFO2", "");
    w.field("INFO3", "");
    w.field("INFO4", "");
    w.field("INFO5", "");
    w.assign("_BSX", fmt6(workpiece.length));
    w.assign("_BSY", fmt6(workpiece.width));
    w.assign("_BSZ", fmt6(workpiece.thickness));
    w.assign("_FNX", fmt6(workpiece.left_offset));
    w.assign("_FNY", fmt6(workpiece.front_offset));
    w.assign("_RNX", fmt6(workpiece.offset_x));
    w.assign("_RNY", fmt6(workpiece.offset_y));
    w.assign("_RNZ", fmt6(workpiece.offset_z));
    w.assign("_RX", fmt6(workpiece.total_extent_x()));
    w.assign("_RY", fmt6(workpiece.total_extent_y()));
    w.blank();
}

/// `[001` variable block at body precision, with optional descriptions.
fn write_variables(
    w: &mut MprWriter,
    workpiece: &Workpiece,
    cfg: &ExportConfig,
    z_safe: f64,
    precision: u8,
) {
    let var = |w: &mut MprWriter, name: &str, value: f64, comment: &str| {
        w.field(name, fmt(value, precision));
        if cfg.output_comments {
            w.field("KM", comment);
        }
    };

    w.push("[001");
    var(w, "l", workpiece.length, "length in X");
    var(w, "w", workpiece.width, "width in Y");
    var(w, "th", workpiece.thickness, "thickness in Z");
    var(w, "x", workpiece.offset_x, "offset programs in x");
    var(w, "y", workpiece.offset_y, "offset programs in y");
    var(w, "z", workpiece.offset_z, "z offset");
    var(w, "l_off", workpiece.left_offset, "left offset");
    var(w, "f_off", workpiece.front_offset, "front offset");
    var(w, "r_oz", workpiece.right_oversize, "right oversize");
    var(w, "b_oz", workpiece.back_oversize, "back oversize");
    var(w, "z_safe", z_safe, "clearance height");
    w.blank();
}

/// One `]{id}` element block: `$E0` start record plus `$E{n}` per element.
fn write_contour(
    w: &mut MprWriter,
    contour: &Contour,
    offset: &CoordinateOffset,
    cfg: &ExportConfig,
    precision: u8,
) {
    w.push(format!("]{}", contour.id));

    let start_x = contour.start.x + offset.x;
    let start_y = contour.start.y + offset.y;

    // A symbolic start Z is a controller-side expression: emitted verbatim,
    // never offset or formatted.
    let start_z_out = match &contour.start.z {
        ZValue::Symbolic(expr) => expr.clone(),
        ZValue::Numeric(z) => {
            let z = if cfg.use_part_z { *z } else { z + offset.z };
            fmt(z, precision)
        }
    };

    w.push("$E0");
    w.push("KP ");
    w.assign("X", fmt(start_x, precision));
    w.assign("Y", fmt(start_y, precision));
    w.assign("Z", &start_z_out);
    w.push("KO=00");
    w.push(".X=0.000000");
    w.push(".Y=0.000000");
    w.push(".Z=0.000000");
    w.push(".KO=00");
    w.blank();

    // Arc centers stay anchored to the original (pre-offset) geometry so
    // the offset is never applied twice.
    let mut prev_orig_x = contour.start.x;
    let mut prev_orig_y = contour.start.y;
    let mut prev_x = start_x;
    let mut prev_y = start_y;
    let mut prev_z = match &contour.start.z {
        ZValue::Symbolic(_) => 0.0,
        ZValue::Numeric(z) => {
            if cfg.use_part_z {
                *z
            } else {
                z + offset.z
            }
        }
    };

    for (idx, elem) in contour.elements.iter().enumerate() {
        w.push(format!("$E{}", idx + 1));

        let z_value = if cfg.use_part_z {
            elem.end_z()
        } else {
            elem.end_z() + offset.z
        };
        let elem_x = elem.end_x() + offset.x;
        let elem_y = elem.end_y() + offset.y;

        match elem {
            ContourElement::Line { .. } => {
                w.push("KL ");
                w.assign("X", fmt(elem_x, precision));
                w.assign("Y", fmt(elem_y, precision));
                w.assign("Z", fmt(z_value, precision));

                let dx = elem_x - prev_x;
                let dy = elem_y - prev_y;
                let dz = z_value - prev_z;

                let wi_angle = if dx.abs() > MOTION_EPS || dy.abs() > MOTION_EPS {
                    dy.atan2(dx)
                } else {
                    0.0
                };
                let run_xy = (dx * dx + dy * dy).sqrt();
                let wz_angle = if run_xy > MOTION_EPS {
                    dz.atan2(run_xy)
                } else {
                    0.0
                };

                w.assign(".X", fmt(elem_x, precision));
                w.assign(".Y", fmt(elem_y, precision));
                w.assign(".Z", fmt(z_value, precision));
                w.assign(".WI", fmt(wi_angle, precision));
                w.assign(".WZ", fmt(wz_angle, precision));
            }
            ContourElement::Arc {
                i, j, r, direction, ..
            } => {
                let center_x = prev_orig_x + i + offset.x;
                let center_y = prev_orig_y + j + offset.y;

                let start_angle = (prev_y - center_y).atan2(prev_x - center_x);
                let end_angle = normalize_end_angle(
                    start_angle,
                    (elem_y - center_y).atan2(elem_x - center_x),
                    *direction,
                );

                let arc_angle = (end_angle - start_angle).abs();
                let is_small_arc = arc_angle <= PI;

                let radius_from_start =
                    ((prev_x - center_x).powi(2) + (prev_y - center_y).powi(2)).sqrt();
                let radius_to_end =
                    ((elem_x - center_x).powi(2) + (elem_y - center_y).powi(2)).sqrt();
                let radius_avg = (radius_from_start + radius_to_end) / 2.0;

                let mut radius = if *r > MOTION_EPS { *r } else { radius_avg };
                if (radius - radius_from_start).abs() > MOTION_EPS
                    || (radius - radius_to_end).abs() > MOTION_EPS
                {
                    radius = radius_avg;
                }

                let chord = ((elem_x - prev_x).powi(2) + (elem_y - prev_y).powi(2)).sqrt();

                // A true semicircle is numerically unstable to fit: inflate
                // the radius until the diameter covers the chord.
                if (arc_angle - PI).abs() < MOTION_EPS {
                    let mut iteration = 0;
                    while chord - 2.0 * radius > CHORD_EPS && iteration < MAX_RADIUS_ITERATIONS {
                        radius = chord / 2.0 + 0.001;
                        if iteration == 0 {
                            warn!(
                                "180-degree arc: radius too small for chord {:.3}, adjusting to {:.3}",
                                chord, radius
                            );
                        }
                        iteration += 1;
                    }
                    let min_required = chord / 2.0 + 0.001;
                    if radius < min_required {
                        radius = min_required;
                    }
                }

                let ds = match (direction, is_small_arc) {
                    (ArcDirection::Cw, true) => 0,
                    (ArcDirection::Cw, false) => 2,
                    (ArcDirection::Ccw, true) => 1,
                    (ArcDirection::Ccw, false) => 3,
                };

                w.push("KA ");
                w.assign("X", fmt(elem_x, precision));
                w.assign("Y", fmt(elem_y, precision));
                w.assign("Z", fmt(z_value, precision));
                w.assign("DS", ds);
                w.assign("R", fmt(radius, precision));

                w.assign(".X", fmt(elem_x, precision));
                w.assign(".Y", fmt(elem_y, precision));
                w.assign(".Z", fmt(z_value, precision));
                w.assign(".I", fmt(center_x, precision));
                w.assign(".J", fmt(center_y, precision));
                w.assign(".DS", ds);
                w.assign(".R", fmt(radius, precision));
                w.assign(".WI", fmt(start_angle, precision));
                w.assign(".WO", fmt(end_angle, precision));
                w.assign(".WAZ", fmt(0.0, precision));
            }
        }

        prev_x = elem_x;
        prev_y = elem_y;
        prev_z = z_value;
        prev_orig_x = elem.end_x();
        prev_orig_y = elem.end_y();

        w.blank();
    }

    w.blank();
}

/// `<100 \WerkStck\` footer referencing the variable block symbolically.
fn write_workpiece_footer(w: &mut MprWriter) {
    w.push("<100 \\WerkStck\\");
    w.field("LA", "l");
    w.field("BR", "w");
    w.field("DI", "th");
    w.field("FNX", "l_off");
    w.field("FNY", "f_off");
    w.field("RNX", "x");
    w.field("RNY", "y");
    w.field("RNZ", "z");
    w.field("RL", "l_off+l+r_oz");
    w.field("RB", "f_off+w+b_oz");
    w.blank();
}

/// Leading `<101 \Kommentar\` block (ordinal 1).
fn write_comment_block(
    w: &mut MprWriter,
    cfg: &ExportConfig,
    offset: &CoordinateOffset,
    ordinal: u32,
) {
    w.push("<101 \\Kommentar\\");
    w.field("KM", "Generated by mpr-convert");
    w.field(
        "KM",
        format!("Date: {}", cfg.generated_at.format("%Y-%m-%d %H:%M:%S")),
    );
    if let Some(cs) = cfg.coordinate_system {
        w.field(
            "KM",
            format!(
                "Coordinate System: {} (offset: X={:.3}, Y={:.3}, Z={:.3})",
                cs, offset.x, offset.y, offset.z
            ),
        );
    }
    w.field("KAT", "Kommentar");
    w.field("MNM", "Kommentar");
    w.field("ORI", ordinal);
    w.blank();
}

fn write_operations(
    w: &mut MprWriter,
    output: &CompiledOutput,
    offset: &CoordinateOffset,
    precision: u8,
    ordinal: &mut u32,
) {
    for op in &output.operations {
        match op {
            Operation::Drill { x, y, depth, tool } => {
                w.push("<102 \\BohrVert\\");
                w.field("XA", fmt(x + offset.x, precision));
                w.field("YA", fmt(y + offset.y, precision));
                w.field("TI", fmt(*depth, precision));
                w.field("TNO", tool);
                w.field("BM", "SS");
                w.blank();
            }
            Operation::ContourMill {
                contour_id,
                tool,
                compensation,
                ..
            } => {
                // EE is the 1-based number of the last $E record, i.e. the
                // element count.
                let element_count = output
                    .contour(*contour_id)
                    .map(|c| c.elements.len())
                    .unwrap_or(0);

                *ordinal += 1;
                w.push("<101 \\Kommentar\\");
                w.field("KAT", "Fräsen");
                w.field("MNM", "Vertical trimming");
                w.field("ORI", *ordinal);
                w.blank();

                *ordinal += 1;
                w.push("<105 \\Konturfraesen\\");
                w.field("EA", format!("{}:0", contour_id));
                w.field("MDA", "SEN");
                w.field("STUFEN", "0");
                w.field("BL", "0");
                w.field("WZS", "1");
                w.field("OSZI", "0");
                w.field("OSZVS", "0");
                w.field("ZSTART", "0");
                w.field("ANZZST", "0");
                w.field("RK", compensation);
                w.field("EE", format!("{}:{}", contour_id, element_count));
                w.field("MDE", "SEN_AB");
                w.field("EM", "0");
                w.field("RI", "1");
                w.field("TNO", tool);
                w.field("SM", "0");
                w.field("S_", "STANDARD");
                w.field("F_", "5");
                w.field("AB", "0");
                w.field("AF", "0");
                w.field("AW", "0");
                w.field("BW", "0");
                w.field("VLS", "0");
                w.field("VLE", "0");
                w.field("ZA", "@0");
                w.field("SC", "0");
                w.field("TDM", "0");
                w.field("HP", "0");
                w.field("SP", "0");
                w.field("YVE", "0");
                w.field("WW", "1,2,3,401,402,403");
                w.field("ASG", "2");
                w.field("HP_A_O", "STANDARD");
                w.field("KG", "0");
                w.field("RP", "STANDARD");
                w.field("RSEL", "0");
                w.field("RWID", "0");
                w.field("KAT", "Fräsen");
                w.field("MNM", "Vertical trimming");
                w.field("ORI", *ordinal);
                w.field("MX", "0");
                w.field("MY", "0");
                w.field("MZ", "0");
                w.field("MXF", "1");
                w.field("MYF", "1");
                w.field("MZF", "1");
                w.field("SYA", "0");
                w.field("SYV", "0");
                w.blank();
            }
            Operation::Pocket { contour_id, tool } => {
                w.push("<103 \\Pocket\\");
                w.field("EA", format!("{}:0", contour_id));
                w.field("TNO", tool);
                w.blank();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compensation, Contour, MoveClass, StartPoint};

    fn test_config() -> ExportConfig {
        ExportConfig {
            generated_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            ..Default::default()
        }
    }

    fn line(x: f64, y: f64, z: f64) -> ContourElement {
        ContourElement::Line {
            x,
            y,
            z,
            source: MoveClass::Feed,
        }
    }

    fn output_with_line_contour() -> CompiledOutput {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Profile", StartPoint::new(10.0, 10.0, 0.0));
        contour.elements = vec![line(30.0, 40.0, 5.0)];
        output.contours.push(contour);
        output.operations.push(Operation::ContourMill {
            contour_id: id,
            tool: 1,
            compensation: Compensation::NoWrk,
            last_element: 0,
        });
        output
    }

    #[test]
    fn test_document_structure() {
        let output = output_with_line_contour();
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);

        assert!(mpr.starts_with("[H\r\n"));
        assert!(mpr.contains("VERSION=\"4.0 Alpha\""));
        assert!(mpr.contains("[001\r\n"));
        assert!(mpr.contains("]1\r\n"));
        assert!(mpr.contains("$E0\r\n"));
        assert!(mpr.contains("$E1\r\n"));
        assert!(mpr.contains("<100 \\WerkStck\\"));
        assert!(mpr.contains("RL=\"l_off+l+r_oz\""));
        assert!(mpr.contains("<105 \\Konturfraesen\\"));
        assert!(mpr.ends_with("!\r\n"));
    }

    #[test]
    fn test_header_fields_use_six_decimals() {
        let wp = Workpiece {
            length: 400.0,
            width: 300.0,
            thickness: 18.0,
            left_offset: 2.0,
            right_oversize: 3.0,
            ..Default::default()
        };
        let mpr = generate_mpr(&CompiledOutput::new(), &wp, &test_config(), 20.0);
        assert!(mpr.contains("_BSX=400.000000"));
        assert!(mpr.contains("_BSY=300.000000"));
        assert!(mpr.contains("_BSZ=18.000000"));
        assert!(mpr.contains("_RX=405.000000"));
        assert!(mpr.contains("UF=\"z_safe\""));
    }

    #[test]
    fn test_coordinate_offset_applied_to_elements() {
        // One line at (30, 40, 5) with part minimum (10, 10, 0): with a
        // coordinate system active the endpoint serializes at (20, 30).
        let output = output_with_line_contour();
        let cfg = ExportConfig {
            coordinate_system: Some(crate::config::CoordinateSystem::G54),
            ..test_config()
        };
        let mpr = generate_mpr(&output, &Workpiece::default(), &cfg, 20.0);
        assert!(mpr.contains("X=20.000\r\nY=30.000"));
        // Start point moves to the origin.
        assert!(mpr.contains("X=0.000\r\nY=0.000"));
    }

    #[test]
    fn test_no_offset_without_coordinate_system() {
        let output = output_with_line_contour();
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("X=30.000\r\nY=40.000"));
    }

    #[test]
    fn test_symbolic_start_z_emitted_verbatim() {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(
            id,
            "Profile",
            StartPoint {
                x: 0.0,
                y: 0.0,
                z: ZValue::Symbolic("th+z_safe".into()),
            },
        );
        contour.elements = vec![line(10.0, 0.0, 0.0)];
        output.contours.push(contour);

        let cfg = ExportConfig {
            coordinate_system: Some(crate::config::CoordinateSystem::G54),
            ..test_config()
        };
        let mpr = generate_mpr(&output, &Workpiece::default(), &cfg, 20.0);
        assert!(mpr.contains("Z=th+z_safe\r\n"));
    }

    #[test]
    fn test_line_angles() {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Profile", StartPoint::new(0.0, 0.0, 0.0));
        // 45 degrees in the plane, no Z change.
        contour.elements = vec![line(10.0, 10.0, 0.0)];
        output.contours.push(contour);

        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains(".WI=0.785\r\n"));
        assert!(mpr.contains(".WZ=0.000\r\n"));
    }

    #[test]
    fn test_vertical_line_angles_default_to_zero() {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Plunge", StartPoint::new(5.0, 5.0, 0.0));
        contour.elements = vec![line(5.0, 5.0, -10.0)];
        output.contours.push(contour);

        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains(".WI=0.000\r\n"));
        assert!(mpr.contains(".WZ=0.000\r\n"));
    }

    fn arc_output(direction: ArcDirection, x: f64, y: f64, i: f64, j: f64, r: f64) -> CompiledOutput {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Arc", StartPoint::new(10.0, 0.0, 0.0));
        contour.elements = vec![ContourElement::Arc {
            x,
            y,
            z: 0.0,
            i,
            j,
            r,
            direction,
            mid_x: 0.0,
            mid_y: 0.0,
        }];
        output.contours.push(contour);
        output
    }

    #[test]
    fn test_arc_ds_codes() {
        // Quarter circle CCW from (10,0) to (0,10) around the origin.
        let output = arc_output(ArcDirection::Ccw, 0.0, 10.0, -10.0, 0.0, 10.0);
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("DS=1\r\n"));

        // Three-quarter circle CW from (10,0) to (0,10): large arc.
        let output = arc_output(ArcDirection::Cw, 0.0, 10.0, -10.0, 0.0, 10.0);
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("DS=2\r\n"));
    }

    #[test]
    fn test_arc_center_and_angles_in_dotted_block() {
        let output = arc_output(ArcDirection::Ccw, 0.0, 10.0, -10.0, 0.0, 10.0);
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains(".I=0.000\r\n.J=0.000"));
        assert!(mpr.contains(".WI=0.000\r\n"));
        // End angle pi/2.
        assert!(mpr.contains(".WO=1.571\r\n"));
        assert!(mpr.contains(".WAZ=0.000\r\n"));
    }

    #[test]
    fn test_semicircle_radius_safeguard() {
        // Semicircle from (10,0) to (-10,0) with an understated radius: the
        // emitted radius must cover the chord.
        let output = arc_output(ArcDirection::Ccw, -10.0, 0.0, -10.0, 0.0, 9.0);
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        // Chord is 20: 2*r >= chord requires r >= 10.
        assert!(mpr.contains("R=10.001\r\n"));
    }

    #[test]
    fn test_drill_operation_block() {
        let mut output = CompiledOutput::new();
        output.operations.push(Operation::Drill {
            x: 50.0,
            y: 60.0,
            depth: 12.0,
            tool: 4,
        });
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("<102 \\BohrVert\\"));
        assert!(mpr.contains("XA=\"50.000\""));
        assert!(mpr.contains("YA=\"60.000\""));
        assert!(mpr.contains("TI=\"12.000\""));
        assert!(mpr.contains("TNO=\"4\""));
        assert!(mpr.contains("BM=\"SS\""));
    }

    #[test]
    fn test_contour_mill_ea_ee_and_ordinals() {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Profile", StartPoint::default());
        contour.elements = vec![line(10.0, 0.0, 0.0), line(10.0, 10.0, 0.0), line(0.0, 10.0, 0.0)];
        output.contours.push(contour);
        output.operations.push(Operation::ContourMill {
            contour_id: id,
            tool: 7,
            compensation: Compensation::WrkL,
            last_element: 2,
        });

        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("EA=\"1:0\""));
        assert!(mpr.contains("EE=\"1:3\""));
        assert!(mpr.contains("RK=\"WRKL\""));
        assert!(mpr.contains("TNO=\"7\""));
        // Leading comment is ordinal 1, operation comment 2, operation 3.
        assert!(mpr.contains("ORI=\"2\""));
        assert!(mpr.contains("ORI=\"3\""));
    }

    #[test]
    fn test_pocket_operation_block() {
        let mut output = CompiledOutput::new();
        let id = output.allocate_contour_id();
        let mut contour = Contour::new(id, "Pocket", StartPoint::default());
        contour.elements = vec![line(10.0, 0.0, 0.0)];
        output.contours.push(contour);
        output.operations.push(Operation::Pocket {
            contour_id: id,
            tool: 2,
        });
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(mpr.contains("<103 \\Pocket\\"));
        assert!(mpr.contains("EA=\"1:0\""));
    }

    #[test]
    fn test_comments_can_be_suppressed() {
        let cfg = ExportConfig {
            output_comments: false,
            ..test_config()
        };
        let mpr = generate_mpr(&CompiledOutput::new(), &Workpiece::default(), &cfg, 20.0);
        assert!(!mpr.contains("KM="));
        assert!(!mpr.contains("\\Kommentar\\"));
    }

    #[test]
    fn test_normalized_output_discipline() {
        let output = output_with_line_contour();
        let mpr = generate_mpr(&output, &Workpiece::default(), &test_config(), 20.0);
        assert!(crate::generator::verify_content(&mpr).is_empty());
        assert_eq!(normalize_content(&mpr), mpr);
    }

    #[test]
    fn test_minimal_document_shape() {
        let doc = minimal_document();
        assert!(doc.starts_with("[H\r\n"));
        assert!(doc.ends_with("!\r\n"));
        assert!(doc.contains("z_safe=20.0"));
    }
}

//! Operation records paired with compiled contours.

use serde::{Deserialize, Serialize};

/// Tool-side compensation code relative to the workpiece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Compensation {
    /// Reference left of the workpiece.
    WrkL,
    /// No workpiece reference (centered or inside).
    #[default]
    NoWrk,
    /// Reference right of the workpiece.
    WrkR,
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compensation::WrkL => write!(f, "WRKL"),
            Compensation::NoWrk => write!(f, "NoWRK"),
            Compensation::WrkR => write!(f, "WRKR"),
        }
    }
}

/// A machining operation. Contour-bearing variants reference their contour
/// by identifier; the contour itself is owned by the compiled output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Contour milling (Konturfraesen).
    ContourMill {
        contour_id: u32,
        tool: u32,
        compensation: Compensation,
        /// 0-based index of the last contour element.
        last_element: usize,
    },
    /// Pocket milling over a closed contour.
    Pocket { contour_id: u32, tool: u32 },
    /// Vertical drilling (BohrVert) at a point.
    Drill {
        x: f64,
        y: f64,
        depth: f64,
        tool: u32,
    },
}

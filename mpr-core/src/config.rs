//! Configuration constants and settings for the MPR export.

use serde::{Deserialize, Serialize};

/// Displacement below which a move is treated as zero-length.
pub const MOTION_EPS: f64 = 0.001;

/// Tolerance for the 180-degree arc chord safeguard.
pub const CHORD_EPS: f64 = 0.0001;

/// Maximum iterations for the semicircle radius inflation.
pub const MAX_RADIUS_ITERATIONS: u32 = 10;

/// Minimum clearance height in mm enforced unless disabled.
pub const MIN_CLEARANCE: f64 = 20.0;

/// Default clearance height in mm when the job supplies none.
pub const DEFAULT_CLEARANCE: f64 = 20.0;

/// Default workpiece length in mm (X).
pub const DEFAULT_WORKPIECE_LENGTH: f64 = 800.0;

/// Default workpiece width in mm (Y).
pub const DEFAULT_WORKPIECE_WIDTH: f64 = 600.0;

/// Default workpiece thickness in mm (Z).
pub const DEFAULT_WORKPIECE_THICKNESS: f64 = 20.0;

/// Default tool number when the host resolves none.
pub const DEFAULT_TOOL: u32 = 1;

/// Default body precision (decimal places).
pub const DEFAULT_PRECISION: u8 = 3;

/// Work coordinate system selection.
///
/// When set, all output coordinates are translated so the minimum point of
/// the compiled part becomes the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoordinateSystem {
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
}

impl std::fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoordinateSystem::G54 => write!(f, "G54"),
            CoordinateSystem::G55 => write!(f, "G55"),
            CoordinateSystem::G56 => write!(f, "G56"),
            CoordinateSystem::G57 => write!(f, "G57"),
            CoordinateSystem::G58 => write!(f, "G58"),
            CoordinateSystem::G59 => write!(f, "G59"),
        }
    }
}

/// Workpiece and stock geometry resolved from the host job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Workpiece {
    /// Length in X (mm).
    pub length: f64,
    /// Width in Y (mm).
    pub width: f64,
    /// Thickness in Z (mm).
    pub thickness: f64,
    /// Left stock offset (l_off).
    pub left_offset: f64,
    /// Right stock oversize (r_oz).
    pub right_oversize: f64,
    /// Front stock offset (f_off).
    pub front_offset: f64,
    /// Back stock oversize (b_oz).
    pub back_oversize: f64,
    /// Program offset in X.
    pub offset_x: f64,
    /// Program offset in Y.
    pub offset_y: f64,
    /// Program offset in Z.
    pub offset_z: f64,
}

impl Default for Workpiece {
    fn default() -> Self {
        Self {
            length: DEFAULT_WORKPIECE_LENGTH,
            width: DEFAULT_WORKPIECE_WIDTH,
            thickness: DEFAULT_WORKPIECE_THICKNESS,
            left_offset: 0.0,
            right_oversize: 0.0,
            front_offset: 0.0,
            back_oversize: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
        }
    }
}

impl Workpiece {
    /// Left workpiece boundary (program offset plus left stock offset).
    pub fn left_bound(&self) -> f64 {
        self.offset_x + self.left_offset
    }

    /// Right workpiece boundary.
    pub fn right_bound(&self) -> f64 {
        self.left_bound() + self.length
    }

    /// Total stock extent in X (l_off + l + r_oz).
    pub fn total_extent_x(&self) -> f64 {
        self.left_offset + self.length + self.right_oversize
    }

    /// Total stock extent in Y (f_off + w + b_oz).
    pub fn total_extent_y(&self) -> f64 {
        self.front_offset + self.width + self.back_oversize
    }
}

/// Export configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Body precision in decimal places (1-6).
    pub precision: u8,
    /// Emit KM description lines and the comment block.
    pub output_comments: bool,
    /// Include every rapid move as a contour line instead of skipping
    /// approach/retract rapid chains.
    pub include_rapids: bool,
    /// Active work coordinate system, if any.
    pub coordinate_system: Option<CoordinateSystem>,
    /// Use Z values from the job without applying the coordinate offset.
    pub use_part_z: bool,
    /// Enforce the 20mm minimum clearance height.
    pub enforce_min_clearance: bool,
    /// Timestamp for the comment block. Injectable so output stays
    /// deterministic under test.
    pub generated_at: chrono::NaiveDateTime,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            output_comments: true,
            include_rapids: false,
            coordinate_system: None,
            use_part_z: false,
            enforce_min_clearance: true,
            generated_at: chrono::Local::now().naive_local(),
        }
    }
}

/// Utility functions for floating-point comparisons.
pub mod float_cmp {
    use super::MOTION_EPS;

    /// Check if two floats are approximately equal.
    #[inline]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < MOTION_EPS
    }

    /// Check if a float is approximately zero.
    #[inline]
    pub fn approx_zero(a: f64) -> bool {
        a.abs() < MOTION_EPS
    }
}

//! Motion-stream compilation: command streams to contour elements and
//! drill points.

mod contour;
mod drill;

pub use contour::extract_contour;
pub(crate) use contour::normalize_end_angle;
pub use drill::{extract_drill_points, DrillPoint};

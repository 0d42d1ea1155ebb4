//! Data model for compiled toolpath output.

mod command;
mod contour;
mod operation;
mod output;

pub use command::{MotionCommand, MotionKind};
pub use contour::{ArcDirection, Contour, ContourElement, MoveClass, StartPoint, ZValue};
pub use operation::{Compensation, Operation};
pub use output::CompiledOutput;

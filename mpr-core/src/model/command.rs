//! Motion command definition, the input vocabulary of the compiler.

use serde::{Deserialize, Serialize};

/// Kind of motion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// Rapid positioning move (G0).
    Rapid,
    /// Linear interpolation (G1).
    Linear,
    /// Clockwise circular interpolation (G2).
    ArcCw,
    /// Counter-clockwise circular interpolation (G3).
    ArcCcw,
    /// Plain drilling cycle (G81).
    Drill,
    /// Drilling cycle with dwell (G82).
    DrillDwell,
    /// Peck drilling cycle (G83).
    DrillPeck,
}

impl MotionKind {
    /// Linear or circular interpolation, the commands that define the cut.
    pub fn is_working(self) -> bool {
        matches!(self, MotionKind::Linear | MotionKind::ArcCw | MotionKind::ArcCcw)
    }

    /// Any position-affecting move (rapid, linear, or arc).
    pub fn is_motion(self) -> bool {
        matches!(
            self,
            MotionKind::Rapid | MotionKind::Linear | MotionKind::ArcCw | MotionKind::ArcCcw
        )
    }

    pub fn is_arc(self) -> bool {
        matches!(self, MotionKind::ArcCw | MotionKind::ArcCcw)
    }

    pub fn is_drill(self) -> bool {
        matches!(
            self,
            MotionKind::Drill | MotionKind::DrillDwell | MotionKind::DrillPeck
        )
    }
}

/// A single motion command: a kind plus optional axis/parameter values.
///
/// Omitted axes carry the running position forward (modal positioning);
/// resolution against the running position happens in the compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionCommand {
    pub kind: MotionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Arc center offset in X, relative to the command's start point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<f64>,
    /// Arc center offset in Y, relative to the command's start point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub j: Option<f64>,
    /// Retract height for drilling cycles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
}

impl MotionCommand {
    pub fn new(kind: MotionKind) -> Self {
        Self {
            kind,
            x: None,
            y: None,
            z: None,
            i: None,
            j: None,
            r: None,
        }
    }

    pub fn x(mut self, value: f64) -> Self {
        self.x = Some(value);
        self
    }

    pub fn y(mut self, value: f64) -> Self {
        self.y = Some(value);
        self
    }

    pub fn z(mut self, value: f64) -> Self {
        self.z = Some(value);
        self
    }

    pub fn i(mut self, value: f64) -> Self {
        self.i = Some(value);
        self
    }

    pub fn j(mut self, value: f64) -> Self {
        self.j = Some(value);
        self
    }

    pub fn r(mut self, value: f64) -> Self {
        self.r = Some(value);
        self
    }

    /// Shorthand for setting all three axes at once.
    pub fn at(self, x: f64, y: f64, z: f64) -> Self {
        self.x(x).y(y).z(z)
    }
}

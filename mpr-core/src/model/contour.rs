//! Contour and contour element definitions.

use serde::{Deserialize, Serialize};

/// Arc sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    Cw,
    Ccw,
}

/// Source move type recorded on line elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveClass {
    /// Originated from a rapid positioning move.
    Rapid,
    /// Originated from a feed move (linear or discretized arc).
    #[default]
    Feed,
}

/// A Z coordinate that is either a number or a controller-side expression.
///
/// Symbolic values (e.g. `"th+z_safe"`) are emitted verbatim: the controller
/// evaluates them, so they are never offset or formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZValue {
    Numeric(f64),
    Symbolic(String),
}

impl ZValue {
    /// Numeric value, or the fallback for symbolic expressions.
    pub fn numeric_or(&self, fallback: f64) -> f64 {
        match self {
            ZValue::Numeric(v) => *v,
            ZValue::Symbolic(_) => fallback,
        }
    }

    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            ZValue::Numeric(v) => Some(*v),
            ZValue::Symbolic(_) => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, ZValue::Symbolic(_))
    }
}

impl From<f64> for ZValue {
    fn from(value: f64) -> Self {
        ZValue::Numeric(value)
    }
}

/// Contour start position, captured before the first move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartPoint {
    pub x: f64,
    pub y: f64,
    pub z: ZValue,
}

impl StartPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: ZValue::Numeric(z),
        }
    }
}

impl Default for StartPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// A single contour element in absolute coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContourElement {
    /// Straight segment to an endpoint.
    Line {
        x: f64,
        y: f64,
        z: f64,
        source: MoveClass,
    },
    /// Planar arc to an endpoint. `i`/`j` are the center offset relative to
    /// the arc's start point; `mid_x`/`mid_y` is the sweep midpoint used for
    /// three-point disambiguation. Arcs never encode a Z change.
    Arc {
        x: f64,
        y: f64,
        z: f64,
        i: f64,
        j: f64,
        r: f64,
        direction: ArcDirection,
        mid_x: f64,
        mid_y: f64,
    },
}

impl ContourElement {
    pub fn end_x(&self) -> f64 {
        match self {
            ContourElement::Line { x, .. } | ContourElement::Arc { x, .. } => *x,
        }
    }

    pub fn end_y(&self) -> f64 {
        match self {
            ContourElement::Line { y, .. } | ContourElement::Arc { y, .. } => *y,
        }
    }

    pub fn end_z(&self) -> f64 {
        match self {
            ContourElement::Line { z, .. } | ContourElement::Arc { z, .. } => *z,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, ContourElement::Arc { .. })
    }
}

/// An identified, ordered sequence of contour elements with a start point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contour {
    /// 1-based sequential identifier.
    pub id: u32,
    pub label: String,
    pub start: StartPoint,
    pub elements: Vec<ContourElement>,
}

impl Contour {
    pub fn new(id: u32, label: impl Into<String>, start: StartPoint) -> Self {
        Self {
            id,
            label: label.into(),
            start,
            elements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_z_value_numeric_or() {
        assert_eq!(ZValue::Numeric(5.0).numeric_or(0.0), 5.0);
        assert_eq!(ZValue::Symbolic("th+z_safe".into()).numeric_or(0.0), 0.0);
        assert!(ZValue::Symbolic("th".into()).is_symbolic());
    }

    #[test]
    fn test_z_value_untagged_json() {
        let n: ZValue = serde_json::from_str("12.5").unwrap();
        assert_eq!(n, ZValue::Numeric(12.5));
        let s: ZValue = serde_json::from_str("\"th+z_safe\"").unwrap();
        assert_eq!(s, ZValue::Symbolic("th+z_safe".into()));
    }

    #[test]
    fn test_element_accessors() {
        let line = ContourElement::Line {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            source: MoveClass::Feed,
        };
        assert_eq!(line.end_x(), 1.0);
        assert_eq!(line.end_z(), 3.0);
        assert!(!line.is_arc());
    }
}

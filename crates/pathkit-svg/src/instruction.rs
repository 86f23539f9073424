//! Drawing instructions for path-drawing backends.

use std::fmt;

use crate::Point;

/// Paint attributes attached to the end of a shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaintAttrs {
    /// Already multiplied by the document scale.
    pub stroke_width: f64,
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub fill_rule: Option<String>,
    pub stroke_linecap: Option<String>,
    pub stroke_linejoin: Option<String>,
}

impl PaintAttrs {
    /// Paint for a fill-only shape such as a circle.
    pub fn fill_only(fill: Option<String>) -> Self {
        Self {
            fill,
            ..Default::default()
        }
    }
}

/// One drawing call. Every point is in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingInstruction {
    Move(Point),
    Line(Point),
    Curve { c1: Point, c2: Point, end: Point },
    Close,
    Circle { center: Point, radius: f64 },
    /// Last instruction of a shape.
    Paint(PaintAttrs),
}

impl DrawingInstruction {
    /// Short lowercase name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DrawingInstruction::Move(_) => "move",
            DrawingInstruction::Line(_) => "line",
            DrawingInstruction::Curve { .. } => "curve",
            DrawingInstruction::Close => "close",
            DrawingInstruction::Circle { .. } => "circle",
            DrawingInstruction::Paint(_) => "paint",
        }
    }

    pub fn is_paint(&self) -> bool {
        matches!(self, DrawingInstruction::Paint(_))
    }
}

impl fmt::Display for DrawingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawingInstruction::Move(p) => write!(f, "M {} {}", p.x, p.y),
            DrawingInstruction::Line(p) => write!(f, "L {} {}", p.x, p.y),
            DrawingInstruction::Curve { c1, c2, end } => write!(
                f,
                "C {} {} {} {} {} {}",
                c1.x, c1.y, c2.x, c2.y, end.x, end.y
            ),
            DrawingInstruction::Close => f.write_str("Z"),
            DrawingInstruction::Circle { center, radius } => {
                write!(f, "circle {} {} r={}", center.x, center.y, radius)
            }
            DrawingInstruction::Paint(paint) => {
                write!(f, "paint width={}", paint.stroke_width)?;
                if let Some(stroke) = &paint.stroke {
                    write!(f, " stroke={stroke}")?;
                }
                if let Some(fill) = &paint.fill {
                    write!(f, " fill={fill}")?;
                }
                Ok(())
            }
        }
    }
}

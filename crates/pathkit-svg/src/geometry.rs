//! Points and polyline segments.

/// A 2D point.
///
/// Whether a point is in user space or device space is a convention of the
/// code holding it: only [`crate::Transform::apply_point`] moves a point from
/// one to the other.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Direction of the vector `self -> to` in radians, or `None` when the
    /// two points coincide.
    pub fn direction_to(self, to: Point) -> Option<f64> {
        let dx = to.x - self.x;
        let dy = to.y - self.y;
        if dx == 0.0 && dy == 0.0 {
            None
        } else {
            Some(dy.atan2(dx))
        }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// One contiguous sub-path in device space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segment {
    /// Stroke width, already multiplied by the document scale.
    pub width: f64,
    pub closed: bool,
    pub points: Vec<Point>,
}

impl Segment {
    pub fn new(width: f64, start: Point) -> Self {
        Self {
            width,
            closed: false,
            points: vec![start],
        }
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Total length of the polyline.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

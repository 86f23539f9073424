//! Cubic bezier flattening.
//!
//! [`CubicBezier::flatten`] subdivides with de Casteljau until the tangent at
//! each end of a piece agrees with the chord through its midpoint to within a
//! small angle, then emits `start, midpoint, end` for that piece.

use std::f64::consts::{PI, TAU};

use crate::Point;

/// Default flatness threshold: 5 degrees of summed tangent deviation.
pub const DEFAULT_FLATNESS: f64 = 5.0 * PI / 180.0;

/// A cubic bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    /// Start, first control, second control, end.
    pub points: [Point; 4],
    /// Subdivision depth this piece was produced at. Diagnostic only.
    pub depth: u32,
}

/// Absolute difference of two angles, wrapped into `[0, PI]`.
/// An undefined direction contributes no deviation.
fn deviation(a: Option<f64>, b: Option<f64>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    let d = (a - b).abs() % TAU;
    if d > PI {
        TAU - d
    } else {
        d
    }
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self {
            points: [p0, p1, p2, p3],
            depth: 0,
        }
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[3]
    }

    /// Split at `t = 0.5` into two halves sharing the midpoint.
    pub fn split(&self) -> (CubicBezier, CubicBezier) {
        let [p0, p1, p2, p3] = self.points;
        let m12 = p0.midpoint(p1);
        let m23 = p1.midpoint(p2);
        let m34 = p2.midpoint(p3);
        let m123 = m12.midpoint(m23);
        let m234 = m23.midpoint(m34);
        let mid = m123.midpoint(m234);

        let depth = self.depth + 1;
        (
            CubicBezier {
                points: [p0, m12, m123, mid],
                depth,
            },
            CubicBezier {
                points: [mid, m234, m34, p3],
                depth,
            },
        )
    }

    /// Evaluate the curve at `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let [p0, p1, p2, p3] = self.points;
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        Point::new(
            b0 * p0.x + b1 * p1.x + b2 * p2.x + b3 * p3.x,
            b0 * p0.y + b1 * p1.y + b2 * p2.y + b3 * p3.y,
        )
    }

    /// Uniformly sample `n` chords (`n + 1` points), without adaptivity.
    pub fn sample(&self, n: usize) -> Vec<Point> {
        let n = n.max(1);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }

    /// Flatten with the default 5 degree threshold.
    pub fn flatten(&self, max_depth: u32) -> Vec<Point> {
        self.flatten_with(max_depth, DEFAULT_FLATNESS)
    }

    /// Adaptive flattening.
    ///
    /// Never emits the same point twice in a row, so a curve that collapses
    /// to a single point flattens to just that point. Recursion stops at
    /// `max_depth` levels even if the threshold is never met.
    pub fn flatten_with(&self, max_depth: u32, threshold: f64) -> Vec<Point> {
        let mut out = Vec::new();
        self.flatten_into(max_depth, threshold, &mut out);
        out
    }

    fn flatten_into(&self, depth: u32, threshold: f64, out: &mut Vec<Point>) {
        let [p0, _, _, p3] = self.points;
        let (left, right) = self.split();
        let mid = left.end();

        if depth == 0 || self.flatness(&left, &right) <= threshold {
            for p in [p0, mid, p3] {
                if out.last() != Some(&p) {
                    out.push(p);
                }
            }
            return;
        }

        left.flatten_into(depth - 1, threshold, out);
        // `out` now ends at `mid`, which is where `right` starts.
        right.flatten_into(depth - 1, threshold, out);
    }

    /// Summed deviation between the end tangents and the chord at the midpoint.
    ///
    /// When the chord collapses (a cusp at `t = 0.5`) the directions into and
    /// out of the midpoint stand in for it. A piece with no usable direction
    /// there is never flat unless the whole curve is a single point.
    fn flatness(&self, left: &CubicBezier, right: &CubicBezier) -> f64 {
        let [p0, p1, p2, p3] = self.points;

        let start = p0
            .direction_to(p1)
            .or_else(|| p0.direction_to(p2))
            .or_else(|| p0.direction_to(p3));
        let end = p2
            .direction_to(p3)
            .or_else(|| p1.direction_to(p3))
            .or_else(|| p0.direction_to(p3));
        // m123 -> m234 passes through the midpoint.
        if let Some(chord) = left.points[2].direction_to(right.points[1]) {
            return deviation(start, Some(chord)) + deviation(Some(chord), end);
        }

        let mid = left.end();
        match (p0.direction_to(mid), mid.direction_to(p3)) {
            (None, None) if start.is_none() && end.is_none() => 0.0,
            (None, None) => f64::INFINITY,
            (incoming, outgoing) => deviation(start, incoming) + deviation(outgoing, end),
        }
    }
}

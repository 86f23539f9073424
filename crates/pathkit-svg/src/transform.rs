//! 2D affine transforms and the `transform` attribute parser.
//!
//! Builders right-multiply: `Transform::identity().scale(2.0, 2.0).translate(3.0, 4.0)`
//! is `S * T`, so a point is translated first and then scaled. Applied to the
//! origin that yields `(6, 8)`.

use pathkit_lexer::{lex, TokenKind};
use tracing::trace;

use crate::error::{SvgError, SvgResult};
use crate::parse::{paren_number_list, unexpected};
use crate::Point;

/// 3x3 affine matrix, indexed `[row][column]`.
///
/// Only the top two rows are ever changed; the bottom row stays `[0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub m: [[f64; 3]; 3],
}

impl Transform {
    /// Create identity transform.
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Build from SVG `matrix(a, b, c, d, e, f)` operands.
    ///
    /// ```text
    /// [a c e]
    /// [b d f]
    /// [0 0 1]
    /// ```
    pub const fn from_matrix(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            m: [[a, c, e], [b, d, f], [0.0, 0.0, 1.0]],
        }
    }

    /// Full 3x3 product `a * b`.
    pub fn multiply(a: &Transform, b: &Transform) -> Transform {
        let mut out = [[0.0; 3]; 3];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| a.m[row][k] * b.m[k][col]).sum();
            }
        }
        Transform { m: out }
    }

    /// `self * other`: `other` is applied to points first.
    pub fn compose(&self, other: &Transform) -> Transform {
        Transform::multiply(self, other)
    }

    /// Right-multiply `other` onto this transform in place.
    pub fn multiply_with(&mut self, other: &Transform) {
        *self = Transform::multiply(self, other);
    }

    /// Map a point through the affine part.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.m;
        (
            m[0][0] * x + m[0][1] * y + m[0][2],
            m[1][0] * x + m[1][1] * y + m[1][2],
        )
    }

    /// Map a user-space point to device space.
    pub fn apply_point(&self, p: Point) -> Point {
        let (x, y) = self.apply(p.x, p.y);
        Point::new(x, y)
    }

    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.compose(&Transform::from_matrix(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.compose(&Transform::from_matrix(1.0, 0.0, 0.0, 1.0, tx, ty))
    }

    /// Rotate about the origin (radians).
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        self.compose(&Transform::from_matrix(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// Rotate about `(x, y)`: translate there, rotate, translate back by `(-x, -y)`.
    pub fn rotate_about(self, angle: f64, x: f64, y: f64) -> Self {
        self.translate(x, y).rotate(angle).translate(-x, -y)
    }

    /// Skew along the x axis (radians).
    pub fn skew_x(self, angle: f64) -> Self {
        self.compose(&Transform::from_matrix(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0))
    }

    /// Skew along the y axis (radians).
    pub fn skew_y(self, angle: f64) -> Self {
        self.compose(&Transform::from_matrix(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0))
    }

    /// Determinant of the linear part. Zero means the transform is not invertible.
    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    pub fn is_identity(&self) -> bool {
        *self == Transform::identity()
    }

    /// Parse an SVG transform list.
    ///
    /// Supported functions are `matrix(a,b,c,d,e,f)` and `translate(tx,ty)`,
    /// composed left to right. `scale`, `rotate`, `skewX` and `skewY` are
    /// rejected with [`SvgError::UnsupportedTransform`] rather than ignored.
    pub fn parse(text: &str) -> SvgResult<Transform> {
        let mut lexer = lex("transform", text);
        let mut result = Transform::identity();
        let mut functions = 0usize;

        loop {
            lexer.skip_separators();
            let Some(token) = lexer.next_token() else {
                break;
            };
            match token.kind {
                TokenKind::EndOfStream => break,
                TokenKind::Word | TokenKind::Letter => {
                    let t = match token.text.as_str() {
                        "matrix" => {
                            let n = paren_number_list(&mut lexer, "matrix", 6)?;
                            Transform::from_matrix(n[0], n[1], n[2], n[3], n[4], n[5])
                        }
                        "translate" => {
                            let n = paren_number_list(&mut lexer, "translate", 2)?;
                            Transform::identity().translate(n[0], n[1])
                        }
                        other => return Err(SvgError::UnsupportedTransform(other.to_string())),
                    };
                    trace!(function = %token.text, "Parsed transform function");
                    result.multiply_with(&t);
                    functions += 1;
                }
                _ => return Err(unexpected(&token, "transform function name")),
            }
        }

        if functions == 0 {
            return Err(SvgError::grammar("transform list is empty"));
        }
        Ok(result)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

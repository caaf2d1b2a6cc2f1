//! Transform Matrix
//!
//! 2D affine matrix used by `transform` values.

/// 2D Transform Matrix (3x3 homogeneous)
/// | a c e |
/// | b d f |
/// | 0 0 1 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32, // scale x
    pub b: f32, // skew y
    pub c: f32, // skew x
    pub d: f32, // scale y
    pub e: f32, // translate x
    pub f: f32, // translate y
}

impl Matrix {
    /// Identity matrix
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0, b: 0.0,
        c: 0.0, d: 1.0,
        e: 0.0, f: 0.0,
    };

    /// Create from values
    pub fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Translation matrix
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self { e: tx, f: ty, ..Self::IDENTITY }
    }

    /// Scale matrix
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self { a: sx, d: sy, ..Self::IDENTITY }
    }

    /// Rotation matrix (angle in radians)
    pub fn rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            a: cos, b: sin,
            c: -sin, d: cos,
            e: 0.0, f: 0.0,
        }
    }

    /// Skew X matrix (angle in radians)
    pub fn skew_x(angle: f32) -> Self {
        Self { c: angle.tan(), ..Self::IDENTITY }
    }

    /// Skew Y matrix (angle in radians)
    pub fn skew_y(angle: f32) -> Self {
        Self { b: angle.tan(), ..Self::IDENTITY }
    }

    /// Post-multiply: `self * other`, so `other` applies first
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Transform a point
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Invert matrix
    pub fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-10 {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Self {
            a: self.d * inv_det,
            b: -self.b * inv_det,
            c: -self.c * inv_det,
            d: self.a * inv_det,
            e: (self.c * self.f - self.d * self.e) * inv_det,
            f: (self.b * self.e - self.a * self.f) * inv_det,
        })
    }

    /// Check if identity
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Coefficients in `matrix(a b c d e f)` order
    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn test_identity() {
        let m = Matrix::default();
        assert!(m.is_identity());
        assert_eq!(m.transform_point(10.0, 20.0), (10.0, 20.0));
    }

    #[test]
    fn test_post_multiply_order() {
        // translate then scale: scale applies to the point first
        let m = Matrix::translate(10.0, 0.0).multiply(&Matrix::scale(2.0, 2.0));
        assert_eq!(m.transform_point(1.0, 1.0), (12.0, 2.0));
    }

    #[test]
    fn test_rotate() {
        let m = Matrix::rotate(std::f32::consts::FRAC_PI_2);
        assert!(approx(m.transform_point(1.0, 0.0), (0.0, 1.0)));
    }

    #[test]
    fn test_invert() {
        let m = Matrix::translate(5.0, -3.0).multiply(&Matrix::scale(2.0, 4.0));
        let inv = m.invert().unwrap();
        let (x, y) = m.transform_point(3.0, 7.0);
        assert!(approx(inv.transform_point(x, y), (3.0, 7.0)));

        assert!(Matrix::scale(0.0, 1.0).invert().is_none());
    }
}

//! Transform list items

use crate::{Config, Matrix};

/// One entry of a `transform` attribute.
///
/// Optional arguments remember whether they were authored, so that
/// serialization writes back the same arity it was given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Matrix(Matrix),
    Translate { tx: f32, ty: Option<f32> },
    Scale { sx: f32, sy: Option<f32> },
    /// Angle in degrees, optional center of rotation
    Rotate { angle: f32, center: Option<(f32, f32)> },
    /// Angle in degrees
    SkewX(f32),
    /// Angle in degrees
    SkewY(f32),
}

impl Transform {
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::Translate { tx, ty: Some(ty) }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::Scale { sx, sy: Some(sy) }
    }

    pub fn rotate(angle: f32) -> Self {
        Self::Rotate { angle, center: None }
    }

    /// Function name as written in the attribute
    pub fn name(&self) -> &'static str {
        match self {
            Self::Matrix(_) => "matrix",
            Self::Translate { .. } => "translate",
            Self::Scale { .. } => "scale",
            Self::Rotate { .. } => "rotate",
            Self::SkewX(_) => "skewX",
            Self::SkewY(_) => "skewY",
        }
    }

    /// Build from a function name and its argument list
    pub fn from_args(name: &str, args: &[f32]) -> Option<Self> {
        Some(match (name, args) {
            ("matrix", &[a, b, c, d, e, f]) => Self::Matrix(Matrix::new(a, b, c, d, e, f)),
            ("translate", &[tx]) => Self::Translate { tx, ty: None },
            ("translate", &[tx, ty]) => Self::Translate { tx, ty: Some(ty) },
            ("scale", &[sx]) => Self::Scale { sx, sy: None },
            ("scale", &[sx, sy]) => Self::Scale { sx, sy: Some(sy) },
            ("rotate", &[angle]) => Self::Rotate { angle, center: None },
            ("rotate", &[angle, cx, cy]) => Self::Rotate { angle, center: Some((cx, cy)) },
            ("skewX", &[angle]) => Self::SkewX(angle),
            ("skewY", &[angle]) => Self::SkewY(angle),
            _ => return None,
        })
    }

    /// Equivalent affine matrix
    pub fn to_matrix(&self) -> Matrix {
        match *self {
            Self::Matrix(m) => m,
            Self::Translate { tx, ty } => Matrix::translate(tx, ty.unwrap_or(0.0)),
            Self::Scale { sx, sy } => Matrix::scale(sx, sy.unwrap_or(sx)),
            Self::Rotate { angle, center: None } => Matrix::rotate(angle.to_radians()),
            Self::Rotate { angle, center: Some((cx, cy)) } => Matrix::translate(cx, cy)
                .multiply(&Matrix::rotate(angle.to_radians()))
                .multiply(&Matrix::translate(-cx, -cy)),
            Self::SkewX(angle) => Matrix::skew_x(angle.to_radians()),
            Self::SkewY(angle) => Matrix::skew_y(angle.to_radians()),
        }
    }

    pub fn write(&self, out: &mut String, config: &Config) {
        let mut args = [0.0f32; 6];
        let count = match *self {
            Self::Matrix(m) => {
                args = m.to_array();
                6
            }
            Self::Translate { tx, ty } => push_optional(&mut args, tx, ty),
            Self::Scale { sx, sy } => push_optional(&mut args, sx, sy),
            Self::Rotate { angle, center } => {
                args[0] = angle;
                match center {
                    Some((cx, cy)) => {
                        args[1] = cx;
                        args[2] = cy;
                        3
                    }
                    None => 1,
                }
            }
            Self::SkewX(angle) | Self::SkewY(angle) => {
                args[0] = angle;
                1
            }
        };

        out.push_str(self.name());
        out.push('(');
        for (i, arg) in args[..count].iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            config.write_number(out, *arg);
        }
        out.push(')');
    }
}

fn push_optional(args: &mut [f32; 6], first: f32, second: Option<f32>) -> usize {
    args[0] = first;
    match second {
        Some(value) => {
            args[1] = value;
            2
        }
        None => 1,
    }
}

/// Multiply a sequence of transforms into one matrix
pub(crate) fn consolidate(transforms: &[Transform]) -> Matrix {
    transforms
        .iter()
        .fold(Matrix::IDENTITY, |acc, t| acc.multiply(&t.to_matrix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(t: Transform) -> String {
        let mut out = String::new();
        t.write(&mut out, &Config::default());
        out
    }

    #[test]
    fn test_arity_preserved() {
        assert_eq!(written(Transform::Translate { tx: 10.0, ty: None }), "translate(10)");
        assert_eq!(written(Transform::translate(10.0, 0.0)), "translate(10 0)");
        assert_eq!(
            written(Transform::Rotate { angle: 45.0, center: Some((5.0, 5.0)) }),
            "rotate(45 5 5)"
        );
        assert_eq!(written(Transform::SkewY(30.0)), "skewY(30)");
    }

    #[test]
    fn test_from_args_rejects_bad_arity() {
        assert!(Transform::from_args("rotate", &[1.0, 2.0]).is_none());
        assert!(Transform::from_args("matrix", &[1.0; 5]).is_none());
        assert!(Transform::from_args("shear", &[1.0]).is_none());
        assert_eq!(
            Transform::from_args("scale", &[2.0]),
            Some(Transform::Scale { sx: 2.0, sy: None })
        );
    }

    #[test]
    fn test_scale_defaults_to_uniform() {
        let m = Transform::Scale { sx: 3.0, sy: None }.to_matrix();
        assert_eq!(m, Matrix::scale(3.0, 3.0));
    }

    #[test]
    fn test_rotate_about_center() {
        let m = Transform::Rotate { angle: 180.0, center: Some((1.0, 1.0)) }.to_matrix();
        let (x, y) = m.transform_point(1.0, 1.0);
        assert!((x - 1.0).abs() < 1e-5 && (y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_consolidate() {
        let m = consolidate(&[Transform::translate(10.0, 0.0), Transform::scale(2.0, 2.0)]);
        assert_eq!(m.transform_point(1.0, 1.0), (12.0, 2.0));
        assert!(consolidate(&[]).is_identity());
    }
}

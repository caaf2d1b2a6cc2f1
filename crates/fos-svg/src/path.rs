//! Path data segments
//!
//! A [`PathSeg`] is one command of a `d` attribute with its arguments.
//! Segments keep the letter case they were written with, so a relative
//! `l 5 5` is written back as `l 5 5`. [`Normalizer`] rewrites a segment
//! stream into absolute `M`, `L`, `C` and `Z` segments only.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::error::ParseError;
use crate::list::ItemValue;
use crate::parser::ListHandler;
use crate::Config;

/// Longest argument list (`A`)
const MAX_ARGS: usize = 7;

/// Path command, independent of letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCommand {
    ClosePath,
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    QuadraticCurveTo,
    SmoothQuadraticCurveTo,
    Arc,
}

impl PathCommand {
    /// Command and relativity for a path letter
    pub fn from_letter(letter: u8) -> Option<(Self, bool)> {
        let command = match letter.to_ascii_uppercase() {
            b'Z' => Self::ClosePath,
            b'M' => Self::MoveTo,
            b'L' => Self::LineTo,
            b'H' => Self::HorizontalLineTo,
            b'V' => Self::VerticalLineTo,
            b'C' => Self::CurveTo,
            b'S' => Self::SmoothCurveTo,
            b'Q' => Self::QuadraticCurveTo,
            b'T' => Self::SmoothQuadraticCurveTo,
            b'A' => Self::Arc,
            _ => return None,
        };
        Some((command, letter.is_ascii_lowercase()))
    }

    pub fn letter(self, relative: bool) -> char {
        let upper = match self {
            Self::ClosePath => 'Z',
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::HorizontalLineTo => 'H',
            Self::VerticalLineTo => 'V',
            Self::CurveTo => 'C',
            Self::SmoothCurveTo => 'S',
            Self::QuadraticCurveTo => 'Q',
            Self::SmoothQuadraticCurveTo => 'T',
            Self::Arc => 'A',
        };
        if relative { upper.to_ascii_lowercase() } else { upper }
    }

    /// Number of arguments the command takes
    pub fn arity(self) -> usize {
        match self {
            Self::ClosePath => 0,
            Self::HorizontalLineTo | Self::VerticalLineTo => 1,
            Self::MoveTo | Self::LineTo | Self::SmoothQuadraticCurveTo => 2,
            Self::SmoothCurveTo | Self::QuadraticCurveTo => 4,
            Self::CurveTo => 6,
            Self::Arc => 7,
        }
    }
}

/// One path segment.
///
/// Arc flags are stored as `0.0` or `1.0` in argument slots 3 and 4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSeg {
    command: PathCommand,
    relative: bool,
    args: [f32; MAX_ARGS],
}

impl PathSeg {
    /// Build a segment; `None` if `args` does not match the command's arity
    pub fn new(command: PathCommand, relative: bool, args: &[f32]) -> Option<Self> {
        if args.len() != command.arity() {
            return None;
        }
        let mut all = [0.0; MAX_ARGS];
        all[..args.len()].copy_from_slice(args);
        if command == PathCommand::Arc {
            all[3] = flag(all[3] != 0.0);
            all[4] = flag(all[4] != 0.0);
        }
        Some(Self { command, relative, args: all })
    }

    fn absolute(command: PathCommand, args: &[f32]) -> Self {
        let mut all = [0.0; MAX_ARGS];
        all[..args.len()].copy_from_slice(args);
        Self { command, relative: false, args: all }
    }

    pub fn close() -> Self {
        Self::absolute(PathCommand::ClosePath, &[])
    }

    pub fn move_to(x: f32, y: f32) -> Self {
        Self::absolute(PathCommand::MoveTo, &[x, y])
    }

    pub fn line_to(x: f32, y: f32) -> Self {
        Self::absolute(PathCommand::LineTo, &[x, y])
    }

    pub fn curve_to(x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) -> Self {
        Self::absolute(PathCommand::CurveTo, &[x1, y1, x2, y2, x, y])
    }

    pub fn arc(rx: f32, ry: f32, rotation: f32, large_arc: bool, sweep: bool, x: f32, y: f32) -> Self {
        Self::absolute(PathCommand::Arc, &[rx, ry, rotation, flag(large_arc), flag(sweep), x, y])
    }

    /// Same segment written with a lowercase letter
    pub fn to_relative(mut self) -> Self {
        self.relative = true;
        self
    }

    pub fn command(&self) -> PathCommand {
        self.command
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    pub fn letter(&self) -> char {
        self.command.letter(self.relative)
    }

    pub fn args(&self) -> &[f32] {
        &self.args[..self.command.arity()]
    }

    /// Argument-wise sum, if both segments have the same letter.
    /// Arc flags come from `other`.
    pub fn add(&self, other: &PathSeg) -> Option<PathSeg> {
        if self.command != other.command || self.relative != other.relative {
            return None;
        }
        let mut sum = *other;
        for (i, (a, b)) in self.args().iter().zip(other.args()).enumerate() {
            if !(self.command == PathCommand::Arc && (i == 3 || i == 4)) {
                sum.args[i] = a + b;
            }
        }
        Some(sum)
    }

    /// Letter, then each argument preceded by a space: `M 10 20`
    pub fn write(&self, out: &mut String, config: &Config) {
        out.push(self.letter());
        for arg in self.args() {
            out.push(' ');
            config.write_number(out, *arg);
        }
    }
}

fn flag(set: bool) -> f32 {
    if set { 1.0 } else { 0.0 }
}

/// Pen state carried between segments while normalizing
#[derive(Debug, Default, Clone, Copy)]
struct Pen {
    current: (f32, f32),
    subpath_start: (f32, f32),
    /// Second control point of the previous cubic
    cubic_control: Option<(f32, f32)>,
    /// Control point of the previous quadratic
    quad_control: Option<(f32, f32)>,
}

/// Handler adapter that forwards absolute `M`, `L`, `C` and `Z` segments.
///
/// Relative coordinates are resolved against the current point, `H`/`V`
/// become lines, quadratics and smooth curves become cubics with explicit
/// control points, and arcs are split into cubics of at most a quarter turn.
pub struct Normalizer<'a> {
    inner: &'a mut dyn ListHandler,
    pen: Pen,
}

impl<'a> Normalizer<'a> {
    pub fn new(inner: &'a mut dyn ListHandler) -> Self {
        Self { inner, pen: Pen::default() }
    }

    fn emit(&mut self, seg: PathSeg) -> Result<(), ParseError> {
        self.inner.item(ItemValue::PathSeg(seg))
    }

    fn line(&mut self, x: f32, y: f32) -> Result<(), ParseError> {
        self.emit(PathSeg::line_to(x, y))?;
        self.pen.current = (x, y);
        Ok(())
    }

    fn cubic(&mut self, c1: (f32, f32), c2: (f32, f32), end: (f32, f32)) -> Result<(), ParseError> {
        self.emit(PathSeg::curve_to(c1.0, c1.1, c2.0, c2.1, end.0, end.1))?;
        self.pen.current = end;
        self.pen.cubic_control = Some(c2);
        Ok(())
    }

    fn quadratic(&mut self, q: (f32, f32), end: (f32, f32)) -> Result<(), ParseError> {
        let (x0, y0) = self.pen.current;
        let c1 = (x0 + 2.0 * (q.0 - x0) / 3.0, y0 + 2.0 * (q.1 - y0) / 3.0);
        let c2 = (end.0 + 2.0 * (q.0 - end.0) / 3.0, end.1 + 2.0 * (q.1 - end.1) / 3.0);
        self.cubic(c1, c2, end)?;
        self.pen.cubic_control = None;
        self.pen.quad_control = Some(q);
        Ok(())
    }

    fn arc(&mut self, seg: &ArcSeg) -> Result<(), ParseError> {
        if seg.rx == 0.0 || seg.ry == 0.0 {
            return self.line(seg.end.0, seg.end.1);
        }
        if self.pen.current == seg.end {
            return Ok(());
        }
        for [c1x, c1y, c2x, c2y, x, y] in arc_to_cubics(self.pen.current, seg) {
            self.cubic((c1x, c1y), (c2x, c2y), (x, y))?;
        }
        self.pen.cubic_control = None;
        Ok(())
    }

    fn segment(&mut self, seg: &PathSeg) -> Result<(), ParseError> {
        let (cx, cy) = self.pen.current;
        let (dx, dy) = if seg.relative { (cx, cy) } else { (0.0, 0.0) };
        let a = seg.args();
        let point = |i: usize| (a[i] + dx, a[i + 1] + dy);

        let cubic_control = self.pen.cubic_control.take();
        let quad_control = self.pen.quad_control.take();

        match seg.command {
            PathCommand::ClosePath => {
                self.emit(PathSeg::close())?;
                self.pen.current = self.pen.subpath_start;
            }
            PathCommand::MoveTo => {
                let (x, y) = point(0);
                self.emit(PathSeg::move_to(x, y))?;
                self.pen.current = (x, y);
                self.pen.subpath_start = (x, y);
            }
            PathCommand::LineTo => {
                let (x, y) = point(0);
                self.line(x, y)?;
            }
            PathCommand::HorizontalLineTo => self.line(a[0] + dx, cy)?,
            PathCommand::VerticalLineTo => self.line(cx, a[0] + dy)?,
            PathCommand::CurveTo => self.cubic(point(0), point(2), point(4))?,
            PathCommand::SmoothCurveTo => {
                let c1 = reflect(cubic_control, (cx, cy));
                self.cubic(c1, point(0), point(2))?;
            }
            PathCommand::QuadraticCurveTo => self.quadratic(point(0), point(2))?,
            PathCommand::SmoothQuadraticCurveTo => {
                let q = reflect(quad_control, (cx, cy));
                self.quadratic(q, point(0))?;
            }
            PathCommand::Arc => {
                let arc = ArcSeg {
                    rx: a[0],
                    ry: a[1],
                    rotation: a[2],
                    large_arc: a[3] != 0.0,
                    sweep: a[4] != 0.0,
                    end: point(5),
                };
                self.arc(&arc)?;
            }
        }
        Ok(())
    }
}

impl ListHandler for Normalizer<'_> {
    fn start_list(&mut self) {
        self.pen = Pen::default();
        self.inner.start_list();
    }

    fn item(&mut self, value: ItemValue) -> Result<(), ParseError> {
        match value {
            ItemValue::PathSeg(seg) => self.segment(&seg),
            other => self.inner.item(other),
        }
    }

    fn end_list(&mut self) {
        self.inner.end_list();
    }
}

/// Reflection of the previous control point about the current point
fn reflect(control: Option<(f32, f32)>, current: (f32, f32)) -> (f32, f32) {
    match control {
        Some((x, y)) => (2.0 * current.0 - x, 2.0 * current.1 - y),
        None => current,
    }
}

struct ArcSeg {
    rx: f32,
    ry: f32,
    /// x-axis rotation in degrees
    rotation: f32,
    large_arc: bool,
    sweep: bool,
    end: (f32, f32),
}

/// Endpoint arc as cubic Béziers `[c1x, c1y, c2x, c2y, x, y]`.
///
/// Center parameterization as in SVG 1.1 appendix F.6, with out-of-range
/// radii scaled up to just reach the end point.
fn arc_to_cubics(start: (f32, f32), arc: &ArcSeg) -> Vec<[f32; 6]> {
    let (x1, y1) = (start.0 as f64, start.1 as f64);
    let (x2, y2) = (arc.end.0 as f64, arc.end.1 as f64);
    let (sin, cos) = (arc.rotation as f64).to_radians().sin_cos();

    let hx = (x1 - x2) / 2.0;
    let hy = (y1 - y2) / 2.0;
    let x1p = cos * hx + sin * hy;
    let y1p = -sin * hx + cos * hy;

    let mut rx = (arc.rx as f64).abs();
    let mut ry = (arc.ry as f64).abs();
    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = (num / den).max(0.0).sqrt();
    if arc.large_arc == arc.sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos * cxp - sin * cyp + (x1 + x2) / 2.0;
    let cy = sin * cxp + cos * cyp + (y1 + y2) / 2.0;

    let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
    let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
    let theta = u.1.atan2(u.0);
    let mut sweep = (u.0 * v.1 - u.1 * v.0).atan2(u.0 * v.0 + u.1 * v.1);
    if !arc.sweep && sweep > 0.0 {
        sweep -= TAU;
    } else if arc.sweep && sweep < 0.0 {
        sweep += TAU;
    }

    let count = ((sweep.abs() / FRAC_PI_2) - 1e-9).ceil().max(1.0) as usize;
    let step = sweep / count as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let at = |angle: f64| {
        let (s, c) = angle.sin_cos();
        (cx + rx * c * cos - ry * s * sin, cy + rx * c * sin + ry * s * cos)
    };
    let tangent = |angle: f64| {
        let (s, c) = angle.sin_cos();
        (-rx * s * cos - ry * c * sin, -rx * s * sin + ry * c * cos)
    };

    let mut curves = Vec::with_capacity(count);
    for i in 0..count {
        let a1 = theta + step * i as f64;
        let a2 = a1 + step;
        let p1 = at(a1);
        let d1 = tangent(a1);
        let d2 = tangent(a2);
        let p2 = if i + 1 == count { (x2, y2) } else { at(a2) };
        curves.push([
            (p1.0 + k * d1.0) as f32,
            (p1.1 + k * d1.1) as f32,
            (p2.0 - k * d2.0) as f32,
            (p2.1 - k * d2.1) as f32,
            p2.0 as f32,
            p2.1 as f32,
        ]);
    }
    curves
}

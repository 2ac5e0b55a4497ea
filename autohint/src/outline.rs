//! Outline representation and helpers for autohinting.

use super::{
    angle::{angle, PI, TWO_PI},
    axis::{Axis, AxisHints},
    error::{HintError, InvalidOutline},
    glyph::RawOutline,
    math::{fixed_mul, fixed_mul_div},
};
use alloc::vec::Vec;
use core::ops::Range;

/// Hinting directions.
///
/// The values are such that `dir1 + dir2 == 0` when the directions are
/// opposite.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[repr(i8)]
pub(crate) enum Direction {
    #[default]
    None = 4,
    Right = 1,
    Left = -1,
    Up = 2,
    Down = -2,
}

impl Direction {
    /// Computes a direction from a vector.
    ///
    /// A vector is vertical when its horizontal component is less than
    /// 1/12 of the vertical one, and vice versa. Everything else has no
    /// direction.
    pub fn new(dx: i32, dy: i32) -> Self {
        let ax = dx.abs();
        let ay = dy.abs();
        if ax * 12 < ay {
            if dy > 0 {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if ay * 12 < ax {
            if dx > 0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else {
            Direction::None
        }
    }

    pub fn is_opposite(self, other: Self) -> bool {
        self as i8 + other as i8 == 0
    }

    pub fn is_same_axis(self, other: Self) -> bool {
        (self as i8).abs() == (other as i8).abs()
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Fill convention of an outline.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) enum Orientation {
    /// Outer contours wind clockwise (TrueType).
    #[default]
    Clockwise,
    /// Outer contours wind counter-clockwise (PostScript).
    CounterClockwise,
}

/// Outline point with a lot of context for hinting.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct Point {
    /// Describes the type and hinting state of the point.
    pub flags: u8,
    /// X coordinate in font units.
    pub fx: i32,
    /// Y coordinate in font units.
    pub fy: i32,
    /// Scaled X coordinate before hinting.
    pub ox: i32,
    /// Scaled Y coordinate before hinting.
    pub oy: i32,
    /// Hinted X coordinate.
    pub x: i32,
    /// Hinted Y coordinate.
    pub y: i32,
    /// Context dependent coordinate.
    pub u: i32,
    /// Context dependent coordinate.
    pub v: i32,
    /// Direction of inwards vector.
    pub in_dir: Direction,
    /// Direction of outwards vector.
    pub out_dir: Direction,
    /// Index of next point in contour.
    pub next_ix: u16,
    /// Index of previous point in contour.
    pub prev_ix: u16,
}

/// Point type flags.
impl Point {
    /// Off curve point.
    pub const CONTROL: u8 = 1 << 0;
    /// Touched in x direction.
    pub const TOUCH_X: u8 = 1 << 2;
    /// Touched in y direction.
    pub const TOUCH_Y: u8 = 1 << 3;
    /// Candidate for weak intepolation.
    pub const WEAK_INTERPOLATION: u8 = 1 << 4;
    /// Direction of the contour bends the other way here.
    pub const INFLECTION: u8 = 1 << 5;
}

impl Point {
    pub fn next(&self) -> usize {
        self.next_ix as usize
    }

    pub fn prev(&self) -> usize {
        self.prev_ix as usize
    }

    pub fn is_control(&self) -> bool {
        self.flags & Self::CONTROL != 0
    }
}

/// Range of points belonging to one contour.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct Contour {
    first_ix: u16,
    last_ix: u16,
}

impl Contour {
    pub fn first(self) -> usize {
        self.first_ix as usize
    }

    pub fn last(self) -> usize {
        self.last_ix as usize
    }

    pub fn range(self) -> Range<usize> {
        self.first()..self.last() + 1
    }
}

/// Scale factors applied to font units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct OutlineScale {
    /// Font unit to 26.6 scale in the X direction.
    pub x_scale: i32,
    /// Font unit to 26.6 scale in the Y direction.
    pub y_scale: i32,
    pub units_per_em: i32,
    /// Edge coincidence threshold in font units.
    pub edge_distance_threshold: i32,
}

/// Glyph outline with hinting state for both axes.
///
/// Buffers are reused across glyphs; they grow but never shrink.
#[derive(Clone, Default, Debug)]
pub(crate) struct Outline {
    pub points: Vec<Point>,
    pub contours: Vec<Contour>,
    pub scale: OutlineScale,
    pub orientation: Orientation,
    /// Segments and edges indexed by [`Axis::index`].
    pub axes: [AxisHints; 2],
}

impl Outline {
    /// Fills the outline from the given unscaled glyph.
    pub fn load(&mut self, source: &RawOutline, scale: OutlineScale) -> Result<(), HintError> {
        self.clear();
        if scale.units_per_em <= 0 {
            return Err(InvalidOutline::NoUnitsPerEm.into());
        }
        validate_contours(source)?;
        self.scale = scale;
        self.points
            .try_reserve(source.points.len())
            .map_err(|_| HintError::OutOfMemory)?;
        self.contours
            .try_reserve(source.contour_ends.len())
            .map_err(|_| HintError::OutOfMemory)?;
        let mut first_ix = 0usize;
        for &end in &source.contour_ends {
            let last_ix = end as usize;
            self.contours.push(Contour {
                first_ix: first_ix as u16,
                last_ix: end,
            });
            for ix in first_ix..=last_ix {
                let raw = source.points[ix];
                let next_ix = if ix == last_ix { first_ix } else { ix + 1 };
                let prev_ix = if ix == first_ix { last_ix } else { ix - 1 };
                let ox = fixed_mul(raw.x, scale.x_scale);
                let oy = fixed_mul(raw.y, scale.y_scale);
                self.points.push(Point {
                    flags: if raw.on_curve { 0 } else { Point::CONTROL },
                    fx: raw.x,
                    fy: raw.y,
                    ox,
                    oy,
                    x: ox,
                    y: oy,
                    next_ix: next_ix as u16,
                    prev_ix: prev_ix as u16,
                    ..Default::default()
                });
            }
            first_ix = last_ix + 1;
        }
        self.compute_directions();
        self.orientation = self.compute_orientation();
        for axis in Axis::ALL {
            self.axes[axis.index()].reset(axis, self.orientation);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.contours.clear();
        for axis in &mut self.axes {
            axis.segments.clear();
            axis.edges.clear();
        }
    }

    /// Copies the chosen coordinates of each point into `u` and `v`.
    pub fn setup_uv(&mut self, source: UvSource) {
        for point in &mut self.points {
            (point.u, point.v) = match source {
                UvSource::FontXy => (point.fx, point.fy),
                UvSource::FontYx => (point.fy, point.fx),
                UvSource::HintedX => (point.x, point.ox),
                UvSource::HintedY => (point.y, point.oy),
            };
        }
    }
}

/// Which coordinates [`Outline::setup_uv`] copies into `(u, v)`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum UvSource {
    /// `(fx, fy)`
    FontXy,
    /// `(fy, fx)`
    FontYx,
    /// `(x, ox)`
    HintedX,
    /// `(y, oy)`
    HintedY,
}

fn validate_contours(source: &RawOutline) -> Result<(), InvalidOutline> {
    let point_count = source.points.len();
    if point_count > u16::MAX as usize {
        return Err(InvalidOutline::TooManyPoints(point_count));
    }
    let mut next_first = 0usize;
    for &end in &source.contour_ends {
        let end_ix = end as usize;
        if end_ix >= point_count {
            return Err(InvalidOutline::ContourEndOutOfRange(end));
        }
        if end_ix < next_first {
            return Err(InvalidOutline::UnorderedContourEnd(end));
        }
        next_first = end_ix + 1;
    }
    if next_first != point_count {
        return Err(InvalidOutline::PointCountMismatch(point_count));
    }
    let font_units = i16::MIN as i32..=i16::MAX as i32;
    if let Some(ix) = source
        .points
        .iter()
        .position(|p| !font_units.contains(&p.x) || !font_units.contains(&p.y))
    {
        return Err(InvalidOutline::CoordinateOutOfRange(ix));
    }
    Ok(())
}

impl Outline {
    /// Computes in and out directions and marks weak points.
    fn compute_directions(&mut self) {
        let points = self.points.as_mut_slice();
        for ix in 0..points.len() {
            let point = points[ix];
            let prev = points[point.prev()];
            let next = points[point.next()];
            let (in_x, in_y) = (point.fx - prev.fx, point.fy - prev.fy);
            let (out_x, out_y) = (next.fx - point.fx, next.fy - point.fy);
            let in_dir = Direction::new(in_x, in_y);
            let out_dir = Direction::new(out_x, out_y);
            let is_weak = if point.is_control() {
                true
            } else if in_dir == out_dir {
                // Either on a straight segment or the turn is so small that
                // the point is redundant
                in_dir != Direction::None || {
                    let mut delta = angle(in_x, in_y) - angle(out_x, out_y);
                    if delta > PI {
                        delta = TWO_PI - delta;
                    }
                    delta.abs() < 2
                }
            } else {
                // Spike
                in_dir.is_opposite(out_dir)
            };
            let point = &mut points[ix];
            point.in_dir = in_dir;
            point.out_dir = out_dir;
            if is_weak {
                point.flags |= Point::WEAK_INTERPOLATION;
            }
        }
    }

    /// Determines the fill convention by checking the winding at the
    /// bounding box extrema.
    fn compute_orientation(&self) -> Orientation {
        let points = self.points.as_slice();
        let Some(first) = points.first() else {
            return Orientation::default();
        };
        let mut x_min = (first.fx, 0);
        let mut x_max = x_min;
        let mut y_min = (first.fy, 0);
        let mut y_max = y_min;
        for (ix, point) in points.iter().enumerate().skip(1) {
            if point.fx < x_min.0 {
                x_min = (point.fx, ix);
            }
            if point.fx > x_max.0 {
                x_max = (point.fx, ix);
            }
            if point.fy < y_min.0 {
                y_min = (point.fy, ix);
            }
            if point.fy > y_max.0 {
                y_max = (point.fy, ix);
            }
        }
        [x_min.1, y_min.1, x_max.1, y_max.1]
            .into_iter()
            .find_map(|ix| {
                let cur = points[ix];
                let prev = points[cur.prev()];
                let next = points[cur.next()];
                // Extrema have a turn of at most 180 degrees so the sign of
                // the cross product gives the winding
                let product = fixed_mul_div(cur.fx - prev.fx, next.fy - cur.fy, 64)
                    - fixed_mul_div(cur.fy - prev.fy, next.fx - cur.fx, 64);
                match product {
                    0 => None,
                    p if p > 0 => Some(Orientation::CounterClockwise),
                    _ => Some(Orientation::Clockwise),
                }
            })
            .unwrap_or_default()
    }
}

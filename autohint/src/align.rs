//! Apply edge hints to an outline.
//!
//! This happens in three passes:
//! 1. Snap the points of every segment to the position of its edge.
//! 2. Interpolate strong points that were not touched by the previous pass
//!    between the edges that enclose them.
//! 3. Interpolate the remaining untouched points between their touched
//!    neighbors on the same contour. These are the weak points: control
//!    points and points that do not change the direction of the contour.

use super::{
    axis::Axis,
    math::fixed_mul_div,
    outline::{Outline, Point},
};

/// Moves all points of each segment to the hinted position of its edge.
pub(crate) fn align_edge_points(outline: &mut Outline, axis: Axis) {
    let hints = &outline.axes[axis.index()];
    let edges = hints.edges.as_slice();
    let points = outline.points.as_mut_slice();
    for segment in &hints.segments {
        let Some(edge) = segment.edge(edges) else {
            continue;
        };
        let mut point_ix = segment.first();
        let last_ix = segment.last();
        // A segment never wraps more than once around its contour
        for _ in 0..points.len() {
            let Some(point) = points.get_mut(point_ix) else {
                break;
            };
            axis.store(point, edge.pos);
            if point_ix == last_ix {
                break;
            }
            point_ix = point.next();
        }
    }
}

/// Aligns the strong points; equivalent to the TrueType `IP` instruction.
pub(crate) fn align_strong_points(outline: &mut Outline, axis: Axis) {
    let edges = outline.axes[axis.index()].edges.as_slice();
    let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
        return;
    };
    let touch_flag = axis.touch_flag();
    for point in &mut outline.points {
        // Skip points that are already touched; weak points are handled
        // by interpolation unless they are inflections
        if point.flags & touch_flag != 0
            || (point.flags & Point::WEAK_INTERPOLATION != 0
                && point.flags & Point::INFLECTION == 0)
        {
            continue;
        }
        let u = axis.font_coord(point);
        let ou = axis.original_coord(point);
        // Is the point before the first edge?
        if u <= first.fpos {
            axis.store(point, first.pos - (first.opos - ou));
            continue;
        }
        // Is the point after the last edge?
        if u >= last.fpos {
            axis.store(point, last.pos + (ou - last.opos));
            continue;
        }
        // Find the enclosing edges. The first and last edges bound the
        // point so the search always succeeds past the first edge.
        let Some(after_ix) = edges.iter().position(|edge| edge.fpos >= u) else {
            continue;
        };
        let after = &edges[after_ix];
        if after.fpos == u {
            axis.store(point, after.pos);
            continue;
        }
        let Some(before) = after_ix.checked_sub(1).and_then(|ix| edges.get(ix)) else {
            continue;
        };
        let pos = before.pos
            + fixed_mul_div(
                u - before.fpos,
                after.pos - before.pos,
                after.fpos - before.fpos,
            );
        axis.store(point, pos);
    }
}

/// Aligns the weak points; equivalent to the TrueType `IUP` instruction.
pub(crate) fn align_weak_points(outline: &mut Outline, axis: Axis) {
    outline.setup_uv(axis.hinted_uv());
    let touch_flag = axis.touch_flag();
    for contour in &outline.contours {
        let Some(points) = outline.points.get_mut(contour.range()) else {
            continue;
        };
        interpolate_contour(points, touch_flag);
    }
    // Save interpolated values
    for point in &mut outline.points {
        match axis {
            Axis::Horizontal => point.x = point.u,
            Axis::Vertical => point.y = point.u,
        }
    }
}

fn interpolate_contour(points: &mut [Point], touch_flag: u8) {
    let is_touched = |point: &Point| point.flags & touch_flag != 0;
    let Some(first_touched_ix) = points.iter().position(is_touched) else {
        return;
    };
    let last_ix = points.len() - 1;
    let mut point_ix = first_touched_ix;
    let mut last_touched_ix;
    'outer: loop {
        // Skip any touched neighbors
        while point_ix < last_ix && is_touched(&points[point_ix + 1]) {
            point_ix += 1;
        }
        last_touched_ix = point_ix;
        // Find the next touched point
        point_ix += 1;
        loop {
            if point_ix > last_ix {
                break 'outer;
            }
            if is_touched(&points[point_ix]) {
                break;
            }
            point_ix += 1;
        }
        iup_interpolate(
            points,
            last_touched_ix + 1,
            point_ix - 1,
            last_touched_ix,
            point_ix,
        );
    }
    if last_touched_ix == first_touched_ix {
        // Only one point was touched
        iup_shift(points, first_touched_ix);
    } else {
        // Interpolate the remainder, wrapping around the contour start
        if last_touched_ix < last_ix {
            iup_interpolate(
                points,
                last_touched_ix + 1,
                last_ix,
                last_touched_ix,
                first_touched_ix,
            );
        }
        if first_touched_ix > 0 {
            iup_interpolate(
                points,
                0,
                first_touched_ix - 1,
                last_touched_ix,
                first_touched_ix,
            );
        }
    }
}

/// Shifts all points of the contour by the displacement of the point at
/// `ref_ix`.
///
/// The `u` and `v` members are the current and original coordinate values,
/// respectively.
fn iup_shift(points: &mut [Point], ref_ix: usize) {
    let ref_point = points[ref_ix];
    let delta = ref_point.u - ref_point.v;
    if delta == 0 {
        return;
    }
    for (ix, point) in points.iter_mut().enumerate() {
        if ix != ref_ix {
            point.u = point.v + delta;
        }
    }
}

/// Interpolates the points in `p1_ix..=p2_ix` between the two reference
/// points. Points outside the range of the references are shifted by the
/// displacement of the nearer one.
fn iup_interpolate(
    points: &mut [Point],
    p1_ix: usize,
    p2_ix: usize,
    ref1_ix: usize,
    ref2_ix: usize,
) {
    if p1_ix > p2_ix {
        return;
    }
    let (mut ref1, mut ref2) = (points[ref1_ix], points[ref2_ix]);
    if ref1.v > ref2.v {
        core::mem::swap(&mut ref1, &mut ref2);
    }
    let (u1, v1) = (ref1.u, ref1.v);
    let (u2, v2) = (ref2.u, ref2.v);
    let d1 = u1 - v1;
    let d2 = u2 - v2;
    let Some(range) = points.get_mut(p1_ix..=p2_ix) else {
        return;
    };
    for point in range {
        point.u = if point.v <= v1 {
            point.v + d1
        } else if point.v >= v2 {
            point.v + d2
        } else if u1 == u2 {
            u1
        } else {
            u1 + fixed_mul_div(point.v - v1, u2 - u1, v2 - v1)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        axis::Edge,
        edges::compute_edges,
        glyph::{RawOutline, RawPoint},
        segments::{compute_segments, link_segments},
        testing,
    };
    use super::*;
    use pretty_assertions::assert_eq;

    fn load(raw: &RawOutline) -> Outline {
        let mut outline = Outline::default();
        outline.load(raw, testing::unit_scale(1000)).unwrap();
        outline
    }

    fn edge(fpos: i32, pos: i32) -> Edge {
        Edge {
            fpos,
            opos: fpos,
            pos,
            ..Default::default()
        }
    }

    fn xs(outline: &Outline) -> Vec<i32> {
        outline.points.iter().map(|p| p.x).collect()
    }

    #[test]
    fn edge_points_snap() {
        let mut outline = load(&testing::rect(0, 0, 100, 100));
        compute_segments(&mut outline, Axis::Horizontal);
        link_segments(&mut outline.axes[0]);
        compute_edges(&mut outline, Axis::Horizontal);
        outline.axes[0].edges[0].pos = 10;
        outline.axes[0].edges[1].pos = 128;
        align_edge_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 10, 128, 128]);
        assert!(outline
            .points
            .iter()
            .all(|p| p.flags & Point::TOUCH_X != 0 && p.flags & Point::TOUCH_Y == 0));
        // The vertical axis is untouched
        let ys = outline.points.iter().map(|p| p.y).collect::<Vec<_>>();
        assert_eq!(ys, [0, 100, 100, 0]);
    }

    #[test]
    fn strong_points_interpolate_between_edges() {
        let raw = RawOutline::from_contours(
            [[
                RawPoint::on(0, 0),
                RawPoint::on(0, 100),
                RawPoint::on(150, 60),
                RawPoint::on(200, 0),
            ]],
            200,
        );
        let mut outline = load(&raw);
        outline.axes[0].edges = vec![edge(0, 10), edge(100, 120), edge(200, 190)];
        align_strong_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 10, 155, 190]);
        // A point on an edge takes its position
        let mut outline = load(&raw);
        outline.axes[0].edges = vec![edge(0, 10), edge(150, 170), edge(200, 190)];
        align_strong_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 10, 170, 190]);
    }

    #[test]
    fn weak_points_skip_strong_pass() {
        let raw = RawOutline::from_contours(
            [[
                RawPoint::on(0, 0),
                RawPoint::off(0, 100),
                RawPoint::on(100, 100),
                RawPoint::on(100, 0),
            ]],
            100,
        );
        let mut outline = load(&raw);
        outline.axes[0].edges = vec![edge(0, 10), edge(100, 110)];
        align_strong_points(&mut outline, Axis::Horizontal);
        assert_eq!(outline.points[1].flags & Point::TOUCH_X, 0);
        align_weak_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 10, 110, 110]);
        // Without edges nothing moves
        let mut outline = load(&raw);
        align_strong_points(&mut outline, Axis::Horizontal);
        align_weak_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [0, 0, 100, 100]);
    }

    #[test]
    fn single_touched_point_shifts_contour() {
        let mut outline = load(&testing::rect(0, 0, 100, 100));
        Axis::Horizontal.store(&mut outline.points[0], 10);
        align_weak_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 10, 110, 110]);
    }

    #[test]
    fn weak_points_interpolate() {
        let raw = RawOutline::from_contours(
            [[
                RawPoint::on(0, 0),
                RawPoint::on(50, 100),
                RawPoint::on(100, 0),
                RawPoint::on(50, -100),
            ]],
            100,
        );
        let mut outline = load(&raw);
        Axis::Horizontal.store(&mut outline.points[0], 10);
        Axis::Horizontal.store(&mut outline.points[2], 110);
        align_weak_points(&mut outline, Axis::Horizontal);
        assert_eq!(xs(&outline), [10, 60, 110, 60]);
        // Untouched contours keep their coordinates
        let mut outline = load(&raw);
        Axis::Vertical.store(&mut outline.points[1], 128);
        align_weak_points(&mut outline, Axis::Vertical);
        let ys = outline.points.iter().map(|p| p.y).collect::<Vec<_>>();
        assert_eq!(ys, [28, 128, 28, -72]);
    }
}

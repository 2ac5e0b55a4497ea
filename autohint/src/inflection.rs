//! Inflection detection.
//!
//! Contours are split into runs of points that share the same angle. When
//! the turns at both ends of a run go in opposite directions, the curve
//! changes its bending there and all points of the run are marked as
//! inflections. Weak points that are not inflections are left to the
//! interpolation pass while inflections are aligned like strong points.

use super::{
    angle::{angle, angle_diff},
    outline::{Outline, Point},
};

/// Marks points that lie on inflecting runs of each contour.
pub(crate) fn compute_inflections(outline: &mut Outline) {
    let points = outline.points.as_mut_slice();
    for contour in &outline.contours {
        let len = contour.range().len();
        // Each pass around the contour visits a point at most twice; this
        // bounds the walk on degenerate input
        let mut walk = Walk {
            steps: len * 4 + 4,
        };
        if mark_contour(points, contour.first(), &mut walk).is_none() {
            // Nothing to mark, or the walk gave up
            continue;
        }
    }
}

struct Walk {
    steps: usize,
}

impl Walk {
    fn step(&mut self) -> Option<()> {
        self.steps = self.steps.checked_sub(1)?;
        Some(())
    }
}

fn same_position(a: &Point, b: &Point) -> bool {
    a.fx == b.fx && a.fy == b.fy
}

fn vector_angle(from: &Point, to: &Point) -> i32 {
    angle(to.fx - from.fx, to.fy - from.fy)
}

/// Returns `None` when the contour has no distinct directions or the walk
/// budget is exhausted.
fn mark_contour(points: &mut [Point], contour_first: usize, walk: &mut Walk) -> Option<()> {
    let mut start = contour_first;
    // Find the first point distinct from the start
    let mut end = start;
    loop {
        walk.step()?;
        end = points[end].next();
        if end == contour_first {
            return None;
        }
        if !same_position(&points[end], &points[start]) {
            break;
        }
    }
    let mut angle_seg = vector_angle(&points[start], &points[end]);
    // Extend the run backwards while the angle does not change
    let mut before = start;
    let angle_in = loop {
        loop {
            walk.step()?;
            start = before;
            before = points[before].prev();
            if before == contour_first {
                return None;
            }
            if !same_position(&points[before], &points[start]) {
                break;
            }
        }
        let angle_in = vector_angle(&points[before], &points[start]);
        if angle_in != angle_seg {
            break angle_in;
        }
    };
    let first = start;
    let mut diff_in = angle_diff(angle_in, angle_seg);
    let mut finished = false;
    while !finished {
        // Extend the run forwards while the angle does not change
        let mut after = end;
        let angle_out = loop {
            loop {
                walk.step()?;
                end = after;
                after = points[after].next();
                if after == first {
                    finished = true;
                }
                if !same_position(&points[end], &points[after]) {
                    break;
                }
            }
            let angle_out = vector_angle(&points[end], &points[after]);
            if angle_out != angle_seg {
                break angle_out;
            }
        };
        let diff_out = angle_diff(angle_seg, angle_out);
        if (diff_in ^ diff_out) < 0 {
            // Opposite turns at both ends
            let mut ix = start;
            loop {
                walk.step()?;
                points[ix].flags |= Point::INFLECTION;
                if ix == end {
                    break;
                }
                ix = points[ix].next();
            }
        }
        start = end;
        end = after;
        angle_seg = angle_out;
        diff_in = diff_out;
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::super::{
        glyph::{RawOutline, RawPoint},
        testing,
    };
    use super::*;

    fn inflections(raw: &RawOutline) -> Vec<usize> {
        let mut outline = Outline::default();
        outline.load(raw, testing::unit_scale(1000)).unwrap();
        compute_inflections(&mut outline);
        outline
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.flags & Point::INFLECTION != 0)
            .map(|(ix, _)| ix)
            .collect()
    }

    #[test]
    fn convex_contour_has_no_inflections() {
        assert!(inflections(&testing::rect(0, 0, 100, 100)).is_empty());
    }

    #[test]
    fn s_bend_is_inflected() {
        let raw = RawOutline::from_contours(
            [[
                RawPoint::on(0, 0),
                RawPoint::on(100, 0),
                RawPoint::on(200, 100),
                RawPoint::on(300, 100),
                RawPoint::on(300, 200),
                RawPoint::on(0, 200),
            ]],
            300,
        );
        assert_eq!(inflections(&raw), [1, 2, 3]);
    }

    #[test]
    fn degenerate_contours_terminate() {
        // All points coincide
        let raw = RawOutline::from_contours([[RawPoint::on(5, 5); 4]], 10);
        assert!(inflections(&raw).is_empty());
        // Collinear points
        let raw = RawOutline::from_contours(
            [[
                RawPoint::on(0, 0),
                RawPoint::on(50, 0),
                RawPoint::on(100, 0),
            ]],
            100,
        );
        assert!(inflections(&raw).is_empty());
    }
}

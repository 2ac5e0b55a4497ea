//! Segment computation and linking.
//!
//! A segment is a run of consecutive points whose outgoing direction lies
//! along the axis being hinted, i.e. vertical runs for the horizontal axis
//! and horizontal runs for the vertical axis.
//!
//! Linking pairs segments of opposite direction into stems. A segment whose
//! best partner prefers someone else becomes a serif of that stem instead.

use super::{
    axis::{Axis, AxisHints, Segment},
    outline::{Outline, Point},
};

/// Minimum overlap, in font units, of two segments forming a stem.
const MIN_OVERLAP: i32 = 8;

/// Weight of the overlap term in the link score.
const LEN_SCORE: i32 = 3000;

/// Computes the segments of the given axis from the font unit coordinates
/// of the outline.
pub(crate) fn compute_segments(outline: &mut Outline, axis: Axis) {
    outline.setup_uv(axis.font_uv());
    let points = outline.points.as_slice();
    let hints = &mut outline.axes[axis.index()];
    hints.segments.clear();
    let major_dir = hints.major_dir;
    for contour in &outline.contours {
        let mut point_ix = contour.first();
        let mut last_ix = contour.last();
        if point_ix == last_ix {
            continue;
        }
        // If the contour starts in the middle of a segment, back up to the
        // start of the run
        if points[last_ix].out_dir.is_same_axis(major_dir)
            && points[point_ix].out_dir.is_same_axis(major_dir)
        {
            last_ix = point_ix;
            loop {
                point_ix = points[point_ix].prev();
                if !points[point_ix].out_dir.is_same_axis(major_dir) {
                    point_ix = points[point_ix].next();
                    break;
                }
                if point_ix == last_ix {
                    break;
                }
            }
        }
        last_ix = point_ix;
        let mut segment: Option<Segment> = None;
        let mut min_pos = 0;
        let mut max_pos = 0;
        let mut passed = false;
        loop {
            let point = &points[point_ix];
            if let Some(mut current) = segment {
                min_pos = min_pos.min(point.u);
                max_pos = max_pos.max(point.u);
                if point.out_dir != current.dir || point_ix == last_ix {
                    current.last_ix = point_ix as u16;
                    finish_segment(&mut current, points, min_pos, max_pos);
                    hints.segments.push(current);
                    segment = None;
                }
            }
            if point_ix == last_ix {
                if passed {
                    break;
                }
                passed = true;
            }
            if segment.is_none() && point.out_dir.is_same_axis(major_dir) {
                segment = Some(Segment {
                    dir: point.out_dir,
                    first_ix: point_ix as u16,
                    last_ix: point_ix as u16,
                    ..Default::default()
                });
                min_pos = point.u;
                max_pos = point.u;
            }
            point_ix = point.next();
        }
    }
    log::trace!(
        "{:?} axis: {} segments",
        hints.axis,
        hints.segments.len()
    );
}

fn finish_segment(segment: &mut Segment, points: &[Point], min_pos: i32, max_pos: i32) {
    let first = &points[segment.first()];
    let last = &points[segment.last()];
    segment.pos = (min_pos + max_pos) >> 1;
    if first.is_control() || last.is_control() {
        segment.flags |= Segment::ROUND;
    }
    segment.min_coord = first.v.min(last.v);
    segment.max_coord = first.v.max(last.v);
}

/// Links segments of opposite directions to form stems and detects
/// serifs.
pub(crate) fn link_segments(hints: &mut AxisHints) {
    let major_dir = hints.major_dir;
    let segments = hints.segments.as_mut_slice();
    // Compare each segment to the others.. O(n^2)
    for ix1 in 0..segments.len() {
        let seg1 = segments[ix1];
        if seg1.first_ix == seg1.last_ix || seg1.dir != major_dir {
            continue;
        }
        for ix2 in 0..segments.len() {
            let seg2 = segments[ix2];
            if ix1 == ix2 || !seg1.dir.is_opposite(seg2.dir) {
                continue;
            }
            let dist = seg2.pos - seg1.pos;
            if dist < 0 {
                continue;
            }
            let min = seg1.min_coord.max(seg2.min_coord);
            let max = seg1.max_coord.min(seg2.max_coord);
            let len = max - min;
            if len < MIN_OVERLAP {
                continue;
            }
            let score = dist + LEN_SCORE / len;
            if score < segments[ix1].score {
                segments[ix1].score = score;
                segments[ix1].link_ix = Some(ix2 as u16);
            }
            if score < segments[ix2].score {
                segments[ix2].score = score;
                segments[ix2].link_ix = Some(ix1 as u16);
            }
        }
    }
    // A segment whose partner is linked elsewhere is a serif
    for ix in 0..segments.len() {
        let Some(link_ix) = segments[ix].link_ix else {
            continue;
        };
        let partner_link = segments[link_ix as usize].link_ix;
        if partner_link != Some(ix as u16) {
            let segment = &mut segments[ix];
            segment.link_ix = None;
            segment.serif_ix = partner_link;
        }
    }
}

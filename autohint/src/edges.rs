//! Edge computations.
//!
//! Edges are sets of segments that all lie within a threshold based on
//! stem widths.
//!
//! Here we compute edges from the segment list, assign properties (round,
//! serif, links) and then associate them with blue zones.

use super::{
    axis::{Axis, AxisHints, Edge},
    math::{fixed_div, fixed_mul},
    metrics::{BlueKind, BlueTarget, BlueZone, DesignMetrics, ScaledMetrics},
    outline::{Direction, Outline},
};

/// Groups the segments of an axis into edges using the scale factor of the
/// axis.
pub(crate) fn compute_edges(outline: &mut Outline, axis: Axis) {
    let scale = match axis {
        Axis::Horizontal => outline.scale.x_scale,
        Axis::Vertical => outline.scale.y_scale,
    };
    let threshold = outline.scale.edge_distance_threshold;
    build_edges(&mut outline.axes[axis.index()], scale, threshold);
}

fn build_edges(hints: &mut AxisHints, scale: i32, edge_distance_threshold: i32) {
    hints.edges.clear();
    // Ensure that the edge distance threshold is at most 0.25 pixels
    let edge_distance_threshold =
        fixed_div(fixed_mul(edge_distance_threshold, scale).min(64 / 4), scale);
    // Build the sorted table of edges by looping over all segments to find
    // a matching edge, adding a new one if not found
    'segments: for segment_ix in 0..hints.segments.len() {
        let segment = &hints.segments[segment_ix];
        for edge_ix in 0..hints.edges.len() {
            let edge = &hints.edges[edge_ix];
            let dist = (segment.pos - edge.fpos).abs();
            if dist < edge_distance_threshold {
                hints.append_segment_to_edge(segment_ix, edge_ix);
                continue 'segments;
            }
        }
        let opos = fixed_mul(segment.pos, scale);
        let edge = Edge {
            fpos: segment.pos,
            opos,
            pos: opos,
            first_ix: segment_ix as u16,
            last_ix: segment_ix as u16,
            ..Default::default()
        };
        hints.insert_edge(edge);
        hints.segments[segment_ix].edge_next_ix = Some(segment_ix as u16);
    }
    link_segments_to_edges(hints);
    compute_edge_properties(hints);
    log::trace!("{:?} axis: {} edges", hints.axis, hints.edges.len());
}

/// Edges get shifted and resorted as they're built so we need to assign
/// edge indices to segments in a second pass.
fn link_segments_to_edges(hints: &mut AxisHints) {
    let segments = hints.segments.as_mut_slice();
    for (edge_ix, edge) in hints.edges.iter().enumerate() {
        let mut ix = edge.first_ix as usize;
        let last_ix = edge.last_ix as usize;
        loop {
            let segment = &mut segments[ix];
            segment.edge_ix = Some(edge_ix as u16);
            if ix == last_ix {
                break;
            }
            ix = segment
                .edge_next_ix
                .map(|ix| ix as usize)
                .unwrap_or(last_ix);
        }
    }
}

/// Computes the edge properties based on the series of segments that make
/// up the edge.
fn compute_edge_properties(hints: &mut AxisHints) {
    let up_dir = hints.axis.up_dir();
    let edges = hints.edges.as_mut_slice();
    let segments = hints.segments.as_slice();
    for edge_ix in 0..edges.len() {
        let mut is_round = 0;
        let mut is_straight = 0;
        let mut ups = 0;
        let mut downs = 0;
        let last_ix = edges[edge_ix].last_ix as usize;
        let mut segment_ix = edges[edge_ix].first_ix as usize;
        loop {
            let segment = &segments[segment_ix];
            if segment.flags & Edge::ROUND != 0 {
                is_round += 1;
            } else {
                is_straight += 1;
            }
            let len = segment.max_coord - segment.min_coord;
            if segment.dir == up_dir {
                ups += len;
            } else {
                downs += len;
            }
            // A serif whose stem lies on this very edge is ignored
            let serif = segment
                .serif(segments)
                .filter(|serif| serif.edge_ix != Some(edge_ix as u16));
            let is_serif = serif.is_some();
            if let Some(segment2) = serif.or_else(|| segment.link(segments)) {
                let edge = &edges[edge_ix];
                let current = if is_serif {
                    edge.serif_ix
                } else {
                    edge.link_ix
                };
                let mut edge2_ix = segment2.edge_ix;
                if let Some(current) = current.and_then(|ix| edges.get(ix as usize)) {
                    // Keep the existing partner unless this segment pair
                    // is closer
                    let edge_delta = (edge.fpos - current.fpos).abs();
                    let segment_delta = (segment.pos - segment2.pos).abs();
                    if segment_delta >= edge_delta {
                        edge2_ix = if is_serif {
                            edge.serif_ix
                        } else {
                            edge.link_ix
                        };
                    }
                }
                if is_serif {
                    edges[edge_ix].serif_ix = edge2_ix;
                    if let Some(edge2) = edge2_ix.and_then(|ix| edges.get_mut(ix as usize)) {
                        edge2.flags |= Edge::SERIF;
                    }
                } else {
                    edges[edge_ix].link_ix = edge2_ix;
                }
            }
            if segment_ix == last_ix {
                break;
            }
            segment_ix = segment
                .edge_next_ix
                .map(|ix| ix as usize)
                .unwrap_or(last_ix);
        }
        let edge = &mut edges[edge_ix];
        if is_round > 0 && is_round >= is_straight {
            edge.flags |= Edge::ROUND;
        }
        edge.dir = match ups.cmp(&downs) {
            core::cmp::Ordering::Greater => up_dir,
            core::cmp::Ordering::Less => up_dir.reverse(),
            core::cmp::Ordering::Equal => Direction::None,
        };
        // Stem links take precedence over serifs
        if edge.link_ix.is_some() {
            edge.serif_ix = None;
        }
    }
}

/// Blue zones whose overshoot is this far from the reference at the
/// current size are ignored.
const MAX_ACTIVE_BLUE_DISTANCE: i32 = 48;

/// Assigns blue zones to the edges of the vertical axis.
pub(crate) fn compute_blue_edges(outline: &mut Outline, design: &DesignMetrics) {
    let y_scale = outline.scale.y_scale;
    let units_per_em = outline.scale.units_per_em;
    assign_blue_zones(
        &mut outline.axes[Axis::Vertical.index()],
        design,
        y_scale,
        units_per_em,
    );
}

fn assign_blue_zones(
    hints: &mut AxisHints,
    design: &DesignMetrics,
    y_scale: i32,
    units_per_em: i32,
) {
    let mut active = [false; 5];
    for (is_active, zone) in active.iter_mut().zip(BlueZone::ALL) {
        let blue = design.blue(zone);
        *is_active =
            fixed_mul((blue.reference - blue.overshoot).abs(), y_scale) < MAX_ACTIVE_BLUE_DISTANCE;
    }
    if !active.contains(&true) {
        return;
    }
    let major_dir = hints.major_dir;
    // The initial threshold is a fraction of the em but no more than a
    // quarter pixel
    let initial_best = fixed_mul(units_per_em / 40, y_scale).min(64 / 4);
    for edge in &mut hints.edges {
        let mut best_dist = initial_best;
        let mut best = None;
        for zone in BlueZone::ALL {
            if !active[zone as usize] {
                continue;
            }
            let is_top = zone.is_top();
            // Top zones match edges running against the major direction
            if is_top == (edge.dir == major_dir) {
                continue;
            }
            let blue = design.blue(zone);
            let dist = fixed_mul((edge.fpos - blue.reference).abs(), y_scale);
            if dist < best_dist {
                best_dist = dist;
                best = Some(BlueTarget {
                    zone,
                    kind: BlueKind::Reference,
                });
            }
            // Round edges may also snap to the overshoot when they lie
            // on its side of the reference
            if edge.flags & Edge::ROUND != 0 && dist != 0 {
                let is_under_ref = edge.fpos < blue.reference;
                if is_top != is_under_ref {
                    let dist = fixed_mul((edge.fpos - blue.overshoot).abs(), y_scale);
                    if dist < best_dist {
                        best_dist = dist;
                        best = Some(BlueTarget {
                            zone,
                            kind: BlueKind::Overshoot,
                        });
                    }
                }
            }
        }
        edge.blue = best;
    }
}

/// Resolves assigned blue zones to positions in the current scaled
/// metrics.
pub(crate) fn scale_blue_edges(hints: &mut AxisHints, scaled: &ScaledMetrics) {
    for edge in &mut hints.edges {
        edge.blue_edge = edge.blue.map(|target| scaled.blue_position(target));
    }
}

#[cfg(test)]
mod tests {
    use super::super::{
        axis::Segment,
        metrics::Blue,
        outline::Orientation,
        segments::{compute_segments, link_segments},
        testing,
    };
    use super::*;
    use pretty_assertions::assert_eq;

    fn hinted_axes(outline: &mut Outline) {
        for axis in Axis::ALL {
            compute_segments(outline, axis);
            link_segments(&mut outline.axes[axis.index()]);
            compute_edges(outline, axis);
        }
    }

    #[test]
    fn rectangle_edges() {
        let mut outline = Outline::default();
        outline
            .load(&testing::rect(0, 0, 100, 200), testing::unit_scale(1000))
            .unwrap();
        hinted_axes(&mut outline);
        let summary = |hints: &AxisHints| {
            hints
                .edges
                .iter()
                .map(|e| (e.fpos, e.opos, e.dir, e.link_ix, e.serif_ix, e.flags))
                .collect::<Vec<_>>()
        };
        use Direction::{Down, Left, Right, Up};
        assert_eq!(
            summary(&outline.axes[0]),
            [
                (0, 0, Up, Some(1), None, 0),
                (100, 100, Down, Some(0), None, 0)
            ]
        );
        assert_eq!(
            summary(&outline.axes[1]),
            [
                (0, 0, Left, Some(1), None, 0),
                (200, 200, Right, Some(0), None, 0)
            ]
        );
        // Segments know their edges
        let segment_edges = outline.axes[1]
            .segments
            .iter()
            .map(|s| s.edge_ix)
            .collect::<Vec<_>>();
        assert_eq!(segment_edges, [Some(1), Some(0)]);
    }

    fn segment_at(pos: i32, dir: Direction) -> Segment {
        Segment {
            dir,
            pos,
            min_coord: 0,
            max_coord: 100,
            ..Default::default()
        }
    }

    #[test]
    fn nearby_segments_merge() {
        let mut hints = AxisHints::new(Axis::Horizontal, Orientation::Clockwise);
        // 10px, 10.2px, 10.3px and 11px at one font unit per 1/64 pixel
        hints.segments = [640, 653, 659, 704]
            .map(|pos| segment_at(pos, Direction::Up))
            .to_vec();
        build_edges(&mut hints, 0x10000, 20);
        let edges = hints
            .edges
            .iter()
            .enumerate()
            .map(|(ix, e)| (e.fpos, hints.edge_segments(ix).count()))
            .collect::<Vec<_>>();
        // 10.3px is 19/64 away and the merge distance is strictly under a
        // quarter pixel, so it starts its own edge
        assert_eq!(edges, [(640, 2), (659, 1), (704, 1)]);
        let segment_edges = hints
            .segments
            .iter()
            .map(|s| s.edge_ix)
            .collect::<Vec<_>>();
        assert_eq!(segment_edges, [Some(0), Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn edges_sorted_by_position() {
        let mut hints = AxisHints::new(Axis::Horizontal, Orientation::Clockwise);
        hints.segments = [300, 100, 200, -50]
            .map(|pos| segment_at(pos, Direction::Down))
            .to_vec();
        build_edges(&mut hints, 0x8000, 10);
        let positions = hints
            .edges
            .iter()
            .map(|e| (e.fpos, e.opos, e.dir))
            .collect::<Vec<_>>();
        assert_eq!(
            positions,
            [
                (-50, -25, Direction::Down),
                (100, 50, Direction::Down),
                (200, 100, Direction::Down),
                (300, 150, Direction::Down)
            ]
        );
    }

    #[test]
    fn serif_edges() {
        let mut hints = AxisHints::new(Axis::Horizontal, Orientation::Clockwise);
        hints.segments = vec![
            segment_at(0, Direction::Up),
            segment_at(100, Direction::Down),
            segment_at(300, Direction::Down),
        ];
        hints.segments[0].first_ix = 0;
        hints.segments[0].last_ix = 1;
        link_segments(&mut hints);
        build_edges(&mut hints, 0x10000, 10);
        let edges = hints
            .edges
            .iter()
            .map(|e| (e.link_ix, e.serif_ix, e.flags))
            .collect::<Vec<_>>();
        assert_eq!(
            edges,
            [
                (Some(1), None, 0),
                (Some(0), None, Edge::SERIF),
                (None, Some(1), 0)
            ]
        );
    }

    #[test]
    fn round_and_mixed_edges() {
        let mut hints = AxisHints::new(Axis::Horizontal, Orientation::Clockwise);
        let mut round = segment_at(0, Direction::Up);
        round.flags = Segment::ROUND;
        let mut down = segment_at(2, Direction::Down);
        down.flags = Segment::ROUND;
        hints.segments = vec![round, down, segment_at(500, Direction::Down)];
        hints.segments[1].max_coord = 50;
        build_edges(&mut hints, 0x10000, 10);
        // Both round segments merge; the longer up segment wins the vote
        assert_eq!(hints.edges[0].flags, Edge::ROUND);
        assert_eq!(hints.edges[0].dir, Direction::Up);
        assert_eq!(hints.edges[1].flags, 0);
        assert_eq!(hints.edges[1].dir, Direction::Down);
    }

    fn blue_metrics() -> DesignMetrics {
        let mut design = DesignMetrics::default();
        design.blues[BlueZone::CapitalTop as usize] = Blue::new(700, 712);
        design.blues[BlueZone::CapitalBottom as usize] = Blue::new(0, -12);
        design
    }

    #[test]
    fn flat_edges_snap_to_reference() {
        let mut outline = Outline::default();
        outline
            .load(&testing::rect(0, 0, 100, 700), testing::unit_scale(1000))
            .unwrap();
        hinted_axes(&mut outline);
        let design = blue_metrics();
        compute_blue_edges(&mut outline, &design);
        let hints = &mut outline.axes[1];
        let blues = hints.edges.iter().map(|e| e.blue).collect::<Vec<_>>();
        assert_eq!(
            blues,
            [
                Some(BlueTarget {
                    zone: BlueZone::CapitalBottom,
                    kind: BlueKind::Reference
                }),
                Some(BlueTarget {
                    zone: BlueZone::CapitalTop,
                    kind: BlueKind::Reference
                })
            ]
        );
        scale_blue_edges(hints, &ScaledMetrics::new(&design, 0x10000, 0x10000));
        let positions = hints.edges.iter().map(|e| e.blue_edge).collect::<Vec<_>>();
        assert_eq!(positions, [Some(0), Some(704)]);
        // Horizontal edges never get blue zones
        assert!(outline.axes[0].edges.iter().all(|e| e.blue.is_none()));
    }

    #[test]
    fn round_edges_snap_to_overshoot() {
        let mut hints = AxisHints::new(Axis::Vertical, Orientation::Clockwise);
        hints.edges = vec![
            Edge {
                fpos: 710,
                dir: Direction::Right,
                flags: Edge::ROUND,
                ..Default::default()
            },
            Edge {
                fpos: 705,
                dir: Direction::Right,
                ..Default::default()
            },
            // Below the reference so the overshoot does not apply
            Edge {
                fpos: 690,
                dir: Direction::Right,
                flags: Edge::ROUND,
                ..Default::default()
            },
            // Bottom edges ignore top zones
            Edge {
                fpos: 700,
                dir: Direction::Left,
                ..Default::default()
            },
        ];
        assign_blue_zones(&mut hints, &blue_metrics(), 0x10000, 1000);
        let kinds = hints
            .edges
            .iter()
            .map(|e| e.blue.map(|b| b.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            [
                Some(BlueKind::Overshoot),
                Some(BlueKind::Reference),
                Some(BlueKind::Reference),
                None
            ]
        );
    }

    #[test]
    fn wide_zones_are_inactive() {
        let mut hints = AxisHints::new(Axis::Vertical, Orientation::Clockwise);
        hints.edges = vec![Edge {
            fpos: 700,
            dir: Direction::Right,
            ..Default::default()
        }];
        let mut design = DesignMetrics::default();
        design.blues[BlueZone::CapitalTop as usize] = Blue::new(700, 800);
        assign_blue_zones(&mut hints, &design, 0x10000, 1000);
        assert_eq!(hints.edges[0].blue, None);
    }

    #[test]
    fn zero_height_zones_stay_active_when_huge() {
        let mut hints = AxisHints::new(Axis::Vertical, Orientation::Clockwise);
        hints.edges = vec![Edge {
            fpos: 100,
            dir: Direction::Right,
            ..Default::default()
        }];
        let mut design = DesignMetrics::default();
        design.blues[BlueZone::CapitalTop as usize] = Blue::new(100, 100);
        assign_blue_zones(&mut hints, &design, 0x7fff_0000, 1000);
        assert_eq!(
            hints.edges[0].blue,
            Some(BlueTarget {
                zone: BlueZone::CapitalTop,
                kind: BlueKind::Reference
            })
        );
    }
}

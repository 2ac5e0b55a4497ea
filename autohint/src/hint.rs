//! Edge hinting.
//!
//! Let's actually do some grid fitting. Here we align edges to the pixel
//! grid. This is the final step before applying the edge adjustments to
//! the original outline points.

use super::{
    axis::{Axis, AxisHints, Edge},
    math::pix_round,
    metrics::{Scale, ScaledMetrics},
};

/// Main grid-fitting routine for one axis.
pub(crate) fn hint_edges(hints: &mut AxisHints, metrics: &ScaledMetrics, scale: &Scale) {
    let hinter = EdgeHinter {
        axis: hints.axis,
        metrics,
        scale,
    };
    let edges = hints.edges.as_mut_slice();
    // First align horizontal edges to blue zones if needed
    let anchor_ix = if hinter.axis == Axis::Vertical {
        hinter.align_edges_to_blues(edges)
    } else {
        None
    };
    // Now align the stem edges
    let (serif_count, anchor_ix) = hinter.align_stem_edges(edges, anchor_ix);
    // Special case for lowercase m
    if hinter.axis == Axis::Horizontal && (edges.len() == 6 || edges.len() == 12) {
        hint_lowercase_m(edges);
    }
    // Handle serifs and single segment edges
    if serif_count > 0 || anchor_ix.is_none() {
        hinter.align_remaining_edges(edges, anchor_ix);
    }
    // The m adjustment moves edges without looking at their neighbors
    for ix in 1..edges.len() {
        let prev_pos = edges[ix - 1].pos;
        let edge = &mut edges[ix];
        edge.pos = edge.pos.max(prev_pos);
    }
}

struct EdgeHinter<'a> {
    axis: Axis,
    metrics: &'a ScaledMetrics,
    scale: &'a Scale,
}

impl EdgeHinter<'_> {
    /// Snaps edges and their stem partners to blue zones, returning the
    /// first aligned edge.
    fn align_edges_to_blues(&self, edges: &mut [Edge]) -> Option<usize> {
        let mut anchor_ix = None;
        for edge_ix in 0..edges.len() {
            let edge = &edges[edge_ix];
            if edge.flags & Edge::DONE != 0 {
                continue;
            }
            let link_ix = edge.link_ix.map(|ix| ix as usize);
            let (edge1_ix, blue, edge2_ix) = if let Some(blue) = edge.blue_edge {
                (edge_ix, blue, link_ix)
            } else if let Some((link_ix, blue)) =
                link_ix.and_then(|ix| Some((ix, edges.get(ix)?.blue_edge?)))
            {
                (link_ix, blue, Some(edge_ix))
            } else {
                continue;
            };
            let edge1 = &mut edges[edge1_ix];
            edge1.pos = blue;
            edge1.flags |= Edge::DONE;
            if let Some(edge2_ix) = edge2_ix {
                if edges[edge2_ix].blue_edge.is_none() {
                    self.align_linked_edge(edges, edge1_ix, edge2_ix);
                    edges[edge2_ix].flags |= Edge::DONE;
                }
            }
            if anchor_ix.is_none() {
                anchor_ix = Some(edge_ix);
            }
        }
        anchor_ix
    }

    /// Positions linked stem edges, returning the number of unlinked edges
    /// and the updated anchor.
    fn align_stem_edges(
        &self,
        edges: &mut [Edge],
        mut anchor_ix: Option<usize>,
    ) -> (usize, Option<usize>) {
        let mut serif_count = 0;
        for edge_ix in 0..edges.len() {
            let edge = edges[edge_ix];
            if edge.flags & Edge::DONE != 0 {
                continue;
            }
            let Some(edge2_ix) = edge.link_ix.map(|ix| ix as usize) else {
                serif_count += 1;
                continue;
            };
            let Some(edge2) = edges.get(edge2_ix).copied() else {
                continue;
            };
            // Partner already positioned: follow it
            if edge2.blue_edge.is_some() || edge2_ix < edge_ix {
                self.align_linked_edge(edges, edge2_ix, edge_ix);
                edges[edge_ix].flags |= Edge::DONE;
                continue;
            }
            if let Some(anchor) = anchor_ix.map(|ix| edges[ix]) {
                let org_pos = anchor.pos + (edge.opos - anchor.opos);
                let org_len = edge2.opos - edge.opos;
                let org_center = org_pos + (org_len >> 1);
                let cur_len = self.stem_width(org_len, edge.flags, edge2.flags);
                let (pos1, pos2) = if cur_len < 96 {
                    // Center short stems on a pixel boundary or middle,
                    // whichever is closer
                    let (u_off, d_off) = if cur_len <= 64 { (32, 32) } else { (38, 26) };
                    let mut center = pix_round(org_center);
                    let error1 = (org_center - (center - u_off)).abs();
                    let error2 = (org_center - (center + d_off)).abs();
                    if error1 < error2 {
                        center -= u_off;
                    } else {
                        center += d_off;
                    }
                    (center - cur_len / 2, center + cur_len / 2)
                } else {
                    // Snap whichever side keeps the center closer
                    let cur_pos1 = pix_round(org_pos);
                    let delta1 = (cur_pos1 + (cur_len >> 1) - org_center).abs();
                    let cur_pos2 = pix_round(org_pos + org_len) - cur_len;
                    let delta2 = (cur_pos2 + (cur_len >> 1) - org_center).abs();
                    let pos = if delta1 < delta2 { cur_pos1 } else { cur_pos2 };
                    (pos, pos + cur_len)
                };
                edges[edge_ix].pos = pos1;
                edges[edge2_ix].pos = pos2;
            } else {
                edges[edge_ix].pos = pix_round(edge.opos);
                anchor_ix = Some(edge_ix);
                self.align_linked_edge(edges, edge_ix, edge2_ix);
            }
            edges[edge_ix].flags |= Edge::DONE;
            edges[edge2_ix].flags |= Edge::DONE;
            clamp_to_done_neighbors(edges, edge_ix);
            // Nested stems can push the partner past an outer edge
            clamp_to_done_neighbors(edges, edge2_ix);
        }
        (serif_count, anchor_ix)
    }

    /// Aligns serifs and edges that are not part of a stem.
    fn align_remaining_edges(&self, edges: &mut [Edge], mut anchor_ix: Option<usize>) {
        for edge_ix in 0..edges.len() {
            let edge = edges[edge_ix];
            if edge.flags & Edge::DONE != 0 {
                continue;
            }
            if let Some(serif_ix) = edge.serif_ix.map(|ix| ix as usize) {
                align_serif_edge(edges, serif_ix, edge_ix);
            } else if let Some(anchor) = anchor_ix.map(|ix| edges[ix]) {
                edges[edge_ix].pos = anchor.pos + pix_round(edge.opos - anchor.opos);
            } else {
                edges[edge_ix].pos = pix_round(edge.opos);
                anchor_ix = Some(edge_ix);
            }
            edges[edge_ix].flags |= Edge::DONE;
            clamp_to_done_neighbors(edges, edge_ix);
        }
    }

    /// Moves the stem edge so that it is the fitted stem width away from
    /// the base edge.
    fn align_linked_edge(&self, edges: &mut [Edge], base_ix: usize, stem_ix: usize) {
        let base = edges[base_ix];
        let stem = &mut edges[stem_ix];
        let width = stem.opos - base.opos;
        stem.pos = base.pos + self.stem_width(width, base.flags, stem.flags);
    }

    /// Computes the fitted width of a stem.
    fn stem_width(&self, width: i32, base_flags: u8, stem_flags: u8) -> i32 {
        stem_width(
            self.axis,
            self.metrics,
            self.scale,
            width,
            base_flags,
            stem_flags,
        )
    }
}

/// Keeps a freshly positioned edge between its neighbors, as far as
/// those have been positioned.
fn clamp_to_done_neighbors(edges: &mut [Edge], edge_ix: usize) {
    if let Some(prev) = edge_ix.checked_sub(1).map(|ix| edges[ix]) {
        let edge = &mut edges[edge_ix];
        if prev.flags & Edge::DONE != 0 && edge.pos < prev.pos {
            edge.pos = prev.pos;
        }
    }
    if let Some(next) = edges.get(edge_ix + 1).copied() {
        let edge = &mut edges[edge_ix];
        if next.flags & Edge::DONE != 0 && edge.pos > next.pos {
            edge.pos = next.pos;
        }
    }
}

/// Shift the serif edge by the adjustment made to base edge.
fn align_serif_edge(edges: &mut [Edge], base_ix: usize, serif_ix: usize) {
    let base = edges[base_ix];
    let serif = &mut edges[serif_ix];
    serif.pos = base.pos + (serif.opos - base.opos);
}

/// Make sure that lowercase m's maintain symmetry.
///
/// The three stems of an `m` are detected by edge count alone; when their
/// original spacing is equal the third stem is moved to restore it.
fn hint_lowercase_m(edges: &mut [Edge]) {
    let [ix1, ix2, ix3] = if edges.len() == 6 { [0, 2, 4] } else { [1, 5, 9] };
    let (e1, e2, e3) = (edges[ix1], edges[ix2], edges[ix3]);
    let span = ((e2.opos - e1.opos) - (e3.opos - e2.opos)).abs();
    if span >= 8 {
        return;
    }
    let delta = e3.pos - (2 * e2.pos - e1.pos);
    let mut shift = |ix: usize| {
        if let Some(edge) = edges.get_mut(ix) {
            edge.pos -= delta;
            edge.flags |= Edge::DONE;
        }
    };
    shift(ix3);
    if let Some(link_ix) = e3.link_ix {
        shift(link_ix as usize);
    }
    // Move serifs along with the stem
    if edges.len() == 12 {
        edges[8].pos -= delta;
        edges[11].pos -= delta;
    }
}

/// Snaps a scaled width to the nearest standard width when it is close
/// enough not to change the pixel count.
fn snap_width(widths: &[i32], width: i32) -> i32 {
    let mut best_dist = 64 + 32 + 2;
    let mut reference = width;
    for &candidate in widths {
        let dist = (width - candidate).abs();
        if dist < best_dist {
            best_dist = dist;
            reference = candidate;
        }
    }
    let scaled = pix_round(reference);
    if width >= reference {
        if width < scaled + 48 {
            return reference;
        }
    } else if width > scaled - 48 {
        return reference;
    }
    width
}

/// Compute the fitted width of a stem.
///
/// Smooth hinting keeps stems near their original widths, strengthening
/// thin stems and snapping to standard widths. Strong hinting snaps to
/// whole pixels.
pub(crate) fn stem_width(
    axis: Axis,
    metrics: &ScaledMetrics,
    scale: &Scale,
    width: i32,
    base_flags: u8,
    stem_flags: u8,
) -> i32 {
    if scale.flags & Scale::STEM_ADJUST == 0 {
        return width;
    }
    let is_vertical = axis == Axis::Vertical;
    let sign = if width < 0 { -1 } else { 1 };
    let mut dist = width.abs();
    if !scale.snaps_axis(axis) {
        // Do smooth hinting
        if (stem_flags & Edge::SERIF != 0) && is_vertical && dist < 3 * 64 {
            // Don't touch widths of serifs
            return dist * sign;
        } else if base_flags & Edge::ROUND != 0 {
            if dist < 80 {
                dist = 64;
            }
        } else if dist < 56 {
            dist = 56;
        }
        // Compare to standard width
        let standard = metrics.standard_width(axis);
        if (dist - standard).abs() < 40 {
            return standard.max(48) * sign;
        }
        if dist < 3 * 64 {
            let delta = dist & 63;
            dist &= -64;
            dist += if delta < 10 {
                delta
            } else if delta < 32 {
                10
            } else if delta < 54 {
                54
            } else {
                delta
            };
        } else {
            dist = pix_round(dist);
        }
    } else {
        // Do strong hinting: snap to integer pixels
        dist = snap_width(metrics.widths(axis), dist);
        if is_vertical {
            // Always round to integers in the vertical case
            dist = if dist >= 64 { (dist + 16) & !63 } else { 64 };
        } else if scale.flags & Scale::MONO != 0 {
            dist = if dist < 64 { 64 } else { pix_round(dist) };
        } else if dist < 48 {
            // Strengthen small stems
            dist = (dist + 64) >> 1;
        } else if dist < 128 {
            dist = (dist + 22) & !63;
        } else {
            // Round otherwise to prevent color fringes in LCD mode
            dist = pix_round(dist);
        }
    }
    dist * sign
}

#[cfg(test)]
mod tests {
    use super::super::metrics::DesignMetrics;
    use super::*;
    use pretty_assertions::assert_eq;

    fn scale(flags: u32) -> Scale {
        Scale {
            x_scale: 0x10000,
            y_scale: 0x10000,
            size: 16.0,
            units_per_em: 1000,
            flags,
        }
    }

    fn metrics(widths: &[i32], heights: &[i32]) -> ScaledMetrics {
        let design = DesignMetrics {
            widths: widths.to_vec(),
            heights: heights.to_vec(),
            ..Default::default()
        };
        ScaledMetrics::new(&design, 0x10000, 0x10000)
    }

    #[test]
    fn smooth_stem_widths() {
        let metrics = metrics(&[], &[]);
        let scale = scale(Scale::STEM_ADJUST);
        let width = |w, base_flags| {
            stem_width(Axis::Horizontal, &metrics, &scale, w, base_flags, 0)
        };
        // Nearly whole pixel widths are kept
        assert_eq!(width(70, 0), 70);
        assert_eq!(width(-70, 0), -70);
        assert_eq!(width(90, 0), 74);
        assert_eq!(width(110, 0), 118);
        assert_eq!(width(120, 0), 120);
        assert_eq!(width(200, 0), 192);
        // Thin stems are strengthened
        assert_eq!(width(20, 0), 56);
        assert_eq!(width(70, Edge::ROUND), 64);
    }

    #[test]
    fn standard_width_snapping() {
        let metrics = metrics(&[64], &[]);
        let scale = scale(Scale::STEM_ADJUST);
        let width = |w| stem_width(Axis::Horizontal, &metrics, &scale, w, 0, 0);
        assert_eq!(width(80), 64);
        assert_eq!(width(110), 118);
        // No vertical standard
        assert_eq!(stem_width(Axis::Vertical, &metrics, &scale, 80, 0, 0), 74);
    }

    #[test]
    fn serif_heights_untouched() {
        let metrics = metrics(&[], &[]);
        let scale = scale(Scale::STEM_ADJUST);
        assert_eq!(
            stem_width(Axis::Vertical, &metrics, &scale, 90, 0, Edge::SERIF),
            90
        );
        assert_eq!(
            stem_width(Axis::Horizontal, &metrics, &scale, 90, 0, Edge::SERIF),
            74
        );
    }

    #[test]
    fn light_mode_keeps_widths() {
        let metrics = metrics(&[], &[]);
        let scale = scale(0);
        assert_eq!(
            stem_width(Axis::Horizontal, &metrics, &scale, 37, 0, 0),
            37
        );
    }

    #[test]
    fn strong_stem_widths() {
        let metrics = metrics(&[], &[]);
        let mono = scale(
            Scale::HORIZONTAL_SNAP | Scale::VERTICAL_SNAP | Scale::STEM_ADJUST | Scale::MONO,
        );
        let lcd = scale(Scale::HORIZONTAL_SNAP | Scale::STEM_ADJUST);
        let vlcd = scale(Scale::VERTICAL_SNAP | Scale::STEM_ADJUST);
        let width = |axis, scale: &Scale, w| stem_width(axis, &metrics, scale, w, 0, 0);
        assert_eq!(width(Axis::Horizontal, &mono, 40), 64);
        assert_eq!(width(Axis::Horizontal, &mono, 100), 128);
        assert_eq!(width(Axis::Horizontal, &lcd, 40), 52);
        assert_eq!(width(Axis::Horizontal, &lcd, 100), 64);
        assert_eq!(width(Axis::Horizontal, &lcd, 150), 128);
        assert_eq!(width(Axis::Vertical, &vlcd, 40), 64);
        assert_eq!(width(Axis::Vertical, &vlcd, 100), 64);
        assert_eq!(width(Axis::Vertical, &vlcd, 120), 128);
    }

    #[test]
    fn snap_to_nearby_standard() {
        assert_eq!(snap_width(&[70], 80), 70);
        assert_eq!(snap_width(&[70, 150], 140), 150);
        assert_eq!(snap_width(&[70], 200), 200);
        assert_eq!(snap_width(&[], 33), 33);
    }

    fn edge(opos: i32, link_ix: Option<u16>) -> Edge {
        Edge {
            fpos: opos,
            opos,
            pos: opos,
            link_ix,
            ..Default::default()
        }
    }

    fn hint(axis: Axis, edges: Vec<Edge>) -> Vec<i32> {
        let mut hints = AxisHints {
            axis,
            edges,
            ..Default::default()
        };
        hint_edges(&mut hints, &metrics(&[], &[]), &scale(Scale::STEM_ADJUST));
        assert!(hints.edges.iter().all(|e| e.flags & Edge::DONE != 0));
        hints.edges.iter().map(|e| e.pos).collect()
    }

    #[test]
    fn first_stem_becomes_anchor() {
        let positions = hint(Axis::Horizontal, vec![edge(100, Some(1)), edge(170, Some(0))]);
        assert_eq!(positions, [128, 198]);
    }

    #[test]
    fn stems_relative_to_anchor() {
        let positions = hint(
            Axis::Horizontal,
            vec![
                edge(100, Some(1)),
                edge(170, Some(0)),
                edge(300, Some(3)),
                edge(370, Some(2)),
            ],
        );
        assert_eq!(positions, [128, 198, 311, 381]);
    }

    #[test]
    fn blue_edges_and_linked_stems() {
        let mut edges = vec![edge(2, Some(1)), edge(100, Some(0))];
        edges[0].blue_edge = Some(0);
        assert_eq!(hint(Axis::Vertical, edges.clone()), [0, 118]);
        // The blue zone of the partner is used when the edge has none
        edges[0].blue_edge = None;
        edges[1].blue_edge = Some(128);
        assert_eq!(hint(Axis::Vertical, edges), [10, 128]);
    }

    #[test]
    fn serifs_and_single_edges() {
        let mut serif = edge(250, None);
        serif.serif_ix = Some(1);
        let positions = hint(
            Axis::Horizontal,
            vec![edge(100, Some(1)), edge(170, Some(0)), serif, edge(400, None)],
        );
        assert_eq!(positions, [128, 198, 278, 448]);
        // Without any stem the first edge anchors the rest
        let positions = hint(Axis::Horizontal, vec![edge(100, None), edge(230, None)]);
        assert_eq!(positions, [128, 256]);
    }

    #[test]
    fn nested_stems_keep_edge_order() {
        // Outer stem from 0 to 40 around an inner one from 10 to 30. Both
        // widen to 56 and the inner one would end past the outer.
        let positions = hint(
            Axis::Horizontal,
            vec![
                edge(0, Some(3)),
                edge(10, Some(2)),
                edge(30, Some(1)),
                edge(40, Some(0)),
            ],
        );
        assert_eq!(positions, [0, 4, 56, 56]);
    }

    #[test]
    fn lowercase_m_symmetry() {
        let positions = hint(
            Axis::Horizontal,
            vec![
                edge(0, Some(1)),
                edge(30, Some(0)),
                edge(200, Some(3)),
                edge(230, Some(2)),
                edge(400, Some(5)),
                edge(430, Some(4)),
            ],
        );
        assert_eq!(positions, [0, 56, 196, 252, 392, 448]);
    }
}

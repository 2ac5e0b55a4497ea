//! Standard stem width computation.

use super::{
    axis::Axis,
    error::{HintError, Result},
    glyph::{Glyph, GlyphSource},
    metrics::{sort_and_quantize_widths, DesignMetrics, DEFAULT_STANDARD_WIDTH, MAX_WIDTHS},
    outline::{Outline, OutlineScale},
    segments::{compute_segments, link_segments},
};

/// Character whose stems define the standard widths and heights.
const WIDTH_SAMPLE_CHAR: char = 'o';

/// Loads the outline mapped from `ch` in font units.
///
/// Returns `Ok(false)` when the character is unmapped, the glyph is not a
/// simple outline or the outline is malformed.
pub(crate) fn load_sample(
    source: &impl GlyphSource,
    ch: char,
    outline: &mut Outline,
) -> Result<bool> {
    let Some(glyph) = source
        .map_char(ch)
        .and_then(|glyph_id| source.glyph(glyph_id))
    else {
        return Ok(false);
    };
    let Glyph::Outline(raw) = glyph.as_ref() else {
        return Ok(false);
    };
    let scale = OutlineScale {
        x_scale: 0x10000,
        y_scale: 0x10000,
        units_per_em: source.units_per_em() as i32,
        edge_distance_threshold: 0,
    };
    match outline.load(raw, scale) {
        Ok(()) => Ok(!outline.points.is_empty()),
        Err(HintError::OutOfMemory) => Err(HintError::OutOfMemory),
        Err(e) => {
            log::debug!("ignoring sample glyph for {ch:?}: {e}");
            Ok(false)
        }
    }
}

/// Computes the standard widths and heights from the stems of the sample
/// glyph.
///
/// The remaining fields of the result have their default values except
/// for the edge distance threshold which is derived from the smallest
/// standard width.
pub(crate) fn compute_widths(source: &impl GlyphSource) -> Result<DesignMetrics> {
    let units_per_em = source.units_per_em() as i32;
    let mut metrics = DesignMetrics::default();
    let mut outline = Outline::default();
    if load_sample(source, WIDTH_SAMPLE_CHAR, &mut outline)? {
        for axis in Axis::ALL {
            compute_segments(&mut outline, axis);
            let hints = &mut outline.axes[axis.index()];
            link_segments(hints);
            let segments = hints.segments.as_slice();
            let mut widths = Vec::new();
            for (segment_ix, segment) in segments.iter().enumerate() {
                let segment_ix = segment_ix as u16;
                let Some(link_ix) = segment.link_ix else {
                    continue;
                };
                let link = &segments[link_ix as usize];
                // Count each mutually linked pair once
                if link_ix > segment_ix && link.link_ix == Some(segment_ix) {
                    if widths.len() == MAX_WIDTHS {
                        break;
                    }
                    widths.push((segment.pos - link.pos).abs());
                }
            }
            // The value 100 is heuristic
            sort_and_quantize_widths(&mut widths, units_per_em / 100);
            match axis {
                Axis::Horizontal => metrics.widths = widths,
                Axis::Vertical => metrics.heights = widths,
            }
        }
    }
    // Heuristic value of 20% of the smallest width
    let smallest = metrics
        .widths
        .first()
        .into_iter()
        .chain(metrics.heights.first())
        .min()
        .copied()
        .unwrap_or(DEFAULT_STANDARD_WIDTH);
    metrics.edge_distance_threshold = smallest / 5;
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::super::{glyph::GlyphSet, testing};
    use super::*;
    use font_types::GlyphId;

    #[test]
    fn widths_from_o() {
        let metrics = compute_widths(&testing::sample_glyphs()).unwrap();
        assert_eq!(metrics.widths, [100]);
        assert_eq!(metrics.heights, [80]);
        assert_eq!(metrics.edge_distance_threshold, 16);
    }

    #[test]
    fn fallback_without_o() {
        let mut glyphs = GlyphSet::new(1000);
        glyphs.insert(GlyphId::new(1), Some('H'), testing::rect(0, 0, 100, 700));
        let metrics = compute_widths(&glyphs).unwrap();
        assert!(metrics.widths.is_empty());
        assert!(metrics.heights.is_empty());
        assert_eq!(metrics.edge_distance_threshold, 10);
    }

    #[test]
    fn malformed_sample_is_ignored() {
        let mut glyphs = GlyphSet::new(1000);
        let mut raw = testing::rect(0, 0, 100, 100);
        raw.contour_ends = vec![7];
        glyphs.insert(GlyphId::new(1), Some('o'), raw);
        let metrics = compute_widths(&glyphs).unwrap();
        assert_eq!(metrics, DesignMetrics::default());
    }
}

//! Blue zone computation.
//!
//! For each zone, the sample characters are measured at their extreme
//! vertical point. Extrema on flat runs of the contour give the reference
//! position and extrema on curves give the overshoot.

use super::{
    cycling::{ring_backward, ring_forward},
    glyph::{Glyph, GlyphSource, RawPoint},
    metrics::{Blue, BlueZone},
};
use alloc::vec::Vec;

/// Points closer than this vertically are considered part of the same
/// flat run as the extremum.
const FLAT_TOLERANCE: i32 = 5;

/// Computes the blue zones of the font from its sample characters.
///
/// Zones without any usable sample are set to [`Blue::MISSING`].
pub(crate) fn compute_blues(source: &impl GlyphSource) -> [Blue; 5] {
    let mut flats = Vec::new();
    let mut rounds = Vec::new();
    BlueZone::ALL.map(|zone| {
        flats.clear();
        rounds.clear();
        for ch in zone.sample_chars().chars() {
            let Some(glyph) = source
                .map_char(ch)
                .and_then(|glyph_id| source.glyph(glyph_id))
            else {
                continue;
            };
            let Glyph::Outline(raw) = glyph.as_ref() else {
                continue;
            };
            if let Some((y, is_round)) = measure_extremum(raw.contours(), zone.is_top()) {
                if is_round {
                    rounds.push(y);
                } else {
                    flats.push(y);
                }
            }
        }
        let blue = blue_from_samples(zone, &mut flats, &mut rounds);
        log::debug!("blue zone {zone:?}: {blue:?}");
        blue
    })
}

/// Finds the topmost or bottommost point and reports whether it lies on a
/// curve.
fn measure_extremum<'a>(
    contours: impl Iterator<Item = &'a [RawPoint]>,
    is_top: bool,
) -> Option<(i32, bool)> {
    let mut best: Option<(&[RawPoint], usize)> = None;
    let mut best_y = 0;
    for contour in contours {
        for (ix, point) in contour.iter().enumerate() {
            let is_better = match best {
                None => true,
                Some(_) if is_top => point.y > best_y,
                Some(_) => point.y < best_y,
            };
            if is_better {
                best = Some((contour, ix));
                best_y = point.y;
            }
        }
    }
    let (contour, best_ix) = best?;
    // Look for the previous and next points on the contour that are not
    // at the same height
    let is_distinct = |ix: &usize| (contour[*ix].y - best_y).abs() > FLAT_TOLERANCE;
    let prev_ix = ring_backward(contour.len(), best_ix)
        .find(is_distinct)
        .unwrap_or(best_ix);
    let next_ix = ring_forward(contour.len(), best_ix)
        .find(is_distinct)
        .unwrap_or(best_ix);
    let is_round = !contour[prev_ix].on_curve || !contour[next_ix].on_curve;
    Some((best_y, is_round))
}

/// Reduces the measured positions of a zone to its reference and
/// overshoot.
fn blue_from_samples(zone: BlueZone, flats: &mut [i32], rounds: &mut [i32]) -> Blue {
    flats.sort_unstable();
    rounds.sort_unstable();
    let median = |values: &[i32]| values.get(values.len() / 2).copied();
    let mut blue = match (median(flats), median(rounds)) {
        (None, None) => return Blue::MISSING,
        (None, Some(round)) => Blue::new(round, round),
        (Some(flat), None) => Blue::new(flat, flat),
        (Some(flat), Some(round)) => Blue::new(flat, round),
    };
    // Overshoots must extend beyond the reference: upwards for top zones
    // and downwards for the others
    if blue.overshoot != blue.reference {
        let over_ref = blue.overshoot > blue.reference;
        if zone.is_top() != over_ref {
            let mid = (blue.overshoot + blue.reference) / 2;
            blue = Blue::new(mid, mid);
        }
    }
    blue
}

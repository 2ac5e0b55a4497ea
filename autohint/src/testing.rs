//! Helpers for unit testing

use super::{
    glyph::{GlyphSet, RawOutline, RawPoint},
    outline::OutlineScale,
};
use font_types::GlyphId;

/// Scale that maps font units directly to 26.6 values.
pub fn unit_scale(units_per_em: i32) -> OutlineScale {
    OutlineScale {
        x_scale: 0x10000,
        y_scale: 0x10000,
        units_per_em,
        edge_distance_threshold: 10,
    }
}

/// Clockwise rectangle starting at the bottom left corner.
///
/// The advance leaves equal side bearings on both sides.
pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> RawOutline {
    RawOutline::from_contours(
        [[
            RawPoint::on(x0, y0),
            RawPoint::on(x0, y1),
            RawPoint::on(x1, y1),
            RawPoint::on(x1, y0),
        ]],
        x1 + x0,
    )
}

/// Reverses the winding of every contour.
pub fn reversed(outline: &RawOutline) -> RawOutline {
    RawOutline::from_contours(
        outline.contours().map(|contour| contour.iter().rev().copied()),
        outline.advance_width,
    )
}

/// Clockwise ellipse-like contour made of four quadratic arcs that touch
/// the given bounds at their midpoints.
pub fn round_rect(x0: i32, y0: i32, x1: i32, y1: i32) -> RawOutline {
    let (xm, ym) = ((x0 + x1) / 2, (y0 + y1) / 2);
    let ax = (x1 - x0) * 55 / 200;
    let ay = (y1 - y0) * 55 / 200;
    RawOutline::from_contours(
        [[
            RawPoint::on(x0, ym),
            RawPoint::off(x0, ym + ay),
            RawPoint::off(xm - ax, y1),
            RawPoint::on(xm, y1),
            RawPoint::off(xm + ax, y1),
            RawPoint::off(x1, ym + ay),
            RawPoint::on(x1, ym),
            RawPoint::off(x1, ym - ay),
            RawPoint::off(xm + ax, y0),
            RawPoint::on(xm, y0),
            RawPoint::off(xm - ax, y0),
            RawPoint::off(x0, ym - ay),
        ]],
        x1 + x0,
    )
}

/// Small font with a flat capital, a round capital and a round lowercase
/// letter with a counter.
pub fn sample_glyphs() -> GlyphSet {
    let mut glyphs = GlyphSet::new(1000);
    glyphs.insert(GlyphId::new(1), Some('H'), rect(0, 0, 100, 700));
    glyphs.insert(GlyphId::new(2), Some('O'), round_rect(0, -12, 600, 712));
    let outer = round_rect(0, -10, 400, 510);
    let inner = reversed(&round_rect(100, 70, 300, 430));
    let o = RawOutline::from_contours(
        outer.contours().chain(inner.contours()).map(|c| c.to_vec()),
        400,
    );
    glyphs.insert(GlyphId::new(3), Some('o'), o);
    glyphs
}

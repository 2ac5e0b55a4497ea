//! Automatic grid fitting for glyph outlines.
//!
//! The hinter analyzes an unhinted outline for stems, serifs and
//! alignment zones and moves its points so that these features land on the
//! pixel grid at a particular size.
//!
//! Font wide metrics (standard stem widths and blue zones) are computed
//! once from a handful of sample glyphs and kept in [`FontGlobals`]. Glyphs
//! are supplied through the [`GlyphSource`] trait, in font units, and the
//! [`Hinter`] returns points in 26.6 fixed point pixel coordinates along
//! with an adjusted advance width.
//!
//! ```
//! use autohint::{FontGlobals, GlyphId, GlyphSet, Hinter, RawOutline, RawPoint, Target};
//!
//! let mut glyphs = GlyphSet::new(1000);
//! let stem = RawOutline::from_contours(
//!     [[
//!         RawPoint::on(50, 0),
//!         RawPoint::on(50, 700),
//!         RawPoint::on(150, 700),
//!         RawPoint::on(150, 0),
//!     ]],
//!     200,
//! );
//! glyphs.insert(GlyphId::new(1), Some('l'), stem);
//! let mut globals = FontGlobals::compute(&glyphs).unwrap();
//! let mut hinter = Hinter::new(Target::Normal);
//! let glyph = hinter
//!     .hint(&glyphs, &mut globals, GlyphId::new(1), 12.0)
//!     .unwrap();
//! assert_eq!(glyph.points.len(), 4);
//! assert_eq!(glyph.advance_width.to_bits() % 64, 0);
//! ```

#![forbid(unsafe_code)]

extern crate alloc;

mod align;
mod angle;
mod axis;
mod blues;
mod cycling;
mod edges;
mod error;
mod glyph;
mod hint;
mod hinter;
mod inflection;
mod math;
mod metrics;
mod outline;
mod segments;
mod widths;

#[cfg(test)]
mod testing;

pub use error::{HintError, InvalidOutline, Result};
pub use glyph::{
    Component, CompositeGlyph, Glyph, GlyphSet, GlyphSource, Placement, RawOutline, RawPoint,
    Transform,
};
pub use hinter::{
    HintedGlyph, HintedPoint, Hinter, HintingOptions, Target, COMPOSITE_RECURSION_LIMIT,
};
pub use metrics::{Blue, BlueZone, DesignMetrics, FontGlobals};

/// Type for a glyph identifier.
pub type GlyphId = font_types::GlyphId;

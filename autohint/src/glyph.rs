//! Glyph input model.
//!
//! The hinter never parses font files. Callers describe glyphs with these
//! types, in font units, and supply them through a [`GlyphSource`].

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use font_types::{Fixed, GlyphId};

/// Unscaled outline point.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawPoint {
    pub x: i32,
    pub y: i32,
    /// False for quadratic or cubic control points.
    pub on_curve: bool,
}

impl RawPoint {
    pub const fn on(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            on_curve: true,
        }
    }

    pub const fn off(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            on_curve: false,
        }
    }
}

/// Simple glyph outline in font units.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawOutline {
    pub points: Vec<RawPoint>,
    /// Index of the last point of each contour.
    pub contour_ends: Vec<u16>,
    /// Horizontal advance in font units.
    #[cfg_attr(feature = "serde", serde(default))]
    pub advance_width: i32,
}

impl RawOutline {
    /// Builds an outline from a list of contours.
    ///
    /// Contour end indices are derived from the contour lengths; empty
    /// contours are dropped.
    pub fn from_contours<C, P>(contours: C, advance_width: i32) -> Self
    where
        C: IntoIterator<Item = P>,
        P: IntoIterator<Item = RawPoint>,
    {
        let mut outline = Self {
            advance_width,
            ..Default::default()
        };
        for contour in contours {
            let start = outline.points.len();
            outline.points.extend(contour);
            if outline.points.len() > start {
                outline.contour_ends.push((outline.points.len() - 1) as u16);
            }
        }
        outline
    }

    /// Returns an iterator over the point slices of each contour.
    ///
    /// Assumes the contour ends have been validated.
    pub fn contours(&self) -> impl Iterator<Item = &[RawPoint]> + '_ {
        let mut start = 0;
        self.contour_ends.iter().filter_map(move |end| {
            let end = *end as usize + 1;
            let contour = self.points.get(start..end);
            start = end;
            contour
        })
    }
}

/// 2x2 transform applied to a composite component.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub xx: Fixed,
    pub yx: Fixed,
    pub xy: Fixed,
    pub yy: Fixed,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: Fixed::ONE,
            yx: Fixed::ZERO,
            xy: Fixed::ZERO,
            yy: Fixed::ONE,
        }
    }
}

/// Positioning of a composite component.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Placement {
    /// Offset in font units, scaled and rounded to whole pixels.
    Offset { dx: i32, dy: i32 },
    /// Align a point of the component with a point of the composite.
    ///
    /// The parent index counts the points already placed for this composite
    /// and the child index counts the points of this component.
    Anchor { parent: u16, child: u16 },
}

impl Default for Placement {
    fn default() -> Self {
        Self::Offset { dx: 0, dy: 0 }
    }
}

/// Reference to another glyph within a composite.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub glyph_id: GlyphId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub placement: Placement,
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform: Option<Transform>,
    /// Use the hinted metrics of this component for the composite.
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_my_metrics: bool,
}

/// Glyph built from other glyphs.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositeGlyph {
    pub components: Vec<Component>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub advance_width: i32,
}

/// All glyph formats known to the hinter.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Glyph {
    Outline(RawOutline),
    Composite(CompositeGlyph),
    /// Embedded bitmap. These cannot be hinted.
    Bitmap { advance_width: i32 },
}

impl From<RawOutline> for Glyph {
    fn from(value: RawOutline) -> Self {
        Self::Outline(value)
    }
}

impl From<CompositeGlyph> for Glyph {
    fn from(value: CompositeGlyph) -> Self {
        Self::Composite(value)
    }
}

/// Provides glyphs and the character mapping needed to compute global
/// metrics.
pub trait GlyphSource {
    /// Returns the design units per em of the font.
    fn units_per_em(&self) -> u16;

    /// Returns the glyph for the given identifier.
    fn glyph(&self, glyph_id: GlyphId) -> Option<Cow<'_, Glyph>>;

    /// Maps a character to a glyph identifier.
    fn map_char(&self, ch: char) -> Option<GlyphId>;
}

/// In memory collection of glyphs.
#[derive(Clone, Default, Debug)]
pub struct GlyphSet {
    pub units_per_em: u16,
    pub glyphs: BTreeMap<GlyphId, Glyph>,
    pub char_map: BTreeMap<char, GlyphId>,
}

impl GlyphSet {
    pub fn new(units_per_em: u16) -> Self {
        Self {
            units_per_em,
            ..Default::default()
        }
    }

    /// Adds a glyph, optionally mapped from a character.
    pub fn insert(&mut self, glyph_id: GlyphId, ch: Option<char>, glyph: impl Into<Glyph>) {
        self.glyphs.insert(glyph_id, glyph.into());
        if let Some(ch) = ch {
            self.char_map.insert(ch, glyph_id);
        }
    }
}

impl GlyphSource for GlyphSet {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph(&self, glyph_id: GlyphId) -> Option<Cow<'_, Glyph>> {
        self.glyphs.get(&glyph_id).map(Cow::Borrowed)
    }

    fn map_char(&self, ch: char) -> Option<GlyphId> {
        self.char_map.get(&ch).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contours_from_lengths() {
        let outline = RawOutline::from_contours(
            [
                vec![RawPoint::on(0, 0), RawPoint::on(10, 0), RawPoint::on(10, 10)],
                vec![],
                vec![RawPoint::on(20, 0), RawPoint::off(30, 5)],
            ],
            100,
        );
        assert_eq!(outline.contour_ends, [2, 4]);
        let lens = outline.contours().map(|c| c.len()).collect::<Vec<_>>();
        assert_eq!(lens, [3, 2]);
    }

    #[test]
    fn glyph_set_lookup() {
        let mut set = GlyphSet::new(1000);
        set.insert(GlyphId::new(3), Some('o'), RawOutline::default());
        assert_eq!(set.map_char('o'), Some(GlyphId::new(3)));
        assert!(set.glyph(GlyphId::new(3)).is_some());
        assert!(set.glyph(GlyphId::new(4)).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn glyph_json_shape() {
        let json = r#"{"composite":{"components":[{"glyph_id":2,"placement":{"anchor":{"parent":1,"child":0}}}]}}"#;
        let glyph: Glyph = serde_json::from_str(json).unwrap();
        let Glyph::Composite(composite) = glyph else {
            panic!("expected composite");
        };
        assert_eq!(
            composite.components[0].placement,
            Placement::Anchor {
                parent: 1,
                child: 0
            }
        );
        assert_eq!(composite.advance_width, 0);
    }
}

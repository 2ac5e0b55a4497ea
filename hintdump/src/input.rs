//! JSON description of a font.

use std::collections::BTreeMap;
use std::path::Path;

use autohint::{DesignMetrics, FontGlobals, Glyph, GlyphId, GlyphSet};
use serde::Deserialize;

use crate::CliError;

/// Glyphs of a font in font units.
///
/// ```json
/// {
///     "units_per_em": 1000,
///     "chars": { "o": 2 },
///     "glyphs": { "2": { "outline": { "points": [], "contour_ends": [] } } }
/// }
/// ```
///
/// When `metrics` is absent the design metrics are computed from the
/// glyphs mapped from sample characters.
#[derive(Deserialize, Debug)]
pub struct FontInput {
    pub units_per_em: u16,
    #[serde(default)]
    pub metrics: Option<DesignMetrics>,
    #[serde(default)]
    pub chars: BTreeMap<char, u32>,
    pub glyphs: BTreeMap<u32, Glyph>,
}

impl FontInput {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let data = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Builds the glyph source and the font globals.
    pub fn into_font(self) -> Result<(GlyphSet, FontGlobals), CliError> {
        let mut glyphs = GlyphSet::new(self.units_per_em);
        for (gid, glyph) in self.glyphs {
            glyphs.insert(GlyphId::new(gid), None, glyph);
        }
        glyphs.char_map = self
            .chars
            .into_iter()
            .map(|(ch, gid)| (ch, GlyphId::new(gid)))
            .collect();
        let globals = match self.metrics {
            Some(metrics) => FontGlobals::new(self.units_per_em, metrics),
            None => FontGlobals::compute(&glyphs)?,
        };
        Ok((glyphs, globals))
    }
}

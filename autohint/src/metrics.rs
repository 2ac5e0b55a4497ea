//! Font wide metrics used for hinting.
//!
//! Design metrics are computed once per font from a handful of sample
//! glyphs. A scaled copy is derived for each pixel size and is only
//! recomputed when the scale changes.

use super::{
    axis::Axis,
    error::Result,
    glyph::GlyphSource,
    hinter::{HintingOptions, Target},
    math::{fixed_mul, fixed_mul_div, pix_round},
};
use alloc::vec::Vec;
use font_types::Fixed;

/// Maximum number of standard widths or heights.
pub(crate) const MAX_WIDTHS: usize = 16;

/// Typographic zones that carry blue values.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlueZone {
    /// Top of flat capitals.
    CapitalTop,
    /// Baseline of capitals.
    CapitalBottom,
    /// x-height.
    SmallTop,
    /// Baseline of small letters.
    SmallBottom,
    /// Descender.
    SmallMinor,
}

impl BlueZone {
    pub const ALL: [BlueZone; 5] = [
        BlueZone::CapitalTop,
        BlueZone::CapitalBottom,
        BlueZone::SmallTop,
        BlueZone::SmallBottom,
        BlueZone::SmallMinor,
    ];

    /// True for zones that align the tops of glyphs.
    pub fn is_top(self) -> bool {
        matches!(self, Self::CapitalTop | Self::SmallTop)
    }

    /// Characters sampled to compute the zone.
    pub fn sample_chars(self) -> &'static str {
        match self {
            Self::CapitalTop => "THEZOCQS",
            Self::CapitalBottom => "HEZLOCUS",
            Self::SmallTop => "xzroesc",
            Self::SmallBottom => "xzroesc",
            Self::SmallMinor => "pqgjy",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Blue zone in font units.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Blue {
    /// Position of flat glyph features.
    pub reference: i32,
    /// Position of round glyph features.
    pub overshoot: i32,
}

impl Blue {
    /// Placeholder for zones without sample glyphs. Far enough away that no
    /// edge ever matches it.
    pub const MISSING: Self = Self::new(-10000, -10000);

    pub const fn new(reference: i32, overshoot: i32) -> Self {
        Self {
            reference,
            overshoot,
        }
    }
}

impl Default for Blue {
    fn default() -> Self {
        Self::MISSING
    }
}

/// Which value of a blue zone an edge snaps to.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum BlueKind {
    Reference,
    Overshoot,
}

/// Index of a blue value in the font globals.
///
/// Resolved against whichever scaled table is current so edges keep
/// tracking their zone when the globals are rescaled.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct BlueTarget {
    pub zone: BlueZone,
    pub kind: BlueKind,
}

/// Unscaled global metrics of a font.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DesignMetrics {
    /// Standard vertical stem widths, sorted.
    pub widths: Vec<i32>,
    /// Standard horizontal stem heights, sorted.
    pub heights: Vec<i32>,
    /// Blue zones in [`BlueZone`] order.
    pub blues: [Blue; 5],
    /// Maximum distance between segments that form one edge.
    pub edge_distance_threshold: i32,
}

impl Default for DesignMetrics {
    fn default() -> Self {
        Self {
            widths: Vec::new(),
            heights: Vec::new(),
            blues: [Blue::MISSING; 5],
            edge_distance_threshold: DEFAULT_STANDARD_WIDTH / 5,
        }
    }
}

/// Standard width assumed when a font has no measurable stems.
pub(crate) const DEFAULT_STANDARD_WIDTH: i32 = 50;

impl DesignMetrics {
    /// Computes metrics by analyzing sample glyphs of the given source.
    ///
    /// Stem widths are measured on `o` and blue zones on the characters
    /// listed by [`BlueZone::sample_chars`]. Missing characters are
    /// skipped.
    pub fn compute(source: &impl GlyphSource) -> Result<Self> {
        let mut metrics = super::widths::compute_widths(source)?;
        metrics.blues = super::blues::compute_blues(source);
        log::debug!(
            "computed design metrics: widths {:?}, heights {:?}, blues {:?}",
            metrics.widths,
            metrics.heights,
            metrics.blues
        );
        Ok(metrics)
    }

    pub fn blue(&self, zone: BlueZone) -> Blue {
        self.blues[zone.index()]
    }
}

/// Blue zone in 26.6 device units.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct ScaledBlue {
    pub reference: i32,
    pub overshoot: i32,
}

/// Global metrics scaled to a particular size.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub(crate) struct ScaledMetrics {
    pub x_scale: i32,
    pub y_scale: i32,
    /// Scaled widths for each axis, indexed by [`Axis::index`].
    pub widths: [Vec<i32>; 2],
    /// Primary standard width for each axis.
    pub standard_widths: [i32; 2],
    pub blues: [ScaledBlue; 5],
}

impl ScaledMetrics {
    /// Primary standard width of an axis that lacks standard widths. Never
    /// close to any stem.
    const NO_STANDARD_WIDTH: i32 = 32000;

    pub fn new(design: &DesignMetrics, x_scale: i32, y_scale: i32) -> Self {
        let scale_all =
            |values: &[i32], scale: i32| values.iter().map(|v| fixed_mul(*v, scale)).collect();
        let widths: [Vec<i32>; 2] = [
            scale_all(&design.widths, x_scale),
            scale_all(&design.heights, y_scale),
        ];
        let standard_widths = [
            widths[0].first().copied().unwrap_or(Self::NO_STANDARD_WIDTH),
            widths[1].first().copied().unwrap_or(Self::NO_STANDARD_WIDTH),
        ];
        let blues = design.blues.map(|blue| {
            let delta = blue.overshoot - blue.reference;
            let mut delta2 = fixed_mul(delta.abs(), y_scale);
            // Quantize overshoots to 0, 1/2 or whole pixels
            delta2 = if delta2 < 32 {
                0
            } else if delta2 < 64 {
                32 + ((delta2 - 32 + 16) & !31)
            } else {
                pix_round(delta2)
            };
            if delta < 0 {
                delta2 = -delta2;
            }
            let reference = pix_round(fixed_mul(blue.reference, y_scale));
            ScaledBlue {
                reference,
                overshoot: reference + delta2,
            }
        });
        Self {
            x_scale,
            y_scale,
            widths,
            standard_widths,
            blues,
        }
    }

    pub fn blue_position(&self, target: BlueTarget) -> i32 {
        let blue = &self.blues[target.zone.index()];
        match target.kind {
            BlueKind::Reference => blue.reference,
            BlueKind::Overshoot => blue.overshoot,
        }
    }

    pub fn widths(&self, axis: Axis) -> &[i32] {
        &self.widths[axis.index()]
    }

    pub fn standard_width(&self, axis: Axis) -> i32 {
        self.standard_widths[axis.index()]
    }
}

/// Design metrics of a font with a cached copy scaled to the most recently
/// used size.
#[derive(Clone, Debug)]
pub struct FontGlobals {
    units_per_em: u16,
    design: DesignMetrics,
    scaled: ScaledMetrics,
}

impl FontGlobals {
    pub fn new(units_per_em: u16, design: DesignMetrics) -> Self {
        Self {
            units_per_em,
            design,
            scaled: ScaledMetrics::default(),
        }
    }

    /// Analyzes the sample glyphs of the source.
    pub fn compute(source: &impl GlyphSource) -> Result<Self> {
        Ok(Self::new(
            source.units_per_em(),
            DesignMetrics::compute(source)?,
        ))
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn design(&self) -> &DesignMetrics {
        &self.design
    }

    /// Updates the scaled metrics when the scale factors change.
    pub(crate) fn scale(&mut self, x_scale: i32, y_scale: i32) -> &ScaledMetrics {
        if self.scaled.x_scale != x_scale || self.scaled.y_scale != y_scale {
            log::debug!("rescaling font globals to x: {x_scale:#x}, y: {y_scale:#x}");
            self.scaled = ScaledMetrics::new(&self.design, x_scale, y_scale);
        }
        &self.scaled
    }

    pub(crate) fn scaled(&self) -> &ScaledMetrics {
        &self.scaled
    }
}

/// Captures scaling parameters for one size.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct Scale {
    /// Font unit to 26.6 scale in the X direction.
    pub x_scale: i32,
    /// Font unit to 26.6 scale in the Y direction.
    pub y_scale: i32,
    /// Font size in pixels per em.
    pub size: f32,
    /// From the source font.
    pub units_per_em: i32,
    /// Flags that determine hinting functionality.
    pub flags: u32,
}

impl Scale {
    /// Create scaling parameters from metrics and hinting options.
    pub fn new(
        size: f32,
        units_per_em: i32,
        options: &HintingOptions,
        design: &DesignMetrics,
    ) -> Self {
        let mut x_scale = if units_per_em > 0 {
            (Fixed::from_bits((size * 64.0) as i32) / Fixed::from_bits(units_per_em)).to_bits()
        } else {
            0
        };
        let mut y_scale = x_scale;
        if options.x_height_adjust {
            // Try to align the top of small letters to the pixel grid
            let shoot = design.blue(BlueZone::SmallTop).overshoot;
            if shoot > 0 {
                let scaled = fixed_mul(shoot, y_scale);
                let fitted = pix_round(scaled);
                if scaled != fitted && scaled != 0 {
                    y_scale = fixed_mul_div(y_scale, fitted, scaled);
                    if fitted < scaled {
                        x_scale -= x_scale / 50;
                    }
                }
            }
        }
        let target = options.target;
        let mut flags = 0;
        // Snap vertical stems for monochrome and horizontal LCD rendering.
        if matches!(target, Target::Mono | Target::Lcd) {
            flags |= Self::HORIZONTAL_SNAP;
        }
        // Snap horizontal stems for monochrome and vertical LCD rendering.
        if matches!(target, Target::Mono | Target::VerticalLcd) {
            flags |= Self::VERTICAL_SNAP;
        }
        // Adjust stems to full pixels unless in light mode
        if target != Target::Light {
            flags |= Self::STEM_ADJUST;
        }
        if target == Target::Mono {
            flags |= Self::MONO;
        }
        // Light hinting only touches the vertical axis
        if target == Target::Light {
            flags |= Self::NO_HORIZONTAL;
        }
        Self {
            x_scale,
            y_scale,
            size,
            units_per_em,
            flags,
        }
    }

    /// Returns true if the given axis should be hinted.
    pub fn hints_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.flags & Self::NO_HORIZONTAL == 0,
            Axis::Vertical => true,
        }
    }

    /// Returns true if stems of the given axis snap to whole pixels.
    pub fn snaps_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.flags & Self::HORIZONTAL_SNAP != 0,
            Axis::Vertical => self.flags & Self::VERTICAL_SNAP != 0,
        }
    }
}

/// Scaler flags that determine hinting settings.
impl Scale {
    /// Stem width snapping.
    pub const HORIZONTAL_SNAP: u32 = 1 << 0;
    /// Stem height snapping.
    pub const VERTICAL_SNAP: u32 = 1 << 1;
    /// Stem width/height adjustment.
    pub const STEM_ADJUST: u32 = 1 << 2;
    /// Monochrome rendering.
    pub const MONO: u32 = 1 << 3;
    /// Disable horizontal hinting.
    pub const NO_HORIZONTAL: u32 = 1 << 4;
}

/// Sorts the widths and replaces each cluster of values that lie within
/// `threshold` of the cluster's smallest value by the cluster mean.
pub(crate) fn sort_and_quantize_widths(widths: &mut Vec<i32>, threshold: i32) {
    widths.sort_unstable();
    let mut quantized = Vec::with_capacity(widths.len());
    let mut rest = widths.as_slice();
    while let Some(&first) = rest.first() {
        let len = rest.partition_point(|w| *w - first <= threshold);
        let cluster = &rest[..len];
        quantized.push(cluster.iter().sum::<i32>() / len as i32);
        rest = &rest[len..];
    }
    *widths = quantized;
}

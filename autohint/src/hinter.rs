//! Glyph hinting entry point.

use super::{
    align::{align_edge_points, align_strong_points, align_weak_points},
    axis::Axis,
    edges::{compute_blue_edges, compute_edges, scale_blue_edges},
    error::{HintError, InvalidOutline, Result},
    glyph::{Component, CompositeGlyph, Glyph, GlyphSource, Placement, RawOutline, Transform},
    hint::hint_edges,
    inflection::compute_inflections,
    math::{fixed_mul, pix_round},
    metrics::{FontGlobals, Scale},
    outline::{Outline, OutlineScale},
    segments::{compute_segments, link_segments},
};
use alloc::vec::Vec;
use font_types::{F26Dot6, GlyphId};

/// Maximum nesting depth of composite glyphs.
pub const COMPOSITE_RECURSION_LIMIT: usize = 32;

/// Rendering mode the hinted outline is intended for.
#[derive(Copy, Clone, PartialEq, Eq, Default, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Target {
    /// Smooth hinting on both axes for anti-aliased rendering.
    #[default]
    Normal,
    /// Only the vertical axis is hinted and stem widths are preserved.
    Light,
    /// Strong hinting that snaps all stems to whole pixels.
    Mono,
    /// Snaps vertical stems for horizontally decimated subpixel rendering.
    Lcd,
    /// Snaps horizontal stems for vertically decimated subpixel rendering.
    VerticalLcd,
}

/// Configuration for the hinter.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HintingOptions {
    pub target: Target,
    /// Adjust the vertical scale so that the x-height lands on the pixel
    /// grid.
    pub x_height_adjust: bool,
}

impl Default for HintingOptions {
    fn default() -> Self {
        Self {
            target: Target::Normal,
            x_height_adjust: true,
        }
    }
}

impl From<Target> for HintingOptions {
    fn from(value: Target) -> Self {
        Self {
            target: value,
            ..Default::default()
        }
    }
}

/// Point of a hinted glyph in 26.6 pixel coordinates.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HintedPoint {
    pub x: F26Dot6,
    pub y: F26Dot6,
    pub on_curve: bool,
}

/// Result of hinting a glyph.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HintedGlyph {
    pub points: Vec<HintedPoint>,
    /// Index of the last point of each contour.
    pub contour_ends: Vec<u16>,
    /// Horizontal shift applied to the outline to align the left edge to
    /// the grid.
    pub lsb_delta: F26Dot6,
    /// Hinted advance width, always a whole number of pixels.
    pub advance_width: F26Dot6,
}

/// Point accumulated across the components of a glyph.
#[derive(Copy, Clone, Debug)]
struct PlacedPoint {
    x: i32,
    y: i32,
    on_curve: bool,
}

/// Phantom points that carry the horizontal metrics of a glyph.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
struct HintedMetrics {
    /// Origin.
    pp1: i32,
    /// Advance.
    pp2: i32,
}

/// Automatic hinter for glyph outlines.
///
/// The hinter owns scratch buffers that are reused for each glyph so a
/// single instance should be kept around for hinting many glyphs of the
/// same font.
#[derive(Clone, Default, Debug)]
pub struct Hinter {
    options: HintingOptions,
    outline: Outline,
    points: Vec<PlacedPoint>,
    contour_ends: Vec<u16>,
}

impl Hinter {
    pub fn new(options: impl Into<HintingOptions>) -> Self {
        Self {
            options: options.into(),
            ..Default::default()
        }
    }

    pub fn options(&self) -> HintingOptions {
        self.options
    }

    /// Hints the glyph with the given identifier at a size in pixels per
    /// em.
    ///
    /// The scaled copy of the font globals is refreshed when the size
    /// differs from the previous call.
    pub fn hint(
        &mut self,
        source: &impl GlyphSource,
        globals: &mut FontGlobals,
        glyph_id: GlyphId,
        ppem: f32,
    ) -> Result<HintedGlyph> {
        let units_per_em = globals.units_per_em() as i32;
        if units_per_em == 0 {
            return Err(InvalidOutline::NoUnitsPerEm.into());
        }
        let scale = Scale::new(ppem, units_per_em, &self.options, globals.design());
        log::debug!(
            "hinting glyph {glyph_id} at {ppem} ppem (x_scale: {:#x}, y_scale: {:#x})",
            scale.x_scale,
            scale.y_scale
        );
        globals.scale(scale.x_scale, scale.y_scale);
        let globals = &*globals;
        self.points.clear();
        self.contour_ends.clear();
        let metrics = self.load_glyph(source, globals, &scale, glyph_id, 0)?;
        let HintedMetrics { pp1, pp2 } = metrics;
        let points = self
            .points
            .iter()
            .map(|point| HintedPoint {
                x: F26Dot6::from_bits(point.x.wrapping_sub(pp1)),
                y: F26Dot6::from_bits(point.y),
                on_curve: point.on_curve,
            })
            .collect();
        Ok(HintedGlyph {
            points,
            contour_ends: self.contour_ends.clone(),
            lsb_delta: F26Dot6::from_bits(pp1),
            advance_width: F26Dot6::from_bits(pix_round(pp2.wrapping_sub(pp1))),
        })
    }

    fn load_glyph(
        &mut self,
        source: &impl GlyphSource,
        globals: &FontGlobals,
        scale: &Scale,
        glyph_id: GlyphId,
        depth: usize,
    ) -> Result<HintedMetrics> {
        if depth > COMPOSITE_RECURSION_LIMIT {
            return Err(HintError::RecursionLimitExceeded(glyph_id));
        }
        let glyph = source
            .glyph(glyph_id)
            .ok_or(HintError::GlyphNotFound(glyph_id))?;
        match glyph.as_ref() {
            Glyph::Outline(raw) => self.load_simple(raw, globals, scale),
            Glyph::Composite(composite) => {
                self.load_composite(source, globals, scale, composite, depth)
            }
            Glyph::Bitmap { .. } => Err(HintError::Unimplemented(glyph_id)),
        }
    }

    /// Hints a simple outline and appends it to the accumulated points.
    fn load_simple(
        &mut self,
        raw: &RawOutline,
        globals: &FontGlobals,
        scale: &Scale,
    ) -> Result<HintedMetrics> {
        let design = globals.design();
        let metrics = globals.scaled();
        let outline = &mut self.outline;
        outline.load(
            raw,
            OutlineScale {
                x_scale: scale.x_scale,
                y_scale: scale.y_scale,
                units_per_em: scale.units_per_em,
                edge_distance_threshold: design.edge_distance_threshold,
            },
        )?;
        compute_inflections(outline);
        let axes = Axis::ALL.into_iter().filter(|axis| scale.hints_axis(*axis));
        for axis in axes.clone() {
            compute_segments(outline, axis);
            link_segments(&mut outline.axes[axis.index()]);
            compute_edges(outline, axis);
        }
        if scale.hints_axis(Axis::Vertical) {
            compute_blue_edges(outline, design);
            scale_blue_edges(&mut outline.axes[Axis::Vertical.index()], metrics);
        }
        for axis in axes {
            hint_edges(&mut outline.axes[axis.index()], metrics, scale);
            align_edge_points(outline, axis);
            align_strong_points(outline, axis);
            align_weak_points(outline, axis);
        }
        let advance = fixed_mul(raw.advance_width, scale.x_scale);
        let edges = outline.axes[Axis::Horizontal.index()].edges.as_slice();
        let hinted_metrics = match (edges.first(), edges.last()) {
            (Some(first), Some(last)) if scale.hints_axis(Axis::Horizontal) => {
                let old_rsb = advance - last.opos;
                let pp1 = pix_round(first.pos - first.opos);
                let mut pp2 = pix_round(last.pos + old_rsb);
                // Keep at least the original right side bearing
                if pp2 + pp1 == last.pos && old_rsb > 4 {
                    pp2 += 64;
                }
                HintedMetrics { pp1, pp2 }
            }
            _ => HintedMetrics {
                pp1: 0,
                pp2: advance,
            },
        };
        log::trace!("simple glyph metrics: {hinted_metrics:?}");
        let base = self.points.len();
        let total = base + outline.points.len();
        if total > u16::MAX as usize {
            return Err(InvalidOutline::TooManyPoints(total).into());
        }
        self.points
            .try_reserve(outline.points.len())
            .map_err(|_| HintError::OutOfMemory)?;
        self.contour_ends
            .try_reserve(outline.contours.len())
            .map_err(|_| HintError::OutOfMemory)?;
        self.points
            .extend(outline.points.iter().map(|point| PlacedPoint {
                x: point.x,
                y: point.y,
                on_curve: !point.is_control(),
            }));
        self.contour_ends.extend(
            outline
                .contours
                .iter()
                .map(|contour| (base + contour.last()) as u16),
        );
        Ok(hinted_metrics)
    }

    /// Hints each component of a composite glyph and places it.
    fn load_composite(
        &mut self,
        source: &impl GlyphSource,
        globals: &FontGlobals,
        scale: &Scale,
        composite: &CompositeGlyph,
        depth: usize,
    ) -> Result<HintedMetrics> {
        let mut metrics = HintedMetrics {
            pp1: 0,
            pp2: fixed_mul(composite.advance_width, scale.x_scale),
        };
        let start = self.points.len();
        for component in &composite.components {
            let base = self.points.len();
            log::trace!(
                "loading component {} at depth {}",
                component.glyph_id,
                depth + 1
            );
            let component_metrics =
                self.load_glyph(source, globals, scale, component.glyph_id, depth + 1)?;
            if component.use_my_metrics {
                metrics = component_metrics;
            }
            self.place_component(component, scale, start, base)?;
        }
        Ok(metrics)
    }

    /// Transforms and moves the points of a component that was appended
    /// at `base`.
    fn place_component(
        &mut self,
        component: &Component,
        scale: &Scale,
        start: usize,
        base: usize,
    ) -> Result<()> {
        let (placed, added) = self.points.split_at_mut(base);
        if let Some(transform) = component.transform {
            apply_transform(added, &transform);
        }
        let (dx, dy) = match component.placement {
            Placement::Offset { dx, dy } => (
                pix_round(fixed_mul(dx, scale.x_scale)),
                pix_round(fixed_mul(dy, scale.y_scale)),
            ),
            Placement::Anchor { parent, child } => {
                let invalid = |ix| InvalidOutline::AnchorPoint(component.glyph_id, ix);
                let parent_point = placed
                    .get(start..)
                    .and_then(|points| points.get(parent as usize))
                    .ok_or_else(|| invalid(parent))?;
                let child_point = added.get(child as usize).ok_or_else(|| invalid(child))?;
                (
                    parent_point.x.wrapping_sub(child_point.x),
                    parent_point.y.wrapping_sub(child_point.y),
                )
            }
        };
        if dx != 0 || dy != 0 {
            for point in added {
                point.x = point.x.wrapping_add(dx);
                point.y = point.y.wrapping_add(dy);
            }
        }
        Ok(())
    }
}

fn apply_transform(points: &mut [PlacedPoint], transform: &Transform) {
    let [xx, yx, xy, yy] = [transform.xx, transform.yx, transform.xy, transform.yy]
        .map(|value| value.to_bits());
    for point in points {
        let (x, y) = (point.x, point.y);
        point.x = fixed_mul(x, xx).wrapping_add(fixed_mul(y, xy));
        point.y = fixed_mul(x, yx).wrapping_add(fixed_mul(y, yy));
    }
}

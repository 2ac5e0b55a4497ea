#![no_main]
use autohint::{
    Component, CompositeGlyph, FontGlobals, GlyphId, GlyphSet, Hinter, HintingOptions, Placement,
    RawOutline, RawPoint, Target,
};
use font_types::Fixed;
use libfuzzer_sys::{arbitrary::{self, Arbitrary}, fuzz_target};

/// Sample characters that feed the global metrics.
const SAMPLE_CHARS: &str = "THEZOCQSLUxzroescpqgjy";

#[derive(Arbitrary, Debug)]
enum FuzzerTarget {
    Normal,
    Light,
    Mono,
    Lcd,
    VerticalLcd,
}

impl From<FuzzerTarget> for Target {
    fn from(value: FuzzerTarget) -> Self {
        match value {
            FuzzerTarget::Normal => Target::Normal,
            FuzzerTarget::Light => Target::Light,
            FuzzerTarget::Mono => Target::Mono,
            FuzzerTarget::Lcd => Target::Lcd,
            FuzzerTarget::VerticalLcd => Target::VerticalLcd,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzerPoint {
    x: i16,
    y: i16,
    on_curve: bool,
}

#[derive(Arbitrary, Debug)]
enum FuzzerPlacement {
    Offset(i16, i16),
    Anchor(u16, u16),
}

#[derive(Arbitrary, Debug)]
struct FuzzerComponent {
    glyph_id: u8,
    placement: FuzzerPlacement,
    /// 2.14 values, as stored in fonts
    transform: Option<[i16; 4]>,
    use_my_metrics: bool,
}

#[derive(Arbitrary, Debug)]
enum FuzzerGlyph {
    /// Contours are given by their lengths; a mismatched total exercises
    /// the topology checks.
    Outline {
        points: Vec<FuzzerPoint>,
        contour_lengths: Vec<u8>,
        advance_width: i16,
    },
    Composite {
        components: Vec<FuzzerComponent>,
        advance_width: i16,
    },
}

/// Hinting a small font is fun! Try lots of sizes and modes.
#[derive(Arbitrary, Debug)]
struct HintRequest {
    units_per_em: u16,
    ppem: u8,
    target: FuzzerTarget,
    x_height_adjust: bool,
    glyphs: Vec<FuzzerGlyph>,
}

fn raw_outline(
    points: Vec<FuzzerPoint>,
    contour_lengths: Vec<u8>,
    advance_width: i16,
) -> RawOutline {
    let mut contour_ends = Vec::with_capacity(contour_lengths.len());
    let mut end = 0u16;
    for len in contour_lengths.into_iter().filter(|len| *len > 0) {
        end = end.saturating_add(len as u16);
        contour_ends.push(end - 1);
    }
    RawOutline {
        points: points
            .into_iter()
            .map(|p| RawPoint {
                x: p.x as i32,
                y: p.y as i32,
                on_curve: p.on_curve,
            })
            .collect(),
        contour_ends,
        advance_width: advance_width as i32,
    }
}

fn component(component: FuzzerComponent) -> Component {
    Component {
        glyph_id: GlyphId::new(component.glyph_id as u32),
        placement: match component.placement {
            FuzzerPlacement::Offset(dx, dy) => Placement::Offset {
                dx: dx as i32,
                dy: dy as i32,
            },
            FuzzerPlacement::Anchor(parent, child) => Placement::Anchor { parent, child },
        },
        transform: component.transform.map(|[xx, yx, xy, yy]| {
            let fixed = |v: i16| Fixed::from_bits((v as i32) << 2);
            autohint::Transform {
                xx: fixed(xx),
                yx: fixed(yx),
                xy: fixed(xy),
                yy: fixed(yy),
            }
        }),
        use_my_metrics: component.use_my_metrics,
    }
}

fuzz_target!(|request: HintRequest| {
    let mut glyphs = GlyphSet::new(request.units_per_em);
    let glyph_count = request.glyphs.len();
    for (ix, glyph) in request.glyphs.into_iter().enumerate() {
        let gid = GlyphId::new(ix as u32);
        let ch = SAMPLE_CHARS.chars().nth(ix);
        match glyph {
            FuzzerGlyph::Outline {
                points,
                contour_lengths,
                advance_width,
            } => glyphs.insert(gid, ch, raw_outline(points, contour_lengths, advance_width)),
            FuzzerGlyph::Composite {
                components,
                advance_width,
            } => glyphs.insert(
                gid,
                ch,
                CompositeGlyph {
                    components: components.into_iter().map(component).collect(),
                    advance_width: advance_width as i32,
                },
            ),
        }
    }
    let Ok(mut globals) = FontGlobals::compute(&glyphs) else {
        return;
    };
    let mut hinter = Hinter::new(HintingOptions {
        target: request.target.into(),
        x_height_adjust: request.x_height_adjust,
    });
    for ix in 0..glyph_count {
        let _ = hinter.hint(
            &glyphs,
            &mut globals,
            GlyphId::new(ix as u32),
            request.ppem as f32,
        );
    }
});
